use std::path::PathBuf;
use std::sync::Once;

use tracing::Level;
use tracing_appender::{
    non_blocking::WorkerGuard,
    rolling::{RollingFileAppender, Rotation},
};
use tracing_subscriber::{filter::EnvFilter, layer::SubscriberExt, util::SubscriberInitExt, Layer};

// Log targets, one per pipeline stage
pub const PDF_TEXT: &str = "pdf_text";
pub const ROSTER_LAYOUT: &str = "roster_layout";
pub const ROSTER_LIST: &str = "roster_list";
pub const ROSTER_BOX: &str = "roster_box";
pub const ROSTER_SELECT: &str = "roster_select";
pub const ROSTER_RECONCILE: &str = "roster_reconcile";

const DEBUG_TARGETS: &[&str] = &[
    PDF_TEXT,
    ROSTER_LAYOUT,
    ROSTER_LIST,
    ROSTER_BOX,
    ROSTER_SELECT,
    ROSTER_RECONCILE,
];

static INIT: Once = Once::new();

/// `RUST_LOG`, when set to a valid filter, replaces the stage defaults.
fn stage_filter(verbose: bool) -> EnvFilter {
    filter_from(std::env::var("RUST_LOG").ok().as_deref(), verbose)
}

fn filter_from(rust_log: Option<&str>, verbose: bool) -> EnvFilter {
    if let Some(directives) = rust_log.filter(|d| !d.trim().is_empty()) {
        match EnvFilter::try_new(directives) {
            Ok(filter) => return filter,
            Err(e) => eprintln!("Ignoring invalid RUST_LOG {directives:?}: {e}"),
        }
    }

    let level = if verbose { "debug" } else { "info" };
    DEBUG_TARGETS
        .iter()
        .fold(EnvFilter::new("").add_directive(Level::WARN.into()), |filter, target| {
            match format!("{target}={level}").parse() {
                Ok(directive) => filter.add_directive(directive),
                Err(_) => filter,
            }
        })
}

/// Log to stderr. Without `RUST_LOG`, the roster targets log at `info`, or
/// `debug` when verbose, and everything else at `warn`.
pub fn init_logging(verbose: bool) {
    INIT.call_once(|| {
        let stderr_layer = tracing_subscriber::fmt::layer()
            .with_target(true)
            .with_writer(std::io::stderr)
            .with_filter(stage_filter(verbose));

        tracing_subscriber::registry().with(stderr_layer).init();
    });
}

/// Log to stderr and to `roster-import.log` inside `log_dir`. Keep the guard
/// alive until the program exits or buffered lines are lost.
pub fn init_logging_with_dir(verbose: bool, log_dir: PathBuf) -> std::io::Result<WorkerGuard> {
    std::fs::create_dir_all(&log_dir)?;

    let file_appender = RollingFileAppender::new(Rotation::NEVER, log_dir, "roster-import.log");
    let (non_blocking_appender, guard) = tracing_appender::non_blocking(file_appender);

    INIT.call_once(|| {
        let file_layer = tracing_subscriber::fmt::layer()
            .with_target(true)
            .with_file(true)
            .with_line_number(true)
            .with_ansi(false)
            .with_writer(non_blocking_appender)
            .with_filter(stage_filter(true));

        let stderr_layer = tracing_subscriber::fmt::layer()
            .with_target(true)
            .with_writer(std::io::stderr)
            .with_filter(stage_filter(verbose));

        tracing_subscriber::registry()
            .with(file_layer)
            .with(stderr_layer)
            .init();
    });

    Ok(guard)
}
