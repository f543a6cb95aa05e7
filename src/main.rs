use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{bail, Context, Result};
use clap::Parser;

use roster_import::{
    import_roster, import_roster_pdf, DateContext, ImportConfig, ImportError, Page,
    StaffDirectory,
};

#[derive(Parser, Debug)]
#[clap(
    author,
    version,
    about,
    long_about = "Reconstruct duty roster entries from a PDF or a text-fragment dump.",
    arg_required_else_help = true
)]
pub struct Args {
    /// PDF file, or JSON fragment dump (array of pages of {text, x, y})
    pub input: PathBuf,

    /// Staff registry: JSON array of names, or one name per line
    #[clap(short, long)]
    pub registry: PathBuf,

    /// Month assumed by day-only dates, as YYYY-MM
    #[clap(short, long)]
    pub month: Option<String>,

    /// JSON import configuration
    #[clap(short, long)]
    pub config: Option<PathBuf>,

    /// Optional output file path. If omitted, writes to stdout.
    #[clap(short, long)]
    pub output: Option<PathBuf>,

    /// Pretty print output.
    #[clap(short, long)]
    pub pretty: bool,

    /// Write the import trace as JSON to this file
    #[clap(long)]
    pub trace: Option<PathBuf>,

    /// Directory for the log file
    #[clap(long)]
    pub log_dir: Option<PathBuf>,

    /// Debug logging for every pipeline stage
    #[clap(short, long)]
    pub verbose: bool,
}

impl Args {
    pub fn parse_args() -> Self {
        Args::parse()
    }
}

fn expand(path: &Path) -> Result<PathBuf> {
    let raw = path.to_string_lossy();
    let expanded = shellexpand::full(&raw)
        .with_context(|| format!("failed to expand path {}", path.display()))?;
    Ok(PathBuf::from(expanded.as_ref()))
}

fn to_json<T: serde::Serialize>(value: &T, pretty: bool) -> Result<String> {
    let json = if pretty {
        serde_json::to_string_pretty(value)?
    } else {
        serde_json::to_string(value)?
    };
    Ok(json)
}

fn main() -> Result<()> {
    let args = Args::parse_args();

    // Keep the guard alive so buffered file output is flushed on exit
    let _guard = match &args.log_dir {
        Some(log_dir) => Some(
            roster_import::logging::init_logging_with_dir(args.verbose, expand(log_dir)?)
                .context("failed to set up log directory")?,
        ),
        None => {
            roster_import::logging::init_logging(args.verbose);
            None
        }
    };

    let mut config = match &args.config {
        Some(path) => {
            let path = expand(path)?;
            ImportConfig::from_json_file(&path)
                .with_context(|| format!("failed to load config {}", path.display()))?
        }
        None => ImportConfig::default(),
    };
    if let Some(month) = &args.month {
        let Some(context) = DateContext::parse(month) else {
            bail!("--month must look like YYYY-MM, got {month:?}");
        };
        config = config.with_date_context(context);
    }

    let registry_path = expand(&args.registry)?;
    let registry = StaffDirectory::from_file(&registry_path)
        .with_context(|| format!("failed to read registry {}", registry_path.display()))?;
    if registry.is_empty() {
        tracing::warn!("Staff registry {} has no names", registry_path.display());
    }

    let input = expand(&args.input)?;
    let is_json = input
        .extension()
        .is_some_and(|ext| ext.eq_ignore_ascii_case("json"));

    let result = if is_json {
        let pages = Page::from_json_file(&input)
            .with_context(|| format!("failed to read fragments from {}", input.display()))?;
        import_roster(&pages, &registry, &config)
    } else {
        let pdf_bytes =
            fs::read(&input).with_context(|| format!("failed to read {}", input.display()))?;
        import_roster_pdf(&pdf_bytes, &registry, &config)
    };

    let import = match result {
        Ok(import) => import,
        Err(ImportError::NoEntriesFound { trace }) => {
            if let Some(path) = &args.trace {
                fs::write(expand(path)?, to_json(&trace, args.pretty)?)?;
            }
            bail!("no roster entries found in {}", input.display());
        }
        Err(e) => {
            return Err(e).with_context(|| format!("failed to import {}", input.display()));
        }
    };

    if let Some(path) = &args.trace {
        let path = expand(path)?;
        fs::write(&path, to_json(&import.trace, args.pretty)?)
            .with_context(|| format!("failed to write trace {}", path.display()))?;
    }

    let json = to_json(&import.entries, args.pretty)?;
    match &args.output {
        Some(path) => {
            let path = expand(path)?;
            fs::write(&path, json)
                .with_context(|| format!("failed to write {}", path.display()))?;
            tracing::info!("Wrote {} entries to {}", import.entries.len(), path.display());
        }
        None => println!("{json}"),
    }

    Ok(())
}
