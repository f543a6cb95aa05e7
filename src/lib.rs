pub mod config;
pub mod error;
pub mod fragment;
pub mod interpret;
pub mod layout;
pub mod logging;
pub mod parse;
pub mod recognize;
pub mod reconcile;
pub mod registry;
pub mod roster;
pub mod select;
pub mod trace;

pub use config::{DateContext, ImportConfig};
pub use error::ImportError;
pub use fragment::{Page, TextFragment};
pub use registry::{StaffDirectory, StaffRegistry};
pub use roster::{AcceptedEntry, RosterDraft, ShiftType};
pub use trace::ImportTrace;

use rayon::prelude::*;
use serde::Serialize;

use crate::interpret::default_interpreters;
use crate::logging::ROSTER_SELECT;
use crate::recognize::{infer_context, FieldRecognizers};
use crate::select::{select_page, PageSelection};

/// Accepted entries of one import and the diagnostics that produced them.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RosterImport {
    pub entries: Vec<AcceptedEntry>,
    pub trace: ImportTrace,
}

/// Reconstruct roster entries from the pages of one document.
///
/// Pages are interpreted independently and their kept drafts are reconciled
/// in page order. An empty result is reported as
/// [`ImportError::NoEntriesFound`], which still carries the trace.
///
/// # Arguments
/// * `pages` - Fragments of every page, in document order
/// * `registry` - Staff names the import may assign shifts to
/// * `config` - Tolerances, feature switches and the optional date context
pub fn import_roster(
    pages: &[Page],
    registry: &dyn StaffRegistry,
    config: &ImportConfig,
) -> Result<RosterImport, ImportError> {
    config.validate()?;

    let date_context = config.date_context.or_else(|| {
        infer_context(
            pages
                .iter()
                .flat_map(|page| page.fragments.iter().map(|f| f.text.as_str())),
        )
    });
    if config.date_context.is_none() {
        tracing::debug!(target: ROSTER_SELECT, context = ?date_context, "Inferred date context");
    }

    let fields = FieldRecognizers::new(registry, date_context, config.fuzzy_name_threshold);
    let interpreters = default_interpreters(config);

    let selections: Vec<PageSelection> = if config.parallel_pages {
        pages
            .par_iter()
            .map(|page| select_page(page, &interpreters, &fields))
            .collect()
    } else {
        pages
            .iter()
            .map(|page| select_page(page, &interpreters, &fields))
            .collect()
    };

    let mut trace = ImportTrace::new(date_context);
    let mut drafts = Vec::new();
    for selection in selections {
        trace.pages.push(selection.trace);
        drafts.extend(selection.drafts);
    }

    let entries = reconcile::reconcile(drafts, &mut trace);
    if entries.is_empty() {
        tracing::warn!(target: ROSTER_SELECT, pages = pages.len(), "No roster entries found");
        return Err(ImportError::NoEntriesFound {
            trace: Box::new(trace),
        });
    }

    Ok(RosterImport { entries, trace })
}

/// Load a PDF from memory, extract its text and import it.
pub fn import_roster_pdf(
    pdf_bytes: &[u8],
    registry: &dyn StaffRegistry,
    config: &ImportConfig,
) -> Result<RosterImport, ImportError> {
    let pages = parse::load_pdf_pages(pdf_bytes)?;
    import_roster(&pages, registry, config)
}
