//! Page interpreters: competing strategies that turn one page of fragments
//! into roster drafts.

pub mod boxes;
pub mod list;

pub use boxes::BoxInterpreter;
pub use list::ListInterpreter;

use serde::Serialize;

use crate::config::ImportConfig;
use crate::fragment::Page;
use crate::recognize::FieldRecognizers;
use crate::roster::RosterDraft;

/// Row statistics reported by interpreters that cluster rows.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct RowStats {
    pub rows: usize,
    pub header_rows: usize,
    pub merged_rows: usize,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct Interpretation {
    /// Every draft the strategy produced, complete or not, in page order.
    pub drafts: Vec<RosterDraft>,
    pub row_stats: Option<RowStats>,
}

impl Interpretation {
    pub fn complete_count(&self) -> usize {
        self.drafts.iter().filter(|d| d.is_complete()).count()
    }
}

/// A strategy for reading one page.
///
/// Implementations are pure functions of the page and the recognizers; they
/// never see other pages and keep no state between calls.
pub trait PageInterpreter: Send + Sync {
    fn name(&self) -> &'static str;

    fn interpret(&self, page: &Page, fields: &FieldRecognizers) -> Interpretation;
}

/// The stock strategies in tie-break order: earlier wins on equal yield.
pub fn default_interpreters(config: &ImportConfig) -> Vec<Box<dyn PageInterpreter>> {
    vec![
        Box::new(ListInterpreter::from_config(config)),
        Box::new(BoxInterpreter::from_config(config)),
    ]
}
