use serde::Serialize;
use uuid::Uuid;

use crate::config::DateContext;
use crate::roster::{DraftSource, MissingField, RosterDraft};

/// Structured diagnostics returned with every import, so a poor result can be
/// explained without re-running under a debugger.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ImportTrace {
    pub run_id: Uuid,
    pub date_context: Option<DateContext>,
    pub pages: Vec<PageTrace>,
    pub dropped: Vec<DroppedDraft>,
    pub duplicates_removed: usize,
    pub saturday_conversions: usize,
}

impl ImportTrace {
    pub fn new(date_context: Option<DateContext>) -> Self {
        Self {
            run_id: Uuid::new_v4(),
            date_context,
            pages: Vec::new(),
            dropped: Vec::new(),
            duplicates_removed: 0,
            saturday_conversions: 0,
        }
    }

    pub fn page(&self, number: u32) -> Option<&PageTrace> {
        self.pages.iter().find(|p| p.page == number)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PageTrace {
    pub page: u32,
    pub fragments: usize,
    /// Fragments ignored because their position was NaN or infinite.
    pub skipped_fragments: usize,
    pub rows: usize,
    pub header_rows: usize,
    pub merged_rows: usize,
    pub scores: Vec<StrategyScore>,
    /// Name of the interpreter whose drafts were kept.
    pub chosen: &'static str,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct StrategyScore {
    pub strategy: &'static str,
    pub drafts: usize,
    pub complete: usize,
}

impl StrategyScore {
    pub fn of(strategy: &'static str, drafts: &[RosterDraft]) -> Self {
        Self {
            strategy,
            drafts: drafts.len(),
            complete: drafts.iter().filter(|d| d.is_complete()).count(),
        }
    }
}

/// A kept draft that could not become an entry.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DroppedDraft {
    pub source: DraftSource,
    pub missing: Vec<MissingField>,
}

impl DroppedDraft {
    pub fn from_draft(draft: &RosterDraft) -> Self {
        Self {
            source: draft.source.clone(),
            missing: draft.missing_fields(),
        }
    }
}
