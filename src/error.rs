use thiserror::Error;

use crate::trace::ImportTrace;

#[derive(Error, Debug)]
pub enum ImportError {
    /// Every page was read but nothing survived reconciliation. This is a
    /// property of the document, not a parser failure.
    #[error("no roster entries found in {} page(s)", .trace.pages.len())]
    NoEntriesFound { trace: Box<ImportTrace> },

    #[error("PDF error: {0}")]
    Pdf(#[from] lopdf::Error),

    #[error("failed to extract text from page {page}: {source}")]
    PageExtraction {
        page: u32,
        #[source]
        source: lopdf::Error,
    },

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("invalid configuration: {0}")]
    Config(String),
}

impl ImportError {
    pub fn is_no_entries(&self) -> bool {
        matches!(self, ImportError::NoEntriesFound { .. })
    }
}
