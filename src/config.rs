use serde::{Deserialize, Serialize};
use std::path::Path;

use crate::error::ImportError;

/// Maximum vertical distance between a fragment and its row's reference `y`.
pub const DEFAULT_ROW_TOLERANCE: f32 = 15.0;
/// Horizontal window around an anchor when looking for its date above it.
pub const DEFAULT_DATE_SEARCH_DX: f32 = 50.0;
/// Width of the leftmost column band, measured from the page's minimum `x`.
pub const DEFAULT_SHIFT_COLUMN_BAND: f32 = 100.0;
/// Vertical window around an anchor when looking for its shift.
pub const DEFAULT_SHIFT_SEARCH_DY: f32 = 30.0;
pub const DEFAULT_FUZZY_NAME_THRESHOLD: f64 = 0.9;

/// Month and year assumed by the degraded date patterns.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DateContext {
    pub year: i32,
    pub month: u32,
}

impl DateContext {
    pub fn new(year: i32, month: u32) -> Self {
        Self { year, month }
    }

    /// Parse `YYYY-MM`.
    pub fn parse(s: &str) -> Option<Self> {
        let (year, month) = s.trim().split_once('-')?;
        let year: i32 = year.parse().ok()?;
        let month: u32 = month.parse().ok()?;
        (1..=12).contains(&month).then_some(Self { year, month })
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ImportConfig {
    pub row_tolerance: f32,
    pub date_search_dx: f32,
    pub shift_column_band: f32,
    pub shift_search_dy: f32,
    /// Attach remark-only trailing rows to the row above. `false` reproduces
    /// the legacy importer, which computed the merge and then ignored it.
    pub merge_continuation_rows: bool,
    /// `None` disables fuzzy staff-name matching.
    pub fuzzy_name_threshold: Option<f64>,
    pub parallel_pages: bool,
    /// Inferred from the document's fully qualified dates when unset.
    pub date_context: Option<DateContext>,
}

impl Default for ImportConfig {
    fn default() -> Self {
        Self {
            row_tolerance: DEFAULT_ROW_TOLERANCE,
            date_search_dx: DEFAULT_DATE_SEARCH_DX,
            shift_column_band: DEFAULT_SHIFT_COLUMN_BAND,
            shift_search_dy: DEFAULT_SHIFT_SEARCH_DY,
            merge_continuation_rows: true,
            fuzzy_name_threshold: Some(DEFAULT_FUZZY_NAME_THRESHOLD),
            parallel_pages: false,
            date_context: None,
        }
    }
}

impl ImportConfig {
    pub fn from_json(json: &str) -> Result<Self, ImportError> {
        let config: ImportConfig = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    pub fn from_json_file<P: AsRef<Path>>(path: P) -> Result<Self, ImportError> {
        let json = std::fs::read_to_string(path)?;
        Self::from_json(&json)
    }

    pub fn with_date_context(mut self, context: DateContext) -> Self {
        self.date_context = Some(context);
        self
    }

    pub fn validate(&self) -> Result<(), ImportError> {
        let windows = [
            ("row_tolerance", self.row_tolerance),
            ("date_search_dx", self.date_search_dx),
            ("shift_column_band", self.shift_column_band),
            ("shift_search_dy", self.shift_search_dy),
        ];
        for (name, value) in windows {
            if !value.is_finite() || value < 0.0 {
                return Err(ImportError::Config(format!(
                    "{name} must be a non-negative number, got {value}"
                )));
            }
        }

        if let Some(threshold) = self.fuzzy_name_threshold {
            if !(0.0..=1.0).contains(&threshold) {
                return Err(ImportError::Config(format!(
                    "fuzzy_name_threshold must be within 0..=1, got {threshold}"
                )));
            }
        }

        if let Some(context) = self.date_context {
            if !(1..=12).contains(&context.month) {
                return Err(ImportError::Config(format!(
                    "date_context.month must be 1-12, got {}",
                    context.month
                )));
            }
        }

        Ok(())
    }
}
