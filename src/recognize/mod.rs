//! Field recognizers: pure classifiers for the three required roster fields.
//!
//! They share no mutable state and are rebuilt for every import, so two
//! imports with different registries or date contexts never interfere.

pub mod date;
pub mod shift;
pub mod staff;

pub use date::{calendar_date, infer_context, DateRecognizer};
pub use shift::ShiftClassifier;
pub use staff::StaffMatcher;

use chrono::NaiveDate;

use crate::config::DateContext;
use crate::registry::StaffRegistry;
use crate::roster::ShiftType;

/// The three recognizers bundled for the interpreters.
#[derive(Debug, Clone)]
pub struct FieldRecognizers {
    dates: DateRecognizer,
    staff: StaffMatcher,
}

impl FieldRecognizers {
    pub fn new(
        registry: &dyn StaffRegistry,
        date_context: Option<DateContext>,
        fuzzy_threshold: Option<f64>,
    ) -> Self {
        Self {
            dates: DateRecognizer::new(date_context),
            staff: StaffMatcher::new(registry, fuzzy_threshold),
        }
    }

    pub fn date(&self, text: &str) -> Option<NaiveDate> {
        self.dates.recognize(text)
    }

    pub fn shift(&self, text: &str) -> Option<ShiftType> {
        ShiftClassifier::new(&self.staff).classify(text)
    }

    pub fn staff(&self, text: &str) -> Option<&str> {
        self.staff.match_name(text)
    }

    /// True when the text parses as any of the three fields.
    pub fn is_field(&self, text: &str) -> bool {
        self.dates.is_date(text)
            || ShiftClassifier::new(&self.staff).is_shift(text)
            || self.staff.is_staff(text)
    }

    pub fn date_context(&self) -> Option<DateContext> {
        self.dates.context()
    }
}
