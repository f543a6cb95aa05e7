use chrono::NaiveDate;
use serde::{Serialize, Serializer};
use std::fmt;

/// Change description attached to every imported entry.
pub const IMPORT_DESCRIPTION: &str = "Imported from PDF";

/// Annotation appended when the Saturday rule rewrites an evening shift.
pub const SATURDAY_NOTE: &str = "Saturday evening shift recorded as Saturday Regular";

/// The five duty codes a roster can assign.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum ShiftType {
    MorningShift,
    EveningShift,
    SaturdayRegular,
    NightDuty,
    SundayOrHolidayOrSpecial,
}

impl ShiftType {
    pub const ALL: [ShiftType; 5] = [
        ShiftType::MorningShift,
        ShiftType::EveningShift,
        ShiftType::SaturdayRegular,
        ShiftType::NightDuty,
        ShiftType::SundayOrHolidayOrSpecial,
    ];

    /// Canonical display string, also the persisted value.
    pub fn as_str(&self) -> &'static str {
        match self {
            ShiftType::MorningShift => "Morning Shift (9-4)",
            ShiftType::EveningShift => "Evening Shift (4-10)",
            ShiftType::SaturdayRegular => "Saturday Regular (12-10)",
            ShiftType::NightDuty => "Night Duty (22-9)",
            ShiftType::SundayOrHolidayOrSpecial => "Sunday/Holiday/Special",
        }
    }
}

impl fmt::Display for ShiftType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl Serialize for ShiftType {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}

/// Where a draft came from inside its page.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum DraftOrigin {
    /// Index of the clustered row on the page.
    Row { index: usize },
    /// Position of the staff-name fragment the draft was anchored on.
    Anchor { index: usize, x: f32, y: f32 },
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DraftSource {
    pub page: u32,
    pub strategy: &'static str,
    pub origin: DraftOrigin,
    /// Text of the fragments the draft was built from, for diagnostics.
    pub text: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum MissingField {
    Date,
    ShiftType,
    StaffName,
}

/// Candidate roster record produced by an interpreter.
#[derive(Debug, Clone, PartialEq)]
pub struct RosterDraft {
    pub date: Option<NaiveDate>,
    pub shift_type: Option<ShiftType>,
    pub staff_name: Option<String>,
    pub remark: Option<String>,
    pub source: DraftSource,
}

impl RosterDraft {
    pub fn new(source: DraftSource) -> Self {
        Self {
            date: None,
            shift_type: None,
            staff_name: None,
            remark: None,
            source,
        }
    }

    pub fn is_complete(&self) -> bool {
        self.date.is_some() && self.shift_type.is_some() && self.staff_name.is_some()
    }

    pub fn missing_fields(&self) -> Vec<MissingField> {
        let mut missing = Vec::new();
        if self.date.is_none() {
            missing.push(MissingField::Date);
        }
        if self.shift_type.is_none() {
            missing.push(MissingField::ShiftType);
        }
        if self.staff_name.is_none() {
            missing.push(MissingField::StaffName);
        }
        missing
    }

    /// Finalize a complete draft. Returns `None` if any required field is unset.
    pub fn accept(self) -> Option<AcceptedEntry> {
        let date = self.date?;
        let shift_type = self.shift_type?;
        let assigned_name = self.staff_name?;

        let change_description = match self.remark.as_deref().map(str::trim) {
            Some(remark) if !remark.is_empty() => {
                format!("Special Date: {remark}; {IMPORT_DESCRIPTION}")
            }
            _ => IMPORT_DESCRIPTION.to_string(),
        };

        Some(AcceptedEntry {
            date,
            shift_type,
            assigned_name,
            change_description,
        })
    }
}

/// Fully populated, deduplicated roster record handed to persistence.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AcceptedEntry {
    pub date: NaiveDate,
    pub shift_type: ShiftType,
    pub assigned_name: String,
    pub change_description: String,
}

impl AcceptedEntry {
    pub fn key(&self) -> EntryKey {
        (self.date, self.shift_type, self.assigned_name.clone())
    }
}

/// Uniqueness key of an accepted entry.
pub type EntryKey = (NaiveDate, ShiftType, String);
