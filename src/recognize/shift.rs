use lazy_static::lazy_static;
use regex::Regex;

use crate::recognize::staff::StaffMatcher;
use crate::roster::ShiftType;

lazy_static! {
    // A bare time range must not sit inside a date such as 12-10-2025.
    static ref RANGE_4_10: Regex = range_pattern("4", "10");
    static ref RANGE_9_4: Regex = range_pattern("9", "4");
    static ref RANGE_12_10: Regex = range_pattern("12", "10");
    static ref RANGE_22_9: Regex = range_pattern("22", "9");
    static ref WORD_NIGHT: Regex = word_pattern("night");
    static ref WORD_SATURDAY: Regex = word_pattern("saturday");
    static ref WORD_SPECIAL_DAY: Regex = Regex::new(r"(?i)\b(?:sunday|special|holiday)\b").unwrap();
    static ref WORD_MORNING: Regex = word_pattern("morning");
    static ref WORD_EVENING: Regex = word_pattern("evening");
}

fn range_pattern(start: &str, end: &str) -> Regex {
    Regex::new(&format!(r"(?:^|[^\d/\-]){start}\s*-\s*{end}(?:[^\d/\-]|$)")).unwrap()
}

fn word_pattern(word: &str) -> Regex {
    Regex::new(&format!(r"(?i)\b{word}\b")).unwrap()
}

/// Named shift with its parenthesized hours, the most explicit spelling.
static LABELLED_RANGES: &[(&str, &str, ShiftType)] = &[
    ("evening", "(4-10)", ShiftType::EveningShift),
    ("morning", "(9-4)", ShiftType::MorningShift),
    ("saturday", "(12-10)", ShiftType::SaturdayRegular),
    ("night", "(22-9)", ShiftType::NightDuty),
];

/// Maps shift cells to duty codes. Consults the staff matcher first so a name
/// that happens to look like a shift code stays a name.
#[derive(Debug, Clone, Copy)]
pub struct ShiftClassifier<'a> {
    staff: &'a StaffMatcher,
}

impl<'a> ShiftClassifier<'a> {
    pub fn new(staff: &'a StaffMatcher) -> Self {
        Self { staff }
    }

    pub fn classify(&self, text: &str) -> Option<ShiftType> {
        if self.staff.is_staff(text) {
            return None;
        }

        let trimmed = text.trim();
        let lower = trimmed.to_lowercase();
        let compact: String = lower.chars().filter(|c| !c.is_whitespace()).collect();

        for (word, range, shift) in LABELLED_RANGES {
            if lower.contains(word) && compact.contains(range) {
                return Some(*shift);
            }
        }

        let ranges: [(&Regex, ShiftType); 4] = [
            (&*RANGE_4_10, ShiftType::EveningShift),
            (&*RANGE_9_4, ShiftType::MorningShift),
            (&*RANGE_12_10, ShiftType::SaturdayRegular),
            (&*RANGE_22_9, ShiftType::NightDuty),
        ];
        for (pattern, shift) in ranges {
            if pattern.is_match(&lower) {
                return Some(shift);
            }
        }

        let words: [(&Regex, ShiftType); 5] = [
            (&*WORD_NIGHT, ShiftType::NightDuty),
            (&*WORD_SATURDAY, ShiftType::SaturdayRegular),
            (&*WORD_SPECIAL_DAY, ShiftType::SundayOrHolidayOrSpecial),
            (&*WORD_MORNING, ShiftType::MorningShift),
            (&*WORD_EVENING, ShiftType::EveningShift),
        ];
        for (pattern, shift) in words {
            if pattern.is_match(&lower) {
                return Some(shift);
            }
        }

        (trimmed == "N" || trimmed == "n").then_some(ShiftType::NightDuty)
    }

    pub fn is_shift(&self, text: &str) -> bool {
        self.classify(text).is_some()
    }
}
