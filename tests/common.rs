#![allow(dead_code)]

use chrono::NaiveDate;
use roster_import::recognize::FieldRecognizers;
use roster_import::roster::{DraftOrigin, DraftSource};
use roster_import::{DateContext, Page, RosterDraft, ShiftType, TextFragment};

/// Left edge of the first column and the spacing between columns.
pub const FIRST_COLUMN_X: f32 = 10.0;
pub const COLUMN_WIDTH: f32 = 70.0;

/// Builds pages fragment by fragment or row by row.
pub struct PageBuilder {
    number: u32,
    fragments: Vec<TextFragment>,
}

impl PageBuilder {
    pub fn new(number: u32) -> Self {
        Self {
            number,
            fragments: Vec::new(),
        }
    }

    pub fn text(mut self, text: &str, x: f32, y: f32) -> Self {
        self.fragments.push(TextFragment::new(text, x, y));
        self
    }

    /// One cell per column, left to right, all at the same `y`.
    pub fn row(mut self, y: f32, cells: &[&str]) -> Self {
        for (i, cell) in cells.iter().enumerate() {
            let x = FIRST_COLUMN_X + COLUMN_WIDTH * i as f32;
            self.fragments.push(TextFragment::new(*cell, x, y));
        }
        self
    }

    pub fn build(self) -> Page {
        Page::new(self.number, self.fragments)
    }
}

pub fn registry() -> Vec<String> {
    ["NARAYYA", "NARAYYA(R)", "RAMESH", "LAKSHMI DEVI", "VENKATESWARA"]
        .iter()
        .map(|s| s.to_string())
        .collect()
}

pub fn fields() -> FieldRecognizers {
    FieldRecognizers::new(&registry(), Some(DateContext::new(2025, 7)), Some(0.9))
}

pub fn date(year: i32, month: u32, day: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(year, month, day).unwrap()
}

/// A list-style draft with every field given.
pub fn draft(
    date: NaiveDate,
    shift_type: ShiftType,
    staff_name: &str,
    remark: Option<&str>,
) -> RosterDraft {
    let mut draft = RosterDraft::new(DraftSource {
        page: 1,
        strategy: "list",
        origin: DraftOrigin::Row { index: 0 },
        text: format!("{date} | {shift_type} | {staff_name}"),
    });
    draft.date = Some(date);
    draft.shift_type = Some(shift_type);
    draft.staff_name = Some(staff_name.to_string());
    draft.remark = remark.map(str::to_string);
    draft
}
