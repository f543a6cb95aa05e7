use crate::config::{ImportConfig, DEFAULT_ROW_TOLERANCE};
use crate::fragment::{Page, TextFragment};
use crate::interpret::{Interpretation, PageInterpreter, RowStats};
use crate::layout::{cluster_rows, merge_continuation_rows, Row};
use crate::logging::ROSTER_LIST;
use crate::recognize::FieldRecognizers;
use crate::roster::{DraftOrigin, DraftSource, RosterDraft};

pub const LIST_STRATEGY: &str = "list";

const DATE_COLUMN: usize = 0;
const SHIFT_COLUMN: usize = 2;
const STAFF_COLUMN: usize = 3;
const REMARKS_START: usize = 6;

/// A row is a header when at least this many cells are header words.
const HEADER_MIN_MATCHES: usize = 2;

static HEADER_KEYWORDS: &[&str] = &[
    "date",
    "day",
    "shift",
    "shift type",
    "type",
    "staff",
    "staff name",
    "name",
    "edited by",
    "edited at",
    "remarks",
    "remark",
    "morning",
    "evening",
    "night",
    "s.no",
    "sl no",
];

/// Reads each row as `[date, day, shift, staff, edited by, edited at, remarks...]`,
/// scanning the whole row for any field missing from its column.
#[derive(Debug, Clone)]
pub struct ListInterpreter {
    pub row_tolerance: f32,
    pub merge_continuation_rows: bool,
}

impl Default for ListInterpreter {
    fn default() -> Self {
        Self {
            row_tolerance: DEFAULT_ROW_TOLERANCE,
            merge_continuation_rows: true,
        }
    }
}

impl ListInterpreter {
    pub fn from_config(config: &ImportConfig) -> Self {
        Self {
            row_tolerance: config.row_tolerance,
            merge_continuation_rows: config.merge_continuation_rows,
        }
    }

    fn read_row(&self, page: u32, index: usize, row: &Row, fields: &FieldRecognizers) -> RosterDraft {
        let mut draft = RosterDraft::new(DraftSource {
            page,
            strategy: LIST_STRATEGY,
            origin: DraftOrigin::Row { index },
            text: row.text(),
        });

        let cells = &row.fragments;

        draft.date = cell(cells, DATE_COLUMN)
            .and_then(|text| fields.date(text))
            .or_else(|| cells.iter().find_map(|f| fields.date(&f.text)));

        draft.shift_type = cell(cells, SHIFT_COLUMN)
            .and_then(|text| fields.shift(text))
            .or_else(|| cells.iter().find_map(|f| fields.shift(&f.text)));

        draft.staff_name = cell(cells, STAFF_COLUMN)
            .and_then(|text| fields.staff(text))
            .or_else(|| cells.iter().find_map(|f| fields.staff(&f.text)))
            .map(str::to_string);

        let remark = cells
            .iter()
            .skip(REMARKS_START)
            .chain(row.continuation.iter())
            .map(|f| f.text.trim())
            .filter(|t| !t.is_empty())
            .collect::<Vec<_>>()
            .join(" ");
        draft.remark = (!remark.is_empty()).then_some(remark);

        if !draft.is_complete() {
            tracing::debug!(
                target: ROSTER_LIST,
                page,
                row = index,
                missing = ?draft.missing_fields(),
                text = %draft.source.text,
                "Row did not resolve every field"
            );
        }

        draft
    }
}

impl PageInterpreter for ListInterpreter {
    fn name(&self) -> &'static str {
        LIST_STRATEGY
    }

    fn interpret(&self, page: &Page, fields: &FieldRecognizers) -> Interpretation {
        let rows = cluster_rows(&page.fragments, self.row_tolerance);
        let mut stats = RowStats {
            rows: rows.len(),
            ..RowStats::default()
        };

        let rows = if self.merge_continuation_rows {
            let (rows, merged) = merge_continuation_rows(rows, fields);
            stats.merged_rows = merged;
            rows
        } else {
            rows
        };

        let mut drafts = Vec::new();
        for (index, row) in rows.iter().enumerate() {
            if row.is_empty() {
                continue;
            }
            if is_header(row) {
                stats.header_rows += 1;
                tracing::debug!(target: ROSTER_LIST, page = page.number, row = index, "Skipped header row");
                continue;
            }
            drafts.push(self.read_row(page.number, index, row, fields));
        }

        Interpretation {
            drafts,
            row_stats: Some(stats),
        }
    }
}

fn cell(cells: &[TextFragment], column: usize) -> Option<&str> {
    cells.get(column).map(|f| f.text.as_str())
}

pub fn is_header(row: &Row) -> bool {
    row.texts()
        .filter(|text| {
            let normalized = text.trim().to_lowercase();
            HEADER_KEYWORDS.contains(&normalized.as_str())
        })
        .count()
        >= HEADER_MIN_MATCHES
}
