use std::cmp::Ordering;

use crate::fragment::TextFragment;
use crate::logging::ROSTER_LAYOUT;
use crate::recognize::FieldRecognizers;

/// Words that mark a fragment as free-text remarks rather than table data.
static REMARK_KEYWORDS: &[&str] = &[
    "special",
    "holiday",
    "festival",
    "leave",
    "swap",
    "exchange",
    "replaced",
    "replacement",
    "instead",
    "compensatory",
    "remark",
    "note",
    "off",
];

/// Fragments at least this long (and containing a letter) read as remarks.
const REMARK_MIN_CHARS: usize = 12;

/// One visual row of a page after clustering.
#[derive(Debug, Clone, PartialEq)]
pub struct Row {
    /// `y` of the fragment that opened the row.
    pub reference_y: f32,
    /// Fragments sorted left to right.
    pub fragments: Vec<TextFragment>,
    /// Remark fragments merged in from the short rows beneath this one.
    pub continuation: Vec<TextFragment>,
}

impl Row {
    fn from_fragments(reference_y: f32, mut fragments: Vec<TextFragment>) -> Self {
        fragments.sort_by(|a, b| a.x.partial_cmp(&b.x).unwrap_or(Ordering::Equal));

        tracing::trace!(
            target: ROSTER_LAYOUT,
            y = reference_y,
            fragments = fragments.len(),
            "Created row"
        );

        Self {
            reference_y,
            fragments,
            continuation: Vec::new(),
        }
    }

    pub fn len(&self) -> usize {
        self.fragments.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fragments.is_empty()
    }

    pub fn texts(&self) -> impl Iterator<Item = &str> {
        self.fragments.iter().map(|f| f.text.as_str())
    }

    /// Row text joined with `" | "`, continuation included.
    pub fn text(&self) -> String {
        self.fragments
            .iter()
            .chain(self.continuation.iter())
            .map(|f| f.text.trim())
            .collect::<Vec<_>>()
            .join(" | ")
    }
}

/// Group a page's fragments into rows, top of the page first.
///
/// A fragment joins the open row while `|y - reference_y| <= tolerance`;
/// the reference is the `y` of the fragment that opened the row.
pub fn cluster_rows(fragments: &[TextFragment], tolerance: f32) -> Vec<Row> {
    let mut sorted: Vec<&TextFragment> = fragments.iter().collect();
    sorted.sort_by(|a, b| {
        a.y.partial_cmp(&b.y)
            .unwrap_or(Ordering::Equal)
            .then_with(|| a.x.partial_cmp(&b.x).unwrap_or(Ordering::Equal))
    });

    let mut rows = Vec::new();
    let mut current: Vec<TextFragment> = Vec::new();
    let mut reference_y = 0.0;

    for fragment in sorted {
        if current.is_empty() {
            reference_y = fragment.y;
            current.push(fragment.clone());
        } else if (fragment.y - reference_y).abs() <= tolerance {
            current.push(fragment.clone());
        } else {
            rows.push(Row::from_fragments(reference_y, std::mem::take(&mut current)));
            reference_y = fragment.y;
            current.push(fragment.clone());
        }
    }

    if !current.is_empty() {
        rows.push(Row::from_fragments(reference_y, current));
    }

    rows
}

/// Fold remark-only trailing rows into the row above them.
///
/// A row is a continuation when it is shorter than the row it follows, none
/// of its fragments parse as a date, shift or staff name, and at least one
/// fragment reads like a remark. Returns the kept rows and the number merged.
pub fn merge_continuation_rows(rows: Vec<Row>, fields: &FieldRecognizers) -> (Vec<Row>, usize) {
    let mut kept: Vec<Row> = Vec::with_capacity(rows.len());
    let mut merged = 0;

    for row in rows {
        let Some(previous) = kept.last_mut() else {
            kept.push(row);
            continue;
        };

        if is_continuation(&row, previous, fields) {
            tracing::debug!(
                target: ROSTER_LAYOUT,
                y = row.reference_y,
                into = previous.reference_y,
                text = %row.text(),
                "Merged continuation row"
            );
            previous.continuation.extend(row.fragments);
            merged += 1;
        } else {
            kept.push(row);
        }
    }

    (kept, merged)
}

fn is_continuation(row: &Row, previous: &Row, fields: &FieldRecognizers) -> bool {
    row.len() < previous.len()
        && row.texts().all(|text| !fields.is_field(text))
        && row.texts().any(looks_like_remark)
}

pub fn looks_like_remark(text: &str) -> bool {
    let text = text.trim();
    if !text.chars().any(char::is_alphabetic) {
        return false;
    }
    if text.chars().count() >= REMARK_MIN_CHARS {
        return true;
    }

    let lower = text.to_lowercase();
    lower
        .split(|c: char| !c.is_alphanumeric())
        .any(|word| REMARK_KEYWORDS.contains(&word))
}
