use crate::fragment::Page;
use crate::interpret::{Interpretation, PageInterpreter};
use crate::logging::ROSTER_SELECT;
use crate::recognize::FieldRecognizers;
use crate::roster::RosterDraft;
use crate::trace::{PageTrace, StrategyScore};

/// Drafts kept for one page and how they were chosen.
#[derive(Debug, Clone)]
pub struct PageSelection {
    pub drafts: Vec<RosterDraft>,
    pub trace: PageTrace,
}

/// Run every interpreter on the page and keep the output with the strictly
/// highest number of complete drafts. Equal yields keep the earlier
/// interpreter, so order the slice by preference.
pub fn select_page(
    page: &Page,
    interpreters: &[Box<dyn PageInterpreter>],
    fields: &FieldRecognizers,
) -> PageSelection {
    let (usable, skipped_fragments) = page.with_finite_positions();
    if skipped_fragments > 0 {
        tracing::warn!(
            target: ROSTER_SELECT,
            page = page.number,
            skipped = skipped_fragments,
            "Ignoring fragments without a finite position"
        );
    }

    let mut scores = Vec::with_capacity(interpreters.len());
    let mut row_stats = None;
    let mut best: Option<(&'static str, usize, Interpretation)> = None;

    for interpreter in interpreters {
        let interpretation = interpreter.interpret(&usable, fields);
        let complete = interpretation.complete_count();
        scores.push(StrategyScore::of(interpreter.name(), &interpretation.drafts));
        if row_stats.is_none() {
            row_stats = interpretation.row_stats;
        }

        let better = best
            .as_ref()
            .map_or(true, |(_, best_complete, _)| complete > *best_complete);
        if better {
            best = Some((interpreter.name(), complete, interpretation));
        }
    }

    let (chosen, complete, interpretation) =
        best.unwrap_or(("none", 0, Interpretation::default()));

    tracing::debug!(
        target: ROSTER_SELECT,
        page = page.number,
        chosen,
        complete,
        scores = ?scores,
        "Selected page strategy"
    );

    let row_stats = row_stats.unwrap_or_default();
    PageSelection {
        drafts: interpretation.drafts,
        trace: PageTrace {
            page: page.number,
            fragments: page.fragments.len(),
            skipped_fragments,
            rows: row_stats.rows,
            header_rows: row_stats.header_rows,
            merged_rows: row_stats.merged_rows,
            scores,
            chosen,
        },
    }
}
