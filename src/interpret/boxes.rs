use ordered_float::OrderedFloat;
use rstar::{RTree, RTreeObject, AABB};

use crate::config::{
    ImportConfig, DEFAULT_DATE_SEARCH_DX, DEFAULT_SHIFT_COLUMN_BAND, DEFAULT_SHIFT_SEARCH_DY,
};
use crate::fragment::{Page, TextFragment};
use crate::interpret::{Interpretation, PageInterpreter};
use crate::logging::ROSTER_BOX;
use crate::recognize::FieldRecognizers;
use crate::roster::{DraftOrigin, DraftSource, RosterDraft};

pub const BOX_STRATEGY: &str = "box";

// Wrapper so fragment origins can live in an R-tree
#[derive(Debug, Clone, Copy)]
struct SpatialFragment {
    index: usize,
    point: [f32; 2],
}

impl RTreeObject for SpatialFragment {
    type Envelope = AABB<[f32; 2]>;

    fn envelope(&self) -> Self::Envelope {
        AABB::from_point(self.point)
    }
}

/// Anchors on every staff name and looks around it: up the same column for
/// the date, across in the leftmost column band for the shift.
///
/// Tolerates tables whose columns do not line up, at the cost of missing
/// entries whose date or shift sit outside the search windows.
#[derive(Debug, Clone)]
pub struct BoxInterpreter {
    pub date_search_dx: f32,
    pub shift_column_band: f32,
    pub shift_search_dy: f32,
}

impl Default for BoxInterpreter {
    fn default() -> Self {
        Self {
            date_search_dx: DEFAULT_DATE_SEARCH_DX,
            shift_column_band: DEFAULT_SHIFT_COLUMN_BAND,
            shift_search_dy: DEFAULT_SHIFT_SEARCH_DY,
        }
    }
}

impl BoxInterpreter {
    pub fn from_config(config: &ImportConfig) -> Self {
        Self {
            date_search_dx: config.date_search_dx,
            shift_column_band: config.shift_column_band,
            shift_search_dy: config.shift_search_dy,
        }
    }
}

impl PageInterpreter for BoxInterpreter {
    fn name(&self) -> &'static str {
        BOX_STRATEGY
    }

    fn interpret(&self, page: &Page, fields: &FieldRecognizers) -> Interpretation {
        let Some(min_x) = page.min_x() else {
            return Interpretation::default();
        };

        let index = PageIndex::new(&page.fragments);
        let mut drafts = Vec::new();

        for (anchor_index, anchor) in page.fragments.iter().enumerate() {
            let Some(staff_name) = fields.staff(&anchor.text) else {
                continue;
            };

            let date_window = AABB::from_corners(
                [anchor.x - self.date_search_dx, f32::MIN],
                [anchor.x + self.date_search_dx, anchor.y],
            );
            let date = index
                .nearest(anchor, date_window, |f| f.y < anchor.y, |f| fields.date(&f.text));

            let shift_window = AABB::from_corners(
                [min_x, anchor.y - self.shift_search_dy],
                [min_x + self.shift_column_band, anchor.y + self.shift_search_dy],
            );
            let shift = index
                .nearest(anchor, shift_window, |_| true, |f| fields.shift(&f.text));

            let mut draft = RosterDraft::new(DraftSource {
                page: page.number,
                strategy: BOX_STRATEGY,
                origin: DraftOrigin::Anchor {
                    index: anchor_index,
                    x: anchor.x,
                    y: anchor.y,
                },
                text: anchor.text.trim().to_string(),
            });
            draft.date = date;
            draft.shift_type = shift;
            draft.staff_name = Some(staff_name.to_string());

            if !draft.is_complete() {
                tracing::debug!(
                    target: ROSTER_BOX,
                    page = page.number,
                    anchor = %anchor,
                    missing = ?draft.missing_fields(),
                    "Anchor window incomplete"
                );
            }

            drafts.push(draft);
        }

        Interpretation {
            drafts,
            row_stats: None,
        }
    }
}

struct PageIndex<'a> {
    fragments: &'a [TextFragment],
    tree: RTree<SpatialFragment>,
}

impl<'a> PageIndex<'a> {
    fn new(fragments: &'a [TextFragment]) -> Self {
        let points = fragments
            .iter()
            .enumerate()
            .map(|(index, f)| SpatialFragment {
                index,
                point: [f.x, f.y],
            })
            .collect();

        Self {
            fragments,
            tree: RTree::bulk_load(points),
        }
    }

    /// Nearest fragment inside `window` that passes `keep` and that
    /// `recognize` accepts. Ties go to the fragment extracted first.
    fn nearest<T>(
        &self,
        origin: &TextFragment,
        window: AABB<[f32; 2]>,
        keep: impl Fn(&TextFragment) -> bool,
        recognize: impl Fn(&TextFragment) -> Option<T>,
    ) -> Option<T> {
        let mut candidates: Vec<(OrderedFloat<f32>, usize)> = self
            .tree
            .locate_in_envelope(&window)
            .map(|s| (OrderedFloat(origin.distance_to(&self.fragments[s.index])), s.index))
            .filter(|(_, i)| keep(&self.fragments[*i]))
            .collect();
        candidates.sort();

        candidates
            .into_iter()
            .find_map(|(_, i)| recognize(&self.fragments[i]))
    }
}
