use serde::{Deserialize, Serialize};
use std::borrow::Cow;
use std::fmt;
use std::path::Path;

use crate::error::ImportError;

/// One positioned run of text extracted from a page.
///
/// Coordinates are page-local points with `y` growing downward, so a smaller
/// `y` is higher on the page.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TextFragment {
    pub text: String,
    pub x: f32,
    pub y: f32,
}

impl TextFragment {
    pub fn new(text: impl Into<String>, x: f32, y: f32) -> Self {
        Self {
            text: text.into(),
            x,
            y,
        }
    }

    /// False when either coordinate is NaN or infinite.
    pub fn has_finite_position(&self) -> bool {
        self.x.is_finite() && self.y.is_finite()
    }

    /// Euclidean distance between the origins of two fragments.
    pub fn distance_to(&self, other: &TextFragment) -> f32 {
        let dx = self.x - other.x;
        let dy = self.y - other.y;
        (dx * dx + dy * dy).sqrt()
    }
}

impl fmt::Display for TextFragment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "\"{}\" @ ({:.1}, {:.1})", self.text, self.x, self.y)
    }
}

/// All fragments of one page, in extraction order.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Page {
    /// One-based page number.
    pub number: u32,
    pub fragments: Vec<TextFragment>,
}

impl Page {
    pub fn new(number: u32, fragments: Vec<TextFragment>) -> Self {
        Self { number, fragments }
    }

    pub fn is_empty(&self) -> bool {
        self.fragments.is_empty()
    }

    /// The page without fragments that have no usable position, and how many
    /// were removed. Borrows when every fragment is usable.
    pub fn with_finite_positions(&self) -> (Cow<'_, Page>, usize) {
        let skipped = self
            .fragments
            .iter()
            .filter(|f| !f.has_finite_position())
            .count();
        if skipped == 0 {
            return (Cow::Borrowed(self), 0);
        }

        let fragments = self
            .fragments
            .iter()
            .filter(|f| f.has_finite_position())
            .cloned()
            .collect();
        (Cow::Owned(Page::new(self.number, fragments)), skipped)
    }

    /// Smallest `x` on the page, the left edge of the leftmost column band.
    pub fn min_x(&self) -> Option<f32> {
        self.fragments
            .iter()
            .map(|f| f.x)
            .fold(None, |acc, x| Some(acc.map_or(x, |m: f32| m.min(x))))
    }

    /// Read a fragment dump: a JSON array of pages, each an array of
    /// `{text, x, y}` objects. Pages are numbered in array order.
    pub fn from_json(json: &str) -> Result<Vec<Page>, ImportError> {
        let raw: Vec<Vec<TextFragment>> = serde_json::from_str(json)?;
        Ok(raw
            .into_iter()
            .enumerate()
            .map(|(i, fragments)| Page::new(i as u32 + 1, fragments))
            .collect())
    }

    pub fn from_json_file<P: AsRef<Path>>(path: P) -> Result<Vec<Page>, ImportError> {
        let json = std::fs::read_to_string(path)?;
        Self::from_json(&json)
    }
}
