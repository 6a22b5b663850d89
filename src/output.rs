//! Result types produced by an extraction run.

use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use std::path::PathBuf;

/// Recovered text and position of one highlight annotation.
///
/// Position is the top-left corner of the annotation's *first* region, in
/// top-left-origin page space. Fields are read-only once constructed.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HighlightFragment {
    page_index: usize,
    top_y: f32,
    left_x: f32,
    text: String,
}

impl HighlightFragment {
    /// Returns `None` when `text` is empty.
    pub fn new(page_index: usize, top_y: f32, left_x: f32, text: impl Into<String>) -> Option<Self> {
        let text = text.into();
        if text.is_empty() {
            return None;
        }
        Some(Self {
            page_index,
            top_y,
            left_x,
            text,
        })
    }

    /// 0-indexed page the annotation sits on.
    pub fn page_index(&self) -> usize {
        self.page_index
    }

    /// 1-indexed page number, as printed in page markers.
    pub fn page_number(&self) -> usize {
        self.page_index + 1
    }

    pub fn top_y(&self) -> f32 {
        self.top_y
    }

    pub fn left_x(&self) -> f32 {
        self.left_x
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    /// Reading-order comparison: page, then top edge, then left edge.
    pub fn reading_order(&self, other: &Self) -> Ordering {
        self.page_index
            .cmp(&other.page_index)
            .then_with(|| self.top_y.total_cmp(&other.top_y))
            .then_with(|| self.left_x.total_cmp(&other.left_x))
    }
}

/// Counters collected while scanning a document.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExtractionStats {
    /// Pages in the document.
    pub total_pages: usize,
    /// Pages actually visited (after page selection).
    pub scanned_pages: usize,
    /// Highlight annotations encountered.
    pub highlight_annotations: usize,
    /// Annotations dropped because no text was recovered.
    pub discarded_empty: usize,
    /// Fragments in the final output.
    pub extracted: usize,
    /// Wall-clock time spent scanning. Not serialised, so reports of the
    /// same document are byte-identical across runs.
    #[serde(skip)]
    pub duration_ms: u64,
}

/// Everything an extraction run produces.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExtractionOutput {
    pub source: PathBuf,
    /// Fragments in reading order.
    pub fragments: Vec<HighlightFragment>,
    pub stats: ExtractionStats,
}

impl ExtractionOutput {
    /// `true` when the document had no extractable highlights.
    pub fn is_empty(&self) -> bool {
        self.fragments.is_empty()
    }

    pub fn len(&self) -> usize {
        self.fragments.len()
    }
}

/// Summary returned by [`crate::inspect`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DocumentInfo {
    pub page_count: usize,
    /// Highlight annotations across all pages, before text recovery.
    pub highlight_count: usize,
}
