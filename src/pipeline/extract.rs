//! The highlight extractor: annotations in, ordered fragments out.
//!
//! For every selected page, each highlight annotation's corner list is split
//! into regions of four points. Each region's bounding rectangle clips the
//! page's text layer; the cleaned, trimmed region texts are joined with a
//! single space. Annotations that recover no text are dropped.
//!
//! The sort key is the top-left corner of the annotation's **first** region
//! only. A multi-line highlight whose later lines sit higher on the page
//! (e.g. one that wraps into the next column) is still anchored where the
//! reader started it. All fragments are then stably sorted by
//! `(page, top, left)`, so exact ties keep their encounter order.

use crate::config::ExtractionConfig;
use crate::error::HighlightError;
use crate::geometry::{quad_rects, Rect};
use crate::output::{ExtractionOutput, ExtractionStats, HighlightFragment};
use crate::pipeline::postprocess::{clean_region_text, join_regions};
use crate::pipeline::source::{HighlightAnnotation, HighlightDocument, HighlightPage};
use std::path::PathBuf;
use std::time::Instant;
use tracing::{debug, info, warn};

/// Scan `document` and return its highlights in reading order.
///
/// `source` is recorded in the output for reporting only.
pub fn extract_from_document<D: HighlightDocument>(
    document: &D,
    source: impl Into<PathBuf>,
    config: &ExtractionConfig,
) -> Result<ExtractionOutput, HighlightError> {
    let start = Instant::now();
    let total_pages = document.page_count();
    let page_indices = config.pages.to_indices(total_pages);

    let missing = config.pages.out_of_range(total_pages);
    if !missing.is_empty() {
        warn!(
            "Skipping pages {:?} (out of range, total={})",
            missing, total_pages
        );
    }

    if let Some(ref cb) = config.progress_callback {
        cb.on_extraction_start(page_indices.len());
    }

    let mut stats = ExtractionStats {
        total_pages,
        scanned_pages: page_indices.len(),
        ..ExtractionStats::default()
    };
    let mut fragments = Vec::new();

    for &idx in &page_indices {
        let page = document.page(idx)?;
        let annotations = page.highlight_annotations()?;
        stats.highlight_annotations += annotations.len();

        let before = fragments.len();
        for recovered in page_fragments(&page, idx, &annotations)? {
            match recovered {
                Some(fragment) => fragments.push(fragment),
                None => stats.discarded_empty += 1,
            }
        }
        let found = fragments.len() - before;

        if !annotations.is_empty() {
            debug!(
                "Page {}: {} highlight annotations, {} with text",
                idx + 1,
                annotations.len(),
                found
            );
        }

        if let Some(ref cb) = config.progress_callback {
            cb.on_page_scanned(idx + 1, total_pages, found);
        }
    }

    sort_reading_order(&mut fragments);

    stats.extracted = fragments.len();
    stats.duration_ms = start.elapsed().as_millis() as u64;

    info!(
        "Extracted {} highlights from {} pages ({} empty discarded) in {}ms",
        stats.extracted, stats.scanned_pages, stats.discarded_empty, stats.duration_ms
    );

    if let Some(ref cb) = config.progress_callback {
        cb.on_extraction_complete(stats.scanned_pages, stats.extracted);
    }

    Ok(ExtractionOutput {
        source: source.into(),
        fragments,
        stats,
    })
}

/// Recover the text of every annotation on one page, in annotation order.
///
/// All regions of the page are clipped in a single
/// [`HighlightPage::texts_in_rects`] call. An entry is `None` when its
/// annotation recovered no text.
pub fn page_fragments<P: HighlightPage>(
    page: &P,
    page_index: usize,
    annotations: &[HighlightAnnotation],
) -> Result<Vec<Option<HighlightFragment>>, HighlightError> {
    let regions: Vec<Vec<Rect>> = annotations
        .iter()
        .map(|a| quad_rects(&a.region_corners))
        .collect();
    let all_rects: Vec<Rect> = regions.iter().flatten().copied().collect();
    let mut texts = page.texts_in_rects(&all_rects)?.into_iter();

    Ok(regions
        .iter()
        .map(|rects| {
            let parts: Vec<String> = texts.by_ref().take(rects.len()).collect();
            fragment_from_regions(page_index, rects, parts)
        })
        .collect())
}

/// Build the fragment for one annotation from its regions and their texts.
///
/// Anchored on the first region's top-left corner.
pub fn fragment_from_regions(
    page_index: usize,
    rects: &[Rect],
    region_texts: Vec<String>,
) -> Option<HighlightFragment> {
    let Some(first) = rects.first() else {
        debug!(
            "Page {}: highlight without complete quad points skipped",
            page_index + 1
        );
        return None;
    };

    let text = join_regions(region_texts.iter().map(|t| clean_region_text(t)));
    let anchor = first.top_left();
    HighlightFragment::new(page_index, anchor.y, anchor.x, text)
}

/// Stable sort by page, then top edge, then left edge.
pub fn sort_reading_order(fragments: &mut [HighlightFragment]) {
    fragments.sort_by(|a, b| a.reading_order(b));
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geometry::Point;
    use std::cell::Cell;

    /// A page whose text layer is a list of labelled boxes.
    #[derive(Default)]
    struct BoxPage {
        highlights: Vec<HighlightAnnotation>,
        words: Vec<(Rect, &'static str)>,
        text_layer_loads: Cell<usize>,
    }

    impl BoxPage {
        fn with_words(words: Vec<(Rect, &'static str)>) -> Self {
            Self {
                words,
                ..Self::default()
            }
        }

        fn single(&self, annotation: HighlightAnnotation) -> Option<HighlightFragment> {
            page_fragments(self, 0, &[annotation]).unwrap().remove(0)
        }
    }

    impl HighlightPage for BoxPage {
        fn highlight_annotations(&self) -> Result<Vec<HighlightAnnotation>, HighlightError> {
            Ok(self.highlights.clone())
        }

        fn text_in_rect(&self, rect: &Rect) -> Result<String, HighlightError> {
            let hits: Vec<&str> = self
                .words
                .iter()
                .filter(|(r, _)| r.x0 >= rect.x0 && r.y0 >= rect.y0 && r.x1 <= rect.x1 && r.y1 <= rect.y1)
                .map(|(_, w)| *w)
                .collect();
            Ok(hits.join(" "))
        }

        fn texts_in_rects(&self, rects: &[Rect]) -> Result<Vec<String>, HighlightError> {
            self.text_layer_loads.set(self.text_layer_loads.get() + 1);
            rects.iter().map(|r| self.text_in_rect(r)).collect()
        }
    }

    fn quad(x0: f32, y0: f32, x1: f32, y1: f32) -> Vec<Point> {
        vec![
            Point::new(x0, y0),
            Point::new(x1, y0),
            Point::new(x0, y1),
            Point::new(x1, y1),
        ]
    }

    #[test]
    fn regions_are_trimmed_and_joined() {
        let page = BoxPage::with_words(vec![
            (Rect::new(10.0, 10.0, 50.0, 20.0), "  first\r\n"),
            (Rect::new(10.0, 30.0, 50.0, 40.0), "\tsecond "),
        ]);
        let mut corners = quad(0.0, 5.0, 100.0, 25.0);
        corners.extend(quad(0.0, 25.0, 100.0, 45.0));

        let f = page.single(HighlightAnnotation::new(corners)).unwrap();
        assert_eq!(f.text(), "first second");
        assert_eq!((f.left_x(), f.top_y()), (0.0, 5.0));
    }

    #[test]
    fn whitespace_only_highlight_is_discarded() {
        let page = BoxPage::with_words(vec![(Rect::new(10.0, 10.0, 50.0, 20.0), " \r\n ")]);
        let annotation = HighlightAnnotation::new(quad(0.0, 0.0, 100.0, 100.0));
        assert!(page.single(annotation).is_none());
    }

    #[test]
    fn annotation_without_quads_is_discarded() {
        let page = BoxPage::default();
        let annotation = HighlightAnnotation::new(vec![Point::new(1.0, 1.0)]);
        assert!(page.single(annotation).is_none());
    }

    #[test]
    fn sort_key_is_first_region_not_union() {
        // Second region sits above and left of the first.
        let page = BoxPage::with_words(vec![
            (Rect::new(300.0, 400.0, 350.0, 410.0), "start"),
            (Rect::new(20.0, 50.0, 80.0, 60.0), "end"),
        ]);
        let mut corners = quad(290.0, 395.0, 360.0, 415.0);
        corners.extend(quad(10.0, 45.0, 90.0, 65.0));

        let f = page.single(HighlightAnnotation::new(corners)).unwrap();
        assert_eq!(f.text(), "start end");
        assert_eq!(f.top_y(), 395.0);
        assert_eq!(f.left_x(), 290.0);
    }

    #[test]
    fn text_layer_is_read_once_per_page() {
        let page = BoxPage::with_words(vec![
            (Rect::new(10.0, 10.0, 50.0, 20.0), "one"),
            (Rect::new(10.0, 30.0, 50.0, 40.0), "two"),
            (Rect::new(10.0, 50.0, 50.0, 60.0), "three"),
        ]);
        let mut two_lines = quad(0.0, 25.0, 100.0, 45.0);
        two_lines.extend(quad(0.0, 45.0, 100.0, 65.0));
        let annotations = vec![
            HighlightAnnotation::new(quad(0.0, 5.0, 100.0, 25.0)),
            HighlightAnnotation::new(vec![Point::new(1.0, 1.0)]),
            HighlightAnnotation::new(two_lines),
        ];

        let found = page_fragments(&page, 4, &annotations).unwrap();
        assert_eq!(page.text_layer_loads.get(), 1);
        assert_eq!(found.len(), 3);
        assert_eq!(found[0].as_ref().unwrap().text(), "one");
        assert!(found[1].is_none());
        assert_eq!(found[2].as_ref().unwrap().text(), "two three");
        assert_eq!(found[2].as_ref().unwrap().page_index(), 4);
    }

    #[test]
    fn sort_is_stable_for_exact_ties() {
        let mut fragments = vec![
            HighlightFragment::new(0, 10.0, 10.0, "first seen").unwrap(),
            HighlightFragment::new(0, 5.0, 10.0, "above").unwrap(),
            HighlightFragment::new(0, 10.0, 10.0, "second seen").unwrap(),
        ];
        sort_reading_order(&mut fragments);
        let texts: Vec<&str> = fragments.iter().map(|f| f.text()).collect();
        assert_eq!(texts, ["above", "first seen", "second seen"]);
    }
}
