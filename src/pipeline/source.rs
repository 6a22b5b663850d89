//! The PDF collaborator: documents, pages, highlight annotations and the
//! text layer.
//!
//! The extractor only needs four capabilities, expressed as two traits:
//!
//! * [`HighlightDocument`]: page count and page access
//! * [`HighlightPage`]: highlight annotations and clipped text
//!
//! [`PdfiumDocument`] implements them on top of `pdfium-render`. Tests and
//! library users can supply their own implementations to drive the
//! extractor without a PDF engine.
//!
//! All geometry crossing these traits is in top-left-origin page space
//! (see [`crate::geometry`]); the pdfium implementation flips the y axis at
//! the boundary.

use crate::error::HighlightError;
use crate::geometry::{Point, Rect};
use pdfium_render::prelude::*;
use std::path::{Path, PathBuf};
use tracing::{debug, info};

/// One highlight annotation as the collaborator reports it.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct HighlightAnnotation {
    /// Flat corner list, [`crate::geometry::POINTS_PER_QUAD`] points per
    /// highlighted region, in the order the annotation stores them.
    pub region_corners: Vec<Point>,
}

impl HighlightAnnotation {
    pub fn new(region_corners: Vec<Point>) -> Self {
        Self { region_corners }
    }
}

/// A page that can report highlights and the text under a rectangle.
pub trait HighlightPage {
    /// Annotations of highlight type only, in the page's annotation order.
    fn highlight_annotations(&self) -> Result<Vec<HighlightAnnotation>, HighlightError>;

    /// Text of the page's text layer that lies inside `rect`.
    fn text_in_rect(&self, rect: &Rect) -> Result<String, HighlightError>;

    /// Text inside each of `rects`, in the same order.
    ///
    /// The extractor asks for all regions of a page at once; implementations
    /// with an expensive text layer override this to load it a single time.
    fn texts_in_rects(&self, rects: &[Rect]) -> Result<Vec<String>, HighlightError> {
        rects.iter().map(|r| self.text_in_rect(r)).collect()
    }
}

/// An opened, read-only document.
///
/// Implementations release their underlying resources on drop.
pub trait HighlightDocument {
    type Page: HighlightPage;

    fn page_count(&self) -> usize;

    /// Load the page at 0-based `index`.
    fn page(&self, index: usize) -> Result<Self::Page, HighlightError>;
}

// ── pdfium implementation ────────────────────────────────────────────────

/// A document opened through pdfium.
///
/// Borrows the [`Pdfium`] binding; the native handle is closed when this
/// value is dropped.
pub struct PdfiumDocument<'a> {
    path: PathBuf,
    document: PdfDocument<'a>,
}

impl<'a> PdfiumDocument<'a> {
    /// Open `path`, mapping pdfium's failure modes onto open errors.
    pub fn open(
        pdfium: &'a Pdfium,
        path: &Path,
        password: Option<&'a str>,
    ) -> Result<Self, HighlightError> {
        let document = pdfium.load_pdf_from_file(path, password).map_err(|e| {
            let err_str = format!("{:?}", e);
            if err_str.contains("Password") || err_str.contains("password") {
                if password.is_some() {
                    HighlightError::WrongPassword {
                        path: path.to_path_buf(),
                    }
                } else {
                    HighlightError::PasswordRequired {
                        path: path.to_path_buf(),
                    }
                }
            } else {
                HighlightError::OpenFailed {
                    path: path.to_path_buf(),
                    detail: err_str,
                }
            }
        })?;

        info!("PDF loaded: {} ({} pages)", path.display(), document.pages().len());

        Ok(Self {
            path: path.to_path_buf(),
            document,
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl Drop for PdfiumDocument<'_> {
    fn drop(&mut self) {
        debug!("Closing PDF: {}", self.path.display());
    }
}

impl<'a> HighlightDocument for PdfiumDocument<'a> {
    type Page = PdfiumPage<'a>;

    fn page_count(&self) -> usize {
        self.document.pages().len() as usize
    }

    fn page(&self, index: usize) -> Result<PdfiumPage<'a>, HighlightError> {
        let total = self.page_count();
        if index >= total {
            return Err(HighlightError::PageAccess {
                page: index + 1,
                detail: format!("out of range (document has {total} pages)"),
            });
        }

        let page = self
            .document
            .pages()
            .get(index as u16)
            .map_err(|e| HighlightError::PageAccess {
                page: index + 1,
                detail: format!("{:?}", e),
            })?;

        Ok(PdfiumPage {
            height: page.height().value,
            index,
            page,
        })
    }
}

/// A loaded pdfium page plus its height for y-axis flipping.
pub struct PdfiumPage<'a> {
    page: PdfPage<'a>,
    height: f32,
    index: usize,
}

impl PdfiumPage<'_> {
    fn page_access(&self, e: PdfiumError) -> HighlightError {
        HighlightError::PageAccess {
            page: self.index + 1,
            detail: format!("{:?}", e),
        }
    }

    /// Corners of a quad's bounding box, converted to top-left-origin space.
    fn quad_corners(&self, quad: &PdfQuadPoints) -> [Point; 4] {
        let bbox = to_top_left(
            self.height,
            quad.left().value,
            quad.top().value,
            quad.right().value,
            quad.bottom().value,
        );
        [
            Point::new(bbox.x0, bbox.y0),
            Point::new(bbox.x1, bbox.y0),
            Point::new(bbox.x0, bbox.y1),
            Point::new(bbox.x1, bbox.y1),
        ]
    }

    fn clip(text: &PdfPageText<'_>, height: f32, rect: &Rect) -> String {
        let (bottom, left, top, right) = to_pdf_rect(height, rect);
        text.inside_rect(PdfRect::new_from_values(bottom, left, top, right))
    }
}

impl HighlightPage for PdfiumPage<'_> {
    fn highlight_annotations(&self) -> Result<Vec<HighlightAnnotation>, HighlightError> {
        let highlights = self
            .page
            .annotations()
            .iter()
            .filter(|a| matches!(a.annotation_type(), PdfPageAnnotationType::Highlight))
            .map(|a| {
                let corners = a
                    .attachment_points()
                    .iter()
                    .flat_map(|quad| self.quad_corners(&quad))
                    .collect();
                HighlightAnnotation::new(corners)
            })
            .collect();
        Ok(highlights)
    }

    fn text_in_rect(&self, rect: &Rect) -> Result<String, HighlightError> {
        let text = self.page.text().map_err(|e| self.page_access(e))?;
        Ok(Self::clip(&text, self.height, rect))
    }

    fn texts_in_rects(&self, rects: &[Rect]) -> Result<Vec<String>, HighlightError> {
        if rects.is_empty() {
            return Ok(Vec::new());
        }
        let text = self.page.text().map_err(|e| self.page_access(e))?;
        Ok(rects
            .iter()
            .map(|rect| Self::clip(&text, self.height, rect))
            .collect())
    }
}

// ── Coordinate conversion ────────────────────────────────────────────────

/// Convert a PDF-space box (bottom-left origin) on a page of `height`
/// points into a top-left-origin [`Rect`].
pub fn to_top_left(height: f32, left: f32, top: f32, right: f32, bottom: f32) -> Rect {
    Rect::new(left, height - top, right, height - bottom)
}

/// Inverse of [`to_top_left`]: `(bottom, left, top, right)` in PDF space.
pub fn to_pdf_rect(height: f32, rect: &Rect) -> (f32, f32, f32, f32) {
    (height - rect.y1, rect.x0, height - rect.y0, rect.x1)
}

#[cfg(test)]
mod tests {
    use super::*;

    const LETTER_HEIGHT: f32 = 792.0;

    #[test]
    fn higher_on_page_sorts_first() {
        let headline = to_top_left(LETTER_HEIGHT, 72.0, 720.0, 300.0, 700.0);
        let footer = to_top_left(LETTER_HEIGHT, 72.0, 60.0, 300.0, 40.0);
        assert_eq!(headline.y0, 72.0);
        assert_eq!(footer.y0, 732.0);
        assert!(headline.y0 < footer.y0);
        assert!(headline.height() > 0.0);
    }

    #[test]
    fn x_axis_is_unchanged() {
        let r = to_top_left(LETTER_HEIGHT, 10.0, 500.0, 250.0, 480.0);
        assert_eq!((r.x0, r.x1), (10.0, 250.0));
        assert_eq!(r.width(), 240.0);
    }

    #[test]
    fn pdf_rect_round_trips() {
        let (left, top, right, bottom) = (56.5, 612.25, 410.0, 598.0);
        let rect = to_top_left(LETTER_HEIGHT, left, top, right, bottom);
        assert_eq!(to_pdf_rect(LETTER_HEIGHT, &rect), (bottom, left, top, right));
    }

    #[test]
    fn default_batch_lookup_preserves_order() {
        struct Echo;
        impl HighlightPage for Echo {
            fn highlight_annotations(&self) -> Result<Vec<HighlightAnnotation>, HighlightError> {
                Ok(vec![])
            }
            fn text_in_rect(&self, rect: &Rect) -> Result<String, HighlightError> {
                Ok(format!("{}", rect.x0))
            }
        }

        let rects = [Rect::new(3.0, 0.0, 4.0, 1.0), Rect::new(1.0, 0.0, 2.0, 1.0)];
        assert_eq!(Echo.texts_in_rects(&rects).unwrap(), vec!["3", "1"]);
    }

    #[test]
    fn pdfium_document_borrows_binding_and_password() {
        fn assert_document<D: HighlightDocument>() {}
        assert_document::<PdfiumDocument<'static>>();

        type Open = fn(&'static Pdfium, &Path, Option<&'static str>) -> Result<PdfiumDocument<'static>, HighlightError>;
        let _open: Open = PdfiumDocument::open;
    }
}
