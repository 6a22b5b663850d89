//! Page-space geometry for highlight regions.
//!
//! All coordinates here use a top-left origin with `y` growing downwards,
//! the orientation a reader scans a page in. The pdfium backend converts
//! from PDF user space (bottom-left origin) at the boundary.

use serde::{Deserialize, Serialize};

/// Number of corner points describing one highlighted region.
pub const POINTS_PER_QUAD: usize = 4;

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Point {
    pub x: f32,
    pub y: f32,
}

impl Point {
    pub const fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }
}

/// Axis-aligned rectangle; `(x0, y0)` is the top-left corner.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Rect {
    pub x0: f32,
    pub y0: f32,
    pub x1: f32,
    pub y1: f32,
}

impl Rect {
    pub const fn new(x0: f32, y0: f32, x1: f32, y1: f32) -> Self {
        Self { x0, y0, x1, y1 }
    }

    /// Smallest rectangle containing every point, or `None` for no points.
    pub fn bounding(points: &[Point]) -> Option<Rect> {
        let (first, rest) = points.split_first()?;
        let init = Rect::new(first.x, first.y, first.x, first.y);
        Some(rest.iter().fold(init, |r, p| {
            Rect::new(r.x0.min(p.x), r.y0.min(p.y), r.x1.max(p.x), r.y1.max(p.y))
        }))
    }

    /// The top-left corner `(x0, y0)`.
    pub fn top_left(&self) -> Point {
        Point::new(self.x0, self.y0)
    }

    pub fn width(&self) -> f32 {
        self.x1 - self.x0
    }

    pub fn height(&self) -> f32 {
        self.y1 - self.y0
    }
}

/// Split a flat corner sequence into per-region bounding rectangles.
///
/// Every group of [`POINTS_PER_QUAD`] points is one region. A trailing group
/// with fewer points is incomplete and ignored.
pub fn quad_rects(corners: &[Point]) -> Vec<Rect> {
    corners
        .chunks_exact(POINTS_PER_QUAD)
        .filter_map(Rect::bounding)
        .collect()
}
