//! Shared types for the kirinuki crop geometry engine.

use serde::{Deserialize, Serialize};

/// Re-export `RgbaImage` so downstream crates can reference raster data
/// without depending on `image` directly.
pub use image::RgbaImage;

/// A 2D point, in viewport or pixel coordinates depending on context.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Point {
    /// Horizontal position (from left edge).
    pub x: f64,
    /// Vertical position (from top edge).
    pub y: f64,
}

impl Point {
    /// Create a new point.
    #[must_use]
    pub const fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    /// Midpoint between this point and another.
    #[must_use]
    pub fn midpoint(self, other: Self) -> Self {
        Self::new((self.x + other.x) / 2.0, (self.y + other.y) / 2.0)
    }

    /// Squared Euclidean distance to another point.
    ///
    /// Avoids the square root for comparison purposes.
    #[must_use]
    pub fn distance_squared(self, other: Self) -> f64 {
        let dx = self.x - other.x;
        let dy = self.y - other.y;
        dx.mul_add(dx, dy * dy)
    }

    /// Euclidean distance to another point.
    #[must_use]
    pub fn distance(self, other: Self) -> f64 {
        self.distance_squared(other).sqrt()
    }
}

/// An axis-aligned rectangle in viewport coordinates.
///
/// Used both for the display viewport itself and for the letterboxed
/// placement rectangle inside it.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Rect {
    /// Left edge.
    pub x: f64,
    /// Top edge.
    pub y: f64,
    /// Width (may be zero for a degenerate rectangle).
    pub width: f64,
    /// Height (may be zero for a degenerate rectangle).
    pub height: f64,
}

impl Rect {
    /// Create a new rectangle from its top-left corner and size.
    #[must_use]
    pub const fn new(x: f64, y: f64, width: f64, height: f64) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    /// Left edge.
    #[must_use]
    pub const fn min_x(&self) -> f64 {
        self.x
    }

    /// Top edge.
    #[must_use]
    pub const fn min_y(&self) -> f64 {
        self.y
    }

    /// Right edge.
    #[must_use]
    pub fn max_x(&self) -> f64 {
        self.x + self.width
    }

    /// Bottom edge.
    #[must_use]
    pub fn max_y(&self) -> f64 {
        self.y + self.height
    }

    /// Returns `true` if the point lies inside the rectangle
    /// (edges inclusive).
    #[must_use]
    pub fn contains(&self, p: Point) -> bool {
        p.x >= self.min_x() && p.x <= self.max_x() && p.y >= self.min_y() && p.y <= self.max_y()
    }

    /// The four corners in clockwise order: top-left, top-right,
    /// bottom-right, bottom-left.
    #[must_use]
    pub fn corners(&self) -> [Point; 4] {
        [
            Point::new(self.min_x(), self.min_y()),
            Point::new(self.max_x(), self.min_y()),
            Point::new(self.max_x(), self.max_y()),
            Point::new(self.min_x(), self.max_y()),
        ]
    }
}

/// Image dimensions in pixels.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Dimensions {
    /// Width in pixels.
    pub width: u32,
    /// Height in pixels.
    pub height: u32,
}

impl Dimensions {
    /// Create new dimensions.
    #[must_use]
    pub const fn new(width: u32, height: u32) -> Self {
        Self { width, height }
    }

    /// Returns `true` if either dimension is zero.
    #[must_use]
    pub const fn is_empty(self) -> bool {
        self.width == 0 || self.height == 0
    }

    /// Dimensions of a raster.
    #[must_use]
    pub fn of(image: &RgbaImage) -> Self {
        Self::new(image.width(), image.height())
    }
}

/// Configuration for a cropping session.
///
/// All parameters have defaults matching the interactive editor's
/// behavior: corners clamp one pixel inside the placement edge during
/// drags, outputs under 10 KiB encoded are rejected as likely empty,
/// and the magnifier shows an unzoomed 80x80 pixel neighborhood
/// floating 100 units above the pointer.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CropConfig {
    /// Safe-area inset, in viewport units, applied when clamping corner
    /// drags to the placement rectangle. Keeps committed corners off the
    /// exact boundary.
    pub corner_inset: f64,

    /// Minimum encoded output size in KiB. Extractions that encode
    /// smaller than this are rejected as having captured negligible
    /// content.
    pub min_output_kilobytes: usize,

    /// Magnifier preview raster size in pixels.
    pub magnifier_size: Dimensions,

    /// Magnifier zoom factor. The crop window in source pixels is the
    /// preview size divided by this.
    pub magnifier_zoom: f64,

    /// Vertical offset, in viewport units, keeping the magnifier above
    /// the dragged corner.
    pub magnifier_lift: f64,
}

impl Default for CropConfig {
    fn default() -> Self {
        Self {
            corner_inset: 1.0,
            min_output_kilobytes: 10,
            magnifier_size: Dimensions::new(80, 80),
            magnifier_zoom: 1.0,
            magnifier_lift: 100.0,
        }
    }
}

/// Errors that can occur during polygon extraction.
#[derive(Debug, thiserror::Error)]
pub enum ExtractError {
    /// The source image has no pixels.
    #[error("source image has no pixels")]
    EmptySource,

    /// An output canvas of the source's dimensions could not be allocated.
    #[error("could not allocate a {width}x{height} output canvas")]
    Canvas {
        /// Requested canvas width.
        width: u32,
        /// Requested canvas height.
        height: u32,
    },

    /// PNG encoding of the output raster failed.
    #[error("failed to encode output: {0}")]
    Encode(#[from] image::ImageError),
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    // --- Point tests ---

    #[test]
    fn point_new() {
        let p = Point::new(3.0, 4.0);
        assert!((p.x - 3.0).abs() < f64::EPSILON);
        assert!((p.y - 4.0).abs() < f64::EPSILON);
    }

    #[test]
    fn point_midpoint() {
        let m = Point::new(0.0, 2.0).midpoint(Point::new(4.0, 6.0));
        assert_eq!(m, Point::new(2.0, 4.0));
    }

    #[test]
    fn point_distance() {
        let a = Point::new(0.0, 0.0);
        let b = Point::new(3.0, 4.0);
        assert!((a.distance_squared(b) - 25.0).abs() < f64::EPSILON);
        assert!((a.distance(b) - 5.0).abs() < f64::EPSILON);
    }

    // --- Rect tests ---

    #[test]
    fn rect_edges() {
        let r = Rect::new(10.0, 20.0, 30.0, 40.0);
        assert!((r.min_x() - 10.0).abs() < f64::EPSILON);
        assert!((r.min_y() - 20.0).abs() < f64::EPSILON);
        assert!((r.max_x() - 40.0).abs() < f64::EPSILON);
        assert!((r.max_y() - 60.0).abs() < f64::EPSILON);
    }

    #[test]
    fn rect_contains_interior_and_edges() {
        let r = Rect::new(0.0, 0.0, 10.0, 10.0);
        assert!(r.contains(Point::new(5.0, 5.0)));
        assert!(r.contains(Point::new(0.0, 0.0)));
        assert!(r.contains(Point::new(10.0, 10.0)));
        assert!(!r.contains(Point::new(10.1, 5.0)));
        assert!(!r.contains(Point::new(5.0, -0.1)));
    }

    #[test]
    fn rect_corners_are_clockwise_from_top_left() {
        let r = Rect::new(1.0, 2.0, 3.0, 4.0);
        let [tl, tr, br, bl] = r.corners();
        assert_eq!(tl, Point::new(1.0, 2.0));
        assert_eq!(tr, Point::new(4.0, 2.0));
        assert_eq!(br, Point::new(4.0, 6.0));
        assert_eq!(bl, Point::new(1.0, 6.0));
    }

    // --- Dimensions tests ---

    #[test]
    fn dimensions_empty_when_either_axis_is_zero() {
        assert!(Dimensions::new(0, 10).is_empty());
        assert!(Dimensions::new(10, 0).is_empty());
        assert!(!Dimensions::new(1, 1).is_empty());
    }

    #[test]
    fn dimensions_of_raster() {
        let image = RgbaImage::new(7, 5);
        assert_eq!(Dimensions::of(&image), Dimensions::new(7, 5));
    }

    // --- CropConfig tests ---

    #[test]
    fn config_defaults() {
        let config = CropConfig::default();
        assert!((config.corner_inset - 1.0).abs() < f64::EPSILON);
        assert_eq!(config.min_output_kilobytes, 10);
        assert_eq!(config.magnifier_size, Dimensions::new(80, 80));
        assert!((config.magnifier_zoom - 1.0).abs() < f64::EPSILON);
        assert!((config.magnifier_lift - 100.0).abs() < f64::EPSILON);
    }

    #[test]
    fn config_serde_round_trip() {
        let config = CropConfig::default();
        let json = serde_json::to_string(&config).unwrap();
        let back: CropConfig = serde_json::from_str(&json).unwrap();
        assert_eq!(back, config);
    }

    #[test]
    fn rect_serde_round_trip() {
        let r = Rect::new(1.5, 2.5, 3.5, 4.5);
        let json = serde_json::to_string(&r).unwrap();
        let back: Rect = serde_json::from_str(&json).unwrap();
        assert_eq!(back, r);
    }
}
