//! Letterbox placement of a source image inside a display viewport.
//!
//! The placement rectangle is where the image is actually drawn: the
//! largest aspect-preserving rectangle that fits the viewport, centered
//! on the axis with slack. All viewport-to-pixel coordinate mapping goes
//! through it, so it must be recomputed on every layout pass — a stale
//! placement silently produces wrong extraction coordinates.

use crate::types::{Dimensions, Point, Rect};

/// The letterboxed rectangle, in viewport coordinates, where the source
/// image is drawn, together with the native pixel dimensions it maps to.
///
/// Constructible only through [`ImagePlacement::compute`], which refuses
/// degenerate input, so a held placement always has positive extent and
/// mapping never divides by zero.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ImagePlacement {
    rect: Rect,
    native: Dimensions,
    scale: f64,
}

impl ImagePlacement {
    /// Letterbox a source image into a viewport.
    ///
    /// Compares aspect ratios: an image wider (relative to its height)
    /// than the viewport fits the viewport width and centers vertically;
    /// otherwise it fits the height and centers horizontally.
    ///
    /// Returns `None` when the viewport has non-positive extent or the
    /// image has a zero dimension.
    #[must_use]
    pub fn compute(viewport: Rect, native: Dimensions) -> Option<Self> {
        if native.is_empty() || viewport.width <= 0.0 || viewport.height <= 0.0 {
            return None;
        }

        let image_width = f64::from(native.width);
        let image_height = f64::from(native.height);
        let viewport_aspect = viewport.width / viewport.height;
        let image_aspect = image_width / image_height;

        let (scale, origin_x, origin_y) = if image_aspect > viewport_aspect {
            let scale = viewport.width / image_width;
            let slack = viewport.height - image_height * scale;
            (scale, viewport.x, viewport.y + slack / 2.0)
        } else {
            let scale = viewport.height / image_height;
            let slack = viewport.width - image_width * scale;
            (scale, viewport.x + slack / 2.0, viewport.y)
        };

        Some(Self {
            rect: Rect::new(origin_x, origin_y, image_width * scale, image_height * scale),
            native,
            scale,
        })
    }

    /// The placement rectangle in viewport coordinates.
    #[must_use]
    pub const fn rect(&self) -> Rect {
        self.rect
    }

    /// Native pixel dimensions of the placed image.
    #[must_use]
    pub const fn native(&self) -> Dimensions {
        self.native
    }

    /// Uniform scale factor from native pixels to viewport units.
    #[must_use]
    pub const fn scale(&self) -> f64 {
        self.scale
    }

    /// Map a viewport-space point to source pixel coordinates.
    ///
    /// Points outside the placement rectangle map outside
    /// `[0, native]`; corner clamping upstream keeps committed corners
    /// inside.
    #[must_use]
    pub fn to_pixel_space(&self, p: Point) -> Point {
        let normalized_x = (p.x - self.rect.x) / self.rect.width;
        let normalized_y = (p.y - self.rect.y) / self.rect.height;
        Point::new(
            normalized_x * f64::from(self.native.width),
            normalized_y * f64::from(self.native.height),
        )
    }

    /// Map a source-pixel point back to viewport coordinates.
    ///
    /// Exact inverse of [`Self::to_pixel_space`].
    #[must_use]
    pub fn to_viewport_space(&self, pixel: Point) -> Point {
        let normalized_x = pixel.x / f64::from(self.native.width);
        let normalized_y = pixel.y / f64::from(self.native.height);
        Point::new(
            normalized_x.mul_add(self.rect.width, self.rect.x),
            normalized_y.mul_add(self.rect.height, self.rect.y),
        )
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    const EPSILON: f64 = 1e-9;

    fn assert_close(actual: f64, expected: f64) {
        assert!(
            (actual - expected).abs() < EPSILON,
            "expected {expected}, got {actual}"
        );
    }

    #[test]
    fn wide_image_fits_width_and_centers_vertically() {
        let viewport = Rect::new(0.0, 0.0, 400.0, 800.0);
        let placement = ImagePlacement::compute(viewport, Dimensions::new(800, 400)).unwrap();

        let rect = placement.rect();
        assert_close(rect.x, 0.0);
        assert_close(rect.y, 300.0);
        assert_close(rect.width, 400.0);
        assert_close(rect.height, 200.0);
        assert_close(placement.scale(), 0.5);
    }

    #[test]
    fn tall_image_fits_height_and_centers_horizontally() {
        let viewport = Rect::new(0.0, 0.0, 800.0, 400.0);
        let placement = ImagePlacement::compute(viewport, Dimensions::new(100, 400)).unwrap();

        let rect = placement.rect();
        assert_close(rect.y, 0.0);
        assert_close(rect.height, 400.0);
        assert_close(rect.width, 100.0);
        assert_centered(rect, viewport);
    }

    fn assert_centered(rect: Rect, viewport: Rect) {
        assert_close(
            rect.x + rect.width / 2.0,
            viewport.x + viewport.width / 2.0,
        );
        assert_close(
            rect.y + rect.height / 2.0,
            viewport.y + viewport.height / 2.0,
        );
    }

    #[test]
    fn placement_is_contained_centered_and_aspect_preserving() {
        let cases = [
            (Rect::new(0.0, 0.0, 400.0, 800.0), Dimensions::new(800, 400)),
            (Rect::new(0.0, 0.0, 400.0, 800.0), Dimensions::new(400, 800)),
            (Rect::new(0.0, 0.0, 1024.0, 768.0), Dimensions::new(333, 777)),
            (Rect::new(50.0, 25.0, 640.0, 480.0), Dimensions::new(1920, 1080)),
            (Rect::new(-10.0, -20.0, 300.0, 300.0), Dimensions::new(7, 13)),
            (Rect::new(0.0, 0.0, 100.0, 100.0), Dimensions::new(1, 1)),
        ];

        for (viewport, native) in cases {
            let placement = ImagePlacement::compute(viewport, native).unwrap();
            let rect = placement.rect();

            // Contained in the viewport.
            assert!(rect.min_x() >= viewport.min_x() - EPSILON);
            assert!(rect.min_y() >= viewport.min_y() - EPSILON);
            assert!(rect.max_x() <= viewport.max_x() + EPSILON);
            assert!(rect.max_y() <= viewport.max_y() + EPSILON);

            // Aspect ratio preserved.
            let image_aspect = f64::from(native.width) / f64::from(native.height);
            let rect_aspect = rect.width / rect.height;
            assert!(
                (rect_aspect - image_aspect).abs() < 1e-6,
                "aspect drift for {viewport:?} / {native:?}"
            );

            // Centered on both axes (the fitted axis trivially so).
            assert_centered(rect, viewport);
        }
    }

    #[test]
    fn exact_fit_has_no_slack() {
        let viewport = Rect::new(0.0, 0.0, 200.0, 100.0);
        let placement = ImagePlacement::compute(viewport, Dimensions::new(400, 200)).unwrap();
        assert_eq!(placement.rect(), viewport);
    }

    #[test]
    fn degenerate_inputs_yield_none() {
        let viewport = Rect::new(0.0, 0.0, 400.0, 800.0);
        assert!(ImagePlacement::compute(viewport, Dimensions::new(0, 100)).is_none());
        assert!(ImagePlacement::compute(viewport, Dimensions::new(100, 0)).is_none());

        let native = Dimensions::new(100, 100);
        assert!(ImagePlacement::compute(Rect::new(0.0, 0.0, 0.0, 800.0), native).is_none());
        assert!(ImagePlacement::compute(Rect::new(0.0, 0.0, 400.0, -1.0), native).is_none());
    }

    #[test]
    fn round_trip_maps_points_back_within_epsilon() {
        let viewport = Rect::new(12.0, 34.0, 630.0, 470.0);
        let placement = ImagePlacement::compute(viewport, Dimensions::new(1237, 845)).unwrap();
        let rect = placement.rect();

        for i in 0..=10 {
            for j in 0..=10 {
                let p = Point::new(
                    rect.x + rect.width * f64::from(i) / 10.0,
                    rect.y + rect.height * f64::from(j) / 10.0,
                );
                let back = placement.to_viewport_space(placement.to_pixel_space(p));
                assert!(back.distance(p) < 1e-9, "round trip drifted at {p:?}");
            }
        }
    }

    #[test]
    fn placement_corners_map_to_native_raster_corners() {
        let viewport = Rect::new(0.0, 0.0, 400.0, 800.0);
        let native = Dimensions::new(800, 400);
        let placement = ImagePlacement::compute(viewport, native).unwrap();

        let [tl, tr, br, bl] = placement.rect().corners();
        assert_close(placement.to_pixel_space(tl).x, 0.0);
        assert_close(placement.to_pixel_space(tl).y, 0.0);
        assert_close(placement.to_pixel_space(tr).x, 800.0);
        assert_close(placement.to_pixel_space(tr).y, 0.0);
        assert_close(placement.to_pixel_space(br).x, 800.0);
        assert_close(placement.to_pixel_space(br).y, 400.0);
        assert_close(placement.to_pixel_space(bl).x, 0.0);
        assert_close(placement.to_pixel_space(bl).y, 400.0);
    }

    #[test]
    fn points_outside_placement_map_outside_native_bounds() {
        let viewport = Rect::new(0.0, 0.0, 400.0, 800.0);
        let placement = ImagePlacement::compute(viewport, Dimensions::new(800, 400)).unwrap();

        // Above the letterboxed rectangle (y < 300).
        let above = placement.to_pixel_space(Point::new(200.0, 0.0));
        assert!(above.y < 0.0);
    }
}
