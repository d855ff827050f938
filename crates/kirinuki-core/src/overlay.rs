//! Overlay geometry for the render host.
//!
//! Everything inside the letterboxed image but outside the crop
//! polygon is dimmed, and the polygon itself is stroked. The dim mask
//! is an even-odd fill of the frame rectangle plus the polygon; render
//! hosts that only fill convex shapes reproduce it by dimming the
//! whole frame and repainting undimmed image content over the two
//! triangles of [`triangulate`], which tile the polygon exactly.

use crate::placement::ImagePlacement;
use crate::quad::{Corner, Quadrilateral};
use crate::types::{Point, Rect};

/// Stroke width of the crop outline, in viewport units.
pub const OUTLINE_WIDTH: f64 = 2.0;

/// Opacity of the black dim layer over the excluded image area.
pub const DIM_OPACITY: f64 = 0.7;

/// Per-frame overlay geometry, recomputed after every edit.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Overlay {
    /// The letterboxed image rectangle; the host dims all of it.
    pub frame: Rect,
    /// The closed crop outline, clockwise from top-left.
    pub outline: [Point; 4],
    /// Two corner triples tiling the crop polygon. The host repaints
    /// undimmed image content over them, leaving only the excluded
    /// area dark.
    pub window: [[Corner; 3]; 2],
}

/// Overlay geometry for the current crop polygon and placement.
#[must_use]
pub fn compute(quad: &Quadrilateral, placement: &ImagePlacement) -> Overlay {
    Overlay {
        frame: placement.rect(),
        outline: quad.points(),
        window: triangulate(quad),
    }
}

/// Split the crop polygon along its internal diagonal.
///
/// The axis ordering keeps the polygon simple but not necessarily
/// convex; a dragged-in corner can form a dart. One of the two
/// diagonals always lies inside, and top-left to bottom-right is
/// internal exactly when the other two corners sit on opposite sides
/// of it.
#[must_use]
pub fn triangulate(quad: &Quadrilateral) -> [[Corner; 3]; 2] {
    let [tl, tr, br, bl] = quad.points();
    let side_tr = cross(tl, br, tr);
    let side_bl = cross(tl, br, bl);

    if side_tr * side_bl <= 0.0 {
        [
            [Corner::TopLeft, Corner::TopRight, Corner::BottomRight],
            [Corner::TopLeft, Corner::BottomRight, Corner::BottomLeft],
        ]
    } else {
        [
            [Corner::TopRight, Corner::BottomRight, Corner::BottomLeft],
            [Corner::TopRight, Corner::BottomLeft, Corner::TopLeft],
        ]
    }
}

/// Signed area of the parallelogram spanned by `a -> b` and `a -> p`.
fn cross(a: Point, b: Point, p: Point) -> f64 {
    (b.x - a.x).mul_add(p.y - a.y, -((b.y - a.y) * (p.x - a.x)))
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::types::Dimensions;

    fn placement() -> ImagePlacement {
        ImagePlacement::compute(Rect::new(0.0, 0.0, 400.0, 400.0), Dimensions::new(400, 400))
            .unwrap()
    }

    fn quad_from(points: [(f64, f64); 4]) -> Quadrilateral {
        let placement = placement();
        let mut quad = Quadrilateral::default_for(&placement);
        for (corner, (x, y)) in Corner::ALL.into_iter().zip(points) {
            let current = quad.corner(corner);
            quad.move_corner(corner, x - current.x, y - current.y, &placement, 0.0);
        }
        quad
    }

    fn triangle_area(points: [Point; 3]) -> f64 {
        (cross(points[0], points[1], points[2]) / 2.0).abs()
    }

    fn polygon_area(points: [Point; 4]) -> f64 {
        let mut doubled = 0.0;
        for (a, b) in points.iter().zip(points.iter().cycle().skip(1)) {
            doubled += a.x.mul_add(b.y, -(b.x * a.y));
        }
        (doubled / 2.0).abs()
    }

    fn window_area(quad: &Quadrilateral) -> f64 {
        triangulate(quad)
            .into_iter()
            .map(|triple| triangle_area(triple.map(|corner| quad.corner(corner))))
            .sum()
    }

    #[test]
    fn frame_and_outline_echo_placement_and_polygon() {
        let placement = placement();
        let quad = Quadrilateral::default_for(&placement);

        let overlay = compute(&quad, &placement);
        assert_eq!(overlay.frame, placement.rect());
        assert_eq!(overlay.outline, quad.points());
    }

    #[test]
    fn window_tiles_the_default_rectangle() {
        let placement = placement();
        let quad = Quadrilateral::default_for(&placement);

        assert!((window_area(&quad) - 400.0 * 400.0).abs() < 1e-6);
    }

    #[test]
    fn window_tiles_a_convex_quadrilateral() {
        let quad = quad_from([(20.0, 10.0), (380.0, 40.0), (390.0, 360.0), (30.0, 390.0)]);

        assert!((window_area(&quad) - polygon_area(quad.points())).abs() < 1e-6);
    }

    #[test]
    fn dart_with_a_reflex_bottom_left_uses_the_other_diagonal() {
        // Bottom-left dragged deep inside makes the polygon concave at
        // that corner, so only the top-right to bottom-left diagonal is
        // internal.
        let quad = quad_from([(100.0, 0.0), (300.0, 0.0), (300.0, 300.0), (200.0, 100.0)]);

        let [first, second] = triangulate(&quad);
        assert!(first.contains(&Corner::TopRight) && first.contains(&Corner::BottomLeft));
        assert!(second.contains(&Corner::TopRight) && second.contains(&Corner::BottomLeft));
        assert!((window_area(&quad) - polygon_area(quad.points())).abs() < 1e-6);
    }

    #[test]
    fn dart_with_a_reflex_bottom_right_keeps_the_main_diagonal() {
        // Reflex at bottom-right, so the top-left to bottom-right
        // diagonal is the internal one.
        let quad = quad_from([(0.0, 0.0), (300.0, 0.0), (80.0, 150.0), (0.0, 300.0)]);

        let [first, second] = triangulate(&quad);
        assert!(first.contains(&Corner::TopLeft) && first.contains(&Corner::BottomRight));
        assert!(second.contains(&Corner::TopLeft) && second.contains(&Corner::BottomRight));
        assert!((window_area(&quad) - polygon_area(quad.points())).abs() < 1e-6);
    }

    #[test]
    fn degenerate_sliver_still_tiles() {
        let quad = quad_from([(50.0, 200.0), (350.0, 200.0), (350.0, 200.0), (50.0, 200.0)]);

        assert!(window_area(&quad) < 1e-6);
        assert!(polygon_area(quad.points()) < 1e-6);
    }
}
