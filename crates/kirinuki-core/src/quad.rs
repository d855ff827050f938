//! The quadrilateral constraint model.
//!
//! Four corner points in a fixed topology (top-left, top-right,
//! bottom-right, bottom-left) that the user drags individually or in
//! side pairs. Every edit is clamped so the corners stay axis-ordered
//! (no edge crossings) and inside the placement rectangle; side handles
//! are derived from the corners and never independently stored.

use serde::{Deserialize, Serialize};

use crate::placement::ImagePlacement;
use crate::types::Point;

/// One of the four corners, in clockwise storage order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Corner {
    /// Index 0.
    TopLeft,
    /// Index 1.
    TopRight,
    /// Index 2.
    BottomRight,
    /// Index 3.
    BottomLeft,
}

impl Corner {
    /// All corners in storage order.
    pub const ALL: [Self; 4] = [
        Self::TopLeft,
        Self::TopRight,
        Self::BottomRight,
        Self::BottomLeft,
    ];

    /// Position in the quadrilateral's point array.
    #[must_use]
    pub const fn index(self) -> usize {
        match self {
            Self::TopLeft => 0,
            Self::TopRight => 1,
            Self::BottomRight => 2,
            Self::BottomLeft => 3,
        }
    }

    /// Whether this corner is in the left column (top-left or
    /// bottom-left).
    #[must_use]
    pub const fn is_left(self) -> bool {
        matches!(self, Self::TopLeft | Self::BottomLeft)
    }

    /// Whether this corner is in the top row (top-left or top-right).
    #[must_use]
    pub const fn is_top(self) -> bool {
        matches!(self, Self::TopLeft | Self::TopRight)
    }
}

/// One of the four sides, each controlling its pair of corners.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Side {
    /// Controls top-left and top-right.
    Top,
    /// Controls top-right and bottom-right.
    Right,
    /// Controls bottom-left and bottom-right.
    Bottom,
    /// Controls top-left and bottom-left.
    Left,
}

impl Side {
    /// All sides.
    pub const ALL: [Self; 4] = [Self::Top, Self::Right, Self::Bottom, Self::Left];

    /// The two corners this side moves, ordered so the vector from the
    /// first to the second gives the side's slope direction.
    #[must_use]
    pub const fn corners(self) -> [Corner; 2] {
        match self {
            Self::Top => [Corner::TopLeft, Corner::TopRight],
            Self::Right => [Corner::TopRight, Corner::BottomRight],
            Self::Bottom => [Corner::BottomLeft, Corner::BottomRight],
            Self::Left => [Corner::TopLeft, Corner::BottomLeft],
        }
    }

    /// The facing side, whose corners bound this side's movement.
    #[must_use]
    pub const fn opposite(self) -> Self {
        match self {
            Self::Top => Self::Bottom,
            Self::Bottom => Self::Top,
            Self::Left => Self::Right,
            Self::Right => Self::Left,
        }
    }

    /// Whether the side's baseline runs horizontally. Horizontal sides
    /// move their corner pair vertically; vertical sides horizontally.
    #[must_use]
    pub const fn is_horizontal(self) -> bool {
        matches!(self, Self::Top | Self::Bottom)
    }
}

/// Derived position and rotation for one side's handle.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SideHandle {
    /// Midpoint of the side's two corners.
    pub position: Point,
    /// Rotation in radians matching the side's slope. Vertical-baseline
    /// sides (left/right) are already rotated a quarter turn back so a
    /// horizontal handle glyph renders along the edge.
    pub angle: f64,
}

/// Four corner points forming the crop region, stored as an ordered
/// clockwise array so opposite/adjacent relationships are index
/// arithmetic rather than per-corner special cases.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Quadrilateral {
    points: [Point; 4],
}

impl Quadrilateral {
    /// The default crop region for a placement: its four corners
    /// exactly, with no inset.
    #[must_use]
    pub fn default_for(placement: &ImagePlacement) -> Self {
        Self {
            points: placement.rect().corners(),
        }
    }

    /// Position of one corner.
    #[must_use]
    pub const fn corner(&self, corner: Corner) -> Point {
        self.points[corner.index()]
    }

    /// All four corners in clockwise order (top-left, top-right,
    /// bottom-right, bottom-left) — the canonical vertex order for
    /// extraction.
    #[must_use]
    pub const fn points(&self) -> [Point; 4] {
        self.points
    }

    /// Move one corner by a delta, clamped to keep the quadrilateral
    /// axis-ordered and inside the placement rectangle.
    ///
    /// Per axis the bound toward the quadrilateral's interior is the
    /// extremum over the two corners of the opposite column/row — the
    /// tightest rectangle implied by the other corners. The bound toward
    /// the outside is the placement edge inset by `inset`, except that
    /// the neighbor bound overrides it: when the neighboring corners sit
    /// closer to the edge than the inset (a side pair parked on the
    /// frame, or a placement narrower than the inset), the corner parks
    /// on the neighbor bound so ordering survives.
    pub fn move_corner(
        &mut self,
        corner: Corner,
        dx: f64,
        dy: f64,
        placement: &ImagePlacement,
        inset: f64,
    ) {
        let frame = placement.rect();
        let current = self.corner(corner);
        let proposed_x = current.x + dx;
        let proposed_y = current.y + dy;

        let x = if corner.is_left() {
            let limit = self.min_x_over(Self::RIGHT_COLUMN);
            let floor = (frame.min_x() + inset).min(limit);
            proposed_x.min(limit).max(floor)
        } else {
            let limit = self.max_x_over(Self::LEFT_COLUMN);
            let ceiling = (frame.max_x() - inset).max(limit);
            proposed_x.max(limit).min(ceiling)
        };

        let y = if corner.is_top() {
            let limit = self.min_y_over(Self::BOTTOM_ROW);
            let floor = (frame.min_y() + inset).min(limit);
            proposed_y.min(limit).max(floor)
        } else {
            let limit = self.max_y_over(Self::TOP_ROW);
            let ceiling = (frame.max_y() - inset).max(limit);
            proposed_y.max(limit).min(ceiling)
        };

        self.points[corner.index()] = Point::new(x, y);
    }

    /// Move both corners of a side by the same delta on the side's
    /// perpendicular axis.
    ///
    /// Each corner clamps independently against the extremum of the
    /// opposite side's two corners and against the raw placement edge,
    /// so one corner of the pair can stop at a bound while the other
    /// keeps moving.
    pub fn move_side(&mut self, side: Side, delta: f64, placement: &ImagePlacement) {
        let frame = placement.rect();
        let opposite = side.opposite().corners();

        match side {
            Side::Top => {
                let limit = self.min_y_over(opposite);
                for corner in side.corners() {
                    let p = &mut self.points[corner.index()];
                    p.y = (p.y + delta).max(frame.min_y()).min(limit);
                }
            }
            Side::Bottom => {
                let limit = self.max_y_over(opposite);
                for corner in side.corners() {
                    let p = &mut self.points[corner.index()];
                    p.y = (p.y + delta).min(frame.max_y()).max(limit);
                }
            }
            Side::Left => {
                let limit = self.min_x_over(opposite);
                for corner in side.corners() {
                    let p = &mut self.points[corner.index()];
                    p.x = (p.x + delta).max(frame.min_x()).min(limit);
                }
            }
            Side::Right => {
                let limit = self.max_x_over(opposite);
                for corner in side.corners() {
                    let p = &mut self.points[corner.index()];
                    p.x = (p.x + delta).min(frame.max_x()).max(limit);
                }
            }
        }
    }

    /// Handle position and rotation for one side: the midpoint of its
    /// corners, rotated to the side's slope via `atan2`, with
    /// vertical-baseline sides turned back a quarter turn.
    #[must_use]
    pub fn side_handle(&self, side: Side) -> SideHandle {
        let [a, b] = side.corners().map(|corner| self.corner(corner));
        let slope = (b.y - a.y).atan2(b.x - a.x);
        let angle = if side.is_horizontal() {
            slope
        } else {
            slope - std::f64::consts::FRAC_PI_2
        };

        SideHandle {
            position: a.midpoint(b),
            angle,
        }
    }

    /// All four side handles, in [`Side::ALL`] order.
    #[must_use]
    pub fn side_handles(&self) -> [SideHandle; 4] {
        Side::ALL.map(|side| self.side_handle(side))
    }

    /// Whether the corners are axis-ordered: top corners above their
    /// bottom neighbors and left corners left of both right corners.
    /// Holds after every clamped edit on a placement wider and taller
    /// than twice the inset; ordering makes the clockwise circuit a
    /// simple polygon.
    #[must_use]
    pub fn is_non_crossing(&self) -> bool {
        let [tl, tr, br, bl] = self.points;
        tl.x <= tr.x && bl.x <= br.x && tl.y <= bl.y && tr.y <= br.y
    }

    const LEFT_COLUMN: [Corner; 2] = [Corner::TopLeft, Corner::BottomLeft];
    const RIGHT_COLUMN: [Corner; 2] = [Corner::TopRight, Corner::BottomRight];
    const TOP_ROW: [Corner; 2] = [Corner::TopLeft, Corner::TopRight];
    const BOTTOM_ROW: [Corner; 2] = [Corner::BottomLeft, Corner::BottomRight];

    fn min_x_over(&self, corners: [Corner; 2]) -> f64 {
        self.corner(corners[0]).x.min(self.corner(corners[1]).x)
    }

    fn max_x_over(&self, corners: [Corner; 2]) -> f64 {
        self.corner(corners[0]).x.max(self.corner(corners[1]).x)
    }

    fn min_y_over(&self, corners: [Corner; 2]) -> f64 {
        self.corner(corners[0]).y.min(self.corner(corners[1]).y)
    }

    fn max_y_over(&self, corners: [Corner; 2]) -> f64 {
        self.corner(corners[0]).y.max(self.corner(corners[1]).y)
    }
}
