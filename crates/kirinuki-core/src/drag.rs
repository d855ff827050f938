//! Drag interaction state machine.
//!
//! One gesture stream edits the quadrilateral at a time. Corner drags
//! take an exclusivity lock (a second corner drag cancels both); side
//! drags are coarse adjustments that never lock and never show the
//! magnifier. Moves are incremental deltas, so a handle follows the
//! pointer without jumping to its absolute position.

use serde::{Deserialize, Serialize};

use crate::placement::ImagePlacement;
use crate::quad::{Corner, Quadrilateral, Side};

/// A draggable control: a corner or a side handle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Handle {
    /// One of the four corner handles.
    Corner(Corner),
    /// One of the four side-pair handles.
    Side(Side),
}

/// Controller state: idle, or exactly one handle active.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum DragState {
    /// No drag in progress.
    #[default]
    Idle,
    /// The named handle owns the gesture stream.
    Active(Handle),
}

/// Outcome of attempting to begin a drag.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DragStart {
    /// The handle is now active.
    Begun,
    /// A different corner drag was already in progress. Both drags end;
    /// the controller is idle again.
    Rejected,
}

/// Routes gesture events into clamped quadrilateral edits.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DragController {
    state: DragState,
}

impl DragController {
    /// A controller with no active drag.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            state: DragState::Idle,
        }
    }

    /// Current state.
    #[must_use]
    pub const fn state(&self) -> DragState {
        self.state
    }

    /// Begin a drag on a handle.
    ///
    /// Starting a corner drag while a *different* corner drag is active
    /// is rejected and cancels the active drag as well — hard
    /// exclusivity, not a queue. Side drags take no lock: beginning one
    /// simply supersedes whatever was active, and a corner drag may
    /// begin over an active side drag.
    pub fn begin(&mut self, handle: Handle) -> DragStart {
        if let (DragState::Active(Handle::Corner(active)), Handle::Corner(incoming)) =
            (self.state, handle)
            && active != incoming
        {
            self.state = DragState::Idle;
            return DragStart::Rejected;
        }

        self.state = DragState::Active(handle);
        DragStart::Begun
    }

    /// Apply an incremental pointer delta to the active handle.
    ///
    /// Corner handles move on both axes; side handles take only the
    /// component perpendicular to their baseline (top/bottom vertical,
    /// left/right horizontal). Events for a handle that is not the
    /// active one are ignored; returns whether the quadrilateral was
    /// edited.
    #[must_use]
    pub fn drag_by(
        &mut self,
        quad: &mut Quadrilateral,
        placement: &ImagePlacement,
        handle: Handle,
        dx: f64,
        dy: f64,
        inset: f64,
    ) -> bool {
        if self.state != DragState::Active(handle) {
            return false;
        }

        match handle {
            Handle::Corner(corner) => quad.move_corner(corner, dx, dy, placement, inset),
            Handle::Side(side) => {
                let delta = if side.is_horizontal() { dy } else { dx };
                quad.move_side(side, delta, placement);
            }
        }
        true
    }

    /// End or cancel a drag. A no-op unless that handle is the active
    /// one, so the stray end event of a rejected gesture cannot clobber
    /// a later drag.
    pub fn finish(&mut self, handle: Handle) {
        if self.state == DragState::Active(handle) {
            self.state = DragState::Idle;
        }
    }

    /// The corner whose drag is active, if any. The magnifier preview
    /// follows exactly this corner; side drags never show it.
    #[must_use]
    pub const fn magnifier_corner(&self) -> Option<Corner> {
        match self.state {
            DragState::Active(Handle::Corner(corner)) => Some(corner),
            _ => None,
        }
    }
}
