//! kirinuki-app: crop session orchestration.
//!
//! Sits between the pure geometry in `kirinuki-core` and the host
//! shell: one [`session::CropSession`] per presented image owns the
//! placement, the crop quadrilateral, the drag controller, and the
//! magnifier state, and turns commit and save results into outcome
//! values the host renders. No windowing or filesystem access here.

pub mod session;

pub use session::{
    CommitOutcome, CropOutput, CropSession, HandleLayout, MagnifierView, SaveResolution,
};
