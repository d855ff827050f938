//! kirinuki-core: Pure quadrilateral crop geometry and rasterization (sans-IO).
//!
//! Places an image inside a viewport letterbox, maintains a four-corner
//! crop quadrilateral under clamped corner and side-pair drags, routes
//! drag gestures through a single-active-handle state machine, derives
//! overlay and magnifier geometry for a render host, and extracts the
//! crop polygon to a PNG-encodable raster in Trim or Matte mode.
//!
//! This crate has **no I/O dependencies** -- it operates on in-memory
//! rasters and returns structured data. Windowing, file picking, and
//! persistence live in the `kirinuki` host; session orchestration in
//! `kirinuki-app`.

pub mod drag;
pub mod extract;
pub mod magnifier;
pub mod overlay;
pub mod placement;
pub mod quad;
pub mod types;

pub use drag::{DragController, DragStart, DragState, Handle};
pub use extract::CropMode;
pub use overlay::Overlay;
pub use placement::ImagePlacement;
pub use quad::{Corner, Quadrilateral, Side, SideHandle};
pub use types::{CropConfig, Dimensions, ExtractError, Point, Rect, RgbaImage};
