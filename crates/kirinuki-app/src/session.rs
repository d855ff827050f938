//! One crop-editing session per presented image.
//!
//! The session owns the source raster and everything derived from it:
//! the letterbox placement for the current viewport, the crop
//! quadrilateral, the drag controller, and the magnifier preview. The
//! host feeds it layout passes, pointer deltas, and a commit mode, and
//! renders whatever the accessors return; outcomes of commit and save
//! come back as values, never as host callbacks.

use kirinuki_core::{
    CropConfig, CropMode, Dimensions, DragController, DragStart, DragState, Handle,
    ImagePlacement, Overlay, Point, Quadrilateral, Rect, RgbaImage, SideHandle, extract,
    magnifier, overlay,
};
use tracing::{debug, error, info, warn};

/// Placement plus the quadrilateral that lives in its coordinates.
/// Always replaced together: a quadrilateral from one placement is
/// meaningless under another.
#[derive(Debug, Clone, Copy)]
struct Layout {
    placement: ImagePlacement,
    quad: Quadrilateral,
}

/// Positions the host draws draggable controls at.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct HandleLayout {
    /// Corner handle centers, clockwise from top-left.
    pub corners: [Point; 4],
    /// Side handle centers and rotations.
    pub sides: [SideHandle; 4],
}

/// Magnifier raster and where to show it, recomputed while a corner
/// drag is active.
#[derive(Debug, Clone, PartialEq)]
pub struct MagnifierView {
    /// Zoomed native pixels around the dragged corner.
    pub preview: RgbaImage,
    /// Viewport point the host centers the preview on.
    pub anchor: Point,
}

/// Result of committing the crop region.
#[derive(Debug)]
pub enum CommitOutcome {
    /// No placement has been computed; nothing was extracted and the
    /// geometry is untouched.
    NoGeometry,
    /// Rasterization or encoding failed; the geometry is untouched.
    ExtractionFailed,
    /// Extraction completed but the encoded output is below the
    /// configured minimum size. The crop region has been reset; nothing
    /// should be persisted.
    TooSmall {
        /// Size of the rejected PNG.
        encoded_bytes: usize,
    },
    /// Extraction completed and the output meets the minimum size. The
    /// crop region has been reset; the caller hands the PNG to its
    /// persistence collaborator.
    Ready(CropOutput),
}

/// A finished extraction.
#[derive(Debug, Clone)]
pub struct CropOutput {
    /// The extracted raster, same dimensions as the source.
    pub image: RgbaImage,
    /// PNG encoding of `image`.
    pub png: Vec<u8>,
}

/// What the host does with the editor after a save attempt resolves.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SaveResolution {
    /// Saved; dismiss the editor.
    Dismiss,
    /// Save failed; the editor stays open and the output is discarded.
    Stay {
        /// Failure description, shown to the user verbatim.
        reason: String,
    },
}

/// Interaction state for editing one image.
#[derive(Debug)]
pub struct CropSession {
    image: RgbaImage,
    config: CropConfig,
    layout: Option<Layout>,
    controller: DragController,
    magnifier: Option<MagnifierView>,
}

impl CropSession {
    /// Start a session for a decoded image. No placement exists until
    /// the first [`Self::set_viewport`].
    #[must_use]
    pub fn new(image: RgbaImage, config: CropConfig) -> Self {
        Self {
            image,
            config,
            layout: None,
            controller: DragController::new(),
            magnifier: None,
        }
    }

    /// The source raster.
    #[must_use]
    pub const fn image(&self) -> &RgbaImage {
        &self.image
    }

    /// The session configuration.
    #[must_use]
    pub const fn config(&self) -> &CropConfig {
        &self.config
    }

    /// Recompute the placement for a viewport and reset the crop region
    /// to the image's full extent.
    ///
    /// This is the layout pass: the host calls it when the viewport
    /// rectangle changes (resize, rotation, first show). Any drag in
    /// progress is abandoned, since its coordinates belong to the old
    /// placement.
    pub fn set_viewport(&mut self, viewport: Rect) {
        self.layout = ImagePlacement::compute(viewport, Dimensions::of(&self.image)).map(
            |placement| Layout {
                placement,
                quad: Quadrilateral::default_for(&placement),
            },
        );
        self.controller = DragController::new();
        self.magnifier = None;

        if self.layout.is_none() {
            warn!(?viewport, "Viewport cannot place the image");
        }
    }

    /// The current placement, if a viewport has been set.
    #[must_use]
    pub fn placement(&self) -> Option<&ImagePlacement> {
        self.layout.as_ref().map(|layout| &layout.placement)
    }

    /// The current crop quadrilateral, if a viewport has been set.
    #[must_use]
    pub fn quad(&self) -> Option<&Quadrilateral> {
        self.layout.as_ref().map(|layout| &layout.quad)
    }

    /// Current drag state, for highlighting the active handle.
    #[must_use]
    pub const fn drag_state(&self) -> DragState {
        self.controller.state()
    }

    /// Begin a drag on a handle. Without a placement there is nothing
    /// to drag and the attempt is rejected.
    pub fn begin_drag(&mut self, handle: Handle) -> DragStart {
        if self.layout.is_none() {
            return DragStart::Rejected;
        }

        let start = self.controller.begin(handle);
        debug!(?handle, ?start, "Drag begin");
        self.refresh_magnifier();
        start
    }

    /// Apply an incremental pointer delta to the active handle.
    pub fn drag_by(&mut self, handle: Handle, dx: f64, dy: f64) {
        let Some(layout) = self.layout.as_mut() else {
            return;
        };

        let applied = self.controller.drag_by(
            &mut layout.quad,
            &layout.placement,
            handle,
            dx,
            dy,
            self.config.corner_inset,
        );
        if applied {
            self.refresh_magnifier();
        }
    }

    /// End or cancel a drag.
    pub fn end_drag(&mut self, handle: Handle) {
        self.controller.finish(handle);
        debug!(?handle, "Drag end");
        self.refresh_magnifier();
    }

    /// Overlay geometry for the current frame.
    #[must_use]
    pub fn overlay(&self) -> Option<Overlay> {
        self.layout
            .map(|layout| overlay::compute(&layout.quad, &layout.placement))
    }

    /// Handle positions for the current frame.
    #[must_use]
    pub fn handles(&self) -> Option<HandleLayout> {
        self.layout.map(|layout| HandleLayout {
            corners: layout.quad.points(),
            sides: layout.quad.side_handles(),
        })
    }

    /// The magnifier preview, present only while a corner drag is
    /// active.
    #[must_use]
    pub const fn magnifier(&self) -> Option<&MagnifierView> {
        self.magnifier.as_ref()
    }

    /// Extract the crop region in the given mode and encode it as PNG.
    ///
    /// Once extraction completes the crop region resets to the image's
    /// full extent, whether or not the output clears the minimum-size
    /// threshold; a failed extraction leaves the region as the user
    /// left it.
    pub fn commit(&mut self, mode: CropMode) -> CommitOutcome {
        let Some(layout) = self.layout else {
            warn!("Commit ignored: geometry unavailable");
            return CommitOutcome::NoGeometry;
        };

        let corners = layout
            .quad
            .points()
            .map(|p| layout.placement.to_pixel_space(p));

        let image = match extract::extract(&self.image, corners, mode) {
            Ok(image) => image,
            Err(source) => {
                error!(%source, %mode, "Extraction failed");
                return CommitOutcome::ExtractionFailed;
            }
        };
        let png = match extract::encode_png(&image) {
            Ok(png) => png,
            Err(source) => {
                error!(%source, %mode, "Output encoding failed");
                return CommitOutcome::ExtractionFailed;
            }
        };

        self.reset_crop();

        let encoded_bytes = png.len();
        if encoded_bytes / 1024 < self.config.min_output_kilobytes {
            warn!(encoded_bytes, %mode, "Crop below minimum output size");
            return CommitOutcome::TooSmall { encoded_bytes };
        }

        info!(encoded_bytes, %mode, "Crop extracted");
        CommitOutcome::Ready(CropOutput { image, png })
    }

    /// Resolve an asynchronous save attempt.
    ///
    /// The host re-marshals the persistence result onto the interaction
    /// thread and calls this once per attempt. Success dismisses the
    /// editor; failure keeps it open with the crop region already reset
    /// by [`Self::commit`], and the output is discarded rather than
    /// retried.
    #[must_use]
    pub fn resolve_save(&self, result: Result<(), String>) -> SaveResolution {
        match result {
            Ok(()) => {
                info!("Crop saved");
                SaveResolution::Dismiss
            }
            Err(reason) => {
                warn!(%reason, "Save failed");
                SaveResolution::Stay { reason }
            }
        }
    }

    /// Reset the crop region to the full placement and drop any
    /// interaction state tied to the old region.
    fn reset_crop(&mut self) {
        if let Some(layout) = self.layout.as_mut() {
            layout.quad = Quadrilateral::default_for(&layout.placement);
        }
        self.controller = DragController::new();
        self.magnifier = None;
    }

    /// Recompute the magnifier preview for the active corner drag, or
    /// clear it.
    fn refresh_magnifier(&mut self) {
        self.magnifier = self.controller.magnifier_corner().and_then(|corner| {
            self.layout.map(|layout| {
                let point = layout.quad.corner(corner);
                let region = magnifier::preview_region(point, &layout.placement, &self.config);
                let preview =
                    magnifier::render_preview(&self.image, region, self.config.magnifier_size);
                MagnifierView {
                    preview,
                    anchor: magnifier::anchor(point, &self.config),
                }
            })
        });
    }
}
