//! The editor window.
//!
//! One `CropSession` at a time drives the whole surface: the central
//! panel letterboxes the picked image, paints the crop overlay from the
//! session's accessors, and routes primary-button drags to its handles.
//! Committing goes through a mode chooser, then a save dialog, then the
//! persistence worker; the session decides every outcome and this layer
//! only renders it.

use std::path::Path;
use std::sync::mpsc;

use kirinuki_app::{CommitOutcome, CropSession, HandleLayout, SaveResolution};
use kirinuki_core::{
    Corner, CropConfig, CropMode, DragStart, Handle, Point, Rect, Side, overlay,
};
use tracing::{info, warn};

use crate::convert;
use crate::worker::{self, SaveCommand, SaveOutcome};

/// Pointer distance within which a handle accepts a drag.
const HANDLE_HIT_RADIUS: f64 = 14.0;
/// Painted radius of a corner handle.
const CORNER_HANDLE_RADIUS: f32 = 7.0;
/// Painted length of a side handle bar, along its edge.
const SIDE_HANDLE_LENGTH: f64 = 34.0;
/// Painted thickness of a side handle bar.
const SIDE_HANDLE_WIDTH: f32 = 5.0;
/// Stroke width of the magnifier's circular border.
const MAGNIFIER_BORDER: f32 = 2.0;
/// Half-length of each magnifier crosshair arm.
const CROSSHAIR_REACH: f32 = 7.0;
/// Fill for the handle that owns the current gesture.
const ACTIVE_HANDLE: egui::Color32 = egui::Color32::from_rgb(110, 170, 255);

/// One user-facing alert, dismissed with its OK button.
#[derive(Clone)]
struct Notice {
    text: String,
    error: bool,
}

impl Notice {
    fn info(text: String) -> Self {
        Self { text, error: false }
    }

    fn error(text: String) -> Self {
        Self { text, error: true }
    }
}

pub struct KirinukiApp {
    session: Option<CropSession>,
    texture: Option<egui::TextureHandle>,
    magnifier_texture: Option<egui::TextureHandle>,
    /// Viewport the session's placement was computed for.
    viewport: Option<Rect>,
    /// Handle owning the current pointer drag.
    active: Option<Handle>,
    chooser_open: bool,
    saving: bool,
    notice: Option<Notice>,
    save_tx: mpsc::Sender<SaveCommand>,
    save_rx: mpsc::Receiver<SaveOutcome>,
}

impl KirinukiApp {
    pub fn new(ctx: &egui::Context) -> Self {
        let (result_tx, result_rx) = mpsc::channel();
        let save_tx = worker::spawn(result_tx, ctx.clone());

        Self {
            session: None,
            texture: None,
            magnifier_texture: None,
            viewport: None,
            active: None,
            chooser_open: false,
            saving: false,
            notice: None,
            save_tx,
            save_rx: result_rx,
        }
    }

    /// Decode a picked or dropped file and start a fresh session on it.
    fn open_image(&mut self, path: &Path, ctx: &egui::Context) {
        match image::open(path) {
            Ok(decoded) => {
                let image = decoded.to_rgba8();
                info!(
                    path = %path.display(),
                    width = image.width(),
                    height = image.height(),
                    "Image opened"
                );
                self.texture = Some(ctx.load_texture(
                    "source",
                    convert::color_image(&image),
                    egui::TextureOptions::LINEAR,
                ));
                self.session = Some(CropSession::new(image, CropConfig::default()));
                self.viewport = None;
                self.active = None;
                self.chooser_open = false;
            }
            Err(source) => {
                warn!(%source, path = %path.display(), "Could not decode image");
                self.notice = Some(Notice::error(format!(
                    "Could not open {}: {source}",
                    path.display()
                )));
            }
        }
    }

    fn close_editor(&mut self) {
        self.session = None;
        self.texture = None;
        self.magnifier_texture = None;
        self.viewport = None;
        self.active = None;
        self.chooser_open = false;
    }

    /// Drain completed save attempts from the worker.
    fn poll_saves(&mut self) {
        while let Ok(done) = self.save_rx.try_recv() {
            self.saving = false;
            let Some(session) = self.session.as_ref() else {
                continue;
            };
            match session.resolve_save(done.result) {
                SaveResolution::Dismiss => {
                    self.notice = Some(Notice::info(format!("Saved to {}", done.path.display())));
                    self.close_editor();
                }
                SaveResolution::Stay { reason } => {
                    self.notice = Some(Notice::error(format!("Could not save the crop: {reason}")));
                }
            }
        }
    }

    /// Extract in the chosen mode and, if the output is worth keeping,
    /// ask where to put it. Cancelling the dialog discards the output
    /// and keeps the editor open.
    fn finish_crop(&mut self, mode: CropMode) {
        let Some(session) = self.session.as_mut() else {
            return;
        };

        match session.commit(mode) {
            CommitOutcome::NoGeometry => {
                self.notice = Some(Notice::error("No image is placed yet.".to_owned()));
            }
            CommitOutcome::ExtractionFailed => {
                self.notice = Some(Notice::error(
                    "Could not extract the selected region.".to_owned(),
                ));
            }
            CommitOutcome::TooSmall { .. } => {
                self.notice = Some(Notice::info(
                    "The selected region is too small to keep.".to_owned(),
                ));
            }
            CommitOutcome::Ready(output) => {
                let picked = rfd::FileDialog::new()
                    .add_filter("PNG image", &["png"])
                    .set_file_name("crop.png")
                    .save_file();
                if let Some(path) = picked {
                    self.saving = true;
                    let _ = self.save_tx.send(SaveCommand {
                        path,
                        png: output.png,
                    });
                }
            }
        }
    }

    fn show_editor(&mut self, ui: &mut egui::Ui) {
        let rect = ui.available_rect_before_wrap();
        paint_background(ui, rect);

        let (Some(session), Some(texture)) = (self.session.as_mut(), self.texture.as_ref()) else {
            show_placeholder(ui);
            return;
        };

        // Layout pass: recompute the placement when the panel changes.
        let viewport = convert::from_egui_rect(rect);
        if self.viewport != Some(viewport) {
            session.set_viewport(viewport);
            self.viewport = Some(viewport);
            self.active = None;
        }

        let response = ui.allocate_rect(rect, egui::Sense::click_and_drag());

        if response.drag_started_by(egui::PointerButton::Primary) {
            self.active = None;
            if let Some(pos) = response.interact_pointer_pos()
                && let Some(handles) = session.handles()
                && let Some(handle) = hit_test(convert::to_point(pos), &handles)
                && session.begin_drag(handle) == DragStart::Begun
            {
                self.active = Some(handle);
            }
        }
        if response.dragged_by(egui::PointerButton::Primary)
            && let Some(handle) = self.active
        {
            let delta = response.drag_delta();
            session.drag_by(handle, f64::from(delta.x), f64::from(delta.y));
        }
        if response.drag_stopped_by(egui::PointerButton::Primary)
            && let Some(handle) = self.active.take()
        {
            session.end_drag(handle);
        }

        let painter = ui.painter_at(rect);
        paint_session(&painter, session, texture, self.active);
        self.paint_magnifier(ui, rect);
    }

    /// Upload and paint the loupe over the dragged corner.
    fn paint_magnifier(&mut self, ui: &egui::Ui, rect: egui::Rect) {
        let Some(view) = self.session.as_ref().and_then(CropSession::magnifier) else {
            self.magnifier_texture = None;
            return;
        };

        let color = convert::color_image(&view.preview);
        let anchor = convert::to_pos2(view.anchor);
        #[allow(clippy::cast_precision_loss)]
        let size = egui::vec2(view.preview.width() as f32, view.preview.height() as f32);
        let radius = size.x / 2.0;

        let texture = self.magnifier_texture.insert(ui.ctx().load_texture(
            "magnifier",
            color,
            egui::TextureOptions::NEAREST,
        ));
        egui::Image::from_texture(&*texture)
            .corner_radius(radius)
            .paint_at(ui, egui::Rect::from_center_size(anchor, size));

        let painter = ui.painter_at(rect);
        painter.circle_stroke(
            anchor,
            radius,
            egui::Stroke::new(MAGNIFIER_BORDER, egui::Color32::WHITE),
        );
        painter.line_segment(
            [
                anchor - egui::vec2(CROSSHAIR_REACH, 0.0),
                anchor + egui::vec2(CROSSHAIR_REACH, 0.0),
            ],
            egui::Stroke::new(1.0, egui::Color32::WHITE),
        );
        painter.line_segment(
            [
                anchor - egui::vec2(0.0, CROSSHAIR_REACH),
                anchor + egui::vec2(0.0, CROSSHAIR_REACH),
            ],
            egui::Stroke::new(1.0, egui::Color32::WHITE),
        );
    }

    fn show_chooser(&mut self, ctx: &egui::Context) {
        let mut picked = None;
        let mut open = true;

        egui::Window::new("Extract crop")
            .collapsible(false)
            .resizable(false)
            .anchor(egui::Align2::CENTER_CENTER, [0.0, 0.0])
            .show(ctx, |ui| {
                ui.label("Trim keeps the outside transparent; Matte fills it with black.");
                ui.add_space(8.0);
                ui.horizontal(|ui| {
                    if ui.button("Trim").clicked() {
                        picked = Some(CropMode::Trim);
                    }
                    if ui.button("Matte").clicked() {
                        picked = Some(CropMode::Matte);
                    }
                    if ui.button("Cancel").clicked() {
                        open = false;
                    }
                });
            });

        if let Some(mode) = picked {
            self.chooser_open = false;
            self.finish_crop(mode);
        } else if !open {
            self.chooser_open = false;
        }
    }

    fn show_notice(&mut self, ctx: &egui::Context) {
        let Some(notice) = self.notice.clone() else {
            return;
        };
        let mut dismissed = false;

        egui::Window::new("Kirinuki")
            .collapsible(false)
            .resizable(false)
            .anchor(egui::Align2::CENTER_CENTER, [0.0, 0.0])
            .show(ctx, |ui| {
                ui.vertical_centered(|ui| {
                    if notice.error {
                        ui.colored_label(ui.visuals().error_fg_color, &notice.text);
                    } else {
                        ui.label(&notice.text);
                    }
                    ui.add_space(8.0);
                    if ui.button("OK").clicked() {
                        dismissed = true;
                    }
                });
            });

        if dismissed {
            self.notice = None;
        }
    }
}

impl eframe::App for KirinukiApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        self.poll_saves();

        let dropped = ctx.input(|i| i.raw.dropped_files.first().and_then(|file| file.path.clone()));
        if let Some(path) = dropped {
            self.open_image(&path, ctx);
        }

        egui::TopBottomPanel::top("controls").show(ctx, |ui| {
            ui.horizontal(|ui| {
                if ui.button("Open image…").clicked()
                    && let Some(path) = rfd::FileDialog::new()
                        .add_filter("Image", &["png", "jpg", "jpeg", "bmp", "webp"])
                        .pick_file()
                {
                    self.open_image(&path, ui.ctx());
                }

                let placed = self
                    .session
                    .as_ref()
                    .is_some_and(|session| session.placement().is_some());
                if ui
                    .add_enabled(placed && !self.saving, egui::Button::new("Crop…"))
                    .clicked()
                {
                    self.chooser_open = true;
                }

                if self.saving {
                    ui.spinner();
                    ui.label("Saving…");
                }
            });
        });

        egui::CentralPanel::default().show(ctx, |ui| self.show_editor(ui));

        if self.chooser_open {
            self.show_chooser(ctx);
        }
        self.show_notice(ctx);
    }
}

fn paint_background(ui: &egui::Ui, rect: egui::Rect) {
    ui.painter()
        .rect_filled(rect, 0.0, egui::Color32::from_gray(30));
}

fn show_placeholder(ui: &mut egui::Ui) {
    ui.centered_and_justified(|ui| {
        ui.label(
            egui::RichText::new("Open or drop an image to begin")
                .size(18.0)
                .color(egui::Color32::from_gray(100)),
        );
    });
}

/// Paint the letterboxed image, the crop overlay, and the handles.
fn paint_session(
    painter: &egui::Painter,
    session: &CropSession,
    texture: &egui::TextureHandle,
    active: Option<Handle>,
) {
    let (Some(overlay), Some(quad), Some(handles)) =
        (session.overlay(), session.quad(), session.handles())
    else {
        return;
    };

    let frame = convert::to_egui_rect(overlay.frame);
    let uv = egui::Rect::from_min_max(egui::pos2(0.0, 0.0), egui::pos2(1.0, 1.0));
    painter.image(texture.id(), frame, uv, egui::Color32::WHITE);

    // Dim the whole placement, then repaint the image over the crop
    // window so only the outside stays dark.
    #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
    let dim = egui::Color32::from_black_alpha((overlay::DIM_OPACITY * 255.0).round() as u8);
    painter.rect_filled(frame, 0.0, dim);

    let mut mesh = egui::Mesh::with_texture(texture.id());
    for triangle in overlay.window {
        #[allow(clippy::cast_possible_truncation)]
        let base = mesh.vertices.len() as u32;
        for corner in triangle {
            let point = quad.corner(corner);
            #[allow(clippy::cast_possible_truncation)]
            let uv = egui::pos2(
                ((point.x - overlay.frame.min_x()) / overlay.frame.width) as f32,
                ((point.y - overlay.frame.min_y()) / overlay.frame.height) as f32,
            );
            mesh.vertices.push(egui::epaint::Vertex {
                pos: convert::to_pos2(point),
                uv,
                color: egui::Color32::WHITE,
            });
        }
        mesh.indices.extend([base, base + 1, base + 2]);
    }
    painter.add(egui::Shape::mesh(mesh));

    #[allow(clippy::cast_possible_truncation)]
    let outline_width = overlay::OUTLINE_WIDTH as f32;
    painter.add(egui::Shape::closed_line(
        overlay.outline.map(convert::to_pos2).to_vec(),
        egui::Stroke::new(outline_width, egui::Color32::WHITE),
    ));

    for (side, handle) in Side::ALL.into_iter().zip(handles.sides) {
        // The model's angle rotates a horizontal glyph; vertical sides
        // carry a quarter-turn compensation that the bar undoes here.
        let along = if side.is_horizontal() {
            handle.angle
        } else {
            handle.angle + std::f64::consts::FRAC_PI_2
        };
        let (sin, cos) = along.sin_cos();
        let half = SIDE_HANDLE_LENGTH / 2.0;
        let from = Point::new(handle.position.x - cos * half, handle.position.y - sin * half);
        let to = Point::new(handle.position.x + cos * half, handle.position.y + sin * half);
        let color = if active == Some(Handle::Side(side)) {
            ACTIVE_HANDLE
        } else {
            egui::Color32::WHITE
        };
        painter.line_segment(
            [convert::to_pos2(from), convert::to_pos2(to)],
            egui::Stroke::new(SIDE_HANDLE_WIDTH, color),
        );
    }

    for (corner, center) in Corner::ALL.into_iter().zip(handles.corners) {
        let fill = if active == Some(Handle::Corner(corner)) {
            ACTIVE_HANDLE
        } else {
            egui::Color32::WHITE
        };
        painter.circle(
            convert::to_pos2(center),
            CORNER_HANDLE_RADIUS,
            fill,
            egui::Stroke::new(1.0, egui::Color32::BLACK),
        );
    }
}

/// Find the handle under the pointer. Corners are checked first so a
/// corner dragged onto a side midpoint still wins.
fn hit_test(pointer: Point, handles: &HandleLayout) -> Option<Handle> {
    let corner = Corner::ALL
        .into_iter()
        .zip(handles.corners)
        .find(|(_, center)| pointer.distance(*center) <= HANDLE_HIT_RADIUS)
        .map(|(corner, _)| Handle::Corner(corner));

    corner.or_else(|| {
        Side::ALL
            .into_iter()
            .zip(handles.sides)
            .find(|(_, handle)| pointer.distance(handle.position) <= HANDLE_HIT_RADIUS)
            .map(|(side, _)| Handle::Side(side))
    })
}
