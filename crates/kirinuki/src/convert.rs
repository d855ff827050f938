//! Conversions between the engine's geometry types and egui's.
//!
//! The engine works in `f64` viewport units; egui paints in `f32`
//! points. All geometry flows through these four mappers so the
//! narrowing happens in one place.

use kirinuki_core::{Point, Rect, RgbaImage};

/// Engine point to an egui position, for painting.
#[allow(clippy::cast_possible_truncation)]
pub fn to_pos2(point: Point) -> egui::Pos2 {
    egui::pos2(point.x as f32, point.y as f32)
}

/// Pointer position to engine coordinates, for hit-testing.
pub fn to_point(pos: egui::Pos2) -> Point {
    Point::new(f64::from(pos.x), f64::from(pos.y))
}

/// Engine rectangle to an egui rectangle, for painting.
#[allow(clippy::cast_possible_truncation)]
pub fn to_egui_rect(rect: Rect) -> egui::Rect {
    egui::Rect::from_min_size(
        egui::pos2(rect.x as f32, rect.y as f32),
        egui::vec2(rect.width as f32, rect.height as f32),
    )
}

/// Panel rectangle to engine coordinates, for the layout pass.
pub fn from_egui_rect(rect: egui::Rect) -> Rect {
    Rect::new(
        f64::from(rect.left()),
        f64::from(rect.top()),
        f64::from(rect.width()),
        f64::from(rect.height()),
    )
}

/// Decoded raster to an egui color image for texture upload.
pub fn color_image(image: &RgbaImage) -> egui::ColorImage {
    let size = [image.width() as usize, image.height() as usize];
    egui::ColorImage::from_rgba_unmultiplied(size, image.as_raw())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rect_round_trip_through_egui() {
        let rect = Rect::new(12.5, 40.0, 640.0, 480.0);
        let back = from_egui_rect(to_egui_rect(rect));
        assert!((back.x - rect.x).abs() < 1e-3);
        assert!((back.y - rect.y).abs() < 1e-3);
        assert!((back.width - rect.width).abs() < 1e-3);
        assert!((back.height - rect.height).abs() < 1e-3);
    }

    #[test]
    fn color_image_keeps_dimensions_and_bytes() {
        let mut raster = RgbaImage::new(3, 2);
        raster.put_pixel(2, 1, image::Rgba([10, 20, 30, 40]));

        let color = color_image(&raster);
        assert_eq!(color.size, [3, 2]);
        assert_eq!(color.pixels[5], egui::Color32::from_rgba_unmultiplied(10, 20, 30, 40));
    }
}
