//! Polygon extraction: Trim and Matte rasterization plus PNG encoding.
//!
//! Both modes render onto a canvas the size of the source raster and
//! fill the crop polygon with source pixels, anti-aliased along the
//! polygon edge. They differ only in what the rest of the canvas holds:
//! Trim leaves it fully transparent, Matte flattens it to opaque black.
//! Output is encoded as PNG, which Trim needs for its transparency;
//! for Matte the lossless encoding is the point.

use std::fmt;

use image::{ImageEncoder, Rgba, RgbaImage};
use serde::{Deserialize, Serialize};
use tiny_skia::{
    FillRule, FilterQuality, Paint, PathBuilder, Pattern, Pixmap, SpreadMode, Transform,
};

use crate::types::{ExtractError, Point};

/// What fills the canvas outside the crop polygon.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum CropMode {
    /// Fully transparent outside the polygon.
    Trim,
    /// Opaque black outside the polygon.
    Matte,
}

impl fmt::Display for CropMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Trim => f.write_str("Trim"),
            Self::Matte => f.write_str("Matte"),
        }
    }
}

/// Extract the polygon area of the source onto a same-size canvas.
///
/// `corners` are native pixel coordinates in the drawing order
/// top-left, top-right, bottom-right, bottom-left; the path is closed
/// back to the first corner. Corners may lie anywhere; the fill clips
/// to the canvas.
///
/// # Errors
///
/// Returns [`ExtractError::EmptySource`] when the source has a zero
/// dimension, and [`ExtractError::Canvas`] when a canvas of that size
/// cannot be allocated.
#[allow(clippy::cast_possible_truncation)]
pub fn extract(
    image: &RgbaImage,
    corners: [Point; 4],
    mode: CropMode,
) -> Result<RgbaImage, ExtractError> {
    let (width, height) = image.dimensions();
    if width == 0 || height == 0 {
        return Err(ExtractError::EmptySource);
    }

    let mut canvas = Pixmap::new(width, height).ok_or(ExtractError::Canvas { width, height })?;
    if mode == CropMode::Matte {
        canvas.fill(tiny_skia::Color::BLACK);
    }

    // tiny-skia blends premultiplied RGBA; the source buffer converts
    // on the way in and the canvas converts back on the way out.
    let mut source = Pixmap::new(width, height).ok_or(ExtractError::Canvas { width, height })?;
    let source_data = source.data_mut();
    for (i, pixel) in image.pixels().enumerate() {
        let off = i * 4;
        let Rgba([r, g, b, a]) = *pixel;
        source_data[off] = (u16::from(r) * u16::from(a) / 255) as u8;
        source_data[off + 1] = (u16::from(g) * u16::from(a) / 255) as u8;
        source_data[off + 2] = (u16::from(b) * u16::from(a) / 255) as u8;
        source_data[off + 3] = a;
    }

    let mut pb = PathBuilder::new();
    pb.move_to(corners[0].x as f32, corners[0].y as f32);
    for corner in &corners[1..] {
        pb.line_to(corner.x as f32, corner.y as f32);
    }
    pb.close();

    if let Some(path) = pb.finish() {
        let mut paint = Paint::default();
        paint.shader = Pattern::new(
            source.as_ref(),
            SpreadMode::Pad,
            FilterQuality::Nearest,
            1.0,
            Transform::identity(),
        );
        paint.anti_alias = true;
        canvas.fill_path(&path, &paint, FillRule::Winding, Transform::identity(), None);
    }

    // Un-premultiply: channel = premultiplied * 255 / alpha.
    let canvas_data = canvas.data();
    let mut output = RgbaImage::new(width, height);
    for (i, pixel) in output.pixels_mut().enumerate() {
        let off = i * 4;
        let a = canvas_data[off + 3];
        if a == 0 {
            *pixel = Rgba([0, 0, 0, 0]);
        } else {
            let r = u16::from(canvas_data[off]) * 255 / u16::from(a);
            let g = u16::from(canvas_data[off + 1]) * 255 / u16::from(a);
            let b = u16::from(canvas_data[off + 2]) * 255 / u16::from(a);
            *pixel = Rgba([r as u8, g as u8, b as u8, a]);
        }
    }

    Ok(output)
}

/// Encode a raster as PNG bytes.
///
/// # Errors
///
/// Returns [`ExtractError::Encode`] if PNG encoding fails.
pub fn encode_png(image: &RgbaImage) -> Result<Vec<u8>, ExtractError> {
    let mut png_bytes = Vec::new();
    let encoder = image::codecs::png::PngEncoder::new(&mut png_bytes);
    encoder.write_image(
        image.as_raw(),
        image.width(),
        image.height(),
        image::ExtendedColorType::Rgba8,
    )?;
    Ok(png_bytes)
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::cast_possible_truncation)]
mod tests {
    use super::*;

    fn gradient(width: u32, height: u32) -> RgbaImage {
        RgbaImage::from_fn(width, height, |x, y| {
            Rgba([(x * 5 % 256) as u8, (y * 5 % 256) as u8, 90, 255])
        })
    }

    fn full_frame(width: u32, height: u32) -> [Point; 4] {
        let (w, h) = (f64::from(width), f64::from(height));
        [
            Point::new(0.0, 0.0),
            Point::new(w, 0.0),
            Point::new(w, h),
            Point::new(0.0, h),
        ]
    }

    fn diamond() -> [Point; 4] {
        [
            Point::new(20.0, 2.0),
            Point::new(38.0, 20.0),
            Point::new(20.0, 38.0),
            Point::new(2.0, 20.0),
        ]
    }

    #[test]
    fn full_frame_trim_is_pixel_identical() {
        let image = gradient(64, 48);

        let output = extract(&image, full_frame(64, 48), CropMode::Trim).unwrap();
        assert_eq!(output.dimensions(), image.dimensions());
        assert!(output.as_raw() == image.as_raw());
    }

    #[test]
    fn trim_clears_outside_the_polygon() {
        let image = gradient(40, 40);

        let output = extract(&image, diamond(), CropMode::Trim).unwrap();
        assert_eq!(output.get_pixel(1, 1).0[3], 0);
        assert_eq!(output.get_pixel(38, 1).0[3], 0);
        assert_eq!(output.get_pixel(20, 20), image.get_pixel(20, 20));
    }

    #[test]
    fn matte_flattens_outside_to_opaque_black() {
        let image = gradient(40, 40);

        let output = extract(&image, diamond(), CropMode::Matte).unwrap();
        assert_eq!(output.get_pixel(1, 1), &Rgba([0, 0, 0, 255]));
        assert_eq!(output.get_pixel(20, 20), image.get_pixel(20, 20));
        assert!(output.pixels().all(|px| px.0[3] == 255));
    }

    #[test]
    fn degenerate_polygon_fills_nothing() {
        let image = gradient(16, 16);
        let collapsed = [Point::new(8.0, 8.0); 4];

        let trimmed = extract(&image, collapsed, CropMode::Trim).unwrap();
        assert!(trimmed.pixels().all(|px| px.0[3] == 0));

        let matted = extract(&image, collapsed, CropMode::Matte).unwrap();
        assert!(matted.pixels().all(|px| *px == Rgba([0, 0, 0, 255])));
    }

    #[test]
    fn empty_source_is_rejected() {
        let image = RgbaImage::new(0, 0);

        let result = extract(&image, full_frame(0, 0), CropMode::Trim);
        assert!(matches!(result, Err(ExtractError::EmptySource)));
    }

    #[test]
    fn encode_png_produces_a_decodable_png() {
        let image = gradient(32, 24);

        let png = encode_png(&image).unwrap();
        assert_eq!(&png[..8], b"\x89PNG\r\n\x1a\n");

        let decoded = image::load_from_memory(&png).unwrap().to_rgba8();
        assert_eq!(decoded.dimensions(), (32, 24));
        assert_eq!(decoded.get_pixel(31, 0), image.get_pixel(31, 0));
    }

    #[test]
    fn mode_labels_render_for_display() {
        assert_eq!(CropMode::Trim.to_string(), "Trim");
        assert_eq!(CropMode::Matte.to_string(), "Matte");
    }
}
