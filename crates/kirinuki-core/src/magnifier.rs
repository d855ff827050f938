//! Magnifier preview math.
//!
//! While a corner drag is active the host shows a small zoomed view of
//! the native pixels under the corner, floated above the pointer so
//! the finger or cursor never covers the pixels being adjusted. The
//! core computes which pixels to show, renders them to the preview
//! raster, and says where to anchor it; circle clipping, border, and
//! crosshair are host drawing.

use image::{RgbaImage, imageops};

use crate::placement::ImagePlacement;
use crate::types::{CropConfig, Dimensions, Point};

/// Integer region of the native raster, in pixel coordinates.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PixelRegion {
    /// Left edge.
    pub x: u32,
    /// Top edge.
    pub y: u32,
    /// Width in pixels.
    pub width: u32,
    /// Height in pixels.
    pub height: u32,
}

/// The native-raster region shown in the magnifier for a viewport
/// point.
///
/// The point maps through the placement to a pixel center; the crop
/// spans the preview size divided by the zoom factor, with its origin
/// clamped so the whole crop stays inside the raster. Near an image
/// edge the preview therefore slides off-center instead of showing
/// out-of-image area.
#[must_use]
pub fn preview_region(
    point: Point,
    placement: &ImagePlacement,
    config: &CropConfig,
) -> PixelRegion {
    let native = placement.native();
    let center = placement.to_pixel_space(point);

    let crop_width = (f64::from(config.magnifier_size.width) / config.magnifier_zoom)
        .min(f64::from(native.width));
    let crop_height = (f64::from(config.magnifier_size.height) / config.magnifier_zoom)
        .min(f64::from(native.height));

    let origin_x = (center.x - crop_width / 2.0)
        .max(0.0)
        .min(f64::from(native.width) - crop_width);
    let origin_y = (center.y - crop_height / 2.0)
        .max(0.0)
        .min(f64::from(native.height) - crop_height);

    #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
    let (x, y) = (origin_x as u32, origin_y as u32);
    #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
    let (width, height) = (crop_width as u32, crop_height as u32);

    PixelRegion {
        x,
        y,
        width,
        height,
    }
}

/// Crop the region out of the raster and resample it to the preview
/// size.
///
/// At zoom 1 away from the image edges the region already matches the
/// preview size and the crop is returned without resampling.
#[must_use]
pub fn render_preview(image: &RgbaImage, region: PixelRegion, size: Dimensions) -> RgbaImage {
    let crop = imageops::crop_imm(image, region.x, region.y, region.width, region.height);
    if region.width == size.width && region.height == size.height {
        return crop.to_image();
    }
    imageops::resize(&*crop, size.width, size.height, imageops::FilterType::Triangle)
}

/// Where the host centers the preview: the configured lift above the
/// pointer.
#[must_use]
pub fn anchor(point: Point, config: &CropConfig) -> Point {
    Point::new(point.x, point.y - config.magnifier_lift)
}

#[cfg(test)]
#[allow(
    clippy::unwrap_used,
    clippy::cast_possible_truncation,
    clippy::cast_sign_loss
)]
mod tests {
    use image::Rgba;

    use super::*;
    use crate::types::Rect;

    fn identity_placement(side: u32) -> ImagePlacement {
        ImagePlacement::compute(
            Rect::new(0.0, 0.0, f64::from(side), f64::from(side)),
            Dimensions::new(side, side),
        )
        .unwrap()
    }

    fn gradient(width: u32, height: u32) -> RgbaImage {
        RgbaImage::from_fn(width, height, |x, y| {
            Rgba([(x % 256) as u8, (y % 256) as u8, 0, 255])
        })
    }

    #[test]
    fn region_centers_on_an_interior_point() {
        let placement = identity_placement(400);
        let config = CropConfig::default();

        let region = preview_region(Point::new(200.0, 200.0), &placement, &config);
        assert_eq!(
            region,
            PixelRegion {
                x: 160,
                y: 160,
                width: 80,
                height: 80
            }
        );
    }

    #[test]
    fn region_maps_through_a_letterboxed_placement() {
        let placement =
            ImagePlacement::compute(Rect::new(0.0, 0.0, 400.0, 800.0), Dimensions::new(800, 400))
                .unwrap();
        let config = CropConfig::default();

        // Placement rect is (0, 300, 400, 200) at half scale, so this
        // viewport point is native pixel (200, 100).
        let region = preview_region(Point::new(100.0, 350.0), &placement, &config);
        assert_eq!(
            region,
            PixelRegion {
                x: 160,
                y: 60,
                width: 80,
                height: 80
            }
        );
    }

    #[test]
    fn region_slides_instead_of_leaving_the_raster() {
        let placement = identity_placement(400);
        let config = CropConfig::default();

        let top_left = preview_region(Point::new(0.0, 0.0), &placement, &config);
        assert_eq!((top_left.x, top_left.y), (0, 0));

        let bottom_right = preview_region(Point::new(400.0, 400.0), &placement, &config);
        assert_eq!((bottom_right.x, bottom_right.y), (320, 320));
        assert_eq!((bottom_right.width, bottom_right.height), (80, 80));
    }

    #[test]
    fn region_shrinks_to_a_small_raster() {
        let placement = identity_placement(50);
        let config = CropConfig::default();

        let region = preview_region(Point::new(25.0, 25.0), &placement, &config);
        assert_eq!(
            region,
            PixelRegion {
                x: 0,
                y: 0,
                width: 50,
                height: 50
            }
        );
    }

    #[test]
    fn zoom_narrows_the_source_region() {
        let placement = identity_placement(400);
        let config = CropConfig {
            magnifier_zoom: 2.0,
            ..CropConfig::default()
        };

        let region = preview_region(Point::new(200.0, 200.0), &placement, &config);
        assert_eq!((region.width, region.height), (40, 40));
        assert_eq!((region.x, region.y), (180, 180));
    }

    #[test]
    fn matching_region_renders_without_resampling() {
        let image = gradient(200, 200);
        let region = PixelRegion {
            x: 10,
            y: 20,
            width: 80,
            height: 80,
        };

        let preview = render_preview(&image, region, Dimensions::new(80, 80));
        assert_eq!(preview.dimensions(), (80, 80));
        assert_eq!(preview.get_pixel(0, 0), image.get_pixel(10, 20));
        assert_eq!(preview.get_pixel(79, 79), image.get_pixel(89, 99));
    }

    #[test]
    fn small_region_upscales_to_the_preview_size() {
        let image = gradient(50, 50);
        let region = PixelRegion {
            x: 0,
            y: 0,
            width: 50,
            height: 50,
        };

        let preview = render_preview(&image, region, Dimensions::new(80, 80));
        assert_eq!(preview.dimensions(), (80, 80));
    }

    #[test]
    fn anchor_floats_above_the_pointer() {
        let config = CropConfig::default();

        let lifted = anchor(Point::new(120.0, 300.0), &config);
        assert!((lifted.x - 120.0).abs() < 1e-9);
        assert!((lifted.y - 200.0).abs() < 1e-9);
    }
}
