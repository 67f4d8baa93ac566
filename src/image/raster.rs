//! Raster loading and preparation for tracing.
//!
//! Alpha is flattened onto white, the image is resized so its longest edge
//! matches the target size, and the result is converted to grayscale.

use std::path::Path;

use image::imageops::{self, FilterType};
use image::{DynamicImage, GrayImage, Rgb, RgbImage};

use crate::error::IconError;

/// Load a raster image from disk.
pub fn load_raster(path: &Path) -> Result<DynamicImage, IconError> {
    let name = path.display().to_string();
    let img = image::open(path).map_err(|e| IconError::InvalidInputFile(name.clone(), e.to_string()))?;

    if img.width() == 0 || img.height() == 0 {
        return Err(IconError::InvalidInputFile(
            name,
            "image has zero width or height".to_string(),
        ));
    }
    Ok(img)
}

/// Fit `width`x`height` into a `size` pixel longest edge, keeping the aspect ratio.
///
/// The shorter edge is floored and never drops below one pixel. Returns
/// `None` for an empty source.
pub fn fit_dimensions(width: u32, height: u32, size: u32) -> Option<(u32, u32)> {
    if width == 0 || height == 0 || size == 0 {
        return None;
    }

    let (w, h, s) = (u64::from(width), u64::from(height), u64::from(size));
    // floor(s * h / w) <= s, so the narrowing is lossless.
    #[allow(clippy::cast_possible_truncation)]
    let fitted = if w > h {
        (size, (s * h / w).max(1) as u32)
    } else {
        ((s * w / h).max(1) as u32, size)
    };
    Some(fitted)
}

/// Prepare a decoded image for tracing.
///
/// Transparency is flattened onto white, the image is resized with a
/// Lanczos3 filter so its longest edge is `size`, then reduced to luminance.
pub fn prepare_raster(img: &DynamicImage, size: u32) -> Option<GrayImage> {
    let (width, height) = fit_dimensions(img.width(), img.height(), size)?;

    let flat = flatten_on_white(img);
    let resized = imageops::resize(&flat, width, height, FilterType::Lanczos3);
    Some(imageops::grayscale(&resized))
}

/// Composite every pixel over an opaque white background.
fn flatten_on_white(img: &DynamicImage) -> RgbImage {
    let rgba = img.to_rgba8();
    let (width, height) = rgba.dimensions();

    RgbImage::from_fn(width, height, |x, y| {
        let [r, g, b, a] = rgba.get_pixel(x, y).0;
        Rgb([over_white(r, a), over_white(g, a), over_white(b, a)])
    })
}

#[inline]
#[allow(clippy::cast_possible_truncation)] // weighted mean of two u8 values
fn over_white(channel: u8, alpha: u8) -> u8 {
    let (c, a) = (u16::from(channel), u16::from(alpha));
    ((c * a + 255 * (255 - a) + 127) / 255) as u8
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::{Rgba, RgbaImage};
    use std::fs;
    use tempfile::TempDir;

    #[test]
    fn test_fit_landscape_and_portrait() {
        assert_eq!(fit_dimensions(300, 100, 128), Some((128, 42)));
        assert_eq!(fit_dimensions(100, 300, 128), Some((42, 128)));
        assert_eq!(fit_dimensions(64, 64, 512), Some((512, 512)));
    }

    #[test]
    fn test_fit_clamps_to_one_pixel() {
        assert_eq!(fit_dimensions(10_000, 1, 32), Some((32, 1)));
        assert_eq!(fit_dimensions(1, 10_000, 32), Some((1, 32)));
    }

    #[test]
    fn test_fit_rejects_empty() {
        assert_eq!(fit_dimensions(0, 10, 32), None);
        assert_eq!(fit_dimensions(10, 0, 32), None);
        assert_eq!(fit_dimensions(10, 10, 0), None);
    }

    #[test]
    fn test_fit_longest_edge_and_aspect() {
        for (w, h) in [(1, 1), (3, 7), (640, 480), (17, 1000), (999, 998), (2, 1)] {
            for size in [32, 100, 512, 1024] {
                let (nw, nh) = fit_dimensions(w, h, size).unwrap();
                assert_eq!(nw.max(nh), size, "{w}x{h} -> {size}");

                let exact_short = f64::from(size) * f64::from(w.min(h)) / f64::from(w.max(h));
                let short = f64::from(nw.min(nh));
                assert!((short - exact_short).abs() < 1.0, "{w}x{h} -> {nw}x{nh}");
            }
        }
    }

    #[test]
    fn test_prepare_flattens_alpha_onto_white() {
        let mut img = RgbaImage::from_pixel(4, 4, Rgba([0, 0, 0, 0]));
        img.put_pixel(0, 0, Rgba([0, 0, 0, 255]));

        let flat = flatten_on_white(&DynamicImage::ImageRgba8(img));
        assert_eq!(flat.get_pixel(0, 0).0, [0, 0, 0]);
        assert_eq!(flat.get_pixel(3, 3).0, [255, 255, 255]);
    }

    #[test]
    fn test_prepare_resizes_to_gray() {
        let img = RgbaImage::from_pixel(40, 20, Rgba([0, 0, 0, 255]));
        let gray = prepare_raster(&DynamicImage::ImageRgba8(img), 64).unwrap();
        assert_eq!(gray.dimensions(), (64, 32));
        assert!(gray.pixels().all(|p| p.0[0] < 16));
    }

    #[test]
    fn test_load_rejects_garbage() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("broken.png");
        fs::write(&path, b"definitely not a png").unwrap();

        let err = load_raster(&path).unwrap_err();
        assert!(matches!(err, IconError::InvalidInputFile(ref name, _) if name.contains("broken.png")));
    }

    #[test]
    fn test_load_round_trips_png() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("dot.png");
        RgbaImage::from_pixel(5, 3, Rgba([10, 20, 30, 255]))
            .save(&path)
            .unwrap();

        let img = load_raster(&path).unwrap();
        assert_eq!((img.width(), img.height()), (5, 3));
    }
}
