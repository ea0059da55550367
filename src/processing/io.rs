/// Opening and saving images

use image::{DynamicImage, ImageFormat, Rgb, RgbImage};
use std::path::Path;
use tracing::debug;

use crate::error::{SuiteError, SuiteResult};

/// Open an image; an empty path means nothing was selected
pub fn open(path: &Path) -> SuiteResult<DynamicImage> {
    if path.as_os_str().is_empty() {
        return Err(SuiteError::MissingInput);
    }
    let img = image::open(path)?;
    debug!("Opened {} ({}x{})", path.display(), img.width(), img.height());
    Ok(img)
}

/// Composite over an opaque background, dropping alpha
pub fn flatten(img: &DynamicImage, background: [u8; 3]) -> DynamicImage {
    if !img.color().has_alpha() {
        return DynamicImage::ImageRgb8(img.to_rgb8());
    }
    let rgba = img.to_rgba8();
    let mut out = RgbImage::new(rgba.width(), rgba.height());
    for (x, y, px) in rgba.enumerate_pixels() {
        let a = px[3] as f32 / 255.0;
        let mix = |c: usize| (px[c] as f32 * a + background[c] as f32 * (1.0 - a)).round() as u8;
        out.put_pixel(x, y, Rgb([mix(0), mix(1), mix(2)]));
    }
    DynamicImage::ImageRgb8(out)
}

/// Save using the encoder implied by the extension
///
/// JPEG cannot carry alpha, so transparent images are flattened onto white first.
pub fn save(img: &DynamicImage, path: &Path) -> SuiteResult<()> {
    let format = ImageFormat::from_path(path)?;
    if format == ImageFormat::Jpeg && img.color().has_alpha() {
        flatten(img, [255, 255, 255]).save_with_format(path, format)?;
    } else {
        img.save_with_format(path, format)?;
    }
    debug!("Saved {}", path.display());
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::{Rgba, RgbaImage};

    #[test]
    fn test_open_empty_path_is_missing_input() {
        assert!(matches!(open(Path::new("")), Err(SuiteError::MissingInput)));
    }

    #[test]
    fn test_open_missing_file_errors() {
        assert!(open(Path::new("/definitely/not/here.png")).is_err());
    }

    #[test]
    fn test_flatten_transparent_onto_white() {
        let img = DynamicImage::ImageRgba8(RgbaImage::from_pixel(2, 2, Rgba([0, 0, 0, 0])));
        let flat = flatten(&img, [255, 255, 255]).to_rgb8();
        assert_eq!(flat.get_pixel(0, 0), &Rgb([255, 255, 255]));
    }

    #[test]
    fn test_save_rgba_as_jpeg() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("out.jpg");
        let img = DynamicImage::ImageRgba8(RgbaImage::from_pixel(8, 8, Rgba([10, 200, 30, 128])));
        save(&img, &path).unwrap();
        let reopened = image::open(&path).unwrap();
        assert_eq!((reopened.width(), reopened.height()), (8, 8));
        assert!(!reopened.color().has_alpha());
    }
}
