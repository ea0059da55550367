/// Custom filter pass (Tools > Custom Filters)

use std::path::{Path, PathBuf};
use tracing::info;

use super::{io, naming};
use crate::color;
use crate::error::{report, Outcome, SuiteResult};
use crate::state::params::FilterParams;

/// Apply the non-zero adjustments in order: brightness, contrast, saturation, hue
pub fn apply(img: &image::DynamicImage, params: &FilterParams) -> image::DynamicImage {
    let mut img = img.clone();
    if params.brightness != 0 {
        img = color::brightness(&img, FilterParams::factor(params.brightness));
    }
    if params.contrast != 0 {
        img = color::contrast(&img, FilterParams::factor(params.contrast));
    }
    if params.saturation != 0 {
        img = color::color(&img, FilterParams::factor(params.saturation));
    }
    if params.hue != 0 && !is_grayscale(&img) {
        img = color::rotate_hue(&img, params.hue as f32);
    }
    img
}

/// Hue is meaningless for single-channel images
fn is_grayscale(img: &image::DynamicImage) -> bool {
    !img.color().has_color()
}

fn filter(input: &Path, params: &FilterParams) -> SuiteResult<(PathBuf, String)> {
    let img = io::open(input)?;
    let result = apply(&img, params);

    let out_path = naming::prefixed(input, "filtered");
    io::save(&result, &out_path)?;

    info!("Custom filter {:?} applied to {}", params, input.display());
    Ok((out_path, "Custom filter applied successfully".to_string()))
}

/// Apply the custom filter sliders and write `filtered_<name>`
pub fn apply_custom_filter(input: &Path, params: &FilterParams) -> Outcome {
    report("Filter error", filter(input, params))
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::{DynamicImage, Rgb, RgbImage, Rgba, RgbaImage};

    #[test]
    fn test_neutral_params_leave_pixels() {
        let img = DynamicImage::ImageRgb8(RgbImage::from_pixel(5, 5, Rgb([10, 120, 240])));
        let out = apply(&img, &FilterParams::default());
        assert_eq!(out.to_rgb8(), img.to_rgb8());
    }

    #[test]
    fn test_hue_shift_applies_to_rgba() {
        let img = DynamicImage::ImageRgba8(RgbaImage::from_pixel(3, 3, Rgba([255, 0, 0, 90])));
        let out = apply(&img, &FilterParams::new(0, 0, 0, 120)).to_rgba8();
        let p = out.get_pixel(1, 1);
        assert!(p[1] >= 254 && p[0] <= 1, "got {:?}", p);
        assert_eq!(p[3], 90);
    }

    #[test]
    fn test_full_desaturation() {
        let img = DynamicImage::ImageRgb8(RgbImage::from_pixel(2, 2, Rgb([250, 20, 20])));
        let out = apply(&img, &FilterParams::new(0, 0, -100, 0)).to_rgb8();
        let p = out.get_pixel(0, 0);
        assert!(p[0] == p[1] && p[1] == p[2]);
    }

    #[test]
    fn test_apply_custom_filter_writes_file() {
        let dir = tempfile::tempdir().unwrap();
        let input = dir.path().join("shot.png");
        RgbImage::from_pixel(4, 4, Rgb([90, 90, 90])).save(&input).unwrap();

        let outcome = apply_custom_filter(&input, &FilterParams::new(20, 0, 0, 0));
        assert_eq!(outcome.status, "✅ Custom filter applied successfully");
        assert_eq!(outcome.output, Some(dir.path().join("filtered_shot.png")));
    }

    #[test]
    fn test_no_input() {
        let outcome = apply_custom_filter(Path::new(""), &FilterParams::default());
        assert_eq!(outcome.status, "❌ Please upload an image");
    }
}
