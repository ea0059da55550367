/// Resize and crop (Tools > Resize & Crop)

use image::imageops::{self, FilterType};
use image::{DynamicImage, Rgba, RgbaImage};
use std::fmt;
use std::path::{Path, PathBuf};
use tracing::info;

use super::{io, naming};
use crate::color;
use crate::error::{report, Outcome, SuiteError, SuiteResult};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResizeMode {
    Resize,
    Crop,
    SmartCrop,
    CanvasResize,
}

impl ResizeMode {
    pub const ALL: [ResizeMode; 4] = [
        ResizeMode::Resize,
        ResizeMode::Crop,
        ResizeMode::SmartCrop,
        ResizeMode::CanvasResize,
    ];

    pub fn label(self) -> &'static str {
        match self {
            ResizeMode::Resize => "Resize",
            ResizeMode::Crop => "Crop",
            ResizeMode::SmartCrop => "Smart Crop",
            ResizeMode::CanvasResize => "Canvas Resize",
        }
    }
}

impl fmt::Display for ResizeMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Resampling filter choices
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ResampleQuality {
    Nearest,
    #[default]
    Lanczos,
    Bilinear,
    Bicubic,
}

impl ResampleQuality {
    pub const ALL: [ResampleQuality; 4] = [
        ResampleQuality::Nearest,
        ResampleQuality::Lanczos,
        ResampleQuality::Bilinear,
        ResampleQuality::Bicubic,
    ];

    /// Parse a filter name; anything unknown means Lanczos
    pub fn parse(name: &str) -> Self {
        match name.trim().to_ascii_uppercase().as_str() {
            "NEAREST" => ResampleQuality::Nearest,
            "BILINEAR" => ResampleQuality::Bilinear,
            "BICUBIC" => ResampleQuality::Bicubic,
            _ => ResampleQuality::Lanczos,
        }
    }

    pub fn filter(self) -> FilterType {
        match self {
            ResampleQuality::Nearest => FilterType::Nearest,
            ResampleQuality::Lanczos => FilterType::Lanczos3,
            ResampleQuality::Bilinear => FilterType::Triangle,
            ResampleQuality::Bicubic => FilterType::CatmullRom,
        }
    }
}

impl fmt::Display for ResampleQuality {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            ResampleQuality::Nearest => "NEAREST",
            ResampleQuality::Lanczos => "LANCZOS",
            ResampleQuality::Bilinear => "BILINEAR",
            ResampleQuality::Bicubic => "BICUBIC",
        })
    }
}

/// Largest accepted width or height
pub const MAX_DIMENSION: u32 = 16384;

/// One resize/crop request
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ResizeRequest {
    pub mode: ResizeMode,
    pub width: u32,
    pub height: u32,
    pub maintain_ratio: bool,
    pub quality: ResampleQuality,
}

/// Largest size inside `max_w` x `max_h` with the source aspect ratio; never upscales
pub fn fit_within(width: u32, height: u32, max_w: u32, max_h: u32) -> (u32, u32) {
    if width <= max_w && height <= max_h {
        return (width, height);
    }
    let scale = (max_w as f64 / width as f64).min(max_h as f64 / height as f64);
    let w = ((width as f64 * scale).round() as u32).clamp(1, max_w);
    let h = ((height as f64 * scale).round() as u32).clamp(1, max_h);
    (w, h)
}

/// Centered crop; areas outside the source come out transparent black
fn center_crop(img: &DynamicImage, width: u32, height: u32) -> DynamicImage {
    let left = (img.width() as i64 - width as i64).div_euclid(2);
    let top = (img.height() as i64 - height as i64).div_euclid(2);
    let mut canvas = RgbaImage::new(width, height);
    imageops::replace(&mut canvas, &img.to_rgba8(), -left, -top);
    color::rewrap(img, canvas)
}

/// Crop to the target aspect ratio around the center, then scale to the exact size
fn smart_crop(img: &DynamicImage, width: u32, height: u32, filter: FilterType) -> DynamicImage {
    let target_ratio = width as f64 / height as f64;
    let (iw, ih) = (img.width(), img.height());
    let current_ratio = iw as f64 / ih as f64;

    let cropped = if current_ratio > target_ratio {
        let new_w = ((ih as f64 * target_ratio) as u32).clamp(1, iw);
        img.crop_imm((iw - new_w) / 2, 0, new_w, ih)
    } else {
        let new_h = ((iw as f64 / target_ratio) as u32).clamp(1, ih);
        img.crop_imm(0, (ih - new_h) / 2, iw, new_h)
    };
    cropped.resize_exact(width, height, filter)
}

/// Center the source on a white canvas of the requested size
fn canvas_resize(img: &DynamicImage, width: u32, height: u32) -> DynamicImage {
    let x = (width as i64 - img.width() as i64).div_euclid(2);
    let y = (height as i64 - img.height() as i64).div_euclid(2);
    let mut canvas = RgbaImage::from_pixel(width, height, Rgba([255, 255, 255, 255]));
    imageops::overlay(&mut canvas, &img.to_rgba8(), x, y);
    DynamicImage::ImageRgb8(DynamicImage::ImageRgba8(canvas).to_rgb8())
}

/// Run a request on an in-memory image
pub fn apply(img: &DynamicImage, request: &ResizeRequest) -> SuiteResult<DynamicImage> {
    if request.width == 0 || request.height == 0 {
        return Err(SuiteError::InvalidParameter(
            "Width and height must be positive".to_string(),
        ));
    }
    if request.width > MAX_DIMENSION || request.height > MAX_DIMENSION {
        return Err(SuiteError::InvalidParameter(format!(
            "Width and height must be at most {}",
            MAX_DIMENSION
        )));
    }
    let filter = request.quality.filter();
    let (w, h) = (request.width, request.height);

    Ok(match request.mode {
        ResizeMode::Resize if request.maintain_ratio => {
            let (fw, fh) = fit_within(img.width(), img.height(), w, h);
            if (fw, fh) == (img.width(), img.height()) {
                img.clone()
            } else {
                img.resize_exact(fw, fh, filter)
            }
        }
        ResizeMode::Resize => img.resize_exact(w, h, filter),
        ResizeMode::Crop => center_crop(img, w, h),
        ResizeMode::SmartCrop => smart_crop(img, w, h, filter),
        ResizeMode::CanvasResize => canvas_resize(img, w, h),
    })
}

fn resize(input: &Path, request: &ResizeRequest) -> SuiteResult<(PathBuf, String)> {
    let img = io::open(input)?;
    let original = (img.width(), img.height());
    let result = apply(&img, request)?;

    let out_path = naming::prefixed(input, &naming::slug(request.mode.label()));
    io::save(&result, &out_path)?;

    info!("{} {} -> {}x{}", request.mode, input.display(), result.width(), result.height());
    Ok((
        out_path,
        format!(
            "{} completed: {}×{} → {}×{}",
            request.mode,
            original.0,
            original.1,
            result.width(),
            result.height()
        ),
    ))
}

/// Resize or crop `input` and write `<mode>_<name>`
pub fn resize_crop_image(input: &Path, request: &ResizeRequest) -> Outcome {
    report("Processing error", resize(input, request))
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::{Rgb, RgbImage};

    fn request(mode: ResizeMode, width: u32, height: u32, maintain_ratio: bool) -> ResizeRequest {
        ResizeRequest {
            mode,
            width,
            height,
            maintain_ratio,
            quality: ResampleQuality::Lanczos,
        }
    }

    fn rgb(w: u32, h: u32) -> DynamicImage {
        DynamicImage::ImageRgb8(RgbImage::from_pixel(w, h, Rgb([40, 80, 120])))
    }

    #[test]
    fn test_resize_with_ratio_lock_preserves_aspect() {
        let out = apply(&rgb(200, 100), &request(ResizeMode::Resize, 50, 50, true)).unwrap();
        assert_eq!((out.width(), out.height()), (50, 25));
    }

    #[test]
    fn test_resize_with_ratio_lock_never_upscales() {
        let out = apply(&rgb(20, 10), &request(ResizeMode::Resize, 50, 50, true)).unwrap();
        assert_eq!((out.width(), out.height()), (20, 10));
    }

    #[test]
    fn test_resize_exact() {
        let out = apply(&rgb(200, 100), &request(ResizeMode::Resize, 50, 50, false)).unwrap();
        assert_eq!((out.width(), out.height()), (50, 50));
    }

    #[test]
    fn test_crop_larger_than_source_pads_black() {
        let out = apply(&rgb(10, 10), &request(ResizeMode::Crop, 20, 20, true))
            .unwrap()
            .to_rgb8();
        assert_eq!(out.dimensions(), (20, 20));
        assert_eq!(out.get_pixel(0, 0), &Rgb([0, 0, 0]));
        assert_eq!(out.get_pixel(10, 10), &Rgb([40, 80, 120]));
    }

    #[test]
    fn test_smart_crop_exact_size() {
        let out = apply(&rgb(300, 100), &request(ResizeMode::SmartCrop, 64, 64, true)).unwrap();
        assert_eq!((out.width(), out.height()), (64, 64));
    }

    #[test]
    fn test_canvas_resize_centers_on_white() {
        let out = apply(&rgb(4, 4), &request(ResizeMode::CanvasResize, 10, 8, true))
            .unwrap()
            .to_rgb8();
        assert_eq!(out.dimensions(), (10, 8));
        assert_eq!(out.get_pixel(0, 0), &Rgb([255, 255, 255]));
        assert_eq!(out.get_pixel(5, 4), &Rgb([40, 80, 120]));
    }

    #[test]
    fn test_zero_size_is_rejected() {
        assert!(apply(&rgb(4, 4), &request(ResizeMode::Resize, 0, 4, false)).is_err());
    }

    #[test]
    fn test_oversized_request_is_rejected() {
        let err = apply(&rgb(4, 4), &request(ResizeMode::CanvasResize, 100_000, 100_000, false))
            .unwrap_err();
        assert!(matches!(err, SuiteError::InvalidParameter(_)), "{:?}", err);
        assert!(apply(&rgb(4, 4), &request(ResizeMode::Crop, 4, MAX_DIMENSION + 1, false)).is_err());
    }

    #[test]
    fn test_oversized_request_status() {
        let dir = tempfile::tempdir().unwrap();
        let input = dir.path().join("small.png");
        rgb(4, 4).save(&input).unwrap();

        let outcome = resize_crop_image(&input, &request(ResizeMode::Crop, 100_000, 100_000, false));
        assert!(!outcome.is_success());
        assert!(outcome.status.ends_with("Width and height must be at most 16384"), "{}", outcome.status);
        assert!(!dir.path().join("crop_small.png").exists());
    }

    #[test]
    fn test_quality_parse_fallback() {
        assert_eq!(ResampleQuality::parse("bicubic"), ResampleQuality::Bicubic);
        assert_eq!(ResampleQuality::parse("HAMMING"), ResampleQuality::Lanczos);
    }

    #[test]
    fn test_resize_crop_image_status_and_name() {
        let dir = tempfile::tempdir().unwrap();
        let input = dir.path().join("wide.png");
        rgb(300, 100).save(&input).unwrap();

        let outcome = resize_crop_image(&input, &request(ResizeMode::SmartCrop, 64, 64, true));
        assert_eq!(outcome.status, "✅ Smart Crop completed: 300×100 → 64×64");
        assert_eq!(outcome.output, Some(dir.path().join("smart_crop_wide.png")));
    }
}
