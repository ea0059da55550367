/// Named enhancement recipes
///
/// Each recipe is a fixed sequence of adjustments scaled by a single
/// intensity value from the Enhance tab (0.1 to 2.0, default 1.0).

use image::imageops::{self, FilterType};
use image::{DynamicImage, GrayImage, Luma, Rgb, RgbImage, Rgba};
use std::fmt;
use std::path::{Path, PathBuf};
use tracing::info;

use super::{io, naming};
use crate::color;
use crate::error::{report, Outcome, SuiteResult};

pub const DEFAULT_INTENSITY: f32 = 1.0;
pub const INTENSITY_RANGE: (f32, f32) = (0.1, 2.0);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Enhancement {
    SuperResolution,
    NoiseReduction,
    ColorEnhancement,
    BrightnessContrast,
    Sharpening,
    Hdr,
    Vintage,
    BlackAndWhite,
    Sepia,
    Vignette,
    BlurBackground,
}

impl Enhancement {
    pub const ALL: [Enhancement; 11] = [
        Enhancement::SuperResolution,
        Enhancement::NoiseReduction,
        Enhancement::ColorEnhancement,
        Enhancement::BrightnessContrast,
        Enhancement::Sharpening,
        Enhancement::Hdr,
        Enhancement::Vintage,
        Enhancement::BlackAndWhite,
        Enhancement::Sepia,
        Enhancement::Vignette,
        Enhancement::BlurBackground,
    ];

    pub fn label(self) -> &'static str {
        match self {
            Enhancement::SuperResolution => "AI Super Resolution",
            Enhancement::NoiseReduction => "Noise Reduction",
            Enhancement::ColorEnhancement => "Color Enhancement",
            Enhancement::BrightnessContrast => "Brightness/Contrast",
            Enhancement::Sharpening => "Sharpening",
            Enhancement::Hdr => "HDR Effect",
            Enhancement::Vintage => "Vintage Filter",
            Enhancement::BlackAndWhite => "Black & White",
            Enhancement::Sepia => "Sepia",
            Enhancement::Vignette => "Vignette",
            Enhancement::BlurBackground => "Blur Background",
        }
    }

    /// Run the recipe on an in-memory image
    pub fn apply(self, img: &DynamicImage, intensity: f32) -> DynamicImage {
        match self {
            Enhancement::SuperResolution => {
                img.resize_exact(img.width() * 2, img.height() * 2, FilterType::Lanczos3)
            }
            Enhancement::NoiseReduction => {
                let denoised = imageproc::filter::median_filter(&img.to_rgba8(), 1, 1);
                color::rewrap(img, denoised)
            }
            Enhancement::ColorEnhancement => color::color(img, 1.0 + intensity * 0.5),
            Enhancement::BrightnessContrast => {
                let brighter = color::brightness(img, 1.0 + intensity * 0.2);
                color::contrast(&brighter, 1.0 + intensity * 0.3)
            }
            Enhancement::Sharpening => color::sharpness(img, 1.0 + intensity),
            Enhancement::Hdr => hdr(img, intensity),
            Enhancement::Vintage => {
                let img = color::contrast(img, 0.8);
                let img = color::brightness(&img, 1.1);
                color::color(&img, 0.7)
            }
            Enhancement::BlackAndWhite => {
                DynamicImage::ImageRgb8(color::grayscale(img).to_rgb8())
            }
            Enhancement::Sepia => DynamicImage::ImageRgb8(
                color::colorize(img, color::SEPIA_DARK, color::SEPIA_LIGHT).to_rgb8(),
            ),
            Enhancement::Vignette => vignette(img, intensity),
            Enhancement::BlurBackground => blur_background(img, intensity),
        }
    }
}

impl fmt::Display for Enhancement {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Gamma lift: every channel becomes `v^(0.5 + intensity*0.3)` on 0..1
fn hdr(img: &DynamicImage, intensity: f32) -> DynamicImage {
    let gamma = 0.5 + intensity * 0.3;
    color::map_rgb(img, |rgb| rgb.map(|c| ((c as f32 / 255.0).powf(gamma) * 255.0) as u8))
}

/// Radial opacity mask: 255 at the center, falling off linearly with distance
///
/// `alpha = max(0, 255 - trunc(255 * dist / max_dist * intensity))` where
/// `max_dist` is the distance from the center to the nearest edge.
pub fn vignette_mask(width: u32, height: u32, intensity: f32) -> GrayImage {
    let cx = (width / 2) as f64;
    let cy = (height / 2) as f64;
    let max_dist = cx.min(cy).max(1.0);
    let intensity = intensity as f64;

    GrayImage::from_fn(width, height, |x, y| {
        let dist = ((x as f64 - cx).powi(2) + (y as f64 - cy).powi(2)).sqrt();
        let falloff = (255.0 * dist / max_dist * intensity).trunc() as i64;
        Luma([(255 - falloff).clamp(0, 255) as u8])
    })
}

/// Darken towards the edges by compositing over black through the mask
fn vignette(img: &DynamicImage, intensity: f32) -> DynamicImage {
    let rgb = img.to_rgb8();
    let mask = vignette_mask(rgb.width(), rgb.height(), intensity);
    let out = RgbImage::from_fn(rgb.width(), rgb.height(), |x, y| {
        let a = mask.get_pixel(x, y)[0] as u32;
        let p = rgb.get_pixel(x, y);
        Rgb([0, 1, 2].map(|c| ((p[c] as u32 * a + 127) / 255) as u8))
    });
    DynamicImage::ImageRgb8(out)
}

/// Keep the center sharp and blend in a blurred copy towards the edges
fn blur_background(img: &DynamicImage, intensity: f32) -> DynamicImage {
    let src = img.to_rgba8();
    let blurred = imageops::blur(&src, 2.0 + 4.0 * intensity);
    let mask = vignette_mask(src.width(), src.height(), intensity);

    let mut out = src.clone();
    for (x, y, px) in out.enumerate_pixels_mut() {
        let a = mask.get_pixel(x, y)[0] as f32 / 255.0;
        let s = src.get_pixel(x, y);
        let b = blurred.get_pixel(x, y);
        let mix = |c: usize| (s[c] as f32 * a + b[c] as f32 * (1.0 - a)).round() as u8;
        *px = Rgba([mix(0), mix(1), mix(2), s[3]]);
    }
    color::rewrap(img, out)
}

fn enhance(input: &Path, kind: Enhancement, intensity: f32) -> SuiteResult<(PathBuf, String)> {
    let img = io::open(input)?;
    let result = kind.apply(&img, intensity);

    let out_path = naming::prefixed(input, "enhanced");
    io::save(&result, &out_path)?;

    info!("Applied {} (intensity {:.1}) to {}", kind, intensity, input.display());
    Ok((out_path, format!("Applied {} enhancement", kind)))
}

/// Apply one named enhancement and write `enhanced_<name>`
pub fn enhance_image(input: &Path, kind: Enhancement, intensity: f32) -> Outcome {
    report("Enhancement error", enhance(input, kind, intensity))
}
