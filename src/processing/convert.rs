/// Format conversion
///
/// Re-encodes an image into one of the target formats offered by the Format
/// tab. Pixels are first prepared for the target: formats without alpha get
/// a white background, PNG always carries alpha, TIFF keeps whatever it got.

use image::codecs::jpeg::JpegEncoder;
use image::codecs::png::{CompressionType, FilterType as PngFilter, PngEncoder};
use image::codecs::webp::WebPEncoder;
use image::imageops::FilterType;
use image::{DynamicImage, ImageFormat};
use std::fmt;
use std::fs::File;
use std::io::BufWriter;
use std::path::{Path, PathBuf};
use tracing::info;

use super::{io, naming, resize};
use crate::error::{report, Outcome, SuiteError, SuiteResult};

/// Default JPEG quality
pub const DEFAULT_QUALITY: u8 = 95;

/// Largest edge an ICO entry can hold
pub const ICO_MAX_SIDE: u32 = 256;

/// Target formats listed in the Format tab
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputFormat {
    Jpeg,
    Jpg,
    Png,
    Bmp,
    Tiff,
    Tif,
    Webp,
    Gif,
    Ico,
    Eps,
    Pdf,
    Psd,
    Svg,
    Heic,
    Avif,
    Jxl,
}

impl OutputFormat {
    pub const ALL: [OutputFormat; 16] = [
        OutputFormat::Jpeg,
        OutputFormat::Jpg,
        OutputFormat::Png,
        OutputFormat::Bmp,
        OutputFormat::Tiff,
        OutputFormat::Tif,
        OutputFormat::Webp,
        OutputFormat::Gif,
        OutputFormat::Ico,
        OutputFormat::Eps,
        OutputFormat::Pdf,
        OutputFormat::Psd,
        OutputFormat::Svg,
        OutputFormat::Heic,
        OutputFormat::Avif,
        OutputFormat::Jxl,
    ];

    pub fn name(self) -> &'static str {
        match self {
            OutputFormat::Jpeg => "JPEG",
            OutputFormat::Jpg => "JPG",
            OutputFormat::Png => "PNG",
            OutputFormat::Bmp => "BMP",
            OutputFormat::Tiff => "TIFF",
            OutputFormat::Tif => "TIF",
            OutputFormat::Webp => "WEBP",
            OutputFormat::Gif => "GIF",
            OutputFormat::Ico => "ICO",
            OutputFormat::Eps => "EPS",
            OutputFormat::Pdf => "PDF",
            OutputFormat::Psd => "PSD",
            OutputFormat::Svg => "SVG",
            OutputFormat::Heic => "HEIC",
            OutputFormat::Avif => "AVIF",
            OutputFormat::Jxl => "JXL",
        }
    }

    /// Encoder for this format, if the image crate can write it
    pub fn encoder_format(self) -> Option<ImageFormat> {
        match self {
            OutputFormat::Jpeg | OutputFormat::Jpg => Some(ImageFormat::Jpeg),
            OutputFormat::Png => Some(ImageFormat::Png),
            OutputFormat::Bmp => Some(ImageFormat::Bmp),
            OutputFormat::Tiff | OutputFormat::Tif => Some(ImageFormat::Tiff),
            OutputFormat::Webp => Some(ImageFormat::WebP),
            OutputFormat::Gif => Some(ImageFormat::Gif),
            OutputFormat::Ico => Some(ImageFormat::Ico),
            OutputFormat::Avif => Some(ImageFormat::Avif),
            OutputFormat::Eps
            | OutputFormat::Pdf
            | OutputFormat::Psd
            | OutputFormat::Svg
            | OutputFormat::Heic
            | OutputFormat::Jxl => None,
        }
    }

    /// Convert the pixel layout to what this format should receive
    ///
    /// ICO output is scaled down to fit 256x256.
    pub fn prepare(self, img: DynamicImage) -> DynamicImage {
        match self {
            OutputFormat::Jpeg | OutputFormat::Jpg | OutputFormat::Bmp | OutputFormat::Pdf => {
                io::flatten(&img, [255, 255, 255])
            }
            OutputFormat::Png => DynamicImage::ImageRgba8(img.to_rgba8()),
            OutputFormat::Tiff | OutputFormat::Tif => img,
            OutputFormat::Ico => {
                let (w, h) = resize::fit_within(img.width(), img.height(), ICO_MAX_SIDE, ICO_MAX_SIDE);
                let img = if (w, h) == (img.width(), img.height()) {
                    img
                } else {
                    img.resize_exact(w, h, FilterType::Lanczos3)
                };
                DynamicImage::ImageRgba8(img.to_rgba8())
            }
            _ => DynamicImage::ImageRgb8(img.to_rgb8()),
        }
    }
}

impl fmt::Display for OutputFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Encode `img` to `path` in `format`
fn encode(img: &DynamicImage, path: &Path, format: ImageFormat, quality: u8) -> SuiteResult<()> {
    let mut writer = BufWriter::new(File::create(path)?);
    match format {
        ImageFormat::Jpeg => {
            img.write_with_encoder(JpegEncoder::new_with_quality(&mut writer, quality))?
        }
        ImageFormat::Png => img.write_with_encoder(PngEncoder::new_with_quality(
            &mut writer,
            CompressionType::Best,
            PngFilter::Adaptive,
        ))?,
        ImageFormat::WebP => img.write_with_encoder(WebPEncoder::new_lossless(&mut writer))?,
        other => img.write_to(&mut writer, other)?,
    }
    Ok(())
}

fn convert(input: &Path, format: OutputFormat, quality: u8) -> SuiteResult<(PathBuf, String)> {
    let img = io::open(input)?;
    let encoder_format = format
        .encoder_format()
        .ok_or_else(|| SuiteError::Unsupported(format!("Unsupported output format: {}", format)))?;

    let prepared = format.prepare(img);
    let out_path = naming::converted(input, format.name());
    encode(&prepared, &out_path, encoder_format, quality.clamp(1, 100))?;

    info!("Converted {} to {}", input.display(), format);
    Ok((out_path, format!("Converted to {}", format)))
}

/// Convert `input` into `format`
///
/// `quality` only affects JPEG output.
pub fn convert_image(input: &Path, format: OutputFormat, quality: u8) -> Outcome {
    report("Error", convert(input, format, quality))
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::{GenericImageView, Rgba, RgbaImage};

    fn write_rgba_png(dir: &Path) -> PathBuf {
        let path = dir.join("sample.png");
        let mut img = RgbaImage::from_pixel(100, 100, Rgba([200, 30, 30, 255]));
        for y in 0..16 {
            for x in 0..16 {
                img.put_pixel(x, y, Rgba([0, 0, 0, 0]));
            }
        }
        img.save(&path).unwrap();
        path
    }

    #[test]
    fn test_rgba_png_to_jpeg_keeps_dimensions() {
        let dir = tempfile::tempdir().unwrap();
        let input = write_rgba_png(dir.path());

        let outcome = convert_image(&input, OutputFormat::Jpeg, 80);
        assert_eq!(outcome.status, "✅ Converted to JPEG");

        let output = outcome.output.unwrap();
        assert_eq!(output, dir.path().join("sample.jpeg"));
        assert_eq!(image::ImageFormat::from_path(&output).unwrap(), ImageFormat::Jpeg);
        let decoded = image::open(&output).unwrap();
        assert_eq!(decoded.dimensions(), (100, 100));
        // Transparent corner block was composited onto white
        let corner = decoded.to_rgb8().get_pixel(4, 4).0;
        assert!(corner.iter().all(|&c| c > 230), "corner was {:?}", corner);
    }

    #[test]
    fn test_png_output_has_alpha() {
        let dir = tempfile::tempdir().unwrap();
        let input = dir.path().join("plain.bmp");
        image::RgbImage::from_pixel(10, 6, image::Rgb([1, 2, 3])).save(&input).unwrap();

        let outcome = convert_image(&input, OutputFormat::Png, DEFAULT_QUALITY);
        assert!(outcome.is_success());
        let decoded = image::open(outcome.output.unwrap()).unwrap();
        assert!(decoded.color().has_alpha());
        assert_eq!(decoded.dimensions(), (10, 6));
    }

    #[test]
    fn test_large_image_to_ico_is_scaled_down() {
        let dir = tempfile::tempdir().unwrap();
        let input = dir.path().join("photo.png");
        image::RgbImage::from_pixel(800, 600, image::Rgb([10, 90, 160])).save(&input).unwrap();

        let outcome = convert_image(&input, OutputFormat::Ico, DEFAULT_QUALITY);
        assert_eq!(outcome.status, "✅ Converted to ICO");
        let decoded = image::open(outcome.output.unwrap()).unwrap();
        assert_eq!(decoded.dimensions(), (256, 192));
    }

    #[test]
    fn test_small_image_to_ico_keeps_size() {
        let img = DynamicImage::ImageRgb8(image::RgbImage::new(32, 16));
        let prepared = OutputFormat::Ico.prepare(img);
        assert_eq!(prepared.dimensions(), (32, 16));
        assert!(prepared.color().has_alpha());
    }

    #[test]
    fn test_unsupported_format_reports_error() {
        let dir = tempfile::tempdir().unwrap();
        let input = write_rgba_png(dir.path());

        let outcome = convert_image(&input, OutputFormat::Psd, DEFAULT_QUALITY);
        assert_eq!(outcome.status, "❌ Error: Unsupported output format: PSD");
        assert!(outcome.output.is_none());
    }

    #[test]
    fn test_missing_file_reports_error() {
        let outcome = convert_image(Path::new("/no/such/image.png"), OutputFormat::Png, 90);
        assert!(outcome.status.starts_with("❌ Error:"));
    }
}
