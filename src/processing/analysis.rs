/// Image analysis (Tools > Image Analysis)
///
/// Reports basic facts about an image plus an RGB histogram for the
/// histogram canvas. Nothing is written to disk.

use image::{ColorType, DynamicImage, ImageReader};
use serde::Serialize;
use serde_json::{json, Value};
use std::path::Path;
use tracing::error;

use crate::error::{SuiteError, SuiteResult};

/// Average color of the RGB channels
#[derive(Serialize, Debug, Clone, Copy, PartialEq, Eq)]
pub struct AverageColor {
    pub red: u8,
    pub green: u8,
    pub blue: u8,
}

#[derive(Serialize, Debug, Clone, PartialEq)]
pub struct ImageAnalysis {
    pub dimensions: String,
    pub format: String,
    pub mode: String,
    pub file_size: String,
    pub has_transparency: bool,
    pub color_palette: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub average_color: Option<AverageColor>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub brightness: Option<u8>,
    /// Per-channel 256-bin histogram: [R, G, B]
    #[serde(skip)]
    pub histogram: Box<[[u32; 256]; 3]>,
}

/// Short name for a pixel layout ("RGB", "RGBA", "L", ...)
pub fn mode_name(color: ColorType) -> &'static str {
    match color {
        ColorType::L8 => "L",
        ColorType::La8 => "LA",
        ColorType::Rgb8 => "RGB",
        ColorType::Rgba8 => "RGBA",
        ColorType::L16 => "I;16",
        ColorType::La16 => "LA;16",
        ColorType::Rgb16 => "RGB;16",
        ColorType::Rgba16 => "RGBA;16",
        ColorType::Rgb32F => "RGB;F",
        ColorType::Rgba32F => "RGBA;F",
        _ => "Unknown",
    }
}

/// RGB histogram of an image
pub fn histogram(img: &DynamicImage) -> Box<[[u32; 256]; 3]> {
    let mut data = Box::new([[0u32; 256]; 3]);
    for px in img.to_rgb8().pixels() {
        for c in 0..3 {
            data[c][px[c] as usize] += 1;
        }
    }
    data
}

/// Channel means and overall brightness over the RGB channels
fn averages(img: &DynamicImage) -> (AverageColor, u8) {
    let rgb = img.to_rgb8();
    let count = (rgb.width() as u64 * rgb.height() as u64).max(1);
    let mut sums = [0u64; 3];
    for px in rgb.pixels() {
        for c in 0..3 {
            sums[c] += px[c] as u64;
        }
    }
    let mean = |sum: u64| (sum / count) as u8;
    let brightness = ((sums[0] + sums[1] + sums[2]) / (count * 3)) as u8;
    (
        AverageColor {
            red: mean(sums[0]),
            green: mean(sums[1]),
            blue: mean(sums[2]),
        },
        brightness,
    )
}

pub fn analyze(path: &Path) -> SuiteResult<ImageAnalysis> {
    if path.as_os_str().is_empty() {
        return Err(SuiteError::MissingInput);
    }
    let reader = ImageReader::open(path)?.with_guessed_format()?;
    let format = reader
        .format()
        .map(|f| format!("{:?}", f).to_uppercase())
        .unwrap_or_else(|| "UNKNOWN".to_string());
    let img = reader.decode()?;
    let size_kb = std::fs::metadata(path)?.len() as f64 / 1024.0;

    let color = img.color();
    let (average_color, brightness) = match color {
        ColorType::Rgb8 | ColorType::Rgba8 => {
            let (avg, brightness) = averages(&img);
            (Some(avg), Some(brightness))
        }
        _ => (None, None),
    };

    Ok(ImageAnalysis {
        dimensions: format!("{} x {}", img.width(), img.height()),
        format,
        mode: mode_name(color).to_string(),
        file_size: format!("{:.1} KB", size_kb),
        has_transparency: color.has_alpha(),
        color_palette: "N/A".to_string(),
        average_color,
        brightness,
        histogram: histogram(&img),
    })
}

/// Analysis as JSON for display; failures become an `error` field
pub fn analyze_image(path: &Path) -> (Value, Option<ImageAnalysis>) {
    match analyze(path) {
        Ok(analysis) => {
            let value = serde_json::to_value(&analysis)
                .unwrap_or_else(|e| json!({ "error": format!("Analysis failed: {}", e) }));
            (value, Some(analysis))
        }
        Err(SuiteError::MissingInput) => (json!({ "error": "No image provided" }), None),
        Err(e) => {
            error!("Image analysis failed: {}", e);
            (json!({ "error": format!("Analysis failed: {}", e) }), None)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::{Rgb, RgbImage, Rgba, RgbaImage};

    #[test]
    fn test_rgb_analysis() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("red.png");
        RgbImage::from_pixel(20, 10, Rgb([200, 100, 0])).save(&path).unwrap();

        let analysis = analyze(&path).unwrap();
        assert_eq!(analysis.dimensions, "20 x 10");
        assert_eq!(analysis.format, "PNG");
        assert_eq!(analysis.mode, "RGB");
        assert!(!analysis.has_transparency);
        assert_eq!(
            analysis.average_color,
            Some(AverageColor { red: 200, green: 100, blue: 0 })
        );
        assert_eq!(analysis.brightness, Some(100));
        assert_eq!(analysis.histogram[0][200], 200);
        assert!(analysis.file_size.ends_with(" KB"));
    }

    #[test]
    fn test_rgba_reports_transparency() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("alpha.png");
        RgbaImage::from_pixel(4, 4, Rgba([0, 0, 0, 10])).save(&path).unwrap();

        let (value, analysis) = analyze_image(&path);
        assert!(analysis.is_some());
        assert_eq!(value["mode"], "RGBA");
        assert_eq!(value["has_transparency"], true);
        assert!(value.get("histogram").is_none());
    }

    #[test]
    fn test_errors_as_json() {
        let (value, analysis) = analyze_image(Path::new(""));
        assert_eq!(value, json!({ "error": "No image provided" }));
        assert!(analysis.is_none());

        let (value, _) = analyze_image(Path::new("/missing/file.png"));
        assert!(value["error"].as_str().unwrap().starts_with("Analysis failed:"));
    }
}
