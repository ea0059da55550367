/// Android launcher icon generation
///
/// Generates every launcher density from one source image in a single pass:
/// - mdpi: 48px
/// - hdpi: 72px
/// - xhdpi: 96px
/// - xxhdpi: 144px
/// - xxxhdpi: 192px

use image::imageops::FilterType;
use image::{DynamicImage, ImageFormat};
use std::fs::File;
use std::io::{Cursor, Write};
use std::path::{Path, PathBuf};
use tracing::{debug, info};
use zip::write::SimpleFileOptions;
use zip::{CompressionMethod, ZipWriter};

use super::{io, naming};
use crate::error::{report, Outcome, SuiteResult};

/// Density bucket and square edge length in pixels
pub const ANDROID_ICON_SIZES: [(&str, u32); 5] = [
    ("mdpi", 48),
    ("hdpi", 72),
    ("xhdpi", 96),
    ("xxhdpi", 144),
    ("xxxhdpi", 192),
];

/// Archive entry name for a density
pub fn entry_name(density: &str) -> String {
    format!("ic_launcher_{}.png", density)
}

/// Encode a single density icon as PNG bytes
fn encode_icon(img: &DynamicImage, size: u32) -> SuiteResult<Vec<u8>> {
    let icon = img.resize_exact(size, size, FilterType::Lanczos3);
    let mut bytes = Cursor::new(Vec::new());
    icon.write_to(&mut bytes, ImageFormat::Png)?;
    Ok(bytes.into_inner())
}

fn make_icons(input: &Path) -> SuiteResult<(PathBuf, String)> {
    let img = io::open(input)?;
    let archive = naming::icon_archive(input);

    let mut zip = ZipWriter::new(File::create(&archive)?);
    let options = SimpleFileOptions::default().compression_method(CompressionMethod::Deflated);
    for (density, size) in ANDROID_ICON_SIZES {
        let bytes = encode_icon(&img, size)?;
        zip.start_file(entry_name(density), options)?;
        zip.write_all(&bytes)?;
        debug!("   → {}px icon: {}", size, entry_name(density));
    }
    zip.finish()?;

    info!("Packed {} Android icons into {}", ANDROID_ICON_SIZES.len(), archive.display());
    let message = format!(
        "Generated {} Android icons in {}",
        ANDROID_ICON_SIZES.len(),
        archive.display()
    );
    Ok((archive, message))
}

/// Pack all launcher densities into `<stem>_android_icons.zip`
pub fn make_android_icons(input: &Path) -> Outcome {
    report("Icon error", make_icons(input))
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::{Rgba, RgbaImage};
    use std::io::Read;

    #[test]
    fn test_all_densities_archived() {
        let dir = tempfile::tempdir().unwrap();
        let input = dir.path().join("logo.png");
        RgbaImage::from_pixel(512, 512, Rgba([0, 120, 255, 255])).save(&input).unwrap();

        let outcome = make_android_icons(&input);
        assert!(outcome.is_success(), "{}", outcome.status);
        let archive_path = outcome.output.unwrap();
        assert_eq!(archive_path, dir.path().join("logo_android_icons.zip"));

        let mut archive = zip::ZipArchive::new(File::open(&archive_path).unwrap()).unwrap();
        assert_eq!(archive.len(), ANDROID_ICON_SIZES.len());
        for (density, size) in ANDROID_ICON_SIZES {
            let mut bytes = Vec::new();
            archive
                .by_name(&entry_name(density))
                .unwrap()
                .read_to_end(&mut bytes)
                .unwrap();
            let icon = image::load_from_memory_with_format(&bytes, ImageFormat::Png).unwrap();
            assert_eq!((icon.width(), icon.height()), (size, size));
        }
    }

    #[test]
    fn test_missing_source() {
        let outcome = make_android_icons(Path::new(""));
        assert_eq!(outcome.status, "❌ Please upload an image");
    }
}
