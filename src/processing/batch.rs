/// Batch processing
///
/// Runs one fixed recipe over many files, one after another. Folders in the
/// selection are walked recursively and contribute every image file found.

use std::fmt;
use std::path::{Path, PathBuf};
use tracing::info;
use walkdir::WalkDir;

use super::convert::{self, OutputFormat, DEFAULT_QUALITY};
use super::enhance::{self, Enhancement, DEFAULT_INTENSITY};
use crate::background::{self, Segmenter};
use crate::error::{describe, Outcome, SuiteResult, FAILURE};

/// Extensions picked up when walking a folder
pub const IMAGE_EXTENSIONS: [&str; 10] = [
    "png", "jpg", "jpeg", "bmp", "tif", "tiff", "webp", "gif", "ico", "avif",
];

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum BatchOperation {
    #[default]
    FormatConversion,
    Enhancement,
    BackgroundRemoval,
}

impl BatchOperation {
    pub const ALL: [BatchOperation; 3] = [
        BatchOperation::FormatConversion,
        BatchOperation::Enhancement,
        BatchOperation::BackgroundRemoval,
    ];

    pub fn label(self) -> &'static str {
        match self {
            BatchOperation::FormatConversion => "Format Conversion",
            BatchOperation::Enhancement => "Enhancement",
            BatchOperation::BackgroundRemoval => "Background Removal",
        }
    }
}

impl fmt::Display for BatchOperation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Result of a whole batch
#[derive(Debug, Clone, Default, PartialEq)]
pub struct BatchReport {
    /// Files written by the successful items
    pub outputs: Vec<PathBuf>,
    /// One `File <n>: <status>` line per item
    pub status: String,
}

fn is_image(path: &Path) -> bool {
    path.extension()
        .map(|ext| ext.to_string_lossy().to_lowercase())
        .is_some_and(|ext| IMAGE_EXTENSIONS.contains(&ext.as_str()))
}

/// Replace folders with the image files inside them; plain files pass through
pub fn expand_inputs(paths: &[PathBuf]) -> Vec<PathBuf> {
    let mut files = Vec::new();
    for path in paths {
        if !path.is_dir() {
            files.push(path.clone());
            continue;
        }
        let mut found: Vec<PathBuf> = WalkDir::new(path)
            .follow_links(true)
            .into_iter()
            .filter_map(|e| e.ok())
            .map(|e| e.into_path())
            .filter(|p| p.is_file() && is_image(p))
            .collect();
        found.sort();
        files.extend(found);
    }
    files
}

/// Run `operation` on every input, loading the segmenter through `load_segmenter` if needed
pub fn process_batch_with<L>(paths: &[PathBuf], operation: BatchOperation, load_segmenter: L) -> BatchReport
where
    L: FnOnce() -> SuiteResult<Box<dyn Segmenter + Send>>,
{
    let files = expand_inputs(paths);
    if files.is_empty() {
        return BatchReport {
            outputs: Vec::new(),
            status: format!("{} Please upload images for batch processing", FAILURE),
        };
    }
    info!("Batch {} over {} files", operation, files.len());

    let mut segmenter = match operation {
        BatchOperation::BackgroundRemoval => Some(load_segmenter()),
        _ => None,
    };

    let mut report = BatchReport::default();
    let mut lines = Vec::with_capacity(files.len());
    for (i, file) in files.iter().enumerate() {
        let outcome = match operation {
            BatchOperation::FormatConversion => {
                convert::convert_image(file, OutputFormat::Png, DEFAULT_QUALITY)
            }
            BatchOperation::Enhancement => {
                enhance::enhance_image(file, Enhancement::ColorEnhancement, DEFAULT_INTENSITY)
            }
            BatchOperation::BackgroundRemoval => match segmenter.as_mut() {
                Some(Ok(model)) => background::remove_local_with(file, model.as_mut()),
                Some(Err(e)) => Outcome::failure(describe("Background removal error", e)),
                None => Outcome::failure("Segmentation model unavailable"),
            },
        };
        if let Some(output) = outcome.output {
            report.outputs.push(output);
        }
        lines.push(format!("File {}: {}", i + 1, outcome.status));
    }
    report.status = lines.join("\n");
    report
}

/// Run `operation` on every input; background removal uses the model at `model_path`
pub fn process_batch(paths: &[PathBuf], operation: BatchOperation, model_path: &Path) -> BatchReport {
    process_batch_with(paths, operation, || background::load_segmenter(model_path))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::background::tests::LeftHalf;
    use crate::error::SuiteError;
    use image::{Rgb, RgbImage};

    fn write_images(dir: &Path, names: &[&str]) -> Vec<PathBuf> {
        names
            .iter()
            .map(|name| {
                let path = dir.join(name);
                RgbImage::from_pixel(8, 8, Rgb([10, 120, 200])).save(&path).unwrap();
                path
            })
            .collect()
    }

    #[test]
    fn test_empty_batch() {
        let report = process_batch(&[], BatchOperation::Enhancement, Path::new("m.onnx"));
        assert_eq!(report.status, "❌ Please upload images for batch processing");
        assert!(report.outputs.is_empty());
    }

    #[test]
    fn test_conversion_batch_reports_each_file() {
        let dir = tempfile::tempdir().unwrap();
        let mut paths = write_images(dir.path(), &["a.jpg", "b.bmp"]);
        paths.push(dir.path().join("missing.jpg"));

        let report = process_batch(&paths, BatchOperation::FormatConversion, Path::new("m.onnx"));
        let lines: Vec<&str> = report.status.lines().collect();
        assert_eq!(lines.len(), 3);
        assert_eq!(lines[0], "File 1: ✅ Converted to PNG");
        assert!(lines[2].starts_with("File 3: ❌"));
        assert_eq!(
            report.outputs,
            vec![dir.path().join("a.png"), dir.path().join("b.png")]
        );
    }

    #[test]
    fn test_folder_inputs_are_walked() {
        let dir = tempfile::tempdir().unwrap();
        let nested = dir.path().join("nested");
        std::fs::create_dir(&nested).unwrap();
        write_images(&nested, &["x.png", "y.jpg"]);
        std::fs::write(nested.join("notes.txt"), "skip me").unwrap();

        let files = expand_inputs(&[dir.path().to_path_buf()]);
        assert_eq!(files, vec![nested.join("x.png"), nested.join("y.jpg")]);
    }

    #[test]
    fn test_background_batch_loads_model_once() {
        let dir = tempfile::tempdir().unwrap();
        let paths = write_images(dir.path(), &["a.png", "b.png"]);

        let mut loads = 0;
        let report = process_batch_with(&paths, BatchOperation::BackgroundRemoval, || {
            loads += 1;
            Ok(Box::new(LeftHalf) as Box<dyn Segmenter + Send>)
        });
        assert_eq!(loads, 1);
        assert_eq!(report.outputs.len(), 2);
        assert!(report.status.contains("File 2: ✅ Background removed locally"));
    }

    #[test]
    fn test_background_batch_model_failure() {
        let dir = tempfile::tempdir().unwrap();
        let paths = write_images(dir.path(), &["a.png"]);

        let report = process_batch_with(&paths, BatchOperation::BackgroundRemoval, || {
            Err(SuiteError::Model("no model".into()))
        });
        assert_eq!(report.status, "File 1: ❌ Background removal error: no model");
        assert!(report.outputs.is_empty());
    }
}
