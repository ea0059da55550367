/// Output file naming
///
/// Every operation writes next to its input (or into the output directory
/// for generated images) under a name derived only from the input path and
/// the operation, so repeating a request overwrites the previous result.

use std::collections::hash_map::DefaultHasher;
use std::hash::{Hash, Hasher};
use std::path::{Path, PathBuf};

fn file_name(input: &Path) -> String {
    input
        .file_name()
        .unwrap_or_default()
        .to_string_lossy()
        .to_string()
}

fn file_stem(input: &Path) -> String {
    input
        .file_stem()
        .unwrap_or_default()
        .to_string_lossy()
        .to_string()
}

/// `<prefix>_<file name>` beside the input
pub fn prefixed(input: &Path, prefix: &str) -> PathBuf {
    input.with_file_name(format!("{}_{}", prefix, file_name(input)))
}

/// `<prefix>_<stem>.png` beside the input, for results that need alpha
pub fn prefixed_png(input: &Path, prefix: &str) -> PathBuf {
    input.with_file_name(format!("{}_{}.png", prefix, file_stem(input)))
}

/// Input path with the extension swapped for the target format
pub fn converted(input: &Path, format: &str) -> PathBuf {
    input.with_extension(format.to_lowercase())
}

/// Lower-case, underscore-separated form of a mode label ("Smart Crop" -> "smart_crop")
pub fn slug(label: &str) -> String {
    label
        .split_whitespace()
        .map(str::to_lowercase)
        .collect::<Vec<_>>()
        .join("_")
}

/// Stable four-digit tag for a prompt
pub fn prompt_tag(prompt: &str) -> u64 {
    let mut hasher = DefaultHasher::new();
    prompt.hash(&mut hasher);
    hasher.finish() % 10_000
}

/// `generated_image_<tag>.png` inside the output directory
pub fn generated(output_dir: &Path, prompt: &str) -> PathBuf {
    output_dir.join(format!("generated_image_{}.png", prompt_tag(prompt)))
}

/// `<stem>_android_icons.zip` beside the input
pub fn icon_archive(input: &Path) -> PathBuf {
    input.with_file_name(format!("{}_android_icons.zip", file_stem(input)))
}
