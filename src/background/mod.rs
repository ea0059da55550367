/// Background removal
///
/// Two backends are available:
/// - a local segmentation model (local.rs, ONNX Runtime)
/// - the Remove.bg web API (removebg.rs)
///
/// Removal.ai and Clipdrop are listed in the UI but not wired up.

use image::{DynamicImage, GrayImage, Rgba, RgbaImage};
use std::fmt;
use std::path::{Path, PathBuf};
use tracing::info;

use crate::error::{report, Outcome, SuiteError, SuiteResult};
use crate::processing::{io, naming};

#[cfg(feature = "local-model")]
pub mod local;
pub mod removebg;

/// Services listed in the BG Remove tab
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Service {
    RemoveBg,
    RemovalAi,
    #[default]
    Local,
    Clipdrop,
}

impl Service {
    pub const ALL: [Service; 4] = [
        Service::RemoveBg,
        Service::RemovalAi,
        Service::Local,
        Service::Clipdrop,
    ];

    pub fn label(self) -> &'static str {
        match self {
            Service::RemoveBg => "Remove.bg",
            Service::RemovalAi => "Removal.ai",
            Service::Local => "Local rembg",
            Service::Clipdrop => "Clipdrop",
        }
    }
}

impl fmt::Display for Service {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Produces a foreground mask (255 = keep) the size of the input
pub trait Segmenter {
    fn mask(&mut self, img: &DynamicImage) -> SuiteResult<GrayImage>;
}

/// Use the mask as the alpha channel of the image
pub fn apply_mask(img: &DynamicImage, mask: &GrayImage) -> SuiteResult<RgbaImage> {
    if mask.dimensions() != (img.width(), img.height()) {
        return Err(SuiteError::Model(format!(
            "Mask is {}x{} but image is {}x{}",
            mask.width(),
            mask.height(),
            img.width(),
            img.height()
        )));
    }
    let mut rgba = img.to_rgba8();
    for (x, y, px) in rgba.enumerate_pixels_mut() {
        let keep = mask.get_pixel(x, y)[0] as u32;
        *px = Rgba([px[0], px[1], px[2], ((px[3] as u32 * keep) / 255) as u8]);
    }
    Ok(rgba)
}

/// Load the configured local model
#[cfg(feature = "local-model")]
pub fn load_segmenter(model_path: &Path) -> SuiteResult<Box<dyn Segmenter + Send>> {
    Ok(Box::new(local::OnnxSegmenter::load(model_path)?))
}

#[cfg(not(feature = "local-model"))]
pub fn load_segmenter(_model_path: &Path) -> SuiteResult<Box<dyn Segmenter + Send>> {
    Err(SuiteError::Unsupported(
        "Local background removal was not compiled in (enable the local-model feature)"
            .to_string(),
    ))
}

fn remove_with(input: &Path, segmenter: &mut dyn Segmenter) -> SuiteResult<(PathBuf, String)> {
    let img = io::open(input)?;
    let mask = segmenter.mask(&img)?;
    let cutout = DynamicImage::ImageRgba8(apply_mask(&img, &mask)?);

    let out_path = naming::prefixed_png(input, "nobg");
    io::save(&cutout, &out_path)?;

    info!("Background removed locally: {}", out_path.display());
    Ok((out_path, "Background removed locally".to_string()))
}

/// Remove the background with an already loaded segmenter
pub fn remove_local_with(input: &Path, segmenter: &mut dyn Segmenter) -> Outcome {
    report("Background removal error", remove_with(input, segmenter))
}

/// Load the model at `model_path` and remove the background of `input`
pub fn remove_local(input: &Path, model_path: &Path) -> Outcome {
    if input.as_os_str().is_empty() {
        return report("Background removal error", Err(SuiteError::MissingInput));
    }
    match load_segmenter(model_path) {
        Ok(mut segmenter) => remove_local_with(input, segmenter.as_mut()),
        Err(e) => report("Background removal error", Err(e)),
    }
}

/// Dispatch on the selected service
pub fn remove_background(
    input: &Path,
    service: Service,
    model_path: &Path,
    removebg_key: Option<&str>,
    removebg_endpoint: &str,
) -> Outcome {
    if input.as_os_str().is_empty() {
        return Outcome::failure("Please upload an image");
    }
    match service {
        Service::Local => remove_local(input, model_path),
        Service::RemoveBg => removebg::remove_with_removebg(input, removebg_key, removebg_endpoint),
        other => Outcome::failure(format!("{} not implemented", other)),
    }
}
