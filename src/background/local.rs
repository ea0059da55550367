/// Local foreground segmentation with ONNX Runtime
///
/// Expects a U²-Net style salient object model:
/// - input: 1x3x320x320 float tensor, RGB normalized with ImageNet mean/std
/// - output: first output, 1x1x320x320 saliency map
///
/// The saliency map is min-max normalized, scaled to 0-255 and resized back to
/// the source size to become the alpha mask.

use image::imageops::FilterType;
use image::{DynamicImage, GrayImage, Luma};
use ort::logging::LogLevel;
use ort::session::{Session, SessionInputs};
use ort::value::TensorRef;
use std::borrow::Cow;
use std::path::Path;
use tracing::{debug, info};

use super::Segmenter;
use crate::error::{SuiteError, SuiteResult};

/// Square edge of the model input
pub const MODEL_SIDE: u32 = 320;

const MEAN: [f32; 3] = [0.485, 0.456, 0.406];
const STD: [f32; 3] = [0.229, 0.224, 0.225];

fn model_err(e: impl std::fmt::Display) -> SuiteError {
    SuiteError::Model(e.to_string())
}

/// NCHW input tensor data for the model
///
/// Pixels are divided by the brightest channel value in the resized image
/// before mean/std normalization.
pub fn preprocess(img: &DynamicImage) -> Vec<f32> {
    let resized = img
        .resize_exact(MODEL_SIDE, MODEL_SIDE, FilterType::Lanczos3)
        .to_rgb8();
    let max = resized
        .pixels()
        .flat_map(|px| px.0)
        .max()
        .unwrap_or(0)
        .max(1) as f32;

    let plane = (MODEL_SIDE * MODEL_SIDE) as usize;
    let mut data = vec![0f32; 3 * plane];
    for (i, px) in resized.pixels().enumerate() {
        for c in 0..3 {
            data[c * plane + i] = (px[c] as f32 / max - MEAN[c]) / STD[c];
        }
    }
    data
}

/// Saliency map of `side` x `side` values to a mask of `width` x `height`
pub fn postprocess(pred: &[f32], side: u32, width: u32, height: u32) -> SuiteResult<GrayImage> {
    let plane = (side * side) as usize;
    if pred.len() < plane {
        return Err(SuiteError::Model(format!(
            "Model output has {} values, expected at least {}",
            pred.len(),
            plane
        )));
    }
    let pred = &pred[..plane];
    let (min, max) = pred
        .iter()
        .fold((f32::INFINITY, f32::NEG_INFINITY), |(lo, hi), &v| (lo.min(v), hi.max(v)));
    let range = max - min;

    let mut mask = GrayImage::new(side, side);
    for (i, px) in mask.pixels_mut().enumerate() {
        let norm = if range > f32::EPSILON { (pred[i] - min) / range } else { 0.0 };
        *px = Luma([(norm * 255.0) as u8]);
    }
    Ok(DynamicImage::ImageLuma8(mask)
        .resize_exact(width, height, FilterType::Lanczos3)
        .to_luma8())
}

pub struct OnnxSegmenter {
    session: Session,
    input_name: String,
    output_name: String,
}

impl OnnxSegmenter {
    /// Load a model from disk
    pub fn load(path: &Path) -> SuiteResult<Self> {
        if !path.exists() {
            return Err(SuiteError::Model(format!(
                "Segmentation model not found at {}",
                path.display()
            )));
        }
        let session = Session::builder()
            .map_err(model_err)?
            .with_log_level(LogLevel::Error)
            .map_err(model_err)?
            .commit_from_file(path)
            .map_err(model_err)?;

        let input_name = session
            .inputs()
            .first()
            .map(|i| i.name().to_string())
            .ok_or_else(|| SuiteError::Model("Model has no inputs".to_string()))?;
        let output_name = session
            .outputs()
            .first()
            .map(|o| o.name().to_string())
            .ok_or_else(|| SuiteError::Model("Model has no outputs".to_string()))?;

        info!("Loaded segmentation model {}", path.display());
        debug!("   → input '{}', output '{}'", input_name, output_name);
        Ok(Self {
            session,
            input_name,
            output_name,
        })
    }
}

impl Segmenter for OnnxSegmenter {
    fn mask(&mut self, img: &DynamicImage) -> SuiteResult<GrayImage> {
        let data = preprocess(img);
        let side = MODEL_SIDE as i64;
        let tensor = TensorRef::from_array_view((vec![1i64, 3, side, side], data.as_slice()))
            .map_err(model_err)?;
        let inputs: SessionInputs<'_, '_, 0> = SessionInputs::ValueMap(vec![(
            Cow::Borrowed(self.input_name.as_str()),
            tensor.into(),
        )]);

        let outputs = self.session.run(inputs).map_err(model_err)?;
        let (shape, pred) = outputs[self.output_name.as_str()]
            .try_extract_tensor::<f32>()
            .map_err(model_err)?;
        debug!("Segmentation output shape {:?}", shape);

        postprocess(pred, MODEL_SIDE, img.width(), img.height())
    }
}
