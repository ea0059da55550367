/// OpenAI image generation (DALL-E 2 / DALL-E 3)

use serde_json::{json, Value};
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;
use tracing::{debug, info};

use super::AiModel;
use crate::error::{report, Outcome, SuiteError, SuiteResult};
use crate::http;
use crate::processing::{io, naming};

const SERVICE: &str = "OpenAI";
const TIMEOUT: Duration = Duration::from_secs(60);

pub fn request_body(model: AiModel, prompt: &str, size: &str) -> Value {
    json!({
        "model": model.id(),
        "prompt": prompt,
        "size": size,
        "n": 1,
    })
}

/// `data[0].url` of a generation response
pub fn image_url(payload: &Value) -> SuiteResult<String> {
    payload
        .get("data")
        .and_then(|data| data.get(0))
        .and_then(|item| item.get("url"))
        .and_then(Value::as_str)
        .map(str::to_string)
        .ok_or_else(|| SuiteError::Http("Response did not contain an image URL".to_string()))
}

fn request(
    prompt: &str,
    model: AiModel,
    size: &str,
    key: Option<&str>,
    base_url: &str,
    output_dir: &Path,
) -> SuiteResult<(PathBuf, String)> {
    let key = key
        .filter(|k| !k.trim().is_empty())
        .ok_or(SuiteError::MissingKey(SERVICE))?;

    let client = http::client(TIMEOUT)?;
    let response = client
        .post(http::join(base_url, "/v1/images/generations"))
        .bearer_auth(key)
        .json(&request_body(model, prompt, size))
        .send()?;
    let payload: Value = http::expect_ok(SERVICE, response)?.json()?;
    let url = image_url(&payload)?;
    debug!("Downloading generated image from {}", url);

    let bytes = client.get(&url).send()?.error_for_status()?.bytes()?;
    let img = image::load_from_memory(&bytes)?;

    fs::create_dir_all(output_dir)?;
    let out_path = naming::generated(output_dir, prompt);
    io::save(&img, &out_path)?;

    info!("Generated {} with {}", out_path.display(), model.id());
    Ok((out_path, format!("Image generated successfully with {}", model.id())))
}

/// Generate an image and save it as `generated_image_<tag>.png`
pub fn generate(
    prompt: &str,
    model: AiModel,
    size: &str,
    key: Option<&str>,
    base_url: &str,
    output_dir: &Path,
) -> Outcome {
    report("Error generating image", request(prompt, model, size, key, base_url, output_dir))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_request_body() {
        let body = request_body(AiModel::DallE2, "a fox", "512x512");
        assert_eq!(
            body,
            json!({ "model": "dall-e-2", "prompt": "a fox", "size": "512x512", "n": 1 })
        );
    }

    #[test]
    fn test_image_url() {
        let payload = json!({ "created": 1, "data": [{ "url": "https://cdn.example/img.png" }] });
        assert_eq!(image_url(&payload).unwrap(), "https://cdn.example/img.png");
        assert!(image_url(&json!({ "data": [] })).is_err());
    }

    #[test]
    fn test_unreachable_endpoint() {
        let dir = tempfile::tempdir().unwrap();
        let outcome = generate(
            "a fox",
            AiModel::DallE3,
            "1024x1024",
            Some("sk-test"),
            "http://127.0.0.1:9",
            dir.path(),
        );
        assert!(outcome.status.starts_with("❌ Error generating image:"), "{}", outcome.status);
    }

    #[test]
    fn test_rejected_request_reports_api_error() {
        let dir = tempfile::tempdir().unwrap();
        let base = http::stub::respond_once("400 Bad Request", "invalid size");
        let outcome = generate("a fox", AiModel::DallE3, "1x1", Some("sk-test"), &base, dir.path());
        assert_eq!(outcome.status, "❌ OpenAI API Error: invalid size");
        assert!(outcome.output.is_none());
    }

    #[test]
    fn test_generated_image_is_downloaded_and_saved() {
        let dir = tempfile::tempdir().unwrap();
        let mut png = std::io::Cursor::new(Vec::new());
        image::RgbImage::new(8, 4)
            .write_to(&mut png, image::ImageFormat::Png)
            .unwrap();
        let image_url = http::stub::respond_once("200 OK", png.into_inner());
        let base = http::stub::respond_once(
            "200 OK",
            json!({ "data": [{ "url": format!("{}/img.png", image_url) }] }).to_string(),
        );

        let outcome = generate("a fox", AiModel::DallE3, "1024x1024", Some("sk-test"), &base, dir.path());
        assert_eq!(outcome.status, "✅ Image generated successfully with dall-e-3");
        let saved = image::open(outcome.output.unwrap()).unwrap();
        assert_eq!((saved.width(), saved.height()), (8, 4));
    }
}
