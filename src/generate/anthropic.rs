/// Prompt enhancement through the Anthropic Messages API

use serde_json::{json, Value};
use std::time::Duration;
use tracing::{error, info};

use super::AiModel;
use crate::error::{describe, Outcome, SuiteError, SuiteResult};
use crate::http;

const SERVICE: &str = "Anthropic";
const TIMEOUT: Duration = Duration::from_secs(30);
const API_VERSION: &str = "2023-06-01";
const MAX_TOKENS: u32 = 1024;
const PREVIEW_CHARS: usize = 200;

pub fn request_body(prompt: &str) -> Value {
    json!({
        "model": AiModel::Claude.id(),
        "max_tokens": MAX_TOKENS,
        "messages": [{
            "role": "user",
            "content": format!(
                "Create a detailed visual description for an AI image generator based on this prompt: {}. Make it artistic and detailed.",
                prompt
            ),
        }],
    })
}

/// Text of the first content block
pub fn response_text(payload: &Value) -> SuiteResult<String> {
    payload
        .get("content")
        .and_then(|content| content.get(0))
        .and_then(|block| block.get("text"))
        .and_then(Value::as_str)
        .map(str::to_string)
        .ok_or_else(|| SuiteError::Http("Response did not contain any text".to_string()))
}

/// First 200 characters followed by an ellipsis
pub fn preview(text: &str) -> String {
    format!("{}...", text.chars().take(PREVIEW_CHARS).collect::<String>())
}

fn request(prompt: &str, key: Option<&str>, base_url: &str) -> SuiteResult<String> {
    let key = key
        .filter(|k| !k.trim().is_empty())
        .ok_or(SuiteError::MissingKey(SERVICE))?;

    let response = http::client(TIMEOUT)?
        .post(http::join(base_url, "/v1/messages"))
        .header("x-api-key", key)
        .header("anthropic-version", API_VERSION)
        .json(&request_body(prompt))
        .send()?;
    let payload: Value = http::expect_ok(SERVICE, response)?.json()?;
    response_text(&payload)
}

/// Ask Claude for a richer prompt; no image is produced
pub fn enhance_prompt(prompt: &str, key: Option<&str>, base_url: &str) -> Outcome {
    match request(prompt, key, base_url) {
        Ok(text) => {
            info!("Enhanced prompt received ({} chars)", text.chars().count());
            Outcome::message(format!("Enhanced prompt created: {}", preview(&text)))
        }
        Err(err) => {
            error!("Prompt enhancement failed: {}", err);
            Outcome::failure(describe("Error with Anthropic API", &err))
        }
    }
}
