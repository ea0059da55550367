/// AI image generation
///
/// - OpenAI: text-to-image, the result is downloaded and saved as PNG
/// - Anthropic: rewrites the prompt into a detailed visual description (no image)
/// - DeepSeek: listed but not available

use std::fmt;
use std::path::Path;

use crate::config::Endpoints;
use crate::error::Outcome;
use crate::state::keys::GeneratorKeys;

pub mod anthropic;
pub mod openai;

/// Model choices in the AI Gen tab
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum AiModel {
    #[default]
    DallE3,
    DallE2,
    Claude,
    DeepSeek,
}

impl AiModel {
    pub const ALL: [AiModel; 4] = [
        AiModel::DallE3,
        AiModel::DallE2,
        AiModel::Claude,
        AiModel::DeepSeek,
    ];

    pub fn label(self) -> &'static str {
        match self {
            AiModel::DallE3 => "OpenAI DALL-E 3",
            AiModel::DallE2 => "OpenAI DALL-E 2",
            AiModel::Claude => "Anthropic Claude (via API)",
            AiModel::DeepSeek => "DeepSeek",
        }
    }

    /// Vendor model identifier sent on the wire
    pub fn id(self) -> &'static str {
        match self {
            AiModel::DallE3 => "dall-e-3",
            AiModel::DallE2 => "dall-e-2",
            AiModel::Claude => "claude-3-5-sonnet-20241022",
            AiModel::DeepSeek => "deepseek-chat",
        }
    }
}

impl fmt::Display for AiModel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Output sizes offered for generation
pub const IMAGE_SIZES: [&str; 5] = ["256x256", "512x512", "1024x1024", "1792x1024", "1024x1792"];

pub const DEFAULT_SIZE: &str = "1024x1024";

/// One generation request from the UI
#[derive(Debug, Clone, PartialEq)]
pub struct GenerationRequest {
    pub prompt: String,
    pub model: AiModel,
    pub size: String,
}

/// Route a request to its vendor
pub fn generate_image(
    request: &GenerationRequest,
    keys: &GeneratorKeys,
    endpoints: &Endpoints,
    output_dir: &Path,
) -> Outcome {
    let prompt = request.prompt.trim();
    if prompt.is_empty() {
        return Outcome::failure("Please enter a prompt");
    }

    match request.model {
        AiModel::DallE3 | AiModel::DallE2 => openai::generate(
            prompt,
            request.model,
            &request.size,
            keys.openai.as_deref(),
            &endpoints.openai,
            output_dir,
        ),
        AiModel::Claude => {
            anthropic::enhance_prompt(prompt, keys.anthropic.as_deref(), &endpoints.anthropic)
        }
        AiModel::DeepSeek => Outcome::failure("DeepSeek not yet implemented"),
    }
}
