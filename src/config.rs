/// Application settings
///
/// Settings are resolved in three layers, later layers winning:
/// 1. Built-in defaults
/// 2. `settings.json` in the user's config directory
///    - Linux: ~/.config/image-suite/settings.json
///    - macOS: ~/Library/Application Support/image-suite/settings.json
///    - Windows: %APPDATA%\image-suite\settings.json
/// 3. Environment variables (`OPENAI_API_KEY`, `LOG_LEVEL`, ...)

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::{debug, warn};

const APP_DIR: &str = "image-suite";
const SETTINGS_FILE: &str = "settings.json";

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Failed to read {path}: {source}")]
    Read {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("Invalid settings file {path}: {source}")]
    Parse {
        path: PathBuf,
        source: serde_json::Error,
    },
}

/// Endpoints of the remote services
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(default)]
pub struct Endpoints {
    pub openai: String,
    pub anthropic: String,
    pub removebg: String,
}

impl Default for Endpoints {
    fn default() -> Self {
        Self {
            openai: "https://api.openai.com".to_string(),
            anthropic: "https://api.anthropic.com".to_string(),
            removebg: "https://api.remove.bg/v1.0/removebg".to_string(),
        }
    }
}

/// All runtime settings
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(default)]
pub struct Settings {
    pub openai_api_key: Option<String>,
    pub anthropic_api_key: Option<String>,
    pub removebg_api_key: Option<String>,
    pub deepseek_api_key: Option<String>,
    /// Filter directive for the log subscriber (e.g. "info", "debug")
    pub log_level: String,
    /// Where generated images are written
    pub output_dir: PathBuf,
    /// ONNX segmentation model used for local background removal
    pub model_path: PathBuf,
    pub endpoints: Endpoints,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            openai_api_key: None,
            anthropic_api_key: None,
            removebg_api_key: None,
            deepseek_api_key: None,
            log_level: "info".to_string(),
            output_dir: PathBuf::from("."),
            model_path: default_model_path(),
            endpoints: Endpoints::default(),
        }
    }
}

impl Settings {
    /// Load settings from the config file (if any) and the environment
    pub fn load() -> Result<Self, ConfigError> {
        let mut settings = match settings_file_path() {
            Some(path) if path.exists() => Self::from_file(&path)?,
            _ => Self::default(),
        };
        settings.apply_env(|name| std::env::var(name).ok());
        Ok(settings)
    }

    /// Parse a settings file; missing fields keep their defaults
    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let text = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        let settings = serde_json::from_str(&text).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })?;
        debug!("Loaded settings from {}", path.display());
        Ok(settings)
    }

    /// Overlay environment variables looked up through `lookup`
    pub fn apply_env<F>(&mut self, lookup: F)
    where
        F: Fn(&str) -> Option<String>,
    {
        let non_empty = |name: &str| lookup(name).filter(|value| !value.trim().is_empty());

        if let Some(key) = non_empty("OPENAI_API_KEY") {
            self.openai_api_key = Some(key);
        }
        if let Some(key) = non_empty("ANTHROPIC_API_KEY") {
            self.anthropic_api_key = Some(key);
        }
        if let Some(key) = non_empty("REMOVE_BG_API_KEY") {
            self.removebg_api_key = Some(key);
        }
        if let Some(key) = non_empty("DEEPSEEK_API_KEY") {
            self.deepseek_api_key = Some(key);
        }
        if let Some(level) = non_empty("LOG_LEVEL") {
            self.log_level = level.to_lowercase();
        }
        if let Some(dir) = non_empty("IMAGE_SUITE_OUTPUT_DIR") {
            self.output_dir = PathBuf::from(dir);
        }
        if let Some(model) = non_empty("IMAGE_SUITE_MODEL_PATH") {
            self.model_path = PathBuf::from(model);
        }
    }
}

/// Location of the optional settings file
pub fn settings_file_path() -> Option<PathBuf> {
    let mut path = dirs::config_dir()?;
    path.push(APP_DIR);
    path.push(SETTINGS_FILE);
    Some(path)
}

/// Default location of the segmentation model
/// Returns ~/.local/share/image-suite/models/u2net.onnx on Linux
fn default_model_path() -> PathBuf {
    let mut path = match dirs::data_dir().or_else(dirs::home_dir) {
        Some(path) => path,
        None => {
            warn!("Could not determine user data directory, using working directory for models");
            PathBuf::from(".")
        }
    };
    path.push(APP_DIR);
    path.push("models");
    path.push("u2net.onnx");
    path
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    #[test]
    fn test_env_overrides_defaults() {
        let env: HashMap<&str, &str> = [
            ("OPENAI_API_KEY", "sk-test"),
            ("LOG_LEVEL", "DEBUG"),
            ("IMAGE_SUITE_OUTPUT_DIR", "/tmp/generated"),
            ("ANTHROPIC_API_KEY", "   "),
        ]
        .into_iter()
        .collect();

        let mut settings = Settings::default();
        settings.apply_env(|name| env.get(name).map(|v| v.to_string()));

        assert_eq!(settings.openai_api_key.as_deref(), Some("sk-test"));
        assert_eq!(settings.log_level, "debug");
        assert_eq!(settings.output_dir, PathBuf::from("/tmp/generated"));
        // Blank values are ignored
        assert!(settings.anthropic_api_key.is_none());
    }

    #[test]
    fn test_partial_settings_file_keeps_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("settings.json");
        std::fs::write(
            &path,
            r#"{ "removebg_api_key": "rb-key", "endpoints": { "openai": "http://localhost:9000" } }"#,
        )
        .unwrap();

        let settings = Settings::from_file(&path).unwrap();
        assert_eq!(settings.removebg_api_key.as_deref(), Some("rb-key"));
        assert_eq!(settings.endpoints.openai, "http://localhost:9000");
        assert_eq!(settings.endpoints.anthropic, Endpoints::default().anthropic);
        assert_eq!(settings.log_level, "info");
    }

    #[test]
    fn test_invalid_settings_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("settings.json");
        std::fs::write(&path, "not json").unwrap();

        let err = Settings::from_file(&path).unwrap_err();
        assert!(matches!(err, ConfigError::Parse { .. }));
    }
}
