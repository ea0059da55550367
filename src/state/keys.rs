/// API key holders
///
/// One holder per family of remote services. The configured holders are
/// filled from settings at startup and never change; the saved holders are
/// updated by the "Save API Keys" buttons. A request uses the key typed in the
/// tab, else the saved key, else the configured one. Nothing is written to disk.

use crate::config::Settings;
use crate::error::{FAILURE, SUCCESS};

/// Treat blank text fields as "no key"
fn normalize(key: &str) -> Option<String> {
    let key = key.trim();
    (!key.is_empty()).then(|| key.to_string())
}

/// Pick the key typed in the tab, else the saved one, else the configured one
pub fn resolve(typed: &str, saved: Option<&str>, configured: Option<&str>) -> Option<String> {
    normalize(typed)
        .or_else(|| saved.and_then(normalize))
        .or_else(|| configured.and_then(normalize))
}

/// Keys for the image generation vendors
#[derive(Debug, Clone, Default, PartialEq)]
pub struct GeneratorKeys {
    pub openai: Option<String>,
    pub anthropic: Option<String>,
    pub deepseek: Option<String>,
}

impl GeneratorKeys {
    pub fn from_settings(settings: &Settings) -> Self {
        Self {
            openai: settings.openai_api_key.clone(),
            anthropic: settings.anthropic_api_key.clone(),
            deepseek: settings.deepseek_api_key.clone(),
        }
    }

    /// Keys for one request, with `self` as the saved layer
    pub fn resolve(&self, typed: [&str; 3], configured: &GeneratorKeys) -> GeneratorKeys {
        let [openai, anthropic, deepseek] = typed;
        GeneratorKeys {
            openai: resolve(openai, self.openai.as_deref(), configured.openai.as_deref()),
            anthropic: resolve(
                anthropic,
                self.anthropic.as_deref(),
                configured.anthropic.as_deref(),
            ),
            deepseek: resolve(deepseek, self.deepseek.as_deref(), configured.deepseek.as_deref()),
        }
    }

    /// Store the three text fields and describe what was saved
    pub fn save(&mut self, openai: &str, anthropic: &str, deepseek: &str) -> String {
        self.openai = normalize(openai);
        self.anthropic = normalize(anthropic);
        self.deepseek = normalize(deepseek);

        let saved: Vec<&str> = [
            ("OpenAI", &self.openai),
            ("Anthropic", &self.anthropic),
            ("DeepSeek", &self.deepseek),
        ]
        .into_iter()
        .filter(|(_, key)| key.is_some())
        .map(|(name, _)| name)
        .collect();

        if saved.is_empty() {
            format!("{} No keys provided", FAILURE)
        } else {
            format!("{} Saved keys for: {}", SUCCESS, saved.join(", "))
        }
    }
}

/// Key for the Remove.bg service
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RemoveBgKey(pub Option<String>);

impl RemoveBgKey {
    pub fn from_settings(settings: &Settings) -> Self {
        Self(settings.removebg_api_key.clone())
    }

    pub fn save(&mut self, key: &str) -> String {
        self.0 = normalize(key);
        if self.0.is_some() {
            format!("{} Remove.bg API key saved", SUCCESS)
        } else {
            format!("{} No key provided", FAILURE)
        }
    }

    pub fn get(&self) -> Option<&str> {
        self.0.as_deref()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_save_reports_only_present_keys() {
        let mut keys = GeneratorKeys::default();
        let status = keys.save("sk-1", "", "ds-3");
        assert_eq!(status, "✅ Saved keys for: OpenAI, DeepSeek");
        assert_eq!(keys.openai.as_deref(), Some("sk-1"));
        assert!(keys.anthropic.is_none());
    }

    #[test]
    fn test_save_nothing() {
        let mut keys = GeneratorKeys::default();
        assert_eq!(keys.save(" ", "", ""), "❌ No keys provided");
    }

    #[test]
    fn test_removebg_key() {
        let mut key = RemoveBgKey::default();
        assert_eq!(key.save(""), "❌ No key provided");
        assert_eq!(key.save("rb"), "✅ Remove.bg API key saved");
        assert_eq!(key.get(), Some("rb"));
    }

    #[test]
    fn test_resolve_layers() {
        assert_eq!(resolve("typed", Some("saved"), Some("cfg")).as_deref(), Some("typed"));
        assert_eq!(resolve("  ", Some("saved"), Some("cfg")).as_deref(), Some("saved"));
        assert_eq!(resolve("", None, Some("cfg")).as_deref(), Some("cfg"));
        assert_eq!(resolve("", Some(" "), None), None);
    }

    #[test]
    fn test_blank_save_keeps_configured_keys() {
        let mut settings = Settings::default();
        settings.anthropic_api_key = Some("cfg-ant".to_string());
        let configured = GeneratorKeys::from_settings(&settings);

        let mut saved = GeneratorKeys::default();
        assert_eq!(saved.save("sk-1", "", ""), "✅ Saved keys for: OpenAI");

        let keys = saved.resolve(["", "", ""], &configured);
        assert_eq!(keys.openai.as_deref(), Some("sk-1"));
        assert_eq!(keys.anthropic.as_deref(), Some("cfg-ant"));
        assert!(keys.deepseek.is_none());
    }
}
