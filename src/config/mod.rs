use anyhow::{Context, Result};
use fs_err as fs;
use serde::{Deserialize, Serialize};
use std::path::Path;

use crate::classify::{KeywordPolicy, KeywordPreset};
use crate::cli::ProviderKind;
use crate::prompt::TemplateStyle;
use crate::sanitize::Placeholders;

/// When the history write happens relative to returning the document.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PersistMode {
    Background,
    Inline,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct PolicyConfig {
    pub preset: KeywordPreset,
    pub utility_css: bool,
    pub template: TemplateStyle,
    pub code_keywords: Option<Vec<String>>,
    pub framework_keywords: Option<Vec<String>>,
    pub landing_keywords: Option<Vec<String>>,
    pub utility_css_opt_out: Option<Vec<String>>,
}

impl Default for PolicyConfig {
    fn default() -> Self {
        Self {
            preset: KeywordPreset::Broad,
            utility_css: true,
            template: TemplateStyle::Detailed,
            code_keywords: None,
            framework_keywords: None,
            landing_keywords: None,
            utility_css_opt_out: None,
        }
    }
}

impl PolicyConfig {
    /// Preset keyword sets with any explicit overrides applied on top.
    pub fn keyword_policy(&self) -> KeywordPolicy {
        let mut p = KeywordPolicy::from_preset(self.preset);
        if let Some(k) = &self.code_keywords { p.code_keywords = k.clone(); }
        if let Some(k) = &self.framework_keywords { p.framework_keywords = k.clone(); }
        if let Some(k) = &self.landing_keywords { p.landing_keywords = k.clone(); }
        if let Some(k) = &self.utility_css_opt_out { p.utility_css_opt_out = k.clone(); }
        p.utility_css = self.utility_css;
        p
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub provider: ProviderKind,
    pub model: Option<String>,
    pub api_key: Option<String>,
    pub api_base: Option<String>,
    pub ollama_url: Option<String>,
    pub timeout_secs: u64,
    pub bind: String,
    pub history_enabled: bool,
    pub history_db: String,
    pub persist: PersistMode,
    pub artifacts_dir: Option<String>,
    pub bare_document_fallback: bool,
    pub policy: PolicyConfig,
    pub placeholders: Placeholders,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            provider: ProviderKind::Gemini,
            model: None,
            api_key: None,
            api_base: None,
            ollama_url: Some("http://localhost:11434".into()),
            timeout_secs: 120,
            bind: "127.0.0.1:3000".into(),
            history_enabled: true,
            history_db: ".vibe/history.sqlite".into(),
            persist: PersistMode::Background,
            artifacts_dir: None,
            bare_document_fallback: true,
            policy: PolicyConfig::default(),
            placeholders: Placeholders::default(),
        }
    }
}

impl Config {
    pub fn load(path: &Path) -> Result<Self> {
        let s = fs::read_to_string(path)?;
        Self::from_toml(&s).with_context(|| format!("parsing {}", path.display()))
    }

    pub fn from_toml(s: &str) -> Result<Self> {
        Ok(toml::from_str(s)?)
    }

    pub fn model_name(&self) -> String {
        self.model
            .clone()
            .unwrap_or_else(|| self.provider.default_model().to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_toml_gives_defaults() {
        let cfg = Config::from_toml("").unwrap();
        assert_eq!(cfg.provider, ProviderKind::Gemini);
        assert_eq!(cfg.model_name(), "gemini-2.0-flash-exp");
        assert_eq!(cfg.persist, PersistMode::Background);
        assert!(cfg.history_enabled);
        assert_eq!(cfg.placeholders, Placeholders::default());
    }

    #[test]
    fn reads_policy_and_placeholders() {
        let cfg = Config::from_toml(
            r#"
provider = "openai"
model = "gpt-4o"
persist = "inline"

[policy]
preset = "narrow"
template = "concise"
utility_css = false
landing_keywords = ["storefront"]

[placeholders]
avatar = "https://example.test/a.png"
"#,
        )
        .unwrap();
        assert_eq!(cfg.provider, ProviderKind::OpenAI);
        assert_eq!(cfg.model_name(), "gpt-4o");
        assert_eq!(cfg.persist, PersistMode::Inline);
        assert_eq!(cfg.policy.template, TemplateStyle::Concise);
        assert_eq!(cfg.placeholders.avatar, "https://example.test/a.png");
        assert_eq!(cfg.placeholders.hero, "https://picsum.photos/1920/1080");

        let kp = cfg.policy.keyword_policy();
        assert!(!kp.utility_css);
        assert_eq!(kp.landing_keywords, vec!["storefront".to_string()]);
        assert_eq!(kp.code_keywords, KeywordPolicy::narrow().code_keywords);
    }

    #[test]
    fn rejects_unknown_provider() {
        assert!(Config::from_toml("provider = \"bard\"").is_err());
    }

    #[test]
    fn serialized_defaults_carry_only_live_settings() {
        let text = toml::to_string(&Config::default()).unwrap();
        assert!(!text.contains("schema_version"));
        let back = Config::from_toml(&text).unwrap();
        assert_eq!(back.bind, "127.0.0.1:3000");
    }
}
