use anyhow::{anyhow, Result};
use async_trait::async_trait;
use std::time::Duration;

use crate::cli::ProviderKind;

pub mod anthropic;
pub mod gemini;
pub mod ollama;
pub mod openai;

/// Opaque text-completion service: one prompt in, raw text out.
#[async_trait]
pub trait Provider: Send + Sync {
    async fn complete(&self, prompt: &str, debug: bool) -> Result<String>;
}

pub type DynProvider = Box<dyn Provider + Send + Sync>;

/// Everything a provider needs, resolved by the caller. Providers never read
/// the environment themselves.
#[derive(Debug, Clone)]
pub struct ProviderSettings {
    pub kind: ProviderKind,
    pub model: String,
    pub api_key: Option<String>,
    pub api_base: Option<String>,
    pub ollama_url: Option<String>,
    pub timeout_secs: u64,
}

impl ProviderSettings {
    fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }

    fn require_key(&self) -> Result<String> {
        self.api_key
            .clone()
            .filter(|k| !k.trim().is_empty())
            .ok_or_else(|| anyhow!("{:?} provider requires an API key ({} or config api_key)", self.kind, self.kind.key_env()))
    }

    fn base_or(&self, default: &str) -> String {
        self.api_base.clone().unwrap_or_else(|| default.to_string())
    }
}

pub fn make_provider(s: &ProviderSettings) -> Result<DynProvider> {
    match s.kind {
        ProviderKind::Gemini => Ok(Box::new(gemini::Gemini::new(
            s.model.clone(),
            s.require_key()?,
            s.base_or(gemini::DEFAULT_BASE),
            s.timeout(),
        )?)),
        ProviderKind::OpenAI => Ok(Box::new(openai::OpenAIProvider::new(
            s.model.clone(),
            s.require_key()?,
            s.base_or(openai::DEFAULT_BASE),
            s.timeout(),
        )?)),
        ProviderKind::Anthropic => Ok(Box::new(anthropic::Anthropic::new(
            s.model.clone(),
            s.require_key()?,
            s.base_or(anthropic::DEFAULT_BASE),
            s.timeout(),
        )?)),
        ProviderKind::Ollama => Ok(Box::new(ollama::Ollama::new(
            s.model.clone(),
            s.ollama_url.clone().unwrap_or_else(|| ollama::DEFAULT_URL.to_string()),
            s.timeout(),
        )?)),
    }
}
