use clap::{Parser, Subcommand, ValueEnum};
use serde::{Deserialize, Serialize};

#[derive(ValueEnum, Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ProviderKind {
    #[value(alias = "google")]
    Gemini,
    #[value(name = "openai", alias = "open-ai")]
    OpenAI,
    Anthropic,
    Ollama,
}

impl ProviderKind {
    /// Environment variable conventionally holding this provider's key.
    pub fn key_env(&self) -> &'static str {
        match self {
            ProviderKind::Gemini => "GOOGLE_API_KEY",
            ProviderKind::OpenAI => "OPENAI_API_KEY",
            ProviderKind::Anthropic => "ANTHROPIC_API_KEY",
            ProviderKind::Ollama => "OLLAMA_API_KEY",
        }
    }

    pub fn default_model(&self) -> &'static str {
        match self {
            ProviderKind::Gemini => "gemini-2.0-flash-exp",
            ProviderKind::OpenAI => "gpt-4.1-mini",
            ProviderKind::Anthropic => "claude-3-5-sonnet-latest",
            ProviderKind::Ollama => "qwen2.5-coder",
        }
    }
}

#[derive(Parser, Debug)]
#[command(name = "vibe_uigen", version, about = "Generate self-contained HTML pages and components from a plain-language prompt")]
pub struct Args {
    #[arg(long, global = true)]
    pub config: Option<String>,

    #[arg(long, value_enum, global = true)]
    pub provider: Option<ProviderKind>,

    #[arg(long, global = true)]
    pub model: Option<String>,

    #[arg(long, global = true)]
    pub timeout_secs: Option<u64>,

    #[arg(long, default_value_t = false, global = true)]
    pub no_history: bool,

    #[arg(long, default_value_t = false, global = true)]
    pub debug: bool,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Serve POST /api/generate and GET /api/history
    Serve {
        #[arg(long)]
        bind: Option<String>,
    },
    /// Generate one document and print it (or write it to --out)
    Generate {
        #[arg(long)]
        prompt: String,

        #[arg(long)]
        out: Option<String>,

        #[arg(long, default_value_t = false)]
        no_progress: bool,
    },
    /// List recent history entries
    History {
        #[arg(long, default_value_t = 20)]
        limit: usize,
    },
}
