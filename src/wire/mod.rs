use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// ========================================
/// HTTP request/response wire protocol
/// ========================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Language {
    Html,
    Text,
}

impl Language {
    pub fn as_str(&self) -> &'static str {
        match self {
            Language::Html => "html",
            Language::Text => "text",
        }
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct GenerateRequest {
    #[serde(default)]
    pub prompt: String,
}

/// Body of every successful or rejected `/api/generate` call.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GenerateResponse {
    pub code: String,
    pub language: Language,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorBody {
    pub error: String,
}

/// One persisted (prompt, document) pair.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HistoryEntry {
    pub id: String,
    pub prompt: String,
    pub response: String,
    pub language: String,
    pub created_at: DateTime<Utc>,
}
