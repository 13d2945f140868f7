use std::path::PathBuf;
use std::sync::Arc;

use tokio_util::sync::CancellationToken;
use tracing::{debug, error, info, warn};
use uuid::Uuid;

use crate::classify::{classify, Classification, KeywordPolicy, RejectReason};
use crate::config::{Config, PersistMode};
use crate::document::{synthesize, DocumentOptions, FinalDocument};
use crate::errors::GenError;
use crate::extract::extract;
use crate::history::{History, HISTORY_PAGE};
use crate::log::TxLog;
use crate::prompt::{enhance, select_similar, TemplateStyle, SIMILAR_CANDIDATES};
use crate::provider::DynProvider;
use crate::sanitize::{sanitize, Placeholders};
use crate::wire::{GenerateResponse, HistoryEntry, Language};

/// Request-independent knobs of the pipeline.
#[derive(Debug, Clone)]
pub struct PipelineSettings {
    pub policy: KeywordPolicy,
    pub template: TemplateStyle,
    pub placeholders: Placeholders,
    pub bare_document_fallback: bool,
    pub persist: PersistMode,
    pub artifacts_dir: Option<PathBuf>,
    pub debug: bool,
}

impl Default for PipelineSettings {
    fn default() -> Self {
        Self::from_config(&Config::default(), false)
    }
}

impl PipelineSettings {
    pub fn from_config(cfg: &Config, debug: bool) -> Self {
        Self {
            policy: cfg.policy.keyword_policy(),
            template: cfg.policy.template,
            placeholders: cfg.placeholders.clone(),
            bare_document_fallback: cfg.bare_document_fallback,
            persist: cfg.persist,
            artifacts_dir: cfg.artifacts_dir.as_ref().map(PathBuf::from),
            debug,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome {
    Rejected(RejectReason),
    Completed(FinalDocument),
}

impl Outcome {
    pub fn into_response(self) -> GenerateResponse {
        match self {
            Outcome::Rejected(reason) => GenerateResponse {
                code: reason.message().to_string(),
                language: Language::Text,
            },
            Outcome::Completed(doc) => GenerateResponse { code: doc.code, language: doc.language },
        }
    }
}

pub struct Generator {
    provider: DynProvider,
    history: Option<Arc<dyn History>>,
    settings: PipelineSettings,
}

impl Generator {
    pub fn new(provider: DynProvider, history: Option<Arc<dyn History>>, settings: PipelineSettings) -> Self {
        Self { provider, history, settings }
    }

    /// Classify, enhance, complete, extract, sanitize and synthesize.
    ///
    /// Rejections are a normal `Outcome`. The only failure is the completion
    /// call (or its cancellation); everything after it is total.
    pub async fn generate(&self, prompt: &str, cancel: &CancellationToken) -> Result<Outcome, GenError> {
        let tx = Uuid::new_v4();

        let intent = match classify(prompt, &self.settings.policy) {
            Classification::Rejected(reason) => {
                info!(%tx, ?reason, "prompt rejected");
                return Ok(Outcome::Rejected(reason));
            }
            Classification::Accepted(intent) => intent,
        };
        info!(%tx, landing = intent.is_landing_page, utility_css = intent.use_utility_css, "prompt accepted");

        let similar = self.similar_entries(prompt).await;
        let enhanced = enhance(prompt, &intent, &similar, self.settings.template);
        debug!(%tx, similar = similar.len(), bytes = enhanced.len(), "prompt enhanced");

        let txlog = self.settings.artifacts_dir.as_deref().map(|d| TxLog::new(d, tx));
        save_artifact(txlog.as_ref(), "enhanced_prompt.txt", &enhanced);

        let raw = tokio::select! {
            biased;
            _ = cancel.cancelled() => {
                warn!(%tx, "generation cancelled");
                return Err(GenError::Cancelled);
            }
            res = self.provider.complete(&enhanced, self.settings.debug) => match res {
                Ok(raw) => raw,
                Err(e) => {
                    error!(%tx, error = %format!("{e:#}"), "completion failed");
                    return Err(GenError::Service(format!("{e:#}")));
                }
            },
        };
        debug!(%tx, bytes = raw.len(), "completion received");
        save_artifact(txlog.as_ref(), "completion.txt", &raw);

        let sections = extract(&raw, self.settings.bare_document_fallback);
        if sections.is_empty() {
            warn!(%tx, "completion contained no usable sections");
        }
        let fragment = sanitize(&sections.html, &self.settings.placeholders);
        debug!(%tx, scripts = fragment.inline_scripts.len(), "fragment sanitized");

        let doc = synthesize(
            &fragment,
            &sections.css,
            &sections.js,
            &DocumentOptions { use_utility_css: intent.use_utility_css },
        );
        save_artifact(txlog.as_ref(), "document.html", &doc.code);
        info!(%tx, bytes = doc.code.len(), "document synthesized");

        self.persist(prompt, &doc).await;
        Ok(Outcome::Completed(doc))
    }

    /// Most recent entries, newest first, bounded to one page.
    pub async fn list_history(&self) -> Result<Vec<HistoryEntry>, GenError> {
        let Some(h) = self.history.clone() else {
            return Ok(Vec::new());
        };
        tokio::task::spawn_blocking(move || h.list_recent(HISTORY_PAGE))
            .await
            .map_err(|e| GenError::Storage(e.to_string()))?
            .map_err(|e| GenError::Storage(format!("{e:#}")))
    }

    /// Best-effort: a failing read only loses the similarity context.
    async fn similar_entries(&self, prompt: &str) -> Vec<HistoryEntry> {
        let Some(h) = self.history.clone() else {
            return Vec::new();
        };
        match tokio::task::spawn_blocking(move || h.list_recent(SIMILAR_CANDIDATES)).await {
            Ok(Ok(recent)) => select_similar(prompt, &recent),
            Ok(Err(e)) => {
                warn!(error = %format!("{e:#}"), "history read failed; continuing without similar prompts");
                Vec::new()
            }
            Err(e) => {
                warn!(error = %e, "history read task failed");
                Vec::new()
            }
        }
    }

    async fn persist(&self, prompt: &str, doc: &FinalDocument) {
        let Some(h) = self.history.clone() else {
            return;
        };
        let prompt = prompt.to_string();
        let code = doc.code.clone();
        let language = doc.language.as_str();
        let write = tokio::task::spawn_blocking(move || {
            if let Err(e) = h.append(&prompt, &code, language) {
                warn!(error = %format!("{e:#}"), "history write failed");
            }
        });
        if self.settings.persist == PersistMode::Inline {
            if let Err(e) = write.await {
                warn!(error = %e, "history write task failed");
            }
        }
    }
}

fn save_artifact(log: Option<&TxLog>, stage: &str, contents: &str) {
    if let Some(log) = log {
        if let Err(e) = log.save_stage(stage, contents) {
            warn!(stage, dir = %log.dir().display(), error = %e, "could not save artifact");
        }
    }
}
