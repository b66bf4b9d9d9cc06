//! Narrative filler for reports.
//!
//! Free text is optional: every provider may return `None`, and the composer
//! substitutes static fallback content. Scoring and matching never depend on it.
//!
//! `AppState` holds an `Arc<dyn NarrativeProvider>`, chosen at startup from config.

use async_trait::async_trait;
use tracing::warn;

use crate::llm_client::{prompts::NARRATIVE_SYSTEM, prompts::CONTEXT_PREAMBLE, LlmClient};

pub mod composer;
pub mod prompts;

pub use composer::{Narrative, NarrativeComposer};

#[async_trait]
pub trait NarrativeProvider: Send + Sync {
    /// Free text for `prompt`, with `context` (serialized profile) attached.
    /// `None` when the provider is unavailable or failed.
    async fn generate(&self, prompt: &str, context: &str) -> Option<String>;

    /// Name surfaced in logs and responses.
    fn backend(&self) -> &'static str;
}

/// Provider backed by the shared `LlmClient`.
pub struct LlmNarrator {
    llm: LlmClient,
}

impl LlmNarrator {
    pub fn new(llm: LlmClient) -> Self {
        Self { llm }
    }
}

#[async_trait]
impl NarrativeProvider for LlmNarrator {
    async fn generate(&self, prompt: &str, context: &str) -> Option<String> {
        let full_prompt = format!("{prompt}\n\n{CONTEXT_PREAMBLE}\n{context}");
        match self.llm.complete(&full_prompt, NARRATIVE_SYSTEM).await {
            Ok(text) => Some(text),
            Err(e) => {
                warn!("Narrative generation unavailable, using fallback: {e}");
                None
            }
        }
    }

    fn backend(&self) -> &'static str {
        "llm"
    }
}

/// Provider used when no LLM is configured. Always falls back.
pub struct StaticNarrator;

#[async_trait]
impl NarrativeProvider for StaticNarrator {
    async fn generate(&self, _prompt: &str, _context: &str) -> Option<String> {
        None
    }

    fn backend(&self) -> &'static str {
        "static"
    }
}
