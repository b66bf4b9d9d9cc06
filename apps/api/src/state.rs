use std::sync::Arc;

use crate::assessment::catalog::Catalog;
use crate::assessment::models::TraitRegistry;
use crate::assessment::questions::QuestionBank;
use crate::assessment::ReferenceData;
use crate::narrative::NarrativeProvider;
use crate::sink::ResultSink;

/// Shared application state injected into all route handlers via Axum extractors.
#[derive(Clone)]
pub struct AppState {
    pub bank: Arc<QuestionBank>,
    /// Canonical trait orderings, derived from `bank` at startup.
    pub registry: Arc<TraitRegistry>,
    pub catalog: Arc<Catalog>,
    /// Narrative backend. `StaticNarrator` when no LLM is configured.
    pub narrator: Arc<dyn NarrativeProvider>,
    /// Result archive. `LogSink` when no database is configured.
    pub sink: Arc<dyn ResultSink>,
}

impl AppState {
    pub fn new(
        data: ReferenceData,
        narrator: Arc<dyn NarrativeProvider>,
        sink: Arc<dyn ResultSink>,
    ) -> Self {
        Self {
            bank: Arc::new(data.bank),
            registry: Arc::new(data.registry),
            catalog: Arc::new(data.catalog),
            narrator,
            sink,
        }
    }
}
