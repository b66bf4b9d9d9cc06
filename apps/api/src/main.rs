mod assessment;
mod config;
mod db;
mod errors;
mod llm_client;
mod narrative;
mod report;
mod routes;
mod sink;
mod state;

use anyhow::Result;
use std::net::SocketAddr;
use std::sync::Arc;
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use tracing::{info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use crate::assessment::ReferenceData;
use crate::config::Config;
use crate::db::create_pool;
use crate::llm_client::LlmClient;
use crate::narrative::{LlmNarrator, NarrativeProvider, StaticNarrator};
use crate::routes::build_router;
use crate::sink::{LogSink, PgResultSink, ResultSink};
use crate::state::AppState;

#[tokio::main]
async fn main() -> Result<()> {
    let config = Config::from_env()?;

    // Initialize structured logging
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| {
            EnvFilter::new(format!("{}={}", env!("CARGO_CRATE_NAME"), &config.rust_log))
        }))
        .with(tracing_subscriber::fmt::layer())
        .init();

    info!("Starting Compass API v{}", env!("CARGO_PKG_VERSION"));

    // Reference data is validated here; a malformed bank or catalog aborts startup.
    let data = ReferenceData::load(
        config.question_bank_path.as_deref(),
        config.catalog_path.as_deref(),
    )?;
    info!(
        "Reference data loaded: {} questions, {} career clusters",
        data.bank.question_count(),
        data.catalog.len()
    );

    let narrator = build_narrator(&config)?;
    info!("Narrative backend: {}", narrator.backend());

    let sink = build_sink(&config)?;
    info!("Result sink: {}", sink.backend());

    let state = AppState::new(data, narrator, sink);

    let app = build_router(state)
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive()); // TODO: restrict origins once the form host is fixed

    let addr: SocketAddr = format!("0.0.0.0:{}", config.port).parse()?;
    info!("Listening on {addr}");

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}

fn build_narrator(config: &Config) -> Result<Arc<dyn NarrativeProvider>> {
    match config.narrative_api_key() {
        Some(key) => {
            let llm = LlmClient::new(key.to_string())?;
            info!("LLM client initialized (model: {})", llm_client::MODEL);
            Ok(Arc::new(LlmNarrator::new(llm)))
        }
        None => {
            if config.anthropic_api_key.is_none() && config.narrative_enabled {
                warn!("ANTHROPIC_API_KEY not set; reports will use static narrative text");
            }
            Ok(Arc::new(StaticNarrator))
        }
    }
}

fn build_sink(config: &Config) -> Result<Arc<dyn ResultSink>> {
    match config.database_url.as_deref() {
        Some(url) => Ok(Arc::new(PgResultSink::new(create_pool(url)?))),
        None => {
            warn!("DATABASE_URL not set; assessment results will only be logged");
            Ok(Arc::new(LogSink))
        }
    }
}
