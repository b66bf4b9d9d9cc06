//! Axum route handlers for the questionnaire and assessment API.

use axum::{
    extract::{Path, State},
    Json,
};
use chrono::Utc;
use serde::{Deserialize, Serialize};
use tracing::{info, warn};
use uuid::Uuid;

use crate::assessment::answers::RawAnswerSet;
use crate::assessment::catalog::CareerCluster;
use crate::assessment::matcher::{rank_careers, Recommendation};
use crate::assessment::models::TraitProfile;
use crate::assessment::profile::{ClientProfile, RespondentInfo};
use crate::assessment::questions::FrameworkSection;
use crate::assessment::scoring::build_profile;
use crate::errors::AppError;
use crate::narrative::NarrativeComposer;
use crate::report::{render_report, ReportInput};
use crate::sink::ResultRecord;
use crate::state::AppState;

// ────────────────────────────────────────────────────────────────────────────
// Request / Response types
// ────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Deserialize)]
pub struct ScoreRequest {
    #[serde(default)]
    pub answers: RawAnswerSet,
}

#[derive(Debug, Serialize)]
pub struct ScoreResponse {
    pub traits: TraitProfile,
}

#[derive(Debug, Serialize)]
pub struct RecommendResponse {
    pub traits: TraitProfile,
    pub recommendations: Vec<Recommendation>,
}

#[derive(Debug, Deserialize)]
pub struct AssessmentRequest {
    pub respondent: RespondentInfo,
    #[serde(default)]
    pub answers: RawAnswerSet,
}

#[derive(Debug, Serialize)]
pub struct AssessmentResponse {
    pub id: Uuid,
    pub profile: ClientProfile,
    pub recommendations: Vec<Recommendation>,
    /// Markdown report.
    pub report: String,
    /// Whether the result sink accepted the record.
    pub saved: bool,
    pub narrative_backend: String,
}

#[derive(Debug, Serialize)]
pub struct CareerSummary {
    pub name: String,
    pub description: Option<String>,
}

// ────────────────────────────────────────────────────────────────────────────
// Handlers
// ────────────────────────────────────────────────────────────────────────────

/// GET /api/v1/questionnaire
///
/// Full question bank for the form layer. Aptitude answer keys are never serialized.
pub async fn handle_questionnaire(State(state): State<AppState>) -> Json<Vec<FrameworkSection>> {
    Json(state.bank.sections().to_vec())
}

/// GET /api/v1/careers
pub async fn handle_list_careers(State(state): State<AppState>) -> Json<Vec<CareerSummary>> {
    Json(
        state
            .catalog
            .clusters()
            .iter()
            .map(|c| CareerSummary {
                name: c.name.clone(),
                description: c.description.clone(),
            })
            .collect(),
    )
}

/// GET /api/v1/careers/:name
pub async fn handle_get_career(
    State(state): State<AppState>,
    Path(name): Path<String>,
) -> Result<Json<CareerCluster>, AppError> {
    state
        .catalog
        .get(&name)
        .cloned()
        .map(Json)
        .ok_or_else(|| AppError::NotFound(format!("Career cluster '{name}' not found")))
}

/// POST /api/v1/assessments/score
///
/// Raw answers → trait profile. Missing answers never fail; they score as absent.
pub async fn handle_score(
    State(state): State<AppState>,
    Json(request): Json<ScoreRequest>,
) -> Json<ScoreResponse> {
    Json(ScoreResponse {
        traits: build_profile(&state.bank, &request.answers),
    })
}

/// POST /api/v1/assessments/recommend
///
/// Raw answers → trait profile + every career cluster ranked by interest match.
pub async fn handle_recommend(
    State(state): State<AppState>,
    Json(request): Json<ScoreRequest>,
) -> Json<RecommendResponse> {
    let traits = build_profile(&state.bank, &request.answers);
    let recommendations = rank_careers(
        &traits.interest(),
        &state.catalog,
        state.registry.interest_traits(),
    );
    Json(RecommendResponse {
        traits,
        recommendations,
    })
}

/// POST /api/v1/assessments
///
/// Full pipeline: score → rank → archive (best effort) → narrative → Markdown report.
pub async fn handle_submit_assessment(
    State(state): State<AppState>,
    Json(request): Json<AssessmentRequest>,
) -> Result<Json<AssessmentResponse>, AppError> {
    let missing = request.respondent.missing_required();
    if !missing.is_empty() {
        return Err(AppError::Validation(format!(
            "{} is required",
            missing.join(" and ")
        )));
    }

    let traits = build_profile(&state.bank, &request.answers);
    let recommendations = rank_careers(
        &traits.interest(),
        &state.catalog,
        state.registry.interest_traits(),
    );

    let now = Utc::now();
    let profile = ClientProfile::build(&request.respondent, traits, now.date_naive());

    let record = ResultRecord::new(&profile, &recommendations, now);
    let saved = match state.sink.record(&record).await {
        Ok(()) => true,
        Err(e) => {
            warn!(id = %record.id, "Could not archive assessment result: {e}");
            false
        }
    };

    let narrative = NarrativeComposer::new(state.narrator.as_ref())
        .compose(&profile, &state.registry, &recommendations)
        .await;

    let report = render_report(&ReportInput {
        profile: &profile,
        recommendations: &recommendations,
        bank: &state.bank,
        catalog: &state.catalog,
        narrative: &narrative,
    });

    info!(
        id = %record.id,
        top = recommendations.first().map(|r| r.cluster.as_str()).unwrap_or("none"),
        saved,
        "Assessment completed"
    );

    Ok(Json(AssessmentResponse {
        id: record.id,
        profile,
        recommendations,
        report,
        saved,
        narrative_backend: state.narrator.backend().to_string(),
    }))
}
