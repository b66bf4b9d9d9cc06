pub mod health;

use axum::{
    routing::{get, post},
    Router,
};

use crate::assessment::handlers;
use crate::state::AppState;

pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health::health_handler))
        // Reference data
        .route(
            "/api/v1/questionnaire",
            get(handlers::handle_questionnaire),
        )
        .route("/api/v1/careers", get(handlers::handle_list_careers))
        .route("/api/v1/careers/:name", get(handlers::handle_get_career))
        // Assessment pipeline
        .route(
            "/api/v1/assessments",
            post(handlers::handle_submit_assessment),
        )
        .route("/api/v1/assessments/score", post(handlers::handle_score))
        .route(
            "/api/v1/assessments/recommend",
            post(handlers::handle_recommend),
        )
        .with_state(state)
}
