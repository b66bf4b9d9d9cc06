//! Result sink — archives a summary of each completed assessment.
//!
//! Persistence is best-effort: callers log a failed `record` and carry on,
//! the report is generated either way.
//!
//! `AppState` holds an `Arc<dyn ResultSink>`: Postgres when `DATABASE_URL` is
//! set, otherwise the log-only sink.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::Serialize;
use sqlx::PgPool;
use thiserror::Error;
use tracing::info;
use uuid::Uuid;

use crate::assessment::matcher::Recommendation;
use crate::assessment::profile::ClientProfile;

/// Careers kept per archived result.
pub const ARCHIVED_CAREERS: usize = 3;
const NOT_AVAILABLE: &str = "N/A";

#[derive(Debug, Error)]
pub enum SinkError {
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ArchivedCareer {
    pub career: String,
    /// Match score rounded to a whole number, or "N/A".
    pub score: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ResultRecord {
    pub id: Uuid,
    pub recorded_at: DateTime<Utc>,
    pub name: String,
    pub age: String,
    pub email: String,
    pub careers: [ArchivedCareer; ARCHIVED_CAREERS],
}

impl ResultRecord {
    pub fn new(
        profile: &ClientProfile,
        recommendations: &[Recommendation],
        recorded_at: DateTime<Utc>,
    ) -> Self {
        let career = |i: usize| match recommendations.get(i) {
            Some(rec) => ArchivedCareer {
                career: rec.cluster.clone(),
                score: format!("{:.0}", rec.score),
            },
            None => ArchivedCareer {
                career: NOT_AVAILABLE.to_string(),
                score: NOT_AVAILABLE.to_string(),
            },
        };

        let or_na = |s: &str| {
            if s.is_empty() {
                NOT_AVAILABLE.to_string()
            } else {
                s.to_string()
            }
        };

        Self {
            id: Uuid::new_v4(),
            recorded_at,
            name: or_na(&profile.name),
            age: profile
                .age
                .map(|a| a.to_string())
                .unwrap_or_else(|| NOT_AVAILABLE.to_string()),
            email: or_na(&profile.email),
            careers: [career(0), career(1), career(2)],
        }
    }
}

#[async_trait]
pub trait ResultSink: Send + Sync {
    async fn record(&self, record: &ResultRecord) -> Result<(), SinkError>;

    fn backend(&self) -> &'static str;
}

/// Appends one row per assessment to `assessment_results`.
pub struct PgResultSink {
    db: PgPool,
}

impl PgResultSink {
    pub fn new(db: PgPool) -> Self {
        Self { db }
    }
}

#[async_trait]
impl ResultSink for PgResultSink {
    async fn record(&self, record: &ResultRecord) -> Result<(), SinkError> {
        let [first, second, third] = &record.careers;
        sqlx::query(
            r#"
            INSERT INTO assessment_results
                (id, recorded_at, name, age, email,
                 career_1, score_1, career_2, score_2, career_3, score_3)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11)
            "#,
        )
        .bind(record.id)
        .bind(record.recorded_at)
        .bind(&record.name)
        .bind(&record.age)
        .bind(&record.email)
        .bind(&first.career)
        .bind(&first.score)
        .bind(&second.career)
        .bind(&second.score)
        .bind(&third.career)
        .bind(&third.score)
        .execute(&self.db)
        .await?;

        Ok(())
    }

    fn backend(&self) -> &'static str {
        "postgres"
    }
}

/// Writes results to the application log only.
pub struct LogSink;

#[async_trait]
impl ResultSink for LogSink {
    async fn record(&self, record: &ResultRecord) -> Result<(), SinkError> {
        let [first, second, third] = &record.careers;
        info!(
            id = %record.id,
            name = %record.name,
            email = %record.email,
            "Assessment result: {} ({}), {} ({}), {} ({})",
            first.career,
            first.score,
            second.career,
            second.score,
            third.career,
            third.score
        );
        Ok(())
    }

    fn backend(&self) -> &'static str {
        "log"
    }
}
