use std::path::PathBuf;

use anyhow::{Context, Result};

/// Application configuration loaded from environment variables.
/// Every collaborator is optional: without `DATABASE_URL` results are only
/// logged, without `ANTHROPIC_API_KEY` reports use static narrative text.
#[derive(Debug, Clone)]
pub struct Config {
    pub database_url: Option<String>,
    pub anthropic_api_key: Option<String>,
    pub narrative_enabled: bool,
    pub question_bank_path: Option<PathBuf>,
    pub catalog_path: Option<PathBuf>,
    pub port: u16,
    pub rust_log: String,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            database_url: None,
            anthropic_api_key: None,
            narrative_enabled: true,
            question_bank_path: None,
            catalog_path: None,
            port: 8080,
            rust_log: "info".to_string(),
        }
    }
}

impl Config {
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok(); // load .env if present; ignore if missing

        let defaults = Config::default();
        Ok(Config {
            database_url: optional_env("DATABASE_URL"),
            anthropic_api_key: optional_env("ANTHROPIC_API_KEY"),
            narrative_enabled: match optional_env("NARRATIVE_ENABLED") {
                Some(raw) => parse_flag(&raw)
                    .with_context(|| format!("NARRATIVE_ENABLED must be a boolean, got '{raw}'"))?,
                None => defaults.narrative_enabled,
            },
            question_bank_path: optional_env("QUESTION_BANK_PATH").map(PathBuf::from),
            catalog_path: optional_env("CATALOG_PATH").map(PathBuf::from),
            port: match optional_env("PORT") {
                Some(raw) => raw
                    .parse::<u16>()
                    .context("PORT must be a valid port number")?,
                None => defaults.port,
            },
            rust_log: optional_env("RUST_LOG").unwrap_or(defaults.rust_log),
        })
    }

    /// API key to use for narrative calls, if narrative generation is on.
    pub fn narrative_api_key(&self) -> Option<&str> {
        self.anthropic_api_key
            .as_deref()
            .filter(|_| self.narrative_enabled)
    }
}

/// Unset and blank variables are both treated as absent.
fn optional_env(key: &str) -> Option<String> {
    std::env::var(key)
        .ok()
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

fn parse_flag(raw: &str) -> Option<bool> {
    match raw.to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Some(true),
        "0" | "false" | "no" | "off" => Some(false),
        _ => None,
    }
}
