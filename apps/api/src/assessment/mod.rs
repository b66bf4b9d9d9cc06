// Scoring and matching core plus the reference data it runs against.
// Everything here except `handlers` is synchronous and side-effect free.

pub mod answers;
pub mod catalog;
pub mod handlers;
pub mod matcher;
pub mod models;
pub mod profile;
pub mod questions;
pub mod scoring;

use std::path::Path;

use anyhow::{Context, Result};

use crate::assessment::catalog::Catalog;
use crate::assessment::models::TraitRegistry;
use crate::assessment::questions::QuestionBank;

/// Static reference data, loaded once at startup and never mutated.
#[derive(Debug, Clone)]
pub struct ReferenceData {
    pub bank: QuestionBank,
    pub registry: TraitRegistry,
    pub catalog: Catalog,
}

impl ReferenceData {
    /// Loads from the given paths, falling back to the embedded data files.
    pub fn load(bank_path: Option<&Path>, catalog_path: Option<&Path>) -> Result<Self> {
        let bank = match bank_path {
            Some(path) => QuestionBank::from_path(path)
                .with_context(|| format!("loading question bank from {}", path.display()))?,
            None => QuestionBank::builtin().context("loading embedded question bank")?,
        };
        let registry = bank.registry();

        let catalog = match catalog_path {
            Some(path) => Catalog::from_path(path, registry.interest_traits())
                .with_context(|| format!("loading career catalog from {}", path.display()))?,
            None => Catalog::builtin(registry.interest_traits())
                .context("loading embedded career catalog")?,
        };

        Ok(Self {
            bank,
            registry,
            catalog,
        })
    }
}
