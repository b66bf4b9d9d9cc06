//! Career cluster catalog — static reference data matched against respondents.

use std::collections::{BTreeMap, BTreeSet, HashSet};
use std::path::Path;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::assessment::models::{Framework, TraitScores};

const BUILTIN_CATALOG: &str = include_str!("../../data/catalog.json");

#[derive(Debug, Error)]
pub enum CatalogError {
    #[error("failed to read catalog: {0}")]
    Io(#[from] std::io::Error),

    #[error("failed to parse catalog: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("career cluster '{0}' is listed more than once")]
    DuplicateCluster(String),

    #[error("career cluster '{cluster}' interest traits {found:?} do not match {expected:?}")]
    InterestTraitMismatch {
        cluster: String,
        expected: Vec<String>,
        found: Vec<String>,
    },
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CareerCluster {
    pub name: String,
    #[serde(default)]
    pub description: Option<String>,
    pub profile: BTreeMap<Framework, TraitScores>,
}

impl CareerCluster {
    pub fn interest(&self) -> Option<&TraitScores> {
        self.profile.get(&Framework::Interest)
    }
}

#[derive(Debug, Deserialize)]
struct CatalogFile {
    clusters: Vec<CareerCluster>,
}

/// Immutable, validated set of career clusters in catalog order.
#[derive(Debug, Clone)]
pub struct Catalog {
    clusters: Vec<CareerCluster>,
}

impl Catalog {
    /// Validates unique names and that every interest sub-profile uses exactly
    /// `interest_traits` as its trait set.
    pub fn new(
        clusters: Vec<CareerCluster>,
        interest_traits: &[String],
    ) -> Result<Self, CatalogError> {
        let expected: BTreeSet<&str> = interest_traits.iter().map(String::as_str).collect();
        let mut seen = HashSet::new();

        for cluster in &clusters {
            if !seen.insert(cluster.name.as_str()) {
                return Err(CatalogError::DuplicateCluster(cluster.name.clone()));
            }
            let found: BTreeSet<&str> = cluster
                .interest()
                .map(|scores| scores.keys().map(String::as_str).collect())
                .unwrap_or_default();
            if found != expected {
                return Err(CatalogError::InterestTraitMismatch {
                    cluster: cluster.name.clone(),
                    expected: interest_traits.to_vec(),
                    found: found.into_iter().map(str::to_string).collect(),
                });
            }
        }

        Ok(Self { clusters })
    }

    pub fn builtin(interest_traits: &[String]) -> Result<Self, CatalogError> {
        Self::from_json(BUILTIN_CATALOG, interest_traits)
    }

    pub fn from_path(
        path: impl AsRef<Path>,
        interest_traits: &[String],
    ) -> Result<Self, CatalogError> {
        let raw = std::fs::read_to_string(path)?;
        Self::from_json(&raw, interest_traits)
    }

    pub fn from_json(raw: &str, interest_traits: &[String]) -> Result<Self, CatalogError> {
        let file: CatalogFile = serde_json::from_str(raw)?;
        Self::new(file.clusters, interest_traits)
    }

    pub fn clusters(&self) -> &[CareerCluster] {
        &self.clusters
    }

    pub fn len(&self) -> usize {
        self.clusters.len()
    }

    pub fn get(&self, name: &str) -> Option<&CareerCluster> {
        self.clusters.iter().find(|c| c.name == name)
    }
}
