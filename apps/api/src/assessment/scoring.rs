//! Score Calculator — converts resolved answers into normalized 0–10 trait scores.
//!
//! Pure and infallible. Missing or malformed answers are treated as absent;
//! every declared trait is always present in the output.

use serde::{Deserialize, Serialize};

use crate::assessment::answers::{resolve, FrameworkAnswers, RawAnswerSet};
use crate::assessment::models::{Framework, TraitProfile, TraitScores};
use crate::assessment::questions::QuestionBank;

/// Width of one ordinal step on the 0–10 scale (five levels).
const ORDINAL_STEP: f64 = 2.5;
/// Contribution of a missing or unrecognized cultural-values label.
const CULTURE_MIDPOINT: f64 = 5.0;

/// Fixed label → value table for cultural-values items.
const CULTURE_LABEL_VALUES: &[(&str, f64)] = &[
    ("Not at all", 0.0),
    ("Not important", 0.0),
    ("Not uncomfortable at all", 0.0),
    ("Not resistant at all", 0.0),
    ("Always rely on others", 0.0),
    ("Always prefer short-term", 0.0),
    ("Not freely at all", 0.0),
    ("Not patient at all", 0.0),
    ("Not optimistic at all", 0.0),
    ("Very uncomfortable", 0.0),
    ("Slightly", 2.5),
    ("Somewhat", 5.0),
    ("Very", 7.5),
    ("Extremely", 10.0),
    ("Very important", 10.0),
    ("Always", 10.0),
];

pub fn culture_label_value(label: &str) -> Option<f64> {
    CULTURE_LABEL_VALUES
        .iter()
        .find(|(l, _)| *l == label)
        .map(|(_, v)| *v)
}

/// One score per name in `traits`, never omitted.
pub fn compute_trait_scores(answers: &FrameworkAnswers, traits: &[String]) -> TraitScores {
    traits
        .iter()
        .map(|name| {
            let score = match answers {
                FrameworkAnswers::Aptitude(by_trait) => {
                    aptitude_score(by_trait.get(name).map(Vec::as_slice).unwrap_or(&[]))
                }
                FrameworkAnswers::Ordinal(by_trait) => {
                    ordinal_score(by_trait.get(name).map(Vec::as_slice).unwrap_or(&[]))
                }
                FrameworkAnswers::Categorical(by_trait) => {
                    categorical_score(by_trait.get(name).map(Vec::as_slice).unwrap_or(&[]))
                }
            };
            (name.clone(), score)
        })
        .collect()
}

/// Percentage correct over all questions for the trait, scaled to 0–10.
/// Unanswered questions count as not correct.
fn aptitude_score(slots: &[Option<bool>]) -> f64 {
    if slots.is_empty() {
        return 0.0;
    }
    let correct = slots.iter().filter(|s| **s == Some(true)).count();
    correct as f64 / slots.len() as f64 * 10.0
}

/// `(mean ordinal − 1) × 2.5` over answered questions; 0 when none answered.
fn ordinal_score(slots: &[Option<usize>]) -> f64 {
    let answered: Vec<f64> = slots.iter().flatten().map(|&o| o as f64).collect();
    if answered.is_empty() {
        return 0.0;
    }
    let mean = answered.iter().sum::<f64>() / answered.len() as f64;
    (mean - 1.0) * ORDINAL_STEP
}

/// Mean label value; missing or unknown labels contribute the midpoint.
fn categorical_score(slots: &[Option<String>]) -> f64 {
    if slots.is_empty() {
        return 0.0;
    }
    let total: f64 = slots
        .iter()
        .map(|label| {
            label
                .as_deref()
                .and_then(culture_label_value)
                .unwrap_or(CULTURE_MIDPOINT)
        })
        .sum();
    total / slots.len() as f64
}

/// Scores every framework in the bank.
pub fn build_profile(bank: &QuestionBank, raw: &RawAnswerSet) -> TraitProfile {
    let registry = bank.registry();
    TraitProfile::from_frameworks(Framework::ALL.into_iter().filter_map(|framework| {
        let section = bank.section(framework)?;
        let resolved = resolve(section, raw);
        Some((
            framework,
            compute_trait_scores(&resolved, registry.traits(framework)),
        ))
    }))
}

/// Band used to pick the analysis text for a trait score.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ScoreBand {
    Low,
    Medium,
    High,
}

impl ScoreBand {
    pub fn from_score(score: f64) -> Self {
        if score < 3.5 {
            ScoreBand::Low
        } else if score > 6.5 {
            ScoreBand::High
        } else {
            ScoreBand::Medium
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            ScoreBand::Low => "low",
            ScoreBand::Medium => "medium",
            ScoreBand::High => "high",
        }
    }
}
