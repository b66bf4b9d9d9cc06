//! Question bank — the static reference data the form layer renders and the
//! scorer resolves answers against.
//!
//! Loaded once at startup, either from the embedded `data/questions.json` or
//! from `QUESTION_BANK_PATH`.

use std::path::Path;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::assessment::models::{Framework, TraitRegistry};

const BUILTIN_QUESTIONS: &str = include_str!("../../data/questions.json");

#[derive(Debug, Error)]
pub enum BankError {
    #[error("failed to read question bank: {0}")]
    Io(#[from] std::io::Error),

    #[error("failed to parse question bank: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("question bank has no section for {0:?}")]
    MissingFramework(Framework),

    #[error("question bank lists {0:?} more than once")]
    DuplicateFramework(Framework),

    #[error("aptitude question {index} of trait '{trait_name}' has no valid correct option")]
    MissingCorrectOption { trait_name: String, index: usize },
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Question {
    pub prompt: String,
    pub options: Vec<String>,
    /// Known-correct option for aptitude items. Never sent to clients.
    #[serde(default, skip_serializing)]
    pub correct: Option<String>,
}

impl Question {
    /// 1-based position of `selected` in the option list.
    pub fn ordinal_of(&self, selected: &str) -> Option<usize> {
        self.options
            .iter()
            .position(|option| option == selected)
            .map(|i| i + 1)
    }
}

/// Report text for the three score bands.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BandAnalysis {
    pub low: String,
    pub medium: String,
    pub high: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TraitDefinition {
    pub name: String,
    pub display_name: String,
    pub meaning: String,
    pub analysis: BandAnalysis,
    pub questions: Vec<Question>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FrameworkSection {
    pub framework: Framework,
    pub traits: Vec<TraitDefinition>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct QuestionBank {
    frameworks: Vec<FrameworkSection>,
}

impl QuestionBank {
    pub fn builtin() -> Result<Self, BankError> {
        Self::from_json(BUILTIN_QUESTIONS)
    }

    pub fn from_path(path: impl AsRef<Path>) -> Result<Self, BankError> {
        let raw = std::fs::read_to_string(path)?;
        Self::from_json(&raw)
    }

    pub fn from_json(raw: &str) -> Result<Self, BankError> {
        let bank: QuestionBank = serde_json::from_str(raw)?;
        bank.validate()?;
        Ok(bank)
    }

    fn validate(&self) -> Result<(), BankError> {
        for framework in Framework::ALL {
            match self
                .frameworks
                .iter()
                .filter(|s| s.framework == framework)
                .count()
            {
                0 => return Err(BankError::MissingFramework(framework)),
                1 => {}
                _ => return Err(BankError::DuplicateFramework(framework)),
            }
        }

        if let Some(aptitude) = self.section(Framework::Aptitude) {
            for def in &aptitude.traits {
                for (i, question) in def.questions.iter().enumerate() {
                    let valid = question
                        .correct
                        .as_deref()
                        .is_some_and(|c| question.options.iter().any(|o| o == c));
                    if !valid {
                        return Err(BankError::MissingCorrectOption {
                            trait_name: def.name.clone(),
                            index: i + 1,
                        });
                    }
                }
            }
        }

        Ok(())
    }

    pub fn sections(&self) -> &[FrameworkSection] {
        &self.frameworks
    }

    pub fn section(&self, framework: Framework) -> Option<&FrameworkSection> {
        self.frameworks.iter().find(|s| s.framework == framework)
    }

    /// Canonical trait orderings, in bank order.
    pub fn registry(&self) -> TraitRegistry {
        TraitRegistry::new(self.frameworks.iter().map(|section| {
            (
                section.framework,
                section.traits.iter().map(|t| t.name.clone()).collect(),
            )
        }))
    }

    pub fn question_count(&self) -> usize {
        self.frameworks
            .iter()
            .flat_map(|s| s.traits.iter())
            .map(|t| t.questions.len())
            .sum()
    }
}
