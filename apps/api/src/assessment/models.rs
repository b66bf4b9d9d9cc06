use std::collections::BTreeMap;
use std::fmt;

use serde::{Deserialize, Serialize};

/// The four trait systems a respondent is scored against.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Framework {
    Aptitude,
    Personality,
    Interest,
    Culture,
}

impl Framework {
    /// Report / iteration order.
    pub const ALL: [Framework; 4] = [
        Framework::Aptitude,
        Framework::Personality,
        Framework::Interest,
        Framework::Culture,
    ];

    pub fn display_name(self) -> &'static str {
        match self {
            Framework::Aptitude => "Aptitude",
            Framework::Personality => "Personality (OCEAN)",
            Framework::Interest => "Interest (RIASEC)",
            Framework::Culture => "Cultural Values (Hofstede)",
        }
    }

    /// Raw answer shape collected for this framework's questions.
    pub fn answer_shape(self) -> AnswerShape {
        match self {
            Framework::Aptitude => AnswerShape::Correctness,
            Framework::Personality | Framework::Interest => AnswerShape::Ordinal,
            Framework::Culture => AnswerShape::Categorical,
        }
    }
}

impl fmt::Display for Framework {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.display_name())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AnswerShape {
    /// Selected option compared against a known-correct option.
    Correctness,
    /// 1-based position of the selected option in its ordered option list.
    Ordinal,
    /// Selected label mapped through a fixed label → value table.
    Categorical,
}

/// Normalized 0–10 score per trait name.
pub type TraitScores = BTreeMap<String, f64>;

/// Canonical trait ordering for every framework.
///
/// Built once from the question bank and passed explicitly to scoring and
/// matching; nothing resolves a framework's trait list by name at runtime.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct TraitRegistry {
    traits: BTreeMap<Framework, Vec<String>>,
}

impl TraitRegistry {
    pub fn new(traits: impl IntoIterator<Item = (Framework, Vec<String>)>) -> Self {
        Self {
            traits: traits.into_iter().collect(),
        }
    }

    /// Ordered trait names for `framework`; empty when the framework is unknown.
    pub fn traits(&self, framework: Framework) -> &[String] {
        self.traits
            .get(&framework)
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }

    pub fn interest_traits(&self) -> &[String] {
        self.traits(Framework::Interest)
    }
}

/// Scores for one respondent across all frameworks. Immutable once built.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TraitProfile(BTreeMap<Framework, TraitScores>);

impl TraitProfile {
    pub fn from_frameworks(scores: impl IntoIterator<Item = (Framework, TraitScores)>) -> Self {
        Self(scores.into_iter().collect())
    }

    pub fn framework(&self, framework: Framework) -> Option<&TraitScores> {
        self.0.get(&framework)
    }

    /// Score for a single trait, 0 when absent.
    pub fn score(&self, framework: Framework, trait_name: &str) -> f64 {
        self.framework(framework)
            .and_then(|scores| scores.get(trait_name))
            .copied()
            .unwrap_or(0.0)
    }

    pub fn interest(&self) -> TraitScores {
        self.framework(Framework::Interest)
            .cloned()
            .unwrap_or_default()
    }
}
