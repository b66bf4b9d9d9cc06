//! Raw answer ingestion.
//!
//! The form layer posts selected options keyed `"<Trait>_<index>"` per framework
//! (a leading framework prefix such as `"RIASEC_Realistic_3"` is tolerated).
//! Resolution turns that loose map into a strongly shaped `FrameworkAnswers`
//! so each scoring branch never probes a generic key-value map.

use std::collections::{BTreeMap, HashMap};

use serde::{Deserialize, Serialize};

use crate::assessment::models::{AnswerShape, Framework};
use crate::assessment::questions::FrameworkSection;

/// Composite answer key within one framework. `index` is 1-based.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct AnswerKey {
    pub trait_name: String,
    pub index: usize,
}

impl AnswerKey {
    pub fn new(trait_name: impl Into<String>, index: usize) -> Self {
        Self {
            trait_name: trait_name.into(),
            index,
        }
    }

    /// Parses `"Trait_3"` or `"Prefix_Trait_3"`. Malformed keys yield `None`.
    pub fn parse(raw: &str) -> Option<Self> {
        let (rest, index) = raw.rsplit_once('_')?;
        let index: usize = index.parse().ok()?;
        if index == 0 {
            return None;
        }
        let trait_name = rest.rsplit_once('_').map_or(rest, |(_, t)| t);
        if trait_name.is_empty() {
            return None;
        }
        Some(Self::new(trait_name, index))
    }
}

/// Selected options per framework, exactly as collected.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RawAnswerSet(BTreeMap<Framework, BTreeMap<String, String>>);

#[cfg(test)]
impl RawAnswerSet {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(
        &mut self,
        framework: Framework,
        trait_name: &str,
        index: usize,
        selected: impl Into<String>,
    ) {
        self.0
            .entry(framework)
            .or_default()
            .insert(format!("{trait_name}_{index}"), selected.into());
    }
}

impl RawAnswerSet {
    fn parsed(&self, framework: Framework) -> HashMap<AnswerKey, &str> {
        self.0
            .get(&framework)
            .into_iter()
            .flatten()
            .filter_map(|(key, selected)| {
                AnswerKey::parse(key).map(|k| (k, selected.as_str()))
            })
            .collect()
    }
}

/// Answers resolved against the question bank: one slot per bank question,
/// `None` where the respondent gave no usable answer.
#[derive(Debug, Clone, PartialEq)]
pub enum FrameworkAnswers {
    Aptitude(BTreeMap<String, Vec<Option<bool>>>),
    Ordinal(BTreeMap<String, Vec<Option<usize>>>),
    Categorical(BTreeMap<String, Vec<Option<String>>>),
}

/// Resolves the raw answers for `section.framework`.
pub fn resolve(section: &FrameworkSection, raw: &RawAnswerSet) -> FrameworkAnswers {
    let answers = raw.parsed(section.framework);
    let selected = |trait_name: &str, index: usize| -> Option<&str> {
        answers
            .get(&AnswerKey::new(trait_name, index))
            .copied()
    };

    match section.framework.answer_shape() {
        AnswerShape::Correctness => FrameworkAnswers::Aptitude(
            section
                .traits
                .iter()
                .map(|def| {
                    let slots = def
                        .questions
                        .iter()
                        .enumerate()
                        .map(|(i, q)| {
                            let choice = selected(&def.name, i + 1)?;
                            q.ordinal_of(choice)?;
                            Some(q.correct.as_deref() == Some(choice))
                        })
                        .collect();
                    (def.name.clone(), slots)
                })
                .collect(),
        ),
        AnswerShape::Ordinal => FrameworkAnswers::Ordinal(
            section
                .traits
                .iter()
                .map(|def| {
                    let slots = def
                        .questions
                        .iter()
                        .enumerate()
                        .map(|(i, q)| q.ordinal_of(selected(&def.name, i + 1)?))
                        .collect();
                    (def.name.clone(), slots)
                })
                .collect(),
        ),
        AnswerShape::Categorical => FrameworkAnswers::Categorical(
            section
                .traits
                .iter()
                .map(|def| {
                    let slots = (1..=def.questions.len())
                        .map(|i| selected(&def.name, i).map(str::to_string))
                        .collect();
                    (def.name.clone(), slots)
                })
                .collect(),
        ),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::assessment::questions::QuestionBank;

    #[test]
    fn test_parse_plain_and_prefixed_keys() {
        assert_eq!(AnswerKey::parse("Realistic_3"), Some(AnswerKey::new("Realistic", 3)));
        assert_eq!(
            AnswerKey::parse("RIASEC_Realistic_10"),
            Some(AnswerKey::new("Realistic", 10))
        );
        assert_eq!(AnswerKey::parse("aptitude_LR_2"), Some(AnswerKey::new("LR", 2)));
    }

    #[test]
    fn test_parse_malformed_keys() {
        assert_eq!(AnswerKey::parse("Realistic"), None);
        assert_eq!(AnswerKey::parse("Realistic_x"), None);
        assert_eq!(AnswerKey::parse("Realistic_0"), None);
        assert_eq!(AnswerKey::parse("_4"), None);
    }

    #[test]
    fn test_resolve_interest_ordinals() {
        let bank = QuestionBank::builtin().unwrap();
        let section = bank.section(Framework::Interest).unwrap();
        let mut raw = RawAnswerSet::new();
        raw.insert(Framework::Interest, "Realistic", 1, "Very much");
        raw.insert(Framework::Interest, "Realistic", 2, "not an option");

        let FrameworkAnswers::Ordinal(resolved) = resolve(section, &raw) else {
            panic!("interest answers must resolve to ordinals");
        };
        let realistic = &resolved["Realistic"];
        assert_eq!(realistic.len(), 10);
        assert_eq!(realistic[0], Some(4));
        assert_eq!(realistic[1], None);
        assert!(resolved["Social"].iter().all(Option::is_none));
    }

    #[test]
    fn test_resolve_aptitude_correctness() {
        let bank = QuestionBank::builtin().unwrap();
        let section = bank.section(Framework::Aptitude).unwrap();
        let mut raw = RawAnswerSet::new();
        raw.insert(Framework::Aptitude, "Nu", 1, "12");
        raw.insert(Framework::Aptitude, "Nu", 2, "4");

        let FrameworkAnswers::Aptitude(resolved) = resolve(section, &raw) else {
            panic!("aptitude answers must resolve to correctness");
        };
        assert_eq!(resolved["Nu"][0], Some(true));
        assert_eq!(resolved["Nu"][1], Some(false));
        assert_eq!(resolved["Nu"][2], None);
    }

    #[test]
    fn test_answers_for_other_framework_ignored() {
        let bank = QuestionBank::builtin().unwrap();
        let section = bank.section(Framework::Culture).unwrap();
        let mut raw = RawAnswerSet::new();
        raw.insert(Framework::Interest, "PDI", 1, "Always");

        let FrameworkAnswers::Categorical(resolved) = resolve(section, &raw) else {
            panic!("culture answers must resolve to labels");
        };
        assert!(resolved["PDI"].iter().all(Option::is_none));
    }
}
