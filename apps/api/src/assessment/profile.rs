use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::assessment::models::TraitProfile;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FinancialCondition {
    Low,
    Mid,
    Rich,
}

/// Identity and free-text fields as collected by the form. List fields are
/// comma-separated strings.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct RespondentInfo {
    pub name: String,
    pub age: Option<u32>,
    pub email: String,
    pub phone: String,
    #[serde(alias = "class_or_occupation")]
    pub status: String,
    pub hobbies: String,
    pub interests: String,
    pub skills: String,
    pub competitive_subjects: String,
    pub easy_tasks: String,
    pub passion: String,
    pub big_problems: String,
    pub topics_of_interest: String,
    pub extra_benefit: String,
    pub future_opportunities: String,
    pub financial_condition: Option<FinancialCondition>,
}

impl RespondentInfo {
    /// Fields that must be present before results are generated or saved.
    pub fn missing_required(&self) -> Vec<&'static str> {
        let mut missing = Vec::new();
        if self.name.trim().is_empty() {
            missing.push("name");
        }
        if self.email.trim().is_empty() {
            missing.push("email");
        }
        missing
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct FreeTextLists {
    pub hobbies: Vec<String>,
    pub interests: Vec<String>,
    pub skills: Vec<String>,
    pub competitive_subjects: Vec<String>,
    pub easy_tasks: Vec<String>,
    pub passion: Vec<String>,
    pub big_problems: Vec<String>,
    pub topics_of_interest: Vec<String>,
    pub extra_benefit: Vec<String>,
    pub future_opportunities: Vec<String>,
}

/// Everything known about one respondent after scoring. This is also the
/// context handed to narrative generation.
#[derive(Debug, Clone, Serialize)]
pub struct ClientProfile {
    pub name: String,
    pub age: Option<u32>,
    pub email: String,
    pub phone: String,
    pub status: String,
    pub financial_condition: Option<FinancialCondition>,
    pub date: NaiveDate,
    #[serde(flatten)]
    pub lists: FreeTextLists,
    pub traits: TraitProfile,
}

impl ClientProfile {
    pub fn build(info: &RespondentInfo, traits: TraitProfile, date: NaiveDate) -> Self {
        Self {
            name: info.name.trim().to_string(),
            age: info.age,
            email: info.email.trim().to_string(),
            phone: info.phone.trim().to_string(),
            status: info.status.trim().to_string(),
            financial_condition: info.financial_condition,
            date,
            lists: FreeTextLists {
                hobbies: split_list(&info.hobbies),
                interests: split_list(&info.interests),
                skills: split_list(&info.skills),
                competitive_subjects: split_list(&info.competitive_subjects),
                easy_tasks: split_list(&info.easy_tasks),
                passion: split_list(&info.passion),
                big_problems: split_list(&info.big_problems),
                topics_of_interest: split_list(&info.topics_of_interest),
                extra_benefit: split_list(&info.extra_benefit),
                future_opportunities: split_list(&info.future_opportunities),
            },
            traits,
        }
    }
}

/// Splits a comma-separated entry into trimmed, non-empty items.
pub fn split_list(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(str::trim)
        .filter(|item| !item.is_empty())
        .map(str::to_string)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_split_list_trims_and_drops_empty() {
        assert_eq!(
            split_list(" Reading, Cooking ,, Hiking ,"),
            vec!["Reading", "Cooking", "Hiking"]
        );
        assert!(split_list("  ").is_empty());
    }

    #[test]
    fn test_missing_required_fields() {
        let info = RespondentInfo {
            name: "  ".to_string(),
            ..Default::default()
        };
        assert_eq!(info.missing_required(), vec!["name", "email"]);

        let info = RespondentInfo {
            name: "Asha".to_string(),
            email: "asha@example.com".to_string(),
            ..Default::default()
        };
        assert!(info.missing_required().is_empty());
    }

    #[test]
    fn test_info_accepts_class_or_occupation_alias() {
        let info: RespondentInfo = serde_json::from_str(
            r#"{"name": "Ravi", "class_or_occupation": "College", "financial_condition": "mid"}"#,
        )
        .unwrap();
        assert_eq!(info.status, "College");
        assert_eq!(info.financial_condition, Some(FinancialCondition::Mid));
    }

    #[test]
    fn test_build_profile_splits_lists() {
        let info = RespondentInfo {
            name: " Meera ".to_string(),
            skills: "Python, Public Speaking".to_string(),
            ..Default::default()
        };
        let date = NaiveDate::from_ymd_opt(2026, 3, 1).unwrap();
        let profile = ClientProfile::build(&info, TraitProfile::default(), date);
        assert_eq!(profile.name, "Meera");
        assert_eq!(profile.lists.skills, vec!["Python", "Public Speaking"]);
        assert!(profile.lists.hobbies.is_empty());
    }
}
