//! Career Matcher — ranks every catalog cluster against a respondent's
//! interest vector by Pearson correlation.
//!
//! Correlation measures the shape of the profile, not its magnitude: a
//! respondent who scores uniformly lower than a cluster's archetype still
//! matches it if the relative emphasis agrees.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::assessment::catalog::Catalog;
use crate::assessment::models::TraitScores;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum MatchTier {
    #[serde(rename = "Best Fit")]
    BestFit,
    #[serde(rename = "Great Fit")]
    GreatFit,
    #[serde(rename = "Good Fit")]
    GoodFit,
    #[serde(rename = "Not a Strong Match")]
    NotAStrongMatch,
}

impl MatchTier {
    /// Thresholds apply to the raw correlation, not the rescaled score.
    pub fn from_correlation(correlation: f64) -> Self {
        if correlation >= 0.7 {
            MatchTier::BestFit
        } else if correlation >= 0.5 {
            MatchTier::GreatFit
        } else if correlation > 0.0 {
            MatchTier::GoodFit
        } else {
            MatchTier::NotAStrongMatch
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            MatchTier::BestFit => "Best Fit",
            MatchTier::GreatFit => "Great Fit",
            MatchTier::GoodFit => "Good Fit",
            MatchTier::NotAStrongMatch => "Not a Strong Match",
        }
    }
}

impl fmt::Display for MatchTier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Recommendation {
    pub cluster: String,
    /// 0 – 100
    pub score: f64,
    pub tier: MatchTier,
}

/// True when every component is numerically identical (or there are fewer than two).
fn has_zero_variance(values: &[f64]) -> bool {
    match values.first() {
        Some(first) => values.iter().all(|v| v == first),
        None => true,
    }
}

/// Pearson correlation, defined as 0 when either vector has zero variance.
pub fn correlation(a: &[f64], b: &[f64]) -> f64 {
    debug_assert_eq!(a.len(), b.len());
    if has_zero_variance(a) || has_zero_variance(b) {
        return 0.0;
    }

    let n = a.len() as f64;
    let mean_a = a.iter().sum::<f64>() / n;
    let mean_b = b.iter().sum::<f64>() / n;

    let (mut cov, mut var_a, mut var_b) = (0.0, 0.0, 0.0);
    for (x, y) in a.iter().zip(b) {
        let (dx, dy) = (x - mean_a, y - mean_b);
        cov += dx * dy;
        var_a += dx * dx;
        var_b += dy * dy;
    }

    (cov / (var_a.sqrt() * var_b.sqrt())).clamp(-1.0, 1.0)
}

/// Projects `scores` onto `order`; traits missing from `scores` read as 0.
fn vector(scores: &TraitScores, order: &[String]) -> Vec<f64> {
    order
        .iter()
        .map(|t| scores.get(t).copied().unwrap_or(0.0))
        .collect()
}

/// Ranks every cluster by match score, descending. Ties keep catalog order.
/// Entries whose score is not finite are dropped.
pub fn rank_careers(
    respondent: &TraitScores,
    catalog: &Catalog,
    order: &[String],
) -> Vec<Recommendation> {
    let respondent = vector(respondent, order);

    let mut recommendations: Vec<Recommendation> = catalog
        .clusters()
        .iter()
        .filter_map(|cluster| {
            let archetype = vector(cluster.interest()?, order);
            let r = correlation(&respondent, &archetype);
            let score = (r + 1.0) * 50.0;
            if !score.is_finite() {
                return None;
            }
            Some(Recommendation {
                cluster: cluster.name.clone(),
                score,
                tier: MatchTier::from_correlation(r),
            })
        })
        .collect();

    recommendations.sort_by(|a, b| b.score.total_cmp(&a.score));
    recommendations
}

#[cfg(test)]
mod tests {
    use std::collections::BTreeMap;

    use super::*;
    use crate::assessment::catalog::CareerCluster;
    use crate::assessment::models::Framework;
    use crate::assessment::questions::QuestionBank;

    fn order() -> Vec<String> {
        ["R", "I", "A", "S", "E", "C"]
            .iter()
            .map(|s| s.to_string())
            .collect()
    }

    fn scores(values: [f64; 6]) -> TraitScores {
        order().into_iter().zip(values).collect()
    }

    fn catalog(entries: &[(&str, [f64; 6])]) -> Catalog {
        let clusters = entries
            .iter()
            .map(|(name, values)| CareerCluster {
                name: name.to_string(),
                description: None,
                profile: BTreeMap::from([(Framework::Interest, scores(*values))]),
            })
            .collect();
        Catalog::new(clusters, &order()).unwrap()
    }

    #[test]
    fn test_identical_vectors_best_fit() {
        let profile = [8.0, 7.0, 3.0, 5.0, 4.0, 6.0];
        let ranked = rank_careers(&scores(profile), &catalog(&[("Farming", profile)]), &order());
        assert_eq!(ranked.len(), 1);
        assert!((ranked[0].score - 100.0).abs() < 1e-9, "score was {}", ranked[0].score);
        assert_eq!(ranked[0].tier, MatchTier::BestFit);
    }

    #[test]
    fn test_scaled_vector_still_perfect_match() {
        let archetype = [8.0, 6.0, 2.0, 4.0, 4.0, 6.0];
        let respondent = archetype.map(|v| v / 2.0);
        let ranked = rank_careers(&scores(respondent), &catalog(&[("Farming", archetype)]), &order());
        assert!((ranked[0].score - 100.0).abs() < 1e-9);
    }

    #[test]
    fn test_uniform_respondent_scores_fifty() {
        let cat = catalog(&[
            ("Design", [5.0, 4.0, 10.0, 3.0, 5.0, 6.0]),
            ("Law", [2.0, 8.0, 3.0, 7.0, 7.0, 9.0]),
        ]);
        let ranked = rank_careers(&scores([6.0; 6]), &cat, &order());
        assert_eq!(ranked.len(), 2);
        for rec in &ranked {
            assert_eq!(rec.score, 50.0);
            assert_eq!(rec.tier, MatchTier::NotAStrongMatch);
        }
        // ties keep catalog order
        assert_eq!(ranked[0].cluster, "Design");
        assert_eq!(ranked[1].cluster, "Law");
    }

    #[test]
    fn test_uniform_cluster_is_guarded() {
        let cat = catalog(&[("Flat", [5.0; 6])]);
        let ranked = rank_careers(&scores([1.0, 2.0, 3.0, 4.0, 5.0, 6.0]), &cat, &order());
        assert_eq!(ranked[0].score, 50.0);
        assert_eq!(ranked[0].tier, MatchTier::NotAStrongMatch);
    }

    #[test]
    fn test_inverse_vector_scores_zero() {
        let a = [1.0, 2.0, 3.0, 4.0, 5.0, 6.0];
        let b = [6.0, 5.0, 4.0, 3.0, 2.0, 1.0];
        let ranked = rank_careers(&scores(a), &catalog(&[("Opposite", b)]), &order());
        assert!(ranked[0].score.abs() < 1e-9);
        assert_eq!(ranked[0].tier, MatchTier::NotAStrongMatch);
    }

    #[test]
    fn test_two_distinct_values_correlate() {
        let respondent = [0.0, 0.0, 0.0, 10.0, 10.0, 10.0];
        let archetype = [1.0, 2.0, 3.0, 7.0, 8.0, 9.0];
        let r = correlation(&respondent, &archetype);
        assert!(r > 0.9, "r was {r}");
    }

    #[test]
    fn test_ranking_is_descending_and_complete() {
        let cat = catalog(&[
            ("Arts", [4.0, 3.0, 10.0, 6.0, 5.0, 2.0]),
            ("Science", [6.0, 10.0, 3.0, 2.0, 3.0, 7.0]),
            ("Teaching", [4.0, 7.0, 5.0, 10.0, 6.0, 6.0]),
        ]);
        let respondent = scores([5.0, 9.5, 2.5, 2.5, 2.5, 7.5]);
        let ranked = rank_careers(&respondent, &cat, &order());

        assert_eq!(ranked.len(), 3);
        assert_eq!(ranked[0].cluster, "Science");
        assert!(ranked.windows(2).all(|w| w[0].score >= w[1].score));
        assert!(ranked.iter().all(|r| (0.0..=100.0).contains(&r.score)));
    }

    #[test]
    fn test_ranking_is_deterministic() {
        let bank = QuestionBank::builtin().unwrap();
        let order = bank.registry().interest_traits().to_vec();
        let cat = Catalog::builtin(&order).unwrap();
        let respondent: TraitScores = order
            .iter()
            .cloned()
            .zip([7.5, 5.0, 2.5, 10.0, 5.0, 0.0])
            .collect();

        let first = rank_careers(&respondent, &cat, &order);
        let second = rank_careers(&respondent, &cat, &order);
        assert_eq!(first.len(), cat.len());
        assert_eq!(first, second);
    }

    #[test]
    fn test_tier_thresholds() {
        assert_eq!(MatchTier::from_correlation(0.7), MatchTier::BestFit);
        assert_eq!(MatchTier::from_correlation(0.69), MatchTier::GreatFit);
        assert_eq!(MatchTier::from_correlation(0.5), MatchTier::GreatFit);
        assert_eq!(MatchTier::from_correlation(0.01), MatchTier::GoodFit);
        assert_eq!(MatchTier::from_correlation(0.0), MatchTier::NotAStrongMatch);
        assert_eq!(MatchTier::from_correlation(-0.4), MatchTier::NotAStrongMatch);
    }

    #[test]
    fn test_tier_serializes_as_label() {
        let json = serde_json::to_string(&MatchTier::NotAStrongMatch).unwrap();
        assert_eq!(json, "\"Not a Strong Match\"");
    }
}
