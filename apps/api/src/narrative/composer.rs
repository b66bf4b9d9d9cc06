use std::collections::BTreeMap;

use serde::Serialize;
use tokio::time::{timeout, Duration, Instant};
use tracing::warn;

use crate::assessment::matcher::Recommendation;
use crate::assessment::models::{Framework, TraitRegistry};
use crate::assessment::profile::ClientProfile;
use crate::assessment::scoring::ScoreBand;
use crate::narrative::prompts::{
    self, CONCLUSION_PROMPT, FALLBACK_CONCLUSION, FALLBACK_DEVELOPMENT_PLAN, FALLBACK_OPPORTUNITY,
    FALLBACK_STRENGTH, FALLBACK_THREAT, FALLBACK_WEAKNESS,
};
use crate::narrative::NarrativeProvider;

/// Number of top recommendations that get a detailed SWOT section.
pub const DETAILED_CAREERS: usize = 3;
/// Upper bound for a single provider call.
const CALL_TIMEOUT: Duration = Duration::from_secs(20);
/// Upper bound for all provider calls of one report.
const COMPOSE_BUDGET: Duration = Duration::from_secs(90);

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CareerSwot {
    pub cluster: String,
    pub strength: String,
    pub weakness: String,
    pub opportunity: String,
    pub threat: String,
}

/// All free text a report needs, already resolved against fallbacks.
#[derive(Debug, Clone, Default, Serialize)]
pub struct Narrative {
    development_plans: BTreeMap<Framework, BTreeMap<String, Vec<String>>>,
    pub swot: Vec<CareerSwot>,
    pub conclusion: String,
}

impl Narrative {
    pub fn development_plan(&self, framework: Framework, trait_name: &str) -> Vec<String> {
        self.development_plans
            .get(&framework)
            .and_then(|plans| plans.get(trait_name))
            .cloned()
            .unwrap_or_else(fallback_plan)
    }
}

fn fallback_plan() -> Vec<String> {
    FALLBACK_DEVELOPMENT_PLAN
        .iter()
        .map(|s| s.to_string())
        .collect()
}

/// Drops a leading `-`, `*`, `•`, `1.` or `1)` list marker.
fn strip_marker(line: &str) -> &str {
    let line = line.trim();
    if let Some(rest) = line.strip_prefix(['-', '*', '•']) {
        return rest.trim_start();
    }
    let digits = line.len() - line.trim_start_matches(|c: char| c.is_ascii_digit()).len();
    if digits > 0 {
        if let Some(rest) = line[digits..].strip_prefix(['.', ')']) {
            return rest.trim_start();
        }
    }
    line
}

/// Splits a free-text answer into bullet points.
fn parse_plan(text: &str) -> Vec<String> {
    text.lines()
        .map(strip_marker)
        .filter(|line| !line.is_empty())
        .map(str::to_string)
        .collect()
}

pub struct NarrativeComposer<'a> {
    provider: &'a dyn NarrativeProvider,
    call_timeout: Duration,
    budget: Duration,
}

/// Per-report call state. Once a call fails or the budget runs out, every
/// remaining item uses its fallback.
struct Session<'a> {
    provider: &'a dyn NarrativeProvider,
    context: String,
    call_timeout: Duration,
    deadline: Instant,
    available: bool,
}

impl Session<'_> {
    async fn ask(&mut self, prompt: &str) -> Option<String> {
        if !self.available {
            return None;
        }

        let remaining = self.deadline.saturating_duration_since(Instant::now());
        if remaining.is_zero() {
            warn!("Narrative budget exhausted, using fallback text for the rest of the report");
            self.available = false;
            return None;
        }

        match timeout(
            remaining.min(self.call_timeout),
            self.provider.generate(prompt, &self.context),
        )
        .await
        {
            Ok(Some(text)) => Some(text),
            Ok(None) => {
                self.available = false;
                None
            }
            Err(_) => {
                warn!(
                    backend = self.provider.backend(),
                    "Narrative call timed out, using fallback text for the rest of the report"
                );
                self.available = false;
                None
            }
        }
    }

    async fn text_or(&mut self, prompt: &str, fallback: &str) -> String {
        self.ask(prompt)
            .await
            .unwrap_or_else(|| fallback.to_string())
    }
}

impl<'a> NarrativeComposer<'a> {
    pub fn new(provider: &'a dyn NarrativeProvider) -> Self {
        Self {
            provider,
            call_timeout: CALL_TIMEOUT,
            budget: COMPOSE_BUDGET,
        }
    }

    pub async fn compose(
        &self,
        profile: &ClientProfile,
        registry: &TraitRegistry,
        recommendations: &[Recommendation],
    ) -> Narrative {
        let mut session = Session {
            provider: self.provider,
            context: serde_json::to_string(profile).unwrap_or_default(),
            call_timeout: self.call_timeout,
            deadline: Instant::now() + self.budget,
            available: true,
        };

        let mut development_plans = BTreeMap::new();
        for framework in Framework::ALL {
            let mut plans = BTreeMap::new();
            for trait_name in registry.traits(framework) {
                let band = ScoreBand::from_score(profile.traits.score(framework, trait_name));
                let prompt = prompts::development_plan_prompt(framework, trait_name, band);
                let plan = session
                    .ask(&prompt)
                    .await
                    .map(|text| parse_plan(&text))
                    .filter(|points| !points.is_empty())
                    .unwrap_or_else(fallback_plan);
                plans.insert(trait_name.clone(), plan);
            }
            development_plans.insert(framework, plans);
        }

        let mut swot = Vec::new();
        for rec in recommendations.iter().take(DETAILED_CAREERS) {
            let career = rec.cluster.as_str();
            swot.push(CareerSwot {
                cluster: rec.cluster.clone(),
                strength: session
                    .text_or(&prompts::strength_prompt(career), FALLBACK_STRENGTH)
                    .await,
                weakness: session
                    .text_or(&prompts::weakness_prompt(career), FALLBACK_WEAKNESS)
                    .await,
                opportunity: session
                    .text_or(&prompts::opportunity_prompt(career), FALLBACK_OPPORTUNITY)
                    .await,
                threat: session
                    .text_or(&prompts::threat_prompt(career), FALLBACK_THREAT)
                    .await,
            });
        }

        let conclusion = session.text_or(CONCLUSION_PROMPT, FALLBACK_CONCLUSION).await;

        Narrative {
            development_plans,
            swot,
            conclusion,
        }
    }
}

#[cfg(test)]
mod tests {
    use std::sync::atomic::{AtomicUsize, Ordering};

    use async_trait::async_trait;
    use chrono::NaiveDate;

    use super::*;
    use crate::assessment::matcher::MatchTier;
    use crate::assessment::models::TraitProfile;
    use crate::assessment::profile::RespondentInfo;
    use crate::narrative::StaticNarrator;

    struct ScriptedNarrator {
        calls: AtomicUsize,
        /// Prompts containing this marker get no text back.
        fail_on: Option<&'static str>,
    }

    impl ScriptedNarrator {
        fn new(fail_on: Option<&'static str>) -> Self {
            Self {
                calls: AtomicUsize::new(0),
                fail_on,
            }
        }
    }

    #[async_trait]
    impl NarrativeProvider for ScriptedNarrator {
        async fn generate(&self, prompt: &str, context: &str) -> Option<String> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            assert!(context.contains("\"name\":\"Asha\""));
            if prompt.contains("development points") {
                Some("1. Join a robotics club\n\n- Read one science article a week".to_string())
            } else if self.fail_on.is_some_and(|marker| prompt.contains(marker)) {
                None
            } else {
                Some(format!("note for: {}", &prompt[..20]))
            }
        }

        fn backend(&self) -> &'static str {
            "scripted"
        }
    }

    fn registry() -> TraitRegistry {
        TraitRegistry::new([
            (Framework::Interest, vec!["Realistic".to_string(), "Social".to_string()]),
            (Framework::Culture, vec!["PDI".to_string()]),
        ])
    }

    fn profile() -> ClientProfile {
        let info = RespondentInfo {
            name: "Asha".to_string(),
            email: "asha@example.com".to_string(),
            ..Default::default()
        };
        let date = NaiveDate::from_ymd_opt(2026, 5, 4).unwrap();
        ClientProfile::build(&info, TraitProfile::default(), date)
    }

    fn recommendations(n: usize) -> Vec<Recommendation> {
        (0..n)
            .map(|i| Recommendation {
                cluster: format!("Cluster {i}"),
                score: 90.0 - i as f64,
                tier: MatchTier::BestFit,
            })
            .collect()
    }

    #[test]
    fn test_parse_plan_strips_markers() {
        assert_eq!(
            parse_plan("- Find a mentor\n* Take a course\n\n2) Build something\n•  Volunteer"),
            vec!["Find a mentor", "Take a course", "Build something", "Volunteer"]
        );
        assert_eq!(parse_plan("3D printing club"), vec!["3D printing club"]);
        assert!(parse_plan("\n  \n").is_empty());
    }

    #[tokio::test]
    async fn test_static_narrator_uses_fallbacks() {
        let composer = NarrativeComposer::new(&StaticNarrator);
        let narrative = composer
            .compose(&profile(), &registry(), &recommendations(5))
            .await;

        assert_eq!(narrative.conclusion, FALLBACK_CONCLUSION);
        assert_eq!(narrative.swot.len(), DETAILED_CAREERS);
        assert_eq!(narrative.swot[0].strength, FALLBACK_STRENGTH);
        assert_eq!(
            narrative.development_plan(Framework::Interest, "Social"),
            fallback_plan()
        );
        // traits the composer never saw still fall back
        assert_eq!(
            narrative.development_plan(Framework::Aptitude, "V"),
            fallback_plan()
        );
    }

    #[tokio::test]
    async fn test_provider_text_used_where_available() {
        let narrator = ScriptedNarrator::new(None);
        let composer = NarrativeComposer::new(&narrator);
        let narrative = composer
            .compose(&profile(), &registry(), &recommendations(2))
            .await;

        // 3 trait plans + 2 careers × 4 SWOT prompts + conclusion
        assert_eq!(narrator.calls.load(Ordering::SeqCst), 3 + 8 + 1);
        assert_eq!(
            narrative.development_plan(Framework::Culture, "PDI"),
            vec!["Join a robotics club", "Read one science article a week"]
        );
        assert_eq!(narrative.swot.len(), 2);
        assert!(narrative.swot[1].strength.starts_with("note for:"));
        assert!(narrative.swot[1].threat.starts_with("note for:"));
        assert!(narrative.conclusion.starts_with("note for:"));
    }

    #[tokio::test]
    async fn test_first_failure_stops_provider_calls() {
        let narrator = ScriptedNarrator::new(Some("THREAT"));
        let composer = NarrativeComposer::new(&narrator);
        let narrative = composer
            .compose(&profile(), &registry(), &recommendations(2))
            .await;

        // 3 trait plans + S, W, O, T of the first career; nothing after the failed T
        assert_eq!(narrator.calls.load(Ordering::SeqCst), 3 + 4);
        assert!(narrative.swot[0].opportunity.starts_with("note for:"));
        assert_eq!(narrative.swot[0].threat, FALLBACK_THREAT);
        assert_eq!(narrative.swot[1].strength, FALLBACK_STRENGTH);
        assert_eq!(narrative.conclusion, FALLBACK_CONCLUSION);
    }

    struct SlowNarrator {
        delay: Duration,
        reply: Option<&'static str>,
        calls: AtomicUsize,
    }

    impl SlowNarrator {
        fn new(delay: Duration, reply: Option<&'static str>) -> Self {
            Self {
                delay,
                reply,
                calls: AtomicUsize::new(0),
            }
        }
    }

    #[async_trait]
    impl NarrativeProvider for SlowNarrator {
        async fn generate(&self, _prompt: &str, _context: &str) -> Option<String> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            tokio::time::sleep(self.delay).await;
            self.reply.map(str::to_string)
        }

        fn backend(&self) -> &'static str {
            "slow"
        }
    }

    fn full_registry() -> TraitRegistry {
        crate::assessment::questions::QuestionBank::builtin()
            .unwrap()
            .registry()
    }

    #[tokio::test(start_paused = true)]
    async fn test_hanging_provider_is_abandoned_after_one_call() {
        // Worst case of the LLM client: two 60s timeouts plus backoff, then no text.
        let narrator = SlowNarrator::new(Duration::from_secs(122), None);
        let started = Instant::now();
        let narrative = NarrativeComposer::new(&narrator)
            .compose(&profile(), &full_registry(), &recommendations(3))
            .await;

        assert!(started.elapsed() <= CALL_TIMEOUT + Duration::from_secs(1));
        assert_eq!(narrator.calls.load(Ordering::SeqCst), 1);
        assert_eq!(narrative.swot.len(), 3);
        assert_eq!(narrative.swot[2].threat, FALLBACK_THREAT);
        assert_eq!(narrative.conclusion, FALLBACK_CONCLUSION);
        assert_eq!(
            narrative.development_plan(Framework::Aptitude, "V"),
            fallback_plan()
        );
    }

    #[tokio::test(start_paused = true)]
    async fn test_slow_provider_is_bounded_by_budget() {
        // Each call succeeds, but 37 of them would take over nine minutes.
        let narrator = SlowNarrator::new(Duration::from_secs(15), Some("- Keep practising"));
        let started = Instant::now();
        let narrative = NarrativeComposer::new(&narrator)
            .compose(&profile(), &full_registry(), &recommendations(3))
            .await;

        assert!(started.elapsed() <= COMPOSE_BUDGET + Duration::from_secs(1));
        assert!(narrator.calls.load(Ordering::SeqCst) < 37);
        assert_eq!(
            narrative.development_plan(Framework::Aptitude, "V"),
            vec!["Keep practising"]
        );
        assert_eq!(narrative.conclusion, FALLBACK_CONCLUSION);
    }
}
