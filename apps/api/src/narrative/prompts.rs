// Narrative prompt builders and the static text used when no narrative is available.

use crate::assessment::models::Framework;
use crate::assessment::scoring::ScoreBand;

pub const FALLBACK_DEVELOPMENT_PLAN: &[&str] = &[
    "Seek a mentor in a field that interests you to gain practical insights.",
    "Dedicate time to online courses or workshops to build specific technical skills.",
];

pub const FALLBACK_STRENGTH: &str = "Your unique combination of personality and interests \
    allows you to bring a fresh and valuable perspective to this field.";
pub const FALLBACK_WEAKNESS: &str = "To excel, you may need to focus on developing specific \
    technical skills or gaining more hands-on experience relevant to this career.";
pub const FALLBACK_OPPORTUNITY: &str = "Emerging trends in this industry provide a great \
    opportunity for new talent to innovate and make a significant impact.";
pub const FALLBACK_THREAT: &str = "This is a competitive field, so continuous learning and \
    networking will be crucial to stay ahead of industry changes.";

pub const FALLBACK_CONCLUSION: &str = "This report is a snapshot of your potential. Use these \
    insights as a starting point to explore the recommended career paths and continue your \
    journey of self-discovery.";

pub const CONCLUSION_PROMPT: &str = "Write a personalized, two-sentence conclusion for this \
    career assessment report, encouraging the student.";

pub fn development_plan_prompt(framework: Framework, trait_name: &str, band: ScoreBand) -> String {
    format!(
        "Based on a {} score in {} ({}), suggest 2 very brief, one-line development points.",
        band.as_str(),
        trait_name,
        framework.display_name()
    )
}

pub fn strength_prompt(career: &str) -> String {
    format!(
        "For a person with this profile, what is their single greatest STRENGTH for a career \
         as a {career}? Be concise and explain why in one or two sentences."
    )
}

pub fn weakness_prompt(career: &str) -> String {
    format!(
        "What is their single greatest WEAKNESS or challenge they would face in a career as \
         a {career}? Be concise and explain why in one or two sentences."
    )
}

pub fn opportunity_prompt(career: &str) -> String {
    format!(
        "What is a key OPPORTUNITY this person could leverage in a {career} career, based on \
         their profile? Be concise and explain why in one or two sentences."
    )
}

pub fn threat_prompt(career: &str) -> String {
    format!(
        "What is a potential THREAT or external obstacle they should watch out for in a \
         {career} career? Be concise and explain why in one or two sentences."
    )
}
