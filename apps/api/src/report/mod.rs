//! Report rendering — turns a scored profile, its recommendations and the
//! resolved narrative into a Markdown document.
//!
//! Pure over its inputs. Typography and PDF layout belong to whatever
//! consumes the Markdown.

use std::fmt::Write;

use crate::assessment::catalog::Catalog;
use crate::assessment::matcher::Recommendation;
use crate::assessment::models::Framework;
use crate::assessment::profile::ClientProfile;
use crate::assessment::questions::QuestionBank;
use crate::assessment::scoring::ScoreBand;
use crate::narrative::Narrative;

pub const REPORT_TITLE: &str = "Career Discovery Report";
const TOP_RECOMMENDATIONS: usize = 10;
const BAR_SEGMENTS: usize = 10;
const MISSING_DESCRIPTION: &str = "No description available for this career.";

pub struct ReportInput<'a> {
    pub profile: &'a ClientProfile,
    pub recommendations: &'a [Recommendation],
    pub bank: &'a QuestionBank,
    pub catalog: &'a Catalog,
    pub narrative: &'a Narrative,
}

/// Ten-segment bar for a 0–10 score.
pub fn score_bar(score: f64) -> String {
    let filled = ((score / 10.0 * BAR_SEGMENTS as f64).round().max(0.0) as usize).min(BAR_SEGMENTS);
    format!("{}{}", "■".repeat(filled), "□".repeat(BAR_SEGMENTS - filled))
}

fn section_title(framework: Framework) -> &'static str {
    match framework {
        Framework::Aptitude => "Aptitude Analysis",
        Framework::Personality => "Personality Analysis (OCEAN)",
        Framework::Interest => "Interest Analysis (RIASEC)",
        Framework::Culture => "Cultural Values Analysis (Hofstede)",
    }
}

/// Respondent text as a single-line table cell: `|` escaped, line breaks collapsed.
fn or_na(value: &str) -> String {
    let cell = value
        .split(['\r', '\n'])
        .map(str::trim)
        .filter(|part| !part.is_empty())
        .collect::<Vec<_>>()
        .join(" ")
        .replace('|', "\\|");
    if cell.is_empty() {
        "N/A".to_string()
    } else {
        cell
    }
}

pub fn render_report(input: &ReportInput<'_>) -> String {
    let mut out = String::new();
    // Writing into a String cannot fail.
    let _ = write_report(&mut out, input);
    out
}

fn write_report(out: &mut String, input: &ReportInput<'_>) -> std::fmt::Result {
    let profile = input.profile;

    writeln!(out, "# {REPORT_TITLE}\n")?;
    writeln!(out, "Prepared for **{}**\n", or_na(&profile.name))?;
    writeln!(out, "Date: {}\n", profile.date.format("%Y-%m-%d"))?;

    writeln!(out, "## Table of Contents\n")?;
    writeln!(out, "1. Personal Profile")?;
    for (i, framework) in Framework::ALL.iter().enumerate() {
        writeln!(out, "{}. {}", i + 2, section_title(*framework))?;
    }
    writeln!(out, "6. Top Career Recommendations")?;
    writeln!(out, "7. Detailed Career Analysis")?;
    writeln!(out, "8. Conclusion\n")?;

    writeln!(out, "## Personal Profile\n")?;
    writeln!(out, "| Field | Value |")?;
    writeln!(out, "|---|---|")?;
    writeln!(out, "| Name | {} |", or_na(&profile.name))?;
    let age = profile.age.map(|a| a.to_string()).unwrap_or_default();
    writeln!(out, "| Age | {} |", or_na(&age))?;
    writeln!(out, "| Email | {} |", or_na(&profile.email))?;
    writeln!(out, "| Phone | {} |", or_na(&profile.phone))?;
    writeln!(out, "| Status | {} |\n", or_na(&profile.status))?;

    for framework in Framework::ALL {
        write_trait_section(out, input, framework)?;
    }

    writeln!(out, "## Top Career Recommendations\n")?;
    if input.recommendations.is_empty() {
        writeln!(out, "No career clusters could be matched.\n")?;
    } else {
        writeln!(out, "| Rank | Career Cluster | Match Score | Fit |")?;
        writeln!(out, "|---|---|---|---|")?;
        for (i, rec) in input
            .recommendations
            .iter()
            .take(TOP_RECOMMENDATIONS)
            .enumerate()
        {
            writeln!(
                out,
                "| {} | {} | {:.0} | {} |",
                i + 1,
                rec.cluster,
                rec.score,
                rec.tier
            )?;
        }
        writeln!(out)?;
    }

    writeln!(out, "## Detailed Career Analysis\n")?;
    for (i, swot) in input.narrative.swot.iter().enumerate() {
        let score = input
            .recommendations
            .iter()
            .find(|r| r.cluster == swot.cluster)
            .map(|r| r.score)
            .unwrap_or(0.0);
        let description = input
            .catalog
            .get(&swot.cluster)
            .and_then(|c| c.description.as_deref())
            .unwrap_or(MISSING_DESCRIPTION);

        writeln!(out, "### {}. {}\n", i + 1, swot.cluster)?;
        writeln!(out, "Overall Match Score: {score:.0}\n")?;
        writeln!(out, "{description}\n")?;
        writeln!(out, "- **S:** {}", swot.strength)?;
        writeln!(out, "- **W:** {}", swot.weakness)?;
        writeln!(out, "- **O:** {}", swot.opportunity)?;
        writeln!(out, "- **T:** {}\n", swot.threat)?;
    }

    writeln!(out, "## Conclusion\n")?;
    writeln!(out, "{}", input.narrative.conclusion)?;
    Ok(())
}

fn write_trait_section(
    out: &mut String,
    input: &ReportInput<'_>,
    framework: Framework,
) -> std::fmt::Result {
    writeln!(out, "## {}\n", section_title(framework))?;
    let Some(section) = input.bank.section(framework) else {
        return Ok(());
    };

    for def in &section.traits {
        let score = input.profile.traits.score(framework, &def.name);
        let band = ScoreBand::from_score(score);
        let analysis = match band {
            ScoreBand::Low => &def.analysis.low,
            ScoreBand::Medium => &def.analysis.medium,
            ScoreBand::High => &def.analysis.high,
        };

        writeln!(out, "### {}\n", def.display_name)?;
        writeln!(out, "`{}` {:.1} / 10\n", score_bar(score), score)?;
        writeln!(out, "**Meaning:** {}\n", def.meaning)?;
        writeln!(out, "**Expert Analysis:** {analysis}\n")?;
        writeln!(out, "**Development Plan:**\n")?;
        for point in input.narrative.development_plan(framework, &def.name) {
            writeln!(out, "- {point}")?;
        }
        writeln!(out)?;
    }
    Ok(())
}
