// All LLM prompt templates for the report endpoints. Placeholders are
// replaced verbatim before sending. Reuses the cross-cutting JSON-only
// fragment from llm_client::prompts.

use crate::llm_client::prompts::STRICT_JSON_INSTRUCTION;
use crate::models::contest::StatusCount;
use crate::reports::aggregate::{FunnelRates, ReasonTally, RecruiterSummary};
use crate::reports::classify::CategoryCounts;

/// Reply schema shared by all three reports.
const NARRATIVE_SCHEMA: &str = r#"Return a JSON object with this EXACT schema (no extra fields):
{
  "summary": "<at least 40 words summarizing the overall picture>",
  "keyFindings": "<at least 30 words on the most significant numbers>",
  "recommendations": "<at least 30 words of concrete next steps for the hiring team>"
}"#;

const REJECTION_PROMPT_TEMPLATE: &str = r#"{strict_json}

A recruiting contest's rejected candidates were tallied by their stated rejection reason.

Contest: {contest_id}
Total rejected candidates: {total_rejected}
Reason breakdown (reason: count, percent of all rejections):
{breakdown}

Write a narrative for a hiring manager explaining what is driving rejections in this contest.

{schema}"#;

const FUNNEL_PROMPT_TEMPLATE: &str = r#"{strict_json}

A recruiting contest's rejections were bucketed into coarse categories, alongside stage conversion rates.

Contest: {contest_id}
Total rejected: {total_rejected}
Category counts: skills={skills}, experience={experience}, compensation={compensation}, uncategorized={uncategorized}
Total candidates: {total_candidates}
Rejection rate: {rejection_rate}%
Shortlist rate: {shortlist_rate}%
L1 conversion (of shortlist): {l1_conversion}%

Write a narrative for a hiring manager about the health of this contest's funnel.

{schema}"#;

const ACTIVITY_PROMPT_TEMPLATE: &str = r#"{strict_json}

A recruiting contest's recent activity was aggregated.

Contest: {contest_id}
Pipeline status counts:
{status_counts}
Recruiter performance (recruiter: submitted, shortlisted, L1, L1-per-submission):
{recruiters}
Logged lifecycle actions: {event_count}

Write a narrative for a hiring manager about how actively this contest is being worked and by whom.

{schema}"#;

pub fn build_rejection_prompt(
    contest_id: &str,
    total_rejected: u64,
    breakdown: &[ReasonTally],
) -> String {
    let lines: Vec<String> = breakdown
        .iter()
        .map(|t| format!("- {}: {}, {}%", t.reason, t.count, t.percentage))
        .collect();

    REJECTION_PROMPT_TEMPLATE
        .replace("{contest_id}", contest_id)
        .replace("{total_rejected}", &total_rejected.to_string())
        .replace("{breakdown}", &lines.join("\n"))
        .replace("{strict_json}", STRICT_JSON_INSTRUCTION)
        .replace("{schema}", NARRATIVE_SCHEMA)
}

pub fn build_funnel_prompt(
    contest_id: &str,
    categories: &CategoryCounts,
    rates: &FunnelRates,
) -> String {
    FUNNEL_PROMPT_TEMPLATE
        .replace("{contest_id}", contest_id)
        .replace("{total_rejected}", &categories.total_rejected.to_string())
        .replace("{skills}", &categories.skills.to_string())
        .replace("{experience}", &categories.experience.to_string())
        .replace("{compensation}", &categories.compensation.to_string())
        .replace("{uncategorized}", &categories.uncategorized.to_string())
        .replace("{total_candidates}", &rates.total_candidates.to_string())
        .replace("{rejection_rate}", &rates.rejection_rate)
        .replace("{shortlist_rate}", &rates.shortlist_rate)
        .replace("{l1_conversion}", &rates.l1_conversion)
        .replace("{strict_json}", STRICT_JSON_INSTRUCTION)
        .replace("{schema}", NARRATIVE_SCHEMA)
}

pub fn build_activity_prompt(
    contest_id: &str,
    status_counts: &[StatusCount],
    recruiters: &[RecruiterSummary],
    event_count: usize,
) -> String {
    let status_lines: Vec<String> = status_counts
        .iter()
        .map(|c| format!("- {}: {}", c.status, c.count))
        .collect();
    let recruiter_lines: Vec<String> = recruiters
        .iter()
        .map(|r| {
            format!(
                "- {}: {}, {}, {}, {}",
                r.recruiter, r.submitted, r.shortlisted, r.l1, r.conversion
            )
        })
        .collect();

    ACTIVITY_PROMPT_TEMPLATE
        .replace("{contest_id}", contest_id)
        .replace("{status_counts}", &status_lines.join("\n"))
        .replace("{recruiters}", &recruiter_lines.join("\n"))
        .replace("{event_count}", &event_count.to_string())
        .replace("{strict_json}", STRICT_JSON_INSTRUCTION)
        .replace("{schema}", NARRATIVE_SCHEMA)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rejection_prompt_embeds_stats_and_schema() {
        let breakdown = vec![ReasonTally {
            reason: "skills missing".to_string(),
            count: 1,
            percentage: "100.0".to_string(),
        }];
        let prompt = build_rejection_prompt("64f0c2a1b9d1e83f5a7c1234", 1, &breakdown);

        assert!(prompt.contains("64f0c2a1b9d1e83f5a7c1234"));
        assert!(prompt.contains("- skills missing: 1, 100.0%"));
        assert!(prompt.contains("keyFindings"));
        assert!(prompt.contains("valid JSON only"));
        assert!(!prompt.contains("{breakdown}"));
    }

    #[test]
    fn test_funnel_prompt_has_no_unreplaced_placeholders() {
        let categories = CategoryCounts {
            total_rejected: 4,
            skills: 2,
            experience: 1,
            compensation: 0,
            uncategorized: 1,
        };
        let rates = FunnelRates {
            total_candidates: 10,
            rejection_rate: "40.0".to_string(),
            shortlist_rate: "30.0".to_string(),
            l1_conversion: "33.3".to_string(),
        };
        let prompt = build_funnel_prompt("64f0c2a1b9d1e83f5a7c1234", &categories, &rates);

        assert!(prompt.contains("skills=2"));
        assert!(prompt.contains("Rejection rate: 40.0%"));
        assert!(!prompt.contains("{skills}"));
        assert!(!prompt.contains("{rejection_rate}"));
    }
}
