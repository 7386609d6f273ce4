//! Narrative generation: prompt submission and the lenient parse of the
//! model's reply.

use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::llm_client::{CompletionClient, LlmError};

/// Prose summary attached to every successful report.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Narrative {
    pub summary: String,
    pub key_findings: String,
    pub recommendations: String,
}

impl Narrative {
    /// Fallback for the detailed rejection report.
    pub fn rejection_fallback() -> Self {
        Narrative {
            summary: "Rejection reasons were tallied from the contest's candidate records, \
                but an automated narrative could not be produced for this run."
                .to_string(),
            key_findings: "Refer to the rejectionBreakdown list for the exact reason counts \
                and each reason's percentage share of all rejections."
                .to_string(),
            recommendations: "Review the highest-count rejection reasons with the hiring team \
                and re-run this report to regenerate the narrative."
                .to_string(),
        }
    }

    /// Fallback for the funnel report.
    pub fn funnel_fallback() -> Self {
        Narrative {
            summary: "Funnel statistics for this contest were computed, but an automated \
                narrative could not be produced for this run."
                .to_string(),
            key_findings: "Refer to the categories object for the skills, experience, \
                compensation, and uncategorized rejection counts, and to the rates object \
                for the stage conversion percentages."
                .to_string(),
            recommendations: "Compare the rejection rate against similar contests and \
                re-run this report to regenerate the narrative."
                .to_string(),
        }
    }

    /// Fallback for the activity report.
    pub fn activity_fallback() -> Self {
        Narrative {
            summary: "Contest activity was aggregated, but an automated narrative could \
                not be produced for this run."
                .to_string(),
            key_findings: "Refer to the statusCounts, recruiters, and recentEvents lists \
                for the underlying pipeline numbers."
                .to_string(),
            recommendations: "Check recruiter conversion ratios for outliers and re-run \
                this report to regenerate the narrative."
                .to_string(),
        }
    }

    /// Fixed informational narrative for contests with no rejections yet.
    pub fn no_rejections() -> Self {
        Narrative {
            summary: "This contest has no rejected candidates, so there are no rejection \
                reasons to analyze."
                .to_string(),
            key_findings: "Every candidate submitted to this contest is still active in \
                the pipeline or has progressed past screening."
                .to_string(),
            recommendations: "Re-run this report once candidates have moved through the \
                rejection stage."
                .to_string(),
        }
    }
}

/// Submits a prompt and parses the reply leniently. Transport or API
/// failure propagates; a malformed reply body never does.
pub async fn generate_narrative(
    llm: &dyn CompletionClient,
    prompt: &str,
    fallback: Narrative,
) -> Result<Narrative, LlmError> {
    let text = llm.complete(prompt).await?;
    Ok(parse_narrative(&text, fallback))
}

/// Three-stage parse: direct JSON, then the first `{...}` span, then the
/// supplied fallback.
pub fn parse_narrative(text: &str, fallback: Narrative) -> Narrative {
    if let Ok(parsed) = serde_json::from_str::<Narrative>(text) {
        return parsed;
    }

    if let Some(span) = extract_json_span(text) {
        if let Ok(parsed) = serde_json::from_str::<Narrative>(span) {
            return parsed;
        }
    }

    warn!("completion reply was not parseable as a narrative; using fallback");
    fallback
}

/// Slice from the first `{` to the last `}`, if both exist in order.
fn extract_json_span(text: &str) -> Option<&str> {
    let start = text.find('{')?;
    let end = text.rfind('}')?;
    if end < start {
        return None;
    }
    Some(&text[start..=end])
}
