//! Axum route handlers for the report endpoints, plus response assembly.

use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use bson::oid::ObjectId;
use chrono::Utc;
use serde::{Deserialize, Serialize};
use tracing::error;

use crate::errors::AppError;
use crate::llm_client::{CompletionClient, LlmError};
use crate::models::contest::{ContestRecord, LifecycleEvent};
use crate::reports::aggregate::{self, FunnelRates, ReasonTally, RecruiterSummary};
use crate::reports::classify::{self, CategoryCounts};
use crate::reports::narrative::{generate_narrative, Narrative};
use crate::reports::prompts;
use crate::reports::queries;
use crate::state::AppState;

/// Informational message emitted when a contest has no rejected candidates.
pub const NO_REJECTIONS_MESSAGE: &str =
    "No candidates have been rejected for this contest yet.";

// ────────────────────────────────────────────────────────────────────────────
// Request / Response types
// ────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RejectionReportRequest {
    /// Optional so a missing id surfaces as our 400, not a deserialization
    /// rejection.
    pub contest_id: Option<String>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RejectionReportResponse {
    pub success: bool,
    pub contest_id: String,
    pub total_rejected: u64,
    pub rejection_breakdown: Vec<ReasonTally>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    pub narrative: Narrative,
    pub generated_at: String,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FunnelReportResponse {
    pub success: bool,
    pub contest_id: String,
    pub categories: CategoryCounts,
    pub rates: FunnelRates,
    pub narrative: Narrative,
    pub generated_at: String,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ActivityReportResponse {
    pub success: bool,
    pub contest_id: String,
    pub status_counts: Vec<StatusCountView>,
    pub recruiters: Vec<RecruiterSummary>,
    pub recent_events: Vec<LifecycleEventView>,
    pub narrative: Narrative,
    pub generated_at: String,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct StatusCountView {
    pub status: String,
    pub count: i64,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LifecycleEventView {
    pub action: String,
    pub actor: Option<String>,
    pub role: Option<String>,
    pub comment: Option<String>,
    pub created_at: String,
}

impl From<LifecycleEvent> for LifecycleEventView {
    fn from(event: LifecycleEvent) -> Self {
        LifecycleEventView {
            action: event.action,
            actor: event.actor,
            role: event.role,
            comment: event.comment,
            created_at: event.created_at.to_rfc3339(),
        }
    }
}

/// Uniform failure payload. `narrative` is present for the endpoints that
/// promise a narrative-shaped field even on failure.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FailureResponse {
    pub success: bool,
    pub error: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub detail: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub narrative: Option<Narrative>,
}

// ────────────────────────────────────────────────────────────────────────────
// Handlers
// ────────────────────────────────────────────────────────────────────────────

/// POST /api/v1/reports/rejections
///
/// Detailed rejection-reason report: exact-case "Rejected" selection,
/// precedence-chain reason extraction, literal tallies.
pub async fn handle_rejection_report(
    State(state): State<AppState>,
    Json(req): Json<RejectionReportRequest>,
) -> Result<Response, AppError> {
    let raw_id = req
        .contest_id
        .as_deref()
        .ok_or_else(|| AppError::Validation("contestId is required".to_string()))?;
    let id = parse_contest_id(raw_id)?;

    match build_rejection_report(&state, id, raw_id).await {
        Ok(Some(report)) => Ok(Json(report).into_response()),
        Ok(None) => Ok(failure(
            StatusCode::OK,
            &format!("Contest {raw_id} not found"),
            None,
            None,
        )),
        Err(err) => {
            error!("rejection report for {raw_id} failed: {err}");
            Ok(failure(
                StatusCode::INTERNAL_SERVER_ERROR,
                "Failed to build rejection report",
                Some(err.to_string()),
                Some(Narrative::rejection_fallback()),
            ))
        }
    }
}

/// GET /api/v1/reports/contests/:id/funnel
///
/// Lighter-weight funnel report: pattern-bucketed rejection categories and
/// stage conversion rates. Unknown ids are a 404 here.
pub async fn handle_funnel_report(
    State(state): State<AppState>,
    Path(raw_id): Path<String>,
) -> Result<Response, AppError> {
    let id = parse_contest_id(&raw_id)?;

    match build_funnel_report(&state, id, &raw_id).await {
        Ok(Some(report)) => Ok(Json(report).into_response()),
        Ok(None) => Ok(failure(
            StatusCode::NOT_FOUND,
            &format!("Contest {raw_id} not found"),
            None,
            None,
        )),
        Err(err) => {
            error!("funnel report for {raw_id} failed: {err}");
            Ok(failure(
                StatusCode::INTERNAL_SERVER_ERROR,
                "Failed to build funnel report",
                Some(err.to_string()),
                Some(Narrative::funnel_fallback()),
            ))
        }
    }
}

/// GET /api/v1/reports/contests/:id/activity
///
/// Contest activity report backed by three reads issued concurrently.
/// Failure payloads here carry no narrative field.
pub async fn handle_activity_report(
    State(state): State<AppState>,
    Path(raw_id): Path<String>,
) -> Result<Response, AppError> {
    let id = parse_contest_id(&raw_id)?;

    match build_activity_report(&state, id, &raw_id).await {
        Ok(Some(report)) => Ok(Json(report).into_response()),
        Ok(None) => Ok(failure(
            StatusCode::OK,
            &format!("Contest {raw_id} not found"),
            None,
            None,
        )),
        Err(err) => {
            error!("activity report for {raw_id} failed: {err}");
            Ok(failure(
                StatusCode::INTERNAL_SERVER_ERROR,
                "Failed to build activity report",
                Some(err.to_string()),
                None,
            ))
        }
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Report builders
// ────────────────────────────────────────────────────────────────────────────

async fn build_rejection_report(
    state: &AppState,
    id: ObjectId,
    raw_id: &str,
) -> Result<Option<RejectionReportResponse>, AppError> {
    let contest = queries::find_contest(&state.db, id).await?;
    Ok(rejection_report_for_contest(state.llm.as_ref(), contest, raw_id).await?)
}

/// Assembles the detailed report from an already-fetched contest. The
/// not-found and zero-rejection paths return before any completion call.
async fn rejection_report_for_contest(
    llm: &dyn CompletionClient,
    contest: Option<ContestRecord>,
    raw_id: &str,
) -> Result<Option<RejectionReportResponse>, LlmError> {
    let contest = match contest {
        Some(contest) => contest,
        None => return Ok(None),
    };

    // Exact-case status match; the funnel path normalizes instead.
    let reasons: Vec<String> = contest
        .candidates
        .iter()
        .filter(|c| classify::is_rejected_exact(c))
        .map(classify::rejection_reason)
        .collect();
    let total_rejected = reasons.len() as u64;

    if total_rejected == 0 {
        return Ok(Some(RejectionReportResponse {
            success: true,
            contest_id: raw_id.to_string(),
            total_rejected: 0,
            rejection_breakdown: Vec::new(),
            message: Some(NO_REJECTIONS_MESSAGE.to_string()),
            narrative: Narrative::no_rejections(),
            generated_at: Utc::now().to_rfc3339(),
        }));
    }

    let breakdown = aggregate::tally_reasons(&reasons);
    let prompt = prompts::build_rejection_prompt(raw_id, total_rejected, &breakdown);
    let narrative = generate_narrative(llm, &prompt, Narrative::rejection_fallback()).await?;

    Ok(Some(RejectionReportResponse {
        success: true,
        contest_id: raw_id.to_string(),
        total_rejected,
        rejection_breakdown: breakdown,
        message: None,
        narrative,
        generated_at: Utc::now().to_rfc3339(),
    }))
}

async fn build_funnel_report(
    state: &AppState,
    id: ObjectId,
    raw_id: &str,
) -> Result<Option<FunnelReportResponse>, AppError> {
    let contest = match queries::find_contest(&state.db, id).await? {
        Some(contest) => contest,
        None => return Ok(None),
    };
    let status_counts = queries::overall_status_counts(&state.db, id).await?;

    // Pattern bucketing reads the canonical rejectionReason field only.
    let categories = classify::categorize_rejections(
        contest
            .candidates
            .iter()
            .filter(|c| classify::is_rejected_normalized(c))
            .map(|c| c.rejection_reason.as_deref()),
    );
    let rates = aggregate::funnel_rates(&status_counts);

    let prompt = prompts::build_funnel_prompt(raw_id, &categories, &rates);
    let narrative =
        generate_narrative(state.llm.as_ref(), &prompt, Narrative::funnel_fallback()).await?;

    Ok(Some(FunnelReportResponse {
        success: true,
        contest_id: raw_id.to_string(),
        categories,
        rates,
        narrative,
        generated_at: Utc::now().to_rfc3339(),
    }))
}

async fn build_activity_report(
    state: &AppState,
    id: ObjectId,
    raw_id: &str,
) -> Result<Option<ActivityReportResponse>, AppError> {
    // Three independent reads, awaited jointly; results merge positionally.
    let (events, recruiter_rows, status_counts) = tokio::try_join!(
        queries::lifecycle_events(&state.db, id),
        queries::recruiter_stats(&state.db, id),
        queries::overall_status_counts(&state.db, id),
    )?;

    // No status rows means the contest has no candidates we know about.
    if status_counts.is_empty() {
        return Ok(None);
    }

    let recruiters = aggregate::summarize_recruiters(recruiter_rows);
    let event_views: Vec<LifecycleEventView> =
        events.into_iter().map(LifecycleEventView::from).collect();

    let prompt =
        prompts::build_activity_prompt(raw_id, &status_counts, &recruiters, event_views.len());
    let narrative =
        generate_narrative(state.llm.as_ref(), &prompt, Narrative::activity_fallback()).await?;

    Ok(Some(ActivityReportResponse {
        success: true,
        contest_id: raw_id.to_string(),
        status_counts: status_counts
            .into_iter()
            .map(|c| StatusCountView {
                status: c.status,
                count: c.count,
            })
            .collect(),
        recruiters,
        recent_events: event_views,
        narrative,
        generated_at: Utc::now().to_rfc3339(),
    }))
}

// ────────────────────────────────────────────────────────────────────────────
// Helpers
// ────────────────────────────────────────────────────────────────────────────

/// Validates the 24-character hex contest identifier before any I/O.
fn parse_contest_id(raw: &str) -> Result<ObjectId, AppError> {
    ObjectId::parse_str(raw).map_err(|_| {
        AppError::Validation(format!(
            "'{raw}' is not a valid 24-character hex contest id"
        ))
    })
}

fn failure(
    status: StatusCode,
    error: &str,
    detail: Option<String>,
    narrative: Option<Narrative>,
) -> Response {
    (
        status,
        Json(FailureResponse {
            success: false,
            error: error.to_string(),
            detail,
            narrative,
        }),
    )
        .into_response()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::contest::CandidateEntry;
    use async_trait::async_trait;
    use std::sync::atomic::{AtomicUsize, Ordering};

    const NARRATIVE_REPLY: &str = r#"{
        "summary": "Rejections cluster around screening.",
        "keyFindings": "Two reasons dominate.",
        "recommendations": "Revisit the screening bar."
    }"#;

    /// Canned completion backend that counts how often it is invoked.
    struct CountingClient {
        calls: AtomicUsize,
    }

    impl CountingClient {
        fn new() -> Self {
            CountingClient {
                calls: AtomicUsize::new(0),
            }
        }

        fn calls(&self) -> usize {
            self.calls.load(Ordering::SeqCst)
        }
    }

    #[async_trait]
    impl CompletionClient for CountingClient {
        async fn complete(&self, _prompt: &str) -> Result<String, LlmError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            Ok(NARRATIVE_REPLY.to_string())
        }
    }

    fn candidate(status: &str, reason: Option<&str>) -> CandidateEntry {
        CandidateEntry {
            emp_status: Some(status.to_string()),
            rejection_reason: reason.map(str::to_string),
            ..CandidateEntry::default()
        }
    }

    fn contest(candidates: Vec<CandidateEntry>) -> ContestRecord {
        ContestRecord {
            id: ObjectId::new(),
            title: Some("Backend Hiring Drive".to_string()),
            candidates,
        }
    }

    #[tokio::test]
    async fn test_unknown_contest_makes_no_completion_call() {
        let client = CountingClient::new();
        let report = rejection_report_for_contest(&client, None, "64f0c2a1b9d1e83f5a7c1234")
            .await
            .unwrap();
        assert!(report.is_none());
        assert_eq!(client.calls(), 0);
    }

    #[tokio::test]
    async fn test_zero_rejections_yields_fixed_payload_without_completion_call() {
        // The lowercase "rejected" entry must not count: the detailed
        // path matches the status case-sensitively.
        let contest = contest(vec![
            candidate("Shortlisted", None),
            candidate("rejected", Some("skills gap")),
        ]);

        let client = CountingClient::new();
        let report =
            rejection_report_for_contest(&client, Some(contest), "64f0c2a1b9d1e83f5a7c1234")
                .await
                .unwrap()
                .unwrap();

        assert!(report.success);
        assert_eq!(report.total_rejected, 0);
        assert!(report.rejection_breakdown.is_empty());
        assert_eq!(report.message.as_deref(), Some(NO_REJECTIONS_MESSAGE));
        assert_eq!(report.narrative, Narrative::no_rejections());
        assert_eq!(client.calls(), 0);
    }

    #[tokio::test]
    async fn test_rejected_candidates_produce_tallied_report() {
        let contest = contest(vec![
            candidate("Rejected", Some("skills gap")),
            candidate("Rejected", Some("skills gap")),
            candidate("Rejected", Some("salary mismatch")),
            candidate("L1", None),
        ]);

        let client = CountingClient::new();
        let report =
            rejection_report_for_contest(&client, Some(contest), "64f0c2a1b9d1e83f5a7c1234")
                .await
                .unwrap()
                .unwrap();

        assert!(report.success);
        assert_eq!(report.total_rejected, 3);
        assert_eq!(report.rejection_breakdown[0].reason, "skills gap");
        assert_eq!(report.rejection_breakdown[0].count, 2);
        assert_eq!(report.message, None);
        assert_eq!(report.narrative.summary, "Rejections cluster around screening.");
        assert_eq!(client.calls(), 1);
    }

    #[test]
    fn test_valid_contest_id_parses() {
        assert!(parse_contest_id("64f0c2a1b9d1e83f5a7c1234").is_ok());
    }

    #[test]
    fn test_short_id_is_rejected() {
        assert!(parse_contest_id("64f0c2a1").is_err());
    }

    #[test]
    fn test_non_hex_id_is_rejected() {
        assert!(parse_contest_id("zzzzzzzzzzzzzzzzzzzzzzzz").is_err());
    }

    #[test]
    fn test_failure_payload_omits_absent_fields() {
        let payload = FailureResponse {
            success: false,
            error: "boom".to_string(),
            detail: None,
            narrative: None,
        };
        let json = serde_json::to_value(&payload).unwrap();
        assert_eq!(json["success"], false);
        assert!(json.get("detail").is_none());
        assert!(json.get("narrative").is_none());
    }

    #[test]
    fn test_failure_payload_carries_fallback_narrative() {
        let payload = FailureResponse {
            success: false,
            error: "boom".to_string(),
            detail: Some("upstream timeout".to_string()),
            narrative: Some(Narrative::rejection_fallback()),
        };
        let json = serde_json::to_value(&payload).unwrap();
        assert!(json["narrative"]["summary"].is_string());
        assert_eq!(json["detail"], "upstream timeout");
    }
}
