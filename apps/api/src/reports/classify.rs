//! Rejection-reason classification.
//!
//! Two classifiers live here. The precedence-chain extractor walks an
//! ordered list of field accessors and takes the first usable string; the
//! pattern variant buckets a single canonical reason field into coarse
//! categories by case-insensitive substring match.

use serde::Serialize;

use crate::models::contest::CandidateEntry;

/// Sentinel used when no field yields a usable reason.
pub const UNKNOWN_REASON: &str = "Unknown";

/// Strings that look filled-in but carry no information.
const PLACEHOLDERS: [&str; 6] = ["n/a", "na", "-", "null", "undefined", "none"];

type ReasonSource = for<'a> fn(&'a CandidateEntry) -> Option<&'a str>;

/// Extracts the best-effort rejection reason for an entry known to carry a
/// rejected status. Sources are consulted highest priority first; the order
/// is load-bearing.
pub fn rejection_reason(entry: &CandidateEntry) -> String {
    let sources: [ReasonSource; 9] = [
        |e| e.remarks.as_ref().and_then(|r| r.rejection_reason.as_deref()),
        |e| e.rejection_reason.as_deref(),
        |e| e.reject_reason.as_deref(),
        |e| e.remarks.as_ref().and_then(|r| r.reason.as_deref()),
        |e| e.reason.as_deref(),
        |e| e.comments.as_deref(),
        |e| e.feedback.as_deref(),
        |e| e.rejection_note.as_deref(),
        |e| e.hr_comments.as_deref(),
    ];

    sources
        .iter()
        .filter_map(|source| source(entry))
        .find(|value| is_usable(value))
        .map(|value| value.trim().to_string())
        .unwrap_or_else(|| UNKNOWN_REASON.to_string())
}

/// A value is usable if it is non-empty after trimming and not a known
/// placeholder.
fn is_usable(value: &str) -> bool {
    let trimmed = value.trim();
    !trimmed.is_empty() && !PLACEHOLDERS.iter().any(|p| trimmed.eq_ignore_ascii_case(p))
}

/// Case-sensitive status match used by the detailed-reason path.
pub fn is_rejected_exact(entry: &CandidateEntry) -> bool {
    entry.emp_status.as_deref() == Some("Rejected")
}

/// Case-insensitive status match used by the funnel path, mirroring the
/// lowercased grouping in the overall-stats pipeline.
pub fn is_rejected_normalized(entry: &CandidateEntry) -> bool {
    entry
        .emp_status
        .as_deref()
        .map(|s| s.eq_ignore_ascii_case("rejected"))
        .unwrap_or(false)
}

const SKILLS_PATTERNS: [&str; 3] = ["skill", "technical", "technology"];
const EXPERIENCE_PATTERNS: [&str; 3] = ["experience", "exposure", "seniority"];
const COMPENSATION_PATTERNS: [&str; 4] = ["compensation", "salary", "ctc", "pay"];

/// Coarse rejection-category counts for the funnel report.
///
/// Each bucket is an independent conditional count over the same records,
/// and `uncategorized` is the signed remainder
/// `total_rejected - (skills + experience + compensation)`. A reason that
/// matches two patterns increments two buckets while still being one
/// record, so the remainder can go negative. Callers surface the raw value
/// rather than clamping it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CategoryCounts {
    pub total_rejected: i64,
    pub skills: i64,
    pub experience: i64,
    pub compensation: i64,
    pub uncategorized: i64,
}

/// Buckets canonical reason strings (one per rejected record; `None` when
/// the field is absent) by case-insensitive substring match.
pub fn categorize_rejections<'a, I>(reasons: I) -> CategoryCounts
where
    I: IntoIterator<Item = Option<&'a str>>,
{
    let mut total = 0i64;
    let mut skills = 0i64;
    let mut experience = 0i64;
    let mut compensation = 0i64;

    for reason in reasons {
        total += 1;
        let lower = reason.unwrap_or("").to_lowercase();
        if SKILLS_PATTERNS.iter().any(|p| lower.contains(p)) {
            skills += 1;
        }
        if EXPERIENCE_PATTERNS.iter().any(|p| lower.contains(p)) {
            experience += 1;
        }
        if COMPENSATION_PATTERNS.iter().any(|p| lower.contains(p)) {
            compensation += 1;
        }
    }

    CategoryCounts {
        total_rejected: total,
        skills,
        experience,
        compensation,
        uncategorized: total - (skills + experience + compensation),
    }
}
