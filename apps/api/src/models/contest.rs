use bson::oid::ObjectId;
use bson::serde_helpers::chrono_datetime_as_bson_datetime;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// One recruiting campaign with its applicants embedded inline.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ContestRecord {
    #[serde(rename = "_id")]
    pub id: ObjectId,
    pub title: Option<String>,
    #[serde(default)]
    pub candidates: Vec<CandidateEntry>,
}

/// One applicant's record within a contest.
///
/// The rejection reason has historically been written to several different
/// fields by different upstream clients; every known location is modeled
/// here and consulted in precedence order by the classifier.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct CandidateEntry {
    pub name: Option<String>,
    pub recruiter: Option<String>,
    /// Free-text pipeline-stage label: "Rejected", "Shortlisted", "L1",
    /// "L2", "L3", "HR", "OfferSent", ...
    pub emp_status: Option<String>,
    /// Free-form score blob; shape varies by client and is never
    /// interpreted by this service.
    pub score: Option<bson::Bson>,
    pub remarks: Option<Remarks>,
    pub rejection_reason: Option<String>,
    pub reject_reason: Option<String>,
    pub reason: Option<String>,
    pub comments: Option<String>,
    pub feedback: Option<String>,
    pub rejection_note: Option<String>,
    pub hr_comments: Option<String>,
}

/// Nested remarks object carrying two more possible reason locations.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Remarks {
    pub rejection_reason: Option<String>,
    pub reason: Option<String>,
}

/// A timestamped action taken on a contest by an actor with a role.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LifecycleEvent {
    #[serde(rename = "_id")]
    pub id: ObjectId,
    pub contest_id: ObjectId,
    pub action: String,
    pub actor: Option<String>,
    pub role: Option<String>,
    pub comment: Option<String>,
    #[serde(with = "chrono_datetime_as_bson_datetime")]
    pub created_at: DateTime<Utc>,
}

/// Row produced by the unwind + `$toLower` status-grouping pipeline.
#[derive(Debug, Clone, Deserialize)]
pub struct StatusCount {
    #[serde(rename = "_id")]
    pub status: String,
    pub count: i64,
}

/// Row produced by the per-recruiter conditional-sum pipeline.
#[derive(Debug, Clone, Deserialize)]
pub struct RecruiterStatRow {
    #[serde(rename = "_id")]
    pub recruiter: Option<String>,
    pub submitted: i64,
    pub shortlisted: i64,
    pub l1: i64,
}
