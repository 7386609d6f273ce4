//! Read-only queries against the document store. This service never
//! writes; every function here materializes externally-owned data.

use bson::{doc, oid::ObjectId, Document};
use futures::TryStreamExt;
use mongodb::options::FindOptions;
use mongodb::Database;
use serde::de::DeserializeOwned;

use crate::models::contest::{ContestRecord, LifecycleEvent, RecruiterStatRow, StatusCount};

const CONTESTS: &str = "contests";
const EVENTS: &str = "contest_events";

const RECRUITER_LIMIT: i64 = 20;
const EVENT_LIMIT: i64 = 50;

/// Exact `_id` lookup of a contest with its embedded candidates.
pub async fn find_contest(
    db: &Database,
    id: ObjectId,
) -> Result<Option<ContestRecord>, mongodb::error::Error> {
    db.collection::<ContestRecord>(CONTESTS)
        .find_one(doc! { "_id": id }, None)
        .await
}

/// Unwinds the embedded candidates and groups by lowercased `empStatus`.
/// Missing statuses group under "unknown".
pub async fn overall_status_counts(
    db: &Database,
    id: ObjectId,
) -> Result<Vec<StatusCount>, mongodb::error::Error> {
    let pipeline = vec![
        doc! { "$match": { "_id": id } },
        doc! { "$unwind": "$candidates" },
        doc! { "$group": {
            "_id": { "$toLower": { "$ifNull": ["$candidates.empStatus", "unknown"] } },
            "count": { "$sum": 1 },
        } },
    ];
    aggregate_rows(db, pipeline).await
}

/// Per-recruiter conditional sums over the unwound candidates, busiest
/// recruiters first.
pub async fn recruiter_stats(
    db: &Database,
    id: ObjectId,
) -> Result<Vec<RecruiterStatRow>, mongodb::error::Error> {
    let pipeline = vec![
        doc! { "$match": { "_id": id } },
        doc! { "$unwind": "$candidates" },
        doc! { "$group": {
            "_id": "$candidates.recruiter",
            "submitted": { "$sum": 1 },
            "shortlisted": { "$sum": {
                "$cond": [{ "$eq": ["$candidates.empStatus", "Shortlisted"] }, 1, 0]
            } },
            "l1": { "$sum": {
                "$cond": [{ "$eq": ["$candidates.empStatus", "L1"] }, 1, 0]
            } },
        } },
        doc! { "$sort": { "submitted": -1 } },
        doc! { "$limit": RECRUITER_LIMIT },
    ];
    aggregate_rows(db, pipeline).await
}

/// The most recent lifecycle events for a contest, oldest first.
/// The find sorts newest-first so the limit keeps recent events, then the
/// batch is flipped back into chronological order.
pub async fn lifecycle_events(
    db: &Database,
    id: ObjectId,
) -> Result<Vec<LifecycleEvent>, mongodb::error::Error> {
    let options = FindOptions::builder()
        .sort(doc! { "createdAt": -1 })
        .limit(EVENT_LIMIT)
        .build();

    let events: Vec<LifecycleEvent> = db
        .collection::<LifecycleEvent>(EVENTS)
        .find(doc! { "contestId": id }, options)
        .await?
        .try_collect()
        .await?;

    Ok(into_chronological(events))
}

/// Flips a newest-first batch into oldest-first display order.
fn into_chronological(mut events: Vec<LifecycleEvent>) -> Vec<LifecycleEvent> {
    events.reverse();
    events
}

async fn aggregate_rows<T: DeserializeOwned>(
    db: &Database,
    pipeline: Vec<Document>,
) -> Result<Vec<T>, mongodb::error::Error> {
    let documents: Vec<Document> = db
        .collection::<Document>(CONTESTS)
        .aggregate(pipeline, None)
        .await?
        .try_collect()
        .await?;

    documents
        .into_iter()
        .map(|document| bson::from_document(document).map_err(Into::into))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, Utc};

    fn event(action: &str, age_minutes: i64) -> LifecycleEvent {
        LifecycleEvent {
            id: ObjectId::new(),
            contest_id: ObjectId::new(),
            action: action.to_string(),
            actor: None,
            role: None,
            comment: None,
            created_at: Utc::now() - Duration::minutes(age_minutes),
        }
    }

    #[test]
    fn test_newest_first_batch_flips_to_chronological() {
        // As fetched: newest first, the way the limited find returns them.
        let batch = vec![event("closed", 0), event("shortlisted", 10), event("opened", 20)];
        let events = into_chronological(batch);

        assert_eq!(events[0].action, "opened");
        assert_eq!(events[1].action, "shortlisted");
        assert_eq!(events[2].action, "closed");
        assert!(events[0].created_at <= events[1].created_at);
        assert!(events[1].created_at <= events[2].created_at);
    }
}
