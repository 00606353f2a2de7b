use chrono::{DateTime, Duration, Utc};

use crate::domain::{ListingRecord, ProcessedIds};

/// How long after posting a listing still counts as new.
pub const FRESHNESS_WINDOW: Duration = Duration::hours(24);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Verdict {
    AlreadyProcessed,
    Hidden,
    Inactive,
    Undated,
    Stale,
    New,
}

/// Decides whether `record` should be announced. `now` is sampled by the caller
/// for every record, so a listing right at the window edge depends on when it
/// is reached in the stream.
pub fn evaluate(record: &ListingRecord, processed: &ProcessedIds, now: DateTime<Utc>) -> Verdict {
    if processed.contains(&record.id) {
        return Verdict::AlreadyProcessed;
    }
    if !record.is_visible() {
        return Verdict::Hidden;
    }
    if !record.is_active() {
        return Verdict::Inactive;
    }
    let Some(created_at) = record.created_at() else {
        return Verdict::Undated;
    };
    if now - created_at <= FRESHNESS_WINDOW {
        Verdict::New
    } else {
        Verdict::Stale
    }
}
