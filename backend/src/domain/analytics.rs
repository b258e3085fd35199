//! Analytics aggregation over timestamped event logs.
//!
//! Events are epoch-millisecond timestamps appended to per-entity sorted
//! sets. The day histogram is reconstructed from the log, not from the
//! denormalised counter, so the two can disagree when a log append
//! previously failed; both numbers are reported as-is.

use std::collections::BTreeMap;

use chrono::{TimeZone, Utc};
use serde::Serialize;
use utoipa::ToSchema;

/// Milliseconds per day, the bucket width of the histogram window.
pub const DAY_MS: i64 = 86_400_000;

/// Aggregated profile analytics.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ProfileAnalytics {
    /// Total views taken from the denormalised counter.
    pub views: i64,
    /// Views inside the requested window, bucketed by UTC date.
    pub views_by_day: BTreeMap<String, u64>,
}

/// Bucket raw event timestamps (epoch ms) by UTC calendar date.
///
/// Timestamps that do not map onto a valid date (out-of-range scores from a
/// corrupted log) are skipped rather than failing the whole report.
pub fn bucket_by_day<I>(timestamps: I) -> BTreeMap<String, u64>
where
    I: IntoIterator<Item = i64>,
{
    let mut buckets = BTreeMap::new();
    for ts in timestamps {
        if let Some(date) = Utc.timestamp_millis_opt(ts).single() {
            let day = date.format("%Y-%m-%d").to_string();
            *buckets.entry(day).or_insert(0) += 1;
        }
    }
    buckets
}

#[cfg(test)]
mod tests {
    use super::*;

    // 2023-11-14T22:13:20Z
    const BASE: i64 = 1_700_000_000_000;

    #[test]
    fn events_bucket_by_utc_date() {
        let buckets = bucket_by_day([BASE, BASE + 1, BASE + DAY_MS, BASE + 2 * DAY_MS]);
        assert_eq!(buckets.get("2023-11-14"), Some(&2));
        assert_eq!(buckets.get("2023-11-15"), Some(&1));
        assert_eq!(buckets.get("2023-11-16"), Some(&1));
        assert_eq!(buckets.len(), 3);
    }

    #[test]
    fn empty_log_yields_empty_histogram() {
        assert!(bucket_by_day([]).is_empty());
    }

    #[test]
    fn unmappable_timestamps_are_skipped() {
        let buckets = bucket_by_day([i64::MAX, BASE]);
        assert_eq!(buckets.len(), 1);
    }
}
