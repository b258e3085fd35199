//! Generated entity identifiers.
//!
//! Identifiers follow the legacy `<kind>_<epoch-ms>` shape with a short
//! random suffix appended so two records created in the same millisecond
//! cannot collide.

use chrono::Utc;
use rand::Rng;

/// Current time in epoch milliseconds, the timestamp unit used throughout
/// the store.
pub fn now_ms() -> i64 {
    Utc::now().timestamp_millis()
}

fn suffix() -> String {
    let n: u16 = rand::thread_rng().r#gen();
    format!("{n:04x}")
}

/// Generate a user identifier (`user_<ms>_<suffix>`).
pub fn new_user_id(now_ms: i64) -> String {
    format!("user_{now_ms}_{}", suffix())
}

/// Generate a link identifier (`link_<ms>_<suffix>`).
pub fn new_link_id(now_ms: i64) -> String {
    format!("link_{now_ms}_{}", suffix())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn identifiers_carry_kind_and_timestamp() {
        let id = new_user_id(1_700_000_000_000);
        assert!(id.starts_with("user_1700000000000_"));
        let id = new_link_id(1_700_000_000_000);
        assert!(id.starts_with("link_1700000000000_"));
    }

    #[test]
    fn same_millisecond_ids_stay_distinct() {
        // Four hex digits of suffix; a handful of draws should not collide.
        let ids: std::collections::HashSet<String> =
            (0..8).map(|_| new_link_id(1)).collect();
        assert!(ids.len() > 1);
    }
}
