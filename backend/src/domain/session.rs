//! Server-side sessions: opaque identifier mapped to a username with a TTL.

use std::time::Duration;

use rand::Rng;
use rand::distributions::Alphanumeric;

/// Sessions live for seven days from creation; the store expires the key.
pub const SESSION_TTL: Duration = Duration::from_secs(60 * 60 * 24 * 7);

/// Length of generated session identifiers.
const SESSION_ID_LEN: usize = 32;

/// Generate a fresh opaque session identifier.
///
/// The identifier carries no information; validity is decided entirely by
/// the `session:<id>` key in the store.
pub fn new_session_id() -> String {
    rand::thread_rng()
        .sample_iter(&Alphanumeric)
        .take(SESSION_ID_LEN)
        .map(char::from)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn identifiers_are_opaque_and_distinct() {
        let a = new_session_id();
        let b = new_session_id();
        assert_eq!(a.len(), SESSION_ID_LEN);
        assert!(a.chars().all(|c| c.is_ascii_alphanumeric()));
        assert_ne!(a, b);
    }

    #[test]
    fn ttl_is_seven_days() {
        assert_eq!(SESSION_TTL.as_secs(), 604_800);
    }
}
