//! Key namespace shared with existing deployments.
//!
//! The layout must stay byte-compatible with data written by earlier
//! versions of the application, so every key is built here rather than
//! formatted inline at call sites.

/// Set of every registered username.
pub const USERS_SET: &str = "users";

/// Hash holding the user record for `username`.
pub fn user(username: &str) -> String {
    format!("user:{username}")
}

/// String index mapping an email address to its username.
pub fn email_index(email: &str) -> String {
    format!("email:{email}")
}

/// String mapping a session identifier to a username, with TTL.
pub fn session(session_id: &str) -> String {
    format!("session:{session_id}")
}

/// Glob matching every session key; used only by administrative sweeps.
pub const SESSION_PATTERN: &str = "session:*";

/// Hash holding the link record for `link_id`.
pub fn link(link_id: &str) -> String {
    format!("link:{link_id}")
}

/// Set of link ids owned by `user_id`.
pub fn user_links(user_id: &str) -> String {
    format!("user:{user_id}:links")
}

/// Hash holding the profile record for `username`.
pub fn profile(username: &str) -> String {
    format!("profile:{username}")
}

/// Sorted set logging profile view timestamps for `username`.
pub fn profile_views(username: &str) -> String {
    format!("profile:{username}:views")
}

/// Sorted set logging click timestamps for `link_id`.
pub fn link_clicks(link_id: &str) -> String {
    format!("link:{link_id}:clicks")
}
