//! Session cookie helpers so HTTP handlers stay free of framework plumbing.
//!
//! The session itself is server-side: the cookie carries only the opaque
//! identifier minted at login, and every authenticated handler resolves it
//! against the store through [`HttpState`].

use actix_web::cookie::time::Duration as CookieDuration;
use actix_web::cookie::{Cookie, SameSite};
use actix_web::dev::Payload;
use actix_web::{FromRequest, HttpRequest};
use futures_util::future::{Ready, ready};

use crate::domain::session::SESSION_TTL;
use crate::domain::user::User;
use crate::domain::Error;
use crate::inbound::http::state::HttpState;

/// Name of the session cookie.
pub const SESSION_COOKIE: &str = "session";

/// Opaque session identifier extracted from the request cookie.
///
/// Extraction succeeds whenever the cookie is present; handlers decide
/// whether an unresolved session is a 401 via [`HttpState::require_user`].
#[derive(Debug, Clone)]
pub struct SessionId(pub String);

impl FromRequest for SessionId {
    type Error = Error;
    type Future = Ready<Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, _payload: &mut Payload) -> Self::Future {
        let id = req
            .cookie(SESSION_COOKIE)
            .map(|cookie| SessionId(cookie.value().to_owned()))
            .ok_or_else(|| Error::unauthorized("login required"));
        ready(id)
    }
}

impl HttpState {
    /// Resolve a session to its user or fail with `401 Unauthorized`.
    pub async fn require_user(&self, session: &SessionId) -> Result<User, Error> {
        self.users
            .user_by_session(&session.0)
            .await?
            .ok_or_else(|| Error::unauthorized("login required"))
    }

    /// Resolve a session to an admin user or fail with 401 / 403.
    pub async fn require_admin(&self, session: &SessionId) -> Result<User, Error> {
        let user = self.require_user(session).await?;
        if !user.is_admin {
            return Err(Error::forbidden("admin access required"));
        }
        Ok(user)
    }
}

/// Build the session cookie issued at registration and login.
pub fn session_cookie(session_id: &str, secure: bool) -> Cookie<'static> {
    Cookie::build(SESSION_COOKIE, session_id.to_owned())
        .path("/")
        .http_only(true)
        .secure(secure)
        .same_site(SameSite::Lax)
        .max_age(CookieDuration::seconds(
            i64::try_from(SESSION_TTL.as_secs()).unwrap_or(i64::MAX),
        ))
        .finish()
}

/// Build an expired cookie that clears the session on logout.
pub fn clear_session_cookie(secure: bool) -> Cookie<'static> {
    Cookie::build(SESSION_COOKIE, "")
        .path("/")
        .http_only(true)
        .secure(secure)
        .same_site(SameSite::Lax)
        .max_age(CookieDuration::ZERO)
        .finish()
}
