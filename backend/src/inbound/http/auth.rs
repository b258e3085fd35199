//! Authentication HTTP handlers.
//!
//! ```text
//! POST /api/v1/register
//! POST /api/v1/login
//! POST /api/v1/logout
//! GET  /api/v1/me
//! ```

use actix_web::{HttpResponse, get, post, web};
use serde::Deserialize;
use serde_json::json;
use utoipa::ToSchema;

use crate::domain::password::PASSWORD_MIN_LEN;
use crate::domain::user::{Email, Username};
use crate::domain::users_service::Registration;
use crate::domain::{Error, Password, User};
use crate::inbound::http::ApiResult;
use crate::inbound::http::session::{SessionId, clear_session_cookie, session_cookie};
use crate::inbound::http::state::HttpState;

/// Request payload for creating an account.
#[derive(Debug, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct RegisterRequest {
    pub username: String,
    pub email: String,
    pub password: String,
    pub display_name: Option<String>,
}

/// Request payload for logging in. `username` also accepts an email address.
#[derive(Debug, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct LoginRequest {
    pub username: String,
    pub password: String,
}

fn field_error(field: &str, message: &str) -> Error {
    Error::invalid_request(message).with_details(json!({ "field": field }))
}

fn parse_registration(payload: RegisterRequest) -> Result<Registration, Error> {
    let username = Username::new(payload.username)
        .map_err(|error| field_error("username", &error.to_string()))?;
    let email =
        Email::new(payload.email).map_err(|error| field_error("email", &error.to_string()))?;
    let password = Password::new(payload.password);
    if !password.is_long_enough() {
        return Err(field_error(
            "password",
            &format!("password must be at least {PASSWORD_MIN_LEN} characters"),
        ));
    }
    Ok(Registration {
        email,
        username,
        password,
        display_name: payload.display_name,
    })
}

/// Create an account and start a session.
#[utoipa::path(
    post,
    path = "/api/v1/register",
    request_body = RegisterRequest,
    responses(
        (status = 201, description = "Account created; session cookie set", body = User),
        (status = 400, description = "Invalid request", body = Error),
        (status = 409, description = "Username or email already taken", body = Error),
        (status = 503, description = "Store unavailable", body = Error)
    ),
    security([]),
    tags = ["auth"],
    operation_id = "register"
)]
#[post("/register")]
pub async fn register(
    state: web::Data<HttpState>,
    payload: web::Json<RegisterRequest>,
) -> ApiResult<HttpResponse> {
    let registration = parse_registration(payload.into_inner())?;
    let username = registration.username.clone();

    let Some(user) = state.users.register(registration).await? else {
        return Err(Error::conflict("username or email is already taken"));
    };
    let session_id = state.users.create_session(&username).await?;

    Ok(HttpResponse::Created()
        .cookie(session_cookie(&session_id, state.cookie_secure))
        .json(user))
}

/// Authenticate and start a session.
#[utoipa::path(
    post,
    path = "/api/v1/login",
    request_body = LoginRequest,
    responses(
        (status = 200, description = "Authenticated; session cookie set", body = User),
        (status = 401, description = "Unknown account or wrong password", body = Error),
        (status = 503, description = "Store unavailable", body = Error)
    ),
    security([]),
    tags = ["auth"],
    operation_id = "login"
)]
#[post("/login")]
pub async fn login(
    state: web::Data<HttpState>,
    payload: web::Json<LoginRequest>,
) -> ApiResult<HttpResponse> {
    let LoginRequest { username, password } = payload.into_inner();
    let password = Password::new(password);

    let Some(user) = state.users.login(&username, &password).await? else {
        // Same response for unknown accounts and wrong passwords.
        return Err(Error::unauthorized("invalid credentials"));
    };
    let session_id = state.users.create_session(&user.username).await?;

    Ok(HttpResponse::Ok()
        .cookie(session_cookie(&session_id, state.cookie_secure))
        .json(user))
}

/// End the current session. Idempotent.
#[utoipa::path(
    post,
    path = "/api/v1/logout",
    responses(
        (status = 204, description = "Session ended; cookie cleared"),
        (status = 503, description = "Store unavailable", body = Error)
    ),
    tags = ["auth"],
    operation_id = "logout"
)]
#[post("/logout")]
pub async fn logout(
    state: web::Data<HttpState>,
    session: Option<SessionId>,
) -> ApiResult<HttpResponse> {
    if let Some(session) = session {
        state.users.logout(&session.0).await?;
    }
    Ok(HttpResponse::NoContent()
        .cookie(clear_session_cookie(state.cookie_secure))
        .finish())
}

/// Fetch the authenticated user.
#[utoipa::path(
    get,
    path = "/api/v1/me",
    responses(
        (status = 200, description = "Authenticated user", body = User),
        (status = 401, description = "No valid session", body = Error)
    ),
    tags = ["auth"],
    operation_id = "currentUser"
)]
#[get("/me")]
pub async fn current_user(
    state: web::Data<HttpState>,
    session: SessionId,
) -> ApiResult<web::Json<User>> {
    let user = state.require_user(&session).await?;
    Ok(web::Json(user))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::ErrorCode;
    use rstest::rstest;

    fn payload(username: &str, email: &str, password: &str) -> RegisterRequest {
        RegisterRequest {
            username: username.into(),
            email: email.into(),
            password: password.into(),
            display_name: None,
        }
    }

    #[rstest]
    #[case("bad name", "a@b.example", "longenough", "username")]
    #[case("fine", "not-an-email", "longenough", "email")]
    #[case("fine", "a@b.example", "short", "password")]
    fn registration_validation_names_the_field(
        #[case] username: &str,
        #[case] email: &str,
        #[case] password: &str,
        #[case] field: &str,
    ) {
        let err = parse_registration(payload(username, email, password))
            .expect_err("payload is invalid");
        assert_eq!(err.code(), ErrorCode::InvalidRequest);
        let details = err
            .details()
            .and_then(|value| value.as_object())
            .expect("details");
        assert_eq!(details.get("field").and_then(|v| v.as_str()), Some(field));
    }

    #[rstest]
    fn registration_accepts_a_valid_payload() {
        let parsed = parse_registration(payload("ada", "ada@example.com", "longenough"))
            .expect("payload is valid");
        assert_eq!(parsed.username.as_ref(), "ada");
        assert_eq!(parsed.email.as_ref(), "ada@example.com");
    }
}
