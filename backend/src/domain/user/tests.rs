//! Unit tests for user validation and hash mapping.

use std::collections::HashMap;

use rstest::rstest;

use super::*;

#[rstest]
#[case("ada")]
#[case("Ada_Lovelace_1815")]
#[case("_")]
fn accepts_valid_usernames(#[case] raw: &str) {
    assert!(Username::new(raw).is_ok());
}

#[rstest]
#[case("", UserValidationError::EmptyUsername)]
#[case("ada lovelace", UserValidationError::UsernameInvalidCharacters)]
#[case("ada@host", UserValidationError::UsernameInvalidCharacters)]
#[case("café", UserValidationError::UsernameInvalidCharacters)]
fn rejects_invalid_usernames(#[case] raw: &str, #[case] expected: UserValidationError) {
    assert_eq!(Username::new(raw).expect_err("invalid username"), expected);
}

#[test]
fn rejects_overlong_usernames() {
    let raw = "a".repeat(USERNAME_MAX + 1);
    assert_eq!(
        Username::new(raw).expect_err("too long"),
        UserValidationError::UsernameTooLong { max: USERNAME_MAX },
    );
}

#[rstest]
#[case("ada@example.com", true)]
#[case("a.b+c@sub.example.io", true)]
#[case("not-an-email", false)]
#[case("a@b", false)]
#[case("two@at@signs.com", false)]
#[case("white space@example.com", false)]
fn email_validation(#[case] raw: &str, #[case] ok: bool) {
    assert_eq!(Email::new(raw).is_ok(), ok, "{raw}");
}

fn sample_user() -> User {
    User {
        id: "user_1700000000000_ab12".into(),
        username: Username::new("ada").expect("username"),
        email: Email::new("ada@example.com").expect("email"),
        display_name: "Ada Lovelace".into(),
        bio: "first programmer".into(),
        profile_image: None,
        is_admin: false,
        created_at: 1_700_000_000_000,
    }
}

#[test]
fn hash_round_trip_strips_the_password() {
    let user = sample_user();
    let fields: HashMap<String, String> = user.to_fields("digest123").into_iter().collect();

    assert_eq!(fields.get("password").map(String::as_str), Some("digest123"));
    assert_eq!(User::password_digest(&fields), Some("digest123"));

    let decoded = User::from_fields(&fields).expect("decode user");
    assert_eq!(decoded, user);
    // The decoded record carries no password anywhere in its JSON shape.
    let json = serde_json::to_value(&decoded).expect("serialise user");
    assert!(json.get("password").is_none());
}

#[test]
fn decode_reports_the_missing_field() {
    let mut fields: HashMap<String, String> =
        sample_user().to_fields("digest").into_iter().collect();
    fields.remove("createdAt");
    let err = User::from_fields(&fields).expect_err("missing createdAt");
    assert_eq!(err.field, "createdAt");
}

#[test]
fn profile_image_survives_the_round_trip() {
    let mut user = sample_user();
    user.profile_image = Some("https://cdn.example.com/p.jpg".into());
    let fields: HashMap<String, String> = user.to_fields("d").into_iter().collect();
    let decoded = User::from_fields(&fields).expect("decode user");
    assert_eq!(decoded.profile_image.as_deref(), Some("https://cdn.example.com/p.jpg"));
}
