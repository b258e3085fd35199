//! User data model and validation newtypes.

use std::collections::HashMap;
use std::fmt;
use std::sync::OnceLock;

use regex::Regex;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::domain::record::{self, RecordError};

/// Validation errors for registration input.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UserValidationError {
    EmptyUsername,
    UsernameTooLong { max: usize },
    UsernameInvalidCharacters,
    InvalidEmail,
    PasswordTooShort { min: usize },
}

impl fmt::Display for UserValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::EmptyUsername => write!(f, "username must not be empty"),
            Self::UsernameTooLong { max } => {
                write!(f, "username must be at most {max} characters")
            }
            Self::UsernameInvalidCharacters => write!(
                f,
                "username may only contain letters, numbers, or underscores",
            ),
            Self::InvalidEmail => write!(f, "email address is not valid"),
            Self::PasswordTooShort { min } => {
                write!(f, "password must be at least {min} characters")
            }
        }
    }
}

impl std::error::Error for UserValidationError {}

/// Maximum allowed length for a username.
pub const USERNAME_MAX: usize = 32;

static USERNAME_RE: OnceLock<Regex> = OnceLock::new();
static EMAIL_RE: OnceLock<Regex> = OnceLock::new();

fn username_regex() -> &'static Regex {
    USERNAME_RE.get_or_init(|| {
        // Length is enforced separately; this regex constrains allowed characters.
        Regex::new("^[A-Za-z0-9_]+$")
            .unwrap_or_else(|error| panic!("username regex failed to compile: {error}"))
    })
}

fn email_regex() -> &'static Regex {
    EMAIL_RE.get_or_init(|| {
        // Deliberately loose: one `@`, no whitespace, a dotted domain.
        Regex::new(r"^[^\s@]+@[^\s@]+\.[^\s@]+$")
            .unwrap_or_else(|error| panic!("email regex failed to compile: {error}"))
    })
}

/// Unique, immutable account name. Doubles as the user hash key suffix.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Username(String);

impl Username {
    /// Validate and construct a [`Username`].
    pub fn new(username: impl Into<String>) -> Result<Self, UserValidationError> {
        let username = username.into();
        if username.is_empty() {
            return Err(UserValidationError::EmptyUsername);
        }
        if username.chars().count() > USERNAME_MAX {
            return Err(UserValidationError::UsernameTooLong { max: USERNAME_MAX });
        }
        if !username_regex().is_match(&username) {
            return Err(UserValidationError::UsernameInvalidCharacters);
        }
        Ok(Self(username))
    }
}

impl AsRef<str> for Username {
    fn as_ref(&self) -> &str {
        self.0.as_str()
    }
}

impl fmt::Display for Username {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_ref())
    }
}

impl From<Username> for String {
    fn from(value: Username) -> Self {
        value.0
    }
}

impl TryFrom<String> for Username {
    type Error = UserValidationError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

/// Globally unique email address.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Email(String);

impl Email {
    /// Validate and construct an [`Email`].
    pub fn new(email: impl Into<String>) -> Result<Self, UserValidationError> {
        let email = email.into();
        if !email_regex().is_match(&email) {
            return Err(UserValidationError::InvalidEmail);
        }
        Ok(Self(email))
    }
}

impl AsRef<str> for Email {
    fn as_ref(&self) -> &str {
        self.0.as_str()
    }
}

impl fmt::Display for Email {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_ref())
    }
}

impl From<Email> for String {
    fn from(value: Email) -> Self {
        value.0
    }
}

impl TryFrom<String> for Email {
    type Error = UserValidationError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

/// Application user as exposed to callers.
///
/// The password digest is colocated in the same store hash but stripped
/// before a `User` leaves the data layer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct User {
    /// Generated identifier (`user_<ms>_<suffix>`), distinct from the username.
    pub id: String,
    /// Unique, immutable account name.
    #[schema(value_type = String, example = "ada")]
    pub username: Username,
    /// Unique email address.
    #[schema(value_type = String, example = "ada@example.com")]
    pub email: Email,
    /// Name shown on the public profile.
    pub display_name: String,
    /// Short free-form biography.
    pub bio: String,
    /// Public URL of the profile image, when one was uploaded.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub profile_image: Option<String>,
    /// Whether the account may use the administrative surface.
    pub is_admin: bool,
    /// Creation time in epoch milliseconds.
    pub created_at: i64,
}

impl User {
    /// Encode the record (plus its password digest) as store hash fields.
    pub fn to_fields(&self, password_digest: &str) -> Vec<(String, String)> {
        let mut fields = vec![
            ("id".into(), self.id.clone()),
            ("username".into(), self.username.to_string()),
            ("email".into(), self.email.to_string()),
            ("displayName".into(), self.display_name.clone()),
            ("bio".into(), self.bio.clone()),
            ("isAdmin".into(), self.is_admin.to_string()),
            ("createdAt".into(), self.created_at.to_string()),
            ("password".into(), password_digest.into()),
        ];
        if let Some(image) = &self.profile_image {
            fields.push(("profileImage".into(), image.clone()));
        }
        fields
    }

    /// Decode a user from store hash fields, dropping the password digest.
    pub fn from_fields(fields: &HashMap<String, String>) -> Result<Self, RecordError> {
        let username = Username::new(record::require(fields, "username")?).map_err(|err| {
            RecordError {
                field: "username".into(),
                problem: err.to_string(),
            }
        })?;
        let email = Email::new(record::require(fields, "email")?).map_err(|err| RecordError {
            field: "email".into(),
            problem: err.to_string(),
        })?;
        Ok(Self {
            id: record::require(fields, "id")?.to_owned(),
            username,
            email,
            display_name: record::require(fields, "displayName")?.to_owned(),
            bio: fields.get("bio").cloned().unwrap_or_default(),
            profile_image: record::optional(fields, "profileImage"),
            is_admin: record::require_bool(fields, "isAdmin")?,
            created_at: record::require_i64(fields, "createdAt")?,
        })
    }

    /// Stored password digest, if the hash carries one.
    pub fn password_digest(fields: &HashMap<String, String>) -> Option<&str> {
        fields.get("password").map(String::as_str)
    }
}

#[cfg(test)]
mod tests;
