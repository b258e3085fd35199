//! User directory: registration, login, sessions, and admin bootstrap.

use std::sync::Arc;

use tracing::{info, warn};

use crate::domain::ports::{KeyValueStore, KvError};
use crate::domain::record::RecordError;
use crate::domain::user::{Email, User, Username};
use crate::domain::password::Password;
use crate::domain::session::{SESSION_TTL, new_session_id};
use crate::domain::{Error, ids, keys};

/// Validated registration input.
#[derive(Debug, Clone)]
pub struct Registration {
    pub email: Email,
    pub username: Username,
    pub password: Password,
    /// Falls back to the username when absent or empty.
    pub display_name: Option<String>,
}

/// User directory service over the key-value store.
///
/// Uniqueness of usernames and emails is enforced by the store itself:
/// registration claims the username with an atomic set-add and the email
/// with a set-if-absent write, so two concurrent registrations can never
/// both succeed.
#[derive(Clone)]
pub struct UsersService {
    kv: Arc<dyn KeyValueStore>,
}

fn map_kv(error: KvError) -> Error {
    match error {
        KvError::Connection { message } => {
            Error::service_unavailable(format!("store unavailable: {message}"))
        }
        KvError::Command { message } => Error::internal(format!("store command failed: {message}")),
        KvError::Corrupt { message } => Error::internal(format!("store data malformed: {message}")),
    }
}

fn map_record(error: RecordError) -> Error {
    Error::internal(format!("corrupt user record: {error}"))
}

impl UsersService {
    /// Create the service over a key-value store.
    pub fn new(kv: Arc<dyn KeyValueStore>) -> Self {
        Self { kv }
    }

    /// Register a new account.
    ///
    /// Returns `Ok(None)` when the username or email is already taken.
    pub async fn register(&self, registration: Registration) -> Result<Option<User>, Error> {
        let Registration {
            email,
            username,
            password,
            display_name,
        } = registration;

        if !password.is_long_enough() {
            return Err(Error::invalid_request(
                "password must be at least 6 characters",
            ));
        }

        // Claim the username atomically via the global set.
        if !self
            .kv
            .set_add(keys::USERS_SET, username.as_ref())
            .await
            .map_err(map_kv)?
        {
            return Ok(None);
        }

        // Claim the email index; on conflict release the username again.
        if !self
            .kv
            .set_string_nx(&keys::email_index(email.as_ref()), username.as_ref(), None)
            .await
            .map_err(map_kv)?
        {
            if let Err(error) = self.kv.set_remove(keys::USERS_SET, username.as_ref()).await {
                warn!(%username, %error, "failed to release username after email conflict");
            }
            return Ok(None);
        }

        let now = ids::now_ms();
        let display_name = display_name
            .filter(|name| !name.trim().is_empty())
            .unwrap_or_else(|| username.to_string());
        let user = User {
            id: ids::new_user_id(now),
            username: username.clone(),
            email,
            display_name,
            bio: String::new(),
            profile_image: None,
            is_admin: false,
            created_at: now,
        };

        self.kv
            .hash_set(
                &keys::user(username.as_ref()),
                &user.to_fields(&password.digest()),
            )
            .await
            .map_err(map_kv)?;

        info!(%username, "user registered");
        Ok(Some(user))
    }

    /// Authenticate with a username or email plus password.
    ///
    /// Returns the stored record with the password digest stripped, or
    /// `Ok(None)` on any mismatch or missing record.
    pub async fn login(
        &self,
        username_or_email: &str,
        password: &Password,
    ) -> Result<Option<User>, Error> {
        let username = if username_or_email.contains('@') {
            match self
                .kv
                .get_string(&keys::email_index(username_or_email))
                .await
                .map_err(map_kv)?
            {
                Some(username) => username,
                None => return Ok(None),
            }
        } else {
            username_or_email.to_owned()
        };

        let Some(fields) = self
            .kv
            .hash_get_all(&keys::user(&username))
            .await
            .map_err(map_kv)?
        else {
            return Ok(None);
        };

        let Some(stored) = User::password_digest(&fields) else {
            return Ok(None);
        };
        if !password.matches(stored) {
            return Ok(None);
        }

        User::from_fields(&fields).map(Some).map_err(map_record)
    }

    /// Create a session for `username` and return its opaque identifier.
    pub async fn create_session(&self, username: &Username) -> Result<String, Error> {
        let session_id = new_session_id();
        self.kv
            .set_string(
                &keys::session(&session_id),
                username.as_ref(),
                Some(SESSION_TTL),
            )
            .await
            .map_err(map_kv)?;
        Ok(session_id)
    }

    /// Resolve a session identifier to its user.
    ///
    /// `Ok(None)` when the session is expired, unknown, or the referenced
    /// user no longer exists.
    pub async fn user_by_session(&self, session_id: &str) -> Result<Option<User>, Error> {
        let Some(username) = self
            .kv
            .get_string(&keys::session(session_id))
            .await
            .map_err(map_kv)?
        else {
            return Ok(None);
        };
        let Some(fields) = self
            .kv
            .hash_get_all(&keys::user(&username))
            .await
            .map_err(map_kv)?
        else {
            return Ok(None);
        };
        User::from_fields(&fields).map(Some).map_err(map_record)
    }

    /// Destroy a session. Deleting an absent session is not an error.
    pub async fn logout(&self, session_id: &str) -> Result<(), Error> {
        self.kv
            .delete(&keys::session(session_id))
            .await
            .map(|_| ())
            .map_err(map_kv)
    }

    /// Fetch a user by username.
    pub async fn user_by_username(&self, username: &str) -> Result<Option<User>, Error> {
        let Some(fields) = self
            .kv
            .hash_get_all(&keys::user(username))
            .await
            .map_err(map_kv)?
        else {
            return Ok(None);
        };
        User::from_fields(&fields).map(Some).map_err(map_record)
    }

    /// List every registered user, passwords stripped.
    ///
    /// Records that fail to decode are skipped with a warning rather than
    /// failing the whole listing; this is an administrative surface.
    pub async fn all_users(&self) -> Result<Vec<User>, Error> {
        let usernames = self
            .kv
            .set_members(keys::USERS_SET)
            .await
            .map_err(map_kv)?;
        let mut users = Vec::with_capacity(usernames.len());
        for username in usernames {
            let Some(fields) = self
                .kv
                .hash_get_all(&keys::user(&username))
                .await
                .map_err(map_kv)?
            else {
                continue;
            };
            match User::from_fields(&fields) {
                Ok(user) => users.push(user),
                Err(error) => warn!(%username, %error, "skipping undecodable user record"),
            }
        }
        users.sort_by(|a, b| a.username.as_ref().cmp(b.username.as_ref()));
        Ok(users)
    }

    /// Ensure the administrative account exists. Idempotent; called at
    /// process start. The credentials come from configuration, defaulting
    /// to placeholder values documented as such.
    pub async fn initialize_admin(
        &self,
        username: &Username,
        password: &Password,
        email: &Email,
    ) -> Result<(), Error> {
        if self
            .kv
            .exists(&keys::user(username.as_ref()))
            .await
            .map_err(map_kv)?
        {
            return Ok(());
        }

        let now = ids::now_ms();
        let admin = User {
            id: "admin_1".into(),
            username: username.clone(),
            email: email.clone(),
            display_name: "Admin".into(),
            bio: "LinkHub Administrator".into(),
            profile_image: None,
            is_admin: true,
            created_at: now,
        };

        self.kv
            .hash_set(
                &keys::user(username.as_ref()),
                &admin.to_fields(&password.digest()),
            )
            .await
            .map_err(map_kv)?;
        self.kv
            .set_string(&keys::email_index(email.as_ref()), username.as_ref(), None)
            .await
            .map_err(map_kv)?;
        self.kv
            .set_add(keys::USERS_SET, username.as_ref())
            .await
            .map_err(map_kv)?;

        info!(%username, "admin account created");
        Ok(())
    }
}
