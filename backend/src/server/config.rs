//! HTTP server configuration object and helpers.

use std::env;
use std::net::SocketAddr;
use std::path::PathBuf;

/// Bootstrap admin account settings.
#[derive(Debug, Clone)]
pub struct AdminConfig {
    pub username: String,
    pub password: String,
    pub email: String,
}

impl Default for AdminConfig {
    fn default() -> Self {
        Self {
            username: "admin".into(),
            password: "admin123".into(),
            email: "admin@linkhub.com".into(),
        }
    }
}

/// Builder-style configuration for creating the HTTP server.
#[derive(Debug, Clone)]
pub struct ServerConfig {
    pub(crate) bind_addr: SocketAddr,
    pub(crate) cookie_secure: bool,
    /// When absent the server runs on the in-memory store (dev only).
    pub(crate) redis_url: Option<String>,
    pub(crate) blob_root: PathBuf,
    pub(crate) public_base_url: String,
    pub(crate) admin: AdminConfig,
}

impl ServerConfig {
    /// Construct a configuration with explicit binding and cookie settings.
    #[must_use]
    pub fn new(bind_addr: SocketAddr, cookie_secure: bool) -> Self {
        Self {
            bind_addr,
            cookie_secure,
            redis_url: None,
            blob_root: PathBuf::from("data/uploads"),
            public_base_url: "/uploads".into(),
            admin: AdminConfig::default(),
        }
    }

    /// Read configuration from the environment.
    ///
    /// # Errors
    /// Returns [`std::io::Error`] when `BIND_ADDR` is not a socket address.
    pub fn from_env() -> std::io::Result<Self> {
        let bind_addr = env::var("BIND_ADDR")
            .unwrap_or_else(|_| "0.0.0.0:8080".into())
            .parse::<SocketAddr>()
            .map_err(|error| std::io::Error::other(format!("invalid BIND_ADDR: {error}")))?;
        let cookie_secure = env::var("SESSION_COOKIE_SECURE")
            .map(|v| v != "0")
            .unwrap_or(true);

        let mut config = Self::new(bind_addr, cookie_secure);
        config.redis_url = env::var("REDIS_URL").ok();
        if let Ok(root) = env::var("BLOB_ROOT") {
            config.blob_root = PathBuf::from(root);
        }
        if let Ok(base) = env::var("PUBLIC_BASE_URL") {
            config.public_base_url = base;
        }
        if let Ok(username) = env::var("ADMIN_USERNAME") {
            config.admin.username = username;
        }
        if let Ok(password) = env::var("ADMIN_PASSWORD") {
            config.admin.password = password;
        }
        if let Ok(email) = env::var("ADMIN_EMAIL") {
            config.admin.email = email;
        }
        Ok(config)
    }

    /// Attach a Redis connection URL.
    #[must_use]
    pub fn with_redis_url(mut self, url: impl Into<String>) -> Self {
        self.redis_url = Some(url.into());
        self
    }

    /// Override blob storage locations.
    #[must_use]
    pub fn with_blob_store(mut self, root: PathBuf, public_base_url: impl Into<String>) -> Self {
        self.blob_root = root;
        self.public_base_url = public_base_url.into();
        self
    }

    /// Return the socket address the server will bind to.
    #[must_use]
    pub fn bind_addr(&self) -> SocketAddr {
        self.bind_addr
    }
}
