//! Domain primitives, aggregates, and services.
//!
//! Purpose: Define strongly typed domain entities and the services that
//! implement the application's behaviour over the key-value store port.
//! Keep types immutable and document invariants and serialisation contracts
//! (serde) in each type's Rustdoc.
//!
//! Layout:
//! - `error` — API error response payload and stable error codes.
//! - `keys`, `ids`, `session` — key namespace, id minting, session tokens.
//! - `user`, `link`, `profile`, `theme` — entities and their field codecs.
//! - `password`, `record`, `analytics` — supporting value logic.
//! - `*_service` — use cases wired over the [`ports`] traits.

pub mod analytics;
pub mod error;
pub mod ids;
pub mod keys;
pub mod link;
pub mod links_service;
pub mod maintenance_service;
pub mod password;
pub mod ports;
pub mod profile;
pub mod profiles_service;
pub mod record;
pub mod session;
pub mod theme;
pub mod user;
pub mod users_service;

pub use self::error::{Error, ErrorCode};
pub use self::link::{Link, LinkDraft, LinkPatch, LinkType};
pub use self::links_service::{LinksService, PositionUpdate};
pub use self::maintenance_service::{MaintenanceService, RepairReport, SystemStats};
pub use self::password::Password;
pub use self::profile::{Customization, Profile, ProfilePatch};
pub use self::profiles_service::ProfilesService;
pub use self::theme::Theme;
pub use self::user::{Email, User, UserValidationError, Username};
pub use self::users_service::{Registration, UsersService};

/// Convenient API result alias.
pub type ApiResult<T> = Result<T, Error>;
