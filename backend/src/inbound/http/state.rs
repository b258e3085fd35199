//! Shared HTTP adapter state.
//!
//! HTTP handlers accept this state via `actix_web::web::Data` so they only
//! depend on domain services and remain testable without a Redis instance.

use std::sync::Arc;

use crate::domain::ports::{BlobStore, KeyValueStore};
use crate::domain::{LinksService, MaintenanceService, ProfilesService, UsersService};

/// Dependency bundle for HTTP handlers.
#[derive(Clone)]
pub struct HttpState {
    pub users: UsersService,
    pub links: LinksService,
    pub profiles: ProfilesService,
    pub maintenance: MaintenanceService,
    /// Whether issued cookies carry the `Secure` attribute.
    pub cookie_secure: bool,
}

impl HttpState {
    /// Wire every service over the given store adapters.
    pub fn new(
        kv: Arc<dyn KeyValueStore>,
        blobs: Arc<dyn BlobStore>,
        cookie_secure: bool,
    ) -> Self {
        Self {
            users: UsersService::new(Arc::clone(&kv)),
            links: LinksService::new(Arc::clone(&kv)),
            profiles: ProfilesService::new(Arc::clone(&kv), blobs),
            maintenance: MaintenanceService::new(kv),
            cookie_secure,
        }
    }
}
