//! OpenAPI documentation configuration.
//!
//! Defines the [`ApiDoc`] struct generating the OpenAPI specification for
//! the REST API: every HTTP endpoint from the inbound layer, the domain
//! schemas they exchange, and the session cookie security scheme. The
//! generated document backs Swagger UI in debug builds.

use utoipa::openapi::security::{ApiKey, ApiKeyValue, SecurityScheme};
use utoipa::{Modify, OpenApi};

use crate::domain::analytics::ProfileAnalytics;
use crate::domain::maintenance_service::{RepairReport, SystemStats};
use crate::domain::theme::Theme;
use crate::domain::{Customization, Error, ErrorCode, Link, LinkDraft, LinkPatch, LinkType,
    Profile, ProfilePatch, User};
use crate::inbound::http::auth::{LoginRequest, RegisterRequest};
use crate::inbound::http::links::{ClickResponse, PositionsRequest};
use crate::inbound::http::profiles::{ImageResponse, PublicProfileResponse, ViewResponse};

/// Enrich the generated document with the session cookie security scheme.
struct SecurityAddon;

impl Modify for SecurityAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        let components = openapi
            .components
            .get_or_insert_with(utoipa::openapi::Components::default);

        components.add_security_scheme(
            "SessionCookie",
            SecurityScheme::ApiKey(ApiKey::Cookie(ApiKeyValue::with_description(
                "session",
                "Session cookie issued by POST /api/v1/login.",
            ))),
        );
    }
}

/// OpenAPI document for the REST API.
/// Swagger UI is enabled in debug builds only.
#[derive(OpenApi)]
#[openapi(
    modifiers(&SecurityAddon),
    info(
        title = "LinkHub API",
        description = "Link-in-bio service: accounts, links, profiles, and analytics."
    ),
    servers(
        (url = "/", description = "Relative to the deployment base URL")
    ),
    security(("SessionCookie" = [])),
    paths(
        crate::inbound::http::auth::register,
        crate::inbound::http::auth::login,
        crate::inbound::http::auth::logout,
        crate::inbound::http::auth::current_user,
        crate::inbound::http::links::list_links,
        crate::inbound::http::links::create_link,
        crate::inbound::http::links::update_link,
        crate::inbound::http::links::delete_link,
        crate::inbound::http::links::update_positions,
        crate::inbound::http::links::record_click,
        crate::inbound::http::profiles::public_profile,
        crate::inbound::http::profiles::record_view,
        crate::inbound::http::profiles::list_themes,
        crate::inbound::http::profiles::update_profile,
        crate::inbound::http::profiles::upload_image,
        crate::inbound::http::profiles::analytics,
        crate::inbound::http::admin::list_users,
        crate::inbound::http::admin::system_stats,
        crate::inbound::http::admin::repair,
        crate::inbound::http::admin::delete_user,
        crate::inbound::http::health::ready,
        crate::inbound::http::health::live,
    ),
    components(schemas(
        Error,
        ErrorCode,
        User,
        Link,
        LinkType,
        LinkDraft,
        LinkPatch,
        Profile,
        ProfilePatch,
        Customization,
        Theme,
        ProfileAnalytics,
        SystemStats,
        RepairReport,
        RegisterRequest,
        LoginRequest,
        PositionsRequest,
        ClickResponse,
        PublicProfileResponse,
        ViewResponse,
        ImageResponse,
    )),
    tags(
        (name = "auth", description = "Registration, login, and sessions"),
        (name = "links", description = "Link management and click tracking"),
        (name = "profiles", description = "Public profiles, customisation, analytics"),
        (name = "admin", description = "Administrative maintenance"),
        (name = "health", description = "Endpoints for health checks")
    )
)]
pub struct ApiDoc;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn document_references_every_route() {
        let doc = ApiDoc::openapi();
        let paths: Vec<&String> = doc.paths.paths.keys().collect();
        for expected in [
            "/api/v1/register",
            "/api/v1/login",
            "/api/v1/logout",
            "/api/v1/me",
            "/api/v1/links",
            "/api/v1/links/{id}",
            "/api/v1/links/positions",
            "/api/v1/links/{id}/click",
            "/api/v1/profiles/{username}",
            "/api/v1/profiles/{username}/view",
            "/api/v1/themes",
            "/api/v1/profile",
            "/api/v1/profile/image",
            "/api/v1/profile/analytics",
            "/api/v1/admin/users",
            "/api/v1/admin/stats",
            "/api/v1/admin/repair",
            "/api/v1/admin/users/{username}",
            "/health/ready",
            "/health/live",
        ] {
            assert!(
                paths.iter().any(|path| *path == expected),
                "missing path {expected}"
            );
        }
    }

    #[test]
    fn document_registers_the_security_scheme() {
        let doc = ApiDoc::openapi();
        let components = doc.components.expect("components");
        assert!(components.security_schemes.contains_key("SessionCookie"));
    }
}
