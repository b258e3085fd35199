//! Server construction and middleware wiring.

mod config;

pub use config::{AdminConfig, ServerConfig};

use std::sync::Arc;

use actix_web::dev::{Server, ServiceFactory, ServiceRequest, ServiceResponse};
use actix_web::{App, HttpServer, web};
use tracing::warn;
#[cfg(debug_assertions)]
use utoipa::OpenApi;
#[cfg(debug_assertions)]
use utoipa_swagger_ui::SwaggerUi;

#[cfg(debug_assertions)]
use crate::doc::ApiDoc;
use crate::domain::ports::KeyValueStore;
use crate::domain::user::{Email, Username};
use crate::domain::Password;
use crate::inbound::http::admin::{delete_user, list_users, repair, system_stats};
use crate::inbound::http::auth::{current_user, login, logout, register};
use crate::inbound::http::health::{HealthState, live, ready};
use crate::inbound::http::links::{
    create_link, delete_link, list_links, record_click, update_link, update_positions,
};
use crate::inbound::http::profiles::{
    MAX_IMAGE_BYTES, analytics, list_themes, public_profile, record_view, update_profile,
    upload_image,
};
use crate::inbound::http::state::HttpState;
use crate::middleware::Trace;
use crate::outbound::blob::FsBlobStore;
use crate::outbound::persistence::{InMemoryKvStore, RedisKvStore};

#[derive(Clone)]
struct AppDependencies {
    health_state: web::Data<HealthState>,
    http_state: web::Data<HttpState>,
}

fn build_app(
    deps: AppDependencies,
) -> App<
    impl ServiceFactory<
        ServiceRequest,
        Config = (),
        Response = ServiceResponse,
        Error = actix_web::Error,
        InitError = (),
    >,
> {
    let AppDependencies {
        health_state,
        http_state,
    } = deps;

    let api = web::scope("/api/v1")
        .service(register)
        .service(login)
        .service(logout)
        .service(current_user)
        .service(list_links)
        .service(create_link)
        .service(update_positions)
        .service(update_link)
        .service(delete_link)
        .service(record_click)
        .service(public_profile)
        .service(record_view)
        .service(list_themes)
        .service(update_profile)
        .service(upload_image)
        .service(analytics)
        .service(list_users)
        .service(system_stats)
        .service(repair)
        .service(delete_user);

    let app = App::new()
        .app_data(health_state)
        .app_data(http_state)
        // Raw-body uploads must fit the image cap; the actix default is
        // far smaller.
        .app_data(web::PayloadConfig::new(MAX_IMAGE_BYTES))
        .wrap(Trace)
        .service(api)
        .service(ready)
        .service(live);

    #[cfg(debug_assertions)]
    let app = app.service(SwaggerUi::new("/docs").url("/api-docs/openapi.json", ApiDoc::openapi()));
    #[cfg(not(debug_assertions))]
    let app = app;

    app
}

/// Pick the key-value store implied by the configuration.
async fn build_kv_store(config: &ServerConfig) -> std::io::Result<Arc<dyn KeyValueStore>> {
    match &config.redis_url {
        Some(url) => {
            let store = RedisKvStore::connect(url)
                .await
                .map_err(|error| std::io::Error::other(format!("redis connect failed: {error}")))?;
            Ok(Arc::new(store))
        }
        None => {
            warn!("REDIS_URL not set; using the in-memory store (data is not persisted)");
            Ok(Arc::new(InMemoryKvStore::new()))
        }
    }
}

/// Construct an Actix HTTP server using the provided health state and
/// configuration.
///
/// Connects the store adapters, writes the bootstrap admin account if it is
/// missing, and marks the health state ready once the listener is bound.
///
/// # Errors
/// Propagates [`std::io::Error`] when store setup, admin bootstrap, or
/// binding the socket fails.
pub async fn create_server(
    health_state: web::Data<HealthState>,
    config: ServerConfig,
) -> std::io::Result<Server> {
    let kv = build_kv_store(&config).await?;
    let blobs = Arc::new(FsBlobStore::new(
        config.blob_root.clone(),
        config.public_base_url.clone(),
    ));
    let http_state = web::Data::new(HttpState::new(kv, blobs, config.cookie_secure));

    bootstrap_admin(&http_state, &config.admin).await?;

    let server_health_state = health_state.clone();
    let server = HttpServer::new(move || {
        build_app(AppDependencies {
            health_state: server_health_state.clone(),
            http_state: http_state.clone(),
        })
    })
    .bind(config.bind_addr)?
    .run();

    health_state.mark_ready();
    Ok(server)
}

/// Ensure the admin account exists before accepting traffic.
async fn bootstrap_admin(state: &HttpState, admin: &AdminConfig) -> std::io::Result<()> {
    let username = Username::new(&admin.username)
        .map_err(|error| std::io::Error::other(format!("invalid ADMIN_USERNAME: {error}")))?;
    let email = Email::new(&admin.email)
        .map_err(|error| std::io::Error::other(format!("invalid ADMIN_EMAIL: {error}")))?;
    let password = Password::new(admin.password.clone());

    state
        .users
        .initialize_admin(&username, &password, &email)
        .await
        .map_err(|error| std::io::Error::other(format!("admin bootstrap failed: {error}")))
}
