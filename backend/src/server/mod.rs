//! Server construction and middleware wiring.

pub mod config;

use std::sync::Arc;
use std::time::Duration;

use actix_session::{
    SessionMiddleware,
    config::{CookieContentSecurity, PersistentSession},
    storage::CookieSessionStore,
};
use actix_web::cookie::{Key, SameSite};
use actix_web::dev::{Server, ServiceFactory, ServiceRequest, ServiceResponse};
use actix_web::{App, HttpServer, web};
use tracing::info;
#[cfg(debug_assertions)]
use utoipa::OpenApi;
#[cfg(debug_assertions)]
use utoipa_swagger_ui::SwaggerUi;

#[cfg(debug_assertions)]
use crate::doc::ApiDoc;
use crate::inbound::http::admin::{
    create_handbook, delete_object, list_handbooks, list_objects, record_payment,
    update_handbook, upload_object,
};
use crate::inbound::http::confirmation::get_confirmation;
use crate::inbound::http::health::{HealthState, live, ready};
use crate::inbound::http::order::{
    enter_basic_info, enter_content_choices, get_workflow, reset, step_back, submit,
};
use crate::inbound::http::state::HttpState;
use crate::middleware::Trace;
use crate::outbound::memory::{InMemoryObjectStore, InMemoryRecordStore};
use crate::outbound::rest::RestRecordStore;
use crate::outbound::storage::HttpObjectStore;
use crate::server::config::AppConfig;

/// Request timeout applied to every hosted-store round trip.
const STORE_REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

/// Build the HTTP state from configuration: hosted adapters when the store
/// credentials are present, in-memory fallbacks otherwise.
///
/// # Errors
///
/// Propagates [`std::io::Error`] when a hosted adapter cannot be built
/// from the configured endpoint.
pub fn build_state(config: &AppConfig) -> std::io::Result<HttpState> {
    match &config.store {
        Some(store) => {
            let records =
                RestRecordStore::new(&store.endpoint, store.anon_key.clone(), STORE_REQUEST_TIMEOUT)
                    .map_err(std::io::Error::other)?;
            let objects =
                HttpObjectStore::new(&store.endpoint, store.anon_key.clone(), STORE_REQUEST_TIMEOUT)
                    .map_err(std::io::Error::other)?;
            info!(endpoint = %store.endpoint, "using the hosted record and object stores");
            Ok(HttpState::new(
                Arc::new(records),
                Arc::new(objects),
                config.product.clone(),
            ))
        }
        None => Ok(HttpState::new(
            Arc::new(InMemoryRecordStore::new()),
            Arc::new(InMemoryObjectStore::new()),
            config.product.clone(),
        )),
    }
}

/// Dependency bundle for one worker's application instance.
#[derive(Clone)]
pub struct AppDependencies {
    /// Shared readiness/liveness state.
    pub health_state: web::Data<HealthState>,
    /// Shared port/service bundle for handlers.
    pub http_state: web::Data<HttpState>,
    /// Session cookie signing key.
    pub key: Key,
    /// Whether the session cookie requires HTTPS.
    pub cookie_secure: bool,
}

/// Assemble the application: trace middleware, the versioned API scope
/// behind the session middleware, and the health probes.
pub fn build_app(
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
        key,
        cookie_secure,
    } = deps;

    let session = SessionMiddleware::builder(CookieSessionStore::default(), key)
        .cookie_name("session".into())
        .cookie_path("/".into())
        .cookie_secure(cookie_secure)
        .cookie_http_only(true)
        .cookie_content_security(CookieContentSecurity::Private)
        .cookie_same_site(SameSite::Lax)
        .session_lifecycle(
            PersistentSession::default().session_ttl(actix_web::cookie::time::Duration::hours(2)),
        )
        .build();

    let api = web::scope("/api/v1")
        .wrap(session)
        .service(get_workflow)
        .service(enter_basic_info)
        .service(enter_content_choices)
        .service(step_back)
        .service(submit)
        .service(reset)
        .service(get_confirmation)
        .service(list_handbooks)
        .service(create_handbook)
        .service(update_handbook)
        .service(record_payment)
        .service(list_objects)
        .service(upload_object)
        .service(delete_object);

    let app = App::new()
        .app_data(health_state)
        .app_data(http_state)
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

/// Construct the Actix HTTP server from configuration.
///
/// # Errors
///
/// Propagates [`std::io::Error`] when a hosted adapter cannot be built or
/// the socket cannot be bound.
pub fn create_server(
    health_state: web::Data<HealthState>,
    key: Key,
    config: AppConfig,
) -> std::io::Result<Server> {
    let http_state = web::Data::new(build_state(&config)?);
    let server_health_state = health_state.clone();
    let cookie_secure = config.cookie_secure;

    let server = HttpServer::new(move || {
        build_app(AppDependencies {
            health_state: server_health_state.clone(),
            http_state: http_state.clone(),
            key: key.clone(),
            cookie_secure,
        })
    })
    .bind(config.bind_addr)?
    .run();

    health_state.mark_ready();
    Ok(server)
}
