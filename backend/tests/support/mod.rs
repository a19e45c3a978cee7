//! Shared harness for HTTP integration tests.
//!
//! Builds the full application over the in-memory store adapters and
//! carries the session cookie between requests the way a browser would.

use std::sync::Arc;

use actix_http::Request;
use actix_web::cookie::{Cookie, Key};
use actix_web::dev::{Service, ServiceResponse};
use actix_web::{test, web};

use backend::inbound::http::health::HealthState;
use backend::inbound::http::state::HttpState;
use backend::outbound::memory::{InMemoryObjectStore, InMemoryRecordStore};
use backend::server::AppDependencies;
use backend::server::config::ProductInfo;

/// Direct handles on the in-memory stores behind the app under test.
pub struct TestStores {
    pub records: Arc<InMemoryRecordStore>,
    pub objects: Arc<InMemoryObjectStore>,
}

/// Application dependencies over fresh in-memory stores.
pub fn app_dependencies() -> (AppDependencies, TestStores) {
    let records = Arc::new(InMemoryRecordStore::new());
    let objects = Arc::new(InMemoryObjectStore::new());
    let state = HttpState::new(records.clone(), objects.clone(), ProductInfo::default());
    let deps = AppDependencies {
        health_state: web::Data::new(HealthState::new()),
        http_state: web::Data::new(state),
        key: Key::generate(),
        cookie_secure: false,
    };
    (deps, TestStores { records, objects })
}

/// Extract the session cookie from a response, if the middleware set one.
pub fn session_cookie(res: &ServiceResponse) -> Option<Cookie<'static>> {
    res.response()
        .cookies()
        .find(|cookie| cookie.name() == "session")
        .map(|cookie| cookie.into_owned())
}

/// Send a request, attaching the tracked session cookie and updating it
/// from the response, mirroring browser behaviour.
pub async fn send(
    app: &impl Service<Request, Response = ServiceResponse, Error = actix_web::Error>,
    mut req: test::TestRequest,
    cookie: &mut Option<Cookie<'static>>,
) -> ServiceResponse {
    if let Some(current) = cookie.as_ref() {
        req = req.cookie(current.clone());
    }
    let res = test::call_service(app, req.to_request()).await;
    if let Some(updated) = session_cookie(&res) {
        *cookie = Some(updated);
    }
    res
}
