//! HTTP API application wiring (Axum router + service wiring).
//!
//! - `services.rs`: store adapters and the supply-chain service
//! - `routes/`: HTTP routes + handlers (one file per area)
//! - `dto.rs`: request/response DTOs
//! - `errors.rs`: consistent error responses

use std::sync::Arc;

use axum::{Extension, Router, routing::get};
use tower::ServiceBuilder;

use pharmasafe_infra::AppConfig;

use crate::middleware;

pub mod dto;
pub mod errors;
pub mod routes;
pub mod services;

/// Build the full HTTP router (public entrypoint used by `main.rs`).
pub fn build_app(config: &AppConfig) -> Router {
    build_app_with(Arc::new(services::build_services(config)))
}

/// Build the router around an existing service (tests, embedding).
pub fn build_app_with(services: Arc<services::AppServices>) -> Router {
    let api = routes::router().layer(
        ServiceBuilder::new()
            .layer(axum::middleware::from_fn(middleware::identity_middleware))
            .layer(Extension(services)),
    );

    Router::new()
        .route("/health", get(routes::system::health))
        .merge(api)
}
