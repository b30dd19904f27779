use axum::{Router, routing::get};

pub mod products;
pub mod system;
pub mod writers;

/// Router for all endpoints that see the caller context.
pub fn router() -> Router {
    Router::new()
        .route("/whoami", get(system::whoami))
        .nest("/products", products::router())
        .nest("/writers", writers::router())
}
