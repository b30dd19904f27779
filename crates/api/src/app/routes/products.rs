use std::sync::Arc;

use axum::{
    Json, Router,
    extract::{Extension, Path},
    http::StatusCode,
    response::IntoResponse,
    routing::{get, post},
};

use crate::app::services::{AppServices, run_blocking};
use crate::app::{dto, errors};
use crate::context::CallerContext;

pub fn router() -> Router {
    Router::new()
        .route("/", post(create_product).get(list_products))
        .route("/:id", get(get_product))
        .route("/:id/stages", post(append_stage))
        .route("/:id/anchor", post(anchor_product))
        .route("/:id/verify", get(verify_product))
}

pub async fn create_product(
    Extension(services): Extension<Arc<AppServices>>,
    Extension(caller): Extension<CallerContext>,
    Json(body): Json<dto::CreateProductRequest>,
) -> axum::response::Response {
    let actor = match caller.require() {
        Ok(actor) => actor.clone(),
        Err(resp) => return resp,
    };

    match run_blocking(services, move |s| s.create_product(&actor, body.into())).await {
        Ok(product) => (StatusCode::CREATED, Json(product)).into_response(),
        Err(e) => errors::service_error_to_response(e),
    }
}

pub async fn list_products(
    Extension(services): Extension<Arc<AppServices>>,
) -> axum::response::Response {
    match run_blocking(services, |s| s.list_products()).await {
        Ok(products) => Json(products).into_response(),
        Err(e) => errors::service_error_to_response(e),
    }
}

pub async fn get_product(
    Extension(services): Extension<Arc<AppServices>>,
    Path(id): Path<String>,
) -> axum::response::Response {
    match run_blocking(services, move |s| s.get_product_detail(&id)).await {
        Ok(detail) => Json(detail).into_response(),
        Err(e) => errors::service_error_to_response(e),
    }
}

pub async fn append_stage(
    Extension(services): Extension<Arc<AppServices>>,
    Extension(caller): Extension<CallerContext>,
    Path(id): Path<String>,
    Json(body): Json<dto::AppendStageRequest>,
) -> axum::response::Response {
    let actor = match caller.require() {
        Ok(actor) => actor.clone(),
        Err(resp) => return resp,
    };

    match run_blocking(services, move |s| s.append_stage(&actor, &id, &body.stage_name)).await {
        // A re-sent request that only repaired state or retried anchoring created no row.
        Ok(outcome) if outcome.recorded.is_none() => Json(outcome).into_response(),
        Ok(outcome) => (StatusCode::CREATED, Json(outcome)).into_response(),
        Err(e) => errors::service_error_to_response(e),
    }
}

pub async fn anchor_product(
    Extension(services): Extension<Arc<AppServices>>,
    Extension(caller): Extension<CallerContext>,
    Path(id): Path<String>,
) -> axum::response::Response {
    let actor = match caller.require() {
        Ok(actor) => actor.clone(),
        Err(resp) => return resp,
    };

    match run_blocking(services, move |s| s.anchor_product(&actor, &id)).await {
        Ok(receipt) => (StatusCode::CREATED, Json(receipt)).into_response(),
        Err(e) => errors::service_error_to_response(e),
    }
}

/// Both verdicts are a 200: a mismatch is an answer, not a failure.
pub async fn verify_product(
    Extension(services): Extension<Arc<AppServices>>,
    Path(id): Path<String>,
) -> axum::response::Response {
    match run_blocking(services, move |s| s.verify_product(&id)).await {
        Ok(report) => Json(report).into_response(),
        Err(e) => errors::service_error_to_response(e),
    }
}
