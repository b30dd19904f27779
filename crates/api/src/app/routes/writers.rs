use std::sync::Arc;

use axum::{
    Json, Router,
    extract::{Extension, Path},
    http::StatusCode,
    response::IntoResponse,
    routing::get,
};

use crate::app::services::AppServices;
use crate::app::{dto, errors};
use crate::context::CallerContext;

pub fn router() -> Router {
    Router::new()
        .route("/", get(list_writers).post(add_writer))
        .route("/:identity", get(writer_status).delete(remove_writer))
}

pub async fn list_writers(
    Extension(services): Extension<Arc<AppServices>>,
) -> axum::response::Response {
    Json(dto::WritersResponse {
        root_authority: services.root_authority(),
        writers: services.list_writers(),
    })
    .into_response()
}

pub async fn add_writer(
    Extension(services): Extension<Arc<AppServices>>,
    Extension(caller): Extension<CallerContext>,
    Json(body): Json<dto::AddWriterRequest>,
) -> axum::response::Response {
    let actor = match caller.require() {
        Ok(actor) => actor,
        Err(resp) => return resp,
    };

    match services.add_writer(&body.identity, actor) {
        Ok(identity) => (
            StatusCode::CREATED,
            Json(dto::WriterChangeResponse {
                identity,
                is_writer: true,
            }),
        )
            .into_response(),
        Err(e) => errors::service_error_to_response(e),
    }
}

pub async fn writer_status(
    Extension(services): Extension<Arc<AppServices>>,
    Path(identity): Path<String>,
) -> axum::response::Response {
    match services.writer_status(&identity) {
        Ok(status) => Json(status).into_response(),
        Err(e) => errors::service_error_to_response(e),
    }
}

pub async fn remove_writer(
    Extension(services): Extension<Arc<AppServices>>,
    Extension(caller): Extension<CallerContext>,
    Path(identity): Path<String>,
) -> axum::response::Response {
    let actor = match caller.require() {
        Ok(actor) => actor,
        Err(resp) => return resp,
    };

    match services.remove_writer(&identity, actor) {
        Ok(identity) => Json(dto::WriterChangeResponse {
            identity,
            is_writer: false,
        })
        .into_response(),
        Err(e) => errors::service_error_to_response(e),
    }
}
