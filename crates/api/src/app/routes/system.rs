use std::sync::Arc;

use axum::{Json, extract::Extension, http::StatusCode, response::IntoResponse};

use pharmasafe_auth::Privilege;

use crate::app::services::AppServices;
use crate::context::CallerContext;

pub async fn health() -> StatusCode {
    StatusCode::OK
}

/// Role and privileges of the caller.
pub async fn whoami(
    Extension(services): Extension<Arc<AppServices>>,
    Extension(caller): Extension<CallerContext>,
) -> axum::response::Response {
    let identity = match caller.require() {
        Ok(identity) => identity,
        Err(resp) => return resp,
    };

    let write = services.explain(identity, Privilege::WriteRecords);
    let manage = services.explain(identity, Privilege::ManageWriters);

    Json(serde_json::json!({
        "identity": identity,
        "role": write.role,
        "is_writer": services.is_writer(identity),
        "is_root_authority": services.is_root_authority(identity),
        "privileges": [write, manage],
    }))
    .into_response()
}
