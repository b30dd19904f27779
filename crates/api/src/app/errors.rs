use axum::http::StatusCode;
use axum::response::IntoResponse;
use serde_json::json;

use pharmasafe_infra::ServiceError;

pub fn service_error_to_response(err: ServiceError) -> axum::response::Response {
    let status = match &err {
        ServiceError::Unauthorized => StatusCode::FORBIDDEN,
        ServiceError::NotFound(_) | ServiceError::NotAuthorized(_) => StatusCode::NOT_FOUND,
        ServiceError::InvalidIdentity(_) | ServiceError::InvalidInput(_) => StatusCode::BAD_REQUEST,
        ServiceError::InvalidTransition(_)
        | ServiceError::DuplicateId(_)
        | ServiceError::AlreadyAuthorized(_)
        | ServiceError::AlreadyAnchored(_)
        | ServiceError::CannotRemoveRootAuthority
        | ServiceError::NotYetVerifiable(_) => StatusCode::CONFLICT,
        ServiceError::TransientFailure(_) => StatusCode::SERVICE_UNAVAILABLE,
    };

    let details = match &err {
        ServiceError::InvalidTransition(rejection) => serde_json::to_value(rejection).ok(),
        ServiceError::NotYetVerifiable(reason) => serde_json::to_value(reason).ok(),
        _ => None,
    };

    let mut body = json!({
        "error": err.code(),
        "message": err.to_string(),
        "retryable": err.is_retryable(),
    });
    if let Some(details) = details {
        body["details"] = details;
    }

    (status, axum::Json(body)).into_response()
}

pub fn json_error(
    status: StatusCode,
    code: &'static str,
    message: impl Into<String>,
) -> axum::response::Response {
    (
        status,
        axum::Json(json!({
            "error": code,
            "message": message.into(),
        })),
    )
        .into_response()
}
