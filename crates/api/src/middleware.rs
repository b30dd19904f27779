use axum::{http::StatusCode, middleware::Next, response::Response};

use pharmasafe_core::Identity;

use crate::app::errors;
use crate::context::CallerContext;

/// Header carrying the caller's wallet address.
pub const IDENTITY_HEADER: &str = "x-wallet-address";

/// Attach a [`CallerContext`] to every request.
///
/// A missing header yields an anonymous caller; a present but malformed one
/// is rejected outright.
pub async fn identity_middleware(
    mut req: axum::http::Request<axum::body::Body>,
    next: Next,
) -> Result<Response, Response> {
    let caller = match req.headers().get(IDENTITY_HEADER) {
        None => CallerContext::anonymous(),
        Some(value) => {
            let raw = value.to_str().map_err(|_| {
                errors::json_error(
                    StatusCode::BAD_REQUEST,
                    "invalid_identity",
                    "identity header must be visible ASCII",
                )
            })?;
            let identity = Identity::parse(raw).map_err(|e| {
                errors::json_error(StatusCode::BAD_REQUEST, "invalid_identity", e.to_string())
            })?;
            CallerContext::identified(identity)
        }
    };

    req.extensions_mut().insert(caller);
    Ok(next.run(req).await)
}
