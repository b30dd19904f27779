use axum::http::StatusCode;
use axum::response::Response;

use pharmasafe_core::Identity;

use crate::app::errors;

/// Caller identity for a request, as supplied by the wallet provider.
///
/// Reads are open to anyone, so the identity is optional until a route
/// needs one.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct CallerContext {
    identity: Option<Identity>,
}

impl CallerContext {
    pub fn anonymous() -> Self {
        Self { identity: None }
    }

    pub fn identified(identity: Identity) -> Self {
        Self {
            identity: Some(identity),
        }
    }

    pub fn identity(&self) -> Option<&Identity> {
        self.identity.as_ref()
    }

    /// The caller identity, or a 401 response for routes that mutate state.
    pub fn require(&self) -> Result<&Identity, Response> {
        self.identity.as_ref().ok_or_else(|| {
            errors::json_error(
                StatusCode::UNAUTHORIZED,
                "missing_identity",
                format!("{} header is required", crate::middleware::IDENTITY_HEADER),
            )
        })
    }
}
