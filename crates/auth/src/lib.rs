//! `pharmasafe-auth`: writer/root-authority authorization boundary.
//!
//! This crate is intentionally decoupled from HTTP and storage: the registry is
//! a plain value, and every decision is a pure function over a snapshot of it.

pub mod authorize;
pub mod registry;
pub mod roles;

pub use authorize::{AuthorizationExplanation, AuthzError, authorize, explain_authorization};
pub use registry::{AuthorizationRegistry, RegistryError};
pub use roles::{Privilege, Role};
