//! `pharmasafe-core`: domain foundation building blocks.
//!
//! This crate contains **pure domain** primitives (no infrastructure concerns):
//! normalized identifiers, the domain error model and the aggregate traits the
//! product lifecycle is built on.

pub mod aggregate;
pub mod error;
pub mod id;

pub use aggregate::{Aggregate, AggregateRoot};
pub use error::{DomainError, DomainResult, TransitionRejection};
pub use id::{Identity, ProductId};
