//! Domain error model.

use serde::Serialize;
use thiserror::Error;

/// Result type used across the domain layer.
pub type DomainResult<T> = Result<T, DomainError>;

/// Domain-level error.
///
/// Keep this focused on deterministic, business/domain failures (validation,
/// sequencing, uniqueness). Store outages belong to the infrastructure layer.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum DomainError {
    /// A value failed validation (e.g. blank product type).
    #[error("invalid input: {0}")]
    InvalidInput(String),

    /// An identity string was malformed (empty, whitespace, zero address).
    #[error("invalid identity: {0}")]
    InvalidIdentity(String),

    /// A stage transition broke the strictly-sequential lifecycle.
    #[error("invalid transition: {0}")]
    InvalidTransition(TransitionRejection),

    /// A requested product was not found.
    #[error("not found")]
    NotFound,

    /// A product with the same identifier already exists.
    #[error("duplicate id: {0}")]
    DuplicateId(String),

    /// The acting identity lacks the required privilege.
    #[error("unauthorized")]
    Unauthorized,
}

impl DomainError {
    pub fn invalid_input(msg: impl Into<String>) -> Self {
        Self::InvalidInput(msg.into())
    }

    pub fn invalid_identity(msg: impl Into<String>) -> Self {
        Self::InvalidIdentity(msg.into())
    }

    pub fn duplicate_id(id: impl Into<String>) -> Self {
        Self::DuplicateId(id.into())
    }

    pub fn not_found() -> Self {
        Self::NotFound
    }
}

impl From<TransitionRejection> for DomainError {
    fn from(value: TransitionRejection) -> Self {
        Self::InvalidTransition(value)
    }
}

/// Why a stage transition was refused.
///
/// Each variant is reported to callers as a distinct message, so the
/// "already complete" case stays distinguishable from a skipped stage.
#[derive(Debug, Error, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "reason", rename_all = "snake_case")]
pub enum TransitionRejection {
    /// The requested stage is not the one directly after the current stage.
    #[error("must move sequentially from \"{current}\" to \"{expected}\" (requested \"{requested}\")")]
    NonAdjacent {
        current: String,
        requested: String,
        expected: String,
    },

    /// The lifecycle already reached its terminal stage.
    #[error("product has completed the supply chain at \"{terminal}\"; no more stages can be added")]
    AlreadyTerminal { terminal: String },

    /// The requested stage is not part of the configured catalog.
    #[error("unknown stage \"{requested}\"")]
    UnknownStage { requested: String },

    /// Anchoring was requested before the lifecycle reached its terminal stage.
    #[error("product is at \"{current}\"; anchoring requires \"{terminal}\"")]
    NotTerminal { current: String, terminal: String },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn transition_rejections_render_distinct_messages() {
        let non_adjacent = DomainError::from(TransitionRejection::NonAdjacent {
            current: "Created".to_string(),
            requested: "Packaging".to_string(),
            expected: "Manufacturing".to_string(),
        });
        let terminal = DomainError::from(TransitionRejection::AlreadyTerminal {
            terminal: "Complete".to_string(),
        });

        assert!(non_adjacent.to_string().contains("sequentially"));
        assert!(terminal.to_string().contains("completed the supply chain"));
        assert_ne!(non_adjacent, terminal);
    }

    #[test]
    fn transition_rejection_serializes_with_reason_tag() {
        let json = serde_json::to_value(TransitionRejection::AlreadyTerminal {
            terminal: "Complete".to_string(),
        })
        .unwrap();

        assert_eq!(json["reason"], "already_terminal");
        assert_eq!(json["terminal"], "Complete");
    }
}
