use std::sync::Arc;

use thiserror::Error;

use pharmasafe_core::ProductId;
use pharmasafe_integrity::Fingerprint;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum AnchorStoreError {
    /// A fingerprint is already committed for this product. Never retried.
    #[error("product {0} already has an anchored fingerprint")]
    AlreadyAnchored(ProductId),

    /// Ledger unreachable. Retryable.
    #[error("anchor store unavailable: {0}")]
    Unavailable(String),
}

/// Append-only, tamper-evident ledger with a `get` / `set-once` contract.
///
/// Write-once is enforced here, not by callers: a second commit for the same
/// product must fail with `AlreadyAnchored` even under concurrent callers.
pub trait AnchorStore: Send + Sync {
    fn get_fingerprint(
        &self,
        product_id: &ProductId,
    ) -> Result<Option<Fingerprint>, AnchorStoreError>;

    fn commit_fingerprint(
        &self,
        product_id: &ProductId,
        fingerprint: Fingerprint,
    ) -> Result<(), AnchorStoreError>;
}

impl<S> AnchorStore for Arc<S>
where
    S: AnchorStore + ?Sized,
{
    fn get_fingerprint(
        &self,
        product_id: &ProductId,
    ) -> Result<Option<Fingerprint>, AnchorStoreError> {
        (**self).get_fingerprint(product_id)
    }

    fn commit_fingerprint(
        &self,
        product_id: &ProductId,
        fingerprint: Fingerprint,
    ) -> Result<(), AnchorStoreError> {
        (**self).commit_fingerprint(product_id, fingerprint)
    }
}
