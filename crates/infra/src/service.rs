//! Application service for the custody-chain anchoring protocol.
//!
//! ## Write flow (append stage)
//!
//! ```text
//! request (actor, product, stage)
//!   ↓
//! 1. Authorize: actor must be a writer (read snapshot of the registry)
//!   ↓
//! 2. Lock the product (keyed lock table)
//!   ↓
//! 3. Load product + stage log, rehydrate the lifecycle aggregate
//!   ↓
//! 4. Decide: lifecycle.handle(RecordStage) → StageRecorded
//!   ↓
//! 5. Persist: append stage row, update latest stage
//!   ↓
//! 6. Terminal stage? fingerprint the stored record and commit it once
//! ```
//!
//! Verification is read-only: recompute the fingerprint over current store
//! contents and compare it with the anchored one.

use std::fmt;
use std::sync::{Arc, PoisonError, RwLock, RwLockReadGuard};

use chrono::{DateTime, Utc};
use serde::Serialize;
use thiserror::Error;

use pharmasafe_auth::{
    AuthorizationExplanation, AuthorizationRegistry, AuthzError, Privilege, RegistryError,
    authorize, explain_authorization,
};
use pharmasafe_core::{Aggregate, DomainError, Identity, ProductId, TransitionRejection};
use pharmasafe_integrity::{EncodingError, Fingerprint, fingerprint_record};
use pharmasafe_products::{
    CreateProduct, INITIAL_STAGE, LifecycleCommand, LifecycleEvent, Product, ProductLifecycle,
    RecordStage, StageCatalog, StageRecord, ValidityPeriod,
};

use crate::anchor_store::{AnchorStore, AnchorStoreError};
use crate::locks::ProductLocks;
use crate::record_store::{RecordStore, RecordStoreError};

/// Every failure a caller of the service can observe.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ServiceError {
    #[error("unauthorized")]
    Unauthorized,

    #[error("invalid transition: {0}")]
    InvalidTransition(TransitionRejection),

    #[error("not found: {0}")]
    NotFound(String),

    #[error("duplicate id: {0}")]
    DuplicateId(String),

    #[error("{0} is already a writer")]
    AlreadyAuthorized(Identity),

    #[error("product {0} already has an anchored fingerprint")]
    AlreadyAnchored(ProductId),

    #[error("invalid identity: {0}")]
    InvalidIdentity(String),

    #[error("invalid input: {0}")]
    InvalidInput(String),

    /// An external store was unavailable. The only retryable class.
    #[error("temporarily unavailable: {0}")]
    TransientFailure(String),

    #[error("the root authority cannot be removed")]
    CannotRemoveRootAuthority,

    #[error("{0} is not a writer")]
    NotAuthorized(Identity),

    #[error("not yet verifiable: {0}")]
    NotYetVerifiable(NotVerifiableReason),
}

impl ServiceError {
    pub fn is_retryable(&self) -> bool {
        matches!(self, ServiceError::TransientFailure(_))
    }

    /// Stable machine-readable code.
    pub fn code(&self) -> &'static str {
        match self {
            ServiceError::Unauthorized => "unauthorized",
            ServiceError::InvalidTransition(_) => "invalid_transition",
            ServiceError::NotFound(_) => "not_found",
            ServiceError::DuplicateId(_) => "duplicate_id",
            ServiceError::AlreadyAuthorized(_) => "already_authorized",
            ServiceError::AlreadyAnchored(_) => "already_anchored",
            ServiceError::InvalidIdentity(_) => "invalid_identity",
            ServiceError::InvalidInput(_) => "invalid_input",
            ServiceError::TransientFailure(_) => "transient_failure",
            ServiceError::CannotRemoveRootAuthority => "cannot_remove_root_authority",
            ServiceError::NotAuthorized(_) => "not_authorized",
            ServiceError::NotYetVerifiable(_) => "not_yet_verifiable",
        }
    }
}

/// Why a product cannot be verified yet.
#[derive(Debug, Error, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "reason", rename_all = "snake_case")]
pub enum NotVerifiableReason {
    #[error("product is at \"{current}\"; verification requires \"{terminal}\"")]
    Incomplete { current: String, terminal: String },

    /// Terminal stage reached but the fingerprint commit never succeeded.
    #[error("product is complete but its fingerprint has not been anchored")]
    NotAnchored,
}

impl From<DomainError> for ServiceError {
    fn from(value: DomainError) -> Self {
        match value {
            DomainError::InvalidInput(msg) => ServiceError::InvalidInput(msg),
            DomainError::InvalidIdentity(msg) => ServiceError::InvalidIdentity(msg),
            DomainError::InvalidTransition(rejection) => ServiceError::InvalidTransition(rejection),
            DomainError::NotFound => ServiceError::NotFound("not found".to_string()),
            DomainError::DuplicateId(id) => ServiceError::DuplicateId(id),
            DomainError::Unauthorized => ServiceError::Unauthorized,
        }
    }
}

impl From<RegistryError> for ServiceError {
    fn from(value: RegistryError) -> Self {
        match value {
            RegistryError::Unauthorized => ServiceError::Unauthorized,
            RegistryError::AlreadyAuthorized(id) => ServiceError::AlreadyAuthorized(id),
            RegistryError::InvalidIdentity(msg) => ServiceError::InvalidIdentity(msg),
            RegistryError::CannotRemoveRootAuthority => ServiceError::CannotRemoveRootAuthority,
            RegistryError::NotAuthorized(id) => ServiceError::NotAuthorized(id),
        }
    }
}

impl From<AuthzError> for ServiceError {
    fn from(_: AuthzError) -> Self {
        ServiceError::Unauthorized
    }
}

impl From<EncodingError> for ServiceError {
    fn from(value: EncodingError) -> Self {
        ServiceError::InvalidInput(value.to_string())
    }
}

impl From<RecordStoreError> for ServiceError {
    fn from(value: RecordStoreError) -> Self {
        match value {
            RecordStoreError::DuplicateId(id) => ServiceError::DuplicateId(id.to_string()),
            RecordStoreError::NotFound(id) => ServiceError::NotFound(format!("product {id}")),
            RecordStoreError::Unavailable(msg) => ServiceError::TransientFailure(msg),
        }
    }
}

impl From<AnchorStoreError> for ServiceError {
    fn from(value: AnchorStoreError) -> Self {
        match value {
            AnchorStoreError::AlreadyAnchored(id) => ServiceError::AlreadyAnchored(id),
            AnchorStoreError::Unavailable(msg) => ServiceError::TransientFailure(msg),
        }
    }
}

/// Request: create a product.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewProduct {
    pub product_id: String,
    pub product_type: String,
    pub batch_number: String,
}

/// Result of an append-stage request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct StageOutcome {
    pub product_id: ProductId,
    pub latest_stage: String,
    /// Row appended by this request; `None` when a terminal re-run only
    /// retried the fingerprint commit.
    pub recorded: Option<StageRecord>,
    pub completes_lifecycle: bool,
    pub fingerprint: Option<Fingerprint>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Verdict {
    Authentic,
    IntegrityMismatch,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct VerificationReport {
    pub product_id: ProductId,
    pub verdict: Verdict,
    pub anchored: Fingerprint,
    /// `None` when the stored record can no longer be encoded at all.
    pub recomputed: Option<Fingerprint>,
    /// Record contents, only released for an authentic record.
    pub product: Option<Product>,
    pub stages: Option<Vec<StageRecord>>,
}

impl VerificationReport {
    pub fn is_authentic(&self) -> bool {
        self.verdict == Verdict::Authentic
    }
}

/// Proof that a fingerprint was committed for a product.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AnchorReceipt {
    pub product_id: ProductId,
    pub fingerprint: Fingerprint,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ProductDetail {
    pub product: Product,
    pub stages: Vec<StageRecord>,
    pub next_stage: Option<String>,
    pub fingerprint: Option<Fingerprint>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct WriterStatus {
    pub identity: Identity,
    pub is_writer: bool,
    pub is_root_authority: bool,
}

type Clock = Box<dyn Fn() -> DateTime<Utc> + Send + Sync>;

/// Orchestrates authorization, the stage lifecycle, the record store and the
/// anchor store.
///
/// - `R`: record store implementation
/// - `A`: anchor store implementation
pub struct SupplyChainService<R, A> {
    records: R,
    anchors: A,
    registry: RwLock<AuthorizationRegistry>,
    catalog: Arc<StageCatalog>,
    validity: ValidityPeriod,
    locks: ProductLocks,
    clock: Clock,
}

impl<R: fmt::Debug, A: fmt::Debug> fmt::Debug for SupplyChainService<R, A> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SupplyChainService")
            .field("records", &self.records)
            .field("anchors", &self.anchors)
            .field("registry", &self.registry)
            .field("catalog", &self.catalog)
            .field("validity", &self.validity)
            .field("clock", &"<closure>")
            .finish()
    }
}

impl<R, A> SupplyChainService<R, A> {
    pub fn new(
        records: R,
        anchors: A,
        registry: AuthorizationRegistry,
        catalog: StageCatalog,
        validity: ValidityPeriod,
    ) -> Self {
        Self {
            records,
            anchors,
            registry: RwLock::new(registry),
            catalog: Arc::new(catalog),
            validity,
            locks: ProductLocks::new(),
            clock: Box::new(Utc::now),
        }
    }

    /// Replace the wall clock (tests).
    pub fn with_clock<F>(mut self, clock: F) -> Self
    where
        F: Fn() -> DateTime<Utc> + Send + Sync + 'static,
    {
        self.clock = Box::new(clock);
        self
    }

    pub fn catalog(&self) -> &StageCatalog {
        &self.catalog
    }

    pub fn validity(&self) -> ValidityPeriod {
        self.validity
    }

    pub fn records(&self) -> &R {
        &self.records
    }

    pub fn anchors(&self) -> &A {
        &self.anchors
    }

    // Registry mutations are check-then-push/remove, so a panicking writer
    // cannot leave a half-applied change behind.
    fn registry(&self) -> RwLockReadGuard<'_, AuthorizationRegistry> {
        self.registry.read().unwrap_or_else(PoisonError::into_inner)
    }

    pub fn is_writer(&self, identity: &Identity) -> bool {
        self.registry().is_writer(identity)
    }

    pub fn is_root_authority(&self, identity: &Identity) -> bool {
        self.registry().is_root_authority(identity)
    }

    pub fn root_authority(&self) -> Identity {
        self.registry().root_authority().clone()
    }

    /// Writers in insertion order, root first.
    pub fn list_writers(&self) -> Vec<Identity> {
        self.registry().list_writers().to_vec()
    }

    pub fn writer_status(&self, identity: &str) -> Result<WriterStatus, ServiceError> {
        let identity = Identity::parse(identity)?;
        let registry = self.registry();
        Ok(WriterStatus {
            is_writer: registry.is_writer(&identity),
            is_root_authority: registry.is_root_authority(&identity),
            identity,
        })
    }

    pub fn explain(&self, identity: &Identity, privilege: Privilege) -> AuthorizationExplanation {
        explain_authorization(&self.registry(), identity, privilege)
    }

    pub fn add_writer(
        &self,
        identity: &str,
        requested_by: &Identity,
    ) -> Result<Identity, ServiceError> {
        let mut registry = self.registry.write().unwrap_or_else(PoisonError::into_inner);
        registry.add_writer(identity, requested_by).map_err(|e| {
            tracing::warn!(actor = %requested_by, writer = identity, error = %e, "add writer refused");
            e.into()
        })
    }

    pub fn remove_writer(
        &self,
        identity: &str,
        requested_by: &Identity,
    ) -> Result<Identity, ServiceError> {
        let mut registry = self.registry.write().unwrap_or_else(PoisonError::into_inner);
        registry.remove_writer(identity, requested_by).map_err(|e| {
            tracing::warn!(actor = %requested_by, writer = identity, error = %e, "remove writer refused");
            e.into()
        })
    }

    fn authorize_writer(&self, actor: &Identity, action: &'static str) -> Result<(), ServiceError> {
        authorize(&self.registry(), actor, Privilege::WriteRecords).map_err(|e| {
            tracing::warn!(actor = %actor, action, "refused: caller is not a writer");
            e.into()
        })
    }
}

impl<R, A> SupplyChainService<R, A>
where
    R: RecordStore,
    A: AnchorStore,
{
    pub fn create_product(
        &self,
        actor: &Identity,
        request: NewProduct,
    ) -> Result<Product, ServiceError> {
        self.authorize_writer(actor, "create_product")?;

        let cmd = CreateProduct {
            product_id: ProductId::parse(&request.product_id)?,
            product_type: request.product_type,
            batch_number: request.batch_number,
            occurred_at: (self.clock)(),
        };
        let product = Product::create(&cmd, self.validity)?;

        self.records.insert_product(product.clone()).map_err(|e| {
            tracing::warn!(product_id = %product.product_id, actor = %actor, error = %e, "product not created");
            ServiceError::from(e)
        })?;

        tracing::info!(product_id = %product.product_id, actor = %actor, "product created");
        Ok(product)
    }

    /// Record the next stage for a product.
    ///
    /// Reaching the terminal stage also anchors the fingerprint. If that
    /// commit fails the error is returned even though the stage row is
    /// stored; re-sending the terminal stage then retries only the commit.
    pub fn append_stage(
        &self,
        actor: &Identity,
        product_id: &str,
        stage_name: &str,
    ) -> Result<StageOutcome, ServiceError> {
        self.authorize_writer(actor, "append_stage")?;
        let product_id = ProductId::parse(product_id)?;

        self.locks
            .with_lock(&product_id, || self.append_stage_locked(actor, &product_id, stage_name))
    }

    fn append_stage_locked(
        &self,
        actor: &Identity,
        product_id: &ProductId,
        stage_name: &str,
    ) -> Result<StageOutcome, ServiceError> {
        let (product, lifecycle) = self.load_lifecycle(product_id)?;
        let repaired = self.sync_latest_stage(&product, &lifecycle)?;

        if lifecycle.is_complete() && lifecycle.catalog().is_terminal(stage_name.trim()) {
            return self.retry_terminal_anchor(actor, product_id, &lifecycle);
        }

        // The row from a partially failed request is already stored; the
        // re-sent request only had to repair latest_stage.
        if repaired && lifecycle.current_stage() == stage_name.trim() {
            tracing::info!(product_id = %product_id, stage = stage_name, actor = %actor, "latest stage repaired");
            return Ok(StageOutcome {
                product_id: product_id.clone(),
                latest_stage: lifecycle.current_stage().to_string(),
                recorded: None,
                completes_lifecycle: false,
                fingerprint: None,
            });
        }

        let command = LifecycleCommand::RecordStage(RecordStage {
            product_id: product_id.clone(),
            stage_name: stage_name.to_string(),
            authenticator: actor.clone(),
            occurred_at: (self.clock)(),
        });
        let events = lifecycle.handle(&command).map_err(|e| {
            tracing::warn!(product_id = %product_id, stage = stage_name, actor = %actor, error = %e, "stage refused");
            ServiceError::from(e)
        })?;
        let Some(LifecycleEvent::StageRecorded(recorded)) = events.into_iter().next() else {
            return Err(ServiceError::InvalidInput("no stage was decided".to_string()));
        };

        let record = recorded.to_record();
        self.records.append_stage(record.clone())?;
        self.records.update_latest_stage(product_id, &record.stage_name)?;
        tracing::info!(product_id = %product_id, stage = %record.stage_name, actor = %actor, "stage recorded");

        let fingerprint = if recorded.completes_lifecycle {
            let anchored = self.commit_anchor(product_id).map_err(|e| {
                tracing::error!(
                    product_id = %product_id,
                    stage = %record.stage_name,
                    actor = %actor,
                    error = %e,
                    "terminal stage recorded but anchoring failed"
                );
                match e {
                    ServiceError::TransientFailure(msg) => ServiceError::TransientFailure(format!(
                        "stage recorded but anchoring failed: {msg}"
                    )),
                    other => other,
                }
            })?;
            Some(anchored)
        } else {
            None
        };

        Ok(StageOutcome {
            product_id: product_id.clone(),
            latest_stage: record.stage_name.clone(),
            completes_lifecycle: recorded.completes_lifecycle,
            recorded: Some(record),
            fingerprint,
        })
    }

    fn retry_terminal_anchor(
        &self,
        actor: &Identity,
        product_id: &ProductId,
        lifecycle: &ProductLifecycle,
    ) -> Result<StageOutcome, ServiceError> {
        let terminal = lifecycle.catalog().terminal().to_string();

        if self.anchors.get_fingerprint(product_id)?.is_some() {
            tracing::warn!(product_id = %product_id, stage = %terminal, actor = %actor, "stage refused: already terminal");
            return Err(ServiceError::InvalidTransition(
                TransitionRejection::AlreadyTerminal { terminal },
            ));
        }

        let fingerprint = self.commit_anchor(product_id)?;
        tracing::info!(product_id = %product_id, stage = %terminal, actor = %actor, "anchoring retried");

        Ok(StageOutcome {
            product_id: product_id.clone(),
            latest_stage: terminal,
            recorded: None,
            completes_lifecycle: true,
            fingerprint: Some(fingerprint),
        })
    }

    /// Anchor the fingerprint of a completed product that is not anchored yet.
    pub fn anchor_product(
        &self,
        actor: &Identity,
        product_id: &str,
    ) -> Result<AnchorReceipt, ServiceError> {
        self.authorize_writer(actor, "anchor_product")?;
        let product_id = ProductId::parse(product_id)?;

        self.locks.with_lock(&product_id, || {
            let (product, lifecycle) = self.load_lifecycle(&product_id)?;
            self.sync_latest_stage(&product, &lifecycle)?;
            lifecycle.ensure_complete().map_err(|e| {
                tracing::warn!(product_id = %product_id, actor = %actor, error = %e, "anchor refused");
                ServiceError::from(e)
            })?;
            let fingerprint = self.commit_anchor(&product_id)?;
            Ok(AnchorReceipt {
                product_id: product_id.clone(),
                fingerprint,
            })
        })
    }

    fn commit_anchor(&self, product_id: &ProductId) -> Result<Fingerprint, ServiceError> {
        let product = self.get_product(product_id)?;
        let stages = self.records.list_stages(product_id)?;
        let fingerprint = fingerprint_record(&product, &stages)?;

        self.anchors.commit_fingerprint(product_id, fingerprint)?;
        tracing::info!(product_id = %product_id, fingerprint = %fingerprint, "fingerprint anchored");
        Ok(fingerprint)
    }

    /// Recompute the fingerprint from current store contents and compare it
    /// with the anchored one.
    pub fn verify_product(&self, product_id: &str) -> Result<VerificationReport, ServiceError> {
        let product_id = ProductId::parse(product_id)?;

        // The anchor is committed only after the terminal row is stored and
        // nothing is appended after it, so reading the anchor first means the
        // rows read next are the ones it covers.
        let anchored = self.anchors.get_fingerprint(&product_id)?;
        let product = self.get_product(&product_id)?;
        let stages = self.records.list_stages(&product_id)?;

        let Some(anchored) = anchored else {
            let current = stages
                .last()
                .map(|s| s.stage_name.as_str())
                .unwrap_or(INITIAL_STAGE);
            let reason = if self.catalog.is_terminal(current) {
                NotVerifiableReason::NotAnchored
            } else {
                NotVerifiableReason::Incomplete {
                    current: current.to_string(),
                    terminal: self.catalog.terminal().to_string(),
                }
            };
            return Err(ServiceError::NotYetVerifiable(reason));
        };

        // A record that no longer encodes cannot match anything.
        let recomputed = fingerprint_record(&product, &stages).ok();
        let authentic = recomputed.is_some_and(|r| Fingerprint::verify(&anchored, &r));

        let report = if authentic {
            tracing::info!(product_id = %product_id, "product verified authentic");
            VerificationReport {
                product_id,
                verdict: Verdict::Authentic,
                anchored,
                recomputed,
                product: Some(product),
                stages: Some(stages),
            }
        } else {
            tracing::warn!(product_id = %product_id, anchored = %anchored, "integrity mismatch");
            VerificationReport {
                product_id,
                verdict: Verdict::IntegrityMismatch,
                anchored,
                recomputed,
                product: None,
                stages: None,
            }
        };
        Ok(report)
    }

    /// Newest manufacturing date first.
    pub fn list_products(&self) -> Result<Vec<Product>, ServiceError> {
        Ok(self.records.list_products()?)
    }

    pub fn get_product_detail(&self, product_id: &str) -> Result<ProductDetail, ServiceError> {
        let product_id = ProductId::parse(product_id)?;
        let product = self.get_product(&product_id)?;
        let stages = self.records.list_stages(&product_id)?;
        let fingerprint = self.anchors.get_fingerprint(&product_id)?;

        // A stage log that no longer fits the catalog has no defined next stage.
        let next_stage = ProductLifecycle::from_history(product_id, self.catalog.clone(), &stages)
            .ok()
            .and_then(|l| l.next_stage().map(str::to_string));

        Ok(ProductDetail {
            product,
            stages,
            next_stage,
            fingerprint,
        })
    }

    fn get_product(&self, product_id: &ProductId) -> Result<Product, ServiceError> {
        self.records
            .get_product(product_id)?
            .ok_or_else(|| ServiceError::NotFound(format!("product {product_id}")))
    }

    /// Rehydrate the lifecycle from the stored stage log.
    fn load_lifecycle(
        &self,
        product_id: &ProductId,
    ) -> Result<(Product, ProductLifecycle), ServiceError> {
        // Existence check first so a missing product reports NotFound.
        let product = self.get_product(product_id)?;
        let stages = self.records.list_stages(product_id)?;
        let lifecycle =
            ProductLifecycle::from_history(product_id.clone(), self.catalog.clone(), &stages)?;
        Ok((product, lifecycle))
    }

    /// Point `latest_stage` back at the last stored row when an earlier
    /// request appended the row but failed to update the product.
    ///
    /// Returns whether a repair was needed. Must run under the product lock.
    fn sync_latest_stage(
        &self,
        product: &Product,
        lifecycle: &ProductLifecycle,
    ) -> Result<bool, ServiceError> {
        let current = lifecycle.current_stage();
        if product.latest_stage == current {
            return Ok(false);
        }

        tracing::warn!(
            product_id = %product.product_id,
            stored = %product.latest_stage,
            last_row = current,
            "latest stage out of step with stage log; repairing"
        );
        self.records.update_latest_stage(&product.product_id, current)?;
        Ok(true)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn only_transient_failures_are_retryable() {
        let pid = ProductId::parse("p1").unwrap();
        let errors = [
            ServiceError::Unauthorized,
            ServiceError::AlreadyAnchored(pid.clone()),
            ServiceError::NotYetVerifiable(NotVerifiableReason::NotAnchored),
            ServiceError::from(RecordStoreError::DuplicateId(pid.clone())),
            ServiceError::from(AnchorStoreError::AlreadyAnchored(pid)),
        ];
        for err in errors {
            assert!(!err.is_retryable(), "{err:?}");
        }

        assert!(ServiceError::from(RecordStoreError::Unavailable("down".into())).is_retryable());
        assert!(ServiceError::from(AnchorStoreError::Unavailable("down".into())).is_retryable());
    }

    #[test]
    fn registry_errors_keep_their_meaning() {
        let id = Identity::parse("0xabc").unwrap();
        assert_eq!(
            ServiceError::from(RegistryError::AlreadyAuthorized(id.clone())),
            ServiceError::AlreadyAuthorized(id.clone())
        );
        assert_eq!(
            ServiceError::from(RegistryError::NotAuthorized(id.clone())),
            ServiceError::NotAuthorized(id)
        );
        assert_eq!(
            ServiceError::from(RegistryError::CannotRemoveRootAuthority).code(),
            "cannot_remove_root_authority"
        );
    }

    #[test]
    fn encoding_failures_surface_as_invalid_input() {
        let err = ServiceError::from(EncodingError::EmptyField { field: "product_type" });
        assert!(matches!(err, ServiceError::InvalidInput(_)));
    }

    #[test]
    fn transition_rejections_pass_through() {
        let rejection = TransitionRejection::AlreadyTerminal {
            terminal: "Complete".to_string(),
        };
        assert_eq!(
            ServiceError::from(DomainError::from(rejection.clone())),
            ServiceError::InvalidTransition(rejection)
        );
    }

    #[test]
    fn not_verifiable_reason_serializes_with_tag() {
        let json = serde_json::to_value(NotVerifiableReason::Incomplete {
            current: "Storage".to_string(),
            terminal: "Complete".to_string(),
        })
        .unwrap();
        assert_eq!(json["reason"], "incomplete");
        assert_eq!(json["terminal"], "Complete");
    }
}
