use std::sync::Arc;

use thiserror::Error;

use pharmasafe_core::ProductId;
use pharmasafe_products::{Product, StageRecord};

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum RecordStoreError {
    #[error("product {0} already exists")]
    DuplicateId(ProductId),

    #[error("product {0} not found")]
    NotFound(ProductId),

    /// Backend unreachable or internally inconsistent. Retryable.
    #[error("record store unavailable: {0}")]
    Unavailable(String),
}

/// Mutable, queryable store of product metadata and stage logs.
///
/// Implementations must return `list_stages` in insertion order: the
/// fingerprint depends on it.
pub trait RecordStore: Send + Sync {
    fn get_product(&self, product_id: &ProductId) -> Result<Option<Product>, RecordStoreError>;

    /// Fails with `DuplicateId` if the id is taken.
    fn insert_product(&self, product: Product) -> Result<(), RecordStoreError>;

    /// Fails with `NotFound` if the product does not exist.
    fn append_stage(&self, record: StageRecord) -> Result<(), RecordStoreError>;

    fn list_stages(&self, product_id: &ProductId) -> Result<Vec<StageRecord>, RecordStoreError>;

    fn update_latest_stage(
        &self,
        product_id: &ProductId,
        stage_name: &str,
    ) -> Result<(), RecordStoreError>;

    /// All products, newest manufacturing date first.
    fn list_products(&self) -> Result<Vec<Product>, RecordStoreError>;
}

impl<S> RecordStore for Arc<S>
where
    S: RecordStore + ?Sized,
{
    fn get_product(&self, product_id: &ProductId) -> Result<Option<Product>, RecordStoreError> {
        (**self).get_product(product_id)
    }

    fn insert_product(&self, product: Product) -> Result<(), RecordStoreError> {
        (**self).insert_product(product)
    }

    fn append_stage(&self, record: StageRecord) -> Result<(), RecordStoreError> {
        (**self).append_stage(record)
    }

    fn list_stages(&self, product_id: &ProductId) -> Result<Vec<StageRecord>, RecordStoreError> {
        (**self).list_stages(product_id)
    }

    fn update_latest_stage(
        &self,
        product_id: &ProductId,
        stage_name: &str,
    ) -> Result<(), RecordStoreError> {
        (**self).update_latest_stage(product_id, stage_name)
    }

    fn list_products(&self) -> Result<Vec<Product>, RecordStoreError> {
        (**self).list_products()
    }
}
