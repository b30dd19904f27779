use std::collections::HashMap;
use std::sync::{RwLock, RwLockReadGuard, RwLockWriteGuard};

use pharmasafe_core::ProductId;
use pharmasafe_products::{Product, StageRecord};

use super::r#trait::{RecordStore, RecordStoreError};

#[derive(Debug, Default)]
struct Records {
    products: HashMap<ProductId, Product>,
    stages: HashMap<ProductId, Vec<StageRecord>>,
}

/// In-memory record store.
///
/// Intended for tests/dev. Nothing survives a restart.
#[derive(Debug, Default)]
pub struct InMemoryRecordStore {
    inner: RwLock<Records>,
}

impl InMemoryRecordStore {
    pub fn new() -> Self {
        Self::default()
    }

    fn read(&self) -> Result<RwLockReadGuard<'_, Records>, RecordStoreError> {
        self.inner
            .read()
            .map_err(|_| RecordStoreError::Unavailable("lock poisoned".to_string()))
    }

    fn write(&self) -> Result<RwLockWriteGuard<'_, Records>, RecordStoreError> {
        self.inner
            .write()
            .map_err(|_| RecordStoreError::Unavailable("lock poisoned".to_string()))
    }

    /// Edit stored rows in place, bypassing every protocol check.
    ///
    /// Simulates an operator with direct database access.
    #[cfg(test)]
    pub(crate) fn tamper(
        &self,
        product_id: &ProductId,
        edit: impl FnOnce(&mut Product, &mut Vec<StageRecord>),
    ) {
        let mut records = self.inner.write().unwrap();
        let Records { products, stages } = &mut *records;
        let product = products.get_mut(product_id).unwrap();
        edit(product, stages.entry(product_id.clone()).or_default());
    }
}

impl RecordStore for InMemoryRecordStore {
    fn get_product(&self, product_id: &ProductId) -> Result<Option<Product>, RecordStoreError> {
        Ok(self.read()?.products.get(product_id).cloned())
    }

    fn insert_product(&self, product: Product) -> Result<(), RecordStoreError> {
        let mut records = self.write()?;
        if records.products.contains_key(&product.product_id) {
            return Err(RecordStoreError::DuplicateId(product.product_id));
        }
        records.stages.insert(product.product_id.clone(), Vec::new());
        records.products.insert(product.product_id.clone(), product);
        Ok(())
    }

    fn append_stage(&self, record: StageRecord) -> Result<(), RecordStoreError> {
        let mut records = self.write()?;
        if !records.products.contains_key(&record.product_id) {
            return Err(RecordStoreError::NotFound(record.product_id));
        }
        records
            .stages
            .entry(record.product_id.clone())
            .or_default()
            .push(record);
        Ok(())
    }

    fn list_stages(&self, product_id: &ProductId) -> Result<Vec<StageRecord>, RecordStoreError> {
        Ok(self.read()?.stages.get(product_id).cloned().unwrap_or_default())
    }

    fn update_latest_stage(
        &self,
        product_id: &ProductId,
        stage_name: &str,
    ) -> Result<(), RecordStoreError> {
        let mut records = self.write()?;
        let product = records
            .products
            .get_mut(product_id)
            .ok_or_else(|| RecordStoreError::NotFound(product_id.clone()))?;
        product.latest_stage = stage_name.to_string();
        Ok(())
    }

    fn list_products(&self) -> Result<Vec<Product>, RecordStoreError> {
        let mut products: Vec<Product> = self.read()?.products.values().cloned().collect();
        products.sort_by(|a, b| {
            b.manufacturing_date
                .cmp(&a.manufacturing_date)
                .then_with(|| a.product_id.cmp(&b.product_id))
        });
        Ok(products)
    }
}
