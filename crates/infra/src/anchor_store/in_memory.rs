use std::collections::HashMap;
use std::collections::hash_map::Entry;
use std::sync::RwLock;

use pharmasafe_core::ProductId;
use pharmasafe_integrity::Fingerprint;

use super::r#trait::{AnchorStore, AnchorStoreError};

/// In-memory anchor ledger.
///
/// Intended for tests/dev. Entries are never removed or overwritten.
#[derive(Debug, Default)]
pub struct InMemoryAnchorStore {
    anchors: RwLock<HashMap<ProductId, Fingerprint>>,
}

impl InMemoryAnchorStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.anchors.read().map(|a| a.len()).unwrap_or(0)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl AnchorStore for InMemoryAnchorStore {
    fn get_fingerprint(
        &self,
        product_id: &ProductId,
    ) -> Result<Option<Fingerprint>, AnchorStoreError> {
        let anchors = self
            .anchors
            .read()
            .map_err(|_| AnchorStoreError::Unavailable("lock poisoned".to_string()))?;
        Ok(anchors.get(product_id).copied())
    }

    fn commit_fingerprint(
        &self,
        product_id: &ProductId,
        fingerprint: Fingerprint,
    ) -> Result<(), AnchorStoreError> {
        let mut anchors = self
            .anchors
            .write()
            .map_err(|_| AnchorStoreError::Unavailable("lock poisoned".to_string()))?;

        match anchors.entry(product_id.clone()) {
            Entry::Occupied(_) => Err(AnchorStoreError::AlreadyAnchored(product_id.clone())),
            Entry::Vacant(slot) => {
                slot.insert(fingerprint);
                Ok(())
            }
        }
    }
}
