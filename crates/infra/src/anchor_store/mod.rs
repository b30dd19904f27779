//! Write-once anchor ledger boundary (`productId -> fingerprint`).

pub mod in_memory;
pub mod r#trait;

pub use in_memory::InMemoryAnchorStore;
pub use r#trait::{AnchorStore, AnchorStoreError};
