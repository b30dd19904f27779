//! Off-chain record store boundary.
//!
//! Holds product metadata and each product's append-only stage log. The store
//! itself enforces only id uniqueness and existence; stage sequencing is the
//! lifecycle aggregate's job.

pub mod in_memory;
pub mod r#trait;

pub use in_memory::InMemoryRecordStore;
pub use r#trait::{RecordStore, RecordStoreError};
