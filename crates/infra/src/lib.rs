//! Infrastructure layer: record/anchor store adapters, per-product locking,
//! configuration and the service that orchestrates the anchoring protocol.

pub mod anchor_store;
pub mod config;
pub mod locks;
pub mod record_store;
pub mod service;


pub use anchor_store::{AnchorStore, AnchorStoreError, InMemoryAnchorStore};
pub use config::{AppConfig, ConfigError};
pub use locks::ProductLocks;
pub use record_store::{InMemoryRecordStore, RecordStore, RecordStoreError};
pub use service::{
    AnchorReceipt, NewProduct, NotVerifiableReason, ProductDetail, ServiceError, StageOutcome,
    SupplyChainService, Verdict, VerificationReport, WriterStatus,
};
