//! Products domain module.
//!
//! This crate contains the product record, its append-only stage log and the
//! stage lifecycle state machine, implemented purely as deterministic domain
//! logic (no IO, no HTTP, no storage).

pub mod lifecycle;
pub mod product;

pub use lifecycle::{
    LifecycleCommand, LifecycleEvent, ProductLifecycle, RecordStage, StageCatalog, StagePosition,
    StageRecorded,
};
pub use product::{CreateProduct, INITIAL_STAGE, Product, StageRecord, ValidityPeriod, truncate_to_micros};
