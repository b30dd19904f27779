//! Canonical record encoding.
//!
//! Layout, in this exact order:
//!
//! ```text
//! "pharmasafe.record.v1"
//! len:u32be product_id
//! len:u32be product_type
//! len:u32be batch_number
//! len:u32be manufacturing_date   (RFC 3339, microseconds, "Z")
//! len:u32be expiry_date          (RFC 3339, microseconds, "Z")
//! len:u32be stages               (compact JSON: [{"stage_name":..,"timestamp":..},..])
//! ```
//!
//! Field order is hard-coded here and in `CanonicalStage`'s declaration; no
//! map iteration is involved anywhere.

use chrono::{DateTime, SecondsFormat, Utc};
use serde::Serialize;
use thiserror::Error;

use pharmasafe_core::ProductId;
use pharmasafe_products::{Product, StageRecord};

/// Domain-separation tag written before any field.
pub const RECORD_DOMAIN: &str = "pharmasafe.record.v1";

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum EncodingError {
    #[error("{field} cannot be empty")]
    EmptyField { field: &'static str },

    #[error("{field} exceeds the maximum encodable length")]
    FieldTooLong { field: &'static str },

    #[error("stage {index} belongs to product {found}, not {expected}")]
    ForeignStage {
        index: usize,
        expected: ProductId,
        found: ProductId,
    },

    #[error("stage serialization failed: {0}")]
    Serialization(String),
}

/// Canonical bytes of one product record.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CanonicalRecord(Vec<u8>);

impl CanonicalRecord {
    pub fn as_bytes(&self) -> &[u8] {
        &self.0
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

#[derive(Serialize)]
struct CanonicalStage<'a> {
    stage_name: &'a str,
    timestamp: String,
}

/// ISO-8601 UTC rendering used for every timestamp in the encoding.
pub fn iso8601(ts: DateTime<Utc>) -> String {
    ts.to_rfc3339_opts(SecondsFormat::Micros, true)
}

/// Encode a product and its ordered stage log.
///
/// `stages` must be in insertion order; the encoder never reorders them.
pub fn encode_record(
    product: &Product,
    stages: &[StageRecord],
) -> Result<CanonicalRecord, EncodingError> {
    require_non_empty("product_type", &product.product_type)?;
    require_non_empty("batch_number", &product.batch_number)?;

    for (index, stage) in stages.iter().enumerate() {
        if stage.product_id != product.product_id {
            return Err(EncodingError::ForeignStage {
                index,
                expected: product.product_id.clone(),
                found: stage.product_id.clone(),
            });
        }
    }

    let stage_list: Vec<CanonicalStage<'_>> = stages
        .iter()
        .map(|s| CanonicalStage {
            stage_name: &s.stage_name,
            timestamp: iso8601(s.timestamp),
        })
        .collect();
    let stages_json = serde_json::to_string(&stage_list)
        .map_err(|e| EncodingError::Serialization(e.to_string()))?;

    let mut buf = Vec::with_capacity(RECORD_DOMAIN.len() + 256 + stages_json.len());
    buf.extend_from_slice(RECORD_DOMAIN.as_bytes());
    write_field(&mut buf, "product_id", product.product_id.as_str())?;
    write_field(&mut buf, "product_type", &product.product_type)?;
    write_field(&mut buf, "batch_number", &product.batch_number)?;
    write_field(&mut buf, "manufacturing_date", &iso8601(product.manufacturing_date))?;
    write_field(&mut buf, "expiry_date", &iso8601(product.expiry_date))?;
    write_field(&mut buf, "stages", &stages_json)?;

    Ok(CanonicalRecord(buf))
}

fn require_non_empty(field: &'static str, value: &str) -> Result<(), EncodingError> {
    if value.is_empty() {
        Err(EncodingError::EmptyField { field })
    } else {
        Ok(())
    }
}

fn write_field(buf: &mut Vec<u8>, field: &'static str, value: &str) -> Result<(), EncodingError> {
    let len = u32::try_from(value.len()).map_err(|_| EncodingError::FieldTooLong { field })?;
    buf.extend_from_slice(&len.to_be_bytes());
    buf.extend_from_slice(value.as_bytes());
    Ok(())
}
