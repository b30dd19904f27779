use chrono::{DateTime, Months, SubsecRound, Utc};
use serde::{Deserialize, Serialize};

use pharmasafe_core::{DomainError, DomainResult, Identity, ProductId};

/// `latest_stage` of a product that has no stage records yet.
pub const INITIAL_STAGE: &str = "Created";

/// Truncate a timestamp to microsecond precision.
///
/// Every stored timestamp goes through this so that its ISO-8601 rendering is
/// lossless and the canonical encoding never depends on storage precision.
pub fn truncate_to_micros(ts: DateTime<Utc>) -> DateTime<Utc> {
    ts.trunc_subsecs(6)
}

/// Fixed shelf life applied to every product at creation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ValidityPeriod {
    months: u32,
}

impl ValidityPeriod {
    pub fn months(months: u32) -> DomainResult<Self> {
        if months == 0 {
            return Err(DomainError::invalid_input("validity period must be at least one month"));
        }
        Ok(Self { months })
    }

    pub fn as_months(&self) -> u32 {
        self.months
    }

    pub fn expiry_for(&self, manufactured: DateTime<Utc>) -> DomainResult<DateTime<Utc>> {
        manufactured
            .checked_add_months(Months::new(self.months))
            .ok_or_else(|| DomainError::invalid_input("expiry date out of range"))
    }
}

impl Default for ValidityPeriod {
    fn default() -> Self {
        Self { months: 24 }
    }
}

/// Product metadata as held by the record store.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Product {
    pub product_id: ProductId,
    pub product_type: String,
    pub batch_number: String,
    pub manufacturing_date: DateTime<Utc>,
    pub expiry_date: DateTime<Utc>,
    pub latest_stage: String,
}

/// One row of a product's append-only custody log.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StageRecord {
    pub product_id: ProductId,
    pub stage_name: String,
    pub authenticator: Identity,
    pub timestamp: DateTime<Utc>,
}

/// Command: CreateProduct.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CreateProduct {
    pub product_id: ProductId,
    pub product_type: String,
    pub batch_number: String,
    pub occurred_at: DateTime<Utc>,
}

impl Product {
    /// Build a new product record from a create command.
    ///
    /// The manufacturing date is the command time; the expiry date is derived
    /// from it using `validity`.
    pub fn create(cmd: &CreateProduct, validity: ValidityPeriod) -> DomainResult<Self> {
        let product_type = cmd.product_type.trim();
        if product_type.is_empty() {
            return Err(DomainError::invalid_input("product type cannot be empty"));
        }

        let batch_number = cmd.batch_number.trim();
        if batch_number.is_empty() {
            return Err(DomainError::invalid_input("batch number cannot be empty"));
        }

        let manufacturing_date = truncate_to_micros(cmd.occurred_at);
        let expiry_date = validity.expiry_for(manufacturing_date)?;

        Ok(Self {
            product_id: cmd.product_id.clone(),
            product_type: product_type.to_string(),
            batch_number: batch_number.to_string(),
            manufacturing_date,
            expiry_date,
            latest_stage: INITIAL_STAGE.to_string(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn cmd(product_type: &str, batch: &str) -> CreateProduct {
        CreateProduct {
            product_id: ProductId::parse("p1").unwrap(),
            product_type: product_type.to_string(),
            batch_number: batch.to_string(),
            occurred_at: Utc.with_ymd_and_hms(2024, 2, 29, 10, 30, 0).unwrap(),
        }
    }

    #[test]
    fn create_sets_expiry_from_validity_period() {
        let product = Product::create(&cmd("Paracetamol", "B-01"), ValidityPeriod::default()).unwrap();

        assert_eq!(product.product_id.as_str(), "P1");
        assert_eq!(product.latest_stage, INITIAL_STAGE);
        // Leap day plus two years clamps to the end of February.
        assert_eq!(
            product.expiry_date,
            Utc.with_ymd_and_hms(2026, 2, 28, 10, 30, 0).unwrap()
        );
    }

    #[test]
    fn create_trims_metadata() {
        let product = Product::create(&cmd("  Ibuprofen ", " B-2 "), ValidityPeriod::default()).unwrap();
        assert_eq!(product.product_type, "Ibuprofen");
        assert_eq!(product.batch_number, "B-2");
    }

    #[test]
    fn create_rejects_blank_fields() {
        for (t, b) in [("", "B"), ("T", "  ")] {
            let err = Product::create(&cmd(t, b), ValidityPeriod::default()).unwrap_err();
            assert!(matches!(err, DomainError::InvalidInput(_)));
        }
    }

    #[test]
    fn zero_month_validity_is_rejected() {
        assert!(ValidityPeriod::months(0).is_err());
        assert_eq!(ValidityPeriod::months(6).unwrap().as_months(), 6);
    }

    #[test]
    fn timestamps_are_truncated_to_micros() {
        let ts = Utc.timestamp_opt(1_700_000_000, 123_456_789).unwrap();
        assert_eq!(truncate_to_micros(ts).timestamp_subsec_nanos(), 123_456_000);
    }
}
