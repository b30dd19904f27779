use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use thiserror::Error;

use pharmasafe_products::{Product, StageRecord};

use crate::canonical::{EncodingError, encode_record};

/// SHA-256 digest of a canonical record.
///
/// Rendered and serialized as 64 lowercase hex characters.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Fingerprint([u8; 32]);

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum FingerprintParseError {
    #[error("fingerprint is not valid hex: {0}")]
    InvalidHex(String),

    #[error("fingerprint must be 32 bytes, got {0}")]
    InvalidLength(usize),
}

impl Fingerprint {
    pub const LEN: usize = 32;

    pub fn digest(bytes: &[u8]) -> Self {
        let hash = Sha256::digest(bytes);
        let mut out = [0u8; Self::LEN];
        out.copy_from_slice(&hash);
        Self(out)
    }

    pub fn from_bytes(bytes: [u8; 32]) -> Self {
        Self(bytes)
    }

    pub fn as_bytes(&self) -> &[u8; 32] {
        &self.0
    }

    pub fn to_hex(&self) -> String {
        hex::encode(self.0)
    }

    /// Exact 32-byte equality.
    pub fn verify(expected: &Fingerprint, actual: &Fingerprint) -> bool {
        expected.0 == actual.0
    }
}

/// Fingerprint of a product and its ordered stage log.
pub fn fingerprint_record(
    product: &Product,
    stages: &[StageRecord],
) -> Result<Fingerprint, EncodingError> {
    let encoded = encode_record(product, stages)?;
    Ok(Fingerprint::digest(encoded.as_bytes()))
}

impl fmt::Display for Fingerprint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_hex())
    }
}

impl fmt::Debug for Fingerprint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Fingerprint({})", self.to_hex())
    }
}

impl FromStr for Fingerprint {
    type Err = FingerprintParseError;

    /// Accepts an optional `0x` prefix and either letter case.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        let digits = s
            .strip_prefix("0x")
            .or_else(|| s.strip_prefix("0X"))
            .unwrap_or(s);

        let bytes =
            hex::decode(digits).map_err(|e| FingerprintParseError::InvalidHex(e.to_string()))?;
        let len = bytes.len();
        let array: [u8; 32] = bytes
            .try_into()
            .map_err(|_| FingerprintParseError::InvalidLength(len))?;
        Ok(Self(array))
    }
}

impl TryFrom<String> for Fingerprint {
    type Error = FingerprintParseError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<Fingerprint> for String {
    fn from(value: Fingerprint) -> Self {
        value.to_hex()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::canonical::tests::{sample_product, sample_stages};
    use chrono::Duration;
    use proptest::prelude::*;

    #[test]
    fn empty_input_digest_matches_sha256() {
        assert_eq!(
            Fingerprint::digest(b"").to_hex(),
            "e3b0c44298fc1c149afbf4c8996fb92427ae41e4649b934ca495991b7852b855"
        );
    }

    #[test]
    fn reference_record_has_stable_fingerprint() {
        let fp = fingerprint_record(&sample_product(), &sample_stages()).unwrap();
        assert_eq!(
            fp.to_hex(),
            "dc87df1ad8a4af3ba0dd82b3e96953e02676bc96072f34613255f6bc918d5710"
        );
    }

    #[test]
    fn tampered_timestamp_changes_fingerprint() {
        let anchored = fingerprint_record(&sample_product(), &sample_stages()).unwrap();

        let mut stages = sample_stages();
        stages[1].timestamp += Duration::microseconds(1);
        let recomputed = fingerprint_record(&sample_product(), &stages).unwrap();

        assert!(!Fingerprint::verify(&anchored, &recomputed));
    }

    #[test]
    fn tampered_metadata_changes_fingerprint() {
        let anchored = fingerprint_record(&sample_product(), &sample_stages()).unwrap();

        let mut product = sample_product();
        product.batch_number = "B-02".to_string();

        assert_ne!(anchored, fingerprint_record(&product, &sample_stages()).unwrap());
    }

    #[test]
    fn latest_stage_is_not_fingerprinted() {
        let anchored = fingerprint_record(&sample_product(), &sample_stages()).unwrap();

        let mut product = sample_product();
        product.latest_stage = "Packaging".to_string();

        assert_eq!(anchored, fingerprint_record(&product, &sample_stages()).unwrap());
    }

    #[test]
    fn parses_with_and_without_prefix() {
        let fp = Fingerprint::digest(b"abc");
        let hex = fp.to_hex();

        assert_eq!(hex.parse::<Fingerprint>().unwrap(), fp);
        assert_eq!(format!("0x{hex}").parse::<Fingerprint>().unwrap(), fp);
        assert_eq!(hex.to_uppercase().parse::<Fingerprint>().unwrap(), fp);
    }

    #[test]
    fn rejects_malformed_hex() {
        assert!(matches!(
            "zz".parse::<Fingerprint>(),
            Err(FingerprintParseError::InvalidHex(_))
        ));
        assert_eq!(
            "abcd".parse::<Fingerprint>(),
            Err(FingerprintParseError::InvalidLength(2))
        );
    }

    #[test]
    fn serializes_as_hex_string() {
        let fp = Fingerprint::digest(b"abc");
        let json = serde_json::to_value(fp).unwrap();
        assert_eq!(json, serde_json::Value::String(fp.to_hex()));

        let back: Fingerprint = serde_json::from_value(json).unwrap();
        assert_eq!(back, fp);
    }

    proptest! {
        #[test]
        fn fingerprint_is_deterministic(
            product_type in "[A-Za-z0-9 ]{1,24}",
            batch in "[A-Z0-9-]{1,12}",
            offsets in proptest::collection::vec(0i64..1_000_000, 0..8),
        ) {
            let mut product = sample_product();
            product.product_type = product_type;
            product.batch_number = batch;

            let template = sample_stages().remove(0);
            let stages: Vec<StageRecord> = offsets
                .iter()
                .enumerate()
                .map(|(i, off)| StageRecord {
                    stage_name: format!("Stage {i}"),
                    timestamp: template.timestamp + Duration::microseconds(*off),
                    ..template.clone()
                })
                .collect();

            let a = fingerprint_record(&product, &stages).unwrap();
            let b = fingerprint_record(&product.clone(), &stages.clone()).unwrap();
            prop_assert!(Fingerprint::verify(&a, &b));
        }

        #[test]
        fn distinct_stage_names_give_distinct_fingerprints(a in "[a-z]{1,8}", b in "[a-z]{1,8}") {
            prop_assume!(a != b);
            let mut left = sample_stages();
            let mut right = sample_stages();
            left[0].stage_name = a;
            right[0].stage_name = b;

            prop_assert_ne!(
                fingerprint_record(&sample_product(), &left).unwrap(),
                fingerprint_record(&sample_product(), &right).unwrap()
            );
        }
    }
}
