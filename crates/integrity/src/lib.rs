//! `pharmasafe-integrity`: canonical encoding and fingerprinting of product
//! records.
//!
//! The same encoding rule runs when a fingerprint is anchored and at every
//! later verification; any drift between the two would make digests never
//! match.

pub mod canonical;
pub mod fingerprint;

pub use canonical::{CanonicalRecord, EncodingError, RECORD_DOMAIN, encode_record, iso8601};
pub use fingerprint::{Fingerprint, FingerprintParseError, fingerprint_record};
