//! Strongly-typed, normalized identifiers used across the domain.
//!
//! Both identifiers are plain strings on the wire. Normalization happens once,
//! at parse time, so equality and hashing never have to care about case.

use core::str::FromStr;
use serde::{Deserialize, Serialize};

use crate::error::{DomainError, DomainResult};

/// Identifier of a tracked product (trimmed, upper-cased).
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct ProductId(String);

/// Identity of an actor (wallet address or other signer id; trimmed, lower-cased).
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Identity(String);

impl ProductId {
    /// Parse and normalize a product identifier.
    pub fn parse(raw: &str) -> DomainResult<Self> {
        let trimmed = raw.trim();
        if trimmed.is_empty() {
            return Err(DomainError::invalid_input("product id cannot be empty"));
        }
        if trimmed.chars().any(char::is_control) {
            return Err(DomainError::invalid_input(
                "product id cannot contain control characters",
            ));
        }
        Ok(Self(trimmed.to_uppercase()))
    }
}

impl Identity {
    /// Parse and normalize an actor identity.
    ///
    /// The all-zero wallet address is rejected: it can never sign anything.
    pub fn parse(raw: &str) -> DomainResult<Self> {
        let trimmed = raw.trim();
        if trimmed.is_empty() {
            return Err(DomainError::invalid_identity("identity cannot be empty"));
        }
        if trimmed
            .chars()
            .any(|c| c.is_whitespace() || c.is_control())
        {
            return Err(DomainError::invalid_identity(
                "identity cannot contain whitespace or control characters",
            ));
        }

        let normalized = trimmed.to_lowercase();
        if is_zero_address(&normalized) {
            return Err(DomainError::invalid_identity("zero address"));
        }
        Ok(Self(normalized))
    }
}

fn is_zero_address(s: &str) -> bool {
    match s.strip_prefix("0x") {
        Some(rest) => !rest.is_empty() && rest.chars().all(|c| c == '0'),
        None => false,
    }
}

macro_rules! impl_text_newtype {
    ($t:ty) => {
        impl $t {
            pub fn as_str(&self) -> &str {
                &self.0
            }
        }

        impl core::fmt::Display for $t {
            fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
                f.write_str(&self.0)
            }
        }

        impl AsRef<str> for $t {
            fn as_ref(&self) -> &str {
                &self.0
            }
        }

        impl FromStr for $t {
            type Err = DomainError;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                Self::parse(s)
            }
        }

        impl TryFrom<String> for $t {
            type Error = DomainError;

            fn try_from(value: String) -> Result<Self, Self::Error> {
                Self::parse(&value)
            }
        }

        impl From<$t> for String {
            fn from(value: $t) -> Self {
                value.0
            }
        }
    };
}

impl_text_newtype!(ProductId);
impl_text_newtype!(Identity);
