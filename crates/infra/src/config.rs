//! Process configuration from environment variables.

use std::env;
use std::net::SocketAddr;

use thiserror::Error;

use pharmasafe_core::Identity;
use pharmasafe_products::{StageCatalog, ValidityPeriod};

pub const DEFAULT_BIND_ADDR: &str = "0.0.0.0:3001";

/// First account of a local development chain. Only suitable for dev.
pub const DEV_ROOT_AUTHORITY: &str = "0xf39fd6e51aad88f6f4ce6ab8827279cfffb92266";

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ConfigError {
    #[error("PHARMASAFE_BIND_ADDR is not a socket address: {0}")]
    InvalidBindAddr(String),

    #[error("PHARMASAFE_ROOT_AUTHORITY is invalid: {0}")]
    InvalidRootAuthority(String),

    #[error("PHARMASAFE_STAGES is invalid: {0}")]
    InvalidStages(String),

    #[error("PHARMASAFE_VALIDITY_MONTHS is invalid: {0}")]
    InvalidValidityMonths(String),
}

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub bind_addr: SocketAddr,
    pub root_authority: Identity,
    pub catalog: StageCatalog,
    pub validity: ValidityPeriod,
}

impl AppConfig {
    /// Read configuration from the process environment.
    ///
    /// # Environment Variables
    ///
    /// - `PHARMASAFE_BIND_ADDR`: listen address (default: 0.0.0.0:3001)
    /// - `PHARMASAFE_ROOT_AUTHORITY`: registry creator identity (default: dev deployer, warns)
    /// - `PHARMASAFE_STAGES`: comma-separated stage catalog (default: six-stage list)
    /// - `PHARMASAFE_VALIDITY_MONTHS`: shelf life applied at creation (default: 24)
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Same as `from_env`, with an injectable variable source.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let value = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        let bind_addr = value("PHARMASAFE_BIND_ADDR")
            .unwrap_or_else(|| DEFAULT_BIND_ADDR.to_string())
            .trim()
            .parse()
            .map_err(|e: std::net::AddrParseError| ConfigError::InvalidBindAddr(e.to_string()))?;

        let root_authority = match value("PHARMASAFE_ROOT_AUTHORITY") {
            Some(raw) => Identity::parse(&raw)
                .map_err(|e| ConfigError::InvalidRootAuthority(e.to_string()))?,
            None => {
                tracing::warn!(
                    root_authority = DEV_ROOT_AUTHORITY,
                    "PHARMASAFE_ROOT_AUTHORITY not set; using dev deployer address"
                );
                Identity::parse(DEV_ROOT_AUTHORITY)
                    .map_err(|e| ConfigError::InvalidRootAuthority(e.to_string()))?
            }
        };

        let catalog = match value("PHARMASAFE_STAGES") {
            Some(raw) => StageCatalog::new(raw.split(',').map(str::trim))
                .map_err(|e| ConfigError::InvalidStages(e.to_string()))?,
            None => StageCatalog::default(),
        };

        let validity = match value("PHARMASAFE_VALIDITY_MONTHS") {
            Some(raw) => {
                let months: u32 = raw
                    .trim()
                    .parse()
                    .map_err(|_| ConfigError::InvalidValidityMonths(raw.clone()))?;
                ValidityPeriod::months(months)
                    .map_err(|e| ConfigError::InvalidValidityMonths(e.to_string()))?
            }
            None => ValidityPeriod::default(),
        };

        Ok(Self {
            bind_addr,
            root_authority,
            catalog,
            validity,
        })
    }
}
