//! Error types for risk engine
//!
//! Scoring itself never fails; these errors only surface while loading
//! and validating a [`crate::ScoringConfig`].

use thiserror::Error;

/// Risk engine error
#[derive(Debug, Error)]
pub enum Error {
    /// Invalid configuration
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    /// Factor weights do not match the registered factors
    #[error("Factor registry mismatch: {0}")]
    FactorRegistry(String),

    /// Tier table does not cover the score range or is not monotonic
    #[error("Invalid tier table: {0}")]
    TierTable(String),

    /// Config file could not be parsed
    #[error("Config parse error: {0}")]
    Parse(String),

    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Result type
pub type Result<T> = std::result::Result<T, Error>;
