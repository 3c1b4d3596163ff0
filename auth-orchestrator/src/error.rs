//! Error types for authorization orchestration

use thiserror::Error;

/// Result type for orchestration
pub type Result<T> = std::result::Result<T, Error>;

/// Orchestration errors
///
/// Biometric subsystem failures are deliberately absent: they degrade to
/// worst-case confidence instead of failing the authorization.
#[derive(Error, Debug)]
pub enum Error {
    /// Risk engine configuration error
    #[error("Risk engine error: {0}")]
    Risk(#[from] risk_engine::Error),

    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(String),

    /// Serialization error
    #[error("Serialization error: {0}")]
    Serialization(String),

    /// Audit log hash chain broken or tampered
    #[error("Integrity check failed: {0}")]
    IntegrityFailure(String),

    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}
