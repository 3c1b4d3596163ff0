//! Biometric matcher seam
//!
//! The matching algorithm lives outside this workspace; the orchestrator
//! only needs something that turns a presented sample into a
//! [`BiometricVerification`].

use risk_engine::BiometricVerification;
use thiserror::Error;

/// Failure reported by a biometric matcher
#[derive(Error, Debug)]
pub enum MatcherError {
    /// Subsystem unreachable or timed out
    #[error("Biometric subsystem unavailable: {0}")]
    Unavailable(String),

    /// Sample could not be decoded
    #[error("Invalid biometric sample: {0}")]
    InvalidSample(String),

    /// Matching failed internally
    #[error("Biometric processing error: {0}")]
    Processing(String),
}

/// External biometric subsystem
pub trait BiometricMatcher: Send + Sync {
    /// Verify a presented sample against the enrolled identity.
    ///
    /// Implementations must not keep copies of `sample`; the caller erases
    /// it as soon as this returns.
    fn verify(&self, sample: &[u8]) -> Result<BiometricVerification, MatcherError>;
}

/// Matcher that returns a fixed verification, rejecting empty samples.
/// Useful for replaying results recorded elsewhere.
#[derive(Debug, Clone)]
pub struct FixedMatcher {
    verification: BiometricVerification,
}

impl FixedMatcher {
    /// Always answer with `verification`
    pub fn new(verification: BiometricVerification) -> Self {
        Self { verification }
    }
}

impl BiometricMatcher for FixedMatcher {
    fn verify(&self, sample: &[u8]) -> Result<BiometricVerification, MatcherError> {
        if sample.is_empty() {
            return Err(MatcherError::InvalidSample("empty sample".to_string()));
        }
        Ok(self.verification.clone())
    }
}

/// Matcher standing in for an unreachable subsystem
#[derive(Debug, Clone, Default)]
pub struct UnavailableMatcher;

impl BiometricMatcher for UnavailableMatcher {
    fn verify(&self, _sample: &[u8]) -> Result<BiometricVerification, MatcherError> {
        Err(MatcherError::Unavailable("no biometric backend configured".to_string()))
    }
}
