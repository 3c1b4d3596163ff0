//! Biometric confidence handling
//!
//! Confidence values are derived from a biometric comparison and are
//! treated as sensitive: every holder here zeroizes on drop and `Debug`
//! never prints the value.

use serde::{Deserialize, Serialize};
use std::fmt;
use tracing::warn;
use zeroize::{Zeroize, ZeroizeOnDrop};

/// Confidence substituted whenever the real value is unusable
pub const WORST_CASE_CONFIDENCE: f64 = 0.0;

/// Normalized biometric confidence in `[0.0, 1.0]`
#[derive(Clone, PartialEq, Zeroize, ZeroizeOnDrop)]
pub struct BiometricConfidence(f64);

impl BiometricConfidence {
    /// Normalize a raw confidence. NaN, infinite and out-of-range values
    /// collapse to [`WORST_CASE_CONFIDENCE`].
    pub fn new(raw: f64) -> Self {
        if (0.0..=1.0).contains(&raw) {
            Self(raw)
        } else {
            warn!("Biometric confidence out of range, treating as worst case");
            Self(WORST_CASE_CONFIDENCE)
        }
    }

    /// Worst-case confidence
    pub fn worst_case() -> Self {
        Self(WORST_CASE_CONFIDENCE)
    }

    /// Raw value
    pub fn value(&self) -> f64 {
        self.0
    }
}

impl fmt::Debug for BiometricConfidence {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("BiometricConfidence(<redacted>)")
    }
}

/// Result reported by the biometric subsystem for one presented sample
#[derive(Clone, Serialize, Deserialize, Zeroize, ZeroizeOnDrop)]
pub struct BiometricVerification {
    /// Liveness check passed
    pub is_live: bool,

    /// Match confidence, 0.0 to 1.0
    pub confidence: f64,

    /// Replay of a recorded sample was detected
    #[serde(default)]
    pub replay_detected: bool,

    /// Processing error reported by the subsystem
    #[serde(default)]
    pub error: Option<String>,
}

impl BiometricVerification {
    /// Successful live match
    pub fn live(confidence: f64) -> Self {
        Self {
            is_live: true,
            confidence,
            replay_detected: false,
            error: None,
        }
    }

    /// Replay attack detected
    pub fn replay() -> Self {
        Self {
            is_live: false,
            confidence: WORST_CASE_CONFIDENCE,
            replay_detected: true,
            error: None,
        }
    }

    fn passed_checks(&self) -> bool {
        self.is_live && !self.replay_detected && self.error.is_none()
    }

    /// Whether the reported confidence is scored as-is: the sample was
    /// live, not replayed, processed without error and the confidence is
    /// within `[0.0, 1.0]`.
    pub fn is_usable(&self) -> bool {
        self.passed_checks() && (0.0..=1.0).contains(&self.confidence)
    }

    /// Confidence the engine should score with; anything not
    /// [usable](Self::is_usable) yields the worst case.
    pub fn effective_confidence(&self) -> BiometricConfidence {
        if self.passed_checks() {
            BiometricConfidence::new(self.confidence)
        } else {
            BiometricConfidence::worst_case()
        }
    }
}

impl fmt::Debug for BiometricVerification {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("BiometricVerification")
            .field("is_live", &self.is_live)
            .field("confidence", &"<redacted>")
            .field("replay_detected", &self.replay_detected)
            .field("error", &self.error)
            .finish()
    }
}

/// Effective confidence for an optional verification; a missing result
/// (subsystem unavailable) is the worst case.
pub fn effective_confidence_of(verification: Option<&BiometricVerification>) -> BiometricConfidence {
    verification
        .map(BiometricVerification::effective_confidence)
        .unwrap_or_else(BiometricConfidence::worst_case)
}
