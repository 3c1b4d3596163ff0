//! Risk factors and the weight registry
//!
//! Each [`FactorKind`] is a pure evaluator over the transaction, the user
//! and the biometric confidence. Weighted factors derive their points from
//! a [`FactorWeights`] entry; [`FactorRegistry::validate`] guarantees that
//! every factor, weighted or fixed-penalty, is registered exactly once.

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::biometric::BiometricConfidence;
use crate::config::ScoringConfig;
use crate::types::{FactorHit, Transaction, User};
use crate::{Error, Result};

/// Risk factor identifier
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FactorKind {
    /// Transaction amount
    Amount,
    /// Biometric match confidence
    Biometric,
    /// Device recognition
    Device,
    /// Transaction origin vs. user residence
    Location,
}

impl FactorKind {
    /// All factors in evaluation order
    pub const ALL: [FactorKind; 4] = [
        FactorKind::Amount,
        FactorKind::Biometric,
        FactorKind::Device,
        FactorKind::Location,
    ];

    /// Whether points come from a weight rather than a fixed penalty
    pub fn is_weighted(&self) -> bool {
        !matches!(self, FactorKind::Biometric)
    }

    /// Evaluate this factor
    pub fn evaluate(&self, input: &FactorInput<'_>, config: &ScoringConfig) -> Option<FactorHit> {
        match self {
            FactorKind::Amount => {
                let amount = input.transaction.amount;
                let thresholds = &config.amount;
                if amount > thresholds.high {
                    Some(self.hit("high_amount", weight_points(config.weights.amount, 100.0)))
                } else if amount > thresholds.elevated {
                    Some(self.hit("elevated_amount", weight_points(config.weights.amount, 50.0)))
                } else {
                    None
                }
            }
            FactorKind::Biometric => {
                (input.confidence.value() < config.biometric.min_confidence)
                    .then(|| self.hit("low_bio_confidence", config.biometric.penalty))
            }
            FactorKind::Device => (!input.user.has_known_device())
                .then(|| self.hit("unknown_device", weight_points(config.weights.device, 100.0))),
            FactorKind::Location => {
                let origin = input.transaction.country.as_deref()?.trim();
                let home = input.user.home_country.as_deref()?.trim();
                if origin.is_empty() || home.is_empty() || origin.eq_ignore_ascii_case(home) {
                    return None;
                }
                Some(self.hit("foreign_location", weight_points(config.weights.location, 100.0)))
            }
        }
    }

    fn hit(&self, tag: &str, points: u32) -> FactorHit {
        FactorHit {
            kind: *self,
            tag: tag.to_string(),
            points,
        }
    }
}

impl fmt::Display for FactorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            FactorKind::Amount => "amount",
            FactorKind::Biometric => "biometric",
            FactorKind::Device => "device",
            FactorKind::Location => "location",
        };
        f.write_str(name)
    }
}

/// `round(weight * scale)`; weights are validated to lie in `[0, 1]`
fn weight_points(weight: f64, scale: f64) -> u32 {
    (weight * scale).round() as u32
}

/// Inputs every factor is evaluated against
#[derive(Debug, Clone, Copy)]
pub struct FactorInput<'a> {
    /// Transaction
    pub transaction: &'a Transaction,
    /// User
    pub user: &'a User,
    /// Normalized biometric confidence
    pub confidence: &'a BiometricConfidence,
}

/// Declared factor weights
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FactorWeights {
    /// Amount weight
    pub amount: f64,

    /// Location weight
    pub location: f64,

    /// Device weight
    pub device: f64,
}

impl Default for FactorWeights {
    fn default() -> Self {
        Self {
            amount: 0.4,
            location: 0.2,
            device: 0.2,
        }
    }
}

impl FactorWeights {
    /// Every declared weight with the factor it belongs to
    pub fn declared(&self) -> [(FactorKind, f64); 3] {
        [
            (FactorKind::Amount, self.amount),
            (FactorKind::Location, self.location),
            (FactorKind::Device, self.device),
        ]
    }
}

/// Ordered set of factors the scorer evaluates
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct FactorRegistry {
    factors: Vec<FactorKind>,
}

impl Default for FactorRegistry {
    fn default() -> Self {
        Self {
            factors: FactorKind::ALL.to_vec(),
        }
    }
}

impl FactorRegistry {
    /// Create registry from an explicit factor list
    pub fn new(factors: Vec<FactorKind>) -> Self {
        Self { factors }
    }

    /// Registered factors in evaluation order
    pub fn factors(&self) -> &[FactorKind] {
        &self.factors
    }

    /// Check that every factor is registered exactly once and every
    /// declared weight is usable
    pub fn validate(&self, weights: &FactorWeights) -> Result<()> {
        for kind in FactorKind::ALL {
            let registered = self.factors.iter().filter(|f| **f == kind).count();
            if registered != 1 {
                return Err(Error::FactorRegistry(format!(
                    "factor {} registered {} times, expected exactly 1",
                    kind, registered
                )));
            }
        }

        for (kind, weight) in weights.declared() {
            if !weight.is_finite() || !(0.0..=1.0).contains(&weight) {
                return Err(Error::FactorRegistry(format!(
                    "weight for {} must be within [0, 1], got {}",
                    kind, weight
                )));
            }
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal::Decimal;

    fn evaluate(kind: FactorKind, txn: &Transaction, user: &User, confidence: f64) -> Option<FactorHit> {
        let confidence = BiometricConfidence::new(confidence);
        let input = FactorInput {
            transaction: txn,
            user,
            confidence: &confidence,
        };
        kind.evaluate(&input, &ScoringConfig::default())
    }

    #[test]
    fn test_amount_bands() {
        let user = User::new(Some("fp".to_string()));
        let points = |amount: i64| {
            evaluate(FactorKind::Amount, &Transaction::new(Decimal::from(amount), "USD"), &user, 1.0)
                .map(|h| h.points)
                .unwrap_or(0)
        };

        assert_eq!(points(15_000), 40);
        assert_eq!(points(10_001), 40);
        assert_eq!(points(10_000), 20);
        assert_eq!(points(1_001), 20);
        assert_eq!(points(1_000), 0);
        assert_eq!(points(-500), 0);
    }

    #[test]
    fn test_location_requires_both_countries() {
        let txn = Transaction::new(Decimal::from(10), "USD").with_country("BR");
        let local = User::new(None).with_home_country("br");
        let abroad = User::new(None).with_home_country("US");
        let unknown = User::new(None);

        assert!(evaluate(FactorKind::Location, &txn, &local, 1.0).is_none());
        assert!(evaluate(FactorKind::Location, &txn, &unknown, 1.0).is_none());

        let hit = evaluate(FactorKind::Location, &txn, &abroad, 1.0).unwrap();
        assert_eq!(hit.tag, "foreign_location");
        assert_eq!(hit.points, 20);
    }

    #[test]
    fn test_default_registry_is_consistent() {
        FactorRegistry::default()
            .validate(&FactorWeights::default())
            .unwrap();
    }

    #[test]
    fn test_registry_rejects_orphan_weight() {
        let registry = FactorRegistry::new(vec![
            FactorKind::Amount,
            FactorKind::Biometric,
            FactorKind::Device,
        ]);
        let err = registry.validate(&FactorWeights::default()).unwrap_err();
        assert!(matches!(err, Error::FactorRegistry(_)));
    }

    #[test]
    fn test_registry_rejects_missing_biometric_factor() {
        let registry = FactorRegistry::new(vec![
            FactorKind::Amount,
            FactorKind::Device,
            FactorKind::Location,
        ]);
        let err = registry.validate(&FactorWeights::default()).unwrap_err();
        assert!(matches!(err, Error::FactorRegistry(_)));
    }

    #[test]
    fn test_registry_rejects_duplicates_and_bad_weights() {
        let mut factors = FactorKind::ALL.to_vec();
        factors.push(FactorKind::Biometric);
        assert!(FactorRegistry::new(factors).validate(&FactorWeights::default()).is_err());

        let weights = FactorWeights {
            amount: 1.5,
            ..FactorWeights::default()
        };
        assert!(FactorRegistry::default().validate(&weights).is_err());

        let weights = FactorWeights {
            device: f64::NAN,
            ..FactorWeights::default()
        };
        assert!(FactorRegistry::default().validate(&weights).is_err());
    }
}
