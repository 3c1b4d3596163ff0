//! Scoring configuration

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::str::FromStr;

use crate::factors::{FactorRegistry, FactorWeights};
use crate::tiers::TierTable;
use crate::{Error, Result};

/// Risk scoring configuration
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct ScoringConfig {
    /// Factor weights
    pub weights: FactorWeights,

    /// Factors evaluated, in order
    pub factors: FactorRegistry,

    /// Amount bands
    pub amount: AmountThresholds,

    /// Biometric policy
    pub biometric: BiometricPolicy,

    /// Score-to-tier table
    pub tiers: TierTable,
}

/// Amount bands for the amount factor
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AmountThresholds {
    /// Above this the full amount weight applies
    pub high: Decimal,

    /// Above this half the amount weight applies
    pub elevated: Decimal,
}

impl Default for AmountThresholds {
    fn default() -> Self {
        Self {
            high: Decimal::from(10_000),
            elevated: Decimal::from(1_000),
        }
    }
}

/// Biometric confidence policy
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BiometricPolicy {
    /// Confidence below this is penalized
    pub min_confidence: f64,

    /// Fixed penalty for low confidence
    pub penalty: u32,
}

impl Default for BiometricPolicy {
    fn default() -> Self {
        Self {
            min_confidence: 0.85,
            penalty: 50,
        }
    }
}

impl ScoringConfig {
    /// Load from a TOML file and validate
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        content.parse()
    }

    /// Load defaults with environment overrides and validate
    pub fn from_env() -> Result<Self> {
        let mut config = ScoringConfig::default();

        if let Some(weight) = env_parse::<f64>("RISK_WEIGHT_AMOUNT")? {
            config.weights.amount = weight;
        }
        if let Some(weight) = env_parse::<f64>("RISK_WEIGHT_LOCATION")? {
            config.weights.location = weight;
        }
        if let Some(weight) = env_parse::<f64>("RISK_WEIGHT_DEVICE")? {
            config.weights.device = weight;
        }
        if let Some(high) = env_parse::<Decimal>("RISK_AMOUNT_HIGH")? {
            config.amount.high = high;
        }
        if let Some(elevated) = env_parse::<Decimal>("RISK_AMOUNT_ELEVATED")? {
            config.amount.elevated = elevated;
        }
        if let Some(min) = env_parse::<f64>("RISK_BIOMETRIC_MIN_CONFIDENCE")? {
            config.biometric.min_confidence = min;
        }
        if let Some(penalty) = env_parse::<u32>("RISK_BIOMETRIC_PENALTY")? {
            config.biometric.penalty = penalty;
        }

        config.validate()?;
        Ok(config)
    }

    /// Check the config is internally consistent
    pub fn validate(&self) -> Result<()> {
        self.factors.validate(&self.weights)?;

        if self.amount.elevated.is_sign_negative() || self.amount.elevated >= self.amount.high {
            return Err(Error::InvalidConfig(format!(
                "amount thresholds must satisfy 0 <= elevated < high, got elevated={} high={}",
                self.amount.elevated, self.amount.high
            )));
        }

        let min = self.biometric.min_confidence;
        if !(0.0..=1.0).contains(&min) {
            return Err(Error::InvalidConfig(format!(
                "biometric min_confidence must be within [0, 1], got {}",
                min
            )));
        }

        Ok(())
    }
}

impl FromStr for ScoringConfig {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        let config: ScoringConfig =
            toml::from_str(s).map_err(|e| Error::Parse(format!("Failed to parse config: {}", e)))?;
        config.validate()?;
        Ok(config)
    }
}

fn env_parse<T>(key: &str) -> Result<Option<T>>
where
    T: FromStr,
    T::Err: std::fmt::Display,
{
    match std::env::var(key) {
        Ok(raw) => raw
            .trim()
            .parse()
            .map(Some)
            .map_err(|e| Error::InvalidConfig(format!("{}: {}", key, e))),
        Err(_) => Ok(None),
    }
}
