//! Core types for risk engine

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::fmt;
use uuid::Uuid;

use crate::factors::FactorKind;

/// Transaction under assessment. Owned by the caller, never mutated here.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Transaction {
    /// Transaction ID
    pub transaction_id: Uuid,

    /// Monetary amount
    pub amount: Decimal,

    /// ISO 4217 currency code
    pub currency: String,

    /// Originating country (ISO 3166 alpha-2), if known
    #[serde(default)]
    pub country: Option<String>,
}

impl Transaction {
    /// Create a transaction with a fresh ID and no location
    pub fn new(amount: Decimal, currency: impl Into<String>) -> Self {
        Self {
            transaction_id: Uuid::new_v4(),
            amount,
            currency: currency.into(),
            country: None,
        }
    }

    /// Set originating country
    pub fn with_country(mut self, country: impl Into<String>) -> Self {
        self.country = Some(country.into());
        self
    }
}

/// User initiating the transaction
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    /// User ID
    pub user_id: Uuid,

    /// Device fingerprint; absent or blank means an unenrolled device
    #[serde(default)]
    pub device_fingerprint: Option<String>,

    /// Country of residence (ISO 3166 alpha-2), if known
    #[serde(default)]
    pub home_country: Option<String>,
}

impl User {
    /// Create a user with a fresh ID
    pub fn new(device_fingerprint: Option<String>) -> Self {
        Self {
            user_id: Uuid::new_v4(),
            device_fingerprint,
            home_country: None,
        }
    }

    /// Set country of residence
    pub fn with_home_country(mut self, country: impl Into<String>) -> Self {
        self.home_country = Some(country.into());
        self
    }

    /// Whether the user presented a recognised device
    pub fn has_known_device(&self) -> bool {
        self.device_fingerprint
            .as_deref()
            .map(|fp| !fp.trim().is_empty())
            .unwrap_or(false)
    }
}

/// Accumulated risk score. Not capped: additive factors may exceed 100.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RiskScore(u32);

impl RiskScore {
    /// Create new risk score
    pub fn new(score: u32) -> Self {
        Self(score)
    }

    /// Get raw score
    pub fn value(&self) -> u32 {
        self.0
    }

    /// Add factor points, saturating at `u32::MAX`
    pub fn add(self, points: u32) -> Self {
        Self(self.0.saturating_add(points))
    }
}

impl fmt::Display for RiskScore {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Risk level
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum RiskLevel {
    /// Low risk
    Low,
    /// Medium risk
    Medium,
    /// High risk
    High,
}

impl RiskLevel {
    /// Wire name
    pub fn as_str(&self) -> &'static str {
        match self {
            RiskLevel::Low => "LOW",
            RiskLevel::Medium => "MEDIUM",
            RiskLevel::High => "HIGH",
        }
    }
}

impl fmt::Display for RiskLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Authentication factor a user must satisfy.
///
/// Ordering is the order challenges are presented in: the biometric
/// baseline first, OTP last.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum AuthFactor {
    /// Face match
    Face,
    /// Voice match
    Voice,
    /// One-time password
    Otp,
}

impl AuthFactor {
    /// Wire name
    pub fn as_str(&self) -> &'static str {
        match self {
            AuthFactor::Face => "FACE",
            AuthFactor::Voice => "VOICE",
            AuthFactor::Otp => "OTP",
        }
    }
}

impl fmt::Display for AuthFactor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Risk decision: what the caller must enforce before authorizing
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RiskDecision {
    /// Accumulated score
    #[serde(rename = "risk_score")]
    pub score: RiskScore,

    /// Tier derived from the score
    pub level: RiskLevel,

    /// Factors the user must pass, always containing FACE
    pub required_auth: BTreeSet<AuthFactor>,
}

impl RiskDecision {
    /// Whether the given factor is required
    pub fn requires(&self, factor: AuthFactor) -> bool {
        self.required_auth.contains(&factor)
    }
}

/// A factor that fired during scoring
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FactorHit {
    /// Which factor fired
    pub kind: FactorKind,

    /// Audit tag, e.g. `high_amount`
    pub tag: String,

    /// Points contributed to the score
    pub points: u32,
}

/// Risk assessment result: the decision plus the factors behind it
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RiskAssessment {
    /// Transaction ID
    pub transaction_id: Uuid,

    /// Decision
    pub decision: RiskDecision,

    /// Risk factors detected, in evaluation order
    pub factors: Vec<FactorHit>,
}

impl RiskAssessment {
    /// Tags of the triggered factors
    pub fn factor_tags(&self) -> Vec<&str> {
        self.factors.iter().map(|f| f.tag.as_str()).collect()
    }
}
