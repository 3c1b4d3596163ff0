//! Risk Engine
//!
//! Scores a transaction from its amount, the user's device trust, the
//! transaction location and a biometric match confidence, then maps the
//! score to the authentication factors the user must pass.
//!
//! ```
//! use risk_engine::{AuthFactor, RiskLevel, RiskScorer, Transaction, User};
//! use rust_decimal::Decimal;
//!
//! let scorer = RiskScorer::new();
//! let assessment = scorer.calculate_risk(
//!     &Transaction::new(Decimal::from(15_000), "USD"),
//!     &User::new(None),
//!     0.40,
//! );
//!
//! assert_eq!(assessment.decision.score.value(), 110);
//! assert_eq!(assessment.decision.level, RiskLevel::High);
//! assert!(assessment.decision.requires(AuthFactor::Otp));
//! ```

#![forbid(unsafe_code)]
#![warn(missing_docs)]

pub mod biometric;
pub mod config;
pub mod error;
pub mod factors;
pub mod scoring;
pub mod tiers;
pub mod types;

pub use biometric::{BiometricConfidence, BiometricVerification};
pub use config::ScoringConfig;
pub use error::{Error, Result};
pub use factors::{FactorKind, FactorRegistry, FactorWeights};
pub use scoring::RiskScorer;
pub use tiers::{Tier, TierTable};
pub use types::*;
