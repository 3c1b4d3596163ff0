//! Authorization orchestrator
//!
//! Reference caller for the risk engine and the secure memory utilities:
//! it drives a presented biometric sample through an external matcher,
//! erases the sample, scores the transaction, records the decision in a
//! hash-chained audit log and hands back the challenges to run.

#![forbid(unsafe_code)]
#![warn(missing_docs)]

pub mod audit;
pub mod config;
pub mod error;
pub mod flow;
pub mod matcher;
pub mod requests;
pub mod telemetry;

pub use audit::{AuditLogConfig, DecisionAuditLog, DecisionRecord};
pub use config::{LogFormat, OrchestratorConfig};
pub use error::{Error, Result};
pub use flow::{AuthorizationFlow, AuthorizationPlan, BiometricStatus};
pub use matcher::{BiometricMatcher, FixedMatcher, MatcherError, UnavailableMatcher};
pub use requests::{load_requests, parse_requests, AuthorizationRequest};
