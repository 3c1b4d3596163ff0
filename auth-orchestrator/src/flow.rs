//! Authorization flow
//!
//! Composes the biometric matcher, the risk scorer and the audit log:
//!
//! 1. the presented sample goes to the matcher and is erased right after;
//! 2. matcher failures degrade to worst-case confidence;
//! 3. the scorer decides which factors are required;
//! 4. the decision is audited and returned as an [`AuthorizationPlan`].

use risk_engine::{AuthFactor, BiometricVerification, RiskAssessment, RiskScorer, Transaction, User};
use security::SensitiveBuffer;
use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use crate::audit::{DecisionAuditLog, DecisionRecord};
use crate::config::OrchestratorConfig;
use crate::matcher::BiometricMatcher;
use crate::Result;

/// Outcome of the biometric step, as recorded for audit
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BiometricStatus {
    /// Live sample matched and was scored on its confidence
    Verified,
    /// Result was scored as worst case: liveness failed, replay detected,
    /// the subsystem reported an error or the confidence was out of range
    Rejected,
    /// No result: subsystem unreachable or sample unusable
    Unavailable,
}

impl BiometricStatus {
    fn of(verification: Option<&BiometricVerification>) -> Self {
        match verification {
            None => BiometricStatus::Unavailable,
            Some(v) if v.is_usable() => BiometricStatus::Verified,
            Some(_) => BiometricStatus::Rejected,
        }
    }

    /// Wire name
    pub fn as_str(&self) -> &'static str {
        match self {
            BiometricStatus::Verified => "verified",
            BiometricStatus::Rejected => "rejected",
            BiometricStatus::Unavailable => "unavailable",
        }
    }
}

/// What the caller must do next for a transaction
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuthorizationPlan {
    /// Risk assessment
    pub assessment: RiskAssessment,

    /// Challenges to run, in order
    pub challenges: Vec<AuthFactor>,

    /// Outcome of the biometric step
    pub biometric_status: BiometricStatus,
}

/// Authorization flow
#[derive(Debug)]
pub struct AuthorizationFlow {
    scorer: RiskScorer,
    audit: Option<DecisionAuditLog>,
}

impl AuthorizationFlow {
    /// Create flow without auditing
    pub fn new(scorer: RiskScorer) -> Self {
        Self { scorer, audit: None }
    }

    /// Build scorer and audit log from config
    pub fn from_config(config: &OrchestratorConfig) -> Result<Self> {
        let scorer = RiskScorer::with_config(config.scoring.clone())?;
        let audit = config
            .audit
            .clone()
            .map(DecisionAuditLog::open)
            .transpose()?;
        Ok(Self { scorer, audit })
    }

    /// Attach an audit log
    pub fn with_audit_log(mut self, audit: DecisionAuditLog) -> Self {
        self.audit = Some(audit);
        self
    }

    /// Audit log, if any
    pub fn audit_log(&self) -> Option<&DecisionAuditLog> {
        self.audit.as_ref()
    }

    /// Run the biometric step on `sample`, then decide.
    ///
    /// `sample` is erased before this returns on every path, including
    /// matcher and audit failures. If the matcher panics the buffer is
    /// still erased when the caller's `SensitiveBuffer` drops.
    pub async fn authorize<M>(
        &self,
        matcher: &M,
        transaction: &Transaction,
        user: &User,
        sample: &mut SensitiveBuffer,
    ) -> Result<AuthorizationPlan>
    where
        M: BiometricMatcher + ?Sized,
    {
        let outcome = matcher.verify(sample.as_slice());
        sample.erase();

        let verification = match outcome {
            Ok(verification) => Some(verification),
            Err(e) => {
                warn!(
                    transaction_id = %transaction.transaction_id,
                    error = %e,
                    "Biometric step failed, scoring with worst-case confidence"
                );
                None
            }
        };

        self.authorize_verified(transaction, user, verification.as_ref())
            .await
    }

    /// Decide from a verification obtained elsewhere; `None` means the
    /// biometric subsystem produced no result.
    pub async fn authorize_verified(
        &self,
        transaction: &Transaction,
        user: &User,
        verification: Option<&BiometricVerification>,
    ) -> Result<AuthorizationPlan> {
        let biometric_status = BiometricStatus::of(verification);
        let assessment = self
            .scorer
            .calculate_risk_verified(transaction, user, verification);

        if let Some(audit) = &self.audit {
            audit
                .record(DecisionRecord::new(user.user_id, &assessment, biometric_status))
                .await?;
        }

        info!(
            transaction_id = %assessment.transaction_id,
            user_id = %user.user_id,
            score = %assessment.decision.score,
            level = %assessment.decision.level,
            biometric = biometric_status.as_str(),
            "Authorization plan ready"
        );

        let challenges = assessment.decision.required_auth.iter().copied().collect();
        Ok(AuthorizationPlan {
            assessment,
            challenges,
            biometric_status,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use risk_engine::RiskLevel;
    use rust_decimal::Decimal;

    #[test]
    fn test_biometric_status() {
        assert_eq!(BiometricStatus::of(None), BiometricStatus::Unavailable);
        assert_eq!(
            BiometricStatus::of(Some(&BiometricVerification::replay())),
            BiometricStatus::Rejected
        );
        assert_eq!(
            BiometricStatus::of(Some(&BiometricVerification::live(0.5))),
            BiometricStatus::Verified
        );
        assert_eq!(
            BiometricStatus::of(Some(&BiometricVerification::live(1.5))),
            BiometricStatus::Rejected
        );
        assert_eq!(
            BiometricStatus::of(Some(&BiometricVerification::live(f64::NAN))),
            BiometricStatus::Rejected
        );
    }

    #[tokio::test]
    async fn test_challenges_follow_decision() {
        let flow = AuthorizationFlow::new(RiskScorer::new());
        let plan = flow
            .authorize_verified(
                &Transaction::new(Decimal::from(15_000), "USD"),
                &User::new(None),
                Some(&BiometricVerification::live(0.40)),
            )
            .await
            .unwrap();

        assert_eq!(plan.assessment.decision.level, RiskLevel::High);
        assert_eq!(
            plan.challenges,
            vec![AuthFactor::Face, AuthFactor::Voice, AuthFactor::Otp]
        );
    }
}
