//! Risk scoring engine

use tracing::debug;

use crate::biometric::{BiometricConfidence, BiometricVerification};
use crate::config::ScoringConfig;
use crate::factors::FactorInput;
use crate::{Result, RiskAssessment, RiskDecision, RiskScore, Transaction, User};

/// Risk scorer
///
/// Stateless after construction: safe to share across threads and call
/// concurrently. Identical inputs always give identical assessments.
#[derive(Debug, Clone, Default)]
pub struct RiskScorer {
    config: ScoringConfig,
}

impl RiskScorer {
    /// Create new risk scorer with the default policy
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a risk scorer from a custom config
    pub fn with_config(config: ScoringConfig) -> Result<Self> {
        config.validate()?;
        Ok(Self { config })
    }

    /// Active configuration
    pub fn config(&self) -> &ScoringConfig {
        &self.config
    }

    /// Assess transaction risk.
    ///
    /// Total: out-of-range confidence is treated as 0.0, negative amounts
    /// score like zero. The engine's copy of the confidence is zeroized
    /// before returning.
    pub fn calculate_risk(&self, transaction: &Transaction, user: &User, bio_confidence: f64) -> RiskAssessment {
        let confidence = BiometricConfidence::new(bio_confidence);
        self.assess(transaction, user, &confidence)
    }

    /// Assess using a biometric subsystem result; `None` means the
    /// subsystem was unavailable and scores as worst case.
    pub fn calculate_risk_verified(
        &self,
        transaction: &Transaction,
        user: &User,
        verification: Option<&BiometricVerification>,
    ) -> RiskAssessment {
        let confidence = crate::biometric::effective_confidence_of(verification);
        self.assess(transaction, user, &confidence)
    }

    /// Assess with an already normalized confidence
    pub fn assess(&self, transaction: &Transaction, user: &User, confidence: &BiometricConfidence) -> RiskAssessment {
        let input = FactorInput {
            transaction,
            user,
            confidence,
        };

        let factors: Vec<_> = self
            .config
            .factors
            .factors()
            .iter()
            .filter_map(|kind| kind.evaluate(&input, &self.config))
            .collect();

        let score = factors
            .iter()
            .fold(RiskScore::default(), |score, hit| score.add(hit.points));
        let tier = self.config.tiers.tier_for(score);

        let assessment = RiskAssessment {
            transaction_id: transaction.transaction_id,
            decision: RiskDecision {
                score,
                level: tier.level,
                required_auth: tier.required_auth.clone(),
            },
            factors,
        };

        debug!(
            transaction_id = %assessment.transaction_id,
            score = %score,
            level = %tier.level,
            factors = ?assessment.factor_tags(),
            "Risk assessed"
        );

        assessment
    }
}
