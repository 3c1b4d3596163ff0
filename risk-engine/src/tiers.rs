//! Score-to-tier table
//!
//! The mapping from score to level and required factors is an explicit
//! ordered table rather than nested conditionals. [`TierTable::new`]
//! rejects any table that leaves part of the score range uncovered, lets
//! a higher tier require fewer factors than a lower one, or lets HIGH risk
//! through without a one-time password.

use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

use crate::types::{AuthFactor, RiskLevel, RiskScore};
use crate::{Error, Result};

/// One row of the tier table
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Tier {
    /// Lowest score in this tier (inclusive)
    pub min_score: u32,

    /// Highest score in this tier (inclusive); `None` means unbounded
    #[serde(default)]
    pub max_score: Option<u32>,

    /// Level assigned
    pub level: RiskLevel,

    /// Factors required at this level
    pub required_auth: BTreeSet<AuthFactor>,
}

impl Tier {
    fn new(min_score: u32, max_score: Option<u32>, level: RiskLevel, factors: &[AuthFactor]) -> Self {
        Self {
            min_score,
            max_score,
            level,
            required_auth: factors.iter().copied().collect(),
        }
    }

    /// Whether the score falls in this tier
    pub fn contains(&self, score: RiskScore) -> bool {
        let value = score.value();
        value >= self.min_score && self.max_score.map_or(true, |max| value <= max)
    }
}

/// Default tiers: LOW up to 35, MEDIUM up to 75, HIGH above.
pub fn default_tiers() -> Vec<Tier> {
    vec![
        Tier::new(0, Some(35), RiskLevel::Low, &[AuthFactor::Face]),
        Tier::new(36, Some(75), RiskLevel::Medium, &[AuthFactor::Face, AuthFactor::Otp]),
        Tier::new(
            76,
            None,
            RiskLevel::High,
            &[AuthFactor::Face, AuthFactor::Voice, AuthFactor::Otp],
        ),
    ]
}

/// Validated tier table covering every `u32` score
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct TierTable {
    // Never empty; the last tier is unbounded
    tiers: Vec<Tier>,
}

impl TierTable {
    /// Validate and build a table
    pub fn new(tiers: Vec<Tier>) -> Result<Self> {
        let first = tiers
            .first()
            .ok_or_else(|| Error::TierTable("table is empty".to_string()))?;
        if first.min_score != 0 {
            return Err(Error::TierTable(format!(
                "first tier starts at {}, expected 0",
                first.min_score
            )));
        }

        for (i, tier) in tiers.iter().enumerate() {
            if !tier.required_auth.contains(&AuthFactor::Face) {
                return Err(Error::TierTable(format!(
                    "{} tier does not require FACE",
                    tier.level
                )));
            }
            if tier.level == RiskLevel::High && !tier.required_auth.contains(&AuthFactor::Otp) {
                return Err(Error::TierTable("HIGH tier does not require OTP".to_string()));
            }

            let is_last = i + 1 == tiers.len();
            match (tier.max_score, is_last) {
                (None, true) => {}
                (None, false) => {
                    return Err(Error::TierTable(format!(
                        "{} tier is unbounded but is not the last tier",
                        tier.level
                    )))
                }
                (Some(_), true) => {
                    return Err(Error::TierTable(format!(
                        "last tier ({}) must be unbounded",
                        tier.level
                    )))
                }
                (Some(max), false) => {
                    if max < tier.min_score {
                        return Err(Error::TierTable(format!(
                            "{} tier has max {} below min {}",
                            tier.level, max, tier.min_score
                        )));
                    }
                    let next = &tiers[i + 1];
                    if max.checked_add(1) != Some(next.min_score) {
                        return Err(Error::TierTable(format!(
                            "gap or overlap between {} (max {}) and {} (min {})",
                            tier.level, max, next.level, next.min_score
                        )));
                    }
                    if next.level <= tier.level {
                        return Err(Error::TierTable(format!(
                            "{} follows {}; levels must strictly increase",
                            next.level, tier.level
                        )));
                    }
                    if !(next.required_auth.is_superset(&tier.required_auth)
                        && next.required_auth.len() > tier.required_auth.len())
                    {
                        return Err(Error::TierTable(format!(
                            "{} factors must be a strict superset of {} factors",
                            next.level, tier.level
                        )));
                    }
                }
            }
        }

        Ok(Self { tiers })
    }

    /// Tier for a score
    pub fn tier_for(&self, score: RiskScore) -> &Tier {
        // Coverage is checked in `new`; the fallback is the unbounded top tier.
        self.tiers
            .iter()
            .find(|t| t.contains(score))
            .unwrap_or(&self.tiers[self.tiers.len() - 1])
    }

    /// Rows in ascending order
    pub fn tiers(&self) -> &[Tier] {
        &self.tiers
    }
}

impl Default for TierTable {
    fn default() -> Self {
        Self {
            tiers: default_tiers(),
        }
    }
}

impl<'de> Deserialize<'de> for TierTable {
    fn deserialize<D: serde::Deserializer<'de>>(deserializer: D) -> std::result::Result<Self, D::Error> {
        let tiers = Vec::<Tier>::deserialize(deserializer)?;
        TierTable::new(tiers).map_err(serde::de::Error::custom)
    }
}
