//! Property-based tests for scoring invariants
//!
//! - Biometric penalty applies exactly below the confidence threshold
//! - Amount factor follows the 0 / 20 / 40 bands
//! - Monotonicity: riskier inputs never lower the score
//! - FACE is always required; higher levels require strictly more
//! - Determinism: same inputs, same assessment

use proptest::prelude::*;
use risk_engine::{AuthFactor, FactorKind, RiskLevel, RiskScorer, Transaction, User};
use rust_decimal::Decimal;
use uuid::Uuid;

/// Strategy for amounts with cents, spanning all bands
fn amount_strategy() -> impl Strategy<Value = Decimal> {
    (0i64..5_000_000i64).prop_map(|cents| Decimal::new(cents, 2))
}

/// Strategy for in-range confidence
fn confidence_strategy() -> impl Strategy<Value = f64> {
    0.0f64..=1.0f64
}

fn fingerprint_strategy() -> impl Strategy<Value = Option<String>> {
    prop_oneof![
        Just(None),
        Just(Some(String::new())),
        "[a-f0-9]{16}".prop_map(Some),
    ]
}

fn transaction(amount: Decimal) -> Transaction {
    Transaction {
        transaction_id: Uuid::nil(),
        amount,
        currency: "USD".to_string(),
        country: None,
    }
}

fn user(device_fingerprint: Option<String>) -> User {
    User {
        user_id: Uuid::nil(),
        device_fingerprint,
        home_country: None,
    }
}

fn points_for(scorer: &RiskScorer, kind: FactorKind, amount: Decimal, fp: Option<String>, confidence: f64) -> u32 {
    scorer
        .calculate_risk(&transaction(amount), &user(fp), confidence)
        .factors
        .iter()
        .filter(|hit| hit.kind == kind)
        .map(|hit| hit.points)
        .sum()
}

proptest! {
    #[test]
    fn prop_biometric_penalty_threshold(
        amount in amount_strategy(),
        fp in fingerprint_strategy(),
        confidence in confidence_strategy(),
    ) {
        let scorer = RiskScorer::new();
        let points = points_for(&scorer, FactorKind::Biometric, amount, fp, confidence);
        if confidence < 0.85 {
            prop_assert_eq!(points, 50);
        } else {
            prop_assert_eq!(points, 0);
        }
    }

    #[test]
    fn prop_amount_bands(amount in amount_strategy(), confidence in confidence_strategy()) {
        let scorer = RiskScorer::new();
        let points = points_for(&scorer, FactorKind::Amount, amount, Some("fp".into()), confidence);
        let expected = if amount > Decimal::from(10_000) {
            40
        } else if amount > Decimal::from(1_000) {
            20
        } else {
            0
        };
        prop_assert_eq!(points, expected);
    }

    #[test]
    fn prop_monotonic(
        amount in amount_strategy(),
        extra in amount_strategy(),
        fp in fingerprint_strategy(),
        confidence in confidence_strategy(),
        lower in confidence_strategy(),
    ) {
        let scorer = RiskScorer::new();
        let base = scorer
            .calculate_risk(&transaction(amount), &user(fp.clone()), confidence)
            .decision;

        let more = scorer
            .calculate_risk(&transaction(amount + extra), &user(fp.clone()), confidence)
            .decision;
        prop_assert!(more.score >= base.score);

        let less_sure = scorer
            .calculate_risk(&transaction(amount), &user(fp), confidence.min(lower))
            .decision;
        prop_assert!(less_sure.score >= base.score);

        let no_device = scorer
            .calculate_risk(&transaction(amount), &user(None), confidence)
            .decision;
        prop_assert!(no_device.score >= base.score);
        prop_assert!(no_device.level >= base.level);
        prop_assert!(no_device.required_auth.is_superset(&base.required_auth));
    }

    #[test]
    fn prop_face_always_required(
        amount in amount_strategy(),
        fp in fingerprint_strategy(),
        confidence in any::<f64>(),
    ) {
        let scorer = RiskScorer::new();
        let decision = scorer.calculate_risk(&transaction(amount), &user(fp), confidence).decision;
        prop_assert!(decision.requires(AuthFactor::Face));
        if decision.level == RiskLevel::High {
            prop_assert!(decision.requires(AuthFactor::Otp));
        }
    }

    #[test]
    fn prop_deterministic(
        amount in amount_strategy(),
        fp in fingerprint_strategy(),
        confidence in confidence_strategy(),
    ) {
        let scorer = RiskScorer::new();
        let txn = transaction(amount);
        let u = user(fp);
        prop_assert_eq!(
            scorer.calculate_risk(&txn, &u, confidence),
            scorer.calculate_risk(&txn, &u, confidence)
        );
    }
}

#[test]
fn test_high_is_strict_superset_of_low() {
    let scorer = RiskScorer::new();
    let low = scorer
        .calculate_risk(&transaction(Decimal::from(500)), &user(Some("fp".into())), 0.95)
        .decision;
    let high = scorer
        .calculate_risk(&transaction(Decimal::from(15_000)), &user(None), 0.40)
        .decision;

    assert_eq!(low.level, RiskLevel::Low);
    assert_eq!(high.level, RiskLevel::High);
    assert!(high.required_auth.is_superset(&low.required_auth));
    assert!(high.required_auth.len() > low.required_auth.len());
}

#[test]
fn test_concurrent_scoring() {
    let scorer = std::sync::Arc::new(RiskScorer::new());
    let handles: Vec<_> = (0..8)
        .map(|i| {
            let scorer = scorer.clone();
            std::thread::spawn(move || {
                scorer
                    .calculate_risk(&transaction(Decimal::from(15_000)), &user(None), 0.1 * i as f64)
                    .decision
                    .score
                    .value()
            })
        })
        .collect();

    for handle in handles {
        assert_eq!(handle.join().unwrap(), 110);
    }
}
