//! Property tests for posting and correction arithmetic.

use proptest::prelude::*;
use rust_decimal::Decimal;

use super::posting::PostingService;
use super::types::{ChargePatch, PaymentStatus};

/// Strategy for non-negative decimal amounts with two decimal places.
fn amount_strategy() -> impl Strategy<Value = Decimal> {
    (0i64..1_000_000i64).prop_map(|n| Decimal::new(n, 2))
}

/// Strategy for optional prior dues, including negative corrections.
fn prior_dues_strategy() -> impl Strategy<Value = Option<Decimal>> {
    proptest::option::of((-500_000i64..1_000_000i64).prop_map(|n| Decimal::new(n, 2)))
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(200))]

    /// Carry-forward is never negative and comes only from positive prior dues.
    #[test]
    fn prop_carry_forward_non_negative(prior in prior_dues_strategy()) {
        let carry = PostingService::resolve_carry_forward(prior);
        prop_assert!(carry >= Decimal::ZERO);

        match prior {
            Some(dues) if dues > Decimal::ZERO => prop_assert_eq!(carry, dues),
            _ => prop_assert_eq!(carry, Decimal::ZERO),
        }
    }

    /// Exactly one status results for any input, and the status agrees
    /// with the paid/payable relationship.
    #[test]
    fn prop_status_is_total_and_exclusive(
        base in amount_strategy(),
        paid in amount_strategy(),
        prior in prior_dues_strategy(),
    ) {
        let charge = PostingService::post(base, paid, prior).unwrap();

        match charge.status {
            PaymentStatus::Paid => prop_assert!(paid >= charge.amount),
            PaymentStatus::Partial => {
                prop_assert!(paid > Decimal::ZERO);
                prop_assert!(paid < charge.amount);
            }
            PaymentStatus::Due => {
                prop_assert_eq!(paid, Decimal::ZERO);
                prop_assert!(charge.amount > Decimal::ZERO);
            }
        }
    }

    /// `dues + paid_amount == amount` for every posting that is not an
    /// overpayment; overpayments close at zero dues.
    #[test]
    fn prop_posted_accounting_identity(
        base in amount_strategy(),
        paid in amount_strategy(),
        prior in prior_dues_strategy(),
    ) {
        let charge = PostingService::post(base, paid, prior).unwrap();

        prop_assert!(charge.dues >= Decimal::ZERO);
        if paid <= charge.amount {
            prop_assert_eq!(charge.dues + charge.paid_amount, charge.amount);
        } else {
            prop_assert_eq!(charge.dues, Decimal::ZERO);
        }
    }

    /// `amount = base + carry_forward` always holds.
    #[test]
    fn prop_amount_includes_carry_forward(
        base in amount_strategy(),
        paid in amount_strategy(),
        prior in prior_dues_strategy(),
    ) {
        let charge = PostingService::post(base, paid, prior).unwrap();
        prop_assert_eq!(charge.amount, base + charge.carry_forward);
    }

    /// Posting a chronological sequence of periods propagates dues: each
    /// posting's carry-forward equals the previous posting's final dues
    /// (clamped at zero once settled).
    #[test]
    fn prop_dues_propagate_through_sequence(
        postings in proptest::collection::vec((amount_strategy(), amount_strategy()), 1..12),
    ) {
        let mut prior_dues: Option<Decimal> = None;

        for (base, paid) in postings {
            let charge = PostingService::post(base, paid, prior_dues).unwrap();

            let expected_carry = match prior_dues {
                Some(d) if d > Decimal::ZERO => d,
                _ => Decimal::ZERO,
            };
            prop_assert_eq!(charge.carry_forward, expected_carry);

            prior_dues = Some(charge.dues);
        }
    }

    /// A correction that supplies both fields always satisfies
    /// `dues + paid_amount == amount` (no clamp on this path).
    #[test]
    fn prop_correction_accounting_identity(
        amount in amount_strategy(),
        paid in amount_strategy(),
    ) {
        let patch = ChargePatch {
            amount: Some(amount),
            paid_amount: Some(paid),
        };
        let correction = PostingService::apply_correction(&patch).unwrap();

        prop_assert_eq!(correction.dues + paid, amount);

        match correction.status {
            PaymentStatus::Paid => prop_assert!(paid >= amount),
            PaymentStatus::Partial => {
                prop_assert!(paid > Decimal::ZERO);
                prop_assert!(paid < amount);
            }
            PaymentStatus::Due => prop_assert_eq!(paid, Decimal::ZERO),
        }
    }

    /// A partial patch never recomputes.
    #[test]
    fn prop_partial_patch_never_recomputes(
        amount in proptest::option::of(amount_strategy()),
    ) {
        let patch = ChargePatch {
            amount,
            paid_amount: None,
        };
        prop_assert!(PostingService::apply_correction(&patch).is_none());
    }
}
