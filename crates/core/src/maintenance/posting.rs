//! Posting service: dues carry-forward, payment posting, and corrections.
//!
//! This module provides the core business rules for the maintenance ledger.
//! It is pure arithmetic with no database dependencies; the caller supplies
//! the prior record's dues from storage.

use rust_decimal::Decimal;

use super::error::MaintenanceError;
use super::types::{ChargePatch, Correction, PayableQuote, PaymentStatus, PostedCharge};

/// Posting service for maintenance charges.
///
/// Carry-forward is resolved from the nearest strictly-earlier period's
/// record at post time and is never recomputed retroactively: a later
/// correction to a prior period does not ripple into records that were
/// already posted.
pub struct PostingService;

impl PostingService {
    /// Resolves the carry-forward contribution of the latest prior record.
    ///
    /// Returns 0 when no prior record exists or when the prior record's
    /// dues are non-positive. A settled (or overpaid) record contributes
    /// nothing, which stops propagation once a balance reaches zero.
    #[must_use]
    pub fn resolve_carry_forward(prior_dues: Option<Decimal>) -> Decimal {
        match prior_dues {
            Some(dues) if dues > Decimal::ZERO => dues,
            _ => Decimal::ZERO,
        }
    }

    /// Quotes what a member owes for a period without posting anything.
    ///
    /// # Errors
    ///
    /// Returns `MaintenanceError::NegativeBaseAmount` if `base_amount` is
    /// negative.
    pub fn payable(
        base_amount: Decimal,
        prior_dues: Option<Decimal>,
    ) -> Result<PayableQuote, MaintenanceError> {
        if base_amount < Decimal::ZERO {
            return Err(MaintenanceError::NegativeBaseAmount);
        }

        let carry_forward = Self::resolve_carry_forward(prior_dues);
        Ok(PayableQuote {
            base_amount,
            carry_forward,
            total_payable: base_amount + carry_forward,
        })
    }

    /// Derives a new charge for a period.
    ///
    /// Computes `amount = base_amount + carry_forward`, then
    /// `dues = amount - paid_amount` with the three-way status rule:
    ///
    /// - `dues <= 0` → `Paid`, dues clamped to 0
    /// - `paid_amount > 0` → `Partial`
    /// - otherwise → `Due`
    ///
    /// # Errors
    ///
    /// Returns an error if either amount is negative.
    pub fn post(
        base_amount: Decimal,
        paid_amount: Decimal,
        prior_dues: Option<Decimal>,
    ) -> Result<PostedCharge, MaintenanceError> {
        if base_amount < Decimal::ZERO {
            return Err(MaintenanceError::NegativeBaseAmount);
        }
        if paid_amount < Decimal::ZERO {
            return Err(MaintenanceError::NegativePaidAmount);
        }

        let carry_forward = Self::resolve_carry_forward(prior_dues);
        let amount = base_amount + carry_forward;
        let raw_dues = amount - paid_amount;

        let (dues, status) = if raw_dues <= Decimal::ZERO {
            // Advance/overpayment is absorbed: the record closes at zero.
            (Decimal::ZERO, PaymentStatus::Paid)
        } else if paid_amount > Decimal::ZERO {
            (raw_dues, PaymentStatus::Partial)
        } else {
            (raw_dues, PaymentStatus::Due)
        };

        Ok(PostedCharge {
            amount,
            carry_forward,
            paid_amount,
            dues,
            status,
        })
    }

    /// Applies a correction patch to an existing charge.
    ///
    /// When the patch supplies both `amount` and `paid_amount`, dues and
    /// status are recomputed: `dues = amount - paid_amount` with NO clamp
    /// (a correction may leave dues negative, representing overpayment),
    /// and status follows `paid >= amount` → `Paid`, `paid > 0` →
    /// `Partial`, else `Due`. A patch missing either field is a plain
    /// field merge and returns `None`.
    #[must_use]
    pub fn apply_correction(patch: &ChargePatch) -> Option<Correction> {
        let (amount, paid_amount) = (patch.amount?, patch.paid_amount?);

        let status = if paid_amount >= amount {
            PaymentStatus::Paid
        } else if paid_amount > Decimal::ZERO {
            PaymentStatus::Partial
        } else {
            PaymentStatus::Due
        };

        Some(Correction {
            dues: amount - paid_amount,
            status,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn test_carry_forward_none_without_prior() {
        assert_eq!(PostingService::resolve_carry_forward(None), dec!(0));
    }

    #[test]
    fn test_carry_forward_only_positive_dues() {
        assert_eq!(
            PostingService::resolve_carry_forward(Some(dec!(400))),
            dec!(400)
        );
        assert_eq!(PostingService::resolve_carry_forward(Some(dec!(0))), dec!(0));
        assert_eq!(
            PostingService::resolve_carry_forward(Some(dec!(-250))),
            dec!(0)
        );
    }

    #[test]
    fn test_payable_quote() {
        let quote = PostingService::payable(dec!(1000), Some(dec!(400))).unwrap();
        assert_eq!(quote.base_amount, dec!(1000));
        assert_eq!(quote.carry_forward, dec!(400));
        assert_eq!(quote.total_payable, dec!(1400));
    }

    #[test]
    fn test_payable_rejects_negative_base() {
        assert!(matches!(
            PostingService::payable(dec!(-1), None),
            Err(MaintenanceError::NegativeBaseAmount)
        ));
    }

    #[test]
    fn test_post_partial_payment() {
        let charge = PostingService::post(dec!(1000), dec!(600), None).unwrap();
        assert_eq!(charge.amount, dec!(1000));
        assert_eq!(charge.dues, dec!(400));
        assert_eq!(charge.status, PaymentStatus::Partial);
    }

    #[test]
    fn test_post_nothing_paid_is_due() {
        let charge = PostingService::post(dec!(1000), dec!(0), None).unwrap();
        assert_eq!(charge.dues, dec!(1000));
        assert_eq!(charge.status, PaymentStatus::Due);
    }

    #[test]
    fn test_post_exact_payment_is_paid() {
        let charge = PostingService::post(dec!(1000), dec!(1000), None).unwrap();
        assert_eq!(charge.dues, dec!(0));
        assert_eq!(charge.status, PaymentStatus::Paid);
    }

    #[test]
    fn test_post_overpayment_clamps_dues() {
        let charge = PostingService::post(dec!(1000), dec!(1500), None).unwrap();
        assert_eq!(charge.dues, dec!(0));
        assert_eq!(charge.status, PaymentStatus::Paid);
    }

    #[test]
    fn test_post_rejects_negative_amounts() {
        assert!(matches!(
            PostingService::post(dec!(-1), dec!(0), None),
            Err(MaintenanceError::NegativeBaseAmount)
        ));
        assert!(matches!(
            PostingService::post(dec!(100), dec!(-1), None),
            Err(MaintenanceError::NegativePaidAmount)
        ));
    }

    /// The three-month scenario: partial, catch-up, then unpaid.
    #[test]
    fn test_dues_propagate_across_months() {
        // 2024-01: base 1000, paid 600
        let jan = PostingService::post(dec!(1000), dec!(600), None).unwrap();
        assert_eq!(jan.amount, dec!(1000));
        assert_eq!(jan.dues, dec!(400));
        assert_eq!(jan.status, PaymentStatus::Partial);

        // 2024-02: base 1000, paid 1400, carries January's 400
        let feb = PostingService::post(dec!(1000), dec!(1400), Some(jan.dues)).unwrap();
        assert_eq!(feb.carry_forward, dec!(400));
        assert_eq!(feb.amount, dec!(1400));
        assert_eq!(feb.dues, dec!(0));
        assert_eq!(feb.status, PaymentStatus::Paid);

        // 2024-03: base 1000, paid 0, no carry from a settled month
        let mar = PostingService::post(dec!(1000), dec!(0), Some(feb.dues)).unwrap();
        assert_eq!(mar.carry_forward, dec!(0));
        assert_eq!(mar.amount, dec!(1000));
        assert_eq!(mar.dues, dec!(1000));
        assert_eq!(mar.status, PaymentStatus::Due);
    }

    #[test]
    fn test_correction_recomputes_when_both_present() {
        let patch = ChargePatch {
            amount: Some(dec!(1000)),
            paid_amount: Some(dec!(400)),
        };
        let correction = PostingService::apply_correction(&patch).unwrap();
        assert_eq!(correction.dues, dec!(600));
        assert_eq!(correction.status, PaymentStatus::Partial);
    }

    #[test]
    fn test_correction_allows_negative_dues() {
        // Overpayment on the correction path is NOT clamped.
        let patch = ChargePatch {
            amount: Some(dec!(1000)),
            paid_amount: Some(dec!(1300)),
        };
        let correction = PostingService::apply_correction(&patch).unwrap();
        assert_eq!(correction.dues, dec!(-300));
        assert_eq!(correction.status, PaymentStatus::Paid);
    }

    #[test]
    fn test_correction_zero_paid_is_due() {
        let patch = ChargePatch {
            amount: Some(dec!(1000)),
            paid_amount: Some(dec!(0)),
        };
        let correction = PostingService::apply_correction(&patch).unwrap();
        assert_eq!(correction.dues, dec!(1000));
        assert_eq!(correction.status, PaymentStatus::Due);
    }

    #[test]
    fn test_correction_skipped_when_field_missing() {
        assert!(
            PostingService::apply_correction(&ChargePatch {
                amount: Some(dec!(1000)),
                paid_amount: None,
            })
            .is_none()
        );
        assert!(
            PostingService::apply_correction(&ChargePatch {
                amount: None,
                paid_amount: Some(dec!(500)),
            })
            .is_none()
        );
    }
}
