//! Fund aggregation over maintenance charges.
//!
//! Read-only arithmetic for dashboard-style queries: cumulative collected
//! fund, cumulative outstanding dues. The repository layer supplies the
//! record rows and applies the recent-transaction ordering
//! (`created_at DESC, id DESC`) in SQL.

use rust_decimal::Decimal;
use serde::Serialize;

/// Number of records shown in the recent-transactions view.
pub const RECENT_TRANSACTION_LIMIT: u64 = 10;

/// The monetary fields of one charge, as needed for aggregation.
#[derive(Debug, Clone, Copy)]
pub struct ChargeTotals {
    /// Amount paid against the charge.
    pub paid_amount: Decimal,
    /// Outstanding balance on the charge.
    pub dues: Decimal,
}

/// Aggregated fund state for a set of charges.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct FundSummary {
    /// Sum of `paid_amount` over all matching charges.
    pub total_fund: Decimal,
    /// Sum of `dues` over all matching charges.
    pub total_remaining: Decimal,
}

impl FundSummary {
    /// Sums paid amounts and dues across the given charges.
    #[must_use]
    pub fn from_totals<I>(charges: I) -> Self
    where
        I: IntoIterator<Item = ChargeTotals>,
    {
        let mut total_fund = Decimal::ZERO;
        let mut total_remaining = Decimal::ZERO;

        for charge in charges {
            total_fund += charge.paid_amount;
            total_remaining += charge.dues;
        }

        Self {
            total_fund,
            total_remaining,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    fn charge(paid: Decimal, dues: Decimal) -> ChargeTotals {
        ChargeTotals {
            paid_amount: paid,
            dues,
        }
    }

    #[test]
    fn test_empty_summary_is_zero() {
        let summary = FundSummary::from_totals(std::iter::empty());
        assert_eq!(summary.total_fund, dec!(0));
        assert_eq!(summary.total_remaining, dec!(0));
    }

    #[test]
    fn test_summary_sums_all_records() {
        let summary = FundSummary::from_totals(vec![
            charge(dec!(600), dec!(400)),
            charge(dec!(1400), dec!(0)),
            charge(dec!(0), dec!(1000)),
        ]);

        assert_eq!(summary.total_fund, dec!(2000));
        assert_eq!(summary.total_remaining, dec!(1400));
    }

    #[test]
    fn test_summary_matches_direct_enumeration() {
        let records = vec![
            charge(dec!(100.50), dec!(0)),
            charge(dec!(250), dec!(49.50)),
            charge(dec!(0), dec!(300)),
            charge(dec!(75.25), dec!(24.75)),
        ];

        let expected_fund: Decimal = records.iter().map(|r| r.paid_amount).sum();
        let expected_remaining: Decimal = records.iter().map(|r| r.dues).sum();

        let summary = FundSummary::from_totals(records);
        assert_eq!(summary.total_fund, expected_fund);
        assert_eq!(summary.total_remaining, expected_remaining);
    }

    #[test]
    fn test_negative_dues_reduce_remaining() {
        // A corrected (overpaid) record carries negative dues into the sum.
        let summary = FundSummary::from_totals(vec![
            charge(dec!(1300), dec!(-300)),
            charge(dec!(0), dec!(1000)),
        ]);

        assert_eq!(summary.total_fund, dec!(1300));
        assert_eq!(summary.total_remaining, dec!(700));
    }
}
