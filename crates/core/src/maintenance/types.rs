//! Maintenance ledger domain types.
//!
//! This module defines the types used for posting maintenance payments
//! and deriving dues and payment status.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::error::MaintenanceError;

/// A calendar billing period in `YYYY-MM` format.
///
/// Periods are totally ordered; because the month is zero-padded,
/// lexicographic order equals chronological order. One ledger record
/// exists per member per period.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Period(String);

impl Period {
    /// Parses and validates a `YYYY-MM` period string.
    ///
    /// # Errors
    ///
    /// Returns `MaintenanceError::InvalidPeriod` if the string is empty,
    /// malformed, or names a month outside `01..=12`.
    pub fn parse(s: &str) -> Result<Self, MaintenanceError> {
        let invalid = || MaintenanceError::InvalidPeriod(s.to_string());

        let (year, month) = s.split_once('-').ok_or_else(invalid)?;
        if year.len() != 4 || !year.bytes().all(|b| b.is_ascii_digit()) {
            return Err(invalid());
        }
        if month.len() != 2 || !month.bytes().all(|b| b.is_ascii_digit()) {
            return Err(invalid());
        }
        let month_num: u8 = month.parse().map_err(|_| invalid())?;
        if !(1..=12).contains(&month_num) {
            return Err(invalid());
        }

        Ok(Self(s.to_string()))
    }

    /// Returns the period as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Returns the next chronological period.
    #[must_use]
    pub fn next(&self) -> Self {
        // Validated at construction, so the split cannot fail.
        let (year, month) = self.0.split_once('-').unwrap_or(("0000", "01"));
        let year: u32 = year.parse().unwrap_or(0);
        let month: u8 = month.parse().unwrap_or(1);

        if month == 12 {
            Self(format!("{:04}-01", year + 1))
        } else {
            Self(format!("{year:04}-{:02}", month + 1))
        }
    }
}

impl std::fmt::Display for Period {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl std::str::FromStr for Period {
    type Err = MaintenanceError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl TryFrom<String> for Period {
    type Error = MaintenanceError;

    fn try_from(s: String) -> Result<Self, Self::Error> {
        Self::parse(&s)
    }
}

impl From<Period> for String {
    fn from(period: Period) -> Self {
        period.0
    }
}

/// Payment status of a maintenance charge.
///
/// Exactly one status applies to any (total payable, paid amount) pair.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PaymentStatus {
    /// Fully settled; dues are zero (or the payment ran ahead).
    Paid,
    /// Partially settled; some payment was made but dues remain.
    Partial,
    /// Nothing paid; the full amount is outstanding.
    Due,
}

impl PaymentStatus {
    /// Returns true if the charge is fully settled.
    #[must_use]
    pub const fn is_settled(&self) -> bool {
        matches!(self, Self::Paid)
    }
}

impl std::fmt::Display for PaymentStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Paid => write!(f, "paid"),
            Self::Partial => write!(f, "partial"),
            Self::Due => write!(f, "due"),
        }
    }
}

/// Quote for what a member owes in a period before posting.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct PayableQuote {
    /// The charge for this period, excluding carry-forward.
    pub base_amount: Decimal,
    /// Unpaid balance carried from the nearest earlier period.
    pub carry_forward: Decimal,
    /// `base_amount + carry_forward`.
    pub total_payable: Decimal,
}

/// A fully derived maintenance charge, ready for persistence.
///
/// Produced by `PostingService::post`; `dues` is clamped at zero on
/// this path (overpayment is absorbed as `Paid`).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PostedCharge {
    /// Total payable: base amount plus carry-forward.
    pub amount: Decimal,
    /// Carry-forward component fixed at post time.
    pub carry_forward: Decimal,
    /// Amount paid against this charge.
    pub paid_amount: Decimal,
    /// Outstanding balance, `max(amount - paid_amount, 0)`.
    pub dues: Decimal,
    /// Derived payment status.
    pub status: PaymentStatus,
}

/// Typed patch for correcting an existing charge.
///
/// Only `amount` and `paid_amount` are updatable; identity fields
/// (member, period, creation time) are not expressible here.
#[derive(Debug, Clone, Copy, Default, Deserialize)]
pub struct ChargePatch {
    /// New total payable amount.
    pub amount: Option<Decimal>,
    /// New paid amount.
    pub paid_amount: Option<Decimal>,
}

impl ChargePatch {
    /// Returns true if the patch supplies both fields and therefore
    /// triggers dues/status recomputation.
    #[must_use]
    pub const fn recomputes(&self) -> bool {
        self.amount.is_some() && self.paid_amount.is_some()
    }

    /// Returns true if the patch changes nothing.
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.amount.is_none() && self.paid_amount.is_none()
    }
}

/// Recomputed dues and status for a correction.
///
/// Unlike posting, `dues` is NOT clamped here: a correction can leave
/// dues negative, representing overpayment or advance.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Correction {
    /// `amount - paid_amount`, possibly negative.
    pub dues: Decimal,
    /// Re-derived payment status.
    pub status: PaymentStatus,
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[test]
    fn test_period_parse_valid() {
        let p = Period::parse("2024-01").unwrap();
        assert_eq!(p.as_str(), "2024-01");
        assert_eq!(p.to_string(), "2024-01");
    }

    #[rstest]
    #[case("")]
    #[case("2024")]
    #[case("2024-13")]
    #[case("2024-00")]
    #[case("24-01")]
    #[case("2024-1")]
    #[case("2024/01")]
    fn test_period_parse_invalid(#[case] input: &str) {
        assert!(
            matches!(Period::parse(input), Err(MaintenanceError::InvalidPeriod(_))),
            "expected {input:?} to be rejected"
        );
    }

    #[test]
    fn test_period_ordering_is_chronological() {
        let jan = Period::parse("2024-01").unwrap();
        let feb = Period::parse("2024-02").unwrap();
        let dec_prior = Period::parse("2023-12").unwrap();

        assert!(dec_prior < jan);
        assert!(jan < feb);
    }

    #[test]
    fn test_period_next() {
        assert_eq!(
            Period::parse("2024-01").unwrap().next(),
            Period::parse("2024-02").unwrap()
        );
        assert_eq!(
            Period::parse("2024-12").unwrap().next(),
            Period::parse("2025-01").unwrap()
        );
    }

    #[test]
    fn test_charge_patch_recomputes() {
        use rust_decimal_macros::dec;

        assert!(!ChargePatch::default().recomputes());
        assert!(ChargePatch::default().is_empty());
        assert!(
            !ChargePatch {
                amount: Some(dec!(100)),
                paid_amount: None,
            }
            .recomputes()
        );
        assert!(
            ChargePatch {
                amount: Some(dec!(100)),
                paid_amount: Some(dec!(50)),
            }
            .recomputes()
        );
    }
}
