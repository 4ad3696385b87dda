//! Maintenance ledger logic.
//!
//! This module implements the core maintenance-fee functionality:
//! - Billing periods and payment status
//! - Dues carry-forward resolution
//! - Payment posting and status derivation
//! - Ledger corrections
//! - Fund aggregation
//! - Error types for ledger operations

pub mod error;
pub mod fund;
pub mod posting;
pub mod types;

#[cfg(test)]
mod posting_props;

pub use error::MaintenanceError;
pub use fund::{ChargeTotals, FundSummary, RECENT_TRANSACTION_LIMIT};
pub use posting::PostingService;
pub use types::{ChargePatch, Correction, PayableQuote, PaymentStatus, Period, PostedCharge};
