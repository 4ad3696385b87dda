//! Maintenance ledger error types.

use thiserror::Error;
use uuid::Uuid;

/// Errors that can occur during maintenance ledger operations.
#[derive(Debug, Error)]
pub enum MaintenanceError {
    /// A required input field is absent or empty.
    #[error("Missing required field: {0}")]
    MissingField(&'static str),

    /// The period string is not a valid `YYYY-MM` value.
    #[error("Invalid period: {0:?} (expected YYYY-MM)")]
    InvalidPeriod(String),

    /// Base amount cannot be negative.
    #[error("Base amount cannot be negative")]
    NegativeBaseAmount,

    /// Paid amount cannot be negative.
    #[error("Paid amount cannot be negative")]
    NegativePaidAmount,

    /// A charge already exists for this member and period.
    #[error("Payment already posted for member {member_id} in period {period}")]
    DuplicatePosting {
        /// The member the posting was for.
        member_id: Uuid,
        /// The period that is already recorded.
        period: String,
    },

    /// The referenced charge does not exist.
    #[error("Maintenance charge not found: {0}")]
    ChargeNotFound(Uuid),

    /// Storage-level failure, surfaced unchanged to the caller.
    #[error("Storage failure: {0}")]
    Storage(String),
}

impl MaintenanceError {
    /// Returns the error code for API responses.
    #[must_use]
    pub const fn error_code(&self) -> &'static str {
        match self {
            Self::MissingField(_) => "MISSING_FIELD",
            Self::InvalidPeriod(_) => "INVALID_PERIOD",
            Self::NegativeBaseAmount => "NEGATIVE_BASE_AMOUNT",
            Self::NegativePaidAmount => "NEGATIVE_PAID_AMOUNT",
            Self::DuplicatePosting { .. } => "DUPLICATE_POSTING",
            Self::ChargeNotFound(_) => "CHARGE_NOT_FOUND",
            Self::Storage(_) => "STORAGE_FAILURE",
        }
    }

    /// Returns the HTTP status code for this error.
    #[must_use]
    pub const fn http_status_code(&self) -> u16 {
        match self {
            // 400 Bad Request - caller-correctable
            Self::MissingField(_)
            | Self::InvalidPeriod(_)
            | Self::NegativeBaseAmount
            | Self::NegativePaidAmount
            | Self::DuplicatePosting { .. } => 400,

            // 404 Not Found
            Self::ChargeNotFound(_) => 404,

            // 500 Internal Server Error
            Self::Storage(_) => 500,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_codes() {
        assert_eq!(
            MaintenanceError::MissingField("period").error_code(),
            "MISSING_FIELD"
        );
        assert_eq!(
            MaintenanceError::DuplicatePosting {
                member_id: Uuid::nil(),
                period: "2024-01".to_string(),
            }
            .error_code(),
            "DUPLICATE_POSTING"
        );
        assert_eq!(
            MaintenanceError::ChargeNotFound(Uuid::nil()).error_code(),
            "CHARGE_NOT_FOUND"
        );
        assert_eq!(
            MaintenanceError::Storage("boom".to_string()).error_code(),
            "STORAGE_FAILURE"
        );
    }

    #[test]
    fn test_http_status_codes() {
        assert_eq!(
            MaintenanceError::MissingField("period").http_status_code(),
            400
        );
        assert_eq!(
            MaintenanceError::InvalidPeriod("nope".to_string()).http_status_code(),
            400
        );
        assert_eq!(
            MaintenanceError::DuplicatePosting {
                member_id: Uuid::nil(),
                period: "2024-01".to_string(),
            }
            .http_status_code(),
            400
        );
        assert_eq!(
            MaintenanceError::ChargeNotFound(Uuid::nil()).http_status_code(),
            404
        );
        assert_eq!(
            MaintenanceError::Storage("boom".to_string()).http_status_code(),
            500
        );
    }

    #[test]
    fn test_error_display() {
        let err = MaintenanceError::DuplicatePosting {
            member_id: Uuid::nil(),
            period: "2024-01".to_string(),
        };
        assert_eq!(
            err.to_string(),
            "Payment already posted for member 00000000-0000-0000-0000-000000000000 in period 2024-01"
        );
    }
}
