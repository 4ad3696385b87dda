//! Authentication and password hashing.
//!
//! This module provides:
//! - Password hashing with Argon2id
//! - Password verification
//! - Account status definitions

mod password;

pub use password::{PasswordError, hash_password, verify_password};

use serde::{Deserialize, Serialize};

/// Account status for members and apartments.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AccountStatus {
    /// Account is active and may log in.
    Active,
    /// Account is deactivated; login is rejected.
    Inactive,
}

impl AccountStatus {
    /// Returns true if the account may log in.
    #[must_use]
    pub const fn can_login(&self) -> bool {
        matches!(self, Self::Active)
    }
}

impl std::fmt::Display for AccountStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Active => write!(f, "active"),
            Self::Inactive => write!(f, "inactive"),
        }
    }
}

impl std::str::FromStr for AccountStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "active" => Ok(Self::Active),
            "inactive" => Ok(Self::Inactive),
            other => Err(format!("unknown account status: {other}")),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::str::FromStr;

    #[test]
    fn test_status_login_gate() {
        assert!(AccountStatus::Active.can_login());
        assert!(!AccountStatus::Inactive.can_login());
    }

    #[test]
    fn test_status_round_trip() {
        assert_eq!(
            AccountStatus::from_str("Active").unwrap(),
            AccountStatus::Active
        );
        assert_eq!(
            AccountStatus::from_str("inactive").unwrap(),
            AccountStatus::Inactive
        );
        assert!(AccountStatus::from_str("suspended").is_err());
    }
}
