//! Authentication types for JWT and account requests.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// The kind of account a token was issued for.
pub mod account_kind {
    /// Apartment (society) account.
    pub const APARTMENT: &str = "apartment";
    /// Resident member account.
    pub const MEMBER: &str = "member";
}

/// JWT claims for access and refresh tokens.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claims {
    /// Subject (account ID).
    pub sub: Uuid,
    /// Apartment ID (the owning society; equals `sub` for apartment accounts).
    pub apt: Uuid,
    /// Account kind ("apartment" or "member").
    pub kind: String,
    /// Issued at timestamp.
    pub iat: i64,
    /// Expiration timestamp.
    pub exp: i64,
}

impl Claims {
    /// Creates new claims for an account.
    #[must_use]
    pub fn new(
        account_id: Uuid,
        apartment_id: Uuid,
        kind: &str,
        expires_at: DateTime<Utc>,
    ) -> Self {
        let now = Utc::now();
        Self {
            sub: account_id,
            apt: apartment_id,
            kind: kind.to_string(),
            iat: now.timestamp(),
            exp: expires_at.timestamp(),
        }
    }

    /// Returns the account ID from claims.
    #[must_use]
    pub const fn account_id(&self) -> Uuid {
        self.sub
    }

    /// Returns the apartment ID from claims.
    #[must_use]
    pub const fn apartment_id(&self) -> Uuid {
        self.apt
    }

    /// Returns true if the token belongs to an apartment account.
    #[must_use]
    pub fn is_apartment(&self) -> bool {
        self.kind == account_kind::APARTMENT
    }
}

/// Token pair returned after successful authentication.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TokenPair {
    /// Access token (short-lived).
    pub access_token: String,
    /// Refresh token (long-lived).
    pub refresh_token: String,
    /// Access token expiration in seconds.
    pub expires_in: i64,
}

impl TokenPair {
    /// Creates a new token pair.
    #[must_use]
    pub fn new(access_token: String, refresh_token: String, expires_in: i64) -> Self {
        Self {
            access_token,
            refresh_token,
            expires_in,
        }
    }
}

/// Login request payload (apartment or member).
#[derive(Debug, Clone, Deserialize)]
pub struct LoginRequest {
    /// Account email.
    pub email: String,
    /// Account password.
    pub password: String,
}

/// Apartment registration request payload.
#[derive(Debug, Clone, Deserialize)]
pub struct RegisterApartmentRequest {
    /// Apartment (society) name.
    pub name: String,
    /// Login email.
    pub email: String,
    /// Plaintext password (hashed before storage).
    pub password: String,
    /// Contact number.
    pub contact: String,
    /// Postal address.
    pub address: String,
}

/// Member registration request payload.
#[derive(Debug, Clone, Deserialize)]
pub struct RegisterMemberRequest {
    /// Owning apartment ID.
    pub apartment_id: Uuid,
    /// Member name.
    pub name: String,
    /// Login email.
    pub email: String,
    /// Plaintext password (hashed before storage).
    pub password: String,
    /// Contact number.
    pub contact: String,
    /// Postal address.
    pub address: String,
    /// Nominal monthly maintenance rate.
    #[serde(default)]
    pub maintenance_rate: Decimal,
}

/// Apartment profile update payload (all fields optional).
#[derive(Debug, Clone, Default, Deserialize)]
pub struct UpdateApartmentRequest {
    /// New name.
    pub name: Option<String>,
    /// New contact number.
    pub contact: Option<String>,
    /// New postal address.
    pub address: Option<String>,
    /// New status.
    pub status: Option<String>,
}

/// Member profile update payload (all fields optional).
///
/// Setting `status` to `inactive` is gated on the member's ledger:
/// a member whose latest maintenance record still carries dues is
/// rejected.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct UpdateMemberRequest {
    /// New name.
    pub name: Option<String>,
    /// New contact number.
    pub contact: Option<String>,
    /// New postal address.
    pub address: Option<String>,
    /// New profile image URL.
    pub image_url: Option<String>,
    /// New status ("active" or "inactive").
    pub status: Option<String>,
    /// New nominal monthly maintenance rate.
    pub maintenance_rate: Option<Decimal>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_claims_accessors() {
        let account = Uuid::new_v4();
        let apartment = Uuid::new_v4();
        let claims = Claims::new(
            account,
            apartment,
            account_kind::MEMBER,
            Utc::now() + chrono::Duration::minutes(15),
        );

        assert_eq!(claims.account_id(), account);
        assert_eq!(claims.apartment_id(), apartment);
        assert!(!claims.is_apartment());
    }

    #[test]
    fn test_apartment_claims_self_reference() {
        let apartment = Uuid::new_v4();
        let claims = Claims::new(
            apartment,
            apartment,
            account_kind::APARTMENT,
            Utc::now() + chrono::Duration::minutes(15),
        );

        assert!(claims.is_apartment());
        assert_eq!(claims.account_id(), claims.apartment_id());
    }
}
