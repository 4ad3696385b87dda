//! `SeaORM` active enums mapped to PostgreSQL enum types.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// Settlement status of a maintenance charge.
#[derive(Debug, Clone, PartialEq, Eq, EnumIter, DeriveActiveEnum, Serialize, Deserialize)]
#[sea_orm(rs_type = "String", db_type = "Enum", enum_name = "payment_status")]
#[serde(rename_all = "lowercase")]
pub enum PaymentStatus {
    #[sea_orm(string_value = "paid")]
    Paid,
    #[sea_orm(string_value = "partial")]
    Partial,
    #[sea_orm(string_value = "due")]
    Due,
}

/// Lifecycle status of an apartment or member account.
#[derive(Debug, Clone, PartialEq, Eq, EnumIter, DeriveActiveEnum, Serialize, Deserialize)]
#[sea_orm(rs_type = "String", db_type = "Enum", enum_name = "account_status")]
#[serde(rename_all = "lowercase")]
pub enum AccountStatus {
    #[sea_orm(string_value = "active")]
    Active,
    #[sea_orm(string_value = "inactive")]
    Inactive,
}

impl From<strata_core::maintenance::PaymentStatus> for PaymentStatus {
    fn from(status: strata_core::maintenance::PaymentStatus) -> Self {
        match status {
            strata_core::maintenance::PaymentStatus::Paid => Self::Paid,
            strata_core::maintenance::PaymentStatus::Partial => Self::Partial,
            strata_core::maintenance::PaymentStatus::Due => Self::Due,
        }
    }
}

impl From<PaymentStatus> for strata_core::maintenance::PaymentStatus {
    fn from(status: PaymentStatus) -> Self {
        match status {
            PaymentStatus::Paid => Self::Paid,
            PaymentStatus::Partial => Self::Partial,
            PaymentStatus::Due => Self::Due,
        }
    }
}

impl From<strata_core::auth::AccountStatus> for AccountStatus {
    fn from(status: strata_core::auth::AccountStatus) -> Self {
        match status {
            strata_core::auth::AccountStatus::Active => Self::Active,
            strata_core::auth::AccountStatus::Inactive => Self::Inactive,
        }
    }
}

impl From<AccountStatus> for strata_core::auth::AccountStatus {
    fn from(status: AccountStatus) -> Self {
        match status {
            AccountStatus::Active => Self::Active,
            AccountStatus::Inactive => Self::Inactive,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn payment_status_round_trips_through_core() {
        for status in [PaymentStatus::Paid, PaymentStatus::Partial, PaymentStatus::Due] {
            let core: strata_core::maintenance::PaymentStatus = status.clone().into();
            assert_eq!(PaymentStatus::from(core), status);
        }
    }

    #[test]
    fn payment_status_serializes_lowercase() {
        let json = serde_json::to_string(&PaymentStatus::Partial).unwrap();
        assert_eq!(json, "\"partial\"");
    }

    #[test]
    fn account_status_round_trips_through_core() {
        for status in [AccountStatus::Active, AccountStatus::Inactive] {
            let core: strata_core::auth::AccountStatus = status.clone().into();
            assert_eq!(AccountStatus::from(core), status);
        }
    }
}
