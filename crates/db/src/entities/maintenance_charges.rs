//! `SeaORM` Entity for the maintenance_charges ledger table.
//!
//! One row per member per billing period, enforced by a
//! `UNIQUE (member_id, period)` constraint.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

use super::sea_orm_active_enums::PaymentStatus;

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Eq, Serialize, Deserialize)]
#[sea_orm(table_name = "maintenance_charges")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    pub apartment_id: Uuid,
    pub member_id: Uuid,
    /// Billing period in `YYYY-MM` form; lexicographic order is chronological.
    pub period: String,
    #[sea_orm(column_type = "Decimal(Some((14, 2)))")]
    pub amount: Decimal,
    #[sea_orm(column_type = "Decimal(Some((14, 2)))")]
    pub carry_forward: Decimal,
    #[sea_orm(column_type = "Decimal(Some((14, 2)))")]
    pub paid_amount: Decimal,
    #[sea_orm(column_type = "Decimal(Some((14, 2)))")]
    pub dues: Decimal,
    pub status: PaymentStatus,
    pub created_at: DateTimeWithTimeZone,
    pub updated_at: DateTimeWithTimeZone,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::apartments::Entity",
        from = "Column::ApartmentId",
        to = "super::apartments::Column::Id"
    )]
    Apartments,
    #[sea_orm(
        belongs_to = "super::members::Entity",
        from = "Column::MemberId",
        to = "super::members::Column::Id"
    )]
    Members,
}

impl Related<super::apartments::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Apartments.def()
    }
}

impl Related<super::members::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Members.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
