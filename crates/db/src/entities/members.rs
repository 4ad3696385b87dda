//! `SeaORM` Entity for members table.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

use super::sea_orm_active_enums::AccountStatus;

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Eq, Serialize, Deserialize)]
#[sea_orm(table_name = "members")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    pub apartment_id: Uuid,
    pub name: String,
    #[sea_orm(unique)]
    pub email: String,
    pub password_hash: String,
    pub contact: String,
    pub address: String,
    pub image_url: Option<String>,
    pub status: AccountStatus,
    #[sea_orm(column_type = "Decimal(Some((14, 2)))")]
    pub maintenance_rate: Decimal,
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
    #[sea_orm(has_many = "super::maintenance_charges::Entity")]
    MaintenanceCharges,
}

impl Related<super::apartments::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Apartments.def()
    }
}

impl Related<super::maintenance_charges::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::MaintenanceCharges.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
