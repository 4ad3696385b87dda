//! `SeaORM` Entity for expenses table.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Eq, Serialize, Deserialize)]
#[sea_orm(table_name = "expenses")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    pub apartment_id: Uuid,
    pub description: String,
    #[sea_orm(column_type = "Decimal(Some((14, 2)))")]
    pub amount: Decimal,
    pub spent_on: Date,
    pub created_at: DateTimeWithTimeZone,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::apartments::Entity",
        from = "Column::ApartmentId",
        to = "super::apartments::Column::Id"
    )]
    Apartments,
}

impl Related<super::apartments::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Apartments.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
