//! `SeaORM` entity definitions.

pub mod apartments;
pub mod expenses;
pub mod maintenance_charges;
pub mod members;
pub mod sea_orm_active_enums;
