//! Expense repository for apartment outflow records.

use chrono::NaiveDate;
use rust_decimal::Decimal;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, DbErr, EntityTrait, QueryFilter,
    QueryOrder, Set,
};
use uuid::Uuid;

use crate::entities::expenses;

/// Input for recording an expense.
#[derive(Debug, Clone)]
pub struct CreateExpenseInput {
    pub apartment_id: Uuid,
    pub description: String,
    pub amount: Decimal,
    pub spent_on: NaiveDate,
}

/// Expense repository.
#[derive(Debug, Clone)]
pub struct ExpenseRepository {
    db: DatabaseConnection,
}

impl ExpenseRepository {
    /// Creates a new expense repository.
    #[must_use]
    pub const fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    /// Records an expense against an apartment's fund.
    ///
    /// # Errors
    ///
    /// Returns an error if the database insert fails.
    pub async fn create(&self, input: CreateExpenseInput) -> Result<expenses::Model, DbErr> {
        let expense = expenses::ActiveModel {
            id: Set(Uuid::new_v4()),
            apartment_id: Set(input.apartment_id),
            description: Set(input.description),
            amount: Set(input.amount),
            spent_on: Set(input.spent_on),
            created_at: Set(chrono::Utc::now().into()),
        };

        expense.insert(&self.db).await
    }

    /// Lists an apartment's expenses, most recent spend date first.
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails.
    pub async fn list_by_apartment(
        &self,
        apartment_id: Uuid,
    ) -> Result<Vec<expenses::Model>, DbErr> {
        expenses::Entity::find()
            .filter(expenses::Column::ApartmentId.eq(apartment_id))
            .order_by_desc(expenses::Column::SpentOn)
            .order_by_desc(expenses::Column::CreatedAt)
            .all(&self.db)
            .await
    }
}
