//! Apartment repository for database operations.

use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, DbErr, EntityTrait, QueryFilter,
    QueryOrder, Set, SqlErr,
    sea_query::Expr,
};
use uuid::Uuid;

use crate::entities::{apartments, sea_orm_active_enums::AccountStatus};

/// Error types for apartment operations.
#[derive(Debug, thiserror::Error)]
pub enum ApartmentError {
    /// Apartment not found.
    #[error("Apartment not found: {0}")]
    NotFound(Uuid),

    /// Email is already registered.
    #[error("Email already registered: {0}")]
    EmailTaken(String),

    /// Database error.
    #[error("Database error: {0}")]
    Database(#[from] DbErr),
}

/// Input for registering an apartment.
#[derive(Debug, Clone)]
pub struct CreateApartmentInput {
    pub name: String,
    pub email: String,
    pub password_hash: String,
    pub contact: String,
    pub address: String,
}

/// Field changes for an apartment profile update.
#[derive(Debug, Clone, Default)]
pub struct ApartmentChanges {
    pub name: Option<String>,
    pub contact: Option<String>,
    pub address: Option<String>,
    pub status: Option<AccountStatus>,
}

/// Apartment repository for CRUD operations.
#[derive(Debug, Clone)]
pub struct ApartmentRepository {
    db: DatabaseConnection,
}

impl ApartmentRepository {
    /// Creates a new apartment repository.
    #[must_use]
    pub const fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    /// Registers a new apartment account.
    ///
    /// # Errors
    ///
    /// Returns `EmailTaken` if the email is already registered, or a
    /// database error if the insert fails.
    pub async fn create(
        &self,
        input: CreateApartmentInput,
    ) -> Result<apartments::Model, ApartmentError> {
        let now = chrono::Utc::now().into();
        let apartment = apartments::ActiveModel {
            id: Set(Uuid::new_v4()),
            name: Set(input.name),
            email: Set(input.email.clone()),
            password_hash: Set(input.password_hash),
            contact: Set(input.contact),
            address: Set(input.address),
            status: Set(AccountStatus::Active),
            created_at: Set(now),
            updated_at: Set(now),
        };

        match apartment.insert(&self.db).await {
            Ok(model) => Ok(model),
            Err(err) if is_unique_violation(&err) => Err(ApartmentError::EmailTaken(input.email)),
            Err(err) => Err(err.into()),
        }
    }

    /// Finds an apartment by ID.
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails.
    pub async fn find_by_id(&self, id: Uuid) -> Result<Option<apartments::Model>, DbErr> {
        apartments::Entity::find_by_id(id).one(&self.db).await
    }

    /// Finds an apartment by login email.
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails.
    pub async fn find_by_email(&self, email: &str) -> Result<Option<apartments::Model>, DbErr> {
        apartments::Entity::find()
            .filter(apartments::Column::Email.eq(email))
            .one(&self.db)
            .await
    }

    /// Lists all apartments, newest first.
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails.
    pub async fn list_all(&self) -> Result<Vec<apartments::Model>, DbErr> {
        apartments::Entity::find()
            .order_by_desc(apartments::Column::CreatedAt)
            .all(&self.db)
            .await
    }

    /// Searches apartments by name, case-insensitively.
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails.
    pub async fn search_by_name(&self, keyword: &str) -> Result<Vec<apartments::Model>, DbErr> {
        apartments::Entity::find()
            .filter(Expr::cust_with_values(
                "name ILIKE ?",
                [format!("%{keyword}%")],
            ))
            .order_by_desc(apartments::Column::CreatedAt)
            .all(&self.db)
            .await
    }

    /// Updates an apartment's profile fields.
    ///
    /// # Errors
    ///
    /// Returns `NotFound` if no apartment has the given ID, or a
    /// database error if the update fails.
    pub async fn update(
        &self,
        id: Uuid,
        changes: ApartmentChanges,
    ) -> Result<apartments::Model, ApartmentError> {
        let apartment = self
            .find_by_id(id)
            .await?
            .ok_or(ApartmentError::NotFound(id))?;

        let mut active: apartments::ActiveModel = apartment.into();
        if let Some(name) = changes.name {
            active.name = Set(name);
        }
        if let Some(contact) = changes.contact {
            active.contact = Set(contact);
        }
        if let Some(address) = changes.address {
            active.address = Set(address);
        }
        if let Some(status) = changes.status {
            active.status = Set(status);
        }
        active.updated_at = Set(chrono::Utc::now().into());

        Ok(active.update(&self.db).await?)
    }

    /// Deletes an apartment and, via cascade, its members, ledger, and
    /// expenses.
    ///
    /// # Errors
    ///
    /// Returns `NotFound` if no apartment has the given ID, or a
    /// database error if the delete fails.
    pub async fn delete(&self, id: Uuid) -> Result<(), ApartmentError> {
        let apartment = self
            .find_by_id(id)
            .await?
            .ok_or(ApartmentError::NotFound(id))?;

        apartments::Entity::delete_by_id(apartment.id)
            .exec(&self.db)
            .await?;

        Ok(())
    }
}

fn is_unique_violation(err: &DbErr) -> bool {
    matches!(err.sql_err(), Some(SqlErr::UniqueConstraintViolation(_)))
}
