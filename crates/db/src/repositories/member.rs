//! Member repository for database operations.

use rust_decimal::Decimal;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, DbErr, EntityTrait, QueryFilter,
    QueryOrder, Set, SqlErr,
    sea_query::Expr,
};
use uuid::Uuid;

use crate::entities::{members, sea_orm_active_enums::AccountStatus};

/// Error types for member operations.
#[derive(Debug, thiserror::Error)]
pub enum MemberError {
    /// Member not found.
    #[error("Member not found: {0}")]
    NotFound(Uuid),

    /// Email is already registered.
    #[error("Email already registered: {0}")]
    EmailTaken(String),

    /// Member still owes dues and cannot be deactivated.
    #[error("Member has outstanding dues of {0}")]
    OutstandingDues(Decimal),

    /// Database error.
    #[error("Database error: {0}")]
    Database(#[from] DbErr),
}

/// Input for registering a member under an apartment.
#[derive(Debug, Clone)]
pub struct CreateMemberInput {
    pub apartment_id: Uuid,
    pub name: String,
    pub email: String,
    pub password_hash: String,
    pub contact: String,
    pub address: String,
    pub maintenance_rate: Decimal,
}

/// Field changes for a member profile update.
///
/// `status` transitions are validated by the caller against the
/// member's ledger before reaching the repository.
#[derive(Debug, Clone, Default)]
pub struct MemberChanges {
    pub name: Option<String>,
    pub contact: Option<String>,
    pub address: Option<String>,
    pub image_url: Option<String>,
    pub status: Option<AccountStatus>,
    pub maintenance_rate: Option<Decimal>,
}

/// Member repository for CRUD operations.
#[derive(Debug, Clone)]
pub struct MemberRepository {
    db: DatabaseConnection,
}

impl MemberRepository {
    /// Creates a new member repository.
    #[must_use]
    pub const fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    /// Registers a new member account.
    ///
    /// # Errors
    ///
    /// Returns `EmailTaken` if the email is already registered, or a
    /// database error if the insert fails.
    pub async fn create(&self, input: CreateMemberInput) -> Result<members::Model, MemberError> {
        let now = chrono::Utc::now().into();
        let member = members::ActiveModel {
            id: Set(Uuid::new_v4()),
            apartment_id: Set(input.apartment_id),
            name: Set(input.name),
            email: Set(input.email.clone()),
            password_hash: Set(input.password_hash),
            contact: Set(input.contact),
            address: Set(input.address),
            image_url: Set(None),
            status: Set(AccountStatus::Active),
            maintenance_rate: Set(input.maintenance_rate),
            created_at: Set(now),
            updated_at: Set(now),
        };

        match member.insert(&self.db).await {
            Ok(model) => Ok(model),
            Err(err) if is_unique_violation(&err) => Err(MemberError::EmailTaken(input.email)),
            Err(err) => Err(err.into()),
        }
    }

    /// Finds a member by ID.
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails.
    pub async fn find_by_id(&self, id: Uuid) -> Result<Option<members::Model>, DbErr> {
        members::Entity::find_by_id(id).one(&self.db).await
    }

    /// Finds a member by login email.
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails.
    pub async fn find_by_email(&self, email: &str) -> Result<Option<members::Model>, DbErr> {
        members::Entity::find()
            .filter(members::Column::Email.eq(email))
            .one(&self.db)
            .await
    }

    /// Lists all members, newest first.
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails.
    pub async fn list_all(&self) -> Result<Vec<members::Model>, DbErr> {
        members::Entity::find()
            .order_by_desc(members::Column::CreatedAt)
            .all(&self.db)
            .await
    }

    /// Lists an apartment's members, newest first.
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails.
    pub async fn list_by_apartment(
        &self,
        apartment_id: Uuid,
    ) -> Result<Vec<members::Model>, DbErr> {
        members::Entity::find()
            .filter(members::Column::ApartmentId.eq(apartment_id))
            .order_by_desc(members::Column::CreatedAt)
            .all(&self.db)
            .await
    }

    /// Searches members by name, case-insensitively.
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails.
    pub async fn search_by_name(&self, keyword: &str) -> Result<Vec<members::Model>, DbErr> {
        members::Entity::find()
            .filter(Expr::cust_with_values(
                "name ILIKE ?",
                [format!("%{keyword}%")],
            ))
            .order_by_desc(members::Column::CreatedAt)
            .all(&self.db)
            .await
    }

    /// Updates a member's profile fields.
    ///
    /// # Errors
    ///
    /// Returns `NotFound` if no member has the given ID, or a database
    /// error if the update fails.
    pub async fn update(
        &self,
        id: Uuid,
        changes: MemberChanges,
    ) -> Result<members::Model, MemberError> {
        let member = self.find_by_id(id).await?.ok_or(MemberError::NotFound(id))?;

        let mut active: members::ActiveModel = member.into();
        if let Some(name) = changes.name {
            active.name = Set(name);
        }
        if let Some(contact) = changes.contact {
            active.contact = Set(contact);
        }
        if let Some(address) = changes.address {
            active.address = Set(address);
        }
        if let Some(image_url) = changes.image_url {
            active.image_url = Set(Some(image_url));
        }
        if let Some(status) = changes.status {
            active.status = Set(status);
        }
        if let Some(rate) = changes.maintenance_rate {
            active.maintenance_rate = Set(rate);
        }
        active.updated_at = Set(chrono::Utc::now().into());

        Ok(active.update(&self.db).await?)
    }

    /// Deletes a member.
    ///
    /// # Errors
    ///
    /// Returns `NotFound` if no member has the given ID, or a database
    /// error if the delete fails.
    pub async fn delete(&self, id: Uuid) -> Result<(), MemberError> {
        let member = self.find_by_id(id).await?.ok_or(MemberError::NotFound(id))?;

        members::Entity::delete_by_id(member.id)
            .exec(&self.db)
            .await?;

        Ok(())
    }
}

fn is_unique_violation(err: &DbErr) -> bool {
    matches!(err.sql_err(), Some(SqlErr::UniqueConstraintViolation(_)))
}
