//! Maintenance charge repository: the persistent ledger behind posting,
//! corrections, and fund aggregation.

use rust_decimal::Decimal;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, DbErr, EntityTrait, QueryFilter,
    QueryOrder, QuerySelect, Set, SqlErr,
};
use uuid::Uuid;

use strata_core::maintenance::{
    ChargePatch, ChargeTotals, FundSummary, MaintenanceError, Period, PostingService,
    RECENT_TRANSACTION_LIMIT,
};

use crate::entities::maintenance_charges;

/// Input for posting a charge for a member's billing period.
#[derive(Debug, Clone)]
pub struct PostChargeInput {
    /// Apartment the member belongs to.
    pub apartment_id: Uuid,
    /// Member being charged.
    pub member_id: Uuid,
    /// Billing period, `YYYY-MM`.
    pub period: Period,
    /// Base charge for the period, excluding carry-forward.
    pub base_amount: Decimal,
    /// Payment captured with the posting.
    pub paid_amount: Decimal,
}

/// Fund dashboard: running totals plus the most recent ledger activity.
#[derive(Debug, Clone)]
pub struct FundDashboard {
    /// Aggregated collected / outstanding totals.
    pub summary: FundSummary,
    /// Most recent charges, newest first, capped at
    /// `RECENT_TRANSACTION_LIMIT`.
    pub recent_transactions: Vec<maintenance_charges::Model>,
}

/// Collected total for a single billing period.
#[derive(Debug, Clone)]
pub struct PeriodFund {
    /// Sum of `paid_amount` across the period's charges.
    pub total_fund: Decimal,
    /// The charges contributing to the total.
    pub records: Vec<maintenance_charges::Model>,
}

/// Maintenance charge repository for ledger operations.
#[derive(Debug, Clone)]
pub struct MaintenanceRepository {
    db: DatabaseConnection,
}

impl MaintenanceRepository {
    /// Creates a new maintenance repository.
    #[must_use]
    pub const fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    /// Posts a charge for a member's billing period.
    ///
    /// Resolves carry-forward from the nearest earlier period, derives
    /// amount, dues, and status, and inserts the new row. The
    /// `UNIQUE (member_id, period)` constraint backstops the duplicate
    /// check under concurrency.
    ///
    /// # Errors
    ///
    /// Returns `DuplicatePosting` if the member already has a charge for
    /// the period, `NegativeBaseAmount` / `NegativePaidAmount` on invalid
    /// inputs, or `Storage` if the database operation fails.
    pub async fn post_charge(
        &self,
        input: PostChargeInput,
    ) -> Result<maintenance_charges::Model, MaintenanceError> {
        let existing = maintenance_charges::Entity::find()
            .filter(maintenance_charges::Column::MemberId.eq(input.member_id))
            .filter(maintenance_charges::Column::Period.eq(input.period.as_str()))
            .one(&self.db)
            .await
            .map_err(storage_err)?;

        if existing.is_some() {
            return Err(MaintenanceError::DuplicatePosting {
                member_id: input.member_id,
                period: input.period.as_str().to_string(),
            });
        }

        let prior = self
            .find_latest_before(input.member_id, &input.period)
            .await?;
        let posted =
            PostingService::post(input.base_amount, input.paid_amount, prior.map(|p| p.dues))?;

        let now = chrono::Utc::now().into();
        let charge = maintenance_charges::ActiveModel {
            id: Set(Uuid::new_v4()),
            apartment_id: Set(input.apartment_id),
            member_id: Set(input.member_id),
            period: Set(input.period.as_str().to_string()),
            amount: Set(posted.amount),
            carry_forward: Set(posted.carry_forward),
            paid_amount: Set(posted.paid_amount),
            dues: Set(posted.dues),
            status: Set(posted.status.into()),
            created_at: Set(now),
            updated_at: Set(now),
        };

        match charge.insert(&self.db).await {
            Ok(model) => Ok(model),
            // A concurrent posting can slip past the pre-check; the unique
            // constraint reports it as a duplicate, not a storage failure.
            Err(err) if is_unique_violation(&err) => Err(MaintenanceError::DuplicatePosting {
                member_id: input.member_id,
                period: input.period.as_str().to_string(),
            }),
            Err(err) => Err(storage_err(err)),
        }
    }

    /// Finds a charge by ID.
    ///
    /// # Errors
    ///
    /// Returns `Storage` if the database query fails.
    pub async fn find_by_id(
        &self,
        id: Uuid,
    ) -> Result<Option<maintenance_charges::Model>, MaintenanceError> {
        maintenance_charges::Entity::find_by_id(id)
            .one(&self.db)
            .await
            .map_err(storage_err)
    }

    /// Finds the member's latest charge strictly before the given period.
    ///
    /// This is the carry-forward source: its dues (when positive) roll
    /// into the next posting.
    ///
    /// # Errors
    ///
    /// Returns `Storage` if the database query fails.
    pub async fn find_latest_before(
        &self,
        member_id: Uuid,
        period: &Period,
    ) -> Result<Option<maintenance_charges::Model>, MaintenanceError> {
        maintenance_charges::Entity::find()
            .filter(maintenance_charges::Column::MemberId.eq(member_id))
            .filter(maintenance_charges::Column::Period.lt(period.as_str()))
            .order_by_desc(maintenance_charges::Column::Period)
            .one(&self.db)
            .await
            .map_err(storage_err)
    }

    /// Finds the member's latest charge overall, by period.
    ///
    /// Used to gate member inactivation on outstanding dues.
    ///
    /// # Errors
    ///
    /// Returns `Storage` if the database query fails.
    pub async fn find_latest_for_member(
        &self,
        member_id: Uuid,
    ) -> Result<Option<maintenance_charges::Model>, MaintenanceError> {
        maintenance_charges::Entity::find()
            .filter(maintenance_charges::Column::MemberId.eq(member_id))
            .order_by_desc(maintenance_charges::Column::Period)
            .one(&self.db)
            .await
            .map_err(storage_err)
    }

    /// Lists all charges, newest first by creation time.
    ///
    /// # Errors
    ///
    /// Returns `Storage` if the database query fails.
    pub async fn list_all(&self) -> Result<Vec<maintenance_charges::Model>, MaintenanceError> {
        maintenance_charges::Entity::find()
            .order_by_desc(maintenance_charges::Column::CreatedAt)
            .order_by_desc(maintenance_charges::Column::Id)
            .all(&self.db)
            .await
            .map_err(storage_err)
    }

    /// Lists an apartment's charges, most recent period first.
    ///
    /// # Errors
    ///
    /// Returns `Storage` if the database query fails.
    pub async fn list_by_apartment(
        &self,
        apartment_id: Uuid,
    ) -> Result<Vec<maintenance_charges::Model>, MaintenanceError> {
        maintenance_charges::Entity::find()
            .filter(maintenance_charges::Column::ApartmentId.eq(apartment_id))
            .order_by_desc(maintenance_charges::Column::Period)
            .order_by_desc(maintenance_charges::Column::CreatedAt)
            .all(&self.db)
            .await
            .map_err(storage_err)
    }

    /// Lists a member's charge history, most recent period first.
    ///
    /// # Errors
    ///
    /// Returns `Storage` if the database query fails.
    pub async fn list_by_member(
        &self,
        member_id: Uuid,
    ) -> Result<Vec<maintenance_charges::Model>, MaintenanceError> {
        maintenance_charges::Entity::find()
            .filter(maintenance_charges::Column::MemberId.eq(member_id))
            .order_by_desc(maintenance_charges::Column::Period)
            .all(&self.db)
            .await
            .map_err(storage_err)
    }

    /// Applies a correction patch to an existing charge.
    ///
    /// When the patch supplies both `amount` and `paid_amount`, dues and
    /// status are recomputed (unclamped). A partial patch is a plain
    /// field merge. Identity fields are never touched.
    ///
    /// # Errors
    ///
    /// Returns `ChargeNotFound` if no charge has the given ID, or
    /// `Storage` if the database operation fails.
    pub async fn apply_correction(
        &self,
        id: Uuid,
        patch: ChargePatch,
    ) -> Result<maintenance_charges::Model, MaintenanceError> {
        let charge = self
            .find_by_id(id)
            .await?
            .ok_or(MaintenanceError::ChargeNotFound(id))?;

        let mut active: maintenance_charges::ActiveModel = charge.into();

        if let Some(amount) = patch.amount {
            active.amount = Set(amount);
        }
        if let Some(paid_amount) = patch.paid_amount {
            active.paid_amount = Set(paid_amount);
        }
        if let Some(correction) = PostingService::apply_correction(&patch) {
            active.dues = Set(correction.dues);
            active.status = Set(correction.status.into());
        }
        active.updated_at = Set(chrono::Utc::now().into());

        active.update(&self.db).await.map_err(storage_err)
    }

    /// Deletes a charge.
    ///
    /// # Errors
    ///
    /// Returns `ChargeNotFound` if no charge has the given ID, or
    /// `Storage` if the database operation fails.
    pub async fn delete_charge(&self, id: Uuid) -> Result<(), MaintenanceError> {
        let charge = self
            .find_by_id(id)
            .await?
            .ok_or(MaintenanceError::ChargeNotFound(id))?;

        maintenance_charges::Entity::delete_by_id(charge.id)
            .exec(&self.db)
            .await
            .map_err(storage_err)?;

        Ok(())
    }

    /// Builds the fund dashboard for an apartment.
    ///
    /// Totals cover every charge the apartment has ever posted; the
    /// recent list is capped at `RECENT_TRANSACTION_LIMIT`, newest
    /// first with ID as tie-breaker.
    ///
    /// # Errors
    ///
    /// Returns `Storage` if a database query fails.
    pub async fn fund_dashboard(
        &self,
        apartment_id: Uuid,
    ) -> Result<FundDashboard, MaintenanceError> {
        let charges = maintenance_charges::Entity::find()
            .filter(maintenance_charges::Column::ApartmentId.eq(apartment_id))
            .all(&self.db)
            .await
            .map_err(storage_err)?;

        let summary = FundSummary::from_totals(charges.iter().map(|c| ChargeTotals {
            paid_amount: c.paid_amount,
            dues: c.dues,
        }));

        let recent_transactions = maintenance_charges::Entity::find()
            .filter(maintenance_charges::Column::ApartmentId.eq(apartment_id))
            .order_by_desc(maintenance_charges::Column::CreatedAt)
            .order_by_desc(maintenance_charges::Column::Id)
            .limit(RECENT_TRANSACTION_LIMIT)
            .all(&self.db)
            .await
            .map_err(storage_err)?;

        Ok(FundDashboard {
            summary,
            recent_transactions,
        })
    }

    /// Sums collections for one billing period of an apartment.
    ///
    /// # Errors
    ///
    /// Returns `Storage` if the database query fails.
    pub async fn fund_for_period(
        &self,
        apartment_id: Uuid,
        period: &Period,
    ) -> Result<PeriodFund, MaintenanceError> {
        let records = maintenance_charges::Entity::find()
            .filter(maintenance_charges::Column::ApartmentId.eq(apartment_id))
            .filter(maintenance_charges::Column::Period.eq(period.as_str()))
            .all(&self.db)
            .await
            .map_err(storage_err)?;

        let total_fund = records.iter().map(|c| c.paid_amount).sum();
        Ok(PeriodFund {
            total_fund,
            records,
        })
    }

    /// Sums all collections for an apartment across every period.
    ///
    /// # Errors
    ///
    /// Returns `Storage` if the database query fails.
    pub async fn total_fund(&self, apartment_id: Uuid) -> Result<Decimal, MaintenanceError> {
        let charges = maintenance_charges::Entity::find()
            .filter(maintenance_charges::Column::ApartmentId.eq(apartment_id))
            .all(&self.db)
            .await
            .map_err(storage_err)?;

        Ok(charges.iter().map(|c| c.paid_amount).sum())
    }
}

fn storage_err(err: DbErr) -> MaintenanceError {
    MaintenanceError::Storage(err.to_string())
}

fn is_unique_violation(err: &DbErr) -> bool {
    matches!(err.sql_err(), Some(SqlErr::UniqueConstraintViolation(_)))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_storage_err_keeps_cause() {
        let err = storage_err(DbErr::Custom("pool exhausted".into()));
        assert!(matches!(err, MaintenanceError::Storage(ref msg) if msg.contains("pool exhausted")));
        assert_eq!(err.error_code(), "STORAGE_FAILURE");
        assert_eq!(err.http_status_code(), 500);
    }

    #[test]
    fn test_custom_db_error_is_not_a_unique_violation() {
        assert!(!is_unique_violation(&DbErr::Custom("boom".into())));
    }
}
