//! Maintenance ledger routes: payable quotes, charge posting,
//! corrections, fund aggregation, and expenses.

use axum::{
    Json, Router,
    extract::{Path, Query, State},
    http::StatusCode,
    response::IntoResponse,
    routing::{get, post},
};
use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::Deserialize;
use serde_json::json;
use tracing::{error, info};
use uuid::Uuid;

use crate::{AppState, middleware::AuthUser};
use strata_core::maintenance::{ChargePatch, MaintenanceError, Period, PostingService};
use strata_db::repositories::expense::CreateExpenseInput;
use strata_db::repositories::maintenance::PostChargeInput;
use strata_db::{
    ExpenseRepository, MaintenanceRepository, MemberRepository,
    entities::{expenses, maintenance_charges},
};

/// Creates the maintenance router (requires auth middleware to be applied externally).
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/maintenance", post(post_charge).get(list_all))
        .route("/maintenance/payable", get(payable))
        .route("/maintenance/fund-dashboard", get(fund_dashboard))
        .route("/maintenance/fund-by-period", get(fund_by_period))
        .route("/maintenance/total-fund", get(total_fund))
        .route("/maintenance/expenses", post(add_expense))
        .route(
            "/maintenance/expenses/by-apartment/{apartment_id}",
            get(list_expenses),
        )
        .route(
            "/maintenance/by-apartment/{apartment_id}",
            get(list_by_apartment),
        )
        .route("/maintenance/by-member/{member_id}", get(list_by_member))
        .route(
            "/maintenance/{charge_id}",
            axum::routing::patch(correct_charge).delete(delete_charge),
        )
}

/// Payable quote query parameters.
#[derive(Debug, Deserialize)]
struct PayableQuery {
    member_id: Uuid,
    period: String,
    base_amount: Decimal,
}

/// Charge posting payload.
///
/// Required fields are `Option` so their absence maps to
/// `MaintenanceError::MissingField` instead of a generic body rejection.
#[derive(Debug, Deserialize)]
struct PostChargeRequest {
    member_id: Option<Uuid>,
    period: Option<String>,
    /// Base charge for the period, before carry-forward.
    amount: Option<Decimal>,
    /// Must be present, though it may be zero.
    paid_amount: Option<Decimal>,
}

/// Fund query parameters for a single period.
#[derive(Debug, Deserialize)]
struct PeriodQuery {
    period: String,
}

/// Expense recording payload.
#[derive(Debug, Deserialize)]
struct CreateExpenseRequest {
    description: String,
    amount: Decimal,
    /// Defaults to today when omitted.
    spent_on: Option<NaiveDate>,
}

fn charge_json(charge: &maintenance_charges::Model) -> serde_json::Value {
    json!({
        "id": charge.id,
        "apartment_id": charge.apartment_id,
        "member_id": charge.member_id,
        "period": charge.period,
        "amount": charge.amount,
        "carry_forward": charge.carry_forward,
        "paid_amount": charge.paid_amount,
        "dues": charge.dues,
        "status": charge.status,
        "created_at": charge.created_at,
        "updated_at": charge.updated_at
    })
}

fn expense_json(expense: &expenses::Model) -> serde_json::Value {
    json!({
        "id": expense.id,
        "apartment_id": expense.apartment_id,
        "description": expense.description,
        "amount": expense.amount,
        "spent_on": expense.spent_on,
        "created_at": expense.created_at
    })
}

/// Maps a ledger error to its HTTP response.
fn maintenance_error_response(err: &MaintenanceError) -> axum::response::Response {
    let status = StatusCode::from_u16(err.http_status_code())
        .unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);
    if status.is_server_error() {
        error!(error = %err, "Ledger operation failed");
    }
    (
        status,
        Json(json!({
            "error": err.error_code(),
            "message": err.to_string()
        })),
    )
        .into_response()
}

fn internal_error(message: &str) -> axum::response::Response {
    (
        StatusCode::INTERNAL_SERVER_ERROR,
        Json(json!({
            "error": "internal_error",
            "message": message
        })),
    )
        .into_response()
}

/// GET /maintenance/payable - Quote what a member owes for a period.
///
/// Resolves carry-forward from the member's nearest earlier charge
/// without writing anything.
async fn payable(
    State(state): State<AppState>,
    _auth: AuthUser,
    Query(query): Query<PayableQuery>,
) -> impl IntoResponse {
    let period = match Period::parse(&query.period) {
        Ok(p) => p,
        Err(e) => return maintenance_error_response(&e),
    };

    let repo = MaintenanceRepository::new((*state.db).clone());
    let prior = match repo.find_latest_before(query.member_id, &period).await {
        Ok(p) => p,
        Err(e) => return maintenance_error_response(&e),
    };

    match PostingService::payable(query.base_amount, prior.map(|p| p.dues)) {
        Ok(quote) => (
            StatusCode::OK,
            Json(json!({
                "member_id": query.member_id,
                "period": period.as_str(),
                "base_amount": quote.base_amount,
                "carry_forward": quote.carry_forward,
                "total_payable": quote.total_payable
            })),
        )
            .into_response(),
        Err(e) => maintenance_error_response(&e),
    }
}

/// POST /maintenance - Post a charge for a member's billing period.
async fn post_charge(
    State(state): State<AppState>,
    auth: AuthUser,
    Json(payload): Json<PostChargeRequest>,
) -> impl IntoResponse {
    let Some(member_id) = payload.member_id else {
        return maintenance_error_response(&MaintenanceError::MissingField("member_id"));
    };
    let Some(period_raw) = payload.period else {
        return maintenance_error_response(&MaintenanceError::MissingField("period"));
    };
    let Some(amount) = payload.amount else {
        return maintenance_error_response(&MaintenanceError::MissingField("amount"));
    };
    let Some(paid_amount) = payload.paid_amount else {
        return maintenance_error_response(&MaintenanceError::MissingField("paid_amount"));
    };
    let period = match Period::parse(&period_raw) {
        Ok(p) => p,
        Err(e) => return maintenance_error_response(&e),
    };

    let member_repo = MemberRepository::new((*state.db).clone());
    match member_repo.find_by_id(member_id).await {
        Ok(Some(member)) if member.apartment_id == auth.apartment_id() => {}
        Ok(Some(_)) => {
            return (
                StatusCode::FORBIDDEN,
                Json(json!({
                    "error": "forbidden",
                    "message": "Member belongs to a different apartment"
                })),
            )
                .into_response();
        }
        Ok(None) => {
            return (
                StatusCode::BAD_REQUEST,
                Json(json!({
                    "error": "unknown_member",
                    "message": "No member exists with the given ID"
                })),
            )
                .into_response();
        }
        Err(e) => {
            error!(error = %e, "Database error checking member");
            return internal_error("An error occurred posting the charge");
        }
    }

    let repo = MaintenanceRepository::new((*state.db).clone());
    match repo
        .post_charge(PostChargeInput {
            apartment_id: auth.apartment_id(),
            member_id,
            period,
            base_amount: amount,
            paid_amount,
        })
        .await
    {
        Ok(charge) => {
            info!(
                charge_id = %charge.id,
                member_id = %charge.member_id,
                period = %charge.period,
                status = ?charge.status,
                "Charge posted"
            );
            (StatusCode::CREATED, Json(charge_json(&charge))).into_response()
        }
        Err(e) => maintenance_error_response(&e),
    }
}

/// GET /maintenance - List all charges, newest first.
async fn list_all(State(state): State<AppState>, _auth: AuthUser) -> impl IntoResponse {
    let repo = MaintenanceRepository::new((*state.db).clone());

    match repo.list_all().await {
        Ok(charges) => {
            let items: Vec<_> = charges.iter().map(charge_json).collect();
            (StatusCode::OK, Json(json!({ "records": items }))).into_response()
        }
        Err(e) => maintenance_error_response(&e),
    }
}

/// GET `/maintenance/by-apartment/{apartment_id}` - An apartment's ledger.
async fn list_by_apartment(
    State(state): State<AppState>,
    _auth: AuthUser,
    Path(apartment_id): Path<Uuid>,
) -> impl IntoResponse {
    let repo = MaintenanceRepository::new((*state.db).clone());

    match repo.list_by_apartment(apartment_id).await {
        Ok(charges) => {
            let items: Vec<_> = charges.iter().map(charge_json).collect();
            (StatusCode::OK, Json(json!({ "records": items }))).into_response()
        }
        Err(e) => maintenance_error_response(&e),
    }
}

/// GET `/maintenance/by-member/{member_id}` - A member's charge history.
async fn list_by_member(
    State(state): State<AppState>,
    _auth: AuthUser,
    Path(member_id): Path<Uuid>,
) -> impl IntoResponse {
    let repo = MaintenanceRepository::new((*state.db).clone());

    match repo.list_by_member(member_id).await {
        Ok(charges) => {
            let items: Vec<_> = charges.iter().map(charge_json).collect();
            (StatusCode::OK, Json(json!({ "records": items }))).into_response()
        }
        Err(e) => maintenance_error_response(&e),
    }
}

/// PATCH `/maintenance/{charge_id}` - Correct an existing charge.
///
/// Supplying both `amount` and `paid_amount` recomputes dues and status;
/// anything less is a plain field merge.
async fn correct_charge(
    State(state): State<AppState>,
    _auth: AuthUser,
    Path(charge_id): Path<Uuid>,
    Json(patch): Json<ChargePatch>,
) -> impl IntoResponse {
    let repo = MaintenanceRepository::new((*state.db).clone());

    match repo.apply_correction(charge_id, patch).await {
        Ok(charge) => {
            info!(
                charge_id = %charge.id,
                recomputed = patch.recomputes(),
                "Charge corrected"
            );
            (StatusCode::OK, Json(charge_json(&charge))).into_response()
        }
        Err(e) => maintenance_error_response(&e),
    }
}

/// DELETE `/maintenance/{charge_id}` - Remove a charge from the ledger.
async fn delete_charge(
    State(state): State<AppState>,
    _auth: AuthUser,
    Path(charge_id): Path<Uuid>,
) -> impl IntoResponse {
    let repo = MaintenanceRepository::new((*state.db).clone());

    match repo.delete_charge(charge_id).await {
        Ok(()) => {
            info!(charge_id = %charge_id, "Charge deleted");
            StatusCode::NO_CONTENT.into_response()
        }
        Err(e) => maintenance_error_response(&e),
    }
}

/// GET /maintenance/fund-dashboard - Totals plus recent ledger activity
/// for the authenticated apartment.
async fn fund_dashboard(State(state): State<AppState>, auth: AuthUser) -> impl IntoResponse {
    let repo = MaintenanceRepository::new((*state.db).clone());

    match repo.fund_dashboard(auth.apartment_id()).await {
        Ok(dashboard) => {
            let recent: Vec<_> = dashboard.recent_transactions.iter().map(charge_json).collect();
            (
                StatusCode::OK,
                Json(json!({
                    "total_fund": dashboard.summary.total_fund,
                    "total_remaining": dashboard.summary.total_remaining,
                    "recent_transactions": recent
                })),
            )
                .into_response()
        }
        Err(e) => maintenance_error_response(&e),
    }
}

/// GET /maintenance/fund-by-period?period= - Collections for one period.
async fn fund_by_period(
    State(state): State<AppState>,
    auth: AuthUser,
    Query(query): Query<PeriodQuery>,
) -> impl IntoResponse {
    let period = match Period::parse(&query.period) {
        Ok(p) => p,
        Err(e) => return maintenance_error_response(&e),
    };

    let repo = MaintenanceRepository::new((*state.db).clone());
    match repo.fund_for_period(auth.apartment_id(), &period).await {
        Ok(fund) => {
            let records: Vec<_> = fund.records.iter().map(charge_json).collect();
            (
                StatusCode::OK,
                Json(json!({
                    "period": period.as_str(),
                    "total_fund": fund.total_fund,
                    "records": records
                })),
            )
                .into_response()
        }
        Err(e) => maintenance_error_response(&e),
    }
}

/// GET /maintenance/total-fund - All-time collections for the apartment.
async fn total_fund(State(state): State<AppState>, auth: AuthUser) -> impl IntoResponse {
    let repo = MaintenanceRepository::new((*state.db).clone());

    match repo.total_fund(auth.apartment_id()).await {
        Ok(total) => (StatusCode::OK, Json(json!({ "total_fund": total }))).into_response(),
        Err(e) => maintenance_error_response(&e),
    }
}

/// POST /maintenance/expenses - Record an expense against the fund.
async fn add_expense(
    State(state): State<AppState>,
    auth: AuthUser,
    Json(payload): Json<CreateExpenseRequest>,
) -> impl IntoResponse {
    if payload.amount < Decimal::ZERO {
        return (
            StatusCode::BAD_REQUEST,
            Json(json!({
                "error": "invalid_amount",
                "message": "Expense amount cannot be negative"
            })),
        )
            .into_response();
    }

    let repo = ExpenseRepository::new((*state.db).clone());
    let spent_on = payload
        .spent_on
        .unwrap_or_else(|| chrono::Utc::now().date_naive());

    match repo
        .create(CreateExpenseInput {
            apartment_id: auth.apartment_id(),
            description: payload.description,
            amount: payload.amount,
            spent_on,
        })
        .await
    {
        Ok(expense) => {
            info!(expense_id = %expense.id, amount = %expense.amount, "Expense recorded");
            (StatusCode::CREATED, Json(expense_json(&expense))).into_response()
        }
        Err(e) => {
            error!(error = %e, "Failed to record expense");
            internal_error("An error occurred recording the expense")
        }
    }
}

/// GET `/maintenance/expenses/by-apartment/{apartment_id}` - List an
/// apartment's expenses.
async fn list_expenses(
    State(state): State<AppState>,
    _auth: AuthUser,
    Path(apartment_id): Path<Uuid>,
) -> impl IntoResponse {
    let repo = ExpenseRepository::new((*state.db).clone());

    match repo.list_by_apartment(apartment_id).await {
        Ok(expenses) => {
            let items: Vec<_> = expenses.iter().map(expense_json).collect();
            (StatusCode::OK, Json(json!({ "expenses": items }))).into_response()
        }
        Err(e) => {
            error!(error = %e, "Failed to list expenses");
            internal_error("An error occurred listing expenses")
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    // Every required posting field must surface as None when absent so
    // the handler can answer 400 MISSING_FIELD instead of silently
    // defaulting. paid_amount in particular must not default to zero.
    #[test]
    fn test_post_payload_absent_paid_amount_is_none() {
        let payload: PostChargeRequest = serde_json::from_value(json!({
            "member_id": Uuid::new_v4(),
            "period": "2024-01",
            "amount": "1000"
        }))
        .unwrap();

        assert!(payload.member_id.is_some());
        assert!(payload.amount.is_some());
        assert!(payload.paid_amount.is_none());
    }

    #[test]
    fn test_post_payload_zero_paid_amount_is_accepted() {
        let payload: PostChargeRequest = serde_json::from_value(json!({
            "member_id": Uuid::new_v4(),
            "period": "2024-01",
            "amount": "1000",
            "paid_amount": "0"
        }))
        .unwrap();

        assert_eq!(payload.paid_amount, Some(Decimal::ZERO));
    }

    #[test]
    fn test_post_payload_each_field_required() {
        for missing in ["member_id", "period", "amount"] {
            let mut body = json!({
                "member_id": Uuid::new_v4(),
                "period": "2024-01",
                "amount": "1000",
                "paid_amount": "500"
            });
            body.as_object_mut()
                .unwrap()
                .remove(missing);

            let payload: PostChargeRequest = serde_json::from_value(body).unwrap();
            let present = [
                payload.member_id.is_some(),
                payload.period.is_some(),
                payload.amount.is_some(),
                payload.paid_amount.is_some(),
            ];
            assert_eq!(present.iter().filter(|p| **p).count(), 3);
        }
    }
}
