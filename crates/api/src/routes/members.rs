//! Member account routes: registration, login, and profile management.
//!
//! Member deactivation is gated on the ledger: a member whose latest
//! maintenance charge still carries dues cannot be set inactive.

use axum::{
    Json, Router,
    extract::{Path, State},
    http::StatusCode,
    response::IntoResponse,
    routing::{get, post},
};
use rust_decimal::Decimal;
use serde_json::json;
use tracing::{error, info};
use uuid::Uuid;

use crate::{AppState, middleware::AuthUser};
use strata_core::auth::{AccountStatus, hash_password, verify_password};
use strata_db::repositories::member::{CreateMemberInput, MemberChanges, MemberError};
use strata_db::{ApartmentRepository, MaintenanceRepository, MemberRepository, entities::members};
use strata_shared::auth::{
    LoginRequest, RegisterMemberRequest, TokenPair, UpdateMemberRequest, account_kind,
};

/// Creates the public member routes (registration and login).
pub fn auth_routes() -> Router<AppState> {
    Router::new()
        .route("/members/register", post(register))
        .route("/members/login", post(login))
}

/// Creates the protected member routes.
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/members", get(list_members))
        .route("/members/search/{keyword}", get(search_members))
        .route("/members/me", get(get_profile))
        .route(
            "/members/by-apartment/{apartment_id}",
            get(list_by_apartment),
        )
        .route(
            "/members/{member_id}",
            axum::routing::patch(update_member).delete(delete_member),
        )
}

fn member_json(member: &members::Model) -> serde_json::Value {
    json!({
        "id": member.id,
        "apartment_id": member.apartment_id,
        "name": member.name,
        "email": member.email,
        "contact": member.contact,
        "address": member.address,
        "image_url": member.image_url,
        "status": member.status,
        "maintenance_rate": member.maintenance_rate,
        "created_at": member.created_at,
        "updated_at": member.updated_at
    })
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

fn invalid_credentials() -> axum::response::Response {
    (
        StatusCode::UNAUTHORIZED,
        Json(json!({
            "error": "invalid_credentials",
            "message": "Invalid email or password"
        })),
    )
        .into_response()
}

fn member_not_found() -> axum::response::Response {
    (
        StatusCode::NOT_FOUND,
        Json(json!({
            "error": "not_found",
            "message": "Member not found"
        })),
    )
        .into_response()
}

/// POST /members/register - Register a member under an apartment.
async fn register(
    State(state): State<AppState>,
    Json(payload): Json<RegisterMemberRequest>,
) -> impl IntoResponse {
    let apartment_repo = ApartmentRepository::new((*state.db).clone());

    match apartment_repo.find_by_id(payload.apartment_id).await {
        Ok(Some(_)) => {}
        Ok(None) => {
            return (
                StatusCode::BAD_REQUEST,
                Json(json!({
                    "error": "unknown_apartment",
                    "message": "No apartment exists with the given ID"
                })),
            )
                .into_response();
        }
        Err(e) => {
            error!(error = %e, "Database error during member registration");
            return internal_error("An error occurred during registration");
        }
    }

    if payload.maintenance_rate < Decimal::ZERO {
        return (
            StatusCode::BAD_REQUEST,
            Json(json!({
                "error": "invalid_rate",
                "message": "Maintenance rate cannot be negative"
            })),
        )
            .into_response();
    }

    let password_hash = match hash_password(&payload.password) {
        Ok(h) => h,
        Err(e) => {
            error!(error = %e, "Failed to hash password");
            return internal_error("An error occurred during registration");
        }
    };

    let member_repo = MemberRepository::new((*state.db).clone());
    let member = match member_repo
        .create(CreateMemberInput {
            apartment_id: payload.apartment_id,
            name: payload.name,
            email: payload.email,
            password_hash,
            contact: payload.contact,
            address: payload.address,
            maintenance_rate: payload.maintenance_rate,
        })
        .await
    {
        Ok(m) => m,
        Err(MemberError::EmailTaken(email)) => {
            info!(email = %email, "Registration attempt with existing email");
            return (
                StatusCode::BAD_REQUEST,
                Json(json!({
                    "error": "email_taken",
                    "message": "An account with this email already exists"
                })),
            )
                .into_response();
        }
        Err(e) => {
            error!(error = %e, "Failed to create member");
            return internal_error("An error occurred during registration");
        }
    };

    // Registration proceeds even if the welcome email cannot be sent.
    if let Err(e) = state
        .email_service
        .send_registration_email(&member.email, &member.name)
        .await
    {
        error!(error = %e, member_id = %member.id, "Failed to send registration email");
    }

    let tokens = match issue_tokens(&state, &member) {
        Ok(t) => t,
        Err(response) => return response,
    };

    info!(member_id = %member.id, apartment_id = %member.apartment_id, "Member registered");

    (
        StatusCode::CREATED,
        Json(json!({
            "member": member_json(&member),
            "tokens": tokens
        })),
    )
        .into_response()
}

/// POST /members/login - Authenticate a member account.
async fn login(
    State(state): State<AppState>,
    Json(payload): Json<LoginRequest>,
) -> impl IntoResponse {
    let repo = MemberRepository::new((*state.db).clone());

    let member = match repo.find_by_email(&payload.email).await {
        Ok(Some(m)) => m,
        Ok(None) => {
            info!(email = %payload.email, "Login attempt for non-existent member");
            return invalid_credentials();
        }
        Err(e) => {
            error!(error = %e, "Database error during login");
            return internal_error("An error occurred during login");
        }
    };

    let status: AccountStatus = member.status.clone().into();
    if !status.can_login() {
        return (
            StatusCode::UNAUTHORIZED,
            Json(json!({
                "error": "account_disabled",
                "message": "This account has been deactivated"
            })),
        )
            .into_response();
    }

    match verify_password(&payload.password, &member.password_hash) {
        Ok(true) => {}
        Ok(false) => {
            info!(member_id = %member.id, "Failed login attempt - invalid password");
            return invalid_credentials();
        }
        Err(e) => {
            error!(error = %e, "Password verification error");
            return internal_error("An error occurred during login");
        }
    }

    let tokens = match issue_tokens(&state, &member) {
        Ok(t) => t,
        Err(response) => return response,
    };

    info!(member_id = %member.id, "Member logged in");

    (
        StatusCode::OK,
        Json(json!({
            "member": member_json(&member),
            "tokens": tokens
        })),
    )
        .into_response()
}

fn issue_tokens(
    state: &AppState,
    member: &members::Model,
) -> Result<TokenPair, axum::response::Response> {
    let access = state
        .jwt_service
        .generate_access_token(member.id, member.apartment_id, account_kind::MEMBER)
        .map_err(|e| {
            error!(error = %e, "Failed to generate access token");
            internal_error("An error occurred during authentication")
        })?;
    let refresh = state
        .jwt_service
        .generate_refresh_token(member.id, member.apartment_id, account_kind::MEMBER)
        .map_err(|e| {
            error!(error = %e, "Failed to generate refresh token");
            internal_error("An error occurred during authentication")
        })?;

    Ok(TokenPair::new(
        access,
        refresh,
        state.jwt_service.access_token_expires_in(),
    ))
}

/// GET /members - List all members.
async fn list_members(State(state): State<AppState>, _auth: AuthUser) -> impl IntoResponse {
    let repo = MemberRepository::new((*state.db).clone());

    match repo.list_all().await {
        Ok(members) => {
            let items: Vec<_> = members.iter().map(member_json).collect();
            (StatusCode::OK, Json(json!({ "members": items }))).into_response()
        }
        Err(e) => {
            error!(error = %e, "Failed to list members");
            internal_error("An error occurred listing members")
        }
    }
}

/// GET `/members/by-apartment/{apartment_id}` - List an apartment's members.
async fn list_by_apartment(
    State(state): State<AppState>,
    _auth: AuthUser,
    Path(apartment_id): Path<Uuid>,
) -> impl IntoResponse {
    let repo = MemberRepository::new((*state.db).clone());

    match repo.list_by_apartment(apartment_id).await {
        Ok(members) => {
            let items: Vec<_> = members.iter().map(member_json).collect();
            (StatusCode::OK, Json(json!({ "members": items }))).into_response()
        }
        Err(e) => {
            error!(error = %e, "Failed to list members");
            internal_error("An error occurred listing members")
        }
    }
}

/// GET `/members/search/{keyword}` - Search members by name.
async fn search_members(
    State(state): State<AppState>,
    _auth: AuthUser,
    Path(keyword): Path<String>,
) -> impl IntoResponse {
    let repo = MemberRepository::new((*state.db).clone());

    match repo.search_by_name(&keyword).await {
        Ok(members) => {
            let items: Vec<_> = members.iter().map(member_json).collect();
            (StatusCode::OK, Json(json!({ "members": items }))).into_response()
        }
        Err(e) => {
            error!(error = %e, "Failed to search members");
            internal_error("An error occurred searching members")
        }
    }
}

/// GET /members/me - Fetch the authenticated member's profile.
async fn get_profile(State(state): State<AppState>, auth: AuthUser) -> impl IntoResponse {
    let repo = MemberRepository::new((*state.db).clone());

    match repo.find_by_id(auth.account_id()).await {
        Ok(Some(member)) => (StatusCode::OK, Json(member_json(&member))).into_response(),
        Ok(None) => member_not_found(),
        Err(e) => {
            error!(error = %e, "Failed to fetch member");
            internal_error("An error occurred fetching the profile")
        }
    }
}

/// PATCH `/members/{member_id}` - Update a member's profile.
///
/// Deactivation is refused while the member's latest maintenance charge
/// still carries dues.
async fn update_member(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(member_id): Path<Uuid>,
    Json(payload): Json<UpdateMemberRequest>,
) -> impl IntoResponse {
    // Members may only update their own profile.
    if !auth.is_apartment() && auth.account_id() != member_id {
        return (
            StatusCode::FORBIDDEN,
            Json(json!({
                "error": "forbidden",
                "message": "You may only update your own profile"
            })),
        )
            .into_response();
    }

    let status = match payload.status.as_deref().map(str::parse::<AccountStatus>) {
        None => None,
        Some(Ok(s)) => Some(s),
        Some(Err(_)) => {
            return (
                StatusCode::BAD_REQUEST,
                Json(json!({
                    "error": "invalid_status",
                    "message": "Status must be 'active' or 'inactive'"
                })),
            )
                .into_response();
        }
    };

    if let Some(rate) = payload.maintenance_rate
        && rate < Decimal::ZERO
    {
        return (
            StatusCode::BAD_REQUEST,
            Json(json!({
                "error": "invalid_rate",
                "message": "Maintenance rate cannot be negative"
            })),
        )
            .into_response();
    }

    if status == Some(AccountStatus::Inactive) {
        let maintenance_repo = MaintenanceRepository::new((*state.db).clone());
        match maintenance_repo.find_latest_for_member(member_id).await {
            Ok(Some(latest)) if latest.dues > Decimal::ZERO => {
                info!(
                    member_id = %member_id,
                    dues = %latest.dues,
                    "Deactivation blocked by outstanding dues"
                );
                let err = MemberError::OutstandingDues(latest.dues);
                return (
                    StatusCode::BAD_REQUEST,
                    Json(json!({
                        "error": "outstanding_dues",
                        "message": err.to_string()
                    })),
                )
                    .into_response();
            }
            Ok(_) => {}
            Err(e) => {
                error!(error = %e, "Failed to check outstanding dues");
                return internal_error("An error occurred updating the member");
            }
        }
    }

    let repo = MemberRepository::new((*state.db).clone());
    match repo
        .update(
            member_id,
            MemberChanges {
                name: payload.name,
                contact: payload.contact,
                address: payload.address,
                image_url: payload.image_url,
                status: status.map(Into::into),
                maintenance_rate: payload.maintenance_rate,
            },
        )
        .await
    {
        Ok(member) => {
            info!(member_id = %member.id, "Member profile updated");
            (StatusCode::OK, Json(member_json(&member))).into_response()
        }
        Err(MemberError::NotFound(_)) => member_not_found(),
        Err(e) => {
            error!(error = %e, "Failed to update member");
            internal_error("An error occurred updating the member")
        }
    }
}

/// DELETE `/members/{member_id}` - Delete a member account.
async fn delete_member(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(member_id): Path<Uuid>,
) -> impl IntoResponse {
    if !auth.is_apartment() && auth.account_id() != member_id {
        return (
            StatusCode::FORBIDDEN,
            Json(json!({
                "error": "forbidden",
                "message": "You may only delete your own account"
            })),
        )
            .into_response();
    }

    let repo = MemberRepository::new((*state.db).clone());
    match repo.delete(member_id).await {
        Ok(()) => {
            info!(member_id = %member_id, "Member deleted");
            StatusCode::NO_CONTENT.into_response()
        }
        Err(MemberError::NotFound(_)) => member_not_found(),
        Err(e) => {
            error!(error = %e, "Failed to delete member");
            internal_error("An error occurred deleting the member")
        }
    }
}
