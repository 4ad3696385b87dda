//! Apartment account routes: registration, login, and profile management.

use axum::{
    Json, Router,
    extract::{Path, State},
    http::StatusCode,
    response::IntoResponse,
    routing::{get, post},
};
use serde_json::json;
use tracing::{error, info};

use crate::{AppState, middleware::AuthUser};
use strata_core::auth::{AccountStatus, hash_password, verify_password};
use strata_db::repositories::apartment::{ApartmentChanges, ApartmentError, CreateApartmentInput};
use strata_db::{ApartmentRepository, entities::apartments};
use strata_shared::auth::{
    LoginRequest, RegisterApartmentRequest, TokenPair, UpdateApartmentRequest, account_kind,
};

/// Creates the public apartment routes (registration and login).
pub fn auth_routes() -> Router<AppState> {
    Router::new()
        .route("/apartments/register", post(register))
        .route("/apartments/login", post(login))
}

/// Creates the protected apartment routes.
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/apartments", get(list_apartments))
        .route("/apartments/search/{keyword}", get(search_apartments))
        .route(
            "/apartments/me",
            get(get_profile)
                .patch(update_profile)
                .delete(delete_account),
        )
}

fn apartment_json(apartment: &apartments::Model) -> serde_json::Value {
    json!({
        "id": apartment.id,
        "name": apartment.name,
        "email": apartment.email,
        "contact": apartment.contact,
        "address": apartment.address,
        "status": apartment.status,
        "created_at": apartment.created_at,
        "updated_at": apartment.updated_at
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

/// POST /apartments/register - Register a new apartment society.
async fn register(
    State(state): State<AppState>,
    Json(payload): Json<RegisterApartmentRequest>,
) -> impl IntoResponse {
    let repo = ApartmentRepository::new((*state.db).clone());

    let password_hash = match hash_password(&payload.password) {
        Ok(h) => h,
        Err(e) => {
            error!(error = %e, "Failed to hash password");
            return internal_error("An error occurred during registration");
        }
    };

    let apartment = match repo
        .create(CreateApartmentInput {
            name: payload.name,
            email: payload.email,
            password_hash,
            contact: payload.contact,
            address: payload.address,
        })
        .await
    {
        Ok(a) => a,
        Err(ApartmentError::EmailTaken(email)) => {
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
            error!(error = %e, "Failed to create apartment");
            return internal_error("An error occurred during registration");
        }
    };

    // Registration proceeds even if the welcome email cannot be sent.
    if let Err(e) = state
        .email_service
        .send_registration_email(&apartment.email, &apartment.name)
        .await
    {
        error!(error = %e, apartment_id = %apartment.id, "Failed to send registration email");
    }

    let tokens = match issue_tokens(&state, &apartment) {
        Ok(t) => t,
        Err(response) => return response,
    };

    info!(apartment_id = %apartment.id, "Apartment registered");

    (
        StatusCode::CREATED,
        Json(json!({
            "apartment": apartment_json(&apartment),
            "tokens": tokens
        })),
    )
        .into_response()
}

/// POST /apartments/login - Authenticate an apartment account.
async fn login(
    State(state): State<AppState>,
    Json(payload): Json<LoginRequest>,
) -> impl IntoResponse {
    let repo = ApartmentRepository::new((*state.db).clone());

    let apartment = match repo.find_by_email(&payload.email).await {
        Ok(Some(a)) => a,
        Ok(None) => {
            info!(email = %payload.email, "Login attempt for non-existent apartment");
            return invalid_credentials();
        }
        Err(e) => {
            error!(error = %e, "Database error during login");
            return internal_error("An error occurred during login");
        }
    };

    let status: AccountStatus = apartment.status.clone().into();
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

    match verify_password(&payload.password, &apartment.password_hash) {
        Ok(true) => {}
        Ok(false) => {
            info!(apartment_id = %apartment.id, "Failed login attempt - invalid password");
            return invalid_credentials();
        }
        Err(e) => {
            error!(error = %e, "Password verification error");
            return internal_error("An error occurred during login");
        }
    }

    let tokens = match issue_tokens(&state, &apartment) {
        Ok(t) => t,
        Err(response) => return response,
    };

    info!(apartment_id = %apartment.id, "Apartment logged in");

    (
        StatusCode::OK,
        Json(json!({
            "apartment": apartment_json(&apartment),
            "tokens": tokens
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

fn issue_tokens(
    state: &AppState,
    apartment: &apartments::Model,
) -> Result<TokenPair, axum::response::Response> {
    let access = state
        .jwt_service
        .generate_access_token(apartment.id, apartment.id, account_kind::APARTMENT)
        .map_err(|e| {
            error!(error = %e, "Failed to generate access token");
            internal_error("An error occurred during authentication")
        })?;
    let refresh = state
        .jwt_service
        .generate_refresh_token(apartment.id, apartment.id, account_kind::APARTMENT)
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

/// GET /apartments - List all apartment societies.
async fn list_apartments(State(state): State<AppState>, _auth: AuthUser) -> impl IntoResponse {
    let repo = ApartmentRepository::new((*state.db).clone());

    match repo.list_all().await {
        Ok(apartments) => {
            let items: Vec<_> = apartments.iter().map(apartment_json).collect();
            (StatusCode::OK, Json(json!({ "apartments": items }))).into_response()
        }
        Err(e) => {
            error!(error = %e, "Failed to list apartments");
            internal_error("An error occurred listing apartments")
        }
    }
}

/// GET `/apartments/search/{keyword}` - Search apartments by name.
async fn search_apartments(
    State(state): State<AppState>,
    _auth: AuthUser,
    Path(keyword): Path<String>,
) -> impl IntoResponse {
    let repo = ApartmentRepository::new((*state.db).clone());

    match repo.search_by_name(&keyword).await {
        Ok(apartments) => {
            let items: Vec<_> = apartments.iter().map(apartment_json).collect();
            (StatusCode::OK, Json(json!({ "apartments": items }))).into_response()
        }
        Err(e) => {
            error!(error = %e, "Failed to search apartments");
            internal_error("An error occurred searching apartments")
        }
    }
}

/// GET /apartments/me - Fetch the authenticated apartment's profile.
async fn get_profile(State(state): State<AppState>, auth: AuthUser) -> impl IntoResponse {
    if !auth.is_apartment() {
        return forbidden_for_members();
    }

    let repo = ApartmentRepository::new((*state.db).clone());

    match repo.find_by_id(auth.account_id()).await {
        Ok(Some(apartment)) => {
            (StatusCode::OK, Json(apartment_json(&apartment))).into_response()
        }
        Ok(None) => apartment_not_found(),
        Err(e) => {
            error!(error = %e, "Failed to fetch apartment");
            internal_error("An error occurred fetching the profile")
        }
    }
}

/// PATCH /apartments/me - Update the authenticated apartment's profile.
async fn update_profile(
    State(state): State<AppState>,
    auth: AuthUser,
    Json(payload): Json<UpdateApartmentRequest>,
) -> impl IntoResponse {
    if !auth.is_apartment() {
        return forbidden_for_members();
    }

    let status = match payload.status.as_deref().map(str::parse::<AccountStatus>) {
        None => None,
        Some(Ok(s)) => Some(s.into()),
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

    let repo = ApartmentRepository::new((*state.db).clone());

    match repo
        .update(
            auth.account_id(),
            ApartmentChanges {
                name: payload.name,
                contact: payload.contact,
                address: payload.address,
                status,
            },
        )
        .await
    {
        Ok(apartment) => {
            info!(apartment_id = %apartment.id, "Apartment profile updated");
            (StatusCode::OK, Json(apartment_json(&apartment))).into_response()
        }
        Err(ApartmentError::NotFound(_)) => apartment_not_found(),
        Err(e) => {
            error!(error = %e, "Failed to update apartment");
            internal_error("An error occurred updating the profile")
        }
    }
}

/// DELETE /apartments/me - Delete the authenticated apartment and all its data.
async fn delete_account(State(state): State<AppState>, auth: AuthUser) -> impl IntoResponse {
    if !auth.is_apartment() {
        return forbidden_for_members();
    }

    let repo = ApartmentRepository::new((*state.db).clone());

    match repo.delete(auth.account_id()).await {
        Ok(()) => {
            info!(apartment_id = %auth.account_id(), "Apartment deleted");
            StatusCode::NO_CONTENT.into_response()
        }
        Err(ApartmentError::NotFound(_)) => apartment_not_found(),
        Err(e) => {
            error!(error = %e, "Failed to delete apartment");
            internal_error("An error occurred deleting the account")
        }
    }
}

fn forbidden_for_members() -> axum::response::Response {
    (
        StatusCode::FORBIDDEN,
        Json(json!({
            "error": "forbidden",
            "message": "This endpoint is restricted to apartment accounts"
        })),
    )
        .into_response()
}

fn apartment_not_found() -> axum::response::Response {
    (
        StatusCode::NOT_FOUND,
        Json(json!({
            "error": "not_found",
            "message": "Apartment not found"
        })),
    )
        .into_response()
}
