// src/handlers/auth.rs

use axum::{Extension, Json, extract::State, http::StatusCode, response::IntoResponse};
use serde_json::json;
use validator::Validate;

use crate::{
    error::AppError,
    models::user::{LoginRequest, RegisterRequest, User},
    state::AppState,
};

/// Registers a new user.
///
/// Hashes the password using Argon2 before storing it.
/// Returns 201 Created with the user object (excluding password) and a token.
pub async fn register(
    State(state): State<AppState>,
    Json(payload): Json<RegisterRequest>,
) -> Result<impl IntoResponse, AppError> {
    if let Err(validation_errors) = payload.validate() {
        return Err(AppError::BadRequest(validation_errors.to_string()));
    }

    let (user, token) = state
        .auth
        .register(&payload.email, &payload.name, &payload.password)
        .await?;

    Ok((
        StatusCode::CREATED,
        Json(json!({
            "message": "User registered successfully",
            "user": user,
            "token": token,
        })),
    ))
}

/// Authenticates a user and returns a bearer token.
pub async fn login(
    State(state): State<AppState>,
    Json(payload): Json<LoginRequest>,
) -> Result<impl IntoResponse, AppError> {
    if let Err(validation_errors) = payload.validate() {
        return Err(AppError::BadRequest(validation_errors.to_string()));
    }

    let (user, token) = state.auth.login(&payload.email, &payload.password).await?;

    Ok(Json(json!({
        "message": "Login successful",
        "user": user,
        "token": token,
    })))
}

/// Logs in as the seeded demo account. No credentials required;
/// the token carries the shorter guest expiry.
pub async fn guest(State(state): State<AppState>) -> Result<impl IntoResponse, AppError> {
    let (user, token) = state.auth.guest_login().await?;

    Ok(Json(json!({
        "message": "Guest login successful",
        "user": user,
        "token": token,
        "isGuest": true,
    })))
}

/// Returns the user resolved by the auth middleware.
/// Reaching this handler means the token was valid.
pub async fn verify(Extension(user): Extension<User>) -> Result<impl IntoResponse, AppError> {
    Ok(Json(json!({
        "valid": true,
        "user": user,
    })))
}
