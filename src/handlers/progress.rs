// src/handlers/progress.rs

use axum::{
    Extension, Json,
    extract::{Path, State},
    response::IntoResponse,
};
use serde_json::json;
use validator::Validate;

use crate::{
    catalog,
    error::AppError,
    models::{
        progress::{SubmitAssessmentRequest, UpdateProgressRequest},
        user::User,
    },
    state::AppState,
};

/// Returns the user's aggregate progress overview:
/// per-module rows, recent assessments and derived statistics.
pub async fn get_overview(
    State(state): State<AppState>,
    Extension(user): Extension<User>,
) -> Result<impl IntoResponse, AppError> {
    let overview = state.progress.overview(user.id).await?;
    Ok(Json(overview))
}

/// Records a learning session for one module.
pub async fn update_module(
    State(state): State<AppState>,
    Extension(user): Extension<User>,
    Path(module_id): Path<i64>,
    Json(payload): Json<UpdateProgressRequest>,
) -> Result<impl IntoResponse, AppError> {
    if let Err(validation_errors) = payload.validate() {
        return Err(AppError::BadRequest(validation_errors.to_string()));
    }

    state
        .progress
        .record_progress(
            user.id,
            module_id,
            payload.progress,
            payload.score,
            payload.time_spent,
        )
        .await?;

    Ok(Json(json!({ "message": "Progress updated" })))
}

/// Records an assessment attempt; always completes the module.
pub async fn submit_assessment(
    State(state): State<AppState>,
    Extension(user): Extension<User>,
    Path(module_id): Path<i64>,
    Json(payload): Json<SubmitAssessmentRequest>,
) -> Result<impl IntoResponse, AppError> {
    if let Err(validation_errors) = payload.validate() {
        return Err(AppError::BadRequest(validation_errors.to_string()));
    }

    let assessment_id = state
        .progress
        .record_assessment(
            user.id,
            module_id,
            payload.score,
            payload.total_questions,
            payload.correct_answers,
            payload.time_spent,
            payload.feedback,
        )
        .await?;

    Ok(Json(json!({
        "message": "Assessment saved",
        "assessmentId": assessment_id,
    })))
}

/// Returns the fixed module id -> title catalog. No auth required.
pub async fn module_titles() -> impl IntoResponse {
    Json(catalog::module_titles())
}
