// src/models/progress.rs

use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use validator::Validate;

/// Represents the 'user_progress' table in the database.
/// One row per (user, module); progress and score never decrease.
#[derive(Debug, Clone, FromRow, Serialize, Deserialize)]
pub struct ProgressRecord {
    pub id: i64,
    pub user_id: i64,
    pub module_id: i64,
    /// Percentage consumed, 0-100.
    pub progress: i64,
    /// Derived: progress >= 100.
    pub completed: bool,
    /// Best assessment score so far, 0-100.
    pub score: i64,
    /// Accumulated minutes across all sessions.
    pub time_spent: i64,
    pub last_accessed: Option<chrono::DateTime<chrono::Utc>>,
}

/// Represents the 'assessments' table: one row per quiz attempt, append-only.
#[derive(Debug, Clone, FromRow, Serialize, Deserialize)]
pub struct AssessmentResult {
    pub id: i64,
    pub user_id: i64,
    pub module_id: i64,
    pub score: i64,
    pub total_questions: i64,
    pub correct_answers: i64,
    pub time_spent: i64,
    pub feedback: Option<String>,
    pub taken_at: Option<chrono::DateTime<chrono::Utc>>,
}

/// Values for a new assessment row, ready for insertion.
#[derive(Debug, Clone)]
pub struct NewAssessment {
    pub user_id: i64,
    pub module_id: i64,
    pub score: i64,
    pub total_questions: i64,
    pub correct_answers: i64,
    pub time_spent: i64,
    pub feedback: Option<String>,
}

/// DTO for updating module progress.
#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct UpdateProgressRequest {
    #[validate(range(min = 0, max = 100, message = "Progress must be between 0 and 100."))]
    pub progress: i64,
    #[validate(range(min = 0, max = 100, message = "Score must be between 0 and 100."))]
    #[serde(default)]
    pub score: i64,
    /// Minutes spent this session; accumulated, not replaced.
    #[validate(range(min = 0, message = "Time spent cannot be negative."))]
    #[serde(default)]
    pub time_spent: i64,
}

/// DTO for submitting an assessment attempt.
#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct SubmitAssessmentRequest {
    #[validate(range(min = 0, max = 100, message = "Score must be between 0 and 100."))]
    pub score: i64,
    #[validate(range(min = 1, message = "Total questions must be positive."))]
    pub total_questions: i64,
    #[validate(range(min = 0, message = "Correct answers cannot be negative."))]
    pub correct_answers: i64,
    #[validate(range(min = 0, message = "Time spent cannot be negative."))]
    #[serde(default)]
    pub time_spent: i64,
    #[serde(default)]
    pub feedback: Option<String>,
}

/// Aggregated read model for the progress overview endpoint.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Overview {
    pub completed_modules: i64,
    pub total_modules: i64,
    /// Rounded mean score over completed modules with a positive score.
    pub average_score: i64,
    /// Total hours, rounded from accumulated minutes.
    pub time_spent: i64,
    /// Rounded percentage of the catalog completed.
    pub overall_progress: i64,
    pub modules: Vec<ProgressRecord>,
    pub assessments: Vec<AssessmentResult>,
}
