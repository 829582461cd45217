// src/store/mod.rs

pub mod memory;
pub mod sqlite;

use async_trait::async_trait;

use crate::{
    error::AppError,
    models::{
        progress::{AssessmentResult, NewAssessment, ProgressRecord},
        user::User,
    },
};

pub use memory::MemoryStore;
pub use sqlite::SqliteStore;

/// Persistence abstraction behind the service layer.
///
/// One production implementation ([`SqliteStore`]) and one in-memory test
/// double ([`MemoryStore`]). Implementations must apply `upsert_progress`
/// and `complete_module` atomically per (user_id, module_id): concurrent
/// writes to the same pair may never interleave a read with a stale write.
#[async_trait]
pub trait Store: Send + Sync {
    async fn find_user_by_email(&self, email: &str) -> Result<Option<User>, AppError>;

    async fn find_user_by_id(&self, id: i64) -> Result<Option<User>, AppError>;

    /// Creates a user. Fails with `Conflict` if the email is already taken.
    async fn create_user(
        &self,
        email: &str,
        name: &str,
        password_hash: &str,
        role: &str,
    ) -> Result<User, AppError>;

    async fn get_progress(
        &self,
        user_id: i64,
        module_id: i64,
    ) -> Result<Option<ProgressRecord>, AppError>;

    /// All progress rows for a user, ordered by module_id ascending.
    async fn list_progress(&self, user_id: i64) -> Result<Vec<ProgressRecord>, AppError>;

    /// Monotone-max upsert: progress and score keep their running maximum,
    /// time_spent accumulates the delta, completed derives from the new
    /// progress, last_accessed is refreshed.
    async fn upsert_progress(
        &self,
        user_id: i64,
        module_id: i64,
        progress: i64,
        score: i64,
        time_spent_delta: i64,
    ) -> Result<(), AppError>;

    /// Assessment write path: forces progress to 100 and completed to true,
    /// keeping the higher of the existing and incoming score.
    async fn complete_module(
        &self,
        user_id: i64,
        module_id: i64,
        score: i64,
    ) -> Result<(), AppError>;

    /// Latest assessment attempts for a user, newest first.
    async fn list_assessments(
        &self,
        user_id: i64,
        limit: i64,
    ) -> Result<Vec<AssessmentResult>, AppError>;

    /// Appends an assessment attempt, returning the new row id.
    async fn insert_assessment(&self, assessment: NewAssessment) -> Result<i64, AppError>;
}
