// src/store/sqlite.rs

use async_trait::async_trait;
use chrono::Utc;
use sqlx::SqlitePool;

use crate::{
    error::AppError,
    models::{
        progress::{AssessmentResult, NewAssessment, ProgressRecord},
        user::User,
    },
    store::Store,
};

/// Production store backed by SQLite.
///
/// All progress writes are single `INSERT .. ON CONFLICT DO UPDATE`
/// statements so the monotone-max read-modify-write happens inside the
/// database, never as a separate read followed by a write.
pub struct SqliteStore {
    pool: SqlitePool,
}

impl SqliteStore {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl Store for SqliteStore {
    async fn find_user_by_email(&self, email: &str) -> Result<Option<User>, AppError> {
        let user = sqlx::query_as::<_, User>(
            "SELECT id, email, name, password, role, created_at
             FROM users
             WHERE LOWER(email) = LOWER(?)",
        )
        .bind(email)
        .fetch_optional(&self.pool)
        .await?;

        Ok(user)
    }

    async fn find_user_by_id(&self, id: i64) -> Result<Option<User>, AppError> {
        let user = sqlx::query_as::<_, User>(
            "SELECT id, email, name, password, role, created_at
             FROM users
             WHERE id = ?",
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(user)
    }

    async fn create_user(
        &self,
        email: &str,
        name: &str,
        password_hash: &str,
        role: &str,
    ) -> Result<User, AppError> {
        let user = sqlx::query_as::<_, User>(
            "INSERT INTO users (email, name, password, role, created_at)
             VALUES (?, ?, ?, ?, ?)
             RETURNING id, email, name, password, role, created_at",
        )
        .bind(email)
        .bind(name)
        .bind(password_hash)
        .bind(role)
        .bind(Utc::now())
        .fetch_one(&self.pool)
        .await
        .map_err(|e| {
            if let sqlx::Error::Database(db_err) = &e {
                if db_err.is_unique_violation() {
                    return AppError::Conflict(format!("Email '{}' already exists", email));
                }
            }
            tracing::error!("Failed to create user: {:?}", e);
            AppError::from(e)
        })?;

        Ok(user)
    }

    async fn get_progress(
        &self,
        user_id: i64,
        module_id: i64,
    ) -> Result<Option<ProgressRecord>, AppError> {
        let record = sqlx::query_as::<_, ProgressRecord>(
            "SELECT id, user_id, module_id, progress, completed, score, time_spent, last_accessed
             FROM user_progress
             WHERE user_id = ? AND module_id = ?",
        )
        .bind(user_id)
        .bind(module_id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(record)
    }

    async fn list_progress(&self, user_id: i64) -> Result<Vec<ProgressRecord>, AppError> {
        let records = sqlx::query_as::<_, ProgressRecord>(
            "SELECT id, user_id, module_id, progress, completed, score, time_spent, last_accessed
             FROM user_progress
             WHERE user_id = ?
             ORDER BY module_id ASC",
        )
        .bind(user_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(records)
    }

    async fn upsert_progress(
        &self,
        user_id: i64,
        module_id: i64,
        progress: i64,
        score: i64,
        time_spent_delta: i64,
    ) -> Result<(), AppError> {
        sqlx::query(
            "INSERT INTO user_progress
                (user_id, module_id, progress, completed, score, time_spent, last_accessed)
             VALUES (?, ?, ?, ?, ?, ?, ?)
             ON CONFLICT (user_id, module_id) DO UPDATE SET
                progress = CASE WHEN excluded.progress > user_progress.progress
                           THEN excluded.progress ELSE user_progress.progress END,
                score = CASE WHEN excluded.score > user_progress.score
                        THEN excluded.score ELSE user_progress.score END,
                completed = MAX(excluded.progress, user_progress.progress) >= 100,
                time_spent = user_progress.time_spent + excluded.time_spent,
                last_accessed = excluded.last_accessed",
        )
        .bind(user_id)
        .bind(module_id)
        .bind(progress)
        .bind(progress >= 100)
        .bind(score)
        .bind(time_spent_delta)
        .bind(Utc::now())
        .execute(&self.pool)
        .await
        .map_err(|e| {
            tracing::error!("Failed to upsert progress: {:?}", e);
            AppError::from(e)
        })?;

        Ok(())
    }

    async fn complete_module(
        &self,
        user_id: i64,
        module_id: i64,
        score: i64,
    ) -> Result<(), AppError> {
        sqlx::query(
            "INSERT INTO user_progress
                (user_id, module_id, progress, completed, score, time_spent, last_accessed)
             VALUES (?, ?, 100, 1, ?, 0, ?)
             ON CONFLICT (user_id, module_id) DO UPDATE SET
                progress = 100,
                completed = 1,
                score = CASE WHEN excluded.score > user_progress.score
                        THEN excluded.score ELSE user_progress.score END,
                last_accessed = excluded.last_accessed",
        )
        .bind(user_id)
        .bind(module_id)
        .bind(score)
        .bind(Utc::now())
        .execute(&self.pool)
        .await
        .map_err(|e| {
            tracing::error!("Failed to complete module: {:?}", e);
            AppError::from(e)
        })?;

        Ok(())
    }

    async fn list_assessments(
        &self,
        user_id: i64,
        limit: i64,
    ) -> Result<Vec<AssessmentResult>, AppError> {
        let results = sqlx::query_as::<_, AssessmentResult>(
            "SELECT id, user_id, module_id, score, total_questions, correct_answers,
                    time_spent, feedback, taken_at
             FROM assessments
             WHERE user_id = ?
             ORDER BY taken_at DESC
             LIMIT ?",
        )
        .bind(user_id)
        .bind(limit)
        .fetch_all(&self.pool)
        .await?;

        Ok(results)
    }

    async fn insert_assessment(&self, assessment: NewAssessment) -> Result<i64, AppError> {
        let result = sqlx::query(
            "INSERT INTO assessments
                (user_id, module_id, score, total_questions, correct_answers,
                 time_spent, feedback, taken_at)
             VALUES (?, ?, ?, ?, ?, ?, ?, ?)",
        )
        .bind(assessment.user_id)
        .bind(assessment.module_id)
        .bind(assessment.score)
        .bind(assessment.total_questions)
        .bind(assessment.correct_answers)
        .bind(assessment.time_spent)
        .bind(assessment.feedback)
        .bind(Utc::now())
        .execute(&self.pool)
        .await
        .map_err(|e| {
            tracing::error!("Failed to insert assessment: {:?}", e);
            AppError::from(e)
        })?;

        Ok(result.last_insert_rowid())
    }
}
