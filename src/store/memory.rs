// src/store/memory.rs

use std::collections::HashMap;

use async_trait::async_trait;
use chrono::Utc;
use tokio::sync::Mutex;

use crate::{
    error::AppError,
    models::{
        progress::{AssessmentResult, NewAssessment, ProgressRecord},
        user::User,
    },
    store::Store,
};

#[derive(Default)]
struct Inner {
    users: Vec<User>,
    next_user_id: i64,
    progress: HashMap<(i64, i64), ProgressRecord>,
    next_progress_id: i64,
    assessments: Vec<AssessmentResult>,
    next_assessment_id: i64,
}

/// In-memory test double for [`Store`].
///
/// A single mutex serializes every operation, so each upsert is atomic the
/// same way the SQLite statement is.
#[derive(Default)]
pub struct MemoryStore {
    inner: Mutex<Inner>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl Store for MemoryStore {
    async fn find_user_by_email(&self, email: &str) -> Result<Option<User>, AppError> {
        let inner = self.inner.lock().await;
        Ok(inner
            .users
            .iter()
            .find(|u| u.email.eq_ignore_ascii_case(email))
            .cloned())
    }

    async fn find_user_by_id(&self, id: i64) -> Result<Option<User>, AppError> {
        let inner = self.inner.lock().await;
        Ok(inner.users.iter().find(|u| u.id == id).cloned())
    }

    async fn create_user(
        &self,
        email: &str,
        name: &str,
        password_hash: &str,
        role: &str,
    ) -> Result<User, AppError> {
        let mut inner = self.inner.lock().await;
        if inner.users.iter().any(|u| u.email.eq_ignore_ascii_case(email)) {
            return Err(AppError::Conflict(format!("Email '{}' already exists", email)));
        }

        inner.next_user_id += 1;
        let user = User {
            id: inner.next_user_id,
            email: email.to_string(),
            name: name.to_string(),
            password: password_hash.to_string(),
            role: role.to_string(),
            created_at: Some(Utc::now()),
        };
        inner.users.push(user.clone());
        Ok(user)
    }

    async fn get_progress(
        &self,
        user_id: i64,
        module_id: i64,
    ) -> Result<Option<ProgressRecord>, AppError> {
        let inner = self.inner.lock().await;
        Ok(inner.progress.get(&(user_id, module_id)).cloned())
    }

    async fn list_progress(&self, user_id: i64) -> Result<Vec<ProgressRecord>, AppError> {
        let inner = self.inner.lock().await;
        let mut records: Vec<ProgressRecord> = inner
            .progress
            .values()
            .filter(|r| r.user_id == user_id)
            .cloned()
            .collect();
        records.sort_by_key(|r| r.module_id);
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
        let mut inner = self.inner.lock().await;
        let now = Some(Utc::now());

        match inner.progress.get_mut(&(user_id, module_id)) {
            Some(record) => {
                record.progress = record.progress.max(progress);
                record.score = record.score.max(score);
                record.time_spent += time_spent_delta;
                record.completed = record.progress >= 100;
                record.last_accessed = now;
            }
            None => {
                inner.next_progress_id += 1;
                let record = ProgressRecord {
                    id: inner.next_progress_id,
                    user_id,
                    module_id,
                    progress,
                    completed: progress >= 100,
                    score,
                    time_spent: time_spent_delta,
                    last_accessed: now,
                };
                inner.progress.insert((user_id, module_id), record);
            }
        }
        Ok(())
    }

    async fn complete_module(
        &self,
        user_id: i64,
        module_id: i64,
        score: i64,
    ) -> Result<(), AppError> {
        let mut inner = self.inner.lock().await;
        let now = Some(Utc::now());

        match inner.progress.get_mut(&(user_id, module_id)) {
            Some(record) => {
                record.progress = 100;
                record.completed = true;
                record.score = record.score.max(score);
                record.last_accessed = now;
            }
            None => {
                inner.next_progress_id += 1;
                let record = ProgressRecord {
                    id: inner.next_progress_id,
                    user_id,
                    module_id,
                    progress: 100,
                    completed: true,
                    score,
                    time_spent: 0,
                    last_accessed: now,
                };
                inner.progress.insert((user_id, module_id), record);
            }
        }
        Ok(())
    }

    async fn list_assessments(
        &self,
        user_id: i64,
        limit: i64,
    ) -> Result<Vec<AssessmentResult>, AppError> {
        let inner = self.inner.lock().await;
        let mut results: Vec<AssessmentResult> = inner
            .assessments
            .iter()
            .filter(|a| a.user_id == user_id)
            .cloned()
            .collect();
        results.sort_by(|a, b| b.taken_at.cmp(&a.taken_at).then(b.id.cmp(&a.id)));
        results.truncate(limit.max(0) as usize);
        Ok(results)
    }

    async fn insert_assessment(&self, assessment: NewAssessment) -> Result<i64, AppError> {
        let mut inner = self.inner.lock().await;
        inner.next_assessment_id += 1;
        let id = inner.next_assessment_id;
        inner.assessments.push(AssessmentResult {
            id,
            user_id: assessment.user_id,
            module_id: assessment.module_id,
            score: assessment.score,
            total_questions: assessment.total_questions,
            correct_answers: assessment.correct_answers,
            time_spent: assessment.time_spent,
            feedback: assessment.feedback,
            taken_at: Some(Utc::now()),
        });
        Ok(id)
    }
}
