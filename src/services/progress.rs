// src/services/progress.rs

use std::sync::Arc;

use crate::{
    catalog,
    error::AppError,
    models::progress::{NewAssessment, Overview},
    store::Store,
};

/// How many recent assessment attempts the overview includes.
const RECENT_ASSESSMENTS: i64 = 10;

/// Reads and updates per-module progress and records assessment outcomes.
pub struct ProgressService {
    store: Arc<dyn Store>,
}

impl ProgressService {
    pub fn new(store: Arc<dyn Store>) -> Self {
        Self { store }
    }

    fn check_module_id(module_id: i64) -> Result<(), AppError> {
        if !catalog::is_valid_module(module_id) {
            return Err(AppError::BadRequest("Invalid module ID".to_string()));
        }
        Ok(())
    }

    /// Composite read model for the user's dashboard. No side effects.
    pub async fn overview(&self, user_id: i64) -> Result<Overview, AppError> {
        let modules = self.store.list_progress(user_id).await?;
        let assessments = self
            .store
            .list_assessments(user_id, RECENT_ASSESSMENTS)
            .await?;

        let completed_modules = modules.iter().filter(|m| m.completed).count() as i64;

        let scored: Vec<i64> = modules
            .iter()
            .filter(|m| m.completed && m.score > 0)
            .map(|m| m.score)
            .collect();
        let average_score = if scored.is_empty() {
            0
        } else {
            (scored.iter().sum::<i64>() as f64 / scored.len() as f64).round() as i64
        };

        let total_minutes: i64 = modules.iter().map(|m| m.time_spent).sum();

        Ok(Overview {
            completed_modules,
            total_modules: catalog::MODULE_COUNT,
            average_score,
            time_spent: (total_minutes as f64 / 60.0).round() as i64,
            overall_progress: (completed_modules as f64 / catalog::MODULE_COUNT as f64 * 100.0)
                .round() as i64,
            modules,
            assessments,
        })
    }

    /// Records a learning session. Progress and score only ever grow;
    /// time is accumulated.
    pub async fn record_progress(
        &self,
        user_id: i64,
        module_id: i64,
        progress: i64,
        score: i64,
        time_spent: i64,
    ) -> Result<(), AppError> {
        Self::check_module_id(module_id)?;
        self.store
            .upsert_progress(user_id, module_id, progress, score, time_spent)
            .await
    }

    /// Records a quiz attempt and force-completes the module.
    /// This is a distinct write path from `record_progress`: finishing an
    /// assessment always completes the module regardless of prior progress.
    pub async fn record_assessment(
        &self,
        user_id: i64,
        module_id: i64,
        score: i64,
        total_questions: i64,
        correct_answers: i64,
        time_spent: i64,
        feedback: Option<String>,
    ) -> Result<i64, AppError> {
        Self::check_module_id(module_id)?;

        let feedback = feedback.map(|f| crate::utils::html::clean_html(&f));

        let assessment_id = self
            .store
            .insert_assessment(NewAssessment {
                user_id,
                module_id,
                score,
                total_questions,
                correct_answers,
                time_spent,
                feedback,
            })
            .await?;

        self.store.complete_module(user_id, module_id, score).await?;

        Ok(assessment_id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::MemoryStore;

    fn service() -> ProgressService {
        ProgressService::new(Arc::new(MemoryStore::new()))
    }

    #[tokio::test]
    async fn overview_is_empty_for_fresh_user() {
        let progress = service();

        let overview = progress.overview(1).await.unwrap();

        assert_eq!(overview.completed_modules, 0);
        assert_eq!(overview.total_modules, 15);
        assert_eq!(overview.average_score, 0);
        assert_eq!(overview.overall_progress, 0);
        assert!(overview.modules.is_empty());
        assert!(overview.assessments.is_empty());
    }

    #[tokio::test]
    async fn overview_math_single_completed_module() {
        let progress = service();

        progress.record_progress(1, 1, 100, 90, 5).await.unwrap();

        let overview = progress.overview(1).await.unwrap();
        assert_eq!(overview.completed_modules, 1);
        assert_eq!(overview.average_score, 90);
        // 5 minutes rounds to 0 hours.
        assert_eq!(overview.time_spent, 0);
        // 1 of 15 modules rounds to 7 percent.
        assert_eq!(overview.overall_progress, 7);
    }

    #[tokio::test]
    async fn average_ignores_incomplete_and_zero_score_modules() {
        let progress = service();

        progress.record_progress(1, 1, 100, 80, 0).await.unwrap();
        progress.record_progress(1, 2, 100, 90, 0).await.unwrap();
        // Completed but never scored.
        progress.record_progress(1, 3, 100, 0, 0).await.unwrap();
        // Scored but not completed.
        progress.record_progress(1, 4, 50, 100, 0).await.unwrap();

        let overview = progress.overview(1).await.unwrap();
        assert_eq!(overview.completed_modules, 3);
        assert_eq!(overview.average_score, 85);
    }

    #[tokio::test]
    async fn time_spent_accumulates_and_rounds_to_hours() {
        let progress = service();

        progress.record_progress(1, 1, 40, 0, 100).await.unwrap();
        progress.record_progress(1, 2, 40, 0, 100).await.unwrap();

        let overview = progress.overview(1).await.unwrap();
        // 200 minutes rounds to 3 hours.
        assert_eq!(overview.time_spent, 3);
    }

    #[tokio::test]
    async fn progress_is_monotone_across_writes() {
        let progress = service();

        progress.record_progress(1, 1, 40, 0, 10).await.unwrap();
        progress.record_progress(1, 1, 30, 0, 10).await.unwrap();

        let overview = progress.overview(1).await.unwrap();
        assert_eq!(overview.modules[0].progress, 40);
        assert_eq!(overview.modules[0].time_spent, 20);
    }

    #[tokio::test]
    async fn module_id_bounds_are_enforced() {
        let progress = service();

        assert!(matches!(
            progress.record_progress(1, 0, 50, 0, 0).await,
            Err(AppError::BadRequest(_))
        ));
        assert!(matches!(
            progress.record_progress(1, 16, 50, 0, 0).await,
            Err(AppError::BadRequest(_))
        ));
        assert!(progress.record_progress(1, 1, 50, 0, 0).await.is_ok());
        assert!(progress.record_progress(1, 15, 50, 0, 0).await.is_ok());

        assert!(matches!(
            progress.record_assessment(1, 16, 80, 10, 8, 5, None).await,
            Err(AppError::BadRequest(_))
        ));
    }

    #[tokio::test]
    async fn assessment_completes_module_from_zero_progress() {
        let progress = service();

        let id = progress
            .record_assessment(1, 3, 88, 10, 9, 12, Some("solid".to_string()))
            .await
            .unwrap();
        assert!(id > 0);

        let overview = progress.overview(1).await.unwrap();
        assert_eq!(overview.completed_modules, 1);
        assert_eq!(overview.modules[0].progress, 100);
        assert!(overview.modules[0].completed);
        assert_eq!(overview.modules[0].score, 88);
        assert_eq!(overview.assessments.len(), 1);
    }

    #[tokio::test]
    async fn assessment_feedback_is_sanitized() {
        let progress = service();

        progress
            .record_assessment(1, 3, 70, 10, 7, 5, Some("ok<script>x()</script>".to_string()))
            .await
            .unwrap();

        let overview = progress.overview(1).await.unwrap();
        let feedback = overview.assessments[0].feedback.as_deref().unwrap();
        assert!(!feedback.contains("script"));
    }
}
