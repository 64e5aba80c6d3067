use std::collections::BTreeMap;
use std::sync::Arc;

use tracing::warn;

use super::domain::{PositionId, PositionInput};
use super::evaluation::{EvaluationConfig, ValidationEngine, ValidationOutcome};
use super::repository::{
    NotifierError, RepositoryError, ReviewNotifier, ReviewRequest, ValidationRecord,
    ValidationRepository,
};

/// Service composing the validation engine, storage and review notifications.
pub struct PositionValidationService<R, N> {
    engine: Arc<ValidationEngine>,
    repository: Arc<R>,
    notifier: Arc<N>,
}

impl<R, N> PositionValidationService<R, N>
where
    R: ValidationRepository + 'static,
    N: ReviewNotifier + 'static,
{
    pub fn new(repository: Arc<R>, notifier: Arc<N>, config: EvaluationConfig) -> Self {
        Self::with_engine(Arc::new(ValidationEngine::new(config)), repository, notifier)
    }

    pub fn with_engine(engine: Arc<ValidationEngine>, repository: Arc<R>, notifier: Arc<N>) -> Self {
        Self {
            engine,
            repository,
            notifier,
        }
    }

    pub fn engine(&self) -> &ValidationEngine {
        &self.engine
    }

    /// Validate a position, persist the outcome and queue rejected positions for review.
    pub fn validate(&self, input: &PositionInput) -> Result<ValidationOutcome, ServiceError> {
        if input.position_id.0.trim().is_empty() {
            return Err(ServiceError::MissingPositionId);
        }

        let outcome = self.engine.validate(input);
        self.record(&outcome)?;
        Ok(outcome)
    }

    pub fn validate_batch(
        &self,
        inputs: &[PositionInput],
    ) -> Result<Vec<ValidationOutcome>, ServiceError> {
        if inputs
            .iter()
            .any(|input| input.position_id.0.trim().is_empty())
        {
            return Err(ServiceError::MissingPositionId);
        }

        let outcomes = self.engine.validate_batch(inputs);
        for outcome in &outcomes {
            self.record(outcome)?;
        }
        Ok(outcomes)
    }

    pub fn get(&self, position_id: &PositionId) -> Result<ValidationRecord, ServiceError> {
        let record = self
            .repository
            .fetch(position_id)?
            .ok_or(RepositoryError::NotFound)?;
        Ok(record)
    }

    /// Rejected positions still waiting for a reviewer, at most `limit`.
    pub fn pending_reviews(&self, limit: usize) -> Result<Vec<ValidationRecord>, ServiceError> {
        Ok(self.repository.rejected(limit)?)
    }

    fn record(&self, outcome: &ValidationOutcome) -> Result<(), ServiceError> {
        self.repository.upsert(ValidationRecord::new(outcome.clone()))?;

        if outcome.classification().is_approved() {
            return Ok(());
        }

        let failed_criteria: Vec<_> = outcome
            .criteria
            .iter()
            .filter(|result| !result.passed())
            .map(|result| result.name)
            .collect();

        let mut details = BTreeMap::new();
        details.insert(
            "criteria_passed".to_string(),
            outcome.final_decision.criteria_passed.to_string(),
        );
        details.insert(
            "confidence_global".to_string(),
            format!("{:.2}", outcome.final_decision.confidence_global),
        );

        warn!(
            position = %outcome.position_id.0,
            failed = failed_criteria.len(),
            "position rejected; queueing manual review"
        );

        self.notifier.publish(ReviewRequest {
            position_id: outcome.position_id.clone(),
            level_code: outcome.level.level_code.clone(),
            accion_requerida: outcome.final_decision.accion_requerida.clone(),
            failed_criteria,
            details,
        })?;

        Ok(())
    }
}

#[derive(Debug, thiserror::Error)]
pub enum ServiceError {
    #[error("position_id must not be empty")]
    MissingPositionId,
    #[error(transparent)]
    Repository(#[from] RepositoryError),
    #[error(transparent)]
    Notifier(#[from] NotifierError),
}
