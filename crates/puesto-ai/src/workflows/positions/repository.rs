use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::domain::PositionId;
use super::evaluation::{Criterion, ValidationOutcome};

/// Stored validation together with when it was produced.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ValidationRecord {
    pub outcome: ValidationOutcome,
    pub validated_at: DateTime<Utc>,
}

impl ValidationRecord {
    pub fn new(outcome: ValidationOutcome) -> Self {
        Self {
            outcome,
            validated_at: Utc::now(),
        }
    }

    pub fn status_view(&self) -> ValidationStatusView {
        let decision = &self.outcome.final_decision;
        ValidationStatusView {
            position_id: self.outcome.position_id.clone(),
            level_code: self.outcome.level.level_code.clone(),
            classification: decision.classification.label(),
            criteria_passed: decision.criteria_passed,
            confidence_global: decision.confidence_global,
            accion_requerida: decision.accion_requerida.clone(),
            validated_at: self.validated_at,
        }
    }
}

/// Storage abstraction so the service can be exercised in isolation.
pub trait ValidationRepository: Send + Sync {
    fn upsert(&self, record: ValidationRecord) -> Result<(), RepositoryError>;
    fn fetch(&self, id: &PositionId) -> Result<Option<ValidationRecord>, RepositoryError>;
    fn rejected(&self, limit: usize) -> Result<Vec<ValidationRecord>, RepositoryError>;
}

#[derive(Debug, thiserror::Error)]
pub enum RepositoryError {
    #[error("record not found")]
    NotFound,
    #[error("repository unavailable: {0}")]
    Unavailable(String),
}

/// Outbound hook for positions that need a human reviewer.
pub trait ReviewNotifier: Send + Sync {
    fn publish(&self, request: ReviewRequest) -> Result<(), NotifierError>;
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReviewRequest {
    pub position_id: PositionId,
    pub level_code: String,
    pub accion_requerida: String,
    pub failed_criteria: Vec<Criterion>,
    pub details: BTreeMap<String, String>,
}

#[derive(Debug, thiserror::Error)]
pub enum NotifierError {
    #[error("review transport unavailable: {0}")]
    Transport(String),
}

/// Public status of a stored validation.
#[derive(Debug, Clone, Serialize)]
pub struct ValidationStatusView {
    pub position_id: PositionId,
    pub level_code: String,
    pub classification: &'static str,
    pub criteria_passed: u8,
    pub confidence_global: f64,
    pub accion_requerida: String,
    pub validated_at: DateTime<Utc>,
}
