use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use axum::http::StatusCode;
use axum::response::Response;
use serde_json::Value;

use crate::workflows::positions::domain::{
    Alignment, ComplexityLevel, DecisionScope, ErrorConsequences, FunctionId, FunctionJudgment,
    PositionId, PositionInput,
};
use crate::workflows::positions::evaluation::{EvaluationConfig, ValidationEngine};
use crate::workflows::positions::levels::get_expected_impact_profile;
use crate::workflows::positions::repository::{
    NotifierError, RepositoryError, ReviewNotifier, ReviewRequest, ValidationRecord,
    ValidationRepository,
};
use crate::workflows::positions::{position_router, PositionValidationService};

pub(super) fn evaluation_config() -> EvaluationConfig {
    EvaluationConfig::default()
}

pub(super) fn engine() -> ValidationEngine {
    ValidationEngine::new(evaluation_config())
}

/// Function matching the ideal profile for `level_code` on every criterion.
pub(super) fn ideal_function(level_code: &str, id: usize) -> FunctionJudgment {
    let profile = get_expected_impact_profile(level_code);
    FunctionJudgment {
        id: FunctionId(format!("F{id}")),
        description: format!("Función {id} acorde al nivel"),
        verb: "Coordinar".to_string(),
        detected_scope: profile.decision_scope,
        detected_consequences: profile.error_consequences,
        detected_complexity: profile.complexity_level,
        verb_appropriate: true,
        verb_forbidden: false,
        has_external_backing: false,
        alignment: Alignment::Aligned,
    }
}

/// Function that is critical on every criterion regardless of level.
pub(super) fn critical_function(id: usize) -> FunctionJudgment {
    FunctionJudgment {
        id: FunctionId(format!("F{id}")),
        description: format!("Función {id} sin sustento"),
        verb: "Autorizar".to_string(),
        detected_scope: DecisionScope::Unclassified,
        detected_consequences: ErrorConsequences::Unclassified,
        detected_complexity: ComplexityLevel::Unclassified,
        verb_appropriate: false,
        verb_forbidden: false,
        has_external_backing: false,
        alignment: Alignment::NotAligned,
    }
}

/// `total` functions of which the first `critical` are critical on all criteria.
pub(super) fn position(level_code: &str, total: usize, critical: usize) -> PositionInput {
    let functions = (1..=total)
        .map(|id| {
            if id <= critical {
                critical_function(id)
            } else {
                ideal_function(level_code, id)
            }
        })
        .collect();

    PositionInput {
        position_id: PositionId(format!("PZA-{level_code}")),
        level_code: level_code.to_string(),
        functions,
    }
}

#[derive(Default, Clone)]
pub(super) struct MemoryRepository {
    records: Arc<Mutex<HashMap<PositionId, ValidationRecord>>>,
}

impl MemoryRepository {
    pub(super) fn len(&self) -> usize {
        self.records.lock().expect("repository mutex poisoned").len()
    }
}

impl ValidationRepository for MemoryRepository {
    fn upsert(&self, record: ValidationRecord) -> Result<(), RepositoryError> {
        let mut guard = self.records.lock().expect("repository mutex poisoned");
        guard.insert(record.outcome.position_id.clone(), record);
        Ok(())
    }

    fn fetch(&self, id: &PositionId) -> Result<Option<ValidationRecord>, RepositoryError> {
        let guard = self.records.lock().expect("repository mutex poisoned");
        Ok(guard.get(id).cloned())
    }

    fn rejected(&self, limit: usize) -> Result<Vec<ValidationRecord>, RepositoryError> {
        let guard = self.records.lock().expect("repository mutex poisoned");
        Ok(guard
            .values()
            .filter(|record| !record.outcome.classification().is_approved())
            .take(limit)
            .cloned()
            .collect())
    }
}

pub(super) struct UnavailableRepository;

impl ValidationRepository for UnavailableRepository {
    fn upsert(&self, _record: ValidationRecord) -> Result<(), RepositoryError> {
        Err(RepositoryError::Unavailable("database offline".to_string()))
    }

    fn fetch(&self, _id: &PositionId) -> Result<Option<ValidationRecord>, RepositoryError> {
        Err(RepositoryError::Unavailable("database offline".to_string()))
    }

    fn rejected(&self, _limit: usize) -> Result<Vec<ValidationRecord>, RepositoryError> {
        Err(RepositoryError::Unavailable("database offline".to_string()))
    }
}

#[derive(Default, Clone)]
pub(super) struct MemoryNotifier {
    requests: Arc<Mutex<Vec<ReviewRequest>>>,
}

impl MemoryNotifier {
    pub(super) fn requests(&self) -> Vec<ReviewRequest> {
        self.requests.lock().expect("notifier mutex poisoned").clone()
    }
}

impl ReviewNotifier for MemoryNotifier {
    fn publish(&self, request: ReviewRequest) -> Result<(), NotifierError> {
        self.requests
            .lock()
            .expect("notifier mutex poisoned")
            .push(request);
        Ok(())
    }
}

pub(super) fn build_service() -> (
    Arc<PositionValidationService<MemoryRepository, MemoryNotifier>>,
    MemoryRepository,
    MemoryNotifier,
) {
    let repository = MemoryRepository::default();
    let notifier = MemoryNotifier::default();
    let service = Arc::new(PositionValidationService::new(
        Arc::new(repository.clone()),
        Arc::new(notifier.clone()),
        evaluation_config(),
    ));
    (service, repository, notifier)
}

pub(super) fn router_with_service(
    service: Arc<PositionValidationService<MemoryRepository, MemoryNotifier>>,
) -> axum::Router {
    position_router(service)
}

pub(super) async fn json_body(response: Response) -> (StatusCode, Value) {
    let status = response.status();
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .expect("body bytes");
    let value = serde_json::from_slice(&bytes).expect("json body");
    (status, value)
}
