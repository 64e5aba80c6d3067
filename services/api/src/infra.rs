use metrics_exporter_prometheus::PrometheusHandle;
use puesto_ai::error::AppError;
use puesto_ai::workflows::import::PositionCsvImporter;
use puesto_ai::workflows::positions::{
    NotifierError, PositionId, PositionInput, RawPositionPayload, RepositoryError,
    ReviewNotifier, ReviewRequest, ValidationRecord, ValidationRepository,
};
use serde_json::Value;
use std::collections::HashMap;
use std::path::Path;
use std::sync::atomic::AtomicBool;
use std::sync::{Arc, Mutex};
use tracing::info;

#[derive(Clone)]
pub(crate) struct AppState {
    pub(crate) readiness: Arc<AtomicBool>,
    pub(crate) metrics: Arc<PrometheusHandle>,
}

#[derive(Default, Clone)]
pub(crate) struct InMemoryValidationRepository {
    records: Arc<Mutex<HashMap<PositionId, ValidationRecord>>>,
}

impl ValidationRepository for InMemoryValidationRepository {
    fn upsert(&self, record: ValidationRecord) -> Result<(), RepositoryError> {
        let mut guard = self
            .records
            .lock()
            .map_err(|_| RepositoryError::Unavailable("repository mutex poisoned".to_string()))?;
        guard.insert(record.outcome.position_id.clone(), record);
        Ok(())
    }

    fn fetch(&self, id: &PositionId) -> Result<Option<ValidationRecord>, RepositoryError> {
        let guard = self
            .records
            .lock()
            .map_err(|_| RepositoryError::Unavailable("repository mutex poisoned".to_string()))?;
        Ok(guard.get(id).cloned())
    }

    fn rejected(&self, limit: usize) -> Result<Vec<ValidationRecord>, RepositoryError> {
        let guard = self
            .records
            .lock()
            .map_err(|_| RepositoryError::Unavailable("repository mutex poisoned".to_string()))?;
        let mut records: Vec<_> = guard
            .values()
            .filter(|record| !record.outcome.classification().is_approved())
            .cloned()
            .collect();
        records.sort_by(|a, b| b.validated_at.cmp(&a.validated_at));
        records.truncate(limit);
        Ok(records)
    }
}

/// Keeps review requests in memory and logs each one.
#[derive(Default, Clone)]
pub(crate) struct InMemoryReviewNotifier {
    requests: Arc<Mutex<Vec<ReviewRequest>>>,
}

impl ReviewNotifier for InMemoryReviewNotifier {
    fn publish(&self, request: ReviewRequest) -> Result<(), NotifierError> {
        info!(
            position = %request.position_id.0,
            level = %request.level_code,
            failed = request.failed_criteria.len(),
            "manual review requested"
        );
        let mut guard = self
            .requests
            .lock()
            .map_err(|_| NotifierError::Transport("notifier mutex poisoned".to_string()))?;
        guard.push(request);
        Ok(())
    }
}

impl InMemoryReviewNotifier {
    pub(crate) fn requests(&self) -> Vec<ReviewRequest> {
        self.requests
            .lock()
            .map(|guard| guard.clone())
            .unwrap_or_default()
    }
}

/// Loads positions from a `.csv` export or a JSON document. JSON may be a
/// single position, an array of positions, or `{"positions": [...]}`.
pub(crate) fn load_positions(path: &Path) -> Result<Vec<PositionInput>, AppError> {
    let is_csv = path
        .extension()
        .and_then(|ext| ext.to_str())
        .is_some_and(|ext| ext.eq_ignore_ascii_case("csv"));

    if is_csv {
        return Ok(PositionCsvImporter::from_path(path)?);
    }

    let raw = std::fs::read_to_string(path)?;
    parse_positions_json(&raw)
}

pub(crate) fn parse_positions_json(raw: &str) -> Result<Vec<PositionInput>, AppError> {
    let document: Value = serde_json::from_str(raw)?;
    let payloads: Vec<RawPositionPayload> = match document {
        Value::Array(_) => serde_json::from_value(document)?,
        Value::Object(ref map) if map.contains_key("positions") || map.contains_key("puestos") => {
            let list = map
                .get("positions")
                .or_else(|| map.get("puestos"))
                .cloned()
                .unwrap_or(Value::Array(Vec::new()));
            serde_json::from_value(list)?
        }
        other => vec![serde_json::from_value(other)?],
    };

    Ok(payloads
        .into_iter()
        .enumerate()
        .map(|(index, payload)| payload.normalize(index))
        .collect())
}
