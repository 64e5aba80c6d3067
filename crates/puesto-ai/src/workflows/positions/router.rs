use std::io::Cursor;
use std::sync::Arc;

use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post},
    Router,
};
use serde::{Deserialize, Serialize};
use serde_json::json;

use super::domain::{PositionId, PositionInput};
use super::evaluation::ValidationOutcome;
use super::intake::RawPositionPayload;
use super::report::views::BatchReportSummary;
use super::report::BatchReport;
use super::repository::{RepositoryError, ReviewNotifier, ValidationRepository};
use super::service::{PositionValidationService, ServiceError};
use crate::workflows::import::PositionCsvImporter;

const REVIEW_PAGE_SIZE: usize = 50;

/// Batch body: either loose JSON positions or a CSV export, not both.
#[derive(Debug, Default, Deserialize)]
pub struct BatchValidationRequest {
    #[serde(default, alias = "puestos")]
    pub positions: Option<Vec<RawPositionPayload>>,
    #[serde(default)]
    pub csv: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct BatchValidationResponse {
    pub outcomes: Vec<ValidationOutcome>,
    pub summary: BatchReportSummary,
}

/// Router builder exposing HTTP endpoints for position validation.
pub fn position_router<R, N>(service: Arc<PositionValidationService<R, N>>) -> Router
where
    R: ValidationRepository + 'static,
    N: ReviewNotifier + 'static,
{
    Router::new()
        .route("/api/v1/positions/validate", post(validate_handler::<R, N>))
        .route("/api/v1/positions/batch", post(batch_handler::<R, N>))
        .route(
            "/api/v1/positions/:position_id",
            get(status_handler::<R, N>),
        )
        .route("/api/v1/levels/:level_code", get(level_handler::<R, N>))
        .route("/api/v1/reviews", get(reviews_handler::<R, N>))
        .with_state(service)
}

pub(crate) async fn validate_handler<R, N>(
    State(service): State<Arc<PositionValidationService<R, N>>>,
    axum::Json(payload): axum::Json<RawPositionPayload>,
) -> Response
where
    R: ValidationRepository + 'static,
    N: ReviewNotifier + 'static,
{
    if payload.position_id.is_none() {
        return service_error_response(ServiceError::MissingPositionId);
    }

    let input = payload.normalize(0);
    match service.validate(&input) {
        Ok(outcome) => (StatusCode::OK, axum::Json(outcome)).into_response(),
        Err(error) => service_error_response(error),
    }
}

pub(crate) async fn batch_handler<R, N>(
    State(service): State<Arc<PositionValidationService<R, N>>>,
    axum::Json(request): axum::Json<BatchValidationRequest>,
) -> Response
where
    R: ValidationRepository + 'static,
    N: ReviewNotifier + 'static,
{
    let inputs: Vec<PositionInput> = match (request.positions, request.csv) {
        (Some(positions), None) => positions
            .into_iter()
            .enumerate()
            .map(|(index, raw)| raw.normalize(index))
            .collect(),
        (None, Some(csv)) => match PositionCsvImporter::from_reader(Cursor::new(csv.into_bytes()))
        {
            Ok(inputs) => inputs,
            Err(error) => return bad_request(error.to_string()),
        },
        (Some(_), Some(_)) => return bad_request("provide either positions or csv, not both"),
        (None, None) => return bad_request("request must include positions or csv"),
    };

    match service.validate_batch(&inputs) {
        Ok(outcomes) => {
            let report = BatchReport::from_outcomes(outcomes);
            let summary = report.summary();
            let body = BatchValidationResponse {
                outcomes: report.outcomes,
                summary,
            };
            (StatusCode::OK, axum::Json(body)).into_response()
        }
        Err(error) => service_error_response(error),
    }
}

pub(crate) async fn status_handler<R, N>(
    State(service): State<Arc<PositionValidationService<R, N>>>,
    Path(position_id): Path<String>,
) -> Response
where
    R: ValidationRepository + 'static,
    N: ReviewNotifier + 'static,
{
    let id = PositionId(position_id);
    match service.get(&id) {
        Ok(record) => (StatusCode::OK, axum::Json(record.status_view())).into_response(),
        Err(ServiceError::Repository(RepositoryError::NotFound)) => {
            let payload = json!({
                "position_id": id.0,
                "error": "position has not been validated",
            });
            (StatusCode::NOT_FOUND, axum::Json(payload)).into_response()
        }
        Err(other) => service_error_response(other),
    }
}

pub(crate) async fn level_handler<R, N>(
    State(service): State<Arc<PositionValidationService<R, N>>>,
    Path(level_code): Path<String>,
) -> Response
where
    R: ValidationRepository + 'static,
    N: ReviewNotifier + 'static,
{
    let context = service.engine().resolver().resolve(&level_code);
    (StatusCode::OK, axum::Json(context)).into_response()
}

pub(crate) async fn reviews_handler<R, N>(
    State(service): State<Arc<PositionValidationService<R, N>>>,
) -> Response
where
    R: ValidationRepository + 'static,
    N: ReviewNotifier + 'static,
{
    match service.pending_reviews(REVIEW_PAGE_SIZE) {
        Ok(records) => {
            let views: Vec<_> = records.iter().map(|record| record.status_view()).collect();
            (StatusCode::OK, axum::Json(views)).into_response()
        }
        Err(error) => service_error_response(error),
    }
}

fn bad_request(message: impl Into<String>) -> Response {
    let payload = json!({ "error": message.into() });
    (StatusCode::BAD_REQUEST, axum::Json(payload)).into_response()
}

fn service_error_response(error: ServiceError) -> Response {
    let status = match error {
        ServiceError::MissingPositionId => StatusCode::UNPROCESSABLE_ENTITY,
        ServiceError::Repository(RepositoryError::NotFound) => StatusCode::NOT_FOUND,
        ServiceError::Repository(_) | ServiceError::Notifier(_) => {
            StatusCode::INTERNAL_SERVER_ERROR
        }
    };
    let payload = json!({ "error": error.to_string() });
    (status, axum::Json(payload)).into_response()
}
