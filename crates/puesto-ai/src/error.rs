use crate::config::ConfigError;
use crate::telemetry::TelemetryError;
use crate::workflows::import::PositionImportError;
use crate::workflows::positions::ServiceError;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde_json::json;
use std::fmt;

/// Top-level error for the binaries and HTTP layer.
#[derive(Debug)]
pub enum AppError {
    Config(ConfigError),
    Telemetry(TelemetryError),
    Io(std::io::Error),
    Server(axum::Error),
    Import(PositionImportError),
    Payload(serde_json::Error),
    Service(ServiceError),
}

impl AppError {
    /// Input problems are the caller's fault; everything else is ours.
    pub fn status_code(&self) -> StatusCode {
        match self {
            AppError::Import(_) | AppError::Payload(_) => StatusCode::BAD_REQUEST,
            AppError::Service(ServiceError::MissingPositionId) => StatusCode::UNPROCESSABLE_ENTITY,
            _ => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl fmt::Display for AppError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AppError::Config(err) => write!(f, "configuration error: {err}"),
            AppError::Telemetry(err) => write!(f, "telemetry error: {err}"),
            AppError::Io(err) => write!(f, "io error: {err}"),
            AppError::Server(err) => write!(f, "server error: {err}"),
            AppError::Import(err) => write!(f, "import error: {err}"),
            AppError::Payload(err) => write!(f, "invalid position payload: {err}"),
            AppError::Service(err) => write!(f, "validation service error: {err}"),
        }
    }
}

impl std::error::Error for AppError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        let source: &(dyn std::error::Error + 'static) = match self {
            AppError::Config(err) => err,
            AppError::Telemetry(err) => err,
            AppError::Io(err) => err,
            AppError::Server(err) => err,
            AppError::Import(err) => err,
            AppError::Payload(err) => err,
            AppError::Service(err) => err,
        };
        Some(source)
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let body = Json(json!({ "error": self.to_string() }));
        (self.status_code(), body).into_response()
    }
}

macro_rules! app_error_from {
    ($($source:ty => $variant:ident),+ $(,)?) => {
        $(
            impl From<$source> for AppError {
                fn from(value: $source) -> Self {
                    Self::$variant(value)
                }
            }
        )+
    };
}

app_error_from! {
    ConfigError => Config,
    TelemetryError => Telemetry,
    std::io::Error => Io,
    axum::Error => Server,
    PositionImportError => Import,
    serde_json::Error => Payload,
    ServiceError => Service,
}
