use crate::cli::ServeArgs;
use crate::infra::{AppState, InMemoryReviewNotifier, InMemoryValidationRepository};
use crate::routes::with_position_routes;
use axum::Extension;
use axum_prometheus::PrometheusMetricLayer;
use puesto_ai::config::AppConfig;
use puesto_ai::error::AppError;
use puesto_ai::telemetry;
use puesto_ai::workflows::positions::PositionValidationService;
use std::sync::atomic::Ordering;
use std::sync::Arc;
use tracing::info;

pub(crate) async fn run(mut args: ServeArgs) -> Result<(), AppError> {
    let mut config = AppConfig::load()?;

    if let Some(host) = args.host.take() {
        config.server.host = host;
    }
    if let Some(port) = args.port.take() {
        config.server.port = port;
    }

    telemetry::init(&config.telemetry)?;

    let (prometheus_layer, prometheus_handle) = PrometheusMetricLayer::pair();
    let readiness_flag = Arc::new(std::sync::atomic::AtomicBool::new(false));
    let app_state = AppState {
        readiness: readiness_flag.clone(),
        metrics: Arc::new(prometheus_handle),
    };

    let repository = Arc::new(InMemoryValidationRepository::default());
    let notifier = Arc::new(InMemoryReviewNotifier::default());
    let service = Arc::new(PositionValidationService::new(
        repository,
        notifier,
        config.evaluation.clone(),
    ));

    let app = with_position_routes(service)
        .layer(Extension(app_state))
        .layer(prometheus_layer);

    let addr = config.server.socket_addr()?;
    let listener = tokio::net::TcpListener::bind(addr).await?;
    readiness_flag.store(true, Ordering::Release);

    info!(
        ?config.environment,
        %addr,
        tolerance = config.evaluation.tolerance,
        "position validation service ready"
    );

    axum::serve(listener, app).await?;
    Ok(())
}
