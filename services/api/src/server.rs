use crate::cli::ServeArgs;
use crate::infra::{
    demo_catalog, AppState, DemoAuthDirectory, InMemoryListingRepository, InMemoryNotifier,
};
use crate::routes::with_app_routes;
use axum::Extension;
use axum_prometheus::PrometheusMetricLayer;
use chrono::Utc;
use propertyhub::config::AppConfig;
use propertyhub::error::AppError;
use propertyhub::moderation::ModerationService;
use propertyhub::telemetry;
use std::sync::atomic::{AtomicBool, Ordering};
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
    let readiness_flag = Arc::new(AtomicBool::new(false));
    let app_state = AppState {
        readiness: readiness_flag.clone(),
        metrics: Arc::new(prometheus_handle),
    };

    let repository = Arc::new(InMemoryListingRepository::seeded(Utc::now()));
    let notifier = Arc::new(InMemoryNotifier::default());
    let moderation = Arc::new(
        ModerationService::new(repository, notifier, demo_catalog())
            .with_page_size(config.ui.page_size),
    );
    let sessions = Arc::new(DemoAuthDirectory::seeded());

    let app = with_app_routes(moderation, sessions)
        .layer(Extension(app_state))
        .layer(prometheus_layer);

    let addr = config.server.socket_addr()?;
    let listener = tokio::net::TcpListener::bind(addr).await?;
    readiness_flag.store(true, Ordering::Release);

    info!(
        ?config.environment,
        %addr,
        page_size = config.ui.page_size,
        "propertyhub admin service ready"
    );

    axum::serve(listener, app).await?;
    Ok(())
}
