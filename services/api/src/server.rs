use crate::cli::ServeArgs;
use crate::infra::{
    load_state_rules, seed_demo_records, AppState, InMemoryDirectory, InMemoryRegulations,
};
use crate::routes::with_collaboration_routes;
use axum::Extension;
use axum_prometheus::PrometheusMetricLayer;
use cpa_compliance::config::AppConfig;
use cpa_compliance::error::AppError;
use cpa_compliance::telemetry;
use cpa_compliance::workflows::collaboration::{CollaborationService, EligibilityConfig};
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

    let states = load_state_rules(config.rules.state_rules_csv.as_deref())?;
    info!(
        state_count = states.len(),
        source = ?config.rules.state_rules_csv,
        "state regulatory table loaded"
    );

    let regulations = InMemoryRegulations::new(states);
    let directory = InMemoryDirectory::default();
    seed_demo_records(&regulations, &directory);

    let service = Arc::new(CollaborationService::new(
        Arc::new(regulations),
        Arc::new(directory),
        EligibilityConfig::default(),
    ));

    let app = with_collaboration_routes(service)
        .layer(Extension(app_state))
        .layer(prometheus_layer);

    let addr = config.server.socket_addr()?;
    let listener = tokio::net::TcpListener::bind(addr).await?;
    readiness_flag.store(true, Ordering::Release);

    info!(?config.environment, %addr, "cpa compliance service ready");

    axum::serve(listener, app).await?;
    Ok(())
}
