use crate::cli::ServeArgs;
use crate::infra::AppState;
use crate::routes::with_lease_routes;
use axum::Extension;
use axum_prometheus::PrometheusMetricLayer;
use lease_vault::config::AppConfig;
use lease_vault::error::AppError;
use lease_vault::leases::LeaseDocumentService;
use lease_vault::telemetry;
use std::path::PathBuf;
use std::sync::atomic::Ordering;
use std::sync::Arc;
use tracing::info;

pub(crate) async fn run(mut args: ServeArgs, root: Option<PathBuf>) -> Result<(), AppError> {
    let mut config = AppConfig::load()?;

    if let Some(host) = args.host.take() {
        config.server.host = host;
    }
    if let Some(port) = args.port.take() {
        config.server.port = port;
    }
    if let Some(root) = root {
        config.storage.root = root;
    }

    telemetry::init(&config.telemetry)?;

    let (prometheus_layer, prometheus_handle) = PrometheusMetricLayer::pair();
    let readiness_flag = Arc::new(std::sync::atomic::AtomicBool::new(false));
    let app_state = AppState {
        readiness: readiness_flag.clone(),
        metrics: Arc::new(prometheus_handle),
    };

    let lease_root = config.storage.lease_root();
    let lease_service = Arc::new(LeaseDocumentService::open(&lease_root)?);

    let app = with_lease_routes(lease_service)
        .layer(Extension(app_state))
        .layer(prometheus_layer);

    let addr = config.server.socket_addr()?;
    let listener = tokio::net::TcpListener::bind(addr).await?;
    readiness_flag.store(true, Ordering::Release);

    info!(
        ?config.environment,
        %addr,
        lease_root = %lease_root.display(),
        "lease document service ready"
    );

    axum::serve(listener, app).await?;
    Ok(())
}
