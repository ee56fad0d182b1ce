use chrono::NaiveDate;
use lease_vault::config::AppConfig;
use lease_vault::error::AppError;
use lease_vault::leases::LeaseDocumentService;
use metrics_exporter_prometheus::PrometheusHandle;
use std::path::PathBuf;
use std::sync::atomic::AtomicBool;
use std::sync::Arc;

#[derive(Clone)]
pub(crate) struct AppState {
    pub(crate) readiness: Arc<AtomicBool>,
    pub(crate) metrics: Arc<PrometheusHandle>,
}

/// Open the lease tree under `root`, or under the configured storage root when absent.
pub(crate) fn open_service(root: Option<PathBuf>) -> Result<LeaseDocumentService, AppError> {
    let mut storage = AppConfig::load()?.storage;
    if let Some(root) = root {
        storage.root = root;
    }
    Ok(LeaseDocumentService::open(storage.lease_root())?)
}

pub(crate) fn parse_date(raw: &str) -> Result<NaiveDate, String> {
    NaiveDate::parse_from_str(raw.trim(), "%Y-%m-%d")
        .map_err(|err| format!("failed to parse '{raw}' as YYYY-MM-DD ({err})"))
}
