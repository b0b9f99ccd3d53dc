use axum::Router;
use job_portal::auth::Authenticator;
use job_portal::config::StorageConfig;
use job_portal::error::AppError;
use job_portal::portal_router;
use job_portal::store::{MemoryStore, SqliteStore};
use metrics_exporter_prometheus::PrometheusHandle;
use std::sync::atomic::AtomicBool;
use std::sync::Arc;
use tracing::info;

#[derive(Clone)]
pub(crate) struct AppState {
    pub(crate) readiness: Arc<AtomicBool>,
    pub(crate) metrics: Arc<PrometheusHandle>,
}

/// Opens the configured store and mounts the portal routes over it.
pub(crate) fn portal_over(
    storage: &StorageConfig,
    authenticator: Arc<Authenticator>,
) -> Result<Router, AppError> {
    match storage {
        StorageConfig::Memory => {
            info!("using in-memory store; data is lost on restart");
            Ok(portal_router(Arc::new(MemoryStore::new()), authenticator))
        }
        StorageConfig::Sqlite { path } => {
            let store = SqliteStore::open(path)?;
            info!(path = %path.display(), "opened sqlite store");
            Ok(portal_router(Arc::new(store), authenticator))
        }
    }
}
