use std::sync::Arc;

use pharmasafe_auth::AuthorizationRegistry;
use pharmasafe_infra::{
    AppConfig, InMemoryAnchorStore, InMemoryRecordStore, ServiceError, SupplyChainService,
};

/// Service type served by the API process.
pub type AppServices = SupplyChainService<Arc<InMemoryRecordStore>, Arc<InMemoryAnchorStore>>;

/// Wire in-memory adapters and a fresh registry owned by the configured root.
pub fn build_services(config: &AppConfig) -> AppServices {
    tracing::info!(
        root_authority = %config.root_authority,
        stages = ?config.catalog.stages(),
        validity_months = config.validity.as_months(),
        "building services"
    );

    SupplyChainService::new(
        Arc::new(InMemoryRecordStore::new()),
        Arc::new(InMemoryAnchorStore::new()),
        AuthorizationRegistry::new(config.root_authority.clone()),
        config.catalog.clone(),
        config.validity,
    )
}

/// Run a service call on the blocking pool.
///
/// The service takes per-product locks and calls store adapters
/// synchronously; a slow ledger commit must not stall an async worker.
pub async fn run_blocking<T, F>(services: Arc<AppServices>, call: F) -> Result<T, ServiceError>
where
    T: Send + 'static,
    F: FnOnce(&AppServices) -> Result<T, ServiceError> + Send + 'static,
{
    tokio::task::spawn_blocking(move || call(&services))
        .await
        .unwrap_or_else(|e| {
            tracing::error!(error = %e, "service task failed");
            Err(ServiceError::TransientFailure(format!("service task failed: {e}")))
        })
}
