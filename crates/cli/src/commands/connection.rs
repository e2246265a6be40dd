//! Connection check and full sync.

use pos_bridge_adapters::{Adapter, PosAdapter};

use super::{CommandError, emit};

/// Connect, then measure a round trip to the vendor.
///
/// # Errors
///
/// Returns `CommandError::Operation` if either step fails.
pub async fn test(adapter: &Adapter) -> Result<(), CommandError> {
    let provider = adapter.provider();
    tracing::info!(%provider, "Connecting...");
    emit(&adapter.connect().await)?;

    let response = adapter.test_connection().await;
    if let Some(test) = response.data() {
        tracing::info!(%provider, latency_ms = test.latency_ms, "Connection OK");
    }
    let result = emit(&response);
    adapter.disconnect().await;
    result
}

/// Fetch every category once and print the counts.
///
/// # Errors
///
/// Returns `CommandError::Operation` when every category failed.
pub async fn sync(adapter: &Adapter) -> Result<(), CommandError> {
    emit(&adapter.connect().await)?;
    let response = adapter.sync_data().await;
    if let Some(result) = response.data() {
        for failure in &result.failures {
            tracing::warn!(
                category = %failure.category,
                code = %failure.code,
                "Category failed to sync: {}",
                failure.message
            );
        }
    }
    let result = emit(&response);
    adapter.disconnect().await;
    result
}
