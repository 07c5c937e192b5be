use std::sync::atomic::Ordering;
use std::time::Duration;

use tracing::{info, warn};

use crate::config::persist_interval_secs;
use crate::state::AppState;

/// Periodically flushes the region snapshot to disk whenever it has changed.
pub async fn run(state: AppState) {
    let interval_secs = persist_interval_secs();
    info!("Snapshot persister started (interval: {interval_secs}s)");

    let mut interval = tokio::time::interval(Duration::from_secs(interval_secs));
    // Consume the immediate first tick so the first write waits a full interval.
    interval.tick().await;

    loop {
        interval.tick().await;
        persist_if_dirty(&state).await;
    }
}

/// Writes the snapshot if the region set changed since the last write. On a
/// failed write the dirty flag is re-set so the next tick retries.
pub async fn persist_if_dirty(state: &AppState) {
    if !state.dirty.swap(false, Ordering::AcqRel) {
        return;
    }

    match state.persist_to_disk().await {
        Ok(count) => {
            state.observability.record_snapshot_persisted();
            info!(
                regions = count,
                path = %state.data_path.display(),
                "persisted region snapshot"
            );
        }
        Err(e) => {
            state.dirty.store(true, Ordering::Release);
            state.observability.record_persist_failure();
            warn!(error = %e, "failed to persist region snapshot");
        }
    }
}
