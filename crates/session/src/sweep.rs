//! Periodic eviction of idle sessions.
//!
//! Spawned once at startup via `tokio::spawn`. Ticks on a fixed interval,
//! removes sessions idle beyond the configured TTL, and stops when the
//! shutdown [`CancellationToken`] fires.

use std::sync::Arc;
use std::time::Duration;

use tokio_util::sync::CancellationToken;

use crate::store::SessionStore;

/// Run the idle-expiry sweep until `cancel` is triggered.
pub async fn run(store: Arc<SessionStore>, ttl: Duration, interval: Duration, cancel: CancellationToken) {
    tracing::info!(
        ttl_secs = ttl.as_secs(),
        interval_secs = interval.as_secs(),
        "Idle session sweep started"
    );

    let mut ticker = tokio::time::interval(interval);
    // The first tick fires immediately; skip it so a fresh boot does not
    // race session creation in tests.
    ticker.tick().await;

    loop {
        tokio::select! {
            _ = cancel.cancelled() => {
                tracing::info!("Idle session sweep stopping");
                break;
            }
            _ = ticker.tick() => {
                let purged = store.purge_expired(ttl).await;
                if purged > 0 {
                    tracing::info!(purged, "Idle session sweep: evicted sessions");
                } else {
                    tracing::debug!("Idle session sweep: nothing to evict");
                }
            }
        }
    }
}
