use std::time::Duration;

use tokio::task::JoinHandle;
use tokio::time::{interval, MissedTickBehavior};
use tracing::{info, warn};

use shared_models::auth::Session;

use super::cache::{SnapshotCache, SnapshotFetcher};

/// Keep the dashboard snapshot warm. A failed poll keeps the previous
/// snapshot and is retried on the next tick.
pub fn spawn_snapshot_poller(
    cache: SnapshotCache,
    fetcher: SnapshotFetcher,
    period: Duration,
) -> JoinHandle<()> {
    info!("Starting dashboard poller every {:?}", period);

    tokio::spawn(async move {
        let mut ticker = interval(period);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

        loop {
            ticker.tick().await;
            if let Err(e) = cache.refresh(&fetcher, &Session::Anonymous).await {
                warn!("Dashboard poll failed: {}", e);
            }
        }
    })
}
