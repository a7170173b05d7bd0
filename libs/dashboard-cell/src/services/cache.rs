use std::sync::Arc;

use futures::future::try_join;
use tokio::sync::RwLock;
use tracing::{debug, info};

use case_cell::services::CaseService;
use doctor_cell::services::DoctorService;
use shared_config::AppConfig;
use shared_models::auth::Session;

use crate::models::{DashboardError, Snapshot};

/// Reads both collections from the coordination service.
#[derive(Clone)]
pub struct SnapshotFetcher {
    doctors: DoctorService,
    cases: CaseService,
}

impl SnapshotFetcher {
    pub fn new(config: &AppConfig) -> Self {
        Self {
            doctors: DoctorService::new(config),
            cases: CaseService::new(config),
        }
    }

    pub async fn fetch(&self, session: &Session) -> Result<Snapshot, DashboardError> {
        let doctors = async {
            self.doctors
                .list_doctors(session)
                .await
                .map_err(DashboardError::from)
        };
        let cases = async {
            self.cases
                .all_cases(session)
                .await
                .map_err(DashboardError::from)
        };

        let (doctors, cases) = try_join(doctors, cases).await?;
        debug!("Fetched snapshot: {} doctors, {} cases", doctors.len(), cases.len());

        Ok(Snapshot::new(doctors, cases))
    }
}

#[derive(Default)]
struct CacheState {
    snapshot: Option<Arc<Snapshot>>,
    stale: bool,
    // Bumped on every invalidation. A fetch started under an older
    // generation may have missed the mutation and is not kept as fresh.
    generation: u64,
}

/// Last fetched snapshot, shared by the poller and the request handlers.
/// A local mutation marks it stale so the next read goes back to the service.
#[derive(Clone, Default)]
pub struct SnapshotCache {
    state: Arc<RwLock<CacheState>>,
}

impl SnapshotCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// Fresh snapshot, if one is held.
    pub async fn current(&self) -> Option<Arc<Snapshot>> {
        let state = self.state.read().await;
        if state.stale {
            return None;
        }
        state.snapshot.clone()
    }

    pub async fn store(&self, snapshot: Snapshot) -> Arc<Snapshot> {
        let generation = self.generation().await;
        self.store_at(snapshot, generation).await
    }

    async fn store_at(&self, snapshot: Snapshot, generation: u64) -> Arc<Snapshot> {
        let snapshot = Arc::new(snapshot);
        let mut state = self.state.write().await;

        if generation != state.generation {
            debug!(
                "Discarding snapshot fetched at generation {} (now {})",
                generation, state.generation
            );
            return snapshot;
        }

        state.snapshot = Some(snapshot.clone());
        state.stale = false;
        snapshot
    }

    async fn generation(&self) -> u64 {
        self.state.read().await.generation
    }

    pub async fn invalidate(&self) {
        let mut state = self.state.write().await;
        if !state.stale && state.snapshot.is_some() {
            debug!("Dashboard snapshot invalidated");
        }
        state.generation += 1;
        state.stale = true;
    }

    pub async fn is_stale(&self) -> bool {
        let state = self.state.read().await;
        state.stale || state.snapshot.is_none()
    }

    pub async fn get_or_refresh(
        &self,
        fetcher: &SnapshotFetcher,
        session: &Session,
    ) -> Result<Arc<Snapshot>, DashboardError> {
        if let Some(snapshot) = self.current().await {
            return Ok(snapshot);
        }

        self.refresh(fetcher, session).await
    }

    pub async fn refresh(
        &self,
        fetcher: &SnapshotFetcher,
        session: &Session,
    ) -> Result<Arc<Snapshot>, DashboardError> {
        let generation = self.generation().await;
        let snapshot = fetcher.fetch(session).await?;
        info!(
            "Dashboard snapshot refreshed ({} doctors, {} cases)",
            snapshot.doctors.len(),
            snapshot.cases.len()
        );
        Ok(self.store_at(snapshot, generation).await)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn empty_snapshot() -> Snapshot {
        Snapshot::new(vec![], vec![])
    }

    #[tokio::test]
    async fn empty_cache_is_stale() {
        let cache = SnapshotCache::new();
        assert!(cache.is_stale().await);
        assert!(cache.current().await.is_none());
    }

    #[tokio::test]
    async fn store_then_invalidate() {
        let cache = SnapshotCache::new();
        cache.store(empty_snapshot()).await;
        assert!(cache.current().await.is_some());

        cache.invalidate().await;
        assert!(cache.current().await.is_none());
        assert!(cache.is_stale().await);

        cache.store(empty_snapshot()).await;
        assert!(!cache.is_stale().await);
    }

    #[tokio::test]
    async fn snapshot_from_before_invalidation_is_not_kept_fresh() {
        let cache = SnapshotCache::new();
        let generation = cache.generation().await;

        cache.invalidate().await;
        cache.store_at(empty_snapshot(), generation).await;

        assert!(cache.is_stale().await);
        assert!(cache.current().await.is_none());

        cache.store(empty_snapshot()).await;
        assert!(!cache.is_stale().await);
    }
}
