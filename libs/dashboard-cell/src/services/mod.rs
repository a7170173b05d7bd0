pub mod cache;
pub mod poller;
pub mod projection;

pub use cache::{SnapshotCache, SnapshotFetcher};
pub use poller::spawn_snapshot_poller;
pub use projection::project;
