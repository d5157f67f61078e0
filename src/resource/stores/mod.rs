//! Snapshot store implementations

pub mod github;
pub mod sqlite;

pub use github::GitHubSnapshotStore;
pub use sqlite::SqliteSnapshotStore;
