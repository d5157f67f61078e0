//! Patch resource layer
//!
//! Reads the resources an application was last built from and fetches the
//! resources it would be built from now.
//!
//! # Architecture
//!
//! ```text
//! ┌───────────────┐          ┌───────────────┐
//! │ SnapshotStore │          │ResourceFetcher│
//! │  (last build) │          │   (current)   │
//! └───────────────┘          └───────────────┘
//!     │       │                      │
//!     ▼       ▼                      ▼
//! ┌───────┐ ┌───────┐        ┌───────────────┐
//! │SQLite │ │GitHub │───────▶│ GitHubClient  │
//! │ local │ │ asset │        │(shared client)│
//! └───────┘ └───────┘        └───────────────┘
//! ```
//!
//! # Modules
//!
//! - [`store`]: Traits for reading and recording last-build snapshots
//! - [`stores`]: GitHub release asset and SQLite snapshot stores
//! - [`fetcher`]: Trait for fetching current resources
//! - [`fetchers`]: GitHub releases fetcher
//! - [`github`]: Shared GitHub Releases API client
//! - [`error`]: Error types for store and fetch operations
//! - [`types`]: Resource keys, categories and snapshots

pub mod error;
pub mod fetcher;
pub mod fetchers;
pub mod github;
pub mod store;
pub mod stores;
pub mod types;
