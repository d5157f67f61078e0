use thiserror::Error;

use crate::resource::types::ResourceKey;

#[derive(Debug, Error)]
pub enum GitHubError {
    #[error("Network error: {0}")]
    Network(#[from] reqwest::Error),

    #[error("Rate limited: retry after {retry_after_secs:?} seconds")]
    RateLimited { retry_after_secs: Option<u64> },

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Invalid response: {0}")]
    InvalidResponse(String),
}

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("GitHub error: {0}")]
    GitHub(#[from] GitHubError),

    #[error("Database error: {0}")]
    Database(#[from] rusqlite::Error),

    #[error("Failed to acquire database lock")]
    LockPoisoned,

    #[error("Asset {asset} not attached to the latest release of {repository}")]
    MissingAsset { repository: String, asset: String },

    #[error("No recorded snapshot for app {0}")]
    MissingApp(String),

    #[error("No recorded {key} for app {app}")]
    MissingKey { app: String, key: ResourceKey },
}

#[derive(Debug, Error)]
pub enum FetchError {
    #[error("GitHub error: {0}")]
    GitHub(#[from] GitHubError),

    #[error("Unsupported resource location: {0}")]
    UnsupportedSource(String),
}
