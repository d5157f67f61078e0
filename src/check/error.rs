use thiserror::Error;

use crate::resource::error::{FetchError, StoreError};

#[derive(Debug, Error)]
pub enum CheckError {
    #[error("Failed to read last resources of {app}: {source}")]
    Store {
        app: String,
        #[source]
        source: StoreError,
    },

    #[error("Failed to fetch resources of {app}: {source}")]
    Fetch {
        app: String,
        #[source]
        source: FetchError,
    },

    #[error("Failed to record resources of {app}: {source}")]
    Record {
        app: String,
        #[source]
        source: StoreError,
    },
}

impl CheckError {
    pub fn app(&self) -> &str {
        match self {
            CheckError::Store { app, .. }
            | CheckError::Fetch { app, .. }
            | CheckError::Record { app, .. } => app,
        }
    }
}
