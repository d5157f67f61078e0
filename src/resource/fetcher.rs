//! Fetcher trait for the currently available resources of an application

#[cfg(test)]
use mockall::automock;

use crate::resource::error::FetchError;
use crate::resource::types::FetchedResources;

/// Trait for fetching the current patch resources of an application
#[cfg_attr(test, automock)]
#[async_trait::async_trait]
pub trait ResourceFetcher: Send + Sync {
    /// Fetches the integrations and patches the app would be built from now
    ///
    /// # Returns
    /// * `Ok(FetchedResources)` - Current releases and their download locations
    /// * `Err(FetchError)` - If a resource cannot be resolved or fetched
    async fn fetch(&self, app_name: &str) -> Result<FetchedResources, FetchError>;
}
