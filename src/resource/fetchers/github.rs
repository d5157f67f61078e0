//! Fetches current patch resources from GitHub releases

use std::sync::Arc;

use tracing::info;

use crate::config::ResourcesConfig;
use crate::resource::error::FetchError;
use crate::resource::fetcher::ResourceFetcher;
use crate::resource::github::{GitHubClient, ReleaseLocation};
use crate::resource::types::{FetchedResources, ResourceRelease};

pub struct GitHubResourceFetcher {
    client: Arc<GitHubClient>,
    resources: ResourcesConfig,
}

impl GitHubResourceFetcher {
    pub fn new(client: Arc<GitHubClient>, resources: ResourcesConfig) -> Self {
        Self { client, resources }
    }

    async fn fetch_release(&self, location: &str) -> Result<ResourceRelease, FetchError> {
        let release_location = ReleaseLocation::parse(location)
            .ok_or_else(|| FetchError::UnsupportedSource(location.to_string()))?;

        let release = self
            .client
            .release(&release_location.repository, &release_location.tag)
            .await?;

        info!(
            "Resolved {} to {} ({} assets)",
            location,
            release.tag_name,
            release.assets.len()
        );

        Ok(ResourceRelease {
            version: release.tag_name,
            assets: release.assets.into_iter().map(|asset| asset.name).collect(),
        })
    }
}

#[async_trait::async_trait]
impl ResourceFetcher for GitHubResourceFetcher {
    async fn fetch(&self, app_name: &str) -> Result<FetchedResources, FetchError> {
        let integrations_dl = self.resources.integrations_dl(app_name).to_string();
        let patches_dl = self.resources.patches_dl(app_name).to_string();

        let integrations = self.fetch_release(&integrations_dl).await?;
        let patches = self.fetch_release(&patches_dl).await?;

        Ok(FetchedResources {
            integrations: vec![integrations],
            integrations_dl,
            patches: vec![patches],
            patches_dl,
        })
    }
}
