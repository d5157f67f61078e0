//! Snapshot store backed by a JSON asset of the latest GitHub release

use std::collections::HashMap;
use std::sync::Arc;

use serde::Deserialize;
use tokio::sync::OnceCell;
use tracing::info;

use crate::resource::error::StoreError;
use crate::resource::github::{GitHubClient, ReleaseTag};
use crate::resource::store::SnapshotStore;
use crate::resource::types::ResourceKey;

/// Default name of the release asset holding the last build's resources
pub const DEFAULT_ASSET_NAME: &str = "updates.json";

/// A recorded value is either a single string or a list of strings
#[derive(Debug, Clone, Deserialize, PartialEq, Eq)]
#[serde(untagged)]
enum RecordedValue {
    One(String),
    Many(Vec<String>),
}

impl RecordedValue {
    fn to_vec(&self) -> Vec<String> {
        match self {
            RecordedValue::One(value) => vec![value.clone()],
            RecordedValue::Many(values) => values.clone(),
        }
    }
}

/// app name -> resource key -> value
type BuildInfo = HashMap<String, HashMap<String, RecordedValue>>;

pub struct GitHubSnapshotStore {
    client: Arc<GitHubClient>,
    repository: String,
    asset_name: String,
    build_info: OnceCell<BuildInfo>,
}

impl GitHubSnapshotStore {
    pub fn new(client: Arc<GitHubClient>, repository: &str, asset_name: &str) -> Self {
        Self {
            client,
            repository: repository.to_string(),
            asset_name: asset_name.to_string(),
            build_info: OnceCell::new(),
        }
    }

    /// Download the build info once and reuse it for every lookup
    async fn build_info(&self) -> Result<&BuildInfo, StoreError> {
        self.build_info
            .get_or_try_init(|| async {
                let release = self
                    .client
                    .release(&self.repository, &ReleaseTag::Latest)
                    .await?;

                let asset = release
                    .assets
                    .iter()
                    .find(|asset| asset.name == self.asset_name)
                    .ok_or_else(|| StoreError::MissingAsset {
                        repository: self.repository.clone(),
                        asset: self.asset_name.clone(),
                    })?;

                info!(
                    "Reading last build info from {} release {}",
                    self.repository, release.tag_name
                );

                let build_info: BuildInfo =
                    self.client.download_json(&asset.browser_download_url).await?;
                Ok::<_, StoreError>(build_info)
            })
            .await
    }

    async fn lookup(&self, app_name: &str, key: ResourceKey) -> Result<Vec<String>, StoreError> {
        let build_info = self.build_info().await?;

        let app = build_info
            .get(app_name)
            .ok_or_else(|| StoreError::MissingApp(app_name.to_string()))?;

        app.get(key.as_str())
            .map(RecordedValue::to_vec)
            .ok_or_else(|| StoreError::MissingKey {
                app: app_name.to_string(),
                key,
            })
    }
}

#[async_trait::async_trait]
impl SnapshotStore for GitHubSnapshotStore {
    async fn last_versions(
        &self,
        app_name: &str,
        key: ResourceKey,
    ) -> Result<Vec<String>, StoreError> {
        self.lookup(app_name, key).await
    }

    async fn last_sources(
        &self,
        app_name: &str,
        key: ResourceKey,
    ) -> Result<Vec<String>, StoreError> {
        self.lookup(app_name, key).await
    }
}
