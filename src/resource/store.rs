//! Snapshot store traits for last-recorded resource state

#[cfg(test)]
use mockall::automock;

use crate::resource::error::StoreError;
use crate::resource::types::{FetchedResources, ResourceCategory, ResourceKey, ResourceSnapshot};

/// Trait for reading the resource state recorded by the last build
#[cfg_attr(test, automock)]
#[async_trait::async_trait]
pub trait SnapshotStore: Send + Sync {
    /// Returns the recorded version identifiers for an app
    ///
    /// # Arguments
    /// * `app_name` - The tracked application (e.g., "youtube")
    /// * `key` - A version key such as [`ResourceKey::PatchVersion`]
    ///
    /// # Returns
    /// * `Ok(Vec<String>)` - Versions in the order they were recorded
    /// * `Err(StoreError)` - If the store is unreachable or the key is missing
    async fn last_versions(&self, app_name: &str, key: ResourceKey)
    -> Result<Vec<String>, StoreError>;

    /// Returns the recorded source locations for an app
    async fn last_sources(&self, app_name: &str, key: ResourceKey)
    -> Result<Vec<String>, StoreError>;
}

/// Trait for persisting the resources a build was produced from
#[cfg_attr(test, automock)]
#[async_trait::async_trait]
pub trait SnapshotRecorder: Send + Sync {
    async fn record(&self, app_name: &str, resources: &FetchedResources) -> Result<(), StoreError>;
}

/// Read the "before" snapshot of one category
pub async fn last_snapshot(
    store: &dyn SnapshotStore,
    app_name: &str,
    category: ResourceCategory,
) -> Result<ResourceSnapshot, StoreError> {
    let versions = store.last_versions(app_name, category.version_key()).await?;
    let sources = store.last_sources(app_name, category.source_key()).await?;

    Ok(ResourceSnapshot::new(versions, sources))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn last_snapshot_reads_the_category_keys() {
        let mut store = MockSnapshotStore::new();
        store
            .expect_last_versions()
            .withf(|app, key| app == "youtube" && *key == ResourceKey::PatchVersion)
            .times(1)
            .returning(|_, _| Ok(vec!["v2.0.0".to_string()]));
        store
            .expect_last_sources()
            .withf(|app, key| app == "youtube" && *key == ResourceKey::PatchSource)
            .times(1)
            .returning(|_, _| Ok(vec!["https://github.com/a/b/releases/latest".to_string()]));

        let snapshot = last_snapshot(&store, "youtube", ResourceCategory::Patch)
            .await
            .unwrap();

        assert_eq!(
            snapshot,
            ResourceSnapshot::new(
                vec!["v2.0.0".to_string()],
                vec!["https://github.com/a/b/releases/latest".to_string()]
            )
        );
    }

    #[tokio::test]
    async fn last_snapshot_propagates_store_errors() {
        let mut store = MockSnapshotStore::new();
        store.expect_last_versions().returning(|app, key| {
            Err(StoreError::MissingKey {
                app: app.to_string(),
                key,
            })
        });
        store.expect_last_sources().never();

        let result = last_snapshot(&store, "youtube", ResourceCategory::Integration).await;

        assert!(matches!(
            result,
            Err(StoreError::MissingKey {
                key: ResourceKey::IntegrationVersion,
                ..
            })
        ));
    }
}
