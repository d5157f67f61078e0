//! Snapshot store and fetcher test doubles
#![allow(dead_code)]

use std::collections::HashMap;

use async_trait::async_trait;

use repatch_check::resource::error::{FetchError, StoreError};
use repatch_check::resource::fetcher::ResourceFetcher;
use repatch_check::resource::store::SnapshotStore;
use repatch_check::resource::types::{FetchedResources, ResourceKey, ResourceRelease};

pub const INTEGRATIONS_DL: &str = "https://github.com/a/integrations/releases/latest";
pub const PATCHES_DL: &str = "https://github.com/a/patches/releases/latest";

/// In-memory snapshot store
#[derive(Default)]
pub struct MockSnapshotStore {
    values: HashMap<(String, ResourceKey), Vec<String>>,
}

impl MockSnapshotStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record versions for both categories with the default locations
    pub fn with_app(self, app: &str, integrations: Vec<&str>, patches: Vec<&str>) -> Self {
        self.with_values(app, ResourceKey::IntegrationVersion, integrations)
            .with_values(app, ResourceKey::IntegrationSource, vec![INTEGRATIONS_DL])
            .with_values(app, ResourceKey::PatchVersion, patches)
            .with_values(app, ResourceKey::PatchSource, vec![PATCHES_DL])
    }

    pub fn with_values(mut self, app: &str, key: ResourceKey, values: Vec<&str>) -> Self {
        self.values.insert(
            (app.to_string(), key),
            values.into_iter().map(|v| v.to_string()).collect(),
        );
        self
    }

    fn lookup(&self, app_name: &str, key: ResourceKey) -> Result<Vec<String>, StoreError> {
        self.values
            .get(&(app_name.to_string(), key))
            .cloned()
            .ok_or_else(|| StoreError::MissingKey {
                app: app_name.to_string(),
                key,
            })
    }
}

#[async_trait]
impl SnapshotStore for MockSnapshotStore {
    async fn last_versions(
        &self,
        app_name: &str,
        key: ResourceKey,
    ) -> Result<Vec<String>, StoreError> {
        self.lookup(app_name, key)
    }

    async fn last_sources(
        &self,
        app_name: &str,
        key: ResourceKey,
    ) -> Result<Vec<String>, StoreError> {
        self.lookup(app_name, key)
    }
}

/// Fetcher returning fixed resources per app
#[derive(Default)]
pub struct MockResourceFetcher {
    resources: HashMap<String, FetchedResources>,
}

impl MockResourceFetcher {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_app(mut self, app: &str, integrations: Vec<&str>, patches: Vec<&str>) -> Self {
        self.resources.insert(
            app.to_string(),
            FetchedResources {
                integrations: integrations.into_iter().map(ResourceRelease::new).collect(),
                integrations_dl: INTEGRATIONS_DL.to_string(),
                patches: patches.into_iter().map(ResourceRelease::new).collect(),
                patches_dl: PATCHES_DL.to_string(),
            },
        );
        self
    }
}

#[async_trait]
impl ResourceFetcher for MockResourceFetcher {
    async fn fetch(&self, app_name: &str) -> Result<FetchedResources, FetchError> {
        self.resources
            .get(app_name)
            .cloned()
            .ok_or_else(|| FetchError::UnsupportedSource(app_name.to_string()))
    }
}

pub fn apps(names: &[&str]) -> Vec<String> {
    names.iter().map(|name| name.to_string()).collect()
}
