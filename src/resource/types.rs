//! Common types for patch resources

use serde::{Deserialize, Serialize};

/// Category of patch resource tracked per application
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ResourceCategory {
    /// Integration artifacts bundled into the patched app
    Integration,
    /// Patch artifacts applied to the app
    Patch,
}

impl ResourceCategory {
    /// Key under which the category's versions are recorded
    pub fn version_key(&self) -> ResourceKey {
        match self {
            ResourceCategory::Integration => ResourceKey::IntegrationVersion,
            ResourceCategory::Patch => ResourceKey::PatchVersion,
        }
    }

    /// Key under which the category's source locations are recorded
    pub fn source_key(&self) -> ResourceKey {
        match self {
            ResourceCategory::Integration => ResourceKey::IntegrationSource,
            ResourceCategory::Patch => ResourceKey::PatchSource,
        }
    }
}

/// Lookup key for a recorded resource value
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ResourceKey {
    IntegrationVersion,
    IntegrationSource,
    PatchVersion,
    PatchSource,
}

impl ResourceKey {
    pub const ALL: [ResourceKey; 4] = [
        ResourceKey::IntegrationVersion,
        ResourceKey::IntegrationSource,
        ResourceKey::PatchVersion,
        ResourceKey::PatchSource,
    ];

    /// Returns the string representation used by the snapshot stores
    pub fn as_str(&self) -> &'static str {
        match self {
            ResourceKey::IntegrationVersion => "integrations_version",
            ResourceKey::IntegrationSource => "integrations_dl",
            ResourceKey::PatchVersion => "patches_version",
            ResourceKey::PatchSource => "patches_dl",
        }
    }
}

impl std::str::FromStr for ResourceKey {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "integrations_version" => Ok(ResourceKey::IntegrationVersion),
            "integrations_dl" => Ok(ResourceKey::IntegrationSource),
            "patches_version" => Ok(ResourceKey::PatchVersion),
            "patches_dl" => Ok(ResourceKey::PatchSource),
            _ => Err(()),
        }
    }
}

impl std::fmt::Display for ResourceKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Versions and source locations of one category at one point in time.
///
/// `versions` and `sources` are paired by position.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResourceSnapshot {
    pub versions: Vec<String>,
    pub sources: Vec<String>,
}

impl ResourceSnapshot {
    pub fn new(versions: Vec<String>, sources: Vec<String>) -> Self {
        Self { versions, sources }
    }

    pub fn is_empty(&self) -> bool {
        self.versions.is_empty()
    }
}

/// A single fetched resource release
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResourceRelease {
    pub version: String,
    /// Names of the files published with the release
    #[serde(default)]
    pub assets: Vec<String>,
}

impl ResourceRelease {
    pub fn new(version: impl Into<String>) -> Self {
        Self {
            version: version.into(),
            assets: Vec::new(),
        }
    }
}

/// Current resources of an application after a fresh fetch
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FetchedResources {
    pub integrations: Vec<ResourceRelease>,
    pub integrations_dl: String,
    pub patches: Vec<ResourceRelease>,
    pub patches_dl: String,
}

impl FetchedResources {
    /// Build the "after" snapshot of a category
    pub fn snapshot(&self, category: ResourceCategory) -> ResourceSnapshot {
        let (releases, dl) = match category {
            ResourceCategory::Integration => (&self.integrations, &self.integrations_dl),
            ResourceCategory::Patch => (&self.patches, &self.patches_dl),
        };

        ResourceSnapshot {
            versions: releases.iter().map(|r| r.version.clone()).collect(),
            sources: vec![dl.clone()],
        }
    }

    /// Values to record under `key` so the next run compares against this fetch
    pub fn values_for(&self, key: ResourceKey) -> Vec<String> {
        match key {
            ResourceKey::IntegrationVersion => self.snapshot(ResourceCategory::Integration).versions,
            ResourceKey::IntegrationSource => vec![self.integrations_dl.clone()],
            ResourceKey::PatchVersion => self.snapshot(ResourceCategory::Patch).versions,
            ResourceKey::PatchSource => vec![self.patches_dl.clone()],
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case(ResourceKey::IntegrationVersion, "integrations_version")]
    #[case(ResourceKey::IntegrationSource, "integrations_dl")]
    #[case(ResourceKey::PatchVersion, "patches_version")]
    #[case(ResourceKey::PatchSource, "patches_dl")]
    fn resource_key_string_form_parses_back(#[case] key: ResourceKey, #[case] name: &str) {
        assert_eq!(key.as_str(), name);
        assert_eq!(name.parse::<ResourceKey>(), Ok(key));
    }

    #[test]
    fn resource_key_from_unknown_string_fails() {
        assert!("patches".parse::<ResourceKey>().is_err());
    }

    #[test]
    fn category_maps_to_version_and_source_keys() {
        assert_eq!(
            ResourceCategory::Integration.version_key(),
            ResourceKey::IntegrationVersion
        );
        assert_eq!(
            ResourceCategory::Integration.source_key(),
            ResourceKey::IntegrationSource
        );
        assert_eq!(ResourceCategory::Patch.version_key(), ResourceKey::PatchVersion);
        assert_eq!(ResourceCategory::Patch.source_key(), ResourceKey::PatchSource);
    }

    #[test]
    fn snapshot_pairs_every_release_with_the_category_location() {
        let fetched = FetchedResources {
            integrations: vec![ResourceRelease::new("v1.0.0")],
            integrations_dl: "https://github.com/a/integrations/releases/latest".to_string(),
            patches: vec![ResourceRelease::new("v2.1.0"), ResourceRelease::new("v2.0.0")],
            patches_dl: "https://github.com/a/patches/releases/latest".to_string(),
        };

        let patches = fetched.snapshot(ResourceCategory::Patch);

        assert_eq!(patches.versions, vec!["v2.1.0", "v2.0.0"]);
        assert_eq!(
            patches.sources,
            vec!["https://github.com/a/patches/releases/latest"]
        );
        assert_eq!(
            fetched.values_for(ResourceKey::IntegrationVersion),
            vec!["v1.0.0"]
        );
    }
}
