use std::collections::HashMap;
use std::path::{Path, PathBuf};

use serde::Deserialize;
use thiserror::Error;

use crate::check::category::LengthMismatchPolicy;
use crate::resource::github::DEFAULT_API_URL;
use crate::resource::stores::github::DEFAULT_ASSET_NAME;

/// Applications checked when no list is given
pub const DEFAULT_APPS: &[&str] = &["youtube", "youtube_music"];

/// Default location of the integration resources
pub const DEFAULT_INTEGRATIONS_DL: &str =
    "https://github.com/revanced/revanced-integrations/releases/latest";

/// Default location of the patch resources
pub const DEFAULT_PATCHES_DL: &str = "https://github.com/revanced/revanced-patches/releases/latest";

/// Exit code used with `--require-changes` when no app needs a rebuild
pub const NO_REBUILD_EXIT_CODE: u8 = 2;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config file {path:?}: {source}")]
    Read {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("Invalid config file {path:?}: {source}")]
    Parse {
        path: PathBuf,
        source: serde_json::Error,
    },
}

/// Checker configuration structure
#[derive(Debug, Clone, Deserialize, Default, PartialEq)]
#[serde(default, rename_all = "camelCase")]
pub struct CheckerConfig {
    pub store: StoreConfig,
    pub resources: ResourcesConfig,
    pub length_mismatch: LengthMismatchPolicy,
}

impl CheckerConfig {
    /// Load a JSON config file; missing fields take their defaults
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;

        serde_json::from_str(&content).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })
    }
}

/// Where the last build's resources are recorded
#[derive(Debug, Clone, Deserialize, PartialEq)]
#[serde(default, rename_all = "camelCase")]
pub struct StoreConfig {
    /// `owner/repo` whose latest release carries the build info asset
    pub repository: Option<String>,
    pub asset_name: String,
    pub api_url: String,
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            repository: None,
            asset_name: DEFAULT_ASSET_NAME.to_string(),
            api_url: DEFAULT_API_URL.to_string(),
        }
    }
}

/// Resource locations, with optional per-app overrides
#[derive(Debug, Clone, Deserialize, PartialEq)]
#[serde(default, rename_all = "camelCase")]
pub struct ResourcesConfig {
    pub integrations_dl: String,
    pub patches_dl: String,
    pub apps: HashMap<String, AppResourcesConfig>,
}

impl Default for ResourcesConfig {
    fn default() -> Self {
        Self {
            integrations_dl: DEFAULT_INTEGRATIONS_DL.to_string(),
            patches_dl: DEFAULT_PATCHES_DL.to_string(),
            apps: HashMap::new(),
        }
    }
}

impl ResourcesConfig {
    pub fn integrations_dl(&self, app_name: &str) -> &str {
        self.apps
            .get(app_name)
            .and_then(|app| app.integrations_dl.as_deref())
            .unwrap_or(&self.integrations_dl)
    }

    pub fn patches_dl(&self, app_name: &str) -> &str {
        self.apps
            .get(app_name)
            .and_then(|app| app.patches_dl.as_deref())
            .unwrap_or(&self.patches_dl)
    }
}

#[derive(Debug, Clone, Deserialize, Default, PartialEq)]
#[serde(default, rename_all = "camelCase")]
pub struct AppResourcesConfig {
    pub integrations_dl: Option<String>,
    pub patches_dl: Option<String>,
}

/// Returns the path to the data directory for repatch-check.
/// Uses $XDG_DATA_HOME/repatch-check if XDG_DATA_HOME is set,
/// otherwise falls back to ~/.local/share/repatch-check,
/// or ./repatch-check if neither is available.
pub fn data_dir() -> PathBuf {
    data_dir_with_env(std::env::var("XDG_DATA_HOME").ok(), dirs::home_dir())
}

/// Returns the path to the local snapshot database.
pub fn db_path() -> PathBuf {
    data_dir().join("snapshots.db")
}

/// Returns the default path of the log file.
pub fn log_path() -> PathBuf {
    data_dir().join("repatch-check.log")
}

fn data_dir_with_env(xdg_data_home: Option<String>, home_dir: Option<PathBuf>) -> PathBuf {
    let data_dir = xdg_data_home
        .map(PathBuf::from)
        .or_else(|| home_dir.map(|home| home.join(".local/share")))
        .unwrap_or_else(|| PathBuf::from("."));

    data_dir.join("repatch-check")
}
