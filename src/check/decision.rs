//! Per-application rebuild decision

use serde::Serialize;

use crate::check::category::CategoryResult;

/// Old and new versions of one category
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct VersionChange {
    pub old: Vec<String>,
    pub new: Vec<String>,
}

impl From<CategoryResult> for VersionChange {
    fn from(result: CategoryResult) -> Self {
        Self {
            old: result.old_versions,
            new: result.new_versions,
        }
    }
}

/// Why an application was flagged for a rebuild
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CausedBy {
    pub app_name: String,
    pub integration: VersionChange,
    pub patches: VersionChange,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ApplicationDecision {
    pub app_name: String,
    pub triggered: bool,
    /// Present only when `triggered` is true
    pub caused_by: Option<CausedBy>,
}

/// Combine both category results into one decision
pub fn decide(
    app_name: &str,
    integration: CategoryResult,
    patches: CategoryResult,
) -> ApplicationDecision {
    let triggered = integration.triggered || patches.triggered;

    let caused_by = triggered.then(|| CausedBy {
        app_name: app_name.to_string(),
        integration: integration.into(),
        patches: patches.into(),
    });

    ApplicationDecision {
        app_name: app_name.to_string(),
        triggered,
        caused_by,
    }
}
