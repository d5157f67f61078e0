//! Build set evaluation across all configured applications

use std::sync::Arc;

use tracing::{debug, error, info};

use crate::check::category::{LengthMismatchPolicy, evaluate_category};
use crate::check::decision::{ApplicationDecision, CausedBy, decide};
use crate::check::error::CheckError;
use crate::resource::fetcher::ResourceFetcher;
use crate::resource::store::{SnapshotRecorder, SnapshotStore, last_snapshot};
use crate::resource::types::ResourceCategory;

/// An application whose evaluation failed
#[derive(Debug)]
pub struct AppFailure {
    pub app_name: String,
    pub error: CheckError,
}

/// Applications flagged for a rebuild in one run
#[derive(Debug, Default)]
pub struct BuildSet {
    /// Flagged app names, in the order they were checked
    pub apps: Vec<String>,
    /// Every decision made, flagged or not
    pub decisions: Vec<ApplicationDecision>,
    pub failures: Vec<AppFailure>,
}

impl BuildSet {
    pub fn needs_rebuild(&self) -> bool {
        !self.apps.is_empty()
    }

    /// Comma-separated app names, or None when nothing needs a rebuild
    pub fn output_line(&self) -> Option<String> {
        self.needs_rebuild().then(|| self.apps.join(","))
    }

    fn push(&mut self, decision: ApplicationDecision) {
        if decision.triggered {
            self.apps.push(decision.app_name.clone());
        }
        self.decisions.push(decision);
    }
}

/// Checks each application in turn against its last recorded resources
pub struct BuildSetChecker {
    store: Arc<dyn SnapshotStore>,
    fetcher: Arc<dyn ResourceFetcher>,
    policy: LengthMismatchPolicy,
}

impl BuildSetChecker {
    pub fn new(
        store: Arc<dyn SnapshotStore>,
        fetcher: Arc<dyn ResourceFetcher>,
        policy: LengthMismatchPolicy,
    ) -> Self {
        Self {
            store,
            fetcher,
            policy,
        }
    }

    /// Decide whether a single application needs a rebuild
    pub async fn check_app(&self, app_name: &str) -> Result<ApplicationDecision, CheckError> {
        info!("Checking {}", app_name);

        let store_error = |source| CheckError::Store {
            app: app_name.to_string(),
            source,
        };

        let old_integrations =
            last_snapshot(self.store.as_ref(), app_name, ResourceCategory::Integration)
                .await
                .map_err(store_error)?;
        let old_patches = last_snapshot(self.store.as_ref(), app_name, ResourceCategory::Patch)
            .await
            .map_err(store_error)?;

        let fetched = self
            .fetcher
            .fetch(app_name)
            .await
            .map_err(|source| CheckError::Fetch {
                app: app_name.to_string(),
                source,
            })?;

        let new_integrations = fetched.snapshot(ResourceCategory::Integration);
        let new_patches = fetched.snapshot(ResourceCategory::Patch);

        let integration = evaluate_category(&old_integrations, &new_integrations, self.policy);
        let patches = evaluate_category(&old_patches, &new_patches, self.policy);
        debug!(
            "{}: integration triggered={}, patches triggered={}",
            app_name, integration.triggered, patches.triggered
        );

        let decision = decide(app_name, integration, patches);
        if let Some(caused_by) = &decision.caused_by {
            info!(
                "New build can be triggered caused by {}",
                describe(caused_by)
            );
        }

        Ok(decision)
    }

    /// Check every application, aborting on the first failure
    pub async fn run(&self, app_names: &[String]) -> Result<BuildSet, CheckError> {
        let mut build_set = BuildSet::default();

        for app_name in app_names {
            let decision = self.check_app(app_name).await?;
            build_set.push(decision);
        }

        info!("{:?} need to be repatched.", build_set.apps);
        Ok(build_set)
    }

    /// Check every application, collecting failures instead of aborting
    pub async fn run_isolated(&self, app_names: &[String]) -> BuildSet {
        let mut build_set = BuildSet::default();

        for app_name in app_names {
            match self.check_app(app_name).await {
                Ok(decision) => build_set.push(decision),
                Err(e) => {
                    error!("Skipping {}: {}", app_name, e);
                    build_set.failures.push(AppFailure {
                        app_name: app_name.clone(),
                        error: e,
                    });
                }
            }
        }

        info!(
            "{:?} need to be repatched, {} failed.",
            build_set.apps,
            build_set.failures.len()
        );
        build_set
    }
}

/// Fetch the current resources of each application and record them as the
/// state the next check compares against
pub async fn record_resources(
    fetcher: &dyn ResourceFetcher,
    recorder: &dyn SnapshotRecorder,
    app_names: &[String],
) -> Result<(), CheckError> {
    for app_name in app_names {
        let fetched = fetcher
            .fetch(app_name)
            .await
            .map_err(|source| CheckError::Fetch {
                app: app_name.clone(),
                source,
            })?;

        recorder
            .record(app_name, &fetched)
            .await
            .map_err(|source| CheckError::Record {
                app: app_name.clone(),
                source,
            })?;
    }

    Ok(())
}

fn describe(caused_by: &CausedBy) -> String {
    serde_json::to_string(caused_by).unwrap_or_else(|_| format!("{:?}", caused_by))
}
