//! Per-category change evaluation

use serde::{Deserialize, Serialize};

use crate::check::detector::should_trigger_build;
use crate::resource::types::ResourceSnapshot;

/// What to do when the old and new snapshots hold a different number of resources
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize, Serialize, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum LengthMismatchPolicy {
    /// Compare the common prefix only; added or removed resources are ignored
    #[default]
    Truncate,
    /// Treat an added or removed resource as a change
    Trigger,
}

/// Outcome of comparing one resource category
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CategoryResult {
    pub triggered: bool,
    /// Full old version list, kept for reporting
    pub old_versions: Vec<String>,
    /// Full new version list, kept for reporting
    pub new_versions: Vec<String>,
}

/// Compare the "before" and "after" snapshots of a category.
///
/// Versions and sources are paired by position and compared up to the
/// shortest of the four sequences. An empty side never triggers.
pub fn evaluate_category(
    before: &ResourceSnapshot,
    after: &ResourceSnapshot,
    policy: LengthMismatchPolicy,
) -> CategoryResult {
    let old_pairs = before.versions.iter().zip(&before.sources);
    let new_pairs = after.versions.iter().zip(&after.sources);

    let pair_changed = old_pairs
        .zip(new_pairs)
        .any(|((old_version, old_source), (new_version, new_source))| {
            should_trigger_build(old_version, old_source, new_version, new_source)
        });

    let triggered = pair_changed
        || (policy == LengthMismatchPolicy::Trigger && length_changed(before, after));

    CategoryResult {
        triggered,
        old_versions: before.versions.clone(),
        new_versions: after.versions.clone(),
    }
}

fn length_changed(before: &ResourceSnapshot, after: &ResourceSnapshot) -> bool {
    if before.is_empty() || after.is_empty() {
        return false;
    }

    before.versions.len() != after.versions.len() || before.sources.len() != after.sources.len()
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    fn snapshot(versions: &[&str], sources: &[&str]) -> ResourceSnapshot {
        ResourceSnapshot::new(
            versions.iter().map(|v| v.to_string()).collect(),
            sources.iter().map(|s| s.to_string()).collect(),
        )
    }

    #[rstest]
    #[case(LengthMismatchPolicy::Truncate)]
    #[case(LengthMismatchPolicy::Trigger)]
    fn empty_snapshots_do_not_trigger(#[case] policy: LengthMismatchPolicy) {
        let empty = ResourceSnapshot::default();
        let some = snapshot(&["v1"], &["dl"]);

        assert!(!evaluate_category(&empty, &empty, policy).triggered);
        assert!(!evaluate_category(&empty, &some, policy).triggered);
        assert!(!evaluate_category(&some, &empty, policy).triggered);
    }

    #[test]
    fn identical_snapshots_do_not_trigger() {
        let before = snapshot(&["v1", "v2"], &["dl-a", "dl-b"]);

        let result = evaluate_category(&before, &before.clone(), LengthMismatchPolicy::Truncate);

        assert!(!result.triggered);
    }

    #[rstest]
    #[case(&["v1", "v2"], &["dl-a", "dl-b"], &["v1", "v3"], &["dl-a", "dl-b"])]
    #[case(&["v1", "v2"], &["dl-a", "dl-b"], &["v1", "v2"], &["dl-a", "dl-c"])]
    #[case(&["v1", "v2"], &["dl-a", "dl-b"], &["v0", "v2"], &["dl-z", "dl-b"])]
    fn any_differing_pair_triggers(
        #[case] old_versions: &[&str],
        #[case] old_sources: &[&str],
        #[case] new_versions: &[&str],
        #[case] new_sources: &[&str],
    ) {
        let result = evaluate_category(
            &snapshot(old_versions, old_sources),
            &snapshot(new_versions, new_sources),
            LengthMismatchPolicy::Truncate,
        );

        assert!(result.triggered);
    }

    #[test]
    fn adding_a_differing_pair_keeps_result_triggered() {
        let before = snapshot(&["v1", "v2"], &["dl", "dl"]);
        let after = snapshot(&["v1", "v3"], &["dl", "dl"]);
        assert!(evaluate_category(&before, &after, LengthMismatchPolicy::Truncate).triggered);

        let before = snapshot(&["v1", "v2", "v5"], &["dl", "dl", "dl"]);
        let after = snapshot(&["v1", "v3", "v6"], &["dl", "dl", "dl"]);
        assert!(evaluate_category(&before, &after, LengthMismatchPolicy::Truncate).triggered);
    }

    #[test]
    fn removing_every_differing_pair_untriggers() {
        let before = snapshot(&["v1", "v2"], &["dl", "dl"]);
        let after = snapshot(&["v1", "v2"], &["dl", "dl"]);

        assert!(!evaluate_category(&before, &after, LengthMismatchPolicy::Truncate).triggered);
    }

    #[test]
    fn truncate_ignores_resources_beyond_the_shorter_snapshot() {
        let before = snapshot(&["v1", "v2", "v3"], &["dl-a", "dl-b", "dl-c"]);
        let after = snapshot(&["v1", "v2"], &["dl-a", "dl-b"]);

        let result = evaluate_category(&before, &after, LengthMismatchPolicy::Truncate);

        assert!(!result.triggered);
    }

    #[test]
    fn truncate_pairs_up_to_the_shortest_of_all_four_sequences() {
        // A single new source limits the comparison to the first position
        let before = snapshot(&["v1", "v2"], &["dl", "dl"]);
        let after = snapshot(&["v1", "v9"], &["dl"]);

        let result = evaluate_category(&before, &after, LengthMismatchPolicy::Truncate);

        assert!(!result.triggered);
    }

    #[test]
    fn trigger_policy_treats_removed_resource_as_change() {
        let before = snapshot(&["v1", "v2", "v3"], &["dl-a", "dl-b", "dl-c"]);
        let after = snapshot(&["v1", "v2"], &["dl-a", "dl-b"]);

        let result = evaluate_category(&before, &after, LengthMismatchPolicy::Trigger);

        assert!(result.triggered);
    }

    #[test]
    fn trigger_policy_keeps_equal_lengths_untriggered() {
        let before = snapshot(&["v1"], &["dl"]);

        let result = evaluate_category(&before, &before.clone(), LengthMismatchPolicy::Trigger);

        assert!(!result.triggered);
    }

    #[test]
    fn result_keeps_full_version_lists() {
        let before = snapshot(&["v0", "v1", "v2"], &["dl", "dl", "dl"]);
        let after = snapshot(&["v9"], &["dl"]);

        let result = evaluate_category(&before, &after, LengthMismatchPolicy::Truncate);

        assert_eq!(
            result,
            CategoryResult {
                triggered: true,
                old_versions: vec!["v0".to_string(), "v1".to_string(), "v2".to_string()],
                new_versions: vec!["v9".to_string()],
            }
        );
    }
}
