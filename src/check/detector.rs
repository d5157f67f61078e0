//! Change detection for a single resource pair

/// Returns true if either the version or the source location changed.
///
/// Version and source are independent signals: a resource can move without a
/// version bump, or be re-released in place.
pub fn should_trigger_build(
    old_version: &str,
    old_source: &str,
    new_version: &str,
    new_source: &str,
) -> bool {
    old_version != new_version || old_source != new_source
}
