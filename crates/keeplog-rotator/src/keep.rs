//! Keep tests shared by the count and age passes.

use crate::{Build, RetentionConfig, TriggerCause};
use chrono::{DateTime, Utc};
use tracing::trace;

/// Builds captured once at the start of a rotation. They stay protected for
/// the whole run even if deletions would change what "last successful" means.
pub(crate) struct Anchors<B> {
    pub last_successful: Option<B>,
    pub last_stable: Option<B>,
}

/// Builds that must keep both record and artifacts whatever the limits say.
pub(crate) fn should_keep_complete_run<B: Build>(r: &B, anchors: &Anchors<B>) -> bool {
    if r.is_keep_log() {
        trace!(
            "{} is not to be removed or purged of artifacts because it's marked as a keeper",
            r
        );
        return true;
    }
    if anchors.last_successful.as_ref() == Some(r) {
        trace!(
            "{} is not to be removed or purged of artifacts because it's the last successful build",
            r
        );
        return true;
    }
    if anchors.last_stable.as_ref() == Some(r) {
        trace!(
            "{} is not to be removed or purged of artifacts because it's the last stable build",
            r
        );
        return true;
    }
    if r.is_building() {
        trace!(
            "{} is not to be removed or purged of artifacts because it's still building",
            r
        );
        return true;
    }
    false
}

pub(crate) fn should_keep_run<B: Build>(
    r: &B,
    anchors: &Anchors<B>,
    config: &RetentionConfig,
) -> bool {
    if should_keep_complete_run(r, anchors) {
        return true;
    }
    if config.upstream_keep() && upstream_builds_exist(r) {
        trace!(
            "{} is not to be removed because an upstream cause still exists",
            r
        );
        return true;
    }
    false
}

pub(crate) fn should_keep_run_artifacts<B: Build>(
    r: &B,
    anchors: &Anchors<B>,
    config: &RetentionConfig,
) -> bool {
    if should_keep_complete_run(r, anchors) {
        return true;
    }
    if config.upstream_keep() && config.upstream_keep_artifacts() && upstream_builds_exist(r) {
        trace!(
            "{} is not to be removed or purged of artifacts because an upstream cause still exists",
            r
        );
        return true;
    }
    false
}

/// A build started at or after `cutoff` is inside the retention window.
pub(crate) fn too_new<B: Build>(r: &B, cutoff: DateTime<Utc>) -> bool {
    if r.timestamp() >= cutoff {
        trace!(
            "{} is not to be removed or purged of artifacts because it's still new",
            r
        );
        return true;
    }
    false
}

/// An upstream cause only counts while the upstream build it names is alive.
pub(crate) fn upstream_builds_exist<B: Build>(r: &B) -> bool {
    r.causes()
        .iter()
        .any(|c| c.upstream_alive() == Some(true))
}
