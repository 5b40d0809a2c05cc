use crate::limit::{self, from_sentinel, parse_flag, parse_limit, to_form_string};
use serde::{Deserialize, Serialize};

/// Limits applied when discarding old builds of a job.
///
/// Every limit is `None` when unlimited. The persisted form keeps the
/// historical shape: `days_to_keep` and `num_to_keep` are always written as
/// numeric strings (`"-1"` for unlimited), the artifact limits are left out
/// entirely when unlimited.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RetentionConfig {
    #[serde(default, with = "limit::mandatory")]
    days_to_keep: Option<u32>,

    #[serde(default, with = "limit::mandatory")]
    num_to_keep: Option<u32>,

    #[serde(
        default,
        with = "limit::optional",
        skip_serializing_if = "Option::is_none"
    )]
    artifact_days_to_keep: Option<u32>,

    #[serde(
        default,
        with = "limit::optional",
        skip_serializing_if = "Option::is_none"
    )]
    artifact_num_to_keep: Option<u32>,

    /// Keep builds whose upstream trigger still exists.
    #[serde(default)]
    upstream_keep: bool,

    /// Also keep their artifacts. Only meaningful with `upstream_keep`.
    #[serde(default)]
    upstream_keep_artifacts: bool,
}

impl RetentionConfig {
    /// Age and count limits for full records only; `-1` disables a limit.
    pub fn new(days_to_keep: i64, num_to_keep: i64) -> Self {
        Self::with_upstream(days_to_keep, num_to_keep, -1, -1, false, false)
    }

    pub fn with_artifacts(
        days_to_keep: i64,
        num_to_keep: i64,
        artifact_days_to_keep: i64,
        artifact_num_to_keep: i64,
    ) -> Self {
        Self::with_upstream(
            days_to_keep,
            num_to_keep,
            artifact_days_to_keep,
            artifact_num_to_keep,
            false,
            false,
        )
    }

    pub fn with_upstream(
        days_to_keep: i64,
        num_to_keep: i64,
        artifact_days_to_keep: i64,
        artifact_num_to_keep: i64,
        upstream_keep: bool,
        upstream_keep_artifacts: bool,
    ) -> Self {
        Self {
            days_to_keep: from_sentinel(days_to_keep),
            num_to_keep: from_sentinel(num_to_keep),
            artifact_days_to_keep: from_sentinel(artifact_days_to_keep),
            artifact_num_to_keep: from_sentinel(artifact_num_to_keep),
            upstream_keep,
            upstream_keep_artifacts,
        }
    }

    /// Builds a config from submitted form values. Anything that does not
    /// parse as an integer becomes unlimited; missing checkboxes are unset.
    pub fn from_form(
        days_to_keep: Option<&str>,
        num_to_keep: Option<&str>,
        artifact_days_to_keep: Option<&str>,
        artifact_num_to_keep: Option<&str>,
        upstream_keep: Option<bool>,
        upstream_keep_artifacts: Option<bool>,
    ) -> Self {
        Self {
            days_to_keep: days_to_keep.and_then(parse_limit),
            num_to_keep: num_to_keep.and_then(parse_limit),
            artifact_days_to_keep: artifact_days_to_keep.and_then(parse_limit),
            artifact_num_to_keep: artifact_num_to_keep.and_then(parse_limit),
            upstream_keep: parse_flag(upstream_keep),
            upstream_keep_artifacts: parse_flag(upstream_keep_artifacts),
        }
    }

    pub fn days_to_keep(&self) -> Option<u32> {
        self.days_to_keep
    }

    pub fn num_to_keep(&self) -> Option<u32> {
        self.num_to_keep
    }

    pub fn artifact_days_to_keep(&self) -> Option<u32> {
        self.artifact_days_to_keep
    }

    pub fn artifact_num_to_keep(&self) -> Option<u32> {
        self.artifact_num_to_keep
    }

    pub fn upstream_keep(&self) -> bool {
        self.upstream_keep
    }

    pub fn upstream_keep_artifacts(&self) -> bool {
        self.upstream_keep_artifacts
    }

    pub fn days_to_keep_str(&self) -> String {
        to_form_string(self.days_to_keep)
    }

    pub fn num_to_keep_str(&self) -> String {
        to_form_string(self.num_to_keep)
    }

    pub fn artifact_days_to_keep_str(&self) -> String {
        to_form_string(self.artifact_days_to_keep)
    }

    pub fn artifact_num_to_keep_str(&self) -> String {
        to_form_string(self.artifact_num_to_keep)
    }

    /// True when a count limit applies to either records or artifacts.
    pub fn has_count_limit(&self) -> bool {
        self.num_to_keep.is_some() || self.artifact_num_to_keep.is_some()
    }

    /// True when an age limit applies to either records or artifacts.
    pub fn has_age_limit(&self) -> bool {
        self.days_to_keep.is_some() || self.artifact_days_to_keep.is_some()
    }
}

impl std::fmt::Display for RetentionConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        use crate::limit::as_sentinel;

        write!(
            f,
            "numToKeep={} daysToKeep={} artifactNumToKeep={} artifactDaysToKeep={} upstreamKeep={} upstreamKeepArtifacts={}",
            as_sentinel(self.num_to_keep),
            as_sentinel(self.days_to_keep),
            as_sentinel(self.artifact_num_to_keep),
            as_sentinel(self.artifact_days_to_keep),
            self.upstream_keep,
            self.upstream_keep_artifacts
        )
    }
}
