use crate::Result;
use chrono::{DateTime, Utc};
use std::fmt;
use std::sync::atomic::{AtomicU64, Ordering};

/// Why a build was started.
pub trait TriggerCause {
    /// `None` when the cause is not an upstream trigger. Otherwise whether the
    /// upstream build it points at still exists.
    fn upstream_alive(&self) -> Option<bool>;
}

/// One build of a job, as seen by the rotator.
///
/// Handles are cheap to clone and compare by identity: two handles are equal
/// only when they refer to the same build.
pub trait Build: Clone + PartialEq + fmt::Display {
    type Cause: TriggerCause;

    fn timestamp(&self) -> DateTime<Utc>;

    /// Pinned by a user or another system; never discarded.
    fn is_keep_log(&self) -> bool;

    fn is_building(&self) -> bool;

    fn causes(&self) -> Vec<Self::Cause>;

    /// The next newer build, skipping numbers that no longer exist.
    fn next_build(&self) -> Option<Self>;

    /// Removes the whole build record, log and artifacts included.
    fn delete(&self) -> Result<()>;

    /// Removes only the archived artifacts and keeps the record.
    fn delete_artifacts(&self) -> Result<()>;
}

/// Identity of a job within the process. Two jobs with the same name in
/// different stores still have distinct ids.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct JobId(u64);

impl JobId {
    /// Allocates an id no other job in this process has been given.
    pub fn next() -> Self {
        static NEXT: AtomicU64 = AtomicU64::new(1);
        Self(NEXT.fetch_add(1, Ordering::Relaxed))
    }
}

impl fmt::Display for JobId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

pub trait Job {
    type Build: Build;

    /// Key used to serialize rotations of the same job. Must stay the same for
    /// the lifetime of the job.
    fn id(&self) -> JobId;

    /// Name used in log lines.
    fn full_name(&self) -> &str;

    /// All builds, newest first. The returned list is a snapshot owned by the
    /// caller.
    fn builds(&self) -> Vec<Self::Build>;

    fn first_build(&self) -> Option<Self::Build>;

    fn last_successful_build(&self) -> Option<Self::Build>;

    fn last_stable_build(&self) -> Option<Self::Build>;
}
