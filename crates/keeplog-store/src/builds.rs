use crate::jobs::JobInner;
use crate::{Cause, read, write};
use chrono::{DateTime, Utc};
use keeplog_rotator::Build;
use std::fmt;
use std::sync::{Arc, RwLock, Weak};
use tracing::debug;

/// Outcome of a finished build, worst to best.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum BuildResult {
    Aborted,
    NotBuilt,
    Failure,
    Unstable,
    Success,
}

/// A finished build to add to a job's history.
#[derive(Debug, Clone)]
pub struct NewBuild {
    pub result: BuildResult,
    pub causes: Vec<Cause>,
    pub artifacts: Vec<String>,
    /// Defaults to now.
    pub timestamp: Option<DateTime<Utc>>,
    pub keep_log: bool,
}

impl Default for NewBuild {
    fn default() -> Self {
        Self {
            result: BuildResult::Success,
            causes: Vec::new(),
            artifacts: Vec::new(),
            timestamp: None,
            keep_log: false,
        }
    }
}

#[derive(Debug)]
struct BuildState {
    building: bool,
    result: Option<BuildResult>,
    keep_log: bool,
    artifacts: Vec<String>,
    deleted: bool,
}

#[derive(Debug)]
pub(crate) struct BuildInner {
    job_name: String,
    number: u32,
    timestamp: DateTime<Utc>,
    causes: Vec<Cause>,
    job: Weak<JobInner>,
    state: RwLock<BuildState>,
}

/// Shared handle to a single build. Equality is identity.
#[derive(Debug, Clone)]
pub struct BuildHandle(pub(crate) Arc<BuildInner>);

impl BuildHandle {
    pub(crate) fn new(
        job: &Arc<JobInner>,
        number: u32,
        timestamp: DateTime<Utc>,
        causes: Vec<Cause>,
    ) -> Self {
        Self(Arc::new(BuildInner {
            job_name: job.name.clone(),
            number,
            timestamp,
            causes,
            job: Arc::downgrade(job),
            state: RwLock::new(BuildState {
                building: true,
                result: None,
                keep_log: false,
                artifacts: Vec::new(),
                deleted: false,
            }),
        }))
    }

    pub fn number(&self) -> u32 {
        self.0.number
    }

    pub fn job_name(&self) -> &str {
        &self.0.job_name
    }

    /// `None` while the build is in progress.
    pub fn result(&self) -> Option<BuildResult> {
        read(&self.0.state).result
    }

    pub fn artifacts(&self) -> Vec<String> {
        read(&self.0.state).artifacts.clone()
    }

    pub fn has_artifacts(&self) -> bool {
        !read(&self.0.state).artifacts.is_empty()
    }

    pub fn is_deleted(&self) -> bool {
        read(&self.0.state).deleted
    }

    pub fn set_keep_log(&self, keep: bool) {
        write(&self.0.state).keep_log = keep;
    }

    /// Finishes the build with its result and archived artifacts.
    pub fn complete(&self, result: BuildResult, artifacts: Vec<String>) {
        let mut state = write(&self.0.state);
        state.building = false;
        state.result = Some(result);
        state.artifacts = artifacts;
        debug!("{} completed with {:?}", self, result);
    }

    pub fn previous_build(&self) -> Option<BuildHandle> {
        let job = self.0.job.upgrade()?;
        let builds = read(&job.builds);
        builds
            .range(..self.0.number)
            .next_back()
            .map(|(_, b)| b.clone())
    }

    /// Marks the build gone without touching the job's build map.
    pub(crate) fn discard(&self) -> bool {
        let mut state = write(&self.0.state);
        if state.deleted {
            return false;
        }
        state.deleted = true;
        state.artifacts.clear();
        true
    }
}

impl PartialEq for BuildHandle {
    fn eq(&self, other: &Self) -> bool {
        Arc::ptr_eq(&self.0, &other.0)
    }
}

impl Eq for BuildHandle {}

impl fmt::Display for BuildHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} #{}", self.0.job_name, self.0.number)
    }
}

impl Build for BuildHandle {
    type Cause = Cause;

    fn timestamp(&self) -> DateTime<Utc> {
        self.0.timestamp
    }

    fn is_keep_log(&self) -> bool {
        read(&self.0.state).keep_log
    }

    fn is_building(&self) -> bool {
        read(&self.0.state).building
    }

    fn causes(&self) -> Vec<Cause> {
        self.0.causes.clone()
    }

    fn next_build(&self) -> Option<BuildHandle> {
        let job = self.0.job.upgrade()?;
        let builds = read(&job.builds);
        builds
            .range(self.0.number + 1..)
            .next()
            .map(|(_, b)| b.clone())
    }

    fn delete(&self) -> keeplog_rotator::Result<()> {
        if !self.discard() {
            debug!("{} is already deleted", self);
            return Ok(());
        }

        if let Some(job) = self.0.job.upgrade() {
            write(&job.builds).remove(&self.0.number);
        }
        debug!("Deleted {}", self);
        Ok(())
    }

    fn delete_artifacts(&self) -> keeplog_rotator::Result<()> {
        let mut state = write(&self.0.state);
        if state.deleted {
            return Ok(());
        }
        let purged = std::mem::take(&mut state.artifacts);
        if !purged.is_empty() {
            debug!("Purged {} artifact(s) of {}", purged.len(), self);
        }
        Ok(())
    }
}
