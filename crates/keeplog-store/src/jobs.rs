use crate::builds::{BuildHandle, BuildResult, NewBuild};
use crate::{Cause, Result, StoreError, read, write};
use chrono::{DateTime, Utc};
use keeplog_rotator::{Build, Job, JobId};
use std::collections::{BTreeMap, HashMap};
use std::sync::atomic::{AtomicU32, Ordering};
use std::sync::{Arc, RwLock};
use tracing::{debug, info};

pub struct JobRepository<'a> {
    jobs: &'a RwLock<HashMap<String, JobHandle>>,
}

impl<'a> JobRepository<'a> {
    pub(crate) fn new(jobs: &'a RwLock<HashMap<String, JobHandle>>) -> Self {
        Self { jobs }
    }

    pub fn create(&self, name: &str) -> Result<JobHandle> {
        let mut jobs = write(self.jobs);
        if jobs.contains_key(name) {
            return Err(StoreError::JobAlreadyExists(name.to_string()));
        }

        let job = JobHandle::new(name);
        jobs.insert(name.to_string(), job.clone());
        info!("Created job {}", name);
        Ok(job)
    }

    pub fn find_by_name(&self, name: &str) -> Option<JobHandle> {
        read(self.jobs).get(name).cloned()
    }

    /// All jobs ordered by name.
    pub fn list(&self) -> Vec<JobHandle> {
        let mut jobs: Vec<_> = read(self.jobs).values().cloned().collect();
        jobs.sort_by(|a, b| a.name().cmp(b.name()));
        jobs
    }

    /// Removes the job and every build it still has.
    pub fn delete(&self, name: &str) -> Result<()> {
        let job = write(self.jobs)
            .remove(name)
            .ok_or_else(|| StoreError::JobNotFound(name.to_string()))?;

        for build in job.builds() {
            build.discard();
        }
        info!("Deleted job {}", name);
        Ok(())
    }
}

#[derive(Debug)]
pub(crate) struct JobInner {
    id: JobId,
    pub(crate) name: String,
    next_number: AtomicU32,
    pub(crate) builds: RwLock<BTreeMap<u32, BuildHandle>>,
}

/// Shared handle to one job's build history.
#[derive(Debug, Clone)]
pub struct JobHandle(Arc<JobInner>);

impl JobHandle {
    fn new(name: &str) -> Self {
        Self(Arc::new(JobInner {
            id: JobId::next(),
            name: name.to_string(),
            next_number: AtomicU32::new(1),
            builds: RwLock::new(BTreeMap::new()),
        }))
    }

    pub fn name(&self) -> &str {
        &self.0.name
    }

    /// Starts a build now. It stays in progress until completed.
    pub fn start_build(&self, causes: Vec<Cause>) -> BuildHandle {
        self.start_build_at(causes, Utc::now())
    }

    pub fn start_build_at(&self, causes: Vec<Cause>, timestamp: DateTime<Utc>) -> BuildHandle {
        let number = self.0.next_number.fetch_add(1, Ordering::SeqCst);
        let build = BuildHandle::new(&self.0, number, timestamp, causes);
        write(&self.0.builds).insert(number, build.clone());
        debug!("Started {}", build);
        build
    }

    /// Records a build that has already finished.
    pub fn record_build(&self, new: NewBuild) -> BuildHandle {
        let build = self.start_build_at(new.causes, new.timestamp.unwrap_or_else(Utc::now));
        build.set_keep_log(new.keep_log);
        build.complete(new.result, new.artifacts);
        build
    }

    pub fn build_by_number(&self, number: u32) -> Option<BuildHandle> {
        read(&self.0.builds).get(&number).cloned()
    }

    pub fn require_build(&self, number: u32) -> Result<BuildHandle> {
        self.build_by_number(number)
            .ok_or_else(|| StoreError::BuildNotFound {
                job: self.name().to_string(),
                number,
            })
    }

    pub fn last_build(&self) -> Option<BuildHandle> {
        read(&self.0.builds).values().next_back().cloned()
    }

    pub fn len(&self) -> usize {
        read(&self.0.builds).len()
    }

    pub fn is_empty(&self) -> bool {
        read(&self.0.builds).is_empty()
    }

    fn last_completed_matching(&self, at_least: BuildResult) -> Option<BuildHandle> {
        read(&self.0.builds)
            .values()
            .rev()
            .find(|b| !b.is_building() && b.result().is_some_and(|r| r >= at_least))
            .cloned()
    }
}

impl PartialEq for JobHandle {
    fn eq(&self, other: &Self) -> bool {
        Arc::ptr_eq(&self.0, &other.0)
    }
}

impl Eq for JobHandle {}

impl Job for JobHandle {
    type Build = BuildHandle;

    fn id(&self) -> JobId {
        self.0.id
    }

    fn full_name(&self) -> &str {
        self.name()
    }

    fn builds(&self) -> Vec<BuildHandle> {
        read(&self.0.builds).values().rev().cloned().collect()
    }

    fn first_build(&self) -> Option<BuildHandle> {
        read(&self.0.builds).values().next().cloned()
    }

    /// Newest finished build that succeeded, possibly with test failures.
    fn last_successful_build(&self) -> Option<BuildHandle> {
        self.last_completed_matching(BuildResult::Unstable)
    }

    /// Newest finished build that succeeded cleanly.
    fn last_stable_build(&self) -> Option<BuildHandle> {
        self.last_completed_matching(BuildResult::Success)
    }
}
