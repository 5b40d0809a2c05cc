pub mod builds;
pub mod causes;
pub mod error;
pub mod jobs;

pub use builds::{BuildHandle, BuildResult, NewBuild};
pub use causes::{Cause, UpstreamCause};
pub use error::{Result, StoreError};
pub use jobs::JobHandle;

use std::collections::HashMap;
use std::sync::{PoisonError, RwLock, RwLockReadGuard, RwLockWriteGuard};

/// In-memory build history for any number of jobs.
#[derive(Debug, Default)]
pub struct Store {
    jobs: RwLock<HashMap<String, JobHandle>>,
}

impl Store {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn jobs(&self) -> jobs::JobRepository<'_> {
        jobs::JobRepository::new(&self.jobs)
    }
}

// A panic while holding one of these locks leaves the map or build state
// whole, so poisoning is ignored.
pub(crate) fn read<T>(lock: &RwLock<T>) -> RwLockReadGuard<'_, T> {
    lock.read().unwrap_or_else(PoisonError::into_inner)
}

pub(crate) fn write<T>(lock: &RwLock<T>) -> RwLockWriteGuard<'_, T> {
    lock.write().unwrap_or_else(PoisonError::into_inner)
}
