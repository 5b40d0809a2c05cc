use crate::JobId;
use std::collections::HashSet;
use std::sync::{Arc, LazyLock, Mutex, MutexGuard, PoisonError};

static GLOBAL: LazyLock<Arc<CleanupGuard>> = LazyLock::new(|| Arc::new(CleanupGuard::new()));

/// Set of jobs with a rotation in progress.
///
/// A job is claimed with [`CleanupGuard::try_acquire`] and released when the
/// returned ticket is dropped, whether the rotation finished or failed.
#[derive(Debug, Default)]
pub struct CleanupGuard {
    running: Mutex<HashSet<JobId>>,
}

impl CleanupGuard {
    pub fn new() -> Self {
        Self::default()
    }

    /// The process-wide guard shared by every policy built with
    /// [`RetentionPolicy::new`](crate::RetentionPolicy::new).
    pub fn global() -> Arc<CleanupGuard> {
        GLOBAL.clone()
    }

    /// Claims `job`, or returns `None` when a rotation for it is already running.
    pub fn try_acquire(&self, job: JobId) -> Option<CleanupTicket<'_>> {
        if !self.lock().insert(job) {
            return None;
        }

        Some(CleanupTicket { guard: self, job })
    }

    pub fn is_running(&self, job: JobId) -> bool {
        self.lock().contains(&job)
    }

    pub fn len(&self) -> usize {
        self.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.lock().is_empty()
    }

    // Every mutation is a single insert or remove, so the set is consistent
    // even if a holder panicked.
    fn lock(&self) -> MutexGuard<'_, HashSet<JobId>> {
        self.running.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

/// Proof that a job is claimed. Releases the job on drop.
#[derive(Debug)]
pub struct CleanupTicket<'a> {
    guard: &'a CleanupGuard,
    job: JobId,
}

impl CleanupTicket<'_> {
    pub fn job(&self) -> JobId {
        self.job
    }
}

impl Drop for CleanupTicket<'_> {
    fn drop(&mut self) {
        self.guard.lock().remove(&self.job);
    }
}
