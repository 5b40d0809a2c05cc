use crate::keep::{Anchors, should_keep_run, should_keep_run_artifacts, too_new};
use crate::{Build, CleanupGuard, Job, Result, RetentionConfig};
use chrono::{DateTime, TimeDelta, Utc};
use std::sync::Arc;
use tracing::debug;

/// Discards old builds of a job according to a [`RetentionConfig`].
///
/// Two passes run in order. The count pass walks the builds newest first and
/// deletes records past `num_to_keep`, or only artifacts past
/// `artifact_num_to_keep`. The age pass walks oldest first and does the same
/// for builds started before the day cutoffs, stopping at the first build
/// inside every active window.
///
/// Pinned and in-progress builds, the last successful and last stable builds,
/// and (with `upstream_keep`) builds whose upstream trigger still exists are
/// never deleted.
#[derive(Debug, Clone)]
pub struct RetentionPolicy {
    config: RetentionConfig,
    guard: Arc<CleanupGuard>,
}

impl RetentionPolicy {
    pub fn new(config: RetentionConfig) -> Self {
        Self::with_guard(config, CleanupGuard::global())
    }

    pub fn with_guard(config: RetentionConfig, guard: Arc<CleanupGuard>) -> Self {
        Self { config, guard }
    }

    pub fn config(&self) -> &RetentionConfig {
        &self.config
    }

    pub fn perform<J: Job>(&self, job: &J) -> Result<()> {
        self.perform_at(job, Utc::now())
    }

    /// Runs the rotation with `now` as the reference instant for age limits.
    ///
    /// Returns immediately if a rotation for the same job is already running.
    /// The first failed deletion aborts the run; builds deleted before it stay
    /// deleted.
    pub fn perform_at<J: Job>(&self, job: &J, now: DateTime<Utc>) -> Result<()> {
        let Some(_ticket) = self.guard.try_acquire(job.id()) else {
            debug!("Log rotation for {} is already running", job.full_name());
            return Ok(());
        };

        debug!(
            "Running the log rotation for {} with {}",
            job.full_name(),
            self.config
        );

        let anchors = Anchors {
            last_successful: job.last_successful_build(),
            last_stable: job.last_stable_build(),
        };

        if self.config.has_count_limit() {
            self.rotate_by_count(job, &anchors)?;
        }

        if self.config.has_age_limit() {
            self.rotate_by_age(job, &anchors, now)?;
        }

        Ok(())
    }

    fn rotate_by_count<J: Job>(&self, job: &J, anchors: &Anchors<J::Build>) -> Result<()> {
        let num_to_keep = self.config.num_to_keep().map(to_index);
        let artifact_num_to_keep = self.config.artifact_num_to_keep().map(to_index);

        // Nothing newer than the smaller active limit can be touched.
        let Some(start) = num_to_keep.into_iter().chain(artifact_num_to_keep).min() else {
            return Ok(());
        };

        // `builds()` is an owned snapshot, so deletions below do not shift it.
        for (i, r) in job.builds().into_iter().enumerate().skip(start) {
            let mut deleted = false;

            if num_to_keep.is_some_and(|n| n <= i) && !should_keep_run(&r, anchors, &self.config) {
                debug!("{} is to be removed", r);
                r.delete()?;
                deleted = true;
            }

            if !deleted
                && artifact_num_to_keep.is_some_and(|n| n <= i)
                && !should_keep_run_artifacts(&r, anchors, &self.config)
            {
                debug!("{} is to be purged of artifacts", r);
                r.delete_artifacts()?;
            }
        }

        Ok(())
    }

    fn rotate_by_age<J: Job>(
        &self,
        job: &J,
        anchors: &Anchors<J::Build>,
        now: DateTime<Utc>,
    ) -> Result<()> {
        let build_cutoff = self.config.days_to_keep().map(|d| cutoff(now, d));
        let artifact_cutoff = self.config.artifact_days_to_keep().map(|d| cutoff(now, d));

        let mut next = job.first_build();
        while let Some(r) = next {
            if let Some(cutoff) = build_cutoff
                && !too_new(&r, cutoff)
                && !should_keep_run(&r, anchors, &self.config)
            {
                debug!("{} is to be removed", r);
                r.delete()?;
            }

            // Evaluated even when the record was just removed above.
            if let Some(cutoff) = artifact_cutoff
                && !too_new(&r, cutoff)
                && !should_keep_run_artifacts(&r, anchors, &self.config)
            {
                debug!("{} is to be purged of artifacts", r);
                r.delete_artifacts()?;
            }

            // Builds are in start order: once one is inside every window, so is the rest.
            if build_cutoff.is_none_or(|c| too_new(&r, c))
                && artifact_cutoff.is_none_or(|c| too_new(&r, c))
            {
                break;
            }

            next = r.next_build();
        }

        Ok(())
    }
}

/// Rotates `job` once with the process-wide guard.
pub fn apply<J: Job>(config: &RetentionConfig, job: &J) -> Result<()> {
    RetentionPolicy::new(*config).perform(job)
}

fn to_index(limit: u32) -> usize {
    usize::try_from(limit).unwrap_or(usize::MAX)
}

fn cutoff(now: DateTime<Utc>, days: u32) -> DateTime<Utc> {
    TimeDelta::try_days(i64::from(days))
        .and_then(|age| now.checked_sub_signed(age))
        .unwrap_or(DateTime::<Utc>::MIN_UTC)
}
