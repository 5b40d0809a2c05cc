use crate::{Result, SweeperConfig};
use keeplog_rotator::RetentionPolicy;
use keeplog_store::StoreError;
use tracing::{debug, error, info};

/// Summary of one pass over every job
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct SweepSummary {
    pub rotated: usize,
    pub skipped: usize,
    pub failed: usize,
}

/// Applies the configured policy to one job. Returns `false` when no policy
/// covers it.
///
/// The rotation itself blocks on deletions, so it runs on the blocking pool.
pub async fn rotate_job(config: &SweeperConfig, job_name: &str) -> Result<bool> {
    let job = config
        .store
        .jobs()
        .find_by_name(job_name)
        .ok_or_else(|| StoreError::JobNotFound(job_name.to_string()))?;

    let Some(retention) = config.config.policy_for(job_name).copied() else {
        debug!("No retention policy for {}", job_name);
        return Ok(false);
    };

    tokio::task::spawn_blocking(move || RetentionPolicy::new(retention).perform(&job)).await??;

    Ok(true)
}

pub async fn sweep_once(config: &SweeperConfig) -> SweepSummary {
    let mut summary = SweepSummary::default();

    for job in config.store.jobs().list() {
        match rotate_job(config, job.name()).await {
            Ok(true) => summary.rotated += 1,
            Ok(false) => summary.skipped += 1,
            Err(e) => {
                error!("Log rotation failed for {}: {}", job.name(), e);
                summary.failed += 1;
            }
        }
    }

    summary
}

/// Periodically rotates every job that has a policy.
pub async fn run_sweep_job(config: SweeperConfig) {
    info!("Starting log rotation sweep job");

    let mut interval = tokio::time::interval(config.config.sweep_interval());

    loop {
        interval.tick().await;

        info!("Running log rotation sweep");

        let summary = sweep_once(&config).await;
        info!(
            "Log rotation sweep finished: {} rotated, {} without policy, {} failed",
            summary.rotated, summary.skipped, summary.failed
        );
    }
}
