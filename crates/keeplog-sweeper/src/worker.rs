use crate::{SweeperConfig, rotate_job};
use keeplog_config::constants;
use tokio::sync::mpsc;
use tracing::{error, info};

/// Channel a host sends job names on once a build of that job has finished.
pub fn completion_channel() -> (mpsc::Sender<String>, mpsc::Receiver<String>) {
    mpsc::channel(constants::COMPLETION_CHANNEL_CAPACITY)
}

/// Rotates each job reported as having finished a build.
pub async fn run_completion_worker(mut completed_rx: mpsc::Receiver<String>, config: SweeperConfig) {
    info!("Starting build completion worker");

    while let Some(job_name) = completed_rx.recv().await {
        match rotate_job(&config, &job_name).await {
            Ok(true) => info!("Rotated builds of {}", job_name),
            Ok(false) => {}
            Err(e) => error!("Log rotation after build of {} failed: {}", job_name, e),
        }
    }

    info!("Build completion worker shutting down");
}
