mod error;
mod sweep;
mod worker;

pub use error::{Result, SweeperError};
pub use sweep::{SweepSummary, rotate_job, run_sweep_job, sweep_once};
pub use worker::{completion_channel, run_completion_worker};

use keeplog_config::KeeplogConfig;
use keeplog_store::Store;
use std::sync::Arc;

#[derive(Clone)]
pub struct SweeperConfig {
    pub store: Arc<Store>,
    pub config: Arc<KeeplogConfig>,
}
