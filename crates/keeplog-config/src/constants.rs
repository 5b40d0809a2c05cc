use std::time::Duration;

pub const CONFIG_FILE_NAME: &str = "keeplog.toml";

/// Sentinel used by form fields and legacy records for "no limit".
pub const UNLIMITED: i64 = -1;

pub const DEFAULT_SWEEP_INTERVAL_SECS: u64 = 3600;
pub const MIN_SWEEP_INTERVAL: Duration = Duration::from_secs(60);

pub const COMPLETION_CHANNEL_CAPACITY: usize = 1000;
