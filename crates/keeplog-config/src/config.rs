use crate::RetentionConfig;
use crate::constants;
use serde::Deserialize;
use std::collections::HashMap;
use std::path::Path;
use std::time::Duration;

#[derive(Debug, Deserialize, Clone)]
pub struct KeeplogConfig {
    /// Policy for jobs without their own entry.
    #[serde(default)]
    pub default: Option<RetentionConfig>,

    /// Per-job policies keyed by job full name.
    #[serde(default)]
    pub jobs: HashMap<String, RetentionConfig>,

    #[serde(default = "default_sweep_interval")]
    pub sweep_interval_secs: u64,
}

fn default_sweep_interval() -> u64 {
    constants::DEFAULT_SWEEP_INTERVAL_SECS
}

impl Default for KeeplogConfig {
    fn default() -> Self {
        Self {
            default: None,
            jobs: HashMap::new(),
            sweep_interval_secs: default_sweep_interval(),
        }
    }
}

impl KeeplogConfig {
    pub fn policy_for(&self, job_name: &str) -> Option<&RetentionConfig> {
        self.jobs.get(job_name).or(self.default.as_ref())
    }

    pub fn sweep_interval(&self) -> Duration {
        Duration::from_secs(self.sweep_interval_secs).max(constants::MIN_SWEEP_INTERVAL)
    }
}

pub async fn parse_keeplog_toml(config_dir: &Path) -> std::io::Result<KeeplogConfig> {
    let config_path = config_dir.join(constants::CONFIG_FILE_NAME);

    if !config_path.exists() {
        tracing::debug!("No {:?} found, using defaults", config_path);
        return Ok(KeeplogConfig::default());
    }

    let content = tokio::fs::read_to_string(&config_path).await?;
    let config: KeeplogConfig = toml::from_str(&content)
        .map_err(|e| std::io::Error::new(std::io::ErrorKind::InvalidData, e))?;

    tracing::info!(
        "Loaded {} job retention polic(ies) from {:?}",
        config.jobs.len(),
        config_path
    );

    Ok(config)
}
