pub mod config;
pub mod constants;
mod limit;
pub mod retention;

pub use config::{KeeplogConfig, parse_keeplog_toml};
pub use limit::{as_sentinel, from_sentinel, parse_flag, parse_limit};
pub use retention::RetentionConfig;
