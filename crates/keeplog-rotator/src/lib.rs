mod error;
mod guard;
mod job;
mod keep;
mod policy;
#[cfg(test)]
mod testing;

pub use error::{Result, RotatorError};
pub use guard::{CleanupGuard, CleanupTicket};
pub use job::{Build, Job, JobId, TriggerCause};
pub use keeplog_config::RetentionConfig;
pub use policy::{RetentionPolicy, apply};
