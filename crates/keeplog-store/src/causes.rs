use crate::builds::{BuildHandle, BuildInner};
use keeplog_rotator::TriggerCause;
use std::fmt;
use std::sync::{Arc, Weak};

#[derive(Debug, Clone)]
pub enum Cause {
    User(String),
    Timer,
    Upstream(UpstreamCause),
}

impl Cause {
    pub fn upstream(build: &BuildHandle) -> Self {
        Cause::Upstream(UpstreamCause::new(build))
    }
}

impl TriggerCause for Cause {
    fn upstream_alive(&self) -> Option<bool> {
        match self {
            Cause::Upstream(cause) => Some(cause.upstream_run().is_some()),
            Cause::User(_) | Cause::Timer => None,
        }
    }
}

impl fmt::Display for Cause {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Cause::User(user) => write!(f, "Started by user {}", user),
            Cause::Timer => write!(f, "Started by timer"),
            Cause::Upstream(cause) => write!(
                f,
                "Started by upstream project {} build number {}",
                cause.upstream_project, cause.upstream_build
            ),
        }
    }
}

/// Points back at the build that triggered this one. The reference does not
/// keep the upstream build alive.
#[derive(Debug, Clone)]
pub struct UpstreamCause {
    upstream_project: String,
    upstream_build: u32,
    run: Weak<BuildInner>,
}

impl UpstreamCause {
    pub fn new(upstream: &BuildHandle) -> Self {
        Self {
            upstream_project: upstream.job_name().to_string(),
            upstream_build: upstream.number(),
            run: Arc::downgrade(&upstream.0),
        }
    }

    pub fn upstream_project(&self) -> &str {
        &self.upstream_project
    }

    pub fn upstream_build(&self) -> u32 {
        self.upstream_build
    }

    /// The upstream build, unless it has since been deleted.
    pub fn upstream_run(&self) -> Option<BuildHandle> {
        self.run
            .upgrade()
            .map(BuildHandle)
            .filter(|b| !b.is_deleted())
    }
}
