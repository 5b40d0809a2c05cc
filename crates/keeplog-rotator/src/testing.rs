//! Minimal in-memory job used by the unit tests of this crate.

use crate::{Build, Job, JobId, Result, RotatorError, TriggerCause};
use chrono::{DateTime, Duration, TimeZone, Utc};
use std::collections::BTreeMap;
use std::fmt;
use std::sync::{Arc, Mutex, Weak};

pub(crate) fn now() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2026, 3, 1, 12, 0, 0).unwrap()
}

#[derive(Debug, Clone, Copy)]
pub(crate) struct FakeCause(pub Option<bool>);

impl TriggerCause for FakeCause {
    fn upstream_alive(&self) -> Option<bool> {
        self.0
    }
}

#[derive(Debug, Clone, Default)]
pub(crate) struct Fixture {
    pub age_days: i64,
    pub keep_log: bool,
    pub building: bool,
    pub causes: Vec<FakeCause>,
    pub fail_delete: Option<FailWith>,
}

#[derive(Debug, Clone, Copy)]
pub(crate) enum FailWith {
    Io,
    Interrupt,
}

type DeleteHook = Arc<dyn Fn(&FakeJob) + Send + Sync>;

struct JobState {
    id: JobId,
    name: String,
    builds: Mutex<BTreeMap<u32, FakeBuild>>,
    last_successful: Mutex<Option<u32>>,
    last_stable: Mutex<Option<u32>>,
    actions: Mutex<Vec<String>>,
    on_delete: Mutex<Option<DeleteHook>>,
}

#[derive(Clone)]
pub(crate) struct FakeJob {
    state: Arc<JobState>,
}

impl FakeJob {
    pub fn new(name: &str) -> Self {
        Self {
            state: Arc::new(JobState {
                id: JobId::next(),
                name: name.to_string(),
                builds: Mutex::default(),
                last_successful: Mutex::default(),
                last_stable: Mutex::default(),
                actions: Mutex::default(),
                on_delete: Mutex::default(),
            }),
        }
    }

    /// Adds builds 1..=count, the oldest `count` days old.
    pub fn with_builds(name: &str, count: u32) -> Self {
        let job = Self::new(name);
        for number in 1..=count {
            job.add(
                number,
                Fixture {
                    age_days: i64::from(count - number + 1),
                    ..Default::default()
                },
            );
        }
        job
    }

    pub fn add(&self, number: u32, fixture: Fixture) -> FakeBuild {
        let build = FakeBuild(Arc::new(BuildState {
            number,
            timestamp: now() - Duration::days(fixture.age_days),
            fixture,
            job: Arc::downgrade(&self.state),
        }));
        self.state
            .builds
            .lock()
            .unwrap()
            .insert(number, build.clone());
        build
    }

    pub fn set_last_successful(&self, number: u32) {
        *self.state.last_successful.lock().unwrap() = Some(number);
    }

    pub fn set_last_stable(&self, number: u32) {
        *self.state.last_stable.lock().unwrap() = Some(number);
    }

    pub fn on_delete(&self, hook: impl Fn(&FakeJob) + Send + Sync + 'static) {
        *self.state.on_delete.lock().unwrap() = Some(Arc::new(hook));
    }

    pub fn remaining(&self) -> Vec<u32> {
        self.state.builds.lock().unwrap().keys().copied().collect()
    }

    pub fn actions(&self) -> Vec<String> {
        self.state.actions.lock().unwrap().clone()
    }

    fn by_number(&self, number: Option<u32>) -> Option<FakeBuild> {
        let builds = self.state.builds.lock().unwrap();
        number.and_then(|n| builds.get(&n).cloned())
    }
}

impl Job for FakeJob {
    type Build = FakeBuild;

    fn id(&self) -> JobId {
        self.state.id
    }

    fn full_name(&self) -> &str {
        &self.state.name
    }

    fn builds(&self) -> Vec<FakeBuild> {
        self.state
            .builds
            .lock()
            .unwrap()
            .values()
            .rev()
            .cloned()
            .collect()
    }

    fn first_build(&self) -> Option<FakeBuild> {
        self.state.builds.lock().unwrap().values().next().cloned()
    }

    fn last_successful_build(&self) -> Option<FakeBuild> {
        let number = *self.state.last_successful.lock().unwrap();
        self.by_number(number)
    }

    fn last_stable_build(&self) -> Option<FakeBuild> {
        let number = *self.state.last_stable.lock().unwrap();
        self.by_number(number)
    }
}

struct BuildState {
    number: u32,
    timestamp: DateTime<Utc>,
    fixture: Fixture,
    job: Weak<JobState>,
}

#[derive(Clone)]
pub(crate) struct FakeBuild(Arc<BuildState>);

impl FakeBuild {
    fn job(&self) -> FakeJob {
        FakeJob {
            state: self.0.job.upgrade().expect("job dropped during test"),
        }
    }

    fn record(&self, action: &str) {
        self.job()
            .state
            .actions
            .lock()
            .unwrap()
            .push(format!("{action} #{}", self.0.number));
    }

    fn fail(&self) -> Result<()> {
        match self.0.fixture.fail_delete {
            Some(FailWith::Io) => Err(std::io::Error::other("disk full").into()),
            Some(FailWith::Interrupt) => Err(RotatorError::Interrupted(self.to_string())),
            None => Ok(()),
        }
    }
}

impl PartialEq for FakeBuild {
    fn eq(&self, other: &Self) -> bool {
        Arc::ptr_eq(&self.0, &other.0)
    }
}

impl fmt::Display for FakeBuild {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "fake #{}", self.0.number)
    }
}

impl Build for FakeBuild {
    type Cause = FakeCause;

    fn timestamp(&self) -> DateTime<Utc> {
        self.0.timestamp
    }

    fn is_keep_log(&self) -> bool {
        self.0.fixture.keep_log
    }

    fn is_building(&self) -> bool {
        self.0.fixture.building
    }

    fn causes(&self) -> Vec<FakeCause> {
        self.0.fixture.causes.clone()
    }

    fn next_build(&self) -> Option<FakeBuild> {
        let job = self.job();
        let builds = job.state.builds.lock().unwrap();
        builds.range(self.0.number + 1..).next().map(|(_, b)| b.clone())
    }

    fn delete(&self) -> Result<()> {
        self.fail()?;
        let job = self.job();
        job.state.builds.lock().unwrap().remove(&self.0.number);
        self.record("delete");
        let hook = job.state.on_delete.lock().unwrap().clone();
        if let Some(hook) = hook {
            hook(&job);
        }
        Ok(())
    }

    fn delete_artifacts(&self) -> Result<()> {
        self.fail()?;
        self.record("artifacts");
        Ok(())
    }
}
