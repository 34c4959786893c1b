//! Named build step timers.

use std::collections::HashMap;
use std::sync::{Mutex, MutexGuard, PoisonError};
use std::time::{Duration, Instant};

use serde::{Serialize, Serializer};
use sitekit_core::{LogSink, RestartPolicy, TimingConfig};

use crate::report::BuildReport;

/// Error type for step timer operations.
///
/// Both variants are caller sequencing defects and are never retried.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum TimingError {
    #[error("step `{step}` has not been started")]
    NotStarted { step: String },

    #[error("step `{step}` is already running")]
    AlreadyStarted { step: String },
}

impl TimingError {
    /// Name of the offending step.
    pub fn step(&self) -> &str {
        match self {
            Self::NotStarted { step } | Self::AlreadyStarted { step } => step,
        }
    }
}

/// A finished measurement.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CompletedStep {
    /// Step name.
    pub name: String,
    /// Time between `start` and `stop`.
    #[serde(rename = "elapsed_us", serialize_with = "serialize_micros")]
    pub elapsed: Duration,
    /// Number of items the measurement covers (at least 1).
    pub units: u64,
}

fn serialize_micros<S: Serializer>(duration: &Duration, serializer: S) -> Result<S::Ok, S::Error> {
    serializer.serialize_u64(duration.as_micros() as u64)
}

#[derive(Debug, Default)]
struct TimerState {
    active: HashMap<String, Instant>,
    completed: Vec<CompletedStep>,
}

/// Registry of named build step timers.
///
/// Owned by the caller and shared with pipeline workers (usually behind an
/// `Arc`). Workers may start and stop distinct steps concurrently; racing
/// `start`/`start` or `stop`/`stop` on the same name has no defined outcome.
#[derive(Debug, Default)]
pub struct StepTimer {
    policy: RestartPolicy,
    state: Mutex<TimerState>,
}

impl StepTimer {
    /// Create a registry that restarts steps started twice.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a registry with an explicit restart policy.
    pub fn with_policy(policy: RestartPolicy) -> Self {
        Self {
            policy,
            state: Mutex::default(),
        }
    }

    /// Create a registry from configuration.
    pub fn from_config(config: &TimingConfig) -> Self {
        Self::with_policy(config.restart_policy)
    }

    /// The restart policy in effect.
    pub fn policy(&self) -> RestartPolicy {
        self.policy
    }

    // A worker that panicked mid-operation cannot leave the maps half-written,
    // so the data behind a poisoned lock is still consistent.
    fn lock(&self) -> MutexGuard<'_, TimerState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Start timing a step.
    ///
    /// Only fails under [`RestartPolicy::Reject`] when the step is already
    /// running; the original start instant is kept in that case.
    pub fn start(&self, name: impl Into<String>) -> Result<(), TimingError> {
        let name = name.into();
        let mut state = self.lock();

        if state.active.contains_key(&name) {
            match self.policy {
                RestartPolicy::Restart => {
                    tracing::debug!(step = %name, "restarting step");
                }
                RestartPolicy::Reject => {
                    return Err(TimingError::AlreadyStarted { step: name });
                }
            }
        } else {
            tracing::debug!(step = %name, "step started");
        }

        state.active.insert(name, Instant::now());
        Ok(())
    }

    /// Stop timing a step and record it as completed.
    ///
    /// `units` is how many items the step processed; zero counts as one.
    pub fn stop(&self, name: &str, units: u64) -> Result<Duration, TimingError> {
        let mut state = self.lock();

        let started = state
            .active
            .remove(name)
            .ok_or_else(|| TimingError::NotStarted {
                step: name.to_string(),
            })?;
        let elapsed = started.elapsed();

        state.completed.push(CompletedStep {
            name: name.to_string(),
            elapsed,
            units: units.max(1),
        });
        drop(state);

        tracing::debug!(step = name, elapsed_us = elapsed.as_micros() as u64, units, "step stopped");
        Ok(elapsed)
    }

    /// Time a closure as one step.
    pub fn time<T>(&self, name: &str, units: u64, f: impl FnOnce() -> T) -> Result<T, TimingError> {
        self.start(name)?;
        let value = f();
        self.stop(name, units)?;
        Ok(value)
    }

    /// Whether the step is currently running.
    pub fn is_active(&self, name: &str) -> bool {
        self.lock().active.contains_key(name)
    }

    /// Names of running steps, sorted.
    pub fn active_steps(&self) -> Vec<String> {
        let mut names: Vec<String> = self.lock().active.keys().cloned().collect();
        names.sort();
        names
    }

    /// Snapshot of completed steps in completion order.
    pub fn completed(&self) -> Vec<CompletedStep> {
        self.lock().completed.clone()
    }

    /// Build a report of the completed steps.
    pub fn report(&self, site_title: impl Into<String>) -> BuildReport {
        BuildReport::new(site_title, self.completed())
    }

    /// Format the report and hand it to the sink as one message.
    ///
    /// The registry lock is released before the sink is called.
    pub fn log_report(&self, site_title: impl Into<String>, sink: &dyn LogSink) {
        let report = self.report(site_title);
        sink.info(&report.to_summary());
    }
}
