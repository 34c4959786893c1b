//! Async reload watcher.

use std::sync::Arc;
use std::time::Duration;

use sitekit_core::{Notice, NoticeSink, ReloadConfig, ReloadTarget, WatchPhase};
use tokio::task::JoinHandle;
use tokio::time::{Instant, Interval, MissedTickBehavior};

use crate::probe::{Probe, Token};
use crate::state::{ReloadState, Transition};

const MIN_PERIOD: Duration = Duration::from_millis(1);

/// Recurring probe schedule.
///
/// Ticks are delayed rather than bunched when a probe overruns the period,
/// so at most one probe is ever in flight.
#[derive(Debug)]
pub struct PollHandle {
    interval: Option<Interval>,
}

impl PollHandle {
    /// Start a schedule whose first tick fires immediately.
    ///
    /// A zero period is raised to 1ms. Must be called from within a tokio
    /// runtime.
    pub fn start(period: Duration) -> Self {
        let mut interval = tokio::time::interval(period.max(MIN_PERIOD));
        interval.set_missed_tick_behavior(MissedTickBehavior::Delay);
        Self {
            interval: Some(interval),
        }
    }

    /// Wait for the next tick, or `None` once cancelled.
    pub async fn tick(&mut self) -> Option<Instant> {
        match self.interval.as_mut() {
            Some(interval) => Some(interval.tick().await),
            None => None,
        }
    }

    /// Stop the schedule. Returns `true` only for the call that cancelled it.
    pub fn cancel(&mut self) -> bool {
        self.interval.take().is_some()
    }

    pub fn is_cancelled(&self) -> bool {
        self.interval.is_none()
    }
}

/// What happened during a watcher's lifetime.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WatchSummary {
    /// Probes issued.
    pub probes: u64,
    /// Probes that failed.
    pub failures: u64,
    /// Token observed by the first successful probe.
    pub baseline: Option<Token>,
    /// Token that triggered the reload.
    pub changed_to: Option<Token>,
    /// Final phase.
    pub phase: WatchPhase,
}

/// Polls the ping endpoint and reloads once the content token changes.
pub struct ReloadWatcher {
    probe: Arc<dyn Probe>,
    notices: Arc<dyn NoticeSink>,
    target: Arc<dyn ReloadTarget>,
    poll_interval: Duration,
    grace_delay: Duration,
}

impl ReloadWatcher {
    /// Create a watcher with the default 1s poll interval and 3s grace delay.
    pub fn new(
        probe: Arc<dyn Probe>,
        notices: Arc<dyn NoticeSink>,
        target: Arc<dyn ReloadTarget>,
    ) -> Self {
        let defaults = ReloadConfig::default();
        Self {
            probe,
            notices,
            target,
            poll_interval: defaults.poll_interval(),
            grace_delay: defaults.grace_delay(),
        }
    }

    /// Take the poll interval and grace delay from configuration.
    pub fn with_config(mut self, config: &ReloadConfig) -> Self {
        self.poll_interval = config.poll_interval();
        self.grace_delay = config.grace_delay();
        self
    }

    pub fn with_poll_interval(mut self, interval: Duration) -> Self {
        self.poll_interval = interval;
        self
    }

    pub fn with_grace_delay(mut self, delay: Duration) -> Self {
        self.grace_delay = delay;
        self
    }

    /// Run the watcher on a new task.
    pub fn spawn(self) -> JoinHandle<WatchSummary> {
        tokio::spawn(self.run())
    }

    /// Poll until the content changes, then reload once and return.
    ///
    /// Probe failures are absorbed here: they only produce
    /// [`Notice::Offline`] and polling carries on.
    pub async fn run(self) -> WatchSummary {
        let mut state = ReloadState::new();
        let mut poll = PollHandle::start(self.poll_interval);
        let mut probes = 0;
        let mut failures = 0;
        let mut changed_to = None;

        tracing::info!(
            interval_ms = self.poll_interval.as_millis() as u64,
            "watching for content changes"
        );

        while poll.tick().await.is_some() {
            let result = self.probe.ping().await;
            probes += 1;

            let was_offline = state.is_offline();
            match state.apply(&result) {
                Transition::Baseline(token) => {
                    tracing::debug!(%token, "baseline token recorded");
                }
                Transition::Unchanged => {
                    if was_offline {
                        tracing::info!("server reachable again");
                    }
                }
                Transition::Offline => {
                    failures += 1;
                    if let Err(err) = &result {
                        tracing::debug!(error = %err, "probe failed");
                    }
                    self.notices.notify(Notice::Offline);
                }
                Transition::Changed { from, to } => {
                    tracing::info!(%from, %to, "content changed");
                    poll.cancel();
                    changed_to = Some(to);
                    self.notices.notify(Notice::ReloadImminent);
                }
                Transition::Ignored => {}
            }
        }

        tokio::time::sleep(self.grace_delay).await;
        if state.begin_reload() {
            tracing::info!("reloading");
            self.target.reload();
        }

        WatchSummary {
            probes,
            failures,
            baseline: state.baseline().map(str::to_string),
            changed_to,
            phase: state.phase(),
        }
    }
}
