//! Token comparison state machine.

use sitekit_core::WatchPhase;

use crate::probe::{ProbeResult, Token};

/// What a probe result did to the watcher state.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Transition {
    /// First successful probe; the token became the baseline.
    Baseline(Token),
    /// Token matches the baseline.
    Unchanged,
    /// Token differs from the baseline; the watcher is now in `Warning`.
    Changed { from: Token, to: Token },
    /// Probe failed; the offline overlay is shown.
    Offline,
    /// A result arrived after the change was already detected.
    Ignored,
}

/// Reload watcher state: phase, baseline token and offline overlay.
#[derive(Debug, Clone)]
pub struct ReloadState {
    phase: WatchPhase,
    baseline: Option<Token>,
    offline: bool,
}

impl Default for ReloadState {
    fn default() -> Self {
        Self::new()
    }
}

impl ReloadState {
    /// Start in `Watching` with no baseline.
    pub fn new() -> Self {
        Self {
            phase: WatchPhase::Watching,
            baseline: None,
            offline: false,
        }
    }

    pub fn phase(&self) -> WatchPhase {
        self.phase
    }

    pub fn baseline(&self) -> Option<&str> {
        self.baseline.as_deref()
    }

    /// Whether the last applied probe failed.
    pub fn is_offline(&self) -> bool {
        self.offline
    }

    /// Apply one probe result.
    ///
    /// Failures never touch the baseline or the phase. Once a change has been
    /// detected every further result is ignored, so `Changed` is returned at
    /// most once per state.
    pub fn apply(&mut self, result: &ProbeResult) -> Transition {
        if self.phase != WatchPhase::Watching {
            return Transition::Ignored;
        }

        let token = match result {
            Ok(token) => token,
            Err(_) => {
                self.offline = true;
                return Transition::Offline;
            }
        };
        self.offline = false;

        match &self.baseline {
            None => {
                self.baseline = Some(token.clone());
                Transition::Baseline(token.clone())
            }
            Some(baseline) if baseline == token => Transition::Unchanged,
            Some(baseline) => {
                let from = baseline.clone();
                self.phase = WatchPhase::Warning;
                Transition::Changed {
                    from,
                    to: token.clone(),
                }
            }
        }
    }

    /// Move from `Warning` to `Reloading`. Returns `false` from any other phase.
    pub fn begin_reload(&mut self) -> bool {
        if self.phase != WatchPhase::Warning {
            return false;
        }
        self.phase = WatchPhase::Reloading;
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::probe::ProbeError;
    use reqwest::StatusCode;

    fn ok(token: &str) -> ProbeResult {
        Ok(token.to_string())
    }

    fn failed() -> ProbeResult {
        Err(ProbeError::Status(StatusCode::SERVICE_UNAVAILABLE))
    }

    #[test]
    fn test_first_token_is_baseline() {
        let mut state = ReloadState::new();
        assert_eq!(state.apply(&ok("A")), Transition::Baseline("A".to_string()));
        assert_eq!(state.phase(), WatchPhase::Watching);
        assert_eq!(state.baseline(), Some("A"));
    }

    #[test]
    fn test_same_then_changed_token() {
        let mut state = ReloadState::new();
        state.apply(&ok("A"));

        assert_eq!(state.apply(&ok("A")), Transition::Unchanged);
        assert_eq!(state.phase(), WatchPhase::Watching);

        assert_eq!(
            state.apply(&ok("B")),
            Transition::Changed {
                from: "A".to_string(),
                to: "B".to_string()
            }
        );
        assert_eq!(state.phase(), WatchPhase::Warning);
        assert_eq!(state.baseline(), Some("A"));
    }

    #[test]
    fn test_failure_keeps_baseline() {
        let mut state = ReloadState::new();
        state.apply(&ok("A"));

        assert_eq!(state.apply(&failed()), Transition::Offline);
        assert!(state.is_offline());
        assert_eq!(state.baseline(), Some("A"));
        assert_eq!(state.phase(), WatchPhase::Watching);

        assert_eq!(state.apply(&ok("A")), Transition::Unchanged);
        assert!(!state.is_offline());
    }

    #[test]
    fn test_failure_before_baseline() {
        let mut state = ReloadState::new();
        assert_eq!(state.apply(&failed()), Transition::Offline);
        assert_eq!(state.baseline(), None);

        assert_eq!(state.apply(&ok("A")), Transition::Baseline("A".to_string()));
    }

    #[test]
    fn test_results_after_change_are_ignored() {
        let mut state = ReloadState::new();
        state.apply(&ok("A"));
        state.apply(&ok("B"));

        assert_eq!(state.apply(&ok("C")), Transition::Ignored);
        assert_eq!(state.apply(&failed()), Transition::Ignored);
        assert!(!state.is_offline());
        assert_eq!(state.phase(), WatchPhase::Warning);
    }

    #[test]
    fn test_begin_reload_only_from_warning() {
        let mut state = ReloadState::new();
        assert!(!state.begin_reload());

        state.apply(&ok("A"));
        state.apply(&ok("B"));
        assert!(state.begin_reload());
        assert_eq!(state.phase(), WatchPhase::Reloading);
        assert!(!state.begin_reload());
    }
}
