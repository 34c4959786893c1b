//! Reload watcher lifecycle and external collaborators.

use std::fmt;

/// Lifecycle phases of the reload watcher.
///
/// Being offline is not a phase: it is an overlay reported through
/// [`Notice::Offline`] while the watcher stays in its current phase.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WatchPhase {
    /// Polling the server and comparing tokens.
    Watching,
    /// A change was seen; polling stopped and a reload is pending.
    Warning,
    /// The reload has been performed.
    Reloading,
}

impl fmt::Display for WatchPhase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Watching => write!(f, "watching"),
            Self::Warning => write!(f, "warning"),
            Self::Reloading => write!(f, "reloading"),
        }
    }
}

/// Notification kinds emitted to the display layer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Notice {
    /// The last probe failed; the server looks unreachable.
    Offline,
    /// Content changed; the page reloads after the grace delay.
    ReloadImminent,
}

/// Sink for formatted log messages at informational severity.
pub trait LogSink: Send + Sync {
    /// Accept one (possibly multi-line) message.
    fn info(&self, message: &str);
}

/// Display layer for watcher notices.
///
/// Notices are additive: a later notice never retracts an earlier one.
pub trait NoticeSink: Send + Sync {
    fn notify(&self, notice: Notice);
}

/// Performs the full page reload once the grace delay has passed.
pub trait ReloadTarget: Send + Sync {
    fn reload(&self);
}
