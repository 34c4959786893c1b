//! Live reload for the sitekit development server.
//!
//! The watcher polls a ping endpoint that answers with an opaque content
//! token. The first token becomes the baseline; the first different token
//! stops polling, announces the reload, and reloads once after a grace delay.
//!
//! - `ReloadState` - Token comparison state machine (no I/O)
//! - `Probe` / `HttpProbe` - Ping endpoint client
//! - `PollHandle` - Recurring probe schedule, cancellable once
//! - `ReloadWatcher` - Async driver tying the pieces together

mod probe;
mod state;
mod watcher;

pub use probe::*;
pub use state::*;
pub use watcher::*;

pub use sitekit_core::{Notice, NoticeSink, ReloadConfig, ReloadTarget, WatchPhase};
