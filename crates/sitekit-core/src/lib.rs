//! Core abstractions for sitekit build instrumentation.
//!
//! This crate provides the fundamental types and traits:
//! - `TimingConfig` / `RestartPolicy` - Step timer behaviour
//! - `ReloadConfig` - Live-reload probe schedule
//! - `WatchPhase` / `Notice` - Reload watcher lifecycle
//! - `LogSink`, `NoticeSink`, `ReloadTarget` - External collaborators

mod config;
mod lifecycle;

pub use config::*;
pub use lifecycle::*;
