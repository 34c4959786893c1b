//! Build instrumentation for sitekit.
//!
//! This crate provides:
//! - `StepTimer` - Registry of named build step measurements
//! - `BuildReport` - Human-readable summary of completed steps
//! - `StructuredLogger` / `TracingSink` - Sinks for the report

mod logging;
mod registry;
mod report;

pub use logging::*;
pub use registry::*;
pub use report::*;

// Re-export the sink trait and policy from sitekit-core for convenience
pub use sitekit_core::{LogSink, RestartPolicy, TimingConfig};
