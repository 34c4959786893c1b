//! CLI command implementations.

pub mod build;
pub mod watch;

use clap::Args;

/// Arguments for the build command.
#[derive(Args)]
pub struct BuildArgs {
    /// Source directory (default: site.source from config).
    #[arg(short, long)]
    pub source: Option<String>,

    /// Output directory (default: site.output from config).
    #[arg(short, long)]
    pub output: Option<String>,

    /// Site title shown in the build report.
    #[arg(short, long)]
    pub title: Option<String>,
}

/// Arguments for the watch command.
#[derive(Args)]
pub struct WatchArgs {
    /// Development server URL (default: reload.url from config).
    #[arg(short, long)]
    pub url: Option<String>,

    /// Poll interval in milliseconds.
    #[arg(short, long)]
    pub interval: Option<u64>,

    /// Delay between detecting a change and reloading, in milliseconds.
    #[arg(short, long)]
    pub grace: Option<u64>,
}
