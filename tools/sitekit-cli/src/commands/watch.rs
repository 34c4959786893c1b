//! Watch a development server and reload when its content changes.

use std::sync::Arc;
use std::time::Duration;

use anyhow::{Context as _, Result};
use sitekit_reload::{HttpProbe, Notice, NoticeSink, ReloadTarget, ReloadWatcher};

use super::WatchArgs;
use crate::context::Context;
use crate::output::{format_delay, Output};

/// Run the watch command.
pub async fn run(args: WatchArgs, ctx: &Context) -> Result<()> {
    let mut config = ctx.config.reload.clone();
    if let Some(url) = args.url {
        config.url = url;
    }
    if let Some(interval) = args.interval {
        config.poll_interval_ms = interval;
    }
    if let Some(grace) = args.grace {
        config.grace_delay_ms = grace;
    }

    let probe = HttpProbe::from_config(&config).context("Failed to create HTTP client")?;

    ctx.output.header("Live reload");
    ctx.output.kv("Ping", probe.url());
    ctx.output.kv("Interval", &format_delay(config.poll_interval()));

    let notices = Arc::new(TerminalNotices::new(ctx.output.clone(), config.grace_delay()));
    let target = Arc::new(TerminalReload {
        output: ctx.output.clone(),
    });

    let summary = ReloadWatcher::new(Arc::new(probe), notices, target)
        .with_config(&config)
        .run()
        .await;

    if ctx.output.is_json() {
        ctx.output.json(&serde_json::json!({
            "probes": summary.probes,
            "failures": summary.failures,
            "baseline": summary.baseline,
            "changed_to": summary.changed_to,
            "phase": summary.phase.to_string(),
        }));
    }

    Ok(())
}

/// Renders watcher notices in the terminal, one line per notice.
struct TerminalNotices {
    output: Output,
    grace: Duration,
}

impl TerminalNotices {
    fn new(output: Output, grace: Duration) -> Self {
        Self { output, grace }
    }

    fn message(&self, notice: Notice) -> String {
        match notice {
            Notice::Offline => "Server unreachable, still watching".to_string(),
            Notice::ReloadImminent => format!(
                "Content changed, reloading in {}",
                format_delay(self.grace)
            ),
        }
    }
}

impl NoticeSink for TerminalNotices {
    fn notify(&self, notice: Notice) {
        self.output.warn(&self.message(notice));
    }
}

/// Ends the watch session; the caller reloads its page.
struct TerminalReload {
    output: Output,
}

impl ReloadTarget for TerminalReload {
    fn reload(&self) {
        self.output.success("Reloading");
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn notices() -> TerminalNotices {
        TerminalNotices::new(Output::new(false, true), Duration::from_millis(3000))
    }

    #[test]
    fn test_second_outage_is_shown() {
        let notices = notices();
        let first = notices.message(Notice::Offline);
        // the server recovers between outages; recovery emits no notice
        let second = notices.message(Notice::Offline);

        assert_eq!(first, "Server unreachable, still watching");
        assert_eq!(second, first);
    }

    #[test]
    fn test_reload_notice_mentions_delay() {
        let notices = notices();
        assert_eq!(
            notices.message(Notice::ReloadImminent),
            "Content changed, reloading in 3s"
        );
    }
}
