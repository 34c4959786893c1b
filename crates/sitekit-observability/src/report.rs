//! Build report formatting.

use std::fmt;
use std::time::Duration;

use serde::Serialize;

use crate::registry::CompletedStep;

/// Summary of completed build steps for one site.
///
/// Built fresh from the registry each time; never persisted.
#[derive(Debug, Clone, Serialize)]
pub struct BuildReport {
    /// Title of the generated site.
    pub site_title: String,
    /// Completed steps in completion order.
    pub steps: Vec<CompletedStep>,
}

impl BuildReport {
    /// Create a report from completed steps.
    pub fn new(site_title: impl Into<String>, steps: Vec<CompletedStep>) -> Self {
        Self {
            site_title: site_title.into(),
            steps,
        }
    }

    /// Sum of all step durations.
    pub fn total(&self) -> Duration {
        self.steps.iter().map(|step| step.elapsed).sum()
    }

    /// Format as JSON.
    pub fn to_json(&self) -> String {
        serde_json::to_string(self).unwrap_or_default()
    }

    /// Format as human-readable summary.
    pub fn to_summary(&self) -> String {
        let mut lines = Vec::with_capacity(self.steps.len() + 1);

        lines.push(format!("Site '{}' created!", self.site_title));
        for step in &self.steps {
            lines.push(format_step_line(step));
        }

        lines.join("\n")
    }
}

impl fmt::Display for BuildReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_summary())
    }
}

/// Format one report line.
///
/// This is the only place that interprets `units` as a divisor.
pub fn format_step_line(step: &CompletedStep) -> String {
    match per_item(step) {
        Some(avg) => format!(
            "  {}: {} ({} items, {}/item)",
            step.name,
            format_duration(step.elapsed),
            step.units,
            format_duration(avg)
        ),
        None => format!("  {}: {}", step.name, format_duration(step.elapsed)),
    }
}

/// Average duration per item, when the step covers more than one.
pub fn per_item(step: &CompletedStep) -> Option<Duration> {
    if step.units <= 1 {
        return None;
    }
    let units = u32::try_from(step.units).unwrap_or(u32::MAX);
    Some(step.elapsed / units)
}

/// Format a duration as a short human-readable string.
pub fn format_duration(duration: Duration) -> String {
    let micros = duration.as_micros();
    let secs = duration.as_secs_f64();

    if micros < 1_000 {
        format!("{}us", micros)
    } else if secs < 1.0 {
        format!("{:.2}ms", micros as f64 / 1000.0)
    } else if secs < 60.0 {
        format!("{:.2}s", secs)
    } else {
        format!("{}m {:.1}s", duration.as_secs() / 60, secs % 60.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn step(name: &str, millis: u64, units: u64) -> CompletedStep {
        CompletedStep {
            name: name.to_string(),
            elapsed: Duration::from_millis(millis),
            units,
        }
    }

    #[test]
    fn test_summary_header_and_order() {
        let report = BuildReport::new("My Blog", vec![step("parse", 12, 1), step("render", 40, 1)]);
        let summary = report.to_summary();
        let lines: Vec<_> = summary.lines().collect();

        assert_eq!(lines[0], "Site 'My Blog' created!");
        assert_eq!(lines[1], "  parse: 12.00ms");
        assert_eq!(lines[2], "  render: 40.00ms");
    }

    #[test]
    fn test_empty_report_has_header_only() {
        let report = BuildReport::new("Empty", Vec::new());
        assert_eq!(report.to_summary(), "Site 'Empty' created!");
        assert_eq!(report.total(), Duration::ZERO);
    }

    #[test]
    fn test_per_item_average() {
        let line = format_step_line(&step("copy", 100, 4));
        assert_eq!(line, "  copy: 100.00ms (4 items, 25.00ms/item)");
    }

    #[test]
    fn test_single_unit_has_no_average() {
        assert_eq!(per_item(&step("stamp", 5, 1)), None);
        assert!(!format_step_line(&step("stamp", 5, 1)).contains("/item"));
    }

    #[test]
    fn test_format_duration_ranges() {
        assert_eq!(format_duration(Duration::from_micros(250)), "250us");
        assert_eq!(format_duration(Duration::from_micros(1_500)), "1.50ms");
        assert_eq!(format_duration(Duration::from_millis(2_340)), "2.34s");
        assert_eq!(format_duration(Duration::from_secs(95)), "1m 35.0s");
    }

    #[test]
    fn test_total_and_json() {
        let report = BuildReport::new("Docs", vec![step("a", 10, 1), step("b", 5, 2)]);
        assert_eq!(report.total(), Duration::from_millis(15));

        let json: serde_json::Value = serde_json::from_str(&report.to_json()).unwrap();
        assert_eq!(json["site_title"], "Docs");
        assert_eq!(json["steps"][0]["name"], "a");
        assert_eq!(json["steps"][0]["elapsed_us"], 10_000);
        assert_eq!(json["steps"][1]["units"], 2);
    }
}
