//! Report rendering over aggregate statistics.
//!
//! Both output formats derive from the same [`AggregateReport`]: a fixed
//! section-order text report for humans and overview files, and a
//! serializable [`JsonReport`] for machine consumers. Rendering is pure;
//! the shell decides where the result goes and whether to colorize it.

use std::collections::BTreeMap;

use chrono::{DateTime, SecondsFormat, Utc};
use serde::Serialize;

use crate::entry::LogEntry;
use crate::guardrails;
use crate::metrics::MetricKey;
use crate::stats::{compute_breakdown, AggregateReport, BreakdownKey, GroupStats};

/// Default title for the text report header.
pub const DEFAULT_TITLE: &str = "METRICS OVERVIEW";

/// Machine-readable report, serialized as-is by the shell.
#[derive(Debug, Clone, Serialize)]
pub struct JsonReport {
    pub report_timestamp: String,
    #[serde(flatten)]
    pub stats: AggregateReport,
    pub breakdown: BreakdownSection,
}

#[derive(Debug, Clone, Serialize)]
pub struct BreakdownSection {
    pub by_model: BTreeMap<String, GroupStats>,
    pub by_language: BTreeMap<String, GroupStats>,
}

/// Render the fixed-order text report.
///
/// Sections: header, averages with pass/fail annotations, guardrail
/// pass-rate summary with a failure breakdown, and (optionally) per-model
/// and per-language breakdowns.
pub fn generate_text_report(
    stats: &AggregateReport,
    entries: &[LogEntry],
    include_breakdown: bool,
    title: &str,
    generated_at: DateTime<Utc>,
) -> String {
    let separator = "=".repeat(60);
    let rule = "-".repeat(40);
    let mut lines = Vec::new();

    lines.push(separator.clone());
    lines.push(title.to_string());
    lines.push(separator.clone());

    if stats.total_entries == 0 {
        lines.push("No log entries found.".to_string());
        lines.push(separator);
        return lines.join("\n");
    }

    lines.push(format!(
        "Generated: {}",
        generated_at.format("%Y-%m-%d %H:%M:%S UTC")
    ));
    lines.push(format!("Total entries: {}", stats.total_entries));
    lines.push(String::new());

    lines.push("AVERAGES".to_string());
    lines.push(rule.clone());
    for key in MetricKey::ALL {
        let avg_key = format!("avg_{}", key.as_str());
        if let Some(&value) = stats.avg_metrics.get(&avg_key) {
            let marker = match guardrails::for_metric(key) {
                Some(g) if g.violates(value) => "!",
                Some(_) => "ok",
                None => "",
            };
            lines.push(format!("   {}: {:.2} {}", key.as_str(), value, marker));
        }
    }
    lines.push(String::new());

    if let Some(summary) = &stats.guardrails_summary {
        lines.push(format!("Guardrails pass rate: {:.1}%", summary.pass_rate));
        lines.push(format!(
            "   ({}/{} checks passed)",
            summary.total_passed, summary.total_checks
        ));

        if !summary.failure_counts.is_empty() {
            lines.push(String::new());
            lines.push("   Failed guardrails breakdown:".to_string());
            let mut counts: Vec<(&String, &u64)> = summary.failure_counts.iter().collect();
            counts.sort_by(|a, b| b.1.cmp(a.1).then_with(|| a.0.cmp(b.0)));
            for (name, count) in counts {
                lines.push(format!("     - {name}: {count} failures"));
            }
        }
    }

    if include_breakdown && !entries.is_empty() {
        lines.push(String::new());
        lines.push(rule);

        lines.push("BREAKDOWN BY MODEL".to_string());
        for (model, group) in compute_breakdown(entries, BreakdownKey::Model) {
            lines.push(format!(
                "   {}: {} entries, {:.1}% pass rate",
                model, group.count, group.pass_rate
            ));
        }

        lines.push(String::new());
        lines.push("BREAKDOWN BY LANGUAGE".to_string());
        for (language, group) in compute_breakdown(entries, BreakdownKey::Language) {
            lines.push(format!(
                "   {}: {} entries, {:.1}% pass rate",
                language, group.count, group.pass_rate
            ));
        }
    }

    lines.push(separator);
    lines.join("\n")
}

/// Build the machine-readable report.
pub fn generate_json_report(
    stats: &AggregateReport,
    entries: &[LogEntry],
    generated_at: DateTime<Utc>,
) -> JsonReport {
    JsonReport {
        report_timestamp: generated_at.to_rfc3339_opts(SecondsFormat::Micros, true),
        stats: stats.clone(),
        breakdown: BreakdownSection {
            by_model: compute_breakdown(entries, BreakdownKey::Model),
            by_language: compute_breakdown(entries, BreakdownKey::Language),
        },
    }
}
