//! Aggregate statistics over logged simplification runs.
//!
//! Reports are recomputed in full from the entry sequence on every request;
//! there is no incremental state to get out of sync with the log file.

use std::collections::BTreeMap;

use serde::Serialize;

use crate::entry::LogEntry;
use crate::metrics::{round_to, MetricKey};

/// Summed guardrail outcomes across a set of entries.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct GuardrailsSummary {
    pub total_passed: u64,
    pub total_checks: u64,
    /// `total_passed / total_checks * 100`, 0.0 when there are no checks.
    pub pass_rate: f64,
    /// Failed-check display name -> occurrence count.
    pub failure_counts: BTreeMap<String, u64>,
}

/// Aggregate view over a sequence of log entries. Derived and ephemeral.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AggregateReport {
    pub total_entries: usize,
    /// `avg_`-prefixed metric key -> mean over entries carrying that metric.
    pub avg_metrics: BTreeMap<String, f64>,
    /// `None` when there are no entries; serialized as an empty map.
    #[serde(serialize_with = "serialize_summary")]
    pub guardrails_summary: Option<GuardrailsSummary>,
}

fn serialize_summary<S>(
    summary: &Option<GuardrailsSummary>,
    serializer: S,
) -> Result<S::Ok, S::Error>
where
    S: serde::Serializer,
{
    match summary {
        Some(inner) => inner.serialize(serializer),
        None => BTreeMap::<String, u64>::new().serialize(serializer),
    }
}

/// Category to break entries down by.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BreakdownKey {
    Model,
    Language,
}

impl BreakdownKey {
    fn value<'a>(&self, entry: &'a LogEntry) -> &'a str {
        match self {
            BreakdownKey::Model => &entry.model,
            BreakdownKey::Language => &entry.language,
        }
    }
}

/// Aggregate shape for one breakdown group.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct GroupStats {
    pub count: usize,
    pub pass_rate: f64,
    pub avg_metrics: BTreeMap<String, f64>,
}

/// Fold a sequence of log entries into aggregate statistics.
///
/// Zero entries yield a well-defined empty report. Each metric is averaged
/// only over the entries where it is present, rounded to 2 decimals.
pub fn compute_aggregate_stats(entries: &[LogEntry]) -> AggregateReport {
    if entries.is_empty() {
        return AggregateReport {
            total_entries: 0,
            avg_metrics: BTreeMap::new(),
            guardrails_summary: None,
        };
    }

    let mut avg_metrics = BTreeMap::new();
    for key in MetricKey::ALL {
        let values: Vec<f64> = entries.iter().filter_map(|e| e.metrics.get(key)).collect();
        if !values.is_empty() {
            let mean = values.iter().sum::<f64>() / values.len() as f64;
            avg_metrics.insert(format!("avg_{}", key.as_str()), round_to(mean, 2));
        }
    }

    let total_passed: u64 = entries.iter().map(|e| e.guardrails_passed as u64).sum();
    let total_checks: u64 = entries.iter().map(|e| e.guardrails_total as u64).sum();

    let mut failure_counts: BTreeMap<String, u64> = BTreeMap::new();
    for entry in entries {
        for name in &entry.guardrails_failed {
            *failure_counts.entry(name.clone()).or_insert(0) += 1;
        }
    }

    let pass_rate = if total_checks > 0 {
        round_to(total_passed as f64 / total_checks as f64 * 100.0, 1)
    } else {
        0.0
    };

    AggregateReport {
        total_entries: entries.len(),
        avg_metrics,
        guardrails_summary: Some(GuardrailsSummary {
            total_passed,
            total_checks,
            pass_rate,
            failure_counts,
        }),
    }
}

/// Group entries by a category value and compute per-group statistics.
///
/// Entries with an empty category value fall under `"unknown"`.
pub fn compute_breakdown(entries: &[LogEntry], key: BreakdownKey) -> BTreeMap<String, GroupStats> {
    let mut groups: BTreeMap<String, Vec<&LogEntry>> = BTreeMap::new();
    for entry in entries {
        let value = key.value(entry);
        let label = if value.is_empty() { "unknown" } else { value };
        groups.entry(label.to_string()).or_default().push(entry);
    }

    groups
        .into_iter()
        .map(|(label, group)| {
            let owned: Vec<LogEntry> = group.into_iter().cloned().collect();
            let stats = compute_aggregate_stats(&owned);
            let pass_rate = stats
                .guardrails_summary
                .as_ref()
                .map(|s| s.pass_rate)
                .unwrap_or(0.0);
            (
                label,
                GroupStats {
                    count: owned.len(),
                    pass_rate,
                    avg_metrics: stats.avg_metrics,
                },
            )
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::entry::{build_log_entry, RunInfo};
    use chrono::{TimeZone, Utc};

    fn entry(model: &str, language: &str, output: &str) -> LogEntry {
        let run = RunInfo {
            model,
            template: "system_prompt_de.txt",
            language,
        };
        let ts = Utc.with_ymd_and_hms(2026, 8, 26, 12, 0, 0).unwrap();
        build_log_entry(ts, "Der komplizierte Ausgangstext.", output, &run, false)
    }

    #[test]
    fn test_zero_entries_returns_empty_report() {
        let report = compute_aggregate_stats(&[]);
        assert_eq!(report.total_entries, 0);
        assert!(report.avg_metrics.is_empty());
        assert!(report.guardrails_summary.is_none());

        let json = serde_json::to_value(&report).unwrap();
        assert_eq!(
            json,
            serde_json::json!({
                "total_entries": 0,
                "avg_metrics": {},
                "guardrails_summary": {}
            })
        );
    }

    #[test]
    fn test_identical_entries_average_to_their_value() {
        let one = entry("m1", "de", "Der Text ist kurz. Jeder kann ihn lesen.");
        let entries = vec![one.clone(), one.clone(), one.clone()];
        let report = compute_aggregate_stats(&entries);

        assert_eq!(report.total_entries, 3);
        assert_eq!(
            report.avg_metrics["avg_avg_sentence_len_words"],
            one.metrics.avg_sentence_len_words
        );
        assert_eq!(report.avg_metrics["avg_ari_score"], one.metrics.ari_score);

        let summary = report.guardrails_summary.unwrap();
        let own_rate = round_to(
            one.guardrails_passed as f64 / one.guardrails_total as f64 * 100.0,
            1,
        );
        assert_eq!(summary.pass_rate, own_rate);
    }

    #[test]
    fn test_failure_counts_accumulate() {
        // A long-sentence output fails at least the sentence-length checks.
        let long = format!("{}.", "word ".repeat(30).trim_end());
        let bad = entry("m1", "de", &long);
        assert!(!bad.guardrails_failed.is_empty());

        let report = compute_aggregate_stats(&[bad.clone(), bad.clone()]);
        let summary = report.guardrails_summary.unwrap();
        for name in &bad.guardrails_failed {
            assert_eq!(summary.failure_counts[name], 2);
        }
    }

    #[test]
    fn test_metric_averaging_skips_absent_values() {
        let mut with = entry("m1", "de", "Ein Satz hier.");
        with.metrics.meaning_cosine = Some(0.8);
        let mut without = entry("m1", "de", "Ein Satz hier.");
        without.metrics.meaning_cosine = None;

        let report = compute_aggregate_stats(&[with, without]);
        // Only one entry carries meaning_cosine, so the average is its value.
        assert_eq!(report.avg_metrics["avg_meaning_cosine"], 0.8);
    }

    #[test]
    fn test_breakdown_by_model() {
        let entries = vec![
            entry("model-a", "de", "Kurzer Satz."),
            entry("model-a", "de", "Noch ein Satz."),
            entry("model-b", "en", "Short sentence."),
        ];
        let breakdown = compute_breakdown(&entries, BreakdownKey::Model);
        assert_eq!(breakdown.len(), 2);
        assert_eq!(breakdown["model-a"].count, 2);
        assert_eq!(breakdown["model-b"].count, 1);
    }

    #[test]
    fn test_breakdown_by_language_labels_empty_as_unknown() {
        let mut nameless = entry("m1", "", "Ein Satz.");
        nameless.language = String::new();
        let breakdown = compute_breakdown(&[nameless], BreakdownKey::Language);
        assert_eq!(breakdown["unknown"].count, 1);
    }

    #[test]
    fn test_pass_rate_zero_when_no_checks() {
        let mut blank = entry("m1", "de", "Ein Satz.");
        blank.guardrails_passed = 0;
        blank.guardrails_total = 0;
        blank.guardrails_failed.clear();

        let report = compute_aggregate_stats(&[blank]);
        let summary = report.guardrails_summary.unwrap();
        assert_eq!(summary.total_checks, 0);
        assert_eq!(summary.pass_rate, 0.0);
    }
}
