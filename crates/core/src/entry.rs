//! The persisted log entry model.
//!
//! One entry per completed simplification, serialized as a single JSON line.
//! Raw text is only carried when the logger is explicitly configured with
//! `store_raw_text = true`; the privacy-preserving default persists length
//! metadata and computed metrics only.

use chrono::{DateTime, SecondsFormat, Utc};
use serde::{Deserialize, Serialize};

use crate::guardrails;
use crate::metrics::{self, MetricRecord};

/// Metadata describing one simplification run.
#[derive(Debug, Clone)]
pub struct RunInfo<'a> {
    pub model: &'a str,
    pub template: &'a str,
    pub language: &'a str,
}

/// A single logged simplification, append-only and never mutated.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LogEntry {
    /// ISO-8601 UTC, e.g. `2026-08-26T10:15:30.123456Z`.
    pub timestamp: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub source_text: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub output_text: Option<String>,
    pub source_text_len: usize,
    pub output_text_len: usize,
    pub model: String,
    pub template: String,
    pub language: String,
    pub metrics: MetricRecord,
    pub guardrails_passed: usize,
    pub guardrails_total: usize,
    pub guardrails_failed: Vec<String>,
}

/// Build a complete log entry from one simplification run.
///
/// The timestamp is passed in by the caller so this stays a pure function.
/// Lengths are character counts, not byte counts.
pub fn build_log_entry(
    timestamp: DateTime<Utc>,
    source_text: &str,
    output_text: &str,
    run: &RunInfo,
    store_raw_text: bool,
) -> LogEntry {
    let metrics = metrics::compute_metrics(source_text, output_text);
    let result = guardrails::evaluate(&metrics);

    LogEntry {
        timestamp: timestamp.to_rfc3339_opts(SecondsFormat::Micros, true),
        source_text: store_raw_text.then(|| source_text.to_string()),
        output_text: store_raw_text.then(|| output_text.to_string()),
        source_text_len: source_text.chars().count(),
        output_text_len: output_text.chars().count(),
        model: run.model.to_string(),
        template: run.template.to_string(),
        language: run.language.to_string(),
        metrics,
        guardrails_passed: result.passed,
        guardrails_total: result.total,
        guardrails_failed: result.failed,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn run_info() -> RunInfo<'static> {
        RunInfo {
            model: "llama-3.1-8b-instant",
            template: "system_prompt_de.txt",
            language: "de",
        }
    }

    fn timestamp() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2026, 8, 26, 10, 15, 30).unwrap()
    }

    #[test]
    fn test_privacy_mode_omits_raw_text() {
        let entry = build_log_entry(timestamp(), "Das Original.", "Der Text.", &run_info(), false);
        assert!(entry.source_text.is_none());
        assert!(entry.output_text.is_none());
        assert_eq!(entry.source_text_len, 13);
        assert_eq!(entry.output_text_len, 9);

        let json = serde_json::to_string(&entry).unwrap();
        assert!(!json.contains("source_text\""));
        assert!(!json.contains("Das Original."));
    }

    #[test]
    fn test_verbose_mode_keeps_raw_text() {
        let entry = build_log_entry(timestamp(), "Das Original.", "Der Text.", &run_info(), true);
        assert_eq!(entry.source_text.as_deref(), Some("Das Original."));
        assert_eq!(entry.output_text.as_deref(), Some("Der Text."));
    }

    #[test]
    fn test_lengths_count_characters_not_bytes() {
        let entry = build_log_entry(timestamp(), "Größe", "Maß", &run_info(), false);
        assert_eq!(entry.source_text_len, 5);
        assert_eq!(entry.output_text_len, 3);
    }

    #[test]
    fn test_timestamp_format() {
        let entry = build_log_entry(timestamp(), "a.", "b.", &run_info(), false);
        assert_eq!(entry.timestamp, "2026-08-26T10:15:30.000000Z");
    }

    #[test]
    fn test_guardrails_embedded() {
        let entry = build_log_entry(
            timestamp(),
            "Complex source text here.",
            "Short text. It is easy.",
            &run_info(),
            false,
        );
        assert_eq!(entry.guardrails_total, 4);
        assert_eq!(
            entry.guardrails_passed + entry.guardrails_failed.len(),
            entry.guardrails_total
        );
    }

    #[test]
    fn test_json_round_trip_preserves_all_fields() {
        let entry = build_log_entry(
            timestamp(),
            "Der komplizierte Ausgangstext über Versicherungen.",
            "Der Text ist jetzt einfach. Jeder kann ihn lesen.",
            &run_info(),
            false,
        );
        let line = serde_json::to_string(&entry).unwrap();
        let back: LogEntry = serde_json::from_str(&line).unwrap();
        assert_eq!(entry, back);
    }
}
