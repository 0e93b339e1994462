//! Named pass/fail threshold checks on computed metrics.
//!
//! The table is a fixed ordered list of declarative records evaluated by one
//! generic comparison, so thresholds stay data, not code. Default bounds
//! must not change: existing logs and reports were produced against them.

use serde::{Deserialize, Serialize};

use crate::metrics::{MetricKey, MetricRecord};

/// Direction of a threshold comparison.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Comparison {
    /// Value must be less than or equal to the bound.
    AtMost,
    /// Value must be greater than or equal to the bound.
    AtLeast,
}

/// One named threshold check.
#[derive(Debug, Clone, Copy)]
pub struct Guardrail {
    pub id: &'static str,
    pub name: &'static str,
    pub metric: MetricKey,
    pub comparison: Comparison,
    pub bound: f64,
}

impl Guardrail {
    /// Whether `value` satisfies this guardrail.
    pub fn check(&self, value: f64) -> bool {
        match self.comparison {
            Comparison::AtMost => value <= self.bound,
            Comparison::AtLeast => value >= self.bound,
        }
    }

    /// Whether `value` violates this guardrail (used for report annotations).
    pub fn violates(&self, value: f64) -> bool {
        !self.check(value)
    }
}

/// The fixed guardrail table, in evaluation and display order.
pub const GUARDRAILS: [Guardrail; 4] = [
    Guardrail {
        id: "short_sentences",
        name: "Short Sentences",
        metric: MetricKey::AvgSentenceLenWords,
        comparison: Comparison::AtMost,
        bound: 15.0,
    },
    Guardrail {
        id: "no_long_sentences",
        name: "No Long Sentences",
        metric: MetricKey::PctSentencesGt20,
        comparison: Comparison::AtMost,
        bound: 10.0,
    },
    Guardrail {
        id: "readable",
        name: "Readable (ARI)",
        metric: MetricKey::AriScore,
        comparison: Comparison::AtMost,
        bound: 8.0,
    },
    Guardrail {
        id: "preserves_meaning",
        name: "Preserves Meaning",
        metric: MetricKey::MeaningCosine,
        comparison: Comparison::AtLeast,
        bound: 0.70,
    },
];

/// Find the guardrail covering a given metric, if any.
pub fn for_metric(key: MetricKey) -> Option<&'static Guardrail> {
    GUARDRAILS.iter().find(|g| g.metric == key)
}

/// Outcome of evaluating the full guardrail table against one record.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GuardrailResult {
    pub passed: usize,
    pub total: usize,
    /// Display names of failed checks, in table order.
    pub failed: Vec<String>,
}

/// Evaluate every guardrail against a metric record.
///
/// A metric value that cannot be read (absent `meaning_cosine`) counts as a
/// failed check with an ` (error)` marker; evaluation continues with the
/// remaining checks.
pub fn evaluate(metrics: &MetricRecord) -> GuardrailResult {
    let mut passed = 0;
    let mut failed = Vec::new();

    for guardrail in &GUARDRAILS {
        match metrics.get(guardrail.metric) {
            Some(value) if guardrail.check(value) => passed += 1,
            Some(_) => failed.push(guardrail.name.to_string()),
            None => failed.push(format!("{} (error)", guardrail.name)),
        }
    }

    GuardrailResult {
        passed,
        total: GUARDRAILS.len(),
        failed,
    }
}
