//! TF-IDF cosine similarity between a source text and its simplification.
//!
//! A small self-contained vectorizer fitted over exactly the two documents:
//! lowercased word tokens, smoothed idf `ln((1+n)/(1+df)) + 1`, and
//! L2-normalized vectors. The guardrail bound assumes exactly this
//! weighting, so the formula must not drift.

use std::collections::BTreeMap;

use crate::metrics::round_to;
use crate::text::words;

/// Compute the meaning-preservation cosine between `source` and `output`.
///
/// Returns 0.0 whenever the computation degrades (either document has no
/// tokens, or a vector norm is zero) -- never an error. Rounded to 3
/// decimal places.
pub fn meaning_cosine(source: &str, output: &str) -> f64 {
    let docs = [tokenize(source), tokenize(output)];
    if docs[0].is_empty() || docs[1].is_empty() {
        return 0.0;
    }

    // Document frequency over the joint two-document vocabulary.
    let mut df: BTreeMap<&str, usize> = BTreeMap::new();
    for doc in &docs {
        for term in doc.keys() {
            *df.entry(term).or_insert(0) += 1;
        }
    }

    let n_docs = docs.len() as f64;
    let vectors: Vec<Vec<f64>> = docs
        .iter()
        .map(|doc| {
            df.keys()
                .map(|term| {
                    let tf = doc.get(*term).copied().unwrap_or(0) as f64;
                    let idf = ((1.0 + n_docs) / (1.0 + df[*term] as f64)).ln() + 1.0;
                    tf * idf
                })
                .collect()
        })
        .collect();

    match cosine(&vectors[0], &vectors[1]) {
        Some(value) => round_to(value, 3),
        None => 0.0,
    }
}

/// Lowercased term-frequency map for one document.
fn tokenize(text: &str) -> BTreeMap<String, usize> {
    let mut counts = BTreeMap::new();
    for word in words(text) {
        *counts.entry(word.to_lowercase()).or_insert(0) += 1;
    }
    counts
}

/// Cosine of two equal-length vectors. `None` when either norm is zero.
fn cosine(a: &[f64], b: &[f64]) -> Option<f64> {
    let dot: f64 = a.iter().zip(b).map(|(x, y)| x * y).sum();
    let norm_a: f64 = a.iter().map(|x| x * x).sum::<f64>().sqrt();
    let norm_b: f64 = b.iter().map(|x| x * x).sum::<f64>().sqrt();

    if norm_a == 0.0 || norm_b == 0.0 {
        return None;
    }
    Some(dot / (norm_a * norm_b))
}
