//! Readability metrics for simplified text.
//!
//! [`compute_metrics`] is the single entry point used by the logging and
//! reporting paths; both must see identical rounding so that values survive
//! a JSONL round trip bit-for-bit.

use serde::{Deserialize, Serialize};

use crate::similarity;
use crate::text::{split_sentences, words};

/// Word count above which a sentence counts as "long".
pub const LONG_SENTENCE_WORDS: usize = 20;

/// Character count above which a word counts as "long" for LIX.
pub const LONG_WORD_CHARS: usize = 6;

/// Identifies one numeric field of a [`MetricRecord`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MetricKey {
    AvgSentenceLenWords,
    PctSentencesGt20,
    AriScore,
    MeaningCosine,
}

impl MetricKey {
    /// All keys, in the order they appear in reports.
    pub const ALL: [MetricKey; 4] = [
        MetricKey::AvgSentenceLenWords,
        MetricKey::PctSentencesGt20,
        MetricKey::AriScore,
        MetricKey::MeaningCosine,
    ];

    /// The JSON field name of this metric.
    pub fn as_str(&self) -> &'static str {
        match self {
            MetricKey::AvgSentenceLenWords => "avg_sentence_len_words",
            MetricKey::PctSentencesGt20 => "pct_sentences_gt20",
            MetricKey::AriScore => "ari_score",
            MetricKey::MeaningCosine => "meaning_cosine",
        }
    }
}

/// Scores computed for a single simplification output.
///
/// Immutable once computed. `meaning_cosine` is optional because entries
/// logged before similarity scoring existed carry no value for it; newly
/// computed records always populate it (0.0 when the computation degrades).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MetricRecord {
    pub avg_sentence_len_words: f64,
    pub pct_sentences_gt20: f64,
    pub ari_score: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub meaning_cosine: Option<f64>,
}

impl MetricRecord {
    /// The all-zero record returned for empty or unsplittable input.
    pub fn zero() -> Self {
        MetricRecord {
            avg_sentence_len_words: 0.0,
            pct_sentences_gt20: 0.0,
            ari_score: 0.0,
            meaning_cosine: Some(0.0),
        }
    }

    /// Look up a metric value by key. `None` when the field is absent.
    pub fn get(&self, key: MetricKey) -> Option<f64> {
        match key {
            MetricKey::AvgSentenceLenWords => Some(self.avg_sentence_len_words),
            MetricKey::PctSentencesGt20 => Some(self.pct_sentences_gt20),
            MetricKey::AriScore => Some(self.ari_score),
            MetricKey::MeaningCosine => self.meaning_cosine,
        }
    }
}

/// Round to `dp` decimal places.
pub(crate) fn round_to(value: f64, dp: u32) -> f64 {
    let factor = 10f64.powi(dp as i32);
    (value * factor).round() / factor
}

/// Compute the Automated Readability Index, clamped to a minimum of 0.
///
/// `ARI = 4.71 * (chars / words) + 0.5 * (words / sentences) - 21.43`
/// where `chars` is the total character count of extracted words.
pub fn compute_ari_score(text: &str) -> f64 {
    let sentences = split_sentences(text);
    let word_list = words(text);

    if sentences.is_empty() || word_list.is_empty() {
        return 0.0;
    }

    let char_count: usize = word_list.iter().map(|w| w.chars().count()).sum();
    let word_count = word_list.len() as f64;
    let sentence_count = sentences.len() as f64;

    let ari = 4.71 * (char_count as f64 / word_count) + 0.5 * (word_count / sentence_count) - 21.43;
    round_to(ari.max(0.0), 2)
}

/// Compute the LIX readability index.
///
/// `LIX = words / sentences + long_words * 100 / words` where a long word
/// has more than [`LONG_WORD_CHARS`] characters. Kept alongside ARI because
/// the model-comparison tooling historically scored with LIX; the logged
/// [`MetricRecord`] uses ARI.
pub fn compute_lix_score(text: &str) -> f64 {
    let sentences = split_sentences(text);
    let word_list = words(text);

    if sentences.is_empty() || word_list.is_empty() {
        return 0.0;
    }

    let word_count = word_list.len() as f64;
    let long_words = word_list
        .iter()
        .filter(|w| w.chars().count() > LONG_WORD_CHARS)
        .count() as f64;

    round_to(word_count / sentences.len() as f64 + long_words * 100.0 / word_count, 2)
}

/// Compute all metrics for a simplification output.
///
/// `source` is only used for the meaning-preservation cosine; every other
/// metric is a function of `output` alone. Empty or unsplittable output
/// yields [`MetricRecord::zero`], never an error.
pub fn compute_metrics(source: &str, output: &str) -> MetricRecord {
    let sentences = split_sentences(output);
    let word_list = words(output);

    if sentences.is_empty() || word_list.is_empty() {
        return MetricRecord::zero();
    }

    let sent_lengths: Vec<usize> = sentences.iter().map(|s| words(s).len()).collect();
    let avg_sent_len = sent_lengths.iter().sum::<usize>() as f64 / sentences.len() as f64;
    let long_sents = sent_lengths
        .iter()
        .filter(|&&len| len > LONG_SENTENCE_WORDS)
        .count();
    let pct_long = long_sents as f64 / sentences.len() as f64 * 100.0;

    MetricRecord {
        avg_sentence_len_words: round_to(avg_sent_len, 1),
        pct_sentences_gt20: round_to(pct_long, 1),
        ari_score: compute_ari_score(output),
        meaning_cosine: Some(similarity::meaning_cosine(source, output)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_output_yields_zero_record() {
        assert_eq!(compute_metrics("", ""), MetricRecord::zero());
        assert_eq!(compute_metrics("source", ""), MetricRecord::zero());
        assert_eq!(compute_metrics("source", "   \n  "), MetricRecord::zero());
    }

    #[test]
    fn test_punctuation_only_output_yields_zero_record() {
        assert_eq!(compute_metrics("source", "123 ... 456"), MetricRecord::zero());
    }

    #[test]
    fn test_avg_sentence_length() {
        // Two sentences of 3 and 5 words.
        let record = compute_metrics("", "One two three. One two three four five.");
        assert_eq!(record.avg_sentence_len_words, 4.0);
        assert_eq!(record.pct_sentences_gt20, 0.0);
    }

    #[test]
    fn test_pct_sentences_gt20() {
        let long = "word ".repeat(25);
        let text = format!("{long}. Short one.");
        let record = compute_metrics("", &text);
        // One of two sentences exceeds 20 words.
        assert_eq!(record.pct_sentences_gt20, 50.0);
    }

    #[test]
    fn test_ari_clamped_to_zero() {
        // Very short words and sentences drive ARI far below zero.
        assert_eq!(compute_ari_score("a b. c d."), 0.0);
    }

    #[test]
    fn test_ari_known_value() {
        // "Nice dogs run fast." -> 4 words, 15 chars, 1 sentence.
        // 4.71 * 3.75 + 0.5 * 4 - 21.43 = 19.4925 -> 2.2325 + ... compute:
        // 17.6625 + 2.0 - 21.43 = -1.7675 -> clamped to 0.
        assert_eq!(compute_ari_score("Nice dogs run fast."), 0.0);

        // Longer words push it positive: 3 words of 10 chars each.
        // 4.71 * 10 + 0.5 * 3 - 21.43 = 47.1 + 1.5 - 21.43 = 27.17
        assert_eq!(compute_ari_score("Regulation motorcycle dishwasher."), 27.17);
    }

    #[test]
    fn test_lix_known_value() {
        // 3 words, 1 sentence, 1 long word (>6 chars).
        // LIX = 3/1 + 1*100/3 = 36.333... -> 36.33
        assert_eq!(compute_lix_score("Weather is nice."), 36.33);
    }

    #[test]
    fn test_meaning_cosine_identical_text() {
        let record = compute_metrics("The cat sat here.", "The cat sat here.");
        assert_eq!(record.meaning_cosine, Some(1.0));
    }

    #[test]
    fn test_rounding_precision() {
        // Three sentences with 1, 2, and 4 words: avg = 7/3 = 2.333... -> 2.3
        let record = compute_metrics("", "One. Two two. Four four four four.");
        assert_eq!(record.avg_sentence_len_words, 2.3);
    }

    #[test]
    fn test_metric_key_lookup() {
        let record = MetricRecord {
            avg_sentence_len_words: 10.0,
            pct_sentences_gt20: 5.0,
            ari_score: 3.0,
            meaning_cosine: None,
        };
        assert_eq!(record.get(MetricKey::AvgSentenceLenWords), Some(10.0));
        assert_eq!(record.get(MetricKey::MeaningCosine), None);
    }

    #[test]
    fn test_record_serde_round_trip() {
        let record = compute_metrics("Complex legal terminology.", "Simple words here.");
        let json = serde_json::to_string(&record).unwrap();
        let back: MetricRecord = serde_json::from_str(&json).unwrap();
        assert_eq!(record, back);
    }

    #[test]
    fn test_missing_meaning_cosine_omitted_from_json() {
        let record = MetricRecord {
            avg_sentence_len_words: 1.0,
            pct_sentences_gt20: 0.0,
            ari_score: 0.0,
            meaning_cosine: None,
        };
        let json = serde_json::to_string(&record).unwrap();
        assert!(!json.contains("meaning_cosine"));
    }
}
