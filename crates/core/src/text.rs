//! Sentence splitting and word extraction heuristics.
//!
//! Both functions are character-class heuristics, not linguistic parsers.
//! They must stay in sync with each other: every metric in [`crate::metrics`]
//! counts words per sentence with the same [`words`] function.

use std::sync::OnceLock;

use regex::Regex;

/// Split text into sentences, handling common abbreviations.
///
/// Known abbreviation patterns (English and German) get their trailing
/// period replaced with a `_DOT` placeholder so they are not mistaken for
/// sentence boundaries. The placeholder is not restored; word extraction
/// ignores the underscore anyway.
pub fn split_sentences(text: &str) -> Vec<String> {
    static RE_ABBREV_EN: OnceLock<Regex> = OnceLock::new();
    let re_en = RE_ABBREV_EN.get_or_init(|| {
        Regex::new(r"\b(Mr|Mrs|Ms|Dr|Prof|Jr|Sr|vs|etc|e\.g|i\.e)\.\s").unwrap()
    });

    static RE_ABBREV_DE: OnceLock<Regex> = OnceLock::new();
    let re_de = RE_ABBREV_DE.get_or_init(|| Regex::new(r"\b(z\.B|d\.h|usw|ggfs)\.\s").unwrap());

    static RE_BOUNDARY: OnceLock<Regex> = OnceLock::new();
    let re_boundary = RE_BOUNDARY.get_or_init(|| Regex::new(r"[.!?]+\s+").unwrap());

    let protected = re_en.replace_all(text, "${1}_DOT ");
    let protected = re_de.replace_all(&protected, "${1}_DOT ");

    re_boundary
        .split(protected.trim())
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
        .collect()
}

/// Extract words from text, handling German and accented characters.
///
/// A word is a maximal run of Latin letters extended with
/// `ÄÖÜäöüß` and the accented vowels found in Romance loanwords.
pub fn words(text: &str) -> Vec<&str> {
    static RE_WORD: OnceLock<Regex> = OnceLock::new();
    let re_word =
        RE_WORD.get_or_init(|| Regex::new(r"[A-Za-zÄÖÜäöüßéèêëàâáîïíôöóûüú]+").unwrap());

    re_word.find_iter(text).map(|m| m.as_str()).collect()
}
