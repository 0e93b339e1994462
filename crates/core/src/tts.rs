//! Text preprocessing for speech synthesis.
//!
//! Speech backends read list markers aloud ("asterisk", "dash") and run
//! sentences together when punctuation has no trailing space. This pass
//! strips the markers and repairs the spacing before the text is handed to
//! whatever synthesis backend the caller wires in.

use std::sync::OnceLock;

use regex::Regex;

/// Normalize text for speech synthesis.
///
/// Applied in order: strip leading bullet markers per line, strip numbered
/// and lettered list markers, insert a space after sentence and clause
/// punctuation followed directly by a letter, drop angle-bracket markup,
/// collapse repeated spaces, collapse 3+ newlines to 2, and trim each line
/// plus the whole text.
pub fn preprocess_for_tts(text: &str) -> String {
    static RE_BULLET: OnceLock<Regex> = OnceLock::new();
    let re_bullet = RE_BULLET.get_or_init(|| Regex::new(r"(?m)^[*\-•●▪►▸‣⁃]\s*").unwrap());

    static RE_NUMBERED: OnceLock<Regex> = OnceLock::new();
    let re_numbered = RE_NUMBERED.get_or_init(|| Regex::new(r"(?m)^\d+[.)]\s*").unwrap());

    static RE_LETTERED: OnceLock<Regex> = OnceLock::new();
    let re_lettered = RE_LETTERED.get_or_init(|| Regex::new(r"(?m)^[A-Za-z][.)]\s*").unwrap());

    static RE_SENTENCE_PUNCT: OnceLock<Regex> = OnceLock::new();
    let re_sentence_punct =
        RE_SENTENCE_PUNCT.get_or_init(|| Regex::new(r"([.!?])([A-Za-zÄÖÜäöüß])").unwrap());

    static RE_CLAUSE_PUNCT: OnceLock<Regex> = OnceLock::new();
    let re_clause_punct =
        RE_CLAUSE_PUNCT.get_or_init(|| Regex::new(r"([,:;])([A-Za-zÄÖÜäöüß])").unwrap());

    static RE_MARKUP: OnceLock<Regex> = OnceLock::new();
    let re_markup = RE_MARKUP.get_or_init(|| Regex::new(r"<[^>]+>").unwrap());

    static RE_SPACES: OnceLock<Regex> = OnceLock::new();
    let re_spaces = RE_SPACES.get_or_init(|| Regex::new(r" +").unwrap());

    static RE_PARA: OnceLock<Regex> = OnceLock::new();
    let re_para = RE_PARA.get_or_init(|| Regex::new(r"\n{3,}").unwrap());

    let text = re_bullet.replace_all(text, "");
    let text = re_numbered.replace_all(&text, "");
    let text = re_lettered.replace_all(&text, "");
    let text = re_sentence_punct.replace_all(&text, "${1} ${2}");
    let text = re_clause_punct.replace_all(&text, "${1} ${2}");
    let text = re_markup.replace_all(&text, "");
    let text = re_spaces.replace_all(&text, " ");
    let text = re_para.replace_all(&text, "\n\n");

    text.lines()
        .map(str::trim)
        .collect::<Vec<_>>()
        .join("\n")
        .trim()
        .to_string()
}
