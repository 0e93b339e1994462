//! Deterministic cleanup of extracted PDF text.
//!
//! The steps run in a fixed order because later ones depend on earlier
//! normalization: de-hyphenation must see the original line breaks, and
//! whitespace collapsing must run after wrapped lines have become spaces.
//! The transform is a fixed point: applying it twice equals applying it
//! once.

use std::sync::OnceLock;

use regex::Regex;

/// Clean up extracted PDF text.
///
/// 1. De-hyphenate words split across lines (`exam-\nple` -> `example`).
/// 2. Turn single line wraps into spaces; collapse 3+ newlines to 2.
/// 3. Collapse space/tab runs; strip spaces around newlines.
/// 4. Trim the result.
pub fn clean_extracted_text(text: &str) -> String {
    if text.is_empty() {
        return String::new();
    }

    // 1. De-hyphenate: a hyphen immediately before a newline immediately
    // before a word character joins the two halves.
    static RE_HYPHEN: OnceLock<Regex> = OnceLock::new();
    let re_hyphen = RE_HYPHEN.get_or_init(|| Regex::new(r"(\w)-\n(\w)").unwrap());
    let text = re_hyphen.replace_all(text, "${1}${2}");

    // 2. Line-break normalization.
    let text = single_newlines_to_spaces(&text);

    static RE_PARA: OnceLock<Regex> = OnceLock::new();
    let re_para = RE_PARA.get_or_init(|| Regex::new(r"\n{3,}").unwrap());
    let text = re_para.replace_all(&text, "\n\n");

    // 3. Whitespace normalization.
    static RE_SPACES: OnceLock<Regex> = OnceLock::new();
    let re_spaces = RE_SPACES.get_or_init(|| Regex::new(r"[ \t]+").unwrap());
    let text = re_spaces.replace_all(&text, " ");

    static RE_TRAILING: OnceLock<Regex> = OnceLock::new();
    let re_trailing = RE_TRAILING.get_or_init(|| Regex::new(r" +\n").unwrap());
    let text = re_trailing.replace_all(&text, "\n");

    static RE_LEADING: OnceLock<Regex> = OnceLock::new();
    let re_leading = RE_LEADING.get_or_init(|| Regex::new(r"\n +").unwrap());
    let text = re_leading.replace_all(&text, "\n");

    // 4. Strip leading/trailing whitespace.
    text.trim().to_string()
}

/// Replace every newline not adjacent to another newline with a space.
///
/// The regex crate has no lookaround, so this is a direct character walk.
fn single_newlines_to_spaces(text: &str) -> String {
    let chars: Vec<char> = text.chars().collect();
    let mut out = String::with_capacity(text.len());

    for (i, &c) in chars.iter().enumerate() {
        if c == '\n' {
            let prev_is_newline = i > 0 && chars[i - 1] == '\n';
            let next_is_newline = chars.get(i + 1) == Some(&'\n');
            if !prev_is_newline && !next_is_newline {
                out.push(' ');
                continue;
            }
        }
        out.push(c);
    }

    out
}
