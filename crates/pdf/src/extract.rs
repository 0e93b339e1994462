//! Positioned text extraction from PDF content streams.
//!
//! A deliberately small text-state machine: it tracks the vertical text
//! position through `Tm`/`Td`/`TD`/`TL`/`T*` and collects the text shown by
//! `Tj`/`TJ`/`'`/`"`. Horizontal layout, fonts, and tables are ignored --
//! the simplification pipeline only needs reading-order body text with
//! enough position information to drop header and footer rows.

use lopdf::content::Content;
use lopdf::{Document, Object, ObjectId};
use unicode_normalization::UnicodeNormalization;

use crate::PdfError;

/// Spans whose Y coordinates differ by less than this are one line.
const Y_TOLERANCE: f32 = 2.0;

/// Fallback page height (US Letter in points) when no MediaBox is found.
const DEFAULT_PAGE_HEIGHT: f32 = 792.0;

/// Kerning adjustments in a `TJ` array more negative than this indicate a
/// word gap.
const TJ_WORD_GAP: f32 = -100.0;

/// A run of text at a vertical position on the page.
#[derive(Debug, Clone)]
struct TextSpan {
    text: String,
    y: f32,
}

/// Extract body text per page, dropping rows inside the margin zones.
///
/// Returns one string per page, lines joined with `\n`, top-of-page first.
/// PDF coordinates grow upward, so the header zone is `y > height - margin`
/// and the footer zone is `y < margin`.
pub fn extract_pages(bytes: &[u8], margin_pct: f32) -> Result<Vec<String>, PdfError> {
    let doc = Document::load_mem(bytes).map_err(|e| PdfError::Parse(e.to_string()))?;
    if doc.is_encrypted() {
        return Err(PdfError::Encrypted);
    }

    let mut pages = Vec::new();
    for (_, page_id) in doc.get_pages() {
        let height = page_height(&doc, page_id);
        let margin = height * margin_pct;

        let spans = page_spans(&doc, page_id)?;
        let mut lines = group_lines(spans);
        lines.sort_by(|a, b| b.0.partial_cmp(&a.0).unwrap_or(std::cmp::Ordering::Equal));

        let kept: Vec<String> = lines
            .into_iter()
            .filter(|(y, _)| *y >= margin && *y <= height - margin)
            .map(|(_, text)| text)
            .collect();

        pages.push(kept.join("\n"));
    }

    Ok(pages)
}

/// Walk one page's content stream and collect positioned spans.
fn page_spans(doc: &Document, page_id: ObjectId) -> Result<Vec<TextSpan>, PdfError> {
    let data = doc
        .get_page_content(page_id)
        .map_err(|e| PdfError::Parse(e.to_string()))?;
    let content = Content::decode(&data).map_err(|e| PdfError::Parse(e.to_string()))?;

    let mut spans = Vec::new();
    let mut y = 0.0f32;
    let mut leading = 0.0f32;

    for op in &content.operations {
        match op.operator.as_str() {
            "BT" => y = 0.0,
            "Tm" => {
                if let Some(f) = op.operands.get(5).and_then(as_number) {
                    y = f;
                }
            }
            "Td" => {
                if let Some(ty) = op.operands.get(1).and_then(as_number) {
                    y += ty;
                }
            }
            "TD" => {
                if let Some(ty) = op.operands.get(1).and_then(as_number) {
                    leading = -ty;
                    y += ty;
                }
            }
            "TL" => {
                if let Some(l) = op.operands.first().and_then(as_number) {
                    leading = l;
                }
            }
            "T*" => y -= leading,
            "Tj" => {
                if let Some(text) = string_operand(op.operands.first()) {
                    push_span(&mut spans, y, text);
                }
            }
            "'" => {
                y -= leading;
                if let Some(text) = string_operand(op.operands.first()) {
                    push_span(&mut spans, y, text);
                }
            }
            "\"" => {
                y -= leading;
                if let Some(text) = string_operand(op.operands.get(2)) {
                    push_span(&mut spans, y, text);
                }
            }
            "TJ" => {
                if let Some(Object::Array(items)) = op.operands.first() {
                    let mut text = String::new();
                    for item in items {
                        match item {
                            Object::String(bytes, _) => text.push_str(&decode_text(bytes)),
                            other => {
                                if as_number(other).is_some_and(|n| n < TJ_WORD_GAP) {
                                    text.push(' ');
                                }
                            }
                        }
                    }
                    push_span(&mut spans, y, text);
                }
            }
            _ => {}
        }
    }

    Ok(spans)
}

fn push_span(spans: &mut Vec<TextSpan>, y: f32, text: String) {
    if !text.is_empty() {
        spans.push(TextSpan { text, y });
    }
}

fn string_operand(operand: Option<&Object>) -> Option<String> {
    match operand {
        Some(Object::String(bytes, _)) => Some(decode_text(bytes)),
        _ => None,
    }
}

/// Group consecutive spans sharing (approximately) the same Y coordinate.
fn group_lines(spans: Vec<TextSpan>) -> Vec<(f32, String)> {
    let mut lines: Vec<(f32, String)> = Vec::new();
    for span in spans {
        match lines.last_mut() {
            Some((y, text)) if (*y - span.y).abs() < Y_TOLERANCE => {
                text.push(' ');
                text.push_str(&span.text);
            }
            _ => lines.push((span.y, span.text)),
        }
    }
    lines
}

/// Look up the page height from its (possibly inherited) MediaBox.
fn page_height(doc: &Document, page_id: ObjectId) -> f32 {
    let mut current = page_id;
    // Bounded walk up the page tree for an inherited MediaBox.
    for _ in 0..8 {
        let Ok(dict) = doc.get_object(current).and_then(|o| o.as_dict()) else {
            break;
        };
        if let Ok(Object::Array(rect)) = dict.get(b"MediaBox") {
            if rect.len() == 4 {
                let y0 = as_number(&rect[1]);
                let y1 = as_number(&rect[3]);
                if let (Some(y0), Some(y1)) = (y0, y1) {
                    return y1 - y0;
                }
            }
        }
        match dict.get(b"Parent").and_then(|p| p.as_reference()) {
            Ok(parent) => current = parent,
            Err(_) => break,
        }
    }
    DEFAULT_PAGE_HEIGHT
}

fn as_number(obj: &Object) -> Option<f32> {
    match obj {
        Object::Integer(i) => Some(*i as f32),
        Object::Real(f) => Some(*f),
        _ => None,
    }
}

/// Best-effort decoding of raw PDF string bytes.
///
/// Handles UTF-16BE with BOM, valid UTF-8, and falls back to Latin-1.
/// The result is NFC-normalized with common ligatures expanded so that
/// downstream word extraction sees plain letters.
fn decode_text(bytes: &[u8]) -> String {
    let raw = if bytes.len() >= 2 && bytes[0] == 0xFE && bytes[1] == 0xFF {
        let code_units: Vec<u16> = bytes[2..]
            .chunks(2)
            .filter(|chunk| chunk.len() == 2)
            .map(|chunk| u16::from_be_bytes([chunk[0], chunk[1]]))
            .collect();
        String::from_utf16_lossy(&code_units)
    } else if let Ok(s) = std::str::from_utf8(bytes) {
        s.to_string()
    } else {
        bytes.iter().map(|&b| b as char).collect()
    };

    let mut text: String = raw.nfc().collect();
    for (ligature, replacement) in [
        ("\u{FB00}", "ff"),
        ("\u{FB01}", "fi"),
        ("\u{FB02}", "fl"),
        ("\u{FB03}", "ffi"),
        ("\u{FB04}", "ffl"),
    ] {
        text = text.replace(ligature, replacement);
    }
    text
}
