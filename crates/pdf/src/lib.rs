//! PDF text extraction for the KlarText simplification pipeline.
//!
//! Extracts positioned text per page (lopdf backend), drops header/footer
//! zones based on vertical position, and applies the deterministic cleanup
//! transform so the result is ready for prompt assembly.

use thiserror::Error;

pub mod cleanup;
pub mod extract;

pub use cleanup::clean_extracted_text;

/// Fraction of page height treated as header/footer zone on each edge.
pub const DEFAULT_MARGIN_PCT: f32 = 0.08;

#[derive(Debug, Error)]
pub enum PdfError {
    #[error("PDF parsing error: {0}")]
    Parse(String),
    #[error("Document is encrypted")]
    Encrypted,
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Extract and clean text from PDF bytes.
///
/// Text rows whose vertical position falls within `margin_pct` of the page
/// height from the top or bottom edge are dropped (running headers and
/// footers). Pages are joined with blank lines, then
/// [`clean_extracted_text`] is applied to the whole document.
pub fn extract_text(bytes: &[u8], margin_pct: f32) -> Result<String, PdfError> {
    let pages = extract::extract_pages(bytes, margin_pct)?;
    let raw = pages.join("\n\n");
    Ok(clean_extracted_text(&raw))
}
