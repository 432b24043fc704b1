//! Checks and helpers for whole OCR documents.

use tracing::warn;

use crate::error::DocumentError;

/// Concatenate per-page OCR output, each page followed by a newline.
pub fn join_pages<I, S>(pages: I) -> String
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    pages.into_iter().fold(String::new(), |mut text, page| {
        text.push_str(page.as_ref());
        text.push('\n');
        text
    })
}

/// Reject text that cannot contain any invoice.
///
/// The text must be non-blank and mention at least one of `keywords`
/// (compared case-insensitively). An empty keyword list only checks for
/// blank text.
pub fn validate_document<S: AsRef<str>>(text: &str, keywords: &[S]) -> Result<(), DocumentError> {
    if text.trim().is_empty() {
        warn!("No text could be extracted from the document");
        return Err(DocumentError::EmptyText);
    }

    if keywords.is_empty() {
        return Ok(());
    }

    let lower = text.to_lowercase();
    if keywords
        .iter()
        .any(|keyword| lower.contains(&keyword.as_ref().to_lowercase()))
    {
        Ok(())
    } else {
        Err(DocumentError::MissingKeywords {
            expected: keywords.iter().map(|k| k.as_ref().to_string()).collect(),
        })
    }
}
