//! Splitting of multi-invoice OCR text into per-invoice segments.

use regex::Regex;
use tracing::debug;

use crate::error::ExtractionError;
use crate::models::config::{BoundaryMode, ExtractionConfig};

/// One invoice's contiguous span of the document text.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct InvoiceSegment<'a> {
    /// Zero-based position among the document's segments.
    pub index: usize,
    /// Byte offset of the segment in the document text.
    pub offset: usize,
    /// Segment text, starting with the boundary token.
    pub text: &'a str,
}

/// Locates invoice boundaries and slices the text between them.
#[derive(Debug, Clone)]
pub struct InvoiceSegmenter {
    boundary: Boundary,
}

#[derive(Debug, Clone)]
enum Boundary {
    Exact(String),
    Fuzzy(Regex),
}

impl InvoiceSegmenter {
    /// Exact, case-sensitive segmentation on `token`.
    pub fn new(token: impl Into<String>) -> Self {
        Self {
            boundary: Boundary::Exact(token.into()),
        }
    }

    /// Segmentation tolerant of OCR confusions inside an uppercase token.
    pub fn fuzzy(token: &str) -> Result<Self, ExtractionError> {
        let pattern: String = token
            .chars()
            .map(|c| match c {
                'I' => "[I1l|]".to_string(),
                'O' => "[O0]".to_string(),
                other => regex::escape(other.encode_utf8(&mut [0; 4])),
            })
            .collect();

        Ok(Self {
            boundary: Boundary::Fuzzy(Regex::new(&pattern)?),
        })
    }

    pub fn from_config(config: &ExtractionConfig) -> Result<Self, ExtractionError> {
        config.validate()?;
        match config.boundary_mode {
            BoundaryMode::Exact => Ok(Self::new(config.boundary_token.clone())),
            BoundaryMode::Fuzzy => Self::fuzzy(&config.boundary_token),
        }
    }

    /// Byte offsets of every boundary occurrence, in order.
    pub fn boundaries(&self, text: &str) -> Vec<usize> {
        match &self.boundary {
            Boundary::Exact(token) => text.match_indices(token.as_str()).map(|(i, _)| i).collect(),
            Boundary::Fuzzy(pattern) => pattern.find_iter(text).map(|m| m.start()).collect(),
        }
    }

    /// Split `text` into segments. Text before the first boundary is dropped.
    pub fn segment<'a>(&self, text: &'a str) -> Vec<InvoiceSegment<'a>> {
        let starts = self.boundaries(text);

        let segments: Vec<InvoiceSegment<'a>> = starts
            .iter()
            .enumerate()
            .map(|(index, &start)| {
                let end = starts.get(index + 1).copied().unwrap_or(text.len());
                InvoiceSegment {
                    index,
                    offset: start,
                    text: &text[start..end],
                }
            })
            .collect();

        debug!(
            "Found {} invoice segments in {} characters ({} bytes of preamble)",
            segments.len(),
            text.len(),
            starts.first().copied().unwrap_or(text.len())
        );

        segments
    }
}

impl Default for InvoiceSegmenter {
    fn default() -> Self {
        Self::new("INVOICE")
    }
}

/// Split text on the default `INVOICE` boundary.
pub fn segment(text: &str) -> Vec<InvoiceSegment<'_>> {
    InvoiceSegmenter::default().segment(text)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn texts<'a>(segments: &[InvoiceSegment<'a>]) -> Vec<&'a str> {
        segments.iter().map(|s| s.text).collect()
    }

    #[test]
    fn test_no_boundary_gives_no_segments() {
        assert!(segment("Invoice No: A1 but no marker").is_empty());
        assert!(segment("").is_empty());
    }

    #[test]
    fn test_preamble_dropped_and_token_kept() {
        let segments = segment("scan header\nINVOICE one\nINVOICE two");
        assert_eq!(texts(&segments), vec!["INVOICE one\n", "INVOICE two"]);
        assert_eq!(segments[0].offset, 12);
        assert_eq!(segments[1].index, 1);
    }

    #[test]
    fn test_boundary_is_case_sensitive() {
        assert_eq!(texts(&segment("INVOICE a Invoice b invoice c")).len(), 1);
    }

    #[test]
    fn test_boundary_inside_word_still_splits() {
        assert_eq!(
            texts(&segment("INVOICE a INVOICED b")),
            vec!["INVOICE a ", "INVOICED b"]
        );
    }

    #[test]
    fn test_adjacent_boundaries() {
        assert_eq!(
            texts(&segment("INVOICEINVOICE")),
            vec!["INVOICE", "INVOICE"]
        );
    }

    #[test]
    fn test_fuzzy_boundaries() {
        let segmenter = InvoiceSegmenter::fuzzy("INVOICE").unwrap();
        let segments = segmenter.segment("x INV0ICE a 1NVOICE b lNV0lCE c Invoice d");
        assert_eq!(
            texts(&segments),
            vec!["INV0ICE a ", "1NVOICE b ", "lNV0lCE c Invoice d"]
        );
    }

    #[test]
    fn test_from_config() {
        let mut config = ExtractionConfig::default();
        config.boundary_mode = BoundaryMode::Fuzzy;
        let segmenter = InvoiceSegmenter::from_config(&config).unwrap();
        assert_eq!(segmenter.segment("INV0ICE").len(), 1);

        config.boundary_token = String::new();
        assert!(InvoiceSegmenter::from_config(&config).is_err());
    }
}
