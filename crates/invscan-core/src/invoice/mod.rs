//! Invoice segmentation and field extraction module.

pub mod document;
mod extractor;
mod parser;
pub mod repair;
pub mod rules;
pub mod segmenter;

pub use document::{join_pages, validate_document};
pub use extractor::{ExtractedFields, InvoiceFieldExtractor};
pub use parser::{build_table, ExtractionResult, InvoiceTableBuilder};
pub use repair::{repair, DescriptionRepair};
pub use segmenter::{segment, InvoiceSegment, InvoiceSegmenter};

/// Trait for per-segment invoice field extractors.
///
/// Extraction never fails: fields that do not match are `None`.
pub trait InvoiceExtractor {
    /// Recover fields from one segment.
    fn extract(&self, segment: &InvoiceSegment<'_>) -> ExtractedFields;
}

/// Trait for whole-document invoice parsing.
pub trait InvoiceParser {
    /// Parse every invoice in the document text.
    fn parse(&self, text: &str) -> ExtractionResult;
}

/// Extract one segment with default rules, description left as tokens.
pub fn extract(segment: &InvoiceSegment<'_>) -> ExtractedFields {
    InvoiceFieldExtractor::new().extract(segment)
}
