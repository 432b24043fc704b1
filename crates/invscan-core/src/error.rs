//! Error types for the invscan-core library.

use thiserror::Error;

/// Main error type for the invscan library.
#[derive(Error, Debug)]
pub enum InvscanError {
    /// The input document was rejected before extraction.
    #[error("document error: {0}")]
    Document(#[from] DocumentError),

    /// Extraction rules could not be built.
    #[error("extraction error: {0}")]
    Extraction(#[from] ExtractionError),

    /// I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON (de)serialization error.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Configuration error.
    #[error("configuration error: {0}")]
    Config(String),
}

/// Errors describing OCR text that cannot hold any invoice.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum DocumentError {
    /// No text was extracted at all.
    #[error("unable to extract text; the document might be blank or incorrectly formatted")]
    EmptyText,

    /// None of the expected invoice labels occur in the text.
    #[error("the document does not contain any of the expected fields ({})", .expected.join(", "))]
    MissingKeywords { expected: Vec<String> },

    /// The text was segmented but no segment carried an invoice number.
    #[error("no invoices found ({segments} segments starting with {boundary:?})")]
    NoInvoices { boundary: String, segments: usize },
}

/// Errors related to building the extraction rules.
#[derive(Error, Debug)]
pub enum ExtractionError {
    /// A rule setting failed validation.
    #[error("validation failed for {field}: {reason}")]
    Validation { field: String, reason: String },

    /// A rule pattern failed to compile.
    #[error("invalid pattern: {0}")]
    Pattern(#[from] regex::Error),
}

/// Result type for the invscan library.
pub type Result<T> = std::result::Result<T, InvscanError>;
