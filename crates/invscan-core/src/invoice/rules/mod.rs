//! Rule-based field extractors for invoice segments.

pub mod description;
pub mod labeled;
pub mod patterns;
pub mod warehouse;

pub use description::{DescriptionBlock, DescriptionRules};
pub use labeled::LabeledFieldExtractor;
pub use warehouse::WarehouseIdExtractor;

/// Trait for field extractors.
pub trait FieldExtractor {
    /// The type of value this extractor produces.
    type Output;

    /// Extract the first occurrence of the field from text.
    fn extract(&self, text: &str) -> Option<Self::Output>;

    /// Extract all occurrences of the field.
    fn extract_all(&self, text: &str) -> Vec<Self::Output>;
}

/// A field value together with where it was found.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExtractionMatch<T> {
    /// Extracted value.
    pub value: T,
    /// Byte range of the whole match in the source text.
    pub position: (usize, usize),
    /// Source text that was matched.
    pub source: String,
}

impl<T> ExtractionMatch<T> {
    pub fn new(value: T, source: impl Into<String>, start: usize, end: usize) -> Self {
        Self {
            value,
            position: (start, end),
            source: source.into(),
        }
    }

    /// Start offset of the match.
    pub fn start(&self) -> usize {
        self.position.0
    }
}
