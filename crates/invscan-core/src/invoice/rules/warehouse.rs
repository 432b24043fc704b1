//! Warehouse code extraction (`INW001`).

use regex::Regex;

use super::patterns::WAREHOUSE_ID;
use super::{ExtractionMatch, FieldExtractor};
use crate::error::ExtractionError;

/// Extracts standalone warehouse codes: a known three-letter prefix followed
/// by three digits.
#[derive(Debug, Clone)]
pub struct WarehouseIdExtractor {
    pattern: Regex,
}

impl WarehouseIdExtractor {
    /// Build an extractor for the given prefix family.
    pub fn new<S: AsRef<str>>(prefixes: &[S]) -> Result<Self, ExtractionError> {
        if prefixes.is_empty() {
            return Err(ExtractionError::Validation {
                field: "warehouse_prefixes".to_string(),
                reason: "at least one prefix is required".to_string(),
            });
        }

        let alternatives = prefixes
            .iter()
            .map(|p| regex::escape(p.as_ref()))
            .collect::<Vec<_>>()
            .join("|");
        let pattern = Regex::new(&format!(r"\b(?:{alternatives})\d{{3}}\b"))?;

        Ok(Self { pattern })
    }
}

impl Default for WarehouseIdExtractor {
    fn default() -> Self {
        Self {
            pattern: WAREHOUSE_ID.clone(),
        }
    }
}

impl FieldExtractor for WarehouseIdExtractor {
    type Output = ExtractionMatch<String>;

    fn extract(&self, text: &str) -> Option<Self::Output> {
        self.pattern
            .find(text)
            .map(|m| ExtractionMatch::new(m.as_str().to_string(), m.as_str(), m.start(), m.end()))
    }

    fn extract_all(&self, text: &str) -> Vec<Self::Output> {
        self.pattern
            .find_iter(text)
            .map(|m| ExtractionMatch::new(m.as_str().to_string(), m.as_str(), m.start(), m.end()))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_extract_standalone_code() {
        let extractor = WarehouseIdExtractor::new(&["INW"]).unwrap();

        let m = extractor.extract("Supplier\nINW001 WID GET").unwrap();
        assert_eq!(m.value, "INW001");
        assert_eq!(m.start(), 9);
    }

    #[test]
    fn test_requires_word_boundaries() {
        let extractor = WarehouseIdExtractor::new(&["INW"]).unwrap();

        assert!(extractor.extract("XINW001").is_none());
        assert!(extractor.extract("INW0012").is_none());
        assert!(extractor.extract("INW01").is_none());
        assert_eq!(extractor.extract("XINW001 INW002").unwrap().value, "INW002");
    }

    #[test]
    fn test_prefix_family() {
        let extractor = WarehouseIdExtractor::new(&["INW", "EXW"]).unwrap();

        let codes: Vec<String> = extractor
            .extract_all("EXW123 then INW456 and ABC789")
            .into_iter()
            .map(|m| m.value)
            .collect();
        assert_eq!(codes, vec!["EXW123", "INW456"]);
    }

    #[test]
    fn test_empty_family_rejected() {
        let prefixes: [&str; 0] = [];
        assert!(WarehouseIdExtractor::new(&prefixes).is_err());
    }
}
