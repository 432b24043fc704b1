//! Configuration structures for the extraction pipeline.

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::{ExtractionError, InvscanError, Result};

/// Main configuration for invscan.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct InvscanConfig {
    /// Segmentation and field extraction rules.
    pub extraction: ExtractionConfig,

    /// Table serialization settings.
    pub output: OutputConfig,
}

/// How invoice boundaries are located in the OCR text.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BoundaryMode {
    /// Literal, case-sensitive match of the boundary token.
    #[default]
    Exact,
    /// Uppercase match tolerating OCR confusions (`0` for `O`, `1`/`l`/`|` for `I`).
    Fuzzy,
}

/// Segmentation and field extraction rules.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ExtractionConfig {
    /// Token that starts every invoice in a multi-invoice document.
    pub boundary_token: String,

    /// Boundary matching strategy.
    pub boundary_mode: BoundaryMode,

    /// Three-letter prefixes of warehouse codes (`INW001`).
    pub warehouse_prefixes: Vec<String>,

    /// Line marker that ends the description block.
    pub description_end_marker: String,

    /// Substrings removed from the joined description block.
    pub stripped_phrases: Vec<String>,

    /// Words dropped from descriptions (compared case-insensitively).
    pub ignored_words: Vec<String>,

    /// Tokens up to this many characters are treated as OCR fragments.
    pub max_fragment_len: usize,

    /// Labels of which at least one must appear in a document.
    pub required_keywords: Vec<String>,
}

impl Default for ExtractionConfig {
    fn default() -> Self {
        Self {
            boundary_token: "INVOICE".to_string(),
            boundary_mode: BoundaryMode::Exact,
            warehouse_prefixes: vec!["INW".to_string()],
            description_end_marker: "Container No:".to_string(),
            stripped_phrases: vec![" Cartons".to_string()],
            ignored_words: vec!["usd".to_string(), "pieces".to_string()],
            max_fragment_len: 2,
            required_keywords: [
                "invoice",
                "order no",
                "invoice date",
                "supplier name",
                "warehouse id",
            ]
            .map(String::from)
            .to_vec(),
        }
    }
}

impl ExtractionConfig {
    /// Check rule settings before extractors are built from them.
    pub fn validate(&self) -> std::result::Result<(), ExtractionError> {
        if self.boundary_token.trim().is_empty() {
            return Err(invalid("boundary_token", "must not be empty"));
        }

        if self.boundary_mode == BoundaryMode::Fuzzy
            && !self.boundary_token.chars().all(|c| c.is_ascii_uppercase())
        {
            return Err(invalid(
                "boundary_token",
                "fuzzy matching needs an uppercase ASCII token",
            ));
        }

        if self.warehouse_prefixes.is_empty() {
            return Err(invalid("warehouse_prefixes", "at least one prefix is required"));
        }

        if let Some(bad) = self
            .warehouse_prefixes
            .iter()
            .find(|p| p.len() != 3 || !p.chars().all(|c| c.is_ascii_uppercase()))
        {
            return Err(invalid(
                "warehouse_prefixes",
                &format!("{bad:?} is not three uppercase letters"),
            ));
        }

        if self.description_end_marker.is_empty() {
            return Err(invalid("description_end_marker", "must not be empty"));
        }

        if self.max_fragment_len == 0 {
            return Err(invalid("max_fragment_len", "must be at least 1"));
        }

        Ok(())
    }
}

fn invalid(field: &str, reason: &str) -> ExtractionError {
    ExtractionError::Validation {
        field: field.to_string(),
        reason: reason.to_string(),
    }
}

/// Table serialization settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct OutputConfig {
    /// Text written for fields that were not found.
    pub missing_value: String,

    /// Field delimiter for delimited output.
    pub delimiter: char,

    /// Write the column header row.
    pub include_header: bool,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            missing_value: String::new(),
            delimiter: ',',
            include_header: true,
        }
    }
}

impl InvscanConfig {
    /// Load configuration from a JSON file.
    pub fn from_file(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        Ok(serde_json::from_str(&content)?)
    }

    /// Save configuration to a JSON file.
    pub fn save(&self, path: &Path) -> Result<()> {
        let content = serde_json::to_string_pretty(self)?;
        std::fs::write(path, content)?;
        Ok(())
    }

    /// Look up a value by dotted key, e.g. `extraction.boundary_token`.
    pub fn get_value(&self, key: &str) -> Result<serde_json::Value> {
        let json = serde_json::to_value(self)?;
        key.split('.')
            .try_fold(&json, |node, part| node.get(part))
            .cloned()
            .ok_or_else(|| InvscanError::Config(format!("unknown key: {key}")))
    }

    /// Replace a value by dotted key.
    ///
    /// `raw` is parsed as JSON first and falls back to a plain string, so
    /// `2`, `true` and `["INW","EXW"]` keep their types.
    pub fn set_value(&mut self, key: &str, raw: &str) -> Result<serde_json::Value> {
        let value: serde_json::Value = serde_json::from_str(raw)
            .unwrap_or_else(|_| serde_json::Value::String(raw.to_string()));

        let mut json = serde_json::to_value(&*self)?;
        let (parent, leaf) = match key.rsplit_once('.') {
            Some((parent, leaf)) => (Some(parent), leaf),
            None => (None, key),
        };

        let mut node = &mut json;
        if let Some(parent) = parent {
            for part in parent.split('.') {
                node = node
                    .get_mut(part)
                    .ok_or_else(|| InvscanError::Config(format!("unknown key: {key}")))?;
            }
        }

        let slot = node
            .as_object_mut()
            .and_then(|obj| obj.get_mut(leaf))
            .ok_or_else(|| InvscanError::Config(format!("unknown key: {key}")))?;
        *slot = value.clone();

        *self = serde_json::from_value(json)
            .map_err(|e| InvscanError::Config(format!("invalid value for {key}: {e}")))?;
        Ok(value)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_defaults_are_valid() {
        let config = InvscanConfig::default();
        assert!(config.extraction.validate().is_ok());
        assert_eq!(config.extraction.boundary_token, "INVOICE");
        assert_eq!(config.extraction.boundary_mode, BoundaryMode::Exact);
    }

    #[test]
    fn test_rejects_bad_warehouse_prefix() {
        let mut config = ExtractionConfig::default();
        config.warehouse_prefixes = vec!["IN".to_string()];
        assert!(matches!(
            config.validate(),
            Err(ExtractionError::Validation { field, .. }) if field == "warehouse_prefixes"
        ));
    }

    #[test]
    fn test_rejects_lowercase_fuzzy_token() {
        let mut config = ExtractionConfig::default();
        config.boundary_mode = BoundaryMode::Fuzzy;
        config.boundary_token = "Invoice".to_string();
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_partial_json_uses_defaults() {
        let config: InvscanConfig =
            serde_json::from_str(r#"{"extraction": {"boundary_mode": "fuzzy"}}"#).unwrap();
        assert_eq!(config.extraction.boundary_mode, BoundaryMode::Fuzzy);
        assert_eq!(config.extraction.boundary_token, "INVOICE");
        assert_eq!(config.output, OutputConfig::default());
    }

    #[test]
    fn test_get_and_set_value() {
        let mut config = InvscanConfig::default();

        assert_eq!(
            config.get_value("extraction.max_fragment_len").unwrap(),
            serde_json::json!(2)
        );

        config.set_value("extraction.max_fragment_len", "3").unwrap();
        assert_eq!(config.extraction.max_fragment_len, 3);

        config.set_value("output.missing_value", "N/A").unwrap();
        assert_eq!(config.output.missing_value, "N/A");

        assert!(config.get_value("extraction.nope").is_err());
        assert!(config.set_value("extraction.max_fragment_len", "many").is_err());
    }

    #[test]
    fn test_save_and_load() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.json");

        let mut config = InvscanConfig::default();
        config.extraction.warehouse_prefixes.push("EXW".to_string());
        config.save(&path).unwrap();

        assert_eq!(InvscanConfig::from_file(&path).unwrap(), config);
    }
}
