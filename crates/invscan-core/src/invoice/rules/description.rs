//! Description-of-goods block extraction.
//!
//! The goods description starts at the warehouse code and runs line by line
//! until the container marker. Quantities, prices and unit words are noise
//! in that block and are filtered out before fragment repair.

use tracing::trace;

use super::patterns::NUMERIC_TOKEN;
use crate::models::config::ExtractionConfig;

/// Raw description content of one invoice.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DescriptionBlock {
    /// Accumulated lines joined by single spaces, phrases stripped.
    pub text: String,
    /// Tokens left after filtering, in source order.
    pub tokens: Vec<String>,
    /// Whether the end marker was reached.
    pub terminated: bool,
}

/// Settings for cutting and filtering the description block.
#[derive(Debug, Clone)]
pub struct DescriptionRules {
    end_marker: String,
    stripped_phrases: Vec<String>,
    ignored_words: Vec<String>,
}

impl DescriptionRules {
    pub fn new(end_marker: impl Into<String>) -> Self {
        Self {
            end_marker: end_marker.into(),
            stripped_phrases: Vec::new(),
            ignored_words: Vec::new(),
        }
    }

    pub fn from_config(config: &ExtractionConfig) -> Self {
        Self::new(config.description_end_marker.clone())
            .with_stripped_phrases(config.stripped_phrases.iter().cloned())
            .with_ignored_words(config.ignored_words.iter().cloned())
    }

    /// Substrings removed from the joined block (case-sensitive).
    pub fn with_stripped_phrases(mut self, phrases: impl IntoIterator<Item = String>) -> Self {
        self.stripped_phrases = phrases.into_iter().collect();
        self
    }

    /// Whole tokens dropped regardless of case.
    pub fn with_ignored_words(mut self, words: impl IntoIterator<Item = String>) -> Self {
        self.ignored_words = words.into_iter().map(|w| w.to_lowercase()).collect();
        self
    }

    /// Cut the description block out of `text`, starting at byte offset
    /// `start` where `warehouse_id` was found.
    pub fn block(&self, text: &str, start: usize, warehouse_id: &str) -> DescriptionBlock {
        let tail = text.get(start..).unwrap_or_default();

        let mut lines = Vec::new();
        let mut terminated = false;
        for line in tail.split('\n') {
            if line.contains(&self.end_marker) {
                terminated = true;
                break;
            }
            lines.push(line.trim());
        }

        let mut joined = lines.join(" ");
        for phrase in &self.stripped_phrases {
            if !phrase.is_empty() {
                joined = joined.replace(phrase.as_str(), "");
            }
        }

        let tokens: Vec<String> = joined
            .split_whitespace()
            .filter(|token| self.keep_token(token, warehouse_id))
            .map(str::to_string)
            .collect();

        trace!(
            "Description block of {} lines, {} tokens kept, terminated: {}",
            lines.len(),
            tokens.len(),
            terminated
        );

        DescriptionBlock {
            text: joined,
            tokens,
            terminated,
        }
    }

    fn keep_token(&self, token: &str, warehouse_id: &str) -> bool {
        if NUMERIC_TOKEN.is_match(token) || token.contains('=') || token == warehouse_id {
            return false;
        }
        let lower = token.to_lowercase();
        !self.ignored_words.iter().any(|w| *w == lower)
    }
}

impl Default for DescriptionRules {
    fn default() -> Self {
        Self::from_config(&ExtractionConfig::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn tokens(text: &str) -> Vec<String> {
        let start = text.find("INW001").unwrap();
        DescriptionRules::default().block(text, start, "INW001").tokens
    }

    #[test]
    fn test_block_stops_at_container_marker() {
        let text = "Supplier Name: ACME\nINW001 WID GET Cartons 10 pieces usd=5\nCOTTON SHIRTS\nContainer No: X\nIGNORED LINE";
        let start = text.find("INW001").unwrap();

        let block = DescriptionRules::default().block(text, start, "INW001");
        assert_eq!(block.text, "INW001 WID GET 10 pieces usd=5 COTTON SHIRTS");
        assert_eq!(block.tokens, vec!["WID", "GET", "COTTON", "SHIRTS"]);
        assert!(block.terminated);
    }

    #[test]
    fn test_block_without_marker_takes_rest() {
        let block = DescriptionRules::default().block("INW001 A\nB C", 0, "INW001");
        assert_eq!(block.text, "INW001 A B C");
        assert!(!block.terminated);
    }

    #[test]
    fn test_marker_on_warehouse_line_gives_empty_block() {
        assert!(tokens("INW001 WIDGET Container No: X").is_empty());
    }

    #[test]
    fn test_filters_numbers_currency_and_assignments() {
        assert_eq!(
            tokens("INW001 12 3.50 1.2.3 USD Pieces price=4 INW001 SHIRT\nContainer No:"),
            vec!["1.2.3", "SHIRT"]
        );
    }

    #[test]
    fn test_cartons_is_case_sensitive() {
        assert_eq!(
            tokens("INW001 BOX cartons\nContainer No:"),
            vec!["BOX", "cartons"]
        );
        assert_eq!(tokens("INW001 BOX Cartonsful\nContainer No:"), vec!["BOXful"]);
    }
}
