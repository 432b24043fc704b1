//! Extraction of `Label: value` fields.

use regex::Regex;

use super::patterns::{INVOICE_DATE, INVOICE_NO, ORDER_NO, SUPPLIER_NAME};
use super::{ExtractionMatch, FieldExtractor};
use crate::models::record::Field;

/// Extracts the first capture group of a labeled pattern.
#[derive(Debug, Clone, Copy)]
pub struct LabeledFieldExtractor {
    field: Field,
    pattern: &'static Regex,
    trim: bool,
    drop_glued_code: bool,
}

impl LabeledFieldExtractor {
    /// `Invoice No: ABC-123`
    pub fn invoice_no() -> Self {
        Self::new(Field::InvoiceNo, &INVOICE_NO)
    }

    /// `HM Order No: 4567`
    pub fn order_no() -> Self {
        Self::new(Field::OrderNo, &ORDER_NO)
    }

    /// `Invoice Date: 01-02-2023`
    pub fn invoice_date() -> Self {
        Self::new(Field::InvoiceDate, &INVOICE_DATE)
    }

    /// `Supplier Name: ACME CORP`, surrounding whitespace trimmed.
    ///
    /// A last word glued to digits (`ACME CORP INW001`) is a code, not part
    /// of the name, and is dropped unless it is the only word.
    pub fn supplier_name() -> Self {
        Self::new(Field::SupplierName, &SUPPLIER_NAME)
            .with_trim(true)
            .with_glued_code_dropped(true)
    }

    fn new(field: Field, pattern: &'static Regex) -> Self {
        Self {
            field,
            pattern,
            trim: false,
            drop_glued_code: false,
        }
    }

    /// Trim whitespace around the captured value.
    pub fn with_trim(mut self, trim: bool) -> Self {
        self.trim = trim;
        self
    }

    /// Drop a trailing word that runs straight into a digit.
    pub fn with_glued_code_dropped(mut self, drop: bool) -> Self {
        self.drop_glued_code = drop;
        self
    }

    /// The column this extractor fills.
    pub fn field(&self) -> Field {
        self.field
    }

    fn to_match(&self, text: &str, caps: regex::Captures<'_>) -> Option<ExtractionMatch<String>> {
        let full = caps.get(0)?;
        let group = caps.get(1)?;
        let mut value = group.as_str();
        let mut end = full.end();

        let glued = text[group.end()..].starts_with(|c: char| c.is_ascii_digit());
        if self.drop_glued_code && glued {
            if let Some((head, _)) = value.rsplit_once(|c: char| c.is_ascii_whitespace()) {
                value = head;
                end = group.start() + head.len();
            }
        }

        let value = if self.trim { value.trim() } else { value };
        Some(ExtractionMatch::new(
            value.to_string(),
            &text[full.start()..end],
            full.start(),
            end,
        ))
    }
}

impl FieldExtractor for LabeledFieldExtractor {
    type Output = ExtractionMatch<String>;

    fn extract(&self, text: &str) -> Option<Self::Output> {
        self.pattern
            .captures(text)
            .and_then(|caps| self.to_match(text, caps))
    }

    fn extract_all(&self, text: &str) -> Vec<Self::Output> {
        self.pattern
            .captures_iter(text)
            .filter_map(|caps| self.to_match(text, caps))
            .collect()
    }
}
