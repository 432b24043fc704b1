//! Per-segment field extraction.

use tracing::trace;

use super::repair::DescriptionRepair;
use super::rules::{
    DescriptionRules, FieldExtractor, LabeledFieldExtractor, WarehouseIdExtractor,
};
use super::segmenter::InvoiceSegment;
use super::InvoiceExtractor;
use crate::error::ExtractionError;
use crate::models::config::ExtractionConfig;
use crate::models::record::InvoiceRecord;

/// Fields recovered from one segment, before description repair.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ExtractedFields {
    pub invoice_no: Option<String>,
    pub order_no: Option<String>,
    pub invoice_date: Option<String>,
    pub supplier_name: Option<String>,
    pub warehouse_id: Option<String>,
    /// Filtered description tokens; `None` when no warehouse code was found.
    pub description_tokens: Option<Vec<String>>,
}

impl ExtractedFields {
    /// Finish the record by repairing the description tokens.
    pub fn into_record(self, repair: &DescriptionRepair) -> InvoiceRecord {
        InvoiceRecord {
            description_of_goods: self
                .description_tokens
                .map(|tokens| repair.repair(tokens.as_slice())),
            invoice_no: self.invoice_no,
            order_no: self.order_no,
            invoice_date: self.invoice_date,
            supplier_name: self.supplier_name,
            warehouse_id: self.warehouse_id,
        }
    }
}

/// Rule-based extractor for the six invoice columns.
#[derive(Debug, Clone)]
pub struct InvoiceFieldExtractor {
    invoice_no: LabeledFieldExtractor,
    order_no: LabeledFieldExtractor,
    invoice_date: LabeledFieldExtractor,
    supplier_name: LabeledFieldExtractor,
    warehouse_id: WarehouseIdExtractor,
    description: DescriptionRules,
}

impl InvoiceFieldExtractor {
    /// Create an extractor with default rules.
    pub fn new() -> Self {
        Self::with_rules(WarehouseIdExtractor::default(), DescriptionRules::default())
    }

    pub fn with_rules(warehouse_id: WarehouseIdExtractor, description: DescriptionRules) -> Self {
        Self {
            invoice_no: LabeledFieldExtractor::invoice_no(),
            order_no: LabeledFieldExtractor::order_no(),
            invoice_date: LabeledFieldExtractor::invoice_date(),
            supplier_name: LabeledFieldExtractor::supplier_name(),
            warehouse_id,
            description,
        }
    }

    pub fn from_config(config: &ExtractionConfig) -> Result<Self, ExtractionError> {
        config.validate()?;
        Ok(Self::with_rules(
            WarehouseIdExtractor::new(&config.warehouse_prefixes)?,
            DescriptionRules::from_config(config),
        ))
    }

    /// Recover all fields from raw invoice text.
    pub fn extract_text(&self, text: &str) -> ExtractedFields {
        let value = |extractor: &LabeledFieldExtractor| extractor.extract(text).map(|m| m.value);

        let warehouse = self.warehouse_id.extract(text);
        let description_tokens = warehouse.as_ref().map(|m| {
            self.description
                .block(text, m.start(), &m.value)
                .tokens
        });

        let fields = ExtractedFields {
            invoice_no: value(&self.invoice_no),
            order_no: value(&self.order_no),
            invoice_date: value(&self.invoice_date),
            supplier_name: value(&self.supplier_name),
            warehouse_id: warehouse.map(|m| m.value),
            description_tokens,
        };

        trace!("Extracted fields: {:?}", fields);
        fields
    }
}

impl Default for InvoiceFieldExtractor {
    fn default() -> Self {
        Self::new()
    }
}

impl InvoiceExtractor for InvoiceFieldExtractor {
    fn extract(&self, segment: &InvoiceSegment<'_>) -> ExtractedFields {
        self.extract_text(segment.text)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    const SEGMENT: &str = "INVOICE\nInvoice No: ABC-123\nHM Order No: 4567\nInvoice Date: 01-02-2023\nSupplier Name: ACME CORP\nINW001 WID GET Cartons 10 pieces usd=5\nContainer No: X\n";

    #[test]
    fn test_extract_all_fields() {
        let fields = InvoiceFieldExtractor::new().extract_text(SEGMENT);

        assert_eq!(
            fields,
            ExtractedFields {
                invoice_no: Some("ABC-123".to_string()),
                order_no: Some("4567".to_string()),
                invoice_date: Some("01-02-2023".to_string()),
                supplier_name: Some("ACME CORP".to_string()),
                warehouse_id: Some("INW001".to_string()),
                description_tokens: Some(vec!["WID".to_string(), "GET".to_string()]),
            }
        );
    }

    #[test]
    fn test_into_record_repairs_description() {
        let record = InvoiceFieldExtractor::new()
            .extract_text(SEGMENT)
            .into_record(&DescriptionRepair::new());
        assert_eq!(record.description_of_goods.as_deref(), Some("WID GET"));
    }

    #[test]
    fn test_missing_fields_are_none() {
        let fields = InvoiceFieldExtractor::new().extract_text("INVOICE\nInvoice No: Z-1\n");

        assert_eq!(fields.invoice_no.as_deref(), Some("Z-1"));
        assert_eq!(fields.supplier_name, None);
        assert_eq!(fields.warehouse_id, None);
        assert_eq!(fields.description_tokens, None);
    }

    #[test]
    fn test_empty_description_is_found_but_empty() {
        let record = InvoiceFieldExtractor::new()
            .extract_text("Invoice No: A\nINW002 12 usd\nContainer No: 1")
            .into_record(&DescriptionRepair::new());
        assert_eq!(record.description_of_goods.as_deref(), Some(""));
    }

    #[test]
    fn test_description_starts_at_whole_word_warehouse_id() {
        let text = "Invoice No: A-1\nRef XINW001 OLD\nINW001 NEW GOODS\nContainer No: 1";
        let fields = InvoiceFieldExtractor::new().extract_text(text);

        assert_eq!(fields.warehouse_id.as_deref(), Some("INW001"));
        assert_eq!(
            fields.description_tokens,
            Some(vec!["NEW".to_string(), "GOODS".to_string()])
        );
    }

    #[test]
    fn test_supplier_name_with_noisy_ocr() {
        let extractor = InvoiceFieldExtractor::new();

        let fields = extractor.extract_text("Invoice No: A-1\nSupplier Name: ACME2 LTD\nINW001 X");
        assert_eq!(fields.supplier_name.as_deref(), Some("ACME"));

        let fields = extractor.extract_text("Invoice No: A-1 Supplier Name: ACME CORP INW001 SHIRTS");
        assert_eq!(fields.supplier_name.as_deref(), Some("ACME CORP"));
        assert_eq!(fields.warehouse_id.as_deref(), Some("INW001"));
    }

    #[test]
    fn test_extraction_is_idempotent() {
        let extractor = InvoiceFieldExtractor::new();
        assert_eq!(extractor.extract_text(SEGMENT), extractor.extract_text(SEGMENT));
    }

    #[test]
    fn test_from_config_prefixes() {
        let mut config = ExtractionConfig::default();
        config.warehouse_prefixes = vec!["EXW".to_string()];
        let extractor = InvoiceFieldExtractor::from_config(&config).unwrap();

        let fields = extractor.extract_text("Invoice No: A\nINW001 X\nEXW777 COTTON");
        assert_eq!(fields.warehouse_id.as_deref(), Some("EXW777"));
        assert_eq!(fields.description_tokens, Some(vec!["COTTON".to_string()]));
    }
}
