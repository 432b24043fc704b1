//! Document-level parsing: segmentation, extraction, repair and filtering.

use std::time::Instant;

use tracing::{debug, info};

use super::extractor::InvoiceFieldExtractor;
use super::repair::DescriptionRepair;
use super::segmenter::{InvoiceSegment, InvoiceSegmenter};
use super::{InvoiceExtractor, InvoiceParser};
use crate::error::ExtractionError;
use crate::models::config::ExtractionConfig;
use crate::models::record::{InvoiceRecord, ResultTable};

/// Result of parsing one document.
#[derive(Debug, Clone)]
pub struct ExtractionResult {
    /// Retained invoice rows.
    pub table: ResultTable,
    /// Number of segments found by the boundary scan.
    pub segments: usize,
    /// Segments dropped for lacking an invoice number.
    pub dropped_segments: usize,
    /// Non-fatal observations about the extracted rows.
    pub warnings: Vec<String>,
    /// Processing time in milliseconds.
    pub processing_time_ms: u64,
}

/// Builds result tables from multi-invoice OCR text.
#[derive(Debug, Clone, Default)]
pub struct InvoiceTableBuilder {
    segmenter: InvoiceSegmenter,
    extractor: InvoiceFieldExtractor,
    repair: DescriptionRepair,
}

impl InvoiceTableBuilder {
    /// Create a builder with default rules.
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_config(config: &ExtractionConfig) -> Result<Self, ExtractionError> {
        Ok(Self {
            segmenter: InvoiceSegmenter::from_config(config)?,
            extractor: InvoiceFieldExtractor::from_config(config)?,
            repair: DescriptionRepair::new().with_max_fragment_len(config.max_fragment_len),
        })
    }

    pub fn with_segmenter(mut self, segmenter: InvoiceSegmenter) -> Self {
        self.segmenter = segmenter;
        self
    }

    pub fn with_extractor(mut self, extractor: InvoiceFieldExtractor) -> Self {
        self.extractor = extractor;
        self
    }

    pub fn with_repair(mut self, repair: DescriptionRepair) -> Self {
        self.repair = repair;
        self
    }

    pub fn segmenter(&self) -> &InvoiceSegmenter {
        &self.segmenter
    }

    /// Extract and repair one segment.
    pub fn record(&self, segment: &InvoiceSegment<'_>) -> InvoiceRecord {
        self.extractor.extract(segment).into_record(&self.repair)
    }

    /// Turn segments into a table, keeping only records with an invoice number.
    pub fn build_table(&self, segments: &[InvoiceSegment<'_>]) -> ResultTable {
        let rows = segments
            .iter()
            .map(|segment| (segment, self.record(segment)))
            .filter_map(|(segment, record)| {
                if record.has_invoice_no() {
                    Some(record)
                } else {
                    debug!(
                        "Dropping segment {} at byte {}: no invoice number",
                        segment.index, segment.offset
                    );
                    None
                }
            })
            .collect();

        ResultTable::from_rows(rows)
    }
}

impl InvoiceParser for InvoiceTableBuilder {
    fn parse(&self, text: &str) -> ExtractionResult {
        let start = Instant::now();

        info!("Parsing invoices from {} characters of text", text.len());

        let segments = self.segmenter.segment(text);
        let table = self.build_table(&segments);
        let dropped_segments = segments.len() - table.len();

        let mut warnings = Vec::new();
        if segments.is_empty() {
            warnings.push("No invoice boundary found".to_string());
        }
        if dropped_segments > 0 {
            warnings.push(format!(
                "{dropped_segments} of {} segments had no invoice number",
                segments.len()
            ));
        }
        for record in &table {
            let no = record.invoice_no.as_deref().unwrap_or_default();
            warnings.extend(
                record
                    .validate()
                    .into_iter()
                    .map(|issue| format!("{no}: {issue}")),
            );
        }

        debug!(
            "Extracted {} invoices from {} segments",
            table.len(),
            segments.len()
        );

        ExtractionResult {
            table,
            segments: segments.len(),
            dropped_segments,
            warnings,
            processing_time_ms: start.elapsed().as_millis() as u64,
        }
    }
}

/// Build a table from segments with default rules.
pub fn build_table(segments: &[InvoiceSegment<'_>]) -> ResultTable {
    InvoiceTableBuilder::new().build_table(segments)
}
