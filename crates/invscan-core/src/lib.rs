//! Core library for multi-invoice OCR text processing.
//!
//! This crate provides:
//! - Segmentation of concatenated OCR text into per-invoice segments
//! - Rule-based field extraction (invoice no, order no, date, supplier, warehouse)
//! - Repair of OCR-fragmented goods descriptions
//! - The tabular result model handed to serializers

pub mod error;
pub mod invoice;
pub mod models;

pub use error::{DocumentError, ExtractionError, InvscanError, Result};
pub use invoice::{
    build_table, extract, join_pages, repair, segment, validate_document, DescriptionRepair,
    ExtractedFields, ExtractionResult, InvoiceExtractor, InvoiceFieldExtractor, InvoiceParser,
    InvoiceSegment, InvoiceSegmenter, InvoiceTableBuilder,
};
pub use models::config::{BoundaryMode, ExtractionConfig, InvscanConfig, OutputConfig};
pub use models::record::{Field, InvoiceRecord, ResultTable};
