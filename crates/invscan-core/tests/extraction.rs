use pretty_assertions::assert_eq;

use invscan_core::{
    build_table, extract, join_pages, repair, segment, validate_document, BoundaryMode,
    DocumentError, ExtractionConfig, InvoiceParser, InvoiceRecord, InvoiceTableBuilder,
    InvscanConfig,
};

/// Two OCR pages: a cover page and a page holding two invoices.
fn ocr_pages() -> Vec<&'static str> {
    vec![
        "Shipment documents\nPage 1 of 2",
        "INVOICE\n\
         Invoice No: ABC-123\n\
         HM Order No: 4567\n\
         Invoice Date: 01-02-2023\n\
         Supplier Name: ACME CORP\n\
         INW001 WID GET Cartons 10 pieces usd=5\n\
         Container No: X\n\
         INVOICE\n\
         Invoice No: DEF-456\n\
         Invoice Date: 2023-03-04\n\
         INW017 LADIE S T SHIRT 24 Cartons 120 pieces 3.50 USD total=420\n\
         DENIM JACKE TS\n\
         Container No: MSCU1234567",
    ]
}

#[test]
fn test_end_to_end_multi_page_document() {
    let text = join_pages(ocr_pages());
    validate_document(&text, &ExtractionConfig::default().required_keywords).unwrap();

    let result = InvoiceTableBuilder::new().parse(&text);
    assert_eq!(result.segments, 2);
    assert_eq!(result.dropped_segments, 0);

    assert_eq!(
        result.table.rows(),
        &[
            InvoiceRecord {
                invoice_no: Some("ABC-123".to_string()),
                order_no: Some("4567".to_string()),
                invoice_date: Some("01-02-2023".to_string()),
                supplier_name: Some("ACME CORP".to_string()),
                warehouse_id: Some("INW001".to_string()),
                description_of_goods: Some("WID GET".to_string()),
            },
            InvoiceRecord {
                invoice_no: Some("DEF-456".to_string()),
                order_no: None,
                invoice_date: Some("2023-03-04".to_string()),
                supplier_name: None,
                warehouse_id: Some("INW017".to_string()),
                description_of_goods: Some("LADIES SHIRT DENIM JACKETS".to_string()),
            },
        ]
    );
}

#[test]
fn test_second_segment_without_number_is_dropped() {
    let text = "...preamble...INVOICE Invoice No: ABC-123 HM Order No: 4567 \
                Invoice Date: 01-02-2023 Supplier Name: ACME CORP\n\
                INW001 WID GET Cartons 10 pieces usd=5\n\
                Container No: X INVOICE Invoice No: ...";

    let segments = segment(text);
    assert_eq!(segments.len(), 2);

    let table = build_table(&segments);
    assert_eq!(table.len(), 1);

    let record = &table.rows()[0];
    assert_eq!(record.invoice_no.as_deref(), Some("ABC-123"));
    assert_eq!(record.order_no.as_deref(), Some("4567"));
    assert_eq!(record.invoice_date.as_deref(), Some("01-02-2023"));
    assert_eq!(record.supplier_name.as_deref(), Some("ACME CORP"));
    assert_eq!(record.warehouse_id.as_deref(), Some("INW001"));
    assert_eq!(record.description_of_goods.as_deref(), Some("WID GET"));
}

#[test]
fn test_raw_tokens_before_repair() {
    let text = join_pages(ocr_pages());
    let segments = segment(&text);

    let fields = extract(&segments[1]);
    assert_eq!(
        fields.description_tokens,
        Some(
            ["LADIE", "S", "T", "SHIRT", "DENIM", "JACKE", "TS"]
                .map(String::from)
                .to_vec()
        )
    );
}

#[test]
fn test_repair_scan_order() {
    assert_eq!(repair(&["WIDE", "LE", "GA", "DGET"]), "WIDELE DGET");
}

#[test]
fn test_no_boundary_token() {
    let text = "Invoice No: ABC-123\nSupplier Name: ACME";
    assert!(segment(text).is_empty());
    assert!(build_table(&segment(text)).is_empty());
}

#[test]
fn test_warehouse_absent_means_description_absent() {
    let table = build_table(&segment("INVOICE Invoice No: Q-1 LOOSE WORDS HERE"));
    assert_eq!(table.rows()[0].warehouse_id, None);
    assert_eq!(table.rows()[0].description_of_goods, None);
}

#[test]
fn test_rejects_unrelated_document() {
    let keywords = ExtractionConfig::default().required_keywords;
    assert!(matches!(
        validate_document("grocery list: milk, eggs", &keywords),
        Err(DocumentError::MissingKeywords { .. })
    ));
    assert_eq!(validate_document("", &keywords), Err(DocumentError::EmptyText));
}

#[test]
fn test_config_driven_builder() {
    let mut config = InvscanConfig::default();
    config.extraction.boundary_mode = BoundaryMode::Fuzzy;
    config.extraction.warehouse_prefixes = vec!["INW".to_string(), "EXW".to_string()];

    let builder = InvoiceTableBuilder::from_config(&config.extraction).unwrap();
    let result = builder.parse("1NV0ICE\nInvoice No: K-7\nEXW321 TOWE LS\nContainer No: Z\n");

    assert_eq!(result.table.len(), 1);
    let record = &result.table.rows()[0];
    assert_eq!(record.warehouse_id.as_deref(), Some("EXW321"));
    assert_eq!(record.description_of_goods.as_deref(), Some("TOWELS"));
}
