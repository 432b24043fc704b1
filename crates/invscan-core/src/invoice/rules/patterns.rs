//! Common regex patterns for labeled invoice fields.

use lazy_static::lazy_static;
use regex::Regex;

lazy_static! {
    // Labeled identifiers
    pub static ref INVOICE_NO: Regex = Regex::new(
        r"Invoice No:\s*([A-Z0-9-]+)"
    ).unwrap();

    pub static ref ORDER_NO: Regex = Regex::new(
        r"HM Order No:\s*(\d+)"
    ).unwrap();

    // Date is kept verbatim, validation happens on the record
    pub static ref INVOICE_DATE: Regex = Regex::new(
        r"Invoice Date:\s*([\d-]+)"
    ).unwrap();

    // Leading uppercase run on one line, so "ACME CORP\nINW001" stops at CORP
    pub static ref SUPPLIER_NAME: Regex = Regex::new(
        r"Supplier Name:\s*([A-Z]+(?:[ \t]+[A-Z]+)*)"
    ).unwrap();

    // Default warehouse code family
    pub static ref WAREHOUSE_ID: Regex = Regex::new(
        r"\bINW\d{3}\b"
    ).unwrap();

    // Description token filters
    pub static ref NUMERIC_TOKEN: Regex = Regex::new(
        r"^\d+(?:\.\d+)?$"
    ).unwrap();
}
