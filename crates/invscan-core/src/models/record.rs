//! Invoice records and the tabular result handed to serializers.

use std::fmt;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// A column of the result table, in output order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Field {
    InvoiceNo,
    OrderNo,
    InvoiceDate,
    SupplierName,
    WarehouseId,
    DescriptionOfGoods,
}

impl Field {
    /// All fields in fixed column order.
    pub const ALL: [Field; 6] = [
        Field::InvoiceNo,
        Field::OrderNo,
        Field::InvoiceDate,
        Field::SupplierName,
        Field::WarehouseId,
        Field::DescriptionOfGoods,
    ];

    /// Column header used by tabular output.
    pub fn column_name(self) -> &'static str {
        match self {
            Field::InvoiceNo => "Invoice No",
            Field::OrderNo => "HM Order No",
            Field::InvoiceDate => "Invoice Date",
            Field::SupplierName => "Supplier Name",
            Field::WarehouseId => "Warehouse ID",
            Field::DescriptionOfGoods => "Description of Goods",
        }
    }
}

impl fmt::Display for Field {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.column_name())
    }
}

/// Structured fields recovered from one invoice segment.
///
/// `None` marks a field that was not found; `Some("")` is a field that was
/// found but carried no text.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct InvoiceRecord {
    #[serde(rename = "Invoice No")]
    pub invoice_no: Option<String>,

    #[serde(rename = "HM Order No")]
    pub order_no: Option<String>,

    #[serde(rename = "Invoice Date")]
    pub invoice_date: Option<String>,

    #[serde(rename = "Supplier Name")]
    pub supplier_name: Option<String>,

    #[serde(rename = "Warehouse ID")]
    pub warehouse_id: Option<String>,

    #[serde(rename = "Description of Goods")]
    pub description_of_goods: Option<String>,
}

impl InvoiceRecord {
    /// Value of a single column.
    pub fn get(&self, field: Field) -> Option<&str> {
        match field {
            Field::InvoiceNo => self.invoice_no.as_deref(),
            Field::OrderNo => self.order_no.as_deref(),
            Field::InvoiceDate => self.invoice_date.as_deref(),
            Field::SupplierName => self.supplier_name.as_deref(),
            Field::WarehouseId => self.warehouse_id.as_deref(),
            Field::DescriptionOfGoods => self.description_of_goods.as_deref(),
        }
    }

    /// Column values in table order.
    pub fn values(&self) -> [Option<&str>; 6] {
        Field::ALL.map(|field| self.get(field))
    }

    /// Whether this record qualifies for the result table.
    pub fn has_invoice_no(&self) -> bool {
        self.invoice_no.as_deref().is_some_and(|no| !no.is_empty())
    }

    /// Columns that were not found in the source text.
    pub fn missing_fields(&self) -> Vec<Field> {
        Field::ALL
            .into_iter()
            .filter(|field| self.get(*field).is_none())
            .collect()
    }

    /// Parse the invoice date as a calendar date, if it has a known layout.
    pub fn parsed_date(&self) -> Option<NaiveDate> {
        let raw = self.invoice_date.as_deref()?;
        // %y only accepts two digits, so it must run before %Y
        ["%d-%m-%y", "%d-%m-%Y", "%Y-%m-%d"]
            .iter()
            .find_map(|format| NaiveDate::parse_from_str(raw, format).ok())
    }

    /// Check the record for suspicious values.
    pub fn validate(&self) -> Vec<String> {
        let mut issues = Vec::new();

        if !self.has_invoice_no() {
            issues.push("Missing invoice number".to_string());
        }

        if let Some(date) = &self.invoice_date {
            if self.parsed_date().is_none() {
                issues.push(format!("Invoice date {date:?} is not a calendar date"));
            }
        }

        if self.warehouse_id.is_some()
            && self.description_of_goods.as_deref().is_some_and(str::is_empty)
        {
            issues.push("Empty description of goods".to_string());
        }

        for field in self.missing_fields() {
            if field != Field::InvoiceNo {
                issues.push(format!("Missing {field}"));
            }
        }

        issues
    }
}

/// Ordered rows of invoice records, one per retained invoice.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ResultTable {
    rows: Vec<InvoiceRecord>,
}

impl ResultTable {
    /// Build a table from records that already passed the invoice-number filter.
    pub fn from_rows(rows: Vec<InvoiceRecord>) -> Self {
        Self { rows }
    }

    /// Column headers in output order.
    pub fn columns() -> [&'static str; 6] {
        Field::ALL.map(Field::column_name)
    }

    pub fn rows(&self) -> &[InvoiceRecord] {
        &self.rows
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, InvoiceRecord> {
        self.rows.iter()
    }

    pub fn into_rows(self) -> Vec<InvoiceRecord> {
        self.rows
    }
}

impl<'a> IntoIterator for &'a ResultTable {
    type Item = &'a InvoiceRecord;
    type IntoIter = std::slice::Iter<'a, InvoiceRecord>;

    fn into_iter(self) -> Self::IntoIter {
        self.rows.iter()
    }
}
