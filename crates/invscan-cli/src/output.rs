//! Rendering of result tables.

use invscan_core::models::config::OutputConfig;
use invscan_core::models::record::{Field, ResultTable};

#[derive(Clone, Copy, Debug, PartialEq, Eq, clap::ValueEnum)]
pub enum OutputFormat {
    /// Delimited table with a header row
    Csv,
    /// JSON array of records, missing fields as null
    Json,
    /// Plain text listing
    Text,
}

impl OutputFormat {
    pub fn extension(self) -> &'static str {
        match self {
            OutputFormat::Csv => "csv",
            OutputFormat::Json => "json",
            OutputFormat::Text => "txt",
        }
    }
}

pub fn format_table(
    table: &ResultTable,
    format: OutputFormat,
    config: &OutputConfig,
) -> anyhow::Result<String> {
    match format {
        OutputFormat::Csv => format_csv(table, config),
        OutputFormat::Json => Ok(serde_json::to_string_pretty(table)?),
        OutputFormat::Text => Ok(format_text(table, config)),
    }
}

fn format_csv(table: &ResultTable, config: &OutputConfig) -> anyhow::Result<String> {
    if !config.delimiter.is_ascii() {
        anyhow::bail!("CSV delimiter must be an ASCII character, got {:?}", config.delimiter);
    }

    let mut wtr = csv::WriterBuilder::new()
        .delimiter(config.delimiter as u8)
        .from_writer(vec![]);

    if config.include_header {
        wtr.write_record(ResultTable::columns())?;
    }

    for record in table {
        wtr.write_record(
            record
                .values()
                .map(|value| value.unwrap_or(config.missing_value.as_str())),
        )?;
    }

    let data = String::from_utf8(wtr.into_inner()?)?;
    Ok(data)
}

fn format_text(table: &ResultTable, config: &OutputConfig) -> String {
    let missing = if config.missing_value.is_empty() {
        "-"
    } else {
        config.missing_value.as_str()
    };

    let mut output = String::new();
    for (i, record) in table.iter().enumerate() {
        if i > 0 {
            output.push('\n');
        }
        for field in Field::ALL {
            output.push_str(&format!(
                "{}: {}\n",
                field.column_name(),
                record.get(field).unwrap_or(missing)
            ));
        }
    }
    output
}
