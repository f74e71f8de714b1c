//! CSV format handling for transaction records and report output
//!
//! This module centralizes all CSV format concerns, providing:
//! - Header resolution ([`ColumnMap`]) with case-insensitive column names
//! - Conversion from raw rows to validated [`TransactionRecord`]s
//! - Augmented report serialization and the JSON summary
//!
//! All functions are pure (no file access) for easy testing.

use crate::core::summary::SummaryDocument;
use crate::types::{GuardianError, Report, TransactionRecord};
use chrono::{DateTime, NaiveDate, NaiveDateTime};
use rust_decimal::Decimal;
use std::io::Write;
use std::str::FromStr;

/// Header written before the augmented rows
pub const OUTPUT_HEADER: [&str; 8] = [
    "id",
    "timestamp",
    "description",
    "amount",
    "balance",
    "segment",
    "flags",
    "explain_text",
];

const DATE_FORMAT: &str = "%Y-%m-%d";

/// Read access to the fields of one CSV row
///
/// Implemented for both the blocking and the async CSV record types so the
/// same conversion code serves both readers.
pub trait RowFields {
    fn field(&self, index: usize) -> Option<&str>;
}

impl RowFields for csv::StringRecord {
    fn field(&self, index: usize) -> Option<&str> {
        self.get(index)
    }
}

impl RowFields for csv_async::StringRecord {
    fn field(&self, index: usize) -> Option<&str> {
        self.get(index)
    }
}

/// Positions of the known columns within a row
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ColumnMap {
    pub id: usize,
    pub timestamp: usize,
    pub description: usize,
    pub amount: usize,
    pub balance: usize,
    pub segment: Option<usize>,
}

impl ColumnMap {
    /// Resolve column positions from a header row
    ///
    /// Names are trimmed and compared case-insensitively. `index` is accepted
    /// for `id` and `date` for `timestamp`.
    ///
    /// # Errors
    ///
    /// Returns `MissingColumn` naming the first required column not present.
    pub fn from_headers<'a, I>(headers: I) -> Result<Self, GuardianError>
    where
        I: IntoIterator<Item = &'a str>,
    {
        let names: Vec<String> = headers
            .into_iter()
            .map(|name| name.trim().to_lowercase())
            .collect();

        let position = |aliases: &[&str]| {
            names
                .iter()
                .position(|name| aliases.contains(&name.as_str()))
        };
        let required = |column: &str, aliases: &[&str]| {
            position(aliases).ok_or_else(|| GuardianError::missing_column(column))
        };

        Ok(ColumnMap {
            id: required("id", &["id", "index"])?,
            timestamp: required("timestamp", &["timestamp", "date"])?,
            description: required("description", &["description"])?,
            amount: required("amount", &["amount"])?,
            balance: required("balance", &["balance"])?,
            segment: position(&["segment"]),
        })
    }
}

/// Convert one data row into a validated [`TransactionRecord`]
///
/// `row` is the zero-based data-row index used in error reports.
pub fn convert_row<F: RowFields>(
    row: usize,
    fields: &F,
    columns: &ColumnMap,
) -> Result<TransactionRecord, GuardianError> {
    let id_raw = required_field(row, fields, columns.id, "id")?;
    let id = id_raw
        .parse::<u64>()
        .map_err(|_| GuardianError::validation(row, "id", id_raw, "not a non-negative integer"))?;

    let timestamp_raw = required_field(row, fields, columns.timestamp, "timestamp")?;
    let timestamp = parse_timestamp(timestamp_raw).ok_or_else(|| {
        GuardianError::validation(row, "timestamp", timestamp_raw, "not a recognised date")
    })?;

    let description = fields
        .field(columns.description)
        .unwrap_or_default()
        .to_string();

    let amount = parse_decimal(row, fields, columns.amount, "amount")?;
    let balance = parse_decimal(row, fields, columns.balance, "balance")?;

    let segment = columns
        .segment
        .and_then(|index| fields.field(index))
        .filter(|value| !value.is_empty())
        .map(str::to_string);

    Ok(TransactionRecord {
        id,
        timestamp,
        description,
        amount,
        balance,
        segment,
    })
}

fn required_field<'r, F: RowFields>(
    row: usize,
    fields: &'r F,
    index: usize,
    column: &str,
) -> Result<&'r str, GuardianError> {
    match fields.field(index) {
        Some(value) if !value.is_empty() => Ok(value),
        _ => Err(GuardianError::validation(row, column, "", "missing value")),
    }
}

fn parse_decimal<F: RowFields>(
    row: usize,
    fields: &F,
    index: usize,
    column: &str,
) -> Result<Decimal, GuardianError> {
    let raw = required_field(row, fields, index, column)?;
    Decimal::from_str(raw)
        .map_err(|_| GuardianError::validation(row, column, raw, "not a decimal number"))
}

/// Parse the supported timestamp layouts, keeping only the date
///
/// Accepted: `YYYY-MM-DD`, `MM/DD/YYYY`, `YYYY-MM-DD HH:MM:SS`,
/// `YYYY-MM-DDTHH:MM:SS` and RFC 3339.
pub fn parse_timestamp(raw: &str) -> Option<NaiveDate> {
    NaiveDate::parse_from_str(raw, DATE_FORMAT)
        .or_else(|_| NaiveDate::parse_from_str(raw, "%m/%d/%Y"))
        .ok()
        .or_else(|| {
            NaiveDateTime::parse_from_str(raw, "%Y-%m-%d %H:%M:%S")
                .or_else(|_| NaiveDateTime::parse_from_str(raw, "%Y-%m-%dT%H:%M:%S"))
                .ok()
                .map(|datetime| datetime.date())
        })
        .or_else(|| {
            DateTime::parse_from_rfc3339(raw)
                .ok()
                .map(|datetime| datetime.date_naive())
        })
}

/// Write the augmented table
///
/// One row per explained record, in report order, mirroring the input
/// columns plus `flags` and `explain_text`.
pub fn write_report_csv(report: &Report, output: &mut dyn Write) -> Result<(), GuardianError> {
    let mut writer = csv::Writer::from_writer(output);

    writer
        .write_record(OUTPUT_HEADER)
        .map_err(|e| GuardianError::output(format!("Failed to write CSV header: {}", e)))?;

    for explained in &report.records {
        let record = &explained.record;
        writer
            .write_record([
                record.id.to_string(),
                record.timestamp.format(DATE_FORMAT).to_string(),
                record.description.clone(),
                record.amount.to_string(),
                record.balance.to_string(),
                record.segment.clone().unwrap_or_default(),
                explained.flags(),
                explained.explanation.clone(),
            ])
            .map_err(|e| GuardianError::output(format!("Failed to write report row: {}", e)))?;
    }

    writer
        .flush()
        .map_err(|e| GuardianError::output(format!("Failed to flush output: {}", e)))?;

    Ok(())
}

/// Write the summary document as pretty-printed JSON
pub fn write_summary_json(
    document: &SummaryDocument,
    output: &mut dyn Write,
) -> Result<(), GuardianError> {
    serde_json::to_writer_pretty(&mut *output, document)
        .map_err(|e| GuardianError::output(format!("Failed to write summary: {}", e)))?;
    writeln!(output)?;
    Ok(())
}
