//! Advisory data-quality checks
//!
//! Quality findings never abort a batch. They describe oddities in otherwise
//! valid input (duplicate ids, zero amounts, dates going backwards) so the
//! caller can log or display them.

use crate::types::{RecordId, TransactionRecord};
use rust_decimal::Decimal;
use std::collections::BTreeSet;

#[derive(Debug, Clone, PartialEq, Default)]
pub struct QualityReport {
    pub total_rows: usize,
    pub warnings: Vec<String>,
    /// (min, max) of the amount column
    pub amount_range: Option<(Decimal, Decimal)>,
    /// (min, max) of the balance column
    pub balance_range: Option<(Decimal, Decimal)>,
}

impl QualityReport {
    pub fn passed(&self) -> bool {
        self.warnings.is_empty()
    }
}

pub fn assess_quality<'a, I>(records: I) -> QualityReport
where
    I: IntoIterator<Item = &'a TransactionRecord>,
{
    let mut report = QualityReport::default();
    let mut seen = BTreeSet::new();
    let mut duplicates: BTreeSet<RecordId> = BTreeSet::new();
    let mut zero_amounts = 0usize;
    let mut backwards = 0usize;
    let mut previous = None;

    for record in records {
        report.total_rows += 1;

        if !seen.insert(record.id) {
            duplicates.insert(record.id);
        }

        if record.amount.is_zero() {
            zero_amounts += 1;
        }

        if previous.is_some_and(|date| record.timestamp < date) {
            backwards += 1;
        }
        previous = Some(record.timestamp);

        report.amount_range = Some(widen(report.amount_range, record.amount));
        report.balance_range = Some(widen(report.balance_range, record.balance));
    }

    if !duplicates.is_empty() {
        let ids: Vec<String> = duplicates.iter().map(ToString::to_string).collect();
        report
            .warnings
            .push(format!("{} duplicate ids found: {}", ids.len(), ids.join(", ")));
    }

    if zero_amounts > 0 {
        report
            .warnings
            .push(format!("{} transactions with zero amount", zero_amounts));
    }

    if backwards > 0 {
        report.warnings.push(format!(
            "{} transactions dated earlier than the row before them",
            backwards
        ));
    }

    report
}

fn widen(range: Option<(Decimal, Decimal)>, value: Decimal) -> (Decimal, Decimal) {
    match range {
        Some((min, max)) => (min.min(value), max.max(value)),
        None => (value, value),
    }
}
