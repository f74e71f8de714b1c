//! Batch report types
//!
//! An [`ExplainedRecord`] pairs a transaction with its findings and the
//! generated explanation. A [`Report`] is the ordered collection of those plus
//! the summary counters for one batch run.
//!
//! Reports are assembled through [`ReportBuilder`], which updates the counters
//! as each record is pushed and is consumed by [`ReportBuilder::finish`], so a
//! finished report cannot be mutated incrementally.

use super::finding::{Finding, Severity};
use super::record::TransactionRecord;
use rust_decimal::{Decimal, RoundingStrategy};
use serde::Serialize;
use std::collections::BTreeMap;

/// Name of the rule whose findings feed `overdraft_count`
pub const OVERDRAFT_RULE: &str = "overdraft";

/// A transaction together with everything the pipeline concluded about it
#[derive(Debug, Clone, PartialEq)]
pub struct ExplainedRecord {
    pub record: TransactionRecord,

    /// Findings in rule registration order
    pub findings: Vec<Finding>,

    /// Human-readable explanation text
    pub explanation: String,
}

impl ExplainedRecord {
    /// Semicolon-joined list of triggered rule names
    pub fn flags(&self) -> String {
        self.findings
            .iter()
            .map(|finding| finding.rule_name.as_str())
            .collect::<Vec<_>>()
            .join(";")
    }

    /// Whether the named rule fired for this record
    pub fn has_finding(&self, rule_name: &str) -> bool {
        self.findings
            .iter()
            .any(|finding| finding.rule_name == rule_name)
    }

    /// Highest severity among the findings, if any fired
    pub fn max_severity(&self) -> Option<Severity> {
        self.findings.iter().map(|finding| finding.severity).max()
    }
}

/// Aggregate counters for one batch
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Summary {
    /// Number of records processed
    pub total_rows: usize,

    /// Number of records carrying an overdraft finding
    pub overdraft_count: usize,

    /// Trigger count per registered rule, zero when a rule never fired
    pub rule_trigger_counts: BTreeMap<String, usize>,
}

impl Summary {
    /// Share of rows flagged as overdrafts, in percent, rounded to one place
    ///
    /// Returns zero for an empty batch.
    pub fn overdraft_rate_percent(&self) -> Decimal {
        if self.total_rows == 0 {
            return Decimal::ZERO;
        }

        (Decimal::from(self.overdraft_count) * Decimal::ONE_HUNDRED
            / Decimal::from(self.total_rows))
        .round_dp_with_strategy(1, RoundingStrategy::MidpointAwayFromZero)
    }

    /// Trigger count for a rule, zero if the rule is unknown
    pub fn trigger_count(&self, rule_name: &str) -> usize {
        self.rule_trigger_counts
            .get(rule_name)
            .copied()
            .unwrap_or(0)
    }
}

/// Result of one batch run
#[derive(Debug, Clone, PartialEq)]
pub struct Report {
    /// Explained records in input order
    pub records: Vec<ExplainedRecord>,

    pub summary: Summary,
}

/// Incremental builder for a [`Report`]
#[derive(Debug)]
pub struct ReportBuilder {
    records: Vec<ExplainedRecord>,
    summary: Summary,
}

impl ReportBuilder {
    /// Create a builder that reports a counter for each of `rule_names`
    pub fn new<I, S>(rule_names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let rule_trigger_counts = rule_names
            .into_iter()
            .map(|name| (name.into(), 0))
            .collect();

        ReportBuilder {
            records: Vec::new(),
            summary: Summary {
                total_rows: 0,
                overdraft_count: 0,
                rule_trigger_counts,
            },
        }
    }

    /// Append a record and update the counters
    pub fn push(&mut self, explained: ExplainedRecord) {
        self.summary.total_rows += 1;

        if explained.has_finding(OVERDRAFT_RULE) {
            self.summary.overdraft_count += 1;
        }

        for finding in &explained.findings {
            *self
                .summary
                .rule_trigger_counts
                .entry(finding.rule_name.clone())
                .or_insert(0) += 1;
        }

        self.records.push(explained);
    }

    pub fn finish(self) -> Report {
        Report {
            records: self.records,
            summary: self.summary,
        }
    }
}
