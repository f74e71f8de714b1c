//! Batch runner
//!
//! This module provides the BatchRunner that drives one batch through the
//! pipeline: every record is evaluated by the [`RuleEvaluator`], explained, and
//! appended to the report in input order.
//!
//! The runner is fail-fast: the first invalid record or rule error aborts the
//! batch and no report is produced.

use crate::core::evaluator::RuleEvaluator;
use crate::core::explain::explain;
use crate::types::{ExplainedRecord, GuardianError, Report, ReportBuilder, TransactionRecord};

/// Single-threaded batch runner
///
/// Holds no state between runs; each call to [`run`](BatchRunner::run)
/// builds a fresh report.
#[derive(Debug, Clone, Default)]
pub struct BatchRunner {
    evaluator: RuleEvaluator,
}

impl BatchRunner {
    pub fn new(evaluator: RuleEvaluator) -> Self {
        BatchRunner { evaluator }
    }

    pub fn evaluator(&self) -> &RuleEvaluator {
        &self.evaluator
    }

    /// Evaluate and explain a single record
    pub fn explain_record(
        &self,
        record: TransactionRecord,
    ) -> Result<ExplainedRecord, GuardianError> {
        explain_record(&self.evaluator, record)
    }

    /// Run the pipeline over an ordered sequence of records
    pub fn run<I>(&self, records: I) -> Result<Report, GuardianError>
    where
        I: IntoIterator<Item = TransactionRecord>,
    {
        self.run_fallible(records.into_iter().map(Ok))
    }

    /// Run the pipeline over records that may still fail validation
    ///
    /// Intended for streaming straight out of a reader: the first `Err`
    /// aborts the batch.
    pub fn run_fallible<I>(&self, records: I) -> Result<Report, GuardianError>
    where
        I: IntoIterator<Item = Result<TransactionRecord, GuardianError>>,
    {
        let mut builder = ReportBuilder::new(self.evaluator.rule_names());

        for record in records {
            builder.push(self.explain_record(record?)?);
        }

        Ok(builder.finish())
    }
}

/// Evaluate `record` with `evaluator` and attach the explanation
pub fn explain_record(
    evaluator: &RuleEvaluator,
    record: TransactionRecord,
) -> Result<ExplainedRecord, GuardianError> {
    let findings = evaluator.evaluate(&record)?;
    let explanation = explain(&record, &findings);

    Ok(ExplainedRecord {
        record,
        findings,
        explanation,
    })
}
