//! Parallel batch runner
//!
//! Records are independent of each other, so a batch can be split into
//! contiguous chunks and explained on worker threads. Every record carries
//! its input index through the workers and results are re-sorted by that
//! index, so the output order matches [`BatchRunner`](super::BatchRunner)
//! exactly.
//!
//! # Architecture
//!
//! ```text
//! ParallelRunner
//!     ├── Arc<RuleEvaluator>  (shared, read-only rule registry)
//!     └── workers             (number of chunks per batch)
//! ```
//!
//! # Errors
//!
//! Chunks are awaited in input order and each chunk stops at its first
//! failing record, so the error returned is always the one belonging to the
//! lowest input index. All chunks are awaited before the error is returned.

use crate::core::evaluator::RuleEvaluator;
use crate::core::runner::explain_record;
use crate::types::{ExplainedRecord, GuardianError, Report, ReportBuilder, TransactionRecord};
use std::sync::Arc;

/// A record tagged with its position in the input
pub type Indexed<T> = (usize, T);

/// Chunked, multi-threaded batch runner
#[derive(Debug, Clone)]
pub struct ParallelRunner {
    evaluator: Arc<RuleEvaluator>,
    workers: usize,
}

impl ParallelRunner {
    /// Create a runner that splits each batch into at most `workers` chunks
    pub fn new(evaluator: RuleEvaluator, workers: usize) -> Self {
        Self {
            evaluator: Arc::new(evaluator),
            workers: workers.max(1),
        }
    }

    pub fn rule_names(&self) -> Vec<String> {
        self.evaluator.rule_names()
    }

    /// Explain a batch of indexed records on worker threads
    ///
    /// # Returns
    ///
    /// The explained records sorted by input index.
    pub async fn process_batch(
        &self,
        batch: Vec<Indexed<TransactionRecord>>,
    ) -> Result<Vec<Indexed<ExplainedRecord>>, GuardianError> {
        if batch.is_empty() {
            return Ok(Vec::new());
        }

        let total = batch.len();
        let chunk_size = total.div_ceil(self.workers);

        // Spawn one blocking task per contiguous chunk
        let mut tasks = Vec::with_capacity(self.workers);
        let mut records = batch.into_iter().peekable();
        while records.peek().is_some() {
            let chunk: Vec<_> = records.by_ref().take(chunk_size).collect();
            let evaluator = Arc::clone(&self.evaluator);
            tasks.push(tokio::task::spawn_blocking(move || {
                explain_chunk(&evaluator, chunk)
            }));
        }

        log::debug!("Explaining {} records across {} tasks", total, tasks.len());

        // Every task is awaited so no chunk outlives the batch, even after a failure
        let mut results = Vec::with_capacity(total);
        let mut first_error = None;
        for task in tasks {
            let outcome = task
                .await
                .map_err(|e| GuardianError::TaskFailed {
                    message: e.to_string(),
                })
                .and_then(|chunk| chunk);
            match outcome {
                Ok(explained) if first_error.is_none() => results.extend(explained),
                Ok(_) => {}
                Err(e) => {
                    first_error.get_or_insert(e);
                }
            }
        }

        if let Some(e) = first_error {
            return Err(e);
        }

        results.sort_by_key(|(index, _)| *index);
        Ok(results)
    }

    /// Run a whole batch and build the report
    pub async fn run(&self, records: Vec<TransactionRecord>) -> Result<Report, GuardianError> {
        let indexed = records.into_iter().enumerate().collect();
        let explained = self.process_batch(indexed).await?;

        let mut builder = ReportBuilder::new(self.rule_names());
        for (_, record) in explained {
            builder.push(record);
        }

        Ok(builder.finish())
    }
}

fn explain_chunk(
    evaluator: &RuleEvaluator,
    chunk: Vec<Indexed<TransactionRecord>>,
) -> Result<Vec<Indexed<ExplainedRecord>>, GuardianError> {
    chunk
        .into_iter()
        .map(|(index, record)| explain_record(evaluator, record).map(|explained| (index, explained)))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::rules::Rule;
    use crate::core::runner::BatchRunner;
    use chrono::NaiveDate;
    use rstest::rstest;
    use rust_decimal::Decimal;
    use std::sync::atomic::{AtomicUsize, Ordering};

    fn records(count: u64) -> Vec<TransactionRecord> {
        (0..count)
            .map(|id| TransactionRecord {
                id,
                timestamp: NaiveDate::from_ymd_opt(2025, 7, 1).unwrap(),
                description: if id % 3 == 0 { "Rent".to_string() } else { "Coffee".to_string() },
                amount: Decimal::from(-(id as i64 * 37 % 500)),
                balance: Decimal::from(400 - (id as i64 * 53 % 700)),
                segment: None,
            })
            .collect()
    }

    #[rstest]
    #[case::single_worker(1)]
    #[case::two_workers(2)]
    #[case::more_workers_than_records(64)]
    #[tokio::test]
    async fn test_matches_sequential_runner(#[case] workers: usize) {
        let input = records(25);
        let expected = BatchRunner::default().run(input.clone()).unwrap();

        let runner = ParallelRunner::new(RuleEvaluator::default(), workers);
        let actual = runner.run(input).await.unwrap();

        assert_eq!(actual, expected);
    }

    #[tokio::test]
    async fn test_empty_batch() {
        let runner = ParallelRunner::new(RuleEvaluator::default(), 4);
        assert!(runner.process_batch(Vec::new()).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_zero_workers_treated_as_one() {
        let runner = ParallelRunner::new(RuleEvaluator::default(), 0);
        let report = runner.run(records(3)).await.unwrap();
        assert_eq!(report.summary.total_rows, 3);
    }

    #[tokio::test]
    async fn test_failed_batch_waits_for_every_chunk() {
        let evaluated = Arc::new(AtomicUsize::new(0));
        let counter = Arc::clone(&evaluated);
        let evaluator = RuleEvaluator::empty().with_rule(Rule::new(
            "reject_one",
            move |record: &TransactionRecord| {
                counter.fetch_add(1, Ordering::SeqCst);
                if record.id == 1 {
                    Err(GuardianError::rule_evaluation("reject_one", record.id, "rejected"))
                } else {
                    Ok(None)
                }
            },
        ));
        let runner = ParallelRunner::new(evaluator, 4);

        // Chunks of 3: [0, 1] stops at id 1, [3..6], [6..9] and [9] run fully
        let result = runner.run(records(10)).await;
        assert_eq!(
            result,
            Err(GuardianError::rule_evaluation("reject_one", 1, "rejected"))
        );
        assert_eq!(evaluated.load(Ordering::SeqCst), 9);
    }

    #[tokio::test]
    async fn test_reports_lowest_index_error() {
        let evaluator = RuleEvaluator::empty().with_rule(Rule::new(
            "reject_odd",
            |record: &TransactionRecord| {
                if record.id % 2 == 1 {
                    Err(GuardianError::rule_evaluation("reject_odd", record.id, "odd id"))
                } else {
                    Ok(None)
                }
            },
        ));
        let runner = ParallelRunner::new(evaluator, 4);

        let result = runner.run(records(10)).await;
        assert_eq!(
            result,
            Err(GuardianError::rule_evaluation("reject_odd", 1, "odd id"))
        );
    }
}
