//! Asynchronous batch processing strategy
//!
//! This module provides a multi-threaded implementation of the
//! ProcessingStrategy trait. Records are read in batches and each batch is
//! split across worker threads.
//!
//! # Architecture
//!
//! ```text
//! AsyncProcessingStrategy
//!     ├── BatchConfig (batch_size, max_concurrent_batches)
//!     ├── AsyncReader (batch CSV reading, row indices)
//!     └── ParallelRunner (chunked evaluation, re-sort by index)
//!         └── Arc<RuleEvaluator> (shared, read-only)
//! ```
//!
//! Batches are processed one after another and each batch comes back sorted
//! by row index, so the report order is exactly the input order.

use crate::core::{ParallelRunner, RiskConfig, RuleEvaluator};
use crate::io::async_reader::AsyncReader;
use crate::strategy::ProcessingStrategy;
use crate::types::{GuardianError, Report, ReportBuilder};
use std::io::ErrorKind;
use std::path::Path;

/// Configuration for batch processing
///
/// Controls how records are batched and how many worker threads explain
/// each batch.
#[derive(Clone, Debug, PartialEq)]
pub struct BatchConfig {
    /// Number of records per batch
    pub batch_size: usize,
    /// Number of worker threads (and chunks per batch)
    pub max_concurrent_batches: usize,
}

impl Default for BatchConfig {
    fn default() -> Self {
        Self {
            batch_size: 1000,
            max_concurrent_batches: num_cpus::get(),
        }
    }
}

impl BatchConfig {
    /// Create a new BatchConfig with custom values
    ///
    /// Zero values fall back to the defaults with a logged warning.
    pub fn new(batch_size: usize, max_concurrent_batches: usize) -> Self {
        let default = Self::default();

        let batch_size = if batch_size == 0 {
            log::warn!(
                "Invalid batch_size ({}), using default ({})",
                batch_size,
                default.batch_size
            );
            default.batch_size
        } else {
            batch_size
        };

        let max_concurrent_batches = if max_concurrent_batches == 0 {
            log::warn!(
                "Invalid max_concurrent_batches ({}), using default ({})",
                max_concurrent_batches,
                default.max_concurrent_batches
            );
            default.max_concurrent_batches
        } else {
            max_concurrent_batches
        };

        Self {
            batch_size,
            max_concurrent_batches,
        }
    }
}

/// Asynchronous batch processing strategy
#[derive(Debug, Clone)]
pub struct AsyncProcessingStrategy {
    config: BatchConfig,
    risk: RiskConfig,
}

impl AsyncProcessingStrategy {
    pub fn new(config: BatchConfig, risk: RiskConfig) -> Self {
        Self { config, risk }
    }

    async fn run(&self, input_path: &Path) -> Result<Report, GuardianError> {
        let runner = ParallelRunner::new(
            RuleEvaluator::new(&self.risk),
            self.config.max_concurrent_batches,
        );

        let file = tokio::fs::File::open(input_path)
            .await
            .map_err(|e| match e.kind() {
                ErrorKind::NotFound => GuardianError::FileNotFound {
                    path: input_path.display().to_string(),
                },
                _ => GuardianError::IoError {
                    message: format!("Failed to open file '{}': {}", input_path.display(), e),
                },
            })?;

        // Wrap tokio file in a compatibility layer for csv-async
        let compat_file = tokio_util::compat::TokioAsyncReadCompatExt::compat(file);
        let mut reader = AsyncReader::new(compat_file).await?;

        let mut builder = ReportBuilder::new(runner.rule_names());
        let mut batches = 0usize;

        loop {
            let batch = reader.read_batch(self.config.batch_size.max(1)).await?;
            if batch.is_empty() {
                break;
            }

            batches += 1;
            for (_, explained) in runner.process_batch(batch).await? {
                builder.push(explained);
            }
        }

        log::debug!(
            "Processed {} batches from {}",
            batches,
            input_path.display()
        );

        Ok(builder.finish())
    }
}

impl ProcessingStrategy for AsyncProcessingStrategy {
    fn evaluate(&self, input_path: &Path) -> Result<Report, GuardianError> {
        // Use multi-threaded runtime with configured number of worker threads
        let runtime = tokio::runtime::Builder::new_multi_thread()
            .worker_threads(self.config.max_concurrent_batches.max(1))
            .build()
            .map_err(|e| GuardianError::TaskFailed {
                message: format!("Failed to create tokio runtime: {}", e),
            })?;

        runtime.block_on(self.run(input_path))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::strategy::SyncProcessingStrategy;
    use rstest::rstest;
    use std::io::Write;
    use tempfile::NamedTempFile;

    /// Helper function to create a temporary CSV file for testing
    fn create_temp_csv(content: &str) -> NamedTempFile {
        let mut file = NamedTempFile::new().expect("Failed to create temp file");
        file.write_all(content.as_bytes())
            .expect("Failed to write to temp file");
        file.flush().expect("Failed to flush temp file");
        file
    }

    fn sample_csv(rows: u64) -> String {
        let mut content = String::from("id,timestamp,description,amount,balance,segment\n");
        let mut balance: i64 = 1000;
        for id in 0..rows {
            let amount = if id % 4 == 0 { 700 } else { -((id as i64 * 97) % 900) };
            balance += amount;
            let description = match id % 5 {
                0 => "Salary",
                1 => "Rent payment",
                2 => "ATM",
                _ => "Coffee",
            };
            content.push_str(&format!(
                "{},2025-02-{:02},{},{},{},retail\n",
                id,
                id % 28 + 1,
                description,
                amount,
                balance
            ));
        }
        content
    }

    #[rstest]
    #[case::default_config(BatchConfig::default())]
    #[case::tiny_batches(BatchConfig::new(2, 3))]
    #[case::single_worker(BatchConfig::new(7, 1))]
    fn test_async_strategy_matches_sync(#[case] config: BatchConfig) {
        let file = create_temp_csv(&sample_csv(60));

        let mut sync_output = Vec::new();
        let sync_report = SyncProcessingStrategy::new(RiskConfig::default())
            .process(file.path(), &mut sync_output)
            .unwrap();

        let mut async_output = Vec::new();
        let async_report = AsyncProcessingStrategy::new(config, RiskConfig::default())
            .process(file.path(), &mut async_output)
            .unwrap();

        assert_eq!(async_report, sync_report);
        assert_eq!(async_output, sync_output);
    }

    #[test]
    fn test_async_strategy_handles_missing_file() {
        let strategy = AsyncProcessingStrategy::new(BatchConfig::default(), RiskConfig::default());
        let mut output = Vec::new();

        let result = strategy.process(Path::new("nonexistent.csv"), &mut output);
        assert!(matches!(result, Err(GuardianError::FileNotFound { .. })));
        assert!(output.is_empty());
    }

    #[test]
    fn test_async_strategy_fails_on_invalid_row_in_later_batch() {
        let mut content = sample_csv(10);
        content.push_str("10,2025-03-01,Broken,n/a,100,retail\n");
        let file = create_temp_csv(&content);

        let strategy = AsyncProcessingStrategy::new(BatchConfig::new(3, 2), RiskConfig::default());
        let mut output = Vec::new();

        let result = strategy.process(file.path(), &mut output);
        assert_eq!(
            result.unwrap_err(),
            GuardianError::validation(10, "amount", "n/a", "not a decimal number")
        );
        assert!(output.is_empty());
    }

    #[test]
    fn test_async_strategy_clamps_zero_fields_set_directly() {
        let file = create_temp_csv(&sample_csv(5));
        let config = BatchConfig {
            batch_size: 0,
            max_concurrent_batches: 0,
        };

        let mut output = Vec::new();
        let report = AsyncProcessingStrategy::new(config, RiskConfig::default())
            .process(file.path(), &mut output)
            .unwrap();

        assert_eq!(report.summary.total_rows, 5);
        assert!(!output.is_empty());
    }

    #[rstest]
    #[case::zero_batch_size(BatchConfig::new(0, 4), 1000, 4)]
    #[case::zero_workers(BatchConfig::new(50, 0), 50, num_cpus::get())]
    fn test_batch_config_zero_values_fallback(
        #[case] config: BatchConfig,
        #[case] batch_size: usize,
        #[case] workers: usize,
    ) {
        assert_eq!(config.batch_size, batch_size);
        assert_eq!(config.max_concurrent_batches, workers);
    }
}
