//! Synchronous processing strategy
//!
//! This module provides a single-threaded implementation of the
//! ProcessingStrategy trait. It streams records out of the `SyncReader`
//! straight into the `BatchRunner`.
//!
//! # Design
//!
//! The SyncProcessingStrategy focuses on orchestration, delegating:
//! - CSV parsing to `SyncReader` (iterator interface)
//! - Rule evaluation and explanations to `BatchRunner`
//! - CSV output to `csv_format::write_report_csv`
//!
//! The first invalid row stops the iterator chain, so no partial report is
//! ever written.

use crate::core::{BatchRunner, RiskConfig, RuleEvaluator};
use crate::io::sync_reader::SyncReader;
use crate::strategy::ProcessingStrategy;
use crate::types::{GuardianError, Report};
use std::path::Path;

/// Synchronous processing strategy
///
/// # Examples
///
/// ```no_run
/// use budget_guardian::core::RiskConfig;
/// use budget_guardian::strategy::{ProcessingStrategy, SyncProcessingStrategy};
/// use std::path::Path;
/// use std::io;
///
/// let strategy = SyncProcessingStrategy::new(RiskConfig::default());
/// let mut output = io::stdout();
///
/// strategy.process(Path::new("transactions.csv"), &mut output)
///     .expect("Processing failed");
/// ```
#[derive(Debug, Clone)]
pub struct SyncProcessingStrategy {
    runner: BatchRunner,
}

impl SyncProcessingStrategy {
    pub fn new(risk: RiskConfig) -> Self {
        Self {
            runner: BatchRunner::new(RuleEvaluator::new(&risk)),
        }
    }
}

impl ProcessingStrategy for SyncProcessingStrategy {
    fn evaluate(&self, input_path: &Path) -> Result<Report, GuardianError> {
        let reader = SyncReader::new(input_path)?;
        let report = self.runner.run_fallible(reader)?;

        log::debug!(
            "Processed {} rows from {}",
            report.summary.total_rows,
            input_path.display()
        );

        Ok(report)
    }
}
