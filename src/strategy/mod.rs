//! Processing strategy module
//!
//! This module defines the Strategy pattern for complete pipelines,
//! encompassing CSV parsing, rule evaluation and report output. This allows
//! different execution models (single-threaded, chunked multi-threaded) to be
//! selected at runtime. Every strategy produces the same report for the same
//! input.

use crate::cli::StrategyType;
use crate::core::{assess_quality, RiskConfig};
use crate::io::write_report_csv;
use crate::types::{GuardianError, Report};
use std::io::Write;
use std::path::Path;

pub mod r#async;
pub mod sync;

pub use self::r#async::{AsyncProcessingStrategy, BatchConfig};
pub use sync::SyncProcessingStrategy;

/// Processing strategy trait for complete pipelines
pub trait ProcessingStrategy: Send + Sync {
    /// Read and evaluate every record of the input file
    ///
    /// Nothing is written; the finished report is returned so callers can
    /// render it (and its summary) however they like.
    ///
    /// # Errors
    ///
    /// - The input file cannot be opened
    /// - A header or row fails validation
    /// - A rule hits an internal invariant violation
    fn evaluate(&self, input_path: &Path) -> Result<Report, GuardianError>;

    /// Process transactions from input file and write the augmented table
    ///
    /// # Arguments
    ///
    /// * `input_path` - Path to the input CSV file
    /// * `output` - Writer receiving the augmented CSV
    ///
    /// # Errors
    ///
    /// Any error from [`evaluate`](Self::evaluate) aborts the run before a
    /// single output byte is written. Output failures are returned as
    /// `Output` errors.
    fn process(&self, input_path: &Path, output: &mut dyn Write) -> Result<Report, GuardianError> {
        let report = self.evaluate(input_path)?;
        emit(&report, output)?;
        Ok(report)
    }
}

/// Create a processing strategy based on the specified strategy type
///
/// # Arguments
///
/// * `strategy_type` - The type of processing strategy to create (Sync or Async)
/// * `config` - Optional batch configuration (ignored for sync)
/// * `risk` - Rule thresholds shared by every strategy
pub fn create_strategy(
    strategy_type: StrategyType,
    config: Option<BatchConfig>,
    risk: RiskConfig,
) -> Box<dyn ProcessingStrategy> {
    match strategy_type {
        StrategyType::Sync => Box::new(SyncProcessingStrategy::new(risk)),
        StrategyType::Async => {
            let config = config.unwrap_or_default();
            Box::new(AsyncProcessingStrategy::new(config, risk))
        }
    }
}

/// Log advisory quality warnings, then write the finished report
pub fn emit(report: &Report, output: &mut dyn Write) -> Result<(), GuardianError> {
    let quality = assess_quality(report.records.iter().map(|explained| &explained.record));
    for warning in &quality.warnings {
        log::warn!("Data quality: {}", warning);
    }

    write_report_csv(report, output)
}
