use crate::core::RiskConfig;
use crate::strategy::BatchConfig;
use clap::{Parser, ValueEnum};
use rust_decimal::Decimal;
use std::path::PathBuf;

/// Flag overdraft and large-withdrawal risks in a transaction CSV
#[derive(Parser, Debug)]
#[command(name = "budget-guardian")]
#[command(about = "Flag overdraft and large-withdrawal risks in a transaction CSV", long_about = None)]
pub struct CliArgs {
    /// Input CSV file path containing transaction records
    #[arg(value_name = "INPUT", help = "Path to the input CSV file")]
    pub input_file: PathBuf,

    /// Processing strategy
    #[arg(
        long = "strategy",
        value_name = "STRATEGY",
        default_value = "sync",
        help = "Processing strategy: 'sync' for single-threaded or 'async' for batched multi-threaded"
    )]
    pub strategy: StrategyType,

    /// Number of records per batch (async mode only)
    #[arg(
        long = "batch-size",
        value_name = "SIZE",
        help = "Number of records per batch (default: 1000)"
    )]
    pub batch_size: Option<usize>,

    /// Maximum number of worker threads (async mode only)
    #[arg(
        long = "max-concurrent",
        value_name = "COUNT",
        help = "Number of worker threads explaining each batch (default: CPU cores)"
    )]
    pub max_concurrent_batches: Option<usize>,

    /// Share of the prior balance above which a withdrawal is flagged
    #[arg(
        long = "large-withdrawal-ratio",
        value_name = "RATIO",
        help = "Share of the prior balance above which a withdrawal is flagged (default: 0.40)"
    )]
    pub large_withdrawal_ratio: Option<Decimal>,

    /// Where to write the JSON summary
    #[arg(
        long = "summary",
        value_name = "PATH",
        help = "Write the batch summary as JSON to this path"
    )]
    pub summary_file: Option<PathBuf>,
}

/// Available processing strategies
#[derive(Clone, Debug, ValueEnum)]
pub enum StrategyType {
    Sync,
    Async,
}

impl CliArgs {
    /// Create a BatchConfig from CLI arguments
    ///
    /// Missing values fall back to the defaults; zero values are replaced by
    /// `BatchConfig::new` with a logged warning.
    pub fn to_batch_config(&self) -> BatchConfig {
        if self.batch_size.is_some() || self.max_concurrent_batches.is_some() {
            let default = BatchConfig::default();
            BatchConfig::new(
                self.batch_size.unwrap_or(default.batch_size),
                self.max_concurrent_batches
                    .unwrap_or(default.max_concurrent_batches),
            )
        } else {
            BatchConfig::default()
        }
    }

    /// Create a RiskConfig from CLI arguments
    pub fn to_risk_config(&self) -> RiskConfig {
        match self.large_withdrawal_ratio {
            Some(ratio) => RiskConfig::new(ratio),
            None => RiskConfig::default(),
        }
    }
}
