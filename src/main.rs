//! Budget Guardian CLI
//!
//! Command-line interface for flagging risky transactions in a CSV file.
//!
//! # Usage
//!
//! ```bash
//! cargo run -- transactions.csv > flagged.csv
//! cargo run -- --summary summary.json transactions.csv > flagged.csv
//! cargo run -- --strategy async --batch-size 2000 --max-concurrent 8 transactions.csv > flagged.csv
//! cargo run -- --large-withdrawal-ratio 0.25 transactions.csv > flagged.csv
//! ```
//!
//! The augmented CSV (input columns plus `flags` and `explain_text`) goes to
//! stdout. The batch narrative is logged at `info` level; set `RUST_LOG` to
//! change verbosity.
//!
//! # Exit Codes
//!
//! - 0: Success
//! - 1: Error (file not found, validation failure, output failure, etc.)

use budget_guardian::cli::{self, CliArgs};
use budget_guardian::core::summary::SummaryDocument;
use budget_guardian::io::write_summary_json;
use budget_guardian::strategy;
use budget_guardian::GuardianError;
use std::fs::File;
use std::io::{BufWriter, Write};
use std::process;

fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let args = cli::parse_args();

    if let Err(e) = run(&args, &mut std::io::stdout()) {
        eprintln!("Error: {}", e);
        process::exit(1);
    }
}

/// Evaluate the input, write the summary if requested, then the augmented CSV
///
/// The CSV is written last so a failure anywhere before it leaves `output`
/// untouched.
fn run(args: &CliArgs, output: &mut dyn Write) -> Result<(), GuardianError> {
    // Create the appropriate processing strategy based on CLI arguments
    let strategy = {
        let config = if matches!(args.strategy, cli::StrategyType::Async) {
            Some(args.to_batch_config())
        } else {
            None
        };
        strategy::create_strategy(args.strategy.clone(), config, args.to_risk_config())
    };

    let report = strategy.evaluate(&args.input_file)?;

    let document = SummaryDocument::from_report(&report);
    log::info!("{}", document.narrative);

    if let Some(path) = &args.summary_file {
        let file = File::create(path)?;
        let mut writer = BufWriter::new(file);
        write_summary_json(&document, &mut writer)?;
        writer.flush()?;
        log::info!("Summary written to {}", path.display());
    }

    strategy::emit(&report, output)
}
