//! Budget Guardian Library
//! # Overview
//!
//! This library flags risky transactions in tabular ledger data and explains
//! each finding in plain language. It implements a synchronous and a batched
//! multi-threaded processing strategy that produce identical reports.
//!
//! # Architecture
//!
//! The system is organized into several key components:
//!
//! - [`types`] - Core data types (TransactionRecord, Finding, Report, etc.)
//! - [`cli`] - CLI arguments parsing
//! - [`core`] - Business logic components:
//!   - [`core::rules`] / [`core::evaluator`] - Independent rules and their registry
//!   - [`core::explain`] - Per-record explanation text
//!   - [`core::runner`] / [`core::parallel`] - Batch runners
//!   - [`core::summary`] / [`core::quality`] - Batch narrative, recommendations and data checks
//! - [`io`] - CSV parsing and report serialization
//! - [`strategy`] - Complete pipelines selectable at runtime
//!
//! # Rules
//!
//! - **overdraft** (critical): balance after the transaction is below zero
//! - **large_withdrawal** (warning): a withdrawal takes more than 40% (configurable)
//!   of the balance before it; never fires on a zero or negative prior balance
//!
//! # Failure policy
//!
//! Processing is fail-fast. A missing column, an unparseable field or a rule
//! error aborts the batch and no report is produced.
//!
//! ```
//! use budget_guardian::core::BatchRunner;
//! use budget_guardian::io::parse;
//!
//! let input = "id,timestamp,description,amount,balance\n1,2025-01-31,Rent,-500,600\n";
//! let records = parse(input.as_bytes()).unwrap();
//! let report = BatchRunner::default().run(records).unwrap();
//!
//! assert_eq!(report.records[0].flags(), "large_withdrawal");
//! ```

// Module declarations
pub mod cli;
pub mod core;
pub mod io;
pub mod strategy;
pub mod types;

pub use self::core::{BatchRunner, ParallelRunner, RiskConfig, RuleEvaluator};
pub use io::{parse, write_report_csv};
pub use types::{
    ExplainedRecord, Finding, GuardianError, RecordId, Report, Severity, Summary,
    TransactionRecord,
};
