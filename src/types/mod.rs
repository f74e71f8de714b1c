//! Types module
//!
//! Contains core data structures used throughout the application.
//! This module organizes types into logical submodules:
//! - `record`: The validated transaction record
//! - `finding`: Rule findings and severities
//! - `report`: Explained records, summary counters and the batch report
//! - `error`: Error types for the pipeline

pub mod error;
pub mod finding;
pub mod record;
pub mod report;

pub use error::GuardianError;
pub use finding::{Finding, Severity};
pub use record::{RecordId, TransactionRecord};
pub use report::{ExplainedRecord, Report, ReportBuilder, Summary, OVERDRAFT_RULE};
