//! Error types for the Budget Guardian
//!
//! This module defines all error types that can occur while loading, checking
//! and writing a batch of transactions. Errors are designed to be descriptive
//! enough to surface to an end user as a single message.
//!
//! # Error Categories
//!
//! - **File I/O Errors**: File not found, permission denied, etc.
//! - **CSV Errors**: Structurally malformed CSV
//! - **Validation Errors**: Missing columns, unparseable fields
//! - **Rule Evaluation Errors**: Internal invariant violations while comparing amounts
//! - **Output / Task Errors**: Writing results failed, worker task failed
//!
//! None of these are recoverable: a batch either completes or produces no report.

use thiserror::Error;

/// Main error type for the Budget Guardian
#[derive(Debug, Clone, PartialEq, Error)]
pub enum GuardianError {
    /// File not found at the specified path
    #[error("File not found: {path}")]
    FileNotFound {
        /// The path that was not found
        path: String,
    },

    /// I/O error occurred while reading or writing files
    #[error("I/O error: {message}")]
    IoError {
        /// Description of the I/O error
        message: String,
    },

    /// The input is not well-formed CSV
    #[error("CSV parse error{}: {message}", line.map(|l| format!(" at line {}", l)).unwrap_or_default())]
    ParseError {
        /// Line number where the error occurred (if available)
        line: Option<u64>,
        /// Description of the parsing error
        message: String,
    },

    /// The header row lacks a required column
    #[error("Validation error: missing required column '{column}'")]
    MissingColumn {
        /// Canonical name of the missing column
        column: String,
    },

    /// A field of a data row could not be validated
    ///
    /// `row` is the zero-based index of the data row, header excluded.
    #[error("Validation error at row {row}, column '{column}': {reason} (value '{value}')")]
    Validation {
        row: usize,
        column: String,
        value: String,
        reason: String,
    },

    /// A rule could not compare the numeric fields of a record
    ///
    /// Parse-time validation should make this unreachable; it signals an
    /// internal invariant violation.
    #[error("Rule '{rule}' failed on record {id}: {message}")]
    RuleEvaluation {
        rule: String,
        id: u64,
        message: String,
    },

    /// Writing the augmented table or the summary failed
    #[error("Output error: {message}")]
    Output { message: String },

    /// A worker task of the parallel runner failed
    #[error("Worker task failed: {message}")]
    TaskFailed { message: String },
}

// Conversion from io::Error to GuardianError
impl From<std::io::Error> for GuardianError {
    fn from(error: std::io::Error) -> Self {
        GuardianError::IoError {
            message: error.to_string(),
        }
    }
}

// Conversion from csv::Error to GuardianError
impl From<csv::Error> for GuardianError {
    fn from(error: csv::Error) -> Self {
        // Extract line number if available
        let line = error.position().map(|pos| pos.line());

        GuardianError::ParseError {
            line,
            message: error.to_string(),
        }
    }
}

impl From<csv_async::Error> for GuardianError {
    fn from(error: csv_async::Error) -> Self {
        GuardianError::ParseError {
            line: None,
            message: error.to_string(),
        }
    }
}

// Helper functions for creating common errors

impl GuardianError {
    /// Create a MissingColumn error
    pub fn missing_column(column: &str) -> Self {
        GuardianError::MissingColumn {
            column: column.to_string(),
        }
    }

    /// Create a Validation error
    pub fn validation(row: usize, column: &str, value: &str, reason: &str) -> Self {
        GuardianError::Validation {
            row,
            column: column.to_string(),
            value: value.to_string(),
            reason: reason.to_string(),
        }
    }

    /// Create a RuleEvaluation error
    pub fn rule_evaluation(rule: &str, id: u64, message: &str) -> Self {
        GuardianError::RuleEvaluation {
            rule: rule.to_string(),
            id,
            message: message.to_string(),
        }
    }

    /// Create an Output error
    pub fn output(message: impl std::fmt::Display) -> Self {
        GuardianError::Output {
            message: message.to_string(),
        }
    }

    /// Whether this error belongs to the validation family
    pub fn is_validation(&self) -> bool {
        matches!(
            self,
            GuardianError::MissingColumn { .. } | GuardianError::Validation { .. }
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case::file_not_found(
        GuardianError::FileNotFound { path: "test.csv".to_string() },
        "File not found: test.csv"
    )]
    #[case::io_error(
        GuardianError::IoError { message: "Permission denied".to_string() },
        "I/O error: Permission denied"
    )]
    #[case::parse_error_with_line(
        GuardianError::ParseError { line: Some(42), message: "Invalid field".to_string() },
        "CSV parse error at line 42: Invalid field"
    )]
    #[case::parse_error_without_line(
        GuardianError::ParseError { line: None, message: "Invalid field".to_string() },
        "CSV parse error: Invalid field"
    )]
    #[case::missing_column(
        GuardianError::missing_column("balance"),
        "Validation error: missing required column 'balance'"
    )]
    #[case::validation(
        GuardianError::validation(3, "amount", "abc", "not a decimal number"),
        "Validation error at row 3, column 'amount': not a decimal number (value 'abc')"
    )]
    #[case::rule_evaluation(
        GuardianError::rule_evaluation("large_withdrawal", 7, "balance before overflowed"),
        "Rule 'large_withdrawal' failed on record 7: balance before overflowed"
    )]
    #[case::output(
        GuardianError::output("broken pipe"),
        "Output error: broken pipe"
    )]
    #[case::task_failed(
        GuardianError::TaskFailed { message: "panicked".to_string() },
        "Worker task failed: panicked"
    )]
    fn test_error_display(#[case] error: GuardianError, #[case] expected: &str) {
        assert_eq!(error.to_string(), expected);
    }

    #[rstest]
    #[case::missing_column(GuardianError::missing_column("id"), true)]
    #[case::validation(GuardianError::validation(0, "amount", "x", "bad"), true)]
    #[case::rule(GuardianError::rule_evaluation("overdraft", 1, "bad"), false)]
    #[case::io(GuardianError::IoError { message: "x".to_string() }, false)]
    fn test_is_validation(#[case] error: GuardianError, #[case] expected: bool) {
        assert_eq!(error.is_validation(), expected);
    }

    #[test]
    fn test_io_error_conversion() {
        let io_error =
            std::io::Error::new(std::io::ErrorKind::PermissionDenied, "Permission denied");
        let error: GuardianError = io_error.into();
        assert!(matches!(error, GuardianError::IoError { .. }));
        assert_eq!(error.to_string(), "I/O error: Permission denied");
    }
}
