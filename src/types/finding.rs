//! Rule findings
//!
//! A [`Finding`] is a single observation produced by exactly one rule about
//! one transaction record.

use serde::Serialize;
use std::fmt;

/// Qualitative rank of a finding
///
/// Ordered `Info < Warning < Critical`. Used for display sorting only,
/// never for control flow.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    Info,
    Warning,
    Critical,
}

impl Severity {
    /// Capitalised label for use at the start of a sentence
    pub fn label(self) -> &'static str {
        match self {
            Severity::Info => "Info",
            Severity::Warning => "Warning",
            Severity::Critical => "Critical",
        }
    }
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Severity::Info => "info",
            Severity::Warning => "warning",
            Severity::Critical => "critical",
        };
        f.write_str(name)
    }
}

/// Observation produced by a single rule
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Finding {
    /// Name of the rule that produced this finding
    pub rule_name: String,

    /// How serious the observation is
    pub severity: Severity,

    /// Short machine-oriented description of why the rule fired
    pub message: String,
}

impl Finding {
    pub fn new(rule_name: impl Into<String>, severity: Severity, message: impl Into<String>) -> Self {
        Finding {
            rule_name: rule_name.into(),
            severity,
            message: message.into(),
        }
    }
}
