//! Batch-level narrative and recommendations
//!
//! These operate on a finished [`Report`] and never influence the per-record
//! findings. The summary document bundles them with the raw counters for
//! serialization.

use crate::core::explain::money;
use crate::types::{Report, Summary, OVERDRAFT_RULE};
use rust_decimal::Decimal;
use serde::Serialize;

/// Overdraft share (in percent) above which priority becomes high
const HIGH_PRIORITY_RATE: usize = 20;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Priority {
    Low,
    Medium,
    High,
}

/// Suggested follow-ups for a batch
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Recommendations {
    pub priority: Priority,
    pub actions: Vec<String>,
    pub insights: Vec<String>,
}

/// Everything written to the summary output for one batch
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SummaryDocument {
    #[serde(flatten)]
    pub summary: Summary,
    pub overdraft_rate_percent: String,
    pub narrative: String,
    pub recommendations: Recommendations,
}

impl SummaryDocument {
    pub fn from_report(report: &Report) -> Self {
        SummaryDocument {
            summary: report.summary.clone(),
            overdraft_rate_percent: format!("{:.1}", report.summary.overdraft_rate_percent()),
            narrative: explain_summary(&report.summary),
            recommendations: recommend(report),
        }
    }
}

/// One-line description of a batch outcome
pub fn explain_summary(summary: &Summary) -> String {
    if summary.total_rows == 0 {
        return "No transactions to analyze.".to_string();
    }

    if summary.overdraft_count == 0 {
        return format!(
            "Analysis of {} transactions found no overdraft risks.",
            summary.total_rows
        );
    }

    format!(
        "Analysis of {} transactions found {} potential overdrafts ({:.1}% risk rate)",
        summary.total_rows,
        summary.overdraft_count,
        summary.overdraft_rate_percent()
    )
}

pub fn recommend(report: &Report) -> Recommendations {
    let overdrawn: Vec<Decimal> = report
        .records
        .iter()
        .filter(|explained| explained.has_finding(OVERDRAFT_RULE))
        .map(|explained| explained.record.balance)
        .collect();

    if overdrawn.is_empty() {
        return Recommendations {
            priority: Priority::Low,
            actions: vec![
                "Continue current spending patterns - no immediate risks detected.".to_string(),
            ],
            insights: vec!["Your transactions show good balance management.".to_string()],
        };
    }

    // overdrawn * 100 > total * 20, kept in integers
    let high = overdrawn.len() * 100 > report.summary.total_rows * HIGH_PRIORITY_RATE;

    let (priority, actions) = if high {
        (
            Priority::High,
            vec![
                "Consider reducing discretionary spending immediately",
                "Review and defer non-essential transactions",
                "Contact your bank about overdraft protection options",
            ],
        )
    } else {
        (
            Priority::Medium,
            vec![
                "Review flagged transactions before proceeding",
                "Consider timing large expenses after deposits clear",
            ],
        )
    };

    let insights = match average(&overdrawn) {
        Some(average) => vec![format!(
            "Average projected overdraft amount: {}",
            money(average.abs())
        )],
        None => {
            log::warn!(
                "Average overdraft of {} rows is outside the decimal range, skipping insight",
                overdrawn.len()
            );
            Vec::new()
        }
    };

    Recommendations {
        priority,
        actions: actions.into_iter().map(String::from).collect(),
        insights,
    }
}

/// Mean of `values`, or `None` when empty or not representable
///
/// Sums directly when the total fits, otherwise sums the per-value shares
/// so balances near the decimal limits still average.
fn average(values: &[Decimal]) -> Option<Decimal> {
    if values.is_empty() {
        return None;
    }
    let count = Decimal::from(values.len());

    let total = values
        .iter()
        .try_fold(Decimal::ZERO, |acc, value| acc.checked_add(*value));
    if let Some(total) = total {
        return total.checked_div(count);
    }

    values.iter().try_fold(Decimal::ZERO, |acc, value| {
        acc.checked_add(value.checked_div(count)?)
    })
}
