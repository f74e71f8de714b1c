//! Built-in risk rules
//!
//! A [`Rule`] is a name paired with a pure check function. Rules share no
//! state with each other and are evaluated independently on every record, so
//! adding one never requires touching another.
//!
//! # Built-in rules
//!
//! - **overdraft** (critical): the balance after the transaction is below zero
//! - **large_withdrawal** (warning): a withdrawal exceeds a configured share of
//!   the balance before the transaction. Never fires when that prior balance
//!   is zero or negative.

use crate::types::{Finding, GuardianError, Severity, TransactionRecord};
use rust_decimal::Decimal;
use std::fmt;
use std::sync::Arc;

pub const OVERDRAFT: &str = "overdraft";
pub const LARGE_WITHDRAWAL: &str = "large_withdrawal";

/// Signature shared by every rule check
pub type RuleFn =
    Arc<dyn Fn(&TransactionRecord) -> Result<Option<Finding>, GuardianError> + Send + Sync>;

/// A named, independent rule
#[derive(Clone)]
pub struct Rule {
    name: String,
    check: RuleFn,
}

impl Rule {
    /// Create a rule from a name and a check function
    pub fn new<F>(name: impl Into<String>, check: F) -> Self
    where
        F: Fn(&TransactionRecord) -> Result<Option<Finding>, GuardianError>
            + Send
            + Sync
            + 'static,
    {
        Rule {
            name: name.into(),
            check: Arc::new(check),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Run the check against a single record
    pub fn check(&self, record: &TransactionRecord) -> Result<Option<Finding>, GuardianError> {
        (self.check)(record)
    }
}

impl fmt::Debug for Rule {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Rule").field("name", &self.name).finish()
    }
}

/// Overdraft rule: fires when the resulting balance is negative
pub fn overdraft_rule() -> Rule {
    Rule::new(OVERDRAFT, check_overdraft)
}

/// Large-withdrawal rule with the given share of the prior balance
pub fn large_withdrawal_rule(ratio: Decimal) -> Rule {
    Rule::new(LARGE_WITHDRAWAL, move |record: &TransactionRecord| {
        check_large_withdrawal(record, ratio)
    })
}

pub fn check_overdraft(record: &TransactionRecord) -> Result<Option<Finding>, GuardianError> {
    if record.balance >= Decimal::ZERO {
        return Ok(None);
    }

    Ok(Some(Finding::new(
        OVERDRAFT,
        Severity::Critical,
        format!("balance {} is below zero", record.balance),
    )))
}

/// Fires when `|amount| > ratio * balance_before` for a withdrawal
///
/// # Errors
///
/// Returns a `RuleEvaluation` error if the prior balance or the threshold
/// cannot be represented as a decimal.
pub fn check_large_withdrawal(
    record: &TransactionRecord,
    ratio: Decimal,
) -> Result<Option<Finding>, GuardianError> {
    if !record.is_withdrawal() {
        return Ok(None);
    }

    let before = record.balance_before().ok_or_else(|| {
        GuardianError::rule_evaluation(LARGE_WITHDRAWAL, record.id, "balance before overflowed")
    })?;

    // Non-positive baseline: nothing meaningful to compare against
    if before <= Decimal::ZERO {
        return Ok(None);
    }

    let threshold = ratio.checked_mul(before).ok_or_else(|| {
        GuardianError::rule_evaluation(LARGE_WITHDRAWAL, record.id, "threshold overflowed")
    })?;

    let withdrawn = record.amount.abs();
    if withdrawn <= threshold {
        return Ok(None);
    }

    Ok(Some(Finding::new(
        LARGE_WITHDRAWAL,
        Severity::Warning,
        format!(
            "withdrawal of {} exceeds {} of prior balance {}",
            withdrawn,
            ratio.normalize(),
            before
        ),
    )))
}
