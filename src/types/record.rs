//! Transaction record types for the Budget Guardian
//!
//! This module defines the canonical ledger entry that every other component
//! consumes: one row of the input table after validation.

use chrono::NaiveDate;
use rust_decimal::Decimal;

/// Record identifier
///
/// Taken from the `id` (or `index`) column of the input table.
pub type RecordId = u64;

/// One validated ledger entry
///
/// `balance` is the running balance *after* `amount` has been applied.
/// Records are never mutated once the I/O adapter has built them.
#[derive(Debug, Clone, PartialEq)]
pub struct TransactionRecord {
    /// Row identifier from the input table
    pub id: RecordId,

    /// Posting date of the transaction
    pub timestamp: NaiveDate,

    /// Free-text description (may be empty)
    pub description: String,

    /// Signed amount: negative for withdrawals, positive for deposits
    pub amount: Decimal,

    /// Running balance after this transaction
    pub balance: Decimal,

    /// Optional customer segment label
    pub segment: Option<String>,
}

impl TransactionRecord {
    /// Balance immediately before this transaction was applied
    ///
    /// Returns `None` if `balance - amount` overflows the decimal range.
    pub fn balance_before(&self) -> Option<Decimal> {
        self.balance.checked_sub(self.amount)
    }

    /// Whether this transaction debits the account
    pub fn is_withdrawal(&self) -> bool {
        self.amount.is_sign_negative() && !self.amount.is_zero()
    }
}
