//! Rule evaluator
//!
//! The [`RuleEvaluator`] is an ordered registry of independent [`Rule`]s.
//! Every registered rule runs on every record; findings come back in
//! registration order. New rules are added by registering another function,
//! never by modifying an existing one.

use crate::core::rules::{large_withdrawal_rule, overdraft_rule, Rule};
use crate::types::{Finding, GuardianError, TransactionRecord};
use rust_decimal::Decimal;

/// Thresholds for the built-in rules
#[derive(Clone, Debug, PartialEq)]
pub struct RiskConfig {
    /// Share of the prior balance above which a withdrawal counts as large
    pub large_withdrawal_ratio: Decimal,
}

impl Default for RiskConfig {
    fn default() -> Self {
        Self {
            large_withdrawal_ratio: Decimal::new(40, 2),
        }
    }
}

impl RiskConfig {
    /// Create a RiskConfig, falling back to the default ratio when the given
    /// one is not strictly positive
    pub fn new(large_withdrawal_ratio: Decimal) -> Self {
        let default = Self::default();

        let large_withdrawal_ratio = if large_withdrawal_ratio <= Decimal::ZERO {
            log::warn!(
                "Invalid large_withdrawal_ratio ({}), using default ({})",
                large_withdrawal_ratio,
                default.large_withdrawal_ratio
            );
            default.large_withdrawal_ratio
        } else {
            large_withdrawal_ratio
        };

        Self {
            large_withdrawal_ratio,
        }
    }
}

/// Ordered registry of rules
#[derive(Clone, Debug)]
pub struct RuleEvaluator {
    rules: Vec<Rule>,
}

impl RuleEvaluator {
    /// Create an evaluator with the built-in rules configured from `config`
    pub fn new(config: &RiskConfig) -> Self {
        Self::empty()
            .with_rule(overdraft_rule())
            .with_rule(large_withdrawal_rule(config.large_withdrawal_ratio))
    }

    /// Create an evaluator with no rules registered
    pub fn empty() -> Self {
        Self { rules: Vec::new() }
    }

    /// Builder-style registration
    pub fn with_rule(mut self, rule: Rule) -> Self {
        self.register(rule);
        self
    }

    /// Append a rule to the registry
    pub fn register(&mut self, rule: Rule) {
        log::debug!("Registering rule '{}'", rule.name());
        self.rules.push(rule);
    }

    /// Names of the registered rules in registration order
    pub fn rule_names(&self) -> Vec<String> {
        self.rules.iter().map(|rule| rule.name().to_string()).collect()
    }

    /// Run every registered rule against `record`
    ///
    /// # Errors
    ///
    /// Returns the first rule error encountered; no findings are returned in
    /// that case.
    pub fn evaluate(&self, record: &TransactionRecord) -> Result<Vec<Finding>, GuardianError> {
        let mut findings = Vec::new();

        for rule in &self.rules {
            if let Some(finding) = rule.check(record)? {
                findings.push(finding);
            }
        }

        Ok(findings)
    }
}

impl Default for RuleEvaluator {
    fn default() -> Self {
        Self::new(&RiskConfig::default())
    }
}
