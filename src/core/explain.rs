//! Explanation generator
//!
//! Turns a record and its findings into a short human-readable paragraph:
//! one sentence per finding, selected by rule name and severity, followed by
//! an optional context clause derived from the description.
//!
//! Keyword lookup walks [`KEYWORD_CONTEXTS`] in declaration order and matches
//! whole words case-insensitively; the first keyword present wins.

use crate::core::rules::{LARGE_WITHDRAWAL, OVERDRAFT};
use crate::types::{Finding, Severity, TransactionRecord};
use rust_decimal::{Decimal, RoundingStrategy};

/// Text returned for a record without findings
pub const NO_ISSUES: &str = "No issues detected for this transaction.";

/// Keyword to context mapping, in match priority order
pub const KEYWORD_CONTEXTS: &[(&str, &str)] = &[
    ("rent", "recurring housing payment"),
    ("mortgage", "recurring housing payment"),
    ("salary", "income deposit"),
    ("payroll", "income deposit"),
    ("utility", "recurring utility bill"),
    ("atm", "cash withdrawal"),
    ("transfer", "account transfer"),
    ("grocery", "everyday household spending"),
];

/// Build the explanation text for `record`
pub fn explain(record: &TransactionRecord, findings: &[Finding]) -> String {
    if findings.is_empty() {
        return NO_ISSUES.to_string();
    }

    let mut sentences: Vec<String> = findings
        .iter()
        .map(|finding| sentence_for(record, finding))
        .collect();

    if let Some(context) = keyword_context(&record.description) {
        sentences.push(format!("Context: {}.", context));
    }

    sentences.join(" ")
}

/// Context for the first keyword found in `description`, if any
pub fn keyword_context(description: &str) -> Option<&'static str> {
    let words: Vec<String> = description
        .split(|c: char| !c.is_alphanumeric())
        .filter(|word| !word.is_empty())
        .map(str::to_lowercase)
        .collect();

    KEYWORD_CONTEXTS
        .iter()
        .find(|(keyword, _)| words.iter().any(|word| word == keyword))
        .map(|(_, context)| *context)
}

fn sentence_for(record: &TransactionRecord, finding: &Finding) -> String {
    match (finding.rule_name.as_str(), finding.severity) {
        (OVERDRAFT, Severity::Critical) => {
            let kind = if record.is_withdrawal() {
                "withdrawal"
            } else {
                "deposit"
            };
            format!(
                "Overdraft risk: balance after this {} of {} is {} (below 0.00).",
                kind,
                money(record.amount.abs()),
                money(record.balance)
            )
        }
        (LARGE_WITHDRAWAL, Severity::Warning) => match record
            .balance_before()
            .filter(|before| *before > Decimal::ZERO)
            .and_then(|before| share_percent(record.amount.abs(), before).map(|p| (before, p)))
        {
            Some((before, share)) => format!(
                "Large withdrawal: {} is {:.1}% of the prior balance of {}.",
                money(record.amount.abs()),
                share,
                money(before)
            ),
            None => format!(
                "Large withdrawal: {} taken from the account.",
                money(record.amount.abs())
            ),
        },
        _ => format!(
            "{} from {}: {}.",
            finding.severity.label(),
            finding.rule_name,
            finding.message
        ),
    }
}

/// `part` as a percentage of `whole`, one decimal, half away from zero
///
/// Divides before scaling so amounts near the top of the decimal range still
/// produce a share. `None` when the quotient itself does not fit.
fn share_percent(part: Decimal, whole: Decimal) -> Option<Decimal> {
    part.checked_div(whole)?
        .checked_mul(Decimal::ONE_HUNDRED)
        .map(|share| share.round_dp_with_strategy(1, RoundingStrategy::MidpointAwayFromZero))
}

/// Two-decimal rendering, half away from zero
pub(crate) fn money(value: Decimal) -> String {
    format!(
        "{:.2}",
        value.round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero)
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::evaluator::RuleEvaluator;
    use chrono::NaiveDate;
    use rstest::rstest;

    fn record(amount: i64, balance: i64, description: &str) -> TransactionRecord {
        TransactionRecord {
            id: 1,
            timestamp: NaiveDate::from_ymd_opt(2025, 2, 1).unwrap(),
            description: description.to_string(),
            amount: Decimal::from(amount),
            balance: Decimal::from(balance),
            segment: Some("retail".to_string()),
        }
    }

    fn explain_with_defaults(record: &TransactionRecord) -> String {
        let findings = RuleEvaluator::default().evaluate(record).unwrap();
        explain(record, &findings)
    }

    #[rstest]
    #[case::clean(record(-10, 990, "Coffee"))]
    #[case::overdrawn_record(record(-50, -10, "Rent payment"))]
    #[case::keyword_only(record(2500, 4000, "Salary deposit"))]
    fn test_no_findings_yields_neutral_message(#[case] record: TransactionRecord) {
        assert_eq!(explain(&record, &[]), NO_ISSUES);
    }

    #[test]
    fn test_overdraft_sentence() {
        let text = explain_with_defaults(&record(-50, -10, "Coffee shop"));
        assert_eq!(
            text,
            "Overdraft risk: balance after this withdrawal of 50.00 is -10.00 (below 0.00). \
             Large withdrawal: 50.00 is 125.0% of the prior balance of 40.00."
        );
    }

    #[test]
    fn test_large_withdrawal_with_rent_context() {
        let text = explain_with_defaults(&record(-500, 600, "Rent payment"));
        assert_eq!(
            text,
            "Large withdrawal: 500.00 is 45.5% of the prior balance of 1100.00. \
             Context: recurring housing payment."
        );
    }

    #[test]
    fn test_overdraft_after_deposit() {
        let text = explain_with_defaults(&record(20, -5, "Transfer in"));
        assert_eq!(
            text,
            "Overdraft risk: balance after this deposit of 20.00 is -5.00 (below 0.00). \
             Context: account transfer."
        );
    }

    #[test]
    fn test_unknown_rule_uses_finding_message() {
        let record = record(-5, 95, "");
        let findings = vec![Finding::new("odd_hours", Severity::Info, "posted at 3am")];
        assert_eq!(explain(&record, &findings), "Info from odd_hours: posted at 3am.");
    }

    #[test]
    fn test_known_rule_with_other_severity_uses_generic_template() {
        let record = record(-5, -1, "");
        let findings = vec![Finding::new(OVERDRAFT, Severity::Info, "balance -1 is below zero")];
        assert_eq!(
            explain(&record, &findings),
            "Info from overdraft: balance -1 is below zero."
        );
    }

    #[rstest]
    #[case::rent("Rent payment", Some("recurring housing payment"))]
    #[case::upper_case("MONTHLY RENT", Some("recurring housing payment"))]
    #[case::salary("Salary Deposit #3", Some("income deposit"))]
    #[case::atm("ATM withdrawal", Some("cash withdrawal"))]
    #[case::first_in_table_order("Salary transfer for rent", Some("recurring housing payment"))]
    #[case::substring_is_not_word("Parent gift", None)]
    #[case::punctuation("utility-bill", Some("recurring utility bill"))]
    #[case::no_keyword("Coffee Shop", None)]
    #[case::empty("", None)]
    fn test_keyword_context(#[case] description: &str, #[case] expected: Option<&str>) {
        assert_eq!(keyword_context(description), expected);
    }

    #[rstest]
    #[case(Decimal::new(-10, 0), "-10.00")]
    #[case(Decimal::new(12345, 3), "12.35")]
    #[case(Decimal::new(1005, 3), "1.01")]
    #[case(Decimal::new(440, 0), "440.00")]
    fn test_money(#[case] value: Decimal, #[case] expected: &str) {
        assert_eq!(money(value), expected);
    }

    #[test]
    fn test_large_withdrawal_near_decimal_limit() {
        // 1e27 * 100 does not fit in a Decimal, the share still does
        let record = TransactionRecord {
            amount: Decimal::from_str_exact("-1000000000000000000000000000").unwrap(),
            balance: Decimal::ZERO,
            ..record(0, 0, "Big transfer")
        };
        assert_eq!(
            explain_with_defaults(&record),
            "Large withdrawal: 1000000000000000000000000000.00 is 100.0% of the prior balance \
             of 1000000000000000000000000000.00. Context: account transfer."
        );
    }

    #[test]
    fn test_large_withdrawal_share_overflow_falls_back() {
        // The prior balance is 1e-28, so the share (1e30 percent) does not fit
        let record = TransactionRecord {
            amount: Decimal::NEGATIVE_ONE,
            balance: Decimal::from_str_exact("-0.9999999999999999999999999999").unwrap(),
            ..record(0, 0, "")
        };
        let findings = vec![Finding::new(
            LARGE_WITHDRAWAL,
            Severity::Warning,
            "withdrawal exceeds prior balance",
        )];
        assert_eq!(
            explain(&record, &findings),
            "Large withdrawal: 1.00 taken from the account."
        );
    }

    #[rstest]
    #[case::repeating(Decimal::from(500), Decimal::from(1100), Some(Decimal::new(455, 1)))]
    #[case::midpoint(Decimal::ONE, Decimal::from(16), Some(Decimal::new(63, 1)))]
    #[case::above_whole(Decimal::from(50), Decimal::from(40), Some(Decimal::from(125)))]
    #[case::tiny_whole(Decimal::from(1_000_000), Decimal::new(1, 28), None)]
    fn test_share_percent(
        #[case] part: Decimal,
        #[case] whole: Decimal,
        #[case] expected: Option<Decimal>,
    ) {
        assert_eq!(share_percent(part, whole), expected);
    }

    #[test]
    fn test_explain_is_deterministic() {
        let record = record(-441, 659, "ATM rent");
        assert_eq!(explain_with_defaults(&record), explain_with_defaults(&record));
    }
}
