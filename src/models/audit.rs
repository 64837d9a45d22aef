//! Audit trail entries for payroll calculations.

use serde::{Deserialize, Serialize};

/// A single step in a calculation's audit trail.
///
/// Each step captures the input, output, and reasoning for one rule.
///
/// # Example
///
/// ```
/// use press_ledger::models::AuditStep;
///
/// let step = AuditStep {
///     step_number: 1,
///     rule_id: "base_pay".to_string(),
///     rule_name: "Base Pay".to_string(),
///     input: serde_json::json!({"salary_type": "monthly"}),
///     output: serde_json::json!({"base_pay": "3000"}),
///     reasoning: "Monthly salary of $3000".to_string(),
/// };
/// assert_eq!(step.rule_id, "base_pay");
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuditStep {
    /// The sequential step number.
    pub step_number: u32,
    /// The unique identifier of the rule that was applied.
    pub rule_id: String,
    /// The human-readable name of the rule.
    pub rule_name: String,
    /// The input data for this step.
    pub input: serde_json::Value,
    /// The output data from this step.
    pub output: serde_json::Value,
    /// Human-readable explanation of the decision.
    pub reasoning: String,
}
