//! Policy rule and condition tree types.
//!
//! Rules are authored elsewhere and handed to the evaluator on every call.
//! Each rule carries a recursive condition tree whose leaves compare one
//! event field against a literal value.

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::verdict::VerdictStatus;

/// Boolean combinator of a condition group.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum LogicalOperator {
    #[serde(rename = "AND")]
    And,
    #[serde(rename = "OR")]
    Or,
}

/// Comparison applied by a leaf clause.
///
/// Operators outside the known set are kept as `Unknown` so a rule using
/// one still parses; such a clause never matches.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum ClauseOperator {
    Equals,
    NotEquals,
    In,
    NotIn,
    SemverLessThan,
    SemverGreaterThan,
    SemverSatisfies,
    Unknown(String),
}

impl ClauseOperator {
    /// The wire name of this operator.
    pub fn as_str(&self) -> &str {
        match self {
            ClauseOperator::Equals => "equals",
            ClauseOperator::NotEquals => "not_equals",
            ClauseOperator::In => "in",
            ClauseOperator::NotIn => "not_in",
            ClauseOperator::SemverLessThan => "semver_less_than",
            ClauseOperator::SemverGreaterThan => "semver_greater_than",
            ClauseOperator::SemverSatisfies => "semver_satisfies",
            ClauseOperator::Unknown(name) => name,
        }
    }
}

impl From<String> for ClauseOperator {
    fn from(name: String) -> Self {
        match name.as_str() {
            "equals" => ClauseOperator::Equals,
            "not_equals" => ClauseOperator::NotEquals,
            "in" => ClauseOperator::In,
            "not_in" => ClauseOperator::NotIn,
            "semver_less_than" => ClauseOperator::SemverLessThan,
            "semver_greater_than" => ClauseOperator::SemverGreaterThan,
            "semver_satisfies" => ClauseOperator::SemverSatisfies,
            _ => ClauseOperator::Unknown(name),
        }
    }
}

impl From<ClauseOperator> for String {
    fn from(op: ClauseOperator) -> Self {
        match op {
            ClauseOperator::Unknown(name) => name,
            known => known.as_str().to_string(),
        }
    }
}

/// A leaf predicate: `field <operator> value`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ConditionClause {
    /// Dotted path into the event, e.g. `"tool.version"`.
    pub field: String,
    pub operator: ClauseOperator,
    /// Literal to compare against. A string for scalar operators, an array
    /// for `in` / `not_in`, a semver range string for `semver_satisfies`.
    #[serde(default)]
    pub value: Value,
}

/// A group of child nodes combined with AND or OR.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ConditionTree {
    pub operator: LogicalOperator,
    pub clauses: Vec<ConditionNode>,
}

/// One node of a condition tree.
///
/// The variant is decided when the rule is parsed: an object is a `Group`
/// only when its `operator` is exactly `"AND"` or `"OR"` and it carries a
/// `clauses` array. Everything else is read as a `Clause`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ConditionNode {
    Group(ConditionTree),
    Clause(ConditionClause),
}

impl ConditionNode {
    /// Build an AND group.
    pub fn all(clauses: Vec<ConditionNode>) -> Self {
        ConditionNode::Group(ConditionTree {
            operator: LogicalOperator::And,
            clauses,
        })
    }

    /// Build an OR group.
    pub fn any(clauses: Vec<ConditionNode>) -> Self {
        ConditionNode::Group(ConditionTree {
            operator: LogicalOperator::Or,
            clauses,
        })
    }

    /// Build a leaf clause.
    pub fn clause(field: impl Into<String>, operator: impl Into<String>, value: Value) -> Self {
        ConditionNode::Clause(ConditionClause {
            field: field.into(),
            operator: ClauseOperator::from(operator.into()),
            value,
        })
    }
}

/// The outcome a rule produces when its conditions match.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RuleDecision {
    pub status: VerdictStatus,
    /// Human-readable justification returned to the caller.
    pub reason: String,
    /// Marks decisions that compliance wants flagged in the audit ledger.
    #[serde(default)]
    pub audit_trigger: bool,
}

/// A single policy rule as delivered by the policy-authoring system.
///
/// Rows straight from the rules table carry bookkeeping columns
/// (`created_at`, `id`, ...); unknown fields are ignored.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PolicyRule {
    /// Stable identifier echoed in the verdict.
    pub rule_id: String,

    /// Optional display name for operator tooling.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,

    /// Lower number wins.
    pub priority: i64,

    /// Inactive rules are never selected.
    #[serde(default)]
    pub is_active: bool,

    /// The policy context the rule was authored under.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub context_id: Option<String>,

    pub conditions: ConditionNode,

    pub decision: RuleDecision,
}
