//! Condition tree evaluation.
//!
//! A group combines its children with AND (every child true) or OR (at
//! least one child true). An empty AND is true and an empty OR is false.
//!
//! A leaf compares one event field with a literal. Any leaf that cannot be
//! evaluated is false: an unresolvable field, a non-array operand for
//! `in`/`not_in`, an invalid version on either side of a semver operator,
//! or an unknown operator. The negated operators are no exception, so a
//! broken clause can never turn into a match.

use std::cmp::Ordering;

use serde_json::Value;
use tracing::debug;

use complyr_contracts::{
    event::ToolUsageEvent,
    rule::{ClauseOperator, ConditionClause, ConditionNode, ConditionTree, LogicalOperator},
};

use crate::{
    field::resolve_field,
    version::{compare, parse_version, VersionRange},
};

/// Decide whether `event` satisfies `node`.
pub fn evaluate_clause(event: &ToolUsageEvent, node: &ConditionNode) -> bool {
    match node {
        ConditionNode::Group(tree) => evaluate_tree(event, tree),
        ConditionNode::Clause(clause) => evaluate_leaf(event, clause),
    }
}

/// Evaluate a group node.
pub fn evaluate_tree(event: &ToolUsageEvent, tree: &ConditionTree) -> bool {
    match tree.operator {
        LogicalOperator::And => tree.clauses.iter().all(|c| evaluate_clause(event, c)),
        LogicalOperator::Or => tree.clauses.iter().any(|c| evaluate_clause(event, c)),
    }
}

fn evaluate_leaf(event: &ToolUsageEvent, clause: &ConditionClause) -> bool {
    let Some(actual) = resolve_field(event, &clause.field) else {
        debug!(field = %clause.field, "clause field does not resolve; clause is false");
        return false;
    };

    match &clause.operator {
        ClauseOperator::Equals => clause.value.as_str() == Some(actual),
        ClauseOperator::NotEquals => clause.value.as_str() != Some(actual),
        ClauseOperator::In => member_of(&clause.value, actual).unwrap_or(false),
        ClauseOperator::NotIn => member_of(&clause.value, actual).is_some_and(|found| !found),
        ClauseOperator::SemverLessThan => semver_order(actual, &clause.value) == Some(Ordering::Less),
        ClauseOperator::SemverGreaterThan => {
            semver_order(actual, &clause.value) == Some(Ordering::Greater)
        }
        ClauseOperator::SemverSatisfies => semver_satisfies(actual, &clause.value),
        ClauseOperator::Unknown(name) => {
            debug!(field = %clause.field, operator = %name, "unknown clause operator; clause is false");
            false
        }
    }
}

/// `Some(found)` when `list` is an array, `None` otherwise.
fn member_of(list: &Value, actual: &str) -> Option<bool> {
    list.as_array()
        .map(|items| items.iter().any(|item| item.as_str() == Some(actual)))
}

fn semver_order(actual: &str, expected: &Value) -> Option<Ordering> {
    let actual = parse_version(actual)?;
    let expected = parse_version(expected.as_str()?)?;
    Some(compare(&actual, &expected))
}

fn semver_satisfies(actual: &str, range: &Value) -> bool {
    let Some(version) = parse_version(actual) else {
        return false;
    };
    range
        .as_str()
        .and_then(VersionRange::parse)
        .is_some_and(|range| range.matches(&version))
}
