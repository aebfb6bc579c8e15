//! Rule selection.
//!
//! `RuleEngine` implements the `PolicyEvaluator` trait from complyr-core.
//!
//! Evaluation algorithm:
//!
//! 1. Keep only rules with `is_active == true`.
//! 2. Stable-sort them ascending by `priority`; equal priorities keep their
//!    input order.
//! 3. The first rule whose condition tree matches the event decides the
//!    verdict.
//! 4. If nothing matches → `RequiresReview` with the fixed fallback reason.
//!
//! There is no path to `Approved` other than an explicit matching rule.

use tracing::{debug, info, warn};

use complyr_contracts::{event::ToolUsageEvent, rule::PolicyRule, verdict::Verdict};
use complyr_core::traits::{PolicyEvaluator, Selection};

use crate::condition::evaluate_clause;

/// The stateless, priority-ordered rule evaluator.
#[derive(Debug, Clone, Copy, Default)]
pub struct RuleEngine;

impl RuleEngine {
    pub fn new() -> Self {
        Self
    }
}

impl PolicyEvaluator for RuleEngine {
    fn select<'r>(&self, event: &ToolUsageEvent, rules: &'r [PolicyRule]) -> Selection<'r> {
        select(event, rules)
    }
}

/// Pick the governing rule for `event` and build its verdict.
pub fn evaluate(event: &ToolUsageEvent, rules: &[PolicyRule]) -> Verdict {
    select(event, rules).verdict
}

/// Like [`evaluate`], also handing back the deciding rule.
pub fn select<'r>(event: &ToolUsageEvent, rules: &'r [PolicyRule]) -> Selection<'r> {
    let snapshot = &event.context.policy_snapshot_id;

    let mut active: Vec<&'r PolicyRule> = rules.iter().filter(|r| r.is_active).collect();
    active.sort_by_key(|r| r.priority);

    debug!(
        tool = %event.tool.name,
        version = %event.tool.version,
        action = event.action.kind.as_str(),
        active_rules = active.len(),
        inactive_rules = rules.len() - active.len(),
        "evaluating rules"
    );

    for rule in active {
        if !evaluate_clause(event, &rule.conditions) {
            continue;
        }

        info!(
            rule_id = %rule.rule_id,
            priority = rule.priority,
            status = rule.decision.status.as_str(),
            policy_snapshot_id = %snapshot,
            "rule matched"
        );

        return Selection {
            verdict: Verdict {
                status: rule.decision.status,
                reason: rule.decision.reason.clone(),
                rule_id: Some(rule.rule_id.clone()),
                policy_snapshot_id: Some(snapshot.clone()),
            },
            rule: Some(rule),
        };
    }

    warn!(
        tool = %event.tool.name,
        tenant_id = %event.context.tenant_id,
        policy_snapshot_id = %snapshot,
        "no active rule matched; defaulting to human review"
    );

    Selection {
        verdict: Verdict::requires_review(snapshot.clone()),
        rule: None,
    }
}
