//! Built-in reference rule set and scenarios.
//!
//! Used by `complyr scenarios` as a smoke test of a build: each scenario
//! names the status the reference rules must produce.

use serde_json::json;

use complyr_contracts::{
    event::{Action, ActionType, Actor, EventContext, ToolRef, ToolUsageEvent},
    rule::{ConditionNode, PolicyRule, RuleDecision},
    verdict::{Verdict, VerdictStatus},
};
use complyr_core::traits::PolicyEvaluator;

pub struct Scenario {
    pub name: &'static str,
    pub event: ToolUsageEvent,
    pub expected: VerdictStatus,
}

pub struct ScenarioOutcome {
    pub name: &'static str,
    pub expected: VerdictStatus,
    pub verdict: Verdict,
}

impl ScenarioOutcome {
    pub fn passed(&self) -> bool {
        self.verdict.status == self.expected
    }
}

/// Midjourney below 6.0.0 is prohibited (priority 10); unknown or N/A
/// versions go to review (priority 50).
pub fn reference_rules() -> Vec<PolicyRule> {
    vec![
        PolicyRule {
            rule_id: "R1-PROHIBIT-OLD-MJ".to_string(),
            name: Some("Prohibit Midjourney < 6.0.0".to_string()),
            priority: 10,
            is_active: true,
            context_id: Some("global-media-tools".to_string()),
            conditions: ConditionNode::all(vec![
                ConditionNode::clause("tool.name", "equals", json!("Midjourney")),
                ConditionNode::clause("tool.version", "semver_less_than", json!("6.0.0")),
            ]),
            decision: RuleDecision {
                status: VerdictStatus::Prohibited,
                reason: "Midjourney versions older than 6.0.0 are not compliant with current security standards."
                    .to_string(),
                audit_trigger: true,
            },
        },
        PolicyRule {
            rule_id: "R2-REVIEW-UNKNOWN".to_string(),
            name: Some("Review Unknown/Unversioned Tools".to_string()),
            priority: 50,
            is_active: true,
            context_id: Some("global-media-tools".to_string()),
            conditions: ConditionNode::any(vec![
                ConditionNode::clause("tool.version", "equals", json!("unknown")),
                ConditionNode::clause("tool.version", "equals", json!("N/A")),
            ]),
            decision: RuleDecision {
                status: VerdictStatus::RequiresReview,
                reason: "Tool version information is missing or unrecognized, requiring manual safety review."
                    .to_string(),
                audit_trigger: false,
            },
        },
    ]
}

fn event(id: &str, name: &str, version: &str, role: &str, kind: ActionType, ts: &str) -> ToolUsageEvent {
    ToolUsageEvent {
        tool: ToolRef {
            id: id.to_string(),
            name: name.to_string(),
            version: version.to_string(),
        },
        actor: Actor {
            role: role.to_string(),
        },
        action: Action { kind, note: None },
        context: EventContext {
            tenant_id: "test-tenant".to_string(),
            policy_snapshot_id: "v1".to_string(),
        },
        ts: ts.to_string(),
    }
}

/// The three reference events, stamped with `ts`.
pub fn reference_scenarios(ts: &str) -> Vec<Scenario> {
    vec![
        Scenario {
            name: "Old Midjourney is prohibited",
            event: event("mj-v5", "Midjourney", "5.2.0", "designer", ActionType::FinalAssetGeneration, ts),
            expected: VerdictStatus::Prohibited,
        },
        Scenario {
            name: "Unknown version requires review",
            event: event("dalle", "DALL-E", "unknown", "marketer", ActionType::InternalConcept, ts),
            expected: VerdictStatus::RequiresReview,
        },
        Scenario {
            name: "New Midjourney falls back to review",
            event: event("mj-v6", "Midjourney", "6.1.0", "designer", ActionType::FinalAssetGeneration, ts),
            expected: VerdictStatus::RequiresReview,
        },
    ]
}

/// Evaluate every scenario against `rules`.
pub fn run(
    evaluator: &dyn PolicyEvaluator,
    rules: &[PolicyRule],
    scenarios: Vec<Scenario>,
) -> Vec<ScenarioOutcome> {
    scenarios
        .into_iter()
        .map(|scenario| ScenarioOutcome {
            name: scenario.name,
            expected: scenario.expected,
            verdict: evaluator.evaluate(&scenario.event, rules),
        })
        .collect()
}
