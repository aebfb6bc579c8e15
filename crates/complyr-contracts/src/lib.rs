//! # complyr-contracts
//!
//! Shared types for the COMPLYR policy evaluator.
//!
//! Every crate in the workspace imports from here. No business logic lives
//! in this crate, only data definitions, wire formats and error types.

pub mod error;
pub mod event;
pub mod record;
pub mod rule;
pub mod verdict;

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;
    use error::{ComplyrError, ValidationIssue};
    use event::{ActionType, ToolUsageEvent};
    use record::EvaluationId;
    use rule::{ClauseOperator, ConditionNode, LogicalOperator, PolicyRule};
    use verdict::{Verdict, VerdictStatus, NO_MATCH_REASON};

    // ── ConditionNode discrimination ─────────────────────────────────────────

    #[test]
    fn node_with_logical_operator_and_clauses_is_group() {
        let node: ConditionNode = serde_json::from_value(json!({
            "operator": "OR",
            "clauses": [
                { "field": "tool.version", "operator": "equals", "value": "unknown" }
            ]
        }))
        .unwrap();

        match node {
            ConditionNode::Group(tree) => {
                assert_eq!(tree.operator, LogicalOperator::Or);
                assert_eq!(tree.clauses.len(), 1);
                assert!(matches!(tree.clauses[0], ConditionNode::Clause(_)));
            }
            other => panic!("expected Group, got {:?}", other),
        }
    }

    #[test]
    fn lowercase_logical_operator_is_read_as_clause() {
        // "and" is not a group combinator, so this is a leaf with an
        // unknown operator.
        let node: ConditionNode = serde_json::from_value(json!({
            "field": "tool.name",
            "operator": "and",
            "clauses": []
        }))
        .unwrap();

        match node {
            ConditionNode::Clause(clause) => {
                assert_eq!(clause.operator, ClauseOperator::Unknown("and".to_string()));
            }
            other => panic!("expected Clause, got {:?}", other),
        }
    }

    #[test]
    fn nested_group_inside_group_parses_recursively() {
        let node: ConditionNode = serde_json::from_value(json!({
            "operator": "AND",
            "clauses": [
                { "field": "action.type", "operator": "equals", "value": "Research" },
                {
                    "operator": "OR",
                    "clauses": [
                        { "field": "actor.role", "operator": "equals", "value": "marketer" },
                        { "field": "actor.role", "operator": "equals", "value": "designer" }
                    ]
                }
            ]
        }))
        .unwrap();

        let ConditionNode::Group(outer) = node else {
            panic!("expected outer Group");
        };
        assert!(matches!(outer.clauses[1], ConditionNode::Group(_)));
    }

    #[test]
    fn clause_value_defaults_to_null() {
        let node: ConditionNode =
            serde_json::from_value(json!({ "field": "tool.id", "operator": "equals" })).unwrap();
        let ConditionNode::Clause(clause) = node else {
            panic!("expected Clause");
        };
        assert!(clause.value.is_null());
    }

    // ── ClauseOperator ───────────────────────────────────────────────────────

    #[test]
    fn known_operators_map_to_variants() {
        for (name, op) in [
            ("equals", ClauseOperator::Equals),
            ("not_equals", ClauseOperator::NotEquals),
            ("in", ClauseOperator::In),
            ("not_in", ClauseOperator::NotIn),
            ("semver_less_than", ClauseOperator::SemverLessThan),
            ("semver_greater_than", ClauseOperator::SemverGreaterThan),
            ("semver_satisfies", ClauseOperator::SemverSatisfies),
        ] {
            assert_eq!(ClauseOperator::from(name.to_string()), op);
            assert_eq!(op.as_str(), name);
        }
    }

    #[test]
    fn unknown_operator_keeps_its_name_on_serialize() {
        let op = ClauseOperator::from("starts_with".to_string());
        assert_eq!(serde_json::to_value(&op).unwrap(), json!("starts_with"));
    }

    // ── PolicyRule ───────────────────────────────────────────────────────────

    #[test]
    fn rule_from_database_row_ignores_extra_columns() {
        let rule: PolicyRule = serde_json::from_value(json!({
            "rule_id": "R1-PROHIBIT-OLD-MJ",
            "name": "Prohibit Midjourney < 6.0.0",
            "priority": 10,
            "is_active": true,
            "context_id": "global-media-tools",
            "created_at": "2024-03-01T00:00:00Z",
            "conditions": {
                "operator": "AND",
                "clauses": [
                    { "field": "tool.name", "operator": "equals", "value": "Midjourney" }
                ]
            },
            "decision": {
                "status": "Prohibited",
                "reason": "outdated",
                "audit_trigger": true
            }
        }))
        .unwrap();

        assert_eq!(rule.priority, 10);
        assert!(rule.is_active);
        assert_eq!(rule.name.as_deref(), Some("Prohibit Midjourney < 6.0.0"));
        assert!(rule.decision.audit_trigger);
        assert_eq!(rule.decision.status, VerdictStatus::Prohibited);
    }

    #[test]
    fn rule_without_is_active_is_inactive() {
        let rule: PolicyRule = serde_json::from_value(json!({
            "rule_id": "r",
            "priority": 1,
            "conditions": { "operator": "AND", "clauses": [] },
            "decision": { "status": "Approved", "reason": "ok" }
        }))
        .unwrap();

        assert!(!rule.is_active);
        assert!(!rule.decision.audit_trigger);
        assert!(rule.context_id.is_none());
    }

    #[test]
    fn unknown_decision_status_is_rejected() {
        let result: Result<PolicyRule, _> = serde_json::from_value(json!({
            "rule_id": "r",
            "priority": 1,
            "is_active": true,
            "conditions": { "operator": "AND", "clauses": [] },
            "decision": { "status": "Maybe", "reason": "?" }
        }));
        assert!(result.is_err());
    }

    // ── Event ────────────────────────────────────────────────────────────────

    #[test]
    fn event_uses_camel_case_context_fields() {
        let event: ToolUsageEvent = serde_json::from_value(json!({
            "tool": { "id": "t1", "name": "Midjourney", "version": "1.4.0" },
            "actor": { "role": "marketer" },
            "action": { "type": "FinalAssetGeneration" },
            "context": { "tenantId": "acme", "policySnapshotId": "snap1" },
            "ts": "2024-01-01T00:00:00Z"
        }))
        .unwrap();

        assert_eq!(event.context.tenant_id, "acme");
        assert_eq!(event.context.policy_snapshot_id, "snap1");
        assert_eq!(event.action.kind, ActionType::FinalAssetGeneration);
        assert!(event.action.note.is_none());
    }

    #[test]
    fn action_type_wire_names_match_serde() {
        for kind in ActionType::ALL {
            assert_eq!(serde_json::to_value(kind).unwrap(), json!(kind.as_str()));
        }
    }

    // ── Verdict ──────────────────────────────────────────────────────────────

    #[test]
    fn fallback_verdict_omits_rule_id() {
        let verdict = Verdict::requires_review("snap1");
        let json = serde_json::to_value(&verdict).unwrap();

        assert_eq!(
            json,
            json!({
                "status": "RequiresReview",
                "reason": NO_MATCH_REASON,
                "policySnapshotId": "snap1"
            })
        );
        assert!(verdict.is_fallback());
    }

    #[test]
    fn matched_verdict_serializes_all_fields() {
        let verdict = Verdict {
            status: VerdictStatus::Prohibited,
            reason: "Final assets require legal review".to_string(),
            rule_id: Some("r1".to_string()),
            policy_snapshot_id: Some("snap1".to_string()),
        };
        let json = serde_json::to_value(&verdict).unwrap();

        assert_eq!(json["status"], "Prohibited");
        assert_eq!(json["rule_id"], "r1");
        assert_eq!(json["policySnapshotId"], "snap1");
        assert!(!verdict.is_fallback());
    }

    // ── EvaluationId ─────────────────────────────────────────────────────────

    #[test]
    fn evaluation_ids_are_unique() {
        let ids: std::collections::HashSet<String> =
            (0..100).map(|_| EvaluationId::new().to_string()).collect();
        assert_eq!(ids.len(), 100);
    }

    // ── Errors ───────────────────────────────────────────────────────────────

    #[test]
    fn validation_error_counts_issues() {
        let err = ComplyrError::Validation {
            issues: vec![
                ValidationIssue::new("/event/tool", "\"version\" is a required property"),
                ValidationIssue::new("/rules", "expected array"),
            ],
        };
        assert_eq!(err.to_string(), "request validation failed with 2 issue(s)");
    }

    #[test]
    fn config_error_names_its_reason() {
        let err = ComplyrError::Config {
            reason: "missing listen address".to_string(),
        };
        assert!(err.to_string().contains("configuration error"));
        assert!(err.to_string().contains("missing listen address"));
    }

    #[test]
    fn issue_display_includes_path() {
        let issue = ValidationIssue::new("/event/ts", "not an RFC 3339 timestamp");
        assert_eq!(issue.to_string(), "/event/ts: not an RFC 3339 timestamp");
        assert_eq!(ValidationIssue::new("", "bad json").to_string(), "bad json");
    }
}
