//! Request validator for the `policy-evaluate` endpoint.
//!
//! `SchemaValidator` implements the `RequestValidator` trait from
//! `complyr-core`. Validation runs in three phases:
//!
//! 1. **Structural**: the body is validated against [`request_schema`]
//!    with the `jsonschema` crate. Every violation becomes one issue.
//! 2. **Typing**: the body is deserialized into `EvaluationRequest`.
//! 3. **Semantic**: checks JSON Schema cannot express (`event.ts` must be
//!    an RFC 3339 timestamp).
//!
//! A phase only runs when the previous one produced no issues.

use chrono::DateTime;
use serde_json::Value;
use tracing::{debug, warn};

use complyr_contracts::{
    error::{ComplyrError, ComplyrResult, ValidationIssue},
    record::EvaluationRequest,
};
use complyr_core::traits::RequestValidator;

use crate::schema::request_schema;

/// Validates request bodies against the compiled request schema.
pub struct SchemaValidator {
    validator: jsonschema::Validator,
}

impl SchemaValidator {
    /// Compile the request schema.
    ///
    /// Returns `ComplyrError::Schema` if the schema document is rejected by
    /// the compiler.
    pub fn new() -> ComplyrResult<Self> {
        let validator =
            jsonschema::validator_for(&request_schema()).map_err(|e| ComplyrError::Schema {
                reason: format!("request schema failed to compile: {e}"),
            })?;
        Ok(Self { validator })
    }

    fn structural_issues(&self, body: &Value) -> Vec<ValidationIssue> {
        self.validator
            .iter_errors(body)
            .map(|error| ValidationIssue::new(error.instance_path.to_string(), error.to_string()))
            .collect()
    }

    fn semantic_issues(request: &EvaluationRequest) -> Vec<ValidationIssue> {
        let mut issues = Vec::new();
        if let Err(e) = DateTime::parse_from_rfc3339(&request.event.ts) {
            issues.push(ValidationIssue::new(
                "/event/ts",
                format!("'{}' is not an RFC 3339 timestamp: {e}", request.event.ts),
            ));
        }
        issues
    }
}

impl RequestValidator for SchemaValidator {
    fn validate(&self, body: &Value) -> Result<EvaluationRequest, Vec<ValidationIssue>> {
        // ── Phase 1: JSON Schema ──────────────────────────────────────────────
        let issues = self.structural_issues(body);
        if !issues.is_empty() {
            for issue in &issues {
                warn!(path = %issue.path, message = %issue.message, "structural validation failure");
            }
            return Err(issues);
        }

        // ── Phase 2: typed deserialization ────────────────────────────────────
        let request: EvaluationRequest = serde_json::from_value(body.clone()).map_err(|e| {
            warn!(error = %e, "request passed schema but failed to deserialize");
            vec![ValidationIssue::new("", format!("request body has an invalid shape: {e}"))]
        })?;

        // ── Phase 3: semantic checks ──────────────────────────────────────────
        let issues = Self::semantic_issues(&request);
        if !issues.is_empty() {
            for issue in &issues {
                warn!(path = %issue.path, message = %issue.message, "semantic validation failure");
            }
            return Err(issues);
        }

        debug!(rule_count = request.rules.len(), "request validated");
        Ok(request)
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use serde_json::json;

    use complyr_contracts::{event::ActionType, rule::ConditionNode};
    use complyr_core::traits::RequestValidator;

    use super::SchemaValidator;

    // ── Builder helpers ───────────────────────────────────────────────────────

    fn valid_body() -> serde_json::Value {
        json!({
            "event": {
                "tool": { "id": "t1", "name": "Midjourney", "version": "1.4.0" },
                "actor": { "role": "marketer" },
                "action": { "type": "FinalAssetGeneration", "note": "hero banner" },
                "context": { "tenantId": "acme", "policySnapshotId": "snap1" },
                "ts": "2024-01-01T00:00:00Z"
            },
            "rules": [{
                "rule_id": "r1",
                "priority": 1,
                "is_active": true,
                "context_id": "c1",
                "conditions": {
                    "operator": "AND",
                    "clauses": [
                        { "field": "action.type", "operator": "equals", "value": "FinalAssetGeneration" },
                        {
                            "operator": "OR",
                            "clauses": [
                                { "field": "tool.version", "operator": "semver_greater_than", "value": "1.0.0" }
                            ]
                        }
                    ]
                },
                "decision": { "status": "Prohibited", "reason": "Final assets require legal review" }
            }]
        })
    }

    fn validator() -> SchemaValidator {
        SchemaValidator::new().unwrap()
    }

    // ── Accepting ─────────────────────────────────────────────────────────────

    #[test]
    fn valid_body_produces_typed_request() {
        let request = validator().validate(&valid_body()).unwrap();

        assert_eq!(request.event.tool.version, "1.4.0");
        assert_eq!(request.event.action.kind, ActionType::FinalAssetGeneration);
        assert_eq!(request.event.action.note.as_deref(), Some("hero banner"));
        assert_eq!(request.rules.len(), 1);
        let ConditionNode::Group(tree) = &request.rules[0].conditions else {
            panic!("expected group conditions");
        };
        assert!(matches!(tree.clauses[1], ConditionNode::Group(_)));
    }

    #[test]
    fn empty_rule_list_is_valid() {
        let mut body = valid_body();
        body["rules"] = json!([]);
        assert!(validator().validate(&body).is_ok());
    }

    #[test]
    fn non_semver_version_string_is_structurally_fine() {
        let mut body = valid_body();
        body["event"]["tool"]["version"] = json!("unknown");
        assert!(validator().validate(&body).is_ok());
    }

    #[test]
    fn extra_columns_on_rules_are_accepted() {
        let mut body = valid_body();
        body["rules"][0]["created_at"] = json!("2024-01-01T00:00:00Z");
        body["rules"][0]["id"] = json!(42);
        assert!(validator().validate(&body).is_ok());
    }

    // ── Rejecting ─────────────────────────────────────────────────────────────

    #[test]
    fn missing_tool_version_is_rejected() {
        let mut body = valid_body();
        body["event"]["tool"]
            .as_object_mut()
            .unwrap()
            .remove("version");

        let issues = validator().validate(&body).unwrap_err();

        assert!(!issues.is_empty());
        let issue = issues
            .iter()
            .find(|i| i.path == "/event/tool")
            .expect("an issue must point at /event/tool");
        assert!(issue.message.contains("version"), "message: {}", issue.message);
    }

    #[test]
    fn every_structural_problem_is_reported() {
        let mut body = valid_body();
        body["event"]["action"]["type"] = json!("Painting");
        body["rules"][0]["priority"] = json!("high");

        let issues = validator().validate(&body).unwrap_err();
        let paths: Vec<&str> = issues.iter().map(|i| i.path.as_str()).collect();

        assert!(paths.contains(&"/event/action/type"), "paths: {paths:?}");
        assert!(paths.contains(&"/rules/0/priority"), "paths: {paths:?}");
    }

    #[test]
    fn unknown_decision_status_is_rejected() {
        let mut body = valid_body();
        body["rules"][0]["decision"]["status"] = json!("Allowed");

        let issues = validator().validate(&body).unwrap_err();
        assert!(issues.iter().any(|i| i.path == "/rules/0/decision/status"));
    }

    #[test]
    fn missing_rules_array_is_rejected() {
        let mut body = valid_body();
        body.as_object_mut().unwrap().remove("rules");
        assert!(validator().validate(&body).is_err());
    }

    #[test]
    fn malformed_condition_node_is_rejected() {
        let mut body = valid_body();
        // Neither a group (no clauses) nor a clause (no field).
        body["rules"][0]["conditions"] = json!({ "operator": "AND" });

        let issues = validator().validate(&body).unwrap_err();
        assert!(issues.iter().any(|i| i.path == "/rules/0/conditions"));
    }

    #[test]
    fn non_rfc3339_timestamp_is_rejected() {
        let mut body = valid_body();
        body["event"]["ts"] = json!("yesterday");

        let issues = validator().validate(&body).unwrap_err();
        assert_eq!(issues.len(), 1);
        assert_eq!(issues[0].path, "/event/ts");
    }

    #[test]
    fn non_object_body_is_rejected() {
        assert!(validator().validate(&json!([1, 2, 3])).is_err());
        assert!(validator().validate(&json!(null)).is_err());
    }
}
