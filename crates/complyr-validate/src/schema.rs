//! The JSON Schema document describing a `policy-evaluate` request body.
//!
//! Extra properties are allowed everywhere: rule documents are often
//! database rows with bookkeeping columns.

use serde_json::{json, Value};

use complyr_contracts::{event::ActionType, verdict::VerdictStatus};

/// Build the request schema (draft 2020-12).
pub fn request_schema() -> Value {
    let action_types: Vec<&str> = ActionType::ALL.iter().map(|a| a.as_str()).collect();
    let statuses: Vec<&str> = [
        VerdictStatus::Approved,
        VerdictStatus::Prohibited,
        VerdictStatus::RequiresReview,
    ]
    .iter()
    .map(|s| s.as_str())
    .collect();

    json!({
        "$schema": "https://json-schema.org/draft/2020-12/schema",
        "$id": "https://complyr.dev/schemas/policy-evaluate-request.json",
        "type": "object",
        "required": ["event", "rules"],
        "properties": {
            "event": { "$ref": "#/$defs/event" },
            "rules": {
                "type": "array",
                "items": { "$ref": "#/$defs/rule" }
            }
        },
        "$defs": {
            "event": {
                "type": "object",
                "required": ["tool", "actor", "action", "context", "ts"],
                "properties": {
                    "tool": {
                        "type": "object",
                        "required": ["id", "name", "version"],
                        "properties": {
                            "id": { "type": "string" },
                            "name": { "type": "string" },
                            "version": { "type": "string" }
                        }
                    },
                    "actor": {
                        "type": "object",
                        "required": ["role"],
                        "properties": { "role": { "type": "string" } }
                    },
                    "action": {
                        "type": "object",
                        "required": ["type"],
                        "properties": {
                            "type": { "enum": action_types },
                            "note": { "type": "string" }
                        }
                    },
                    "context": {
                        "type": "object",
                        "required": ["tenantId", "policySnapshotId"],
                        "properties": {
                            "tenantId": { "type": "string" },
                            "policySnapshotId": { "type": "string" }
                        }
                    },
                    "ts": { "type": "string" }
                }
            },
            "rule": {
                "type": "object",
                "required": ["rule_id", "priority", "conditions", "decision"],
                "properties": {
                    "rule_id": { "type": "string" },
                    "name": { "type": "string" },
                    "priority": { "type": "integer" },
                    "is_active": { "type": "boolean" },
                    "context_id": { "type": "string" },
                    "conditions": { "$ref": "#/$defs/node" },
                    "decision": {
                        "type": "object",
                        "required": ["status", "reason"],
                        "properties": {
                            "status": { "enum": statuses },
                            "reason": { "type": "string" },
                            "audit_trigger": { "type": "boolean" }
                        }
                    }
                }
            },
            "node": {
                "anyOf": [
                    { "$ref": "#/$defs/group" },
                    { "$ref": "#/$defs/clause" }
                ]
            },
            "group": {
                "type": "object",
                "required": ["operator", "clauses"],
                "properties": {
                    "operator": { "enum": ["AND", "OR"] },
                    "clauses": {
                        "type": "array",
                        "items": { "$ref": "#/$defs/node" }
                    }
                }
            },
            "clause": {
                "type": "object",
                "required": ["field", "operator"],
                "properties": {
                    "field": { "type": "string" },
                    "operator": { "type": "string" }
                }
            }
        }
    })
}
