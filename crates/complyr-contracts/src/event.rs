//! Tool-usage event types.
//!
//! A `ToolUsageEvent` is the fact record a caller submits for evaluation:
//! which AI tool was used, by whom, for what kind of work, under which
//! tenant and policy snapshot. Events are immutable input; nothing in the
//! evaluation path mutates them.

use serde::{Deserialize, Serialize};

/// The AI tool the event reports on.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ToolRef {
    /// Stable tool identifier (e.g. "mj-v5").
    pub id: String,
    /// Display name matched by rules (e.g. "Midjourney").
    pub name: String,
    /// Version string as reported by the tool. Not necessarily valid semver.
    pub version: String,
}

/// The person or service account that used the tool.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Actor {
    /// Role name within the tenant (e.g. "marketer", "designer").
    pub role: String,
}

/// The kind of work the tool was used for.
///
/// Wire names are the variant names verbatim (`"FinalAssetGeneration"`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ActionType {
    Research,
    Drafting,
    InternalConcept,
    FinalAssetGeneration,
    Other,
}

impl ActionType {
    /// All variants, in declaration order.
    pub const ALL: [ActionType; 5] = [
        ActionType::Research,
        ActionType::Drafting,
        ActionType::InternalConcept,
        ActionType::FinalAssetGeneration,
        ActionType::Other,
    ];

    /// The wire name of this action type, as rules reference it.
    pub fn as_str(self) -> &'static str {
        match self {
            ActionType::Research => "Research",
            ActionType::Drafting => "Drafting",
            ActionType::InternalConcept => "InternalConcept",
            ActionType::FinalAssetGeneration => "FinalAssetGeneration",
            ActionType::Other => "Other",
        }
    }
}

/// What the actor did with the tool.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Action {
    #[serde(rename = "type")]
    pub kind: ActionType,
    /// Free-text note from the submitter.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub note: Option<String>,
}

/// Tenant scope of the event.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EventContext {
    /// Tenant the event belongs to. Trusted as already authenticated upstream.
    pub tenant_id: String,
    /// The effective policy snapshot the caller evaluated against; echoed
    /// back in every verdict.
    pub policy_snapshot_id: String,
}

/// A single AI tool usage submission.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ToolUsageEvent {
    pub tool: ToolRef,
    pub actor: Actor,
    pub action: Action,
    pub context: EventContext,
    /// ISO-8601 / RFC 3339 timestamp, kept as submitted.
    pub ts: String,
}
