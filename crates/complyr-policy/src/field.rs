//! Dotted-path field lookup on a `ToolUsageEvent`.
//!
//! Rules address event fields by string path (`"tool.version"`). The set of
//! addressable paths is fixed by the event type, so lookup is a plain match
//! rather than a walk over untyped JSON. Every leaf of the event is a
//! string, which keeps clause comparison string-typed.

use complyr_contracts::event::ToolUsageEvent;

/// Every path `resolve_field` understands.
pub const FIELD_PATHS: [&str; 9] = [
    "tool.id",
    "tool.name",
    "tool.version",
    "actor.role",
    "action.type",
    "action.note",
    "context.tenantId",
    "context.policySnapshotId",
    "ts",
];

/// Resolve `path` against `event`.
///
/// Returns `None` for unknown paths, for intermediate objects (`"tool"`),
/// and for `action.note` when the event carries no note.
pub fn resolve_field<'e>(event: &'e ToolUsageEvent, path: &str) -> Option<&'e str> {
    match path {
        "tool.id" => Some(&event.tool.id),
        "tool.name" => Some(&event.tool.name),
        "tool.version" => Some(&event.tool.version),
        "actor.role" => Some(&event.actor.role),
        "action.type" => Some(event.action.kind.as_str()),
        "action.note" => event.action.note.as_deref(),
        "context.tenantId" => Some(&event.context.tenant_id),
        "context.policySnapshotId" => Some(&event.context.policy_snapshot_id),
        "ts" => Some(&event.ts),
        _ => None,
    }
}
