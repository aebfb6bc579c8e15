//! Request envelope and audit record types.
//!
//! `EvaluationRequest` is the typed body of a `policy-evaluate` call.
//! `EvaluationRecord` is what the audit writer receives once the verdict
//! has been returned, one record per evaluation.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::{event::ToolUsageEvent, rule::PolicyRule, verdict::Verdict};

/// Unique identifier for one evaluation call, present in every audit entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct EvaluationId(pub uuid::Uuid);

impl EvaluationId {
    pub fn new() -> Self {
        Self(uuid::Uuid::new_v4())
    }
}

impl Default for EvaluationId {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Display for EvaluationId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        self.0.fmt(f)
    }
}

/// The body of a `policy-evaluate` request after validation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EvaluationRequest {
    pub event: ToolUsageEvent,
    pub rules: Vec<PolicyRule>,
}

/// An immutable record of one evaluation, written to the audit ledger.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EvaluationRecord {
    pub evaluation_id: EvaluationId,
    /// The event exactly as evaluated.
    pub event: ToolUsageEvent,
    /// The verdict returned to the caller.
    pub verdict: Verdict,
    /// Copied from the deciding rule's `decision.audit_trigger`; false on
    /// the fallback verdict.
    pub audit_trigger: bool,
    /// How many active rules were in play.
    pub rules_considered: usize,
    /// Wall-clock time (UTC) the verdict was produced.
    pub recorded_at: DateTime<Utc>,
}
