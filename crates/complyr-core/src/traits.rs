//! Trait seams of the evaluation pipeline.
//!
//! - `RequestValidator`: rejects malformed bodies before anything runs
//! - `PolicyEvaluator`: pure rule selection over a typed request
//! - `AuditWriter`: receives one record per evaluation, after the fact
//!
//! `EvaluationService` wires them together in that order.

use serde_json::Value;

use complyr_contracts::{
    error::{ComplyrResult, ValidationIssue},
    event::ToolUsageEvent,
    record::{EvaluationRecord, EvaluationRequest},
    rule::PolicyRule,
    verdict::Verdict,
};

/// The verdict together with the rule that produced it.
///
/// `rule` borrows from the evaluated rule slice and is `None` on the review
/// fallback. Rule ids are not required to be unique, so callers read
/// anything else about the deciding rule from here rather than looking it
/// up again.
#[derive(Debug, Clone, PartialEq)]
pub struct Selection<'r> {
    pub verdict: Verdict,
    pub rule: Option<&'r PolicyRule>,
}

/// Decides the verdict for one event against one rule set.
///
/// Implementations must be deterministic and side-effect free. Evaluation
/// cannot fail: anything that cannot be evaluated simply does not match,
/// and a rule set with no match yields the review fallback.
pub trait PolicyEvaluator: Send + Sync {
    fn select<'r>(&self, event: &ToolUsageEvent, rules: &'r [PolicyRule]) -> Selection<'r>;

    fn evaluate(&self, event: &ToolUsageEvent, rules: &[PolicyRule]) -> Verdict {
        self.select(event, rules).verdict
    }
}

/// Turns an untyped request body into an `EvaluationRequest`.
pub trait RequestValidator: Send + Sync {
    /// Return the typed request, or every issue found. An `Err` must never
    /// be empty.
    fn validate(&self, body: &Value) -> Result<EvaluationRequest, Vec<ValidationIssue>>;
}

/// Sink for evaluation records.
///
/// Writes happen after the verdict has been handed back, so a failing
/// writer never changes an outcome. Implementations must treat `write` as
/// append-only.
pub trait AuditWriter: Send + Sync {
    fn write(&self, record: &EvaluationRecord) -> ComplyrResult<()>;
}
