//! Verdict types returned by the evaluator.

use serde::{Deserialize, Serialize};

/// Reason attached to the fallback verdict when no active rule matches.
pub const NO_MATCH_REASON: &str = "No matching rule; defaulting to human review";

/// The three possible governance outcomes.
///
/// There is deliberately no "unknown" variant: ambiguity is expressed as
/// `RequiresReview`, which routes the submission to a human.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum VerdictStatus {
    Approved,
    Prohibited,
    RequiresReview,
}

impl VerdictStatus {
    pub fn as_str(self) -> &'static str {
        match self {
            VerdictStatus::Approved => "Approved",
            VerdictStatus::Prohibited => "Prohibited",
            VerdictStatus::RequiresReview => "RequiresReview",
        }
    }
}

/// The single decision produced for one evaluation call.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Verdict {
    pub status: VerdictStatus,
    pub reason: String,
    /// The rule that decided the outcome. Absent on the fallback verdict.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub rule_id: Option<String>,
    #[serde(
        rename = "policySnapshotId",
        default,
        skip_serializing_if = "Option::is_none"
    )]
    pub policy_snapshot_id: Option<String>,
}

impl Verdict {
    /// The fail-safe verdict used when no active rule matched.
    pub fn requires_review(policy_snapshot_id: impl Into<String>) -> Self {
        Self {
            status: VerdictStatus::RequiresReview,
            reason: NO_MATCH_REASON.to_string(),
            rule_id: None,
            policy_snapshot_id: Some(policy_snapshot_id.into()),
        }
    }

    /// True when this verdict came from the no-match fallback.
    pub fn is_fallback(&self) -> bool {
        self.rule_id.is_none() && self.status == VerdictStatus::RequiresReview
    }
}
