//! The evaluation pipeline.
//!
//!   Body → Parse → Validate → Evaluate → (return verdict) → Audit
//!
//! A body that fails parsing or validation is rejected with every issue
//! found and is never partially evaluated. The audit write is a separate
//! call so the caller can detach it from the response.

use std::sync::Arc;

use chrono::Utc;
use serde_json::Value;
use tracing::{debug, info, warn};

use complyr_contracts::{
    error::{ComplyrError, ComplyrResult, ValidationIssue},
    record::{EvaluationId, EvaluationRecord, EvaluationRequest},
    verdict::Verdict,
};

use crate::traits::{AuditWriter, PolicyEvaluator, RequestValidator, Selection};

/// Parse raw body bytes as JSON. Malformed JSON is a single issue at the
/// document root.
pub fn parse_body(bytes: &[u8]) -> Result<Value, Vec<ValidationIssue>> {
    serde_json::from_slice(bytes).map_err(|e| {
        vec![ValidationIssue::new(
            "",
            format!("request body is not valid JSON: {e}"),
        )]
    })
}

/// The outcome of one successful evaluation call.
#[derive(Debug, Clone)]
pub struct Evaluation {
    /// What the caller receives.
    pub verdict: Verdict,
    /// What the audit writer receives.
    pub record: EvaluationRecord,
}

/// Owns the trusted pipeline components and enforces their ordering.
///
/// One service is shared by every request; it holds no per-request state.
pub struct EvaluationService {
    validator: Box<dyn RequestValidator>,
    evaluator: Box<dyn PolicyEvaluator>,
    audit: Arc<dyn AuditWriter>,
}

impl EvaluationService {
    pub fn new(
        validator: Box<dyn RequestValidator>,
        evaluator: Box<dyn PolicyEvaluator>,
        audit: Arc<dyn AuditWriter>,
    ) -> Self {
        Self {
            validator,
            evaluator,
            audit,
        }
    }

    /// Evaluate a raw request body.
    ///
    /// # Errors
    ///
    /// Returns `ComplyrError::Validation` when the body is not JSON or does
    /// not describe a valid request.
    pub fn evaluate_body(&self, body: &[u8]) -> ComplyrResult<Evaluation> {
        let value = parse_body(body).map_err(|issues| ComplyrError::Validation { issues })?;
        self.evaluate_value(&value)
    }

    /// Evaluate an already-parsed JSON body.
    ///
    /// # Errors
    ///
    /// Returns `ComplyrError::Validation` carrying the validator's issues.
    pub fn evaluate_value(&self, body: &Value) -> ComplyrResult<Evaluation> {
        let request = self.validator.validate(body).map_err(|issues| {
            warn!(issue_count = issues.len(), "request rejected by validation");
            ComplyrError::Validation { issues }
        })?;
        Ok(self.evaluate_request(&request))
    }

    /// Evaluate a typed request. Infallible.
    pub fn evaluate_request(&self, request: &EvaluationRequest) -> Evaluation {
        let evaluation_id = EvaluationId::new();
        debug!(
            evaluation_id = %evaluation_id,
            tenant_id = %request.event.context.tenant_id,
            rule_count = request.rules.len(),
            "evaluation starting"
        );

        let Selection { verdict, rule } = self.evaluator.select(&request.event, &request.rules);
        let audit_trigger = rule.is_some_and(|r| r.decision.audit_trigger);
        let rules_considered = request.rules.iter().filter(|r| r.is_active).count();

        info!(
            evaluation_id = %evaluation_id,
            status = verdict.status.as_str(),
            rule_id = verdict.rule_id.as_deref().unwrap_or("-"),
            audit_trigger,
            "evaluation complete"
        );

        let record = EvaluationRecord {
            evaluation_id,
            event: request.event.clone(),
            verdict: verdict.clone(),
            audit_trigger,
            rules_considered,
            recorded_at: Utc::now(),
        };

        Evaluation { verdict, record }
    }

    /// Hand a record to the audit writer.
    ///
    /// Failures are logged and dropped: the verdict has already been given.
    pub fn record(&self, record: &EvaluationRecord) {
        if let Err(e) = self.audit.write(record) {
            warn!(
                evaluation_id = %record.evaluation_id,
                error = %e,
                "audit write failed; verdict already returned"
            );
        }
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────
