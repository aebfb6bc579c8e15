//! One-shot evaluation for `complyr evaluate`.

use std::io::Write;
use std::path::Path;
use std::process::ExitCode;
use std::sync::Arc;

use complyr_audit::InMemoryAuditWriter;
use complyr_contracts::error::{ComplyrError, ComplyrResult};
use complyr_core::EvaluationService;
use complyr_policy::RuleEngine;
use complyr_validate::SchemaValidator;

/// How a request file was answered.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    /// A verdict was printed.
    Decided,
    /// The request failed validation; its issues were printed.
    Rejected,
}

impl From<Outcome> for ExitCode {
    fn from(outcome: Outcome) -> Self {
        match outcome {
            Outcome::Decided => ExitCode::SUCCESS,
            Outcome::Rejected => ExitCode::FAILURE,
        }
    }
}

/// Evaluate the request body stored at `path`.
///
/// The pretty-printed verdict goes to `out`; validation issues go to `err`,
/// one per line. Unreadable files and output failures are returned as
/// `ComplyrError::Io`.
pub fn evaluate_file(
    path: &Path,
    out: &mut impl Write,
    err: &mut impl Write,
) -> ComplyrResult<Outcome> {
    let bytes = std::fs::read(path)?;

    let service = EvaluationService::new(
        Box::new(SchemaValidator::new()?),
        Box::new(RuleEngine::new()),
        Arc::new(InMemoryAuditWriter::new("cli")),
    );

    match service.evaluate_body(&bytes) {
        Ok(evaluation) => {
            let rendered = serde_json::to_string_pretty(&evaluation.verdict)
                .map_err(|e| ComplyrError::Io(std::io::Error::other(e)))?;
            writeln!(out, "{rendered}")?;
            Ok(Outcome::Decided)
        }
        Err(ComplyrError::Validation { issues }) => {
            writeln!(err, "validation failed ({} issue(s)):", issues.len())?;
            for issue in &issues {
                writeln!(err, "  - {issue}")?;
            }
            Ok(Outcome::Rejected)
        }
        Err(e) => Err(e),
    }
}
