//! Hash-chain primitives.
//!
//! Hash input layout (bytes, in order):
//!   1. ledger_id as UTF-8
//!   2. sequence as 8-byte little-endian
//!   3. prev_hash as UTF-8 (64 ASCII hex chars)
//!   4. compact JSON of the record

use sha2::{Digest, Sha256};

use complyr_contracts::{
    error::{ComplyrError, ComplyrResult},
    record::EvaluationRecord,
};

use crate::entry::AuditEntry;

/// Compute the lowercase hex SHA-256 for one ledger entry.
///
/// # Errors
///
/// Returns `ComplyrError::AuditWriteFailed` if the record cannot be
/// serialized.
pub fn hash_entry(
    ledger_id: &str,
    sequence: u64,
    record: &EvaluationRecord,
    prev_hash: &str,
) -> ComplyrResult<String> {
    let record_json = serde_json::to_vec(record).map_err(|e| ComplyrError::AuditWriteFailed {
        reason: format!("record {} could not be serialized: {e}", record.evaluation_id),
    })?;

    let mut hasher = Sha256::new();
    hasher.update(ledger_id.as_bytes());
    hasher.update(sequence.to_le_bytes());
    hasher.update(prev_hash.as_bytes());
    hasher.update(&record_json);

    Ok(hex::encode(hasher.finalize()))
}

/// Check one entry against the position and predecessor hash it should
/// have.
pub fn verify_entry(entry: &AuditEntry, expected_sequence: u64, expected_prev: &str) -> bool {
    if entry.sequence != expected_sequence || entry.prev_hash != expected_prev {
        return false;
    }
    matches!(
        hash_entry(&entry.ledger_id, entry.sequence, &entry.record, &entry.prev_hash),
        Ok(recomputed) if recomputed == entry.this_hash
    )
}

/// Verify a chain of entries starting at genesis.
///
/// Valid when every entry's `sequence` equals its position, its `prev_hash`
/// equals the previous entry's `this_hash` (`GENESIS_HASH` for the first),
/// and its `this_hash` matches the recomputed value. An empty chain is
/// valid.
pub fn verify_chain(entries: &[AuditEntry]) -> bool {
    verify_segment(entries, 0, AuditEntry::GENESIS_HASH)
}

/// Verify a contiguous run of entries whose first element sits at
/// `first_sequence` and links to `anchor_hash`.
pub fn verify_segment<'a>(
    entries: impl IntoIterator<Item = &'a AuditEntry>,
    first_sequence: u64,
    anchor_hash: &str,
) -> bool {
    let mut expected_prev = anchor_hash;
    for (offset, entry) in entries.into_iter().enumerate() {
        if !verify_entry(entry, first_sequence + offset as u64, expected_prev) {
            return false;
        }
        expected_prev = &entry.this_hash;
    }
    true
}
