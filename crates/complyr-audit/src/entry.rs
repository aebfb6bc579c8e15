//! Ledger entry and exported log types.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use complyr_contracts::record::EvaluationRecord;

use crate::chain::verify_segment;

/// A single link in the ledger's SHA-256 hash chain.
///
/// Changing any field, including anything inside `record`, invalidates
/// `this_hash` and the `prev_hash` of every later entry.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AuditEntry {
    /// Position in the chain, starting at 0.
    pub sequence: u64,

    /// The ledger this entry belongs to.
    pub ledger_id: String,

    /// The evaluation as it was answered.
    pub record: EvaluationRecord,

    /// `this_hash` of the previous entry, or `GENESIS_HASH` for entry 0.
    pub prev_hash: String,

    /// SHA-256 (hex) over (ledger_id, sequence, prev_hash, JSON of record).
    pub this_hash: String,
}

impl AuditEntry {
    /// The `prev_hash` of the first entry in every ledger: 64 hex zeros.
    pub const GENESIS_HASH: &'static str =
        "0000000000000000000000000000000000000000000000000000000000000000";
}

/// A point-in-time export of a ledger's retained entries.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AuditLog {
    pub ledger_id: String,

    /// Retained entries in chain order. Older entries may have been evicted.
    pub entries: Vec<AuditEntry>,

    /// `prev_hash` the first retained entry must link to: `GENESIS_HASH`
    /// until something is evicted.
    pub anchor_hash: String,

    pub exported_at: DateTime<Utc>,

    /// `this_hash` of the last entry. Empty when nothing was ever written.
    pub terminal_hash: String,
}

impl AuditLog {
    /// Verify the exported segment against its anchor.
    pub fn verify(&self) -> bool {
        let first_sequence = self.entries.first().map_or(0, |e| e.sequence);
        verify_segment(&self.entries, first_sequence, &self.anchor_hash)
    }
}

/// Constant-size view of a ledger, served by `GET /audit`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LedgerSummary {
    pub ledger_id: String,
    /// Entries ever written, evicted ones included.
    pub entry_count: u64,
    /// Entries still held in memory.
    pub retained: usize,
    pub terminal_hash: String,
    /// False once any entry failed verification.
    pub intact: bool,
}
