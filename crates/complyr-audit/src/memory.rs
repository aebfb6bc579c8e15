//! In-memory implementation of `AuditWriter`.
//!
//! `InMemoryAuditWriter` keeps entries in a `VecDeque` behind a `Mutex`, so
//! one writer can be shared by all request tasks. A bounded writer evicts
//! its oldest entries once `max_entries` is reached; the chain stays
//! verifiable from the last evicted hash.
//!
//! Every entry is re-verified exactly once, either when a summary is taken
//! or just before it is evicted, so `summary()` costs O(entries written
//! since the previous call). `verify_integrity()` re-checks everything
//! retained.

use std::collections::VecDeque;
use std::sync::{Mutex, MutexGuard};

use chrono::Utc;
use tracing::{debug, error, warn};

use complyr_contracts::{
    error::{ComplyrError, ComplyrResult},
    record::EvaluationRecord,
};
use complyr_core::traits::AuditWriter;

use crate::{
    chain::{hash_entry, verify_entry, verify_segment},
    entry::{AuditEntry, AuditLog, LedgerSummary},
};

// ── Internal mutable state ────────────────────────────────────────────────────

pub(crate) struct LedgerState {
    pub(crate) entries: VecDeque<AuditEntry>,

    /// Sequence the next write receives.
    next_sequence: u64,

    /// `this_hash` of the last entry, or `GENESIS_HASH` before the first.
    last_hash: String,

    /// `prev_hash` of the front entry.
    anchor_hash: String,

    /// Sequences below this have been verified.
    verified_through: u64,

    /// `this_hash` of entry `verified_through - 1`, or genesis.
    verified_hash: String,

    intact: bool,
}

impl LedgerState {
    fn front_sequence(&self) -> u64 {
        self.next_sequence - self.entries.len() as u64
    }

    /// Verify every retained entry not yet verified.
    fn catch_up(&mut self) {
        let offset = (self.verified_through - self.front_sequence()) as usize;
        for entry in self.entries.iter().skip(offset) {
            if !self.intact {
                break;
            }
            self.intact = verify_entry(entry, self.verified_through, &self.verified_hash);
            self.verified_through += 1;
            self.verified_hash = entry.this_hash.clone();
        }
        if !self.intact {
            self.verified_through = self.next_sequence;
        }
    }
}

// ── Public writer ─────────────────────────────────────────────────────────────

/// An append-only ledger of evaluation records backed by a SHA-256 hash
/// chain.
pub struct InMemoryAuditWriter {
    ledger_id: String,
    max_entries: Option<usize>,
    pub(crate) state: Mutex<LedgerState>,
}

impl InMemoryAuditWriter {
    /// An unbounded ledger.
    pub fn new(ledger_id: impl Into<String>) -> Self {
        Self::with_limit(ledger_id, None)
    }

    /// A ledger retaining at most `max_entries` entries.
    pub fn bounded(ledger_id: impl Into<String>, max_entries: usize) -> Self {
        Self::with_limit(ledger_id, Some(max_entries.max(1)))
    }

    fn with_limit(ledger_id: impl Into<String>, max_entries: Option<usize>) -> Self {
        Self {
            ledger_id: ledger_id.into(),
            max_entries,
            state: Mutex::new(LedgerState {
                entries: VecDeque::new(),
                next_sequence: 0,
                last_hash: AuditEntry::GENESIS_HASH.to_string(),
                anchor_hash: AuditEntry::GENESIS_HASH.to_string(),
                verified_through: 0,
                verified_hash: AuditEntry::GENESIS_HASH.to_string(),
                intact: true,
            }),
        }
    }

    /// A poisoned lock still guards a consistent ledger: entries are only
    /// pushed after their hash is computed.
    fn lock(&self) -> MutexGuard<'_, LedgerState> {
        self.state
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    /// Entries currently retained.
    pub fn len(&self) -> usize {
        self.lock().entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Counts, terminal hash and integrity without copying any entry.
    pub fn summary(&self) -> LedgerSummary {
        let mut state = self.lock();
        state.catch_up();
        LedgerSummary {
            ledger_id: self.ledger_id.clone(),
            entry_count: state.next_sequence,
            retained: state.entries.len(),
            terminal_hash: if state.next_sequence == 0 {
                String::new()
            } else {
                state.last_hash.clone()
            },
            intact: state.intact,
        }
    }

    /// Snapshot every retained entry.
    pub fn export_log(&self) -> AuditLog {
        let state = self.lock();
        AuditLog {
            ledger_id: self.ledger_id.clone(),
            entries: state.entries.iter().cloned().collect(),
            anchor_hash: state.anchor_hash.clone(),
            exported_at: Utc::now(),
            terminal_hash: if state.next_sequence == 0 {
                String::new()
            } else {
                state.last_hash.clone()
            },
        }
    }

    /// Re-verify every retained entry as it currently sits in memory.
    pub fn verify_integrity(&self) -> bool {
        let state = self.lock();
        verify_segment(&state.entries, state.front_sequence(), &state.anchor_hash)
    }
}

// ── AuditWriter impl ──────────────────────────────────────────────────────────

impl AuditWriter for InMemoryAuditWriter {
    fn write(&self, record: &EvaluationRecord) -> ComplyrResult<()> {
        let mut state = self.state.lock().map_err(|e| ComplyrError::AuditWriteFailed {
            reason: format!("ledger lock poisoned: {e}"),
        })?;

        let sequence = state.next_sequence;
        let prev_hash = state.last_hash.clone();
        let this_hash = hash_entry(&self.ledger_id, sequence, record, &prev_hash).inspect_err(|e| {
            error!(evaluation_id = %record.evaluation_id, error = %e, "ledger hash failed");
        })?;

        state.entries.push_back(AuditEntry {
            sequence,
            ledger_id: self.ledger_id.clone(),
            record: record.clone(),
            prev_hash,
            this_hash: this_hash.clone(),
        });
        state.next_sequence += 1;
        state.last_hash = this_hash;

        if let Some(max) = self.max_entries {
            if state.entries.len() > max {
                // Nothing leaves memory unverified.
                state.catch_up();
                while state.entries.len() > max {
                    if let Some(evicted) = state.entries.pop_front() {
                        state.anchor_hash = evicted.this_hash;
                    }
                }
                if !state.intact {
                    warn!(ledger_id = %self.ledger_id, "evicting from a ledger that failed verification");
                }
            }
        }

        debug!(
            ledger_id = %self.ledger_id,
            sequence,
            evaluation_id = %record.evaluation_id,
            audit_trigger = record.audit_trigger,
            "evaluation recorded"
        );

        Ok(())
    }
}
