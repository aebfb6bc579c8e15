//! # complyr-audit
//!
//! Append-only, SHA-256 hash-chained ledger of policy evaluations.
//!
//! Every verdict handed back by the service is recorded as an
//! `AuditEntry` linked to its predecessor by hash. Editing any stored
//! entry breaks the chain, which `verify_chain` detects.
//!
//! ```rust,ignore
//! use complyr_audit::InMemoryAuditWriter;
//! use complyr_core::traits::AuditWriter;
//!
//! let ledger = InMemoryAuditWriter::new("ledger-001");
//! ledger.write(&record)?;
//! assert!(ledger.verify_integrity());
//! ```

pub mod chain;
pub mod entry;
pub mod memory;

pub use chain::{hash_entry, verify_chain, verify_entry, verify_segment};
pub use entry::{AuditEntry, AuditLog, LedgerSummary};
pub use memory::InMemoryAuditWriter;

// ── Tests ─────────────────────────────────────────────────────────────────────
