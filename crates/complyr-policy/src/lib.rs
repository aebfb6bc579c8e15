//! # complyr-policy
//!
//! The priority-ordered, fail-closed rule evaluator.
//!
//! ## Overview
//!
//! This crate provides [`RuleEngine`], which implements the
//! [`PolicyEvaluator`](complyr_core::traits::PolicyEvaluator) trait. Rules
//! arrive with every call; the engine keeps the active ones, orders them by
//! ascending priority, and returns the decision of the first rule whose
//! condition tree matches. No match yields `RequiresReview`.
//!
//! ## Quick start
//!
//! ```rust,ignore
//! use complyr_policy::RuleEngine;
//! use complyr_core::traits::PolicyEvaluator;
//!
//! let verdict = RuleEngine::new().evaluate(&event, &rules);
//! ```
//!
//! ## Conditions
//!
//! Leaves address event fields by dotted path (see [`field::FIELD_PATHS`])
//! and compare with `equals`, `not_equals`, `in`, `not_in`,
//! `semver_less_than`, `semver_greater_than` or `semver_satisfies`.
//! Anything that cannot be evaluated is treated as "does not match".

pub mod condition;
pub mod engine;
pub mod field;
pub mod version;

pub use condition::evaluate_clause;
pub use engine::{evaluate, select, RuleEngine};

// ── Tests ─────────────────────────────────────────────────────────────────────
