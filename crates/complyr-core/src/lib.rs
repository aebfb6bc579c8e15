//! # complyr-core
//!
//! The evaluation pipeline for COMPLYR.
//!
//! This crate provides:
//! - The three seams (`RequestValidator`, `PolicyEvaluator`, `AuditWriter`)
//! - The `EvaluationService` that runs them in order for each request
//!
//! ## Usage
//!
//! ```rust,ignore
//! use complyr_core::{EvaluationService, traits::{AuditWriter, PolicyEvaluator, RequestValidator}};
//! ```

pub mod service;
pub mod traits;

pub use service::{parse_body, Evaluation, EvaluationService};
pub use traits::Selection;
