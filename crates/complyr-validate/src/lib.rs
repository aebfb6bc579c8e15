//! # complyr-validate
//!
//! Request validation for the `policy-evaluate` endpoint.
//!
//! This crate provides [`engine::SchemaValidator`], which implements the
//! [`complyr_core::traits::RequestValidator`] trait. A body is rejected
//! with an itemized list of issues before any rule is evaluated.
//!
//! ## Quick start
//!
//! ```rust,ignore
//! use complyr_validate::SchemaValidator;
//! use complyr_core::traits::RequestValidator;
//!
//! let validator = SchemaValidator::new()?;
//! match validator.validate(&body) {
//!     Ok(request) => { /* evaluate */ }
//!     Err(issues) => { /* 400 */ }
//! }
//! ```

pub mod engine;
pub mod schema;

pub use engine::SchemaValidator;
pub use schema::request_schema;
