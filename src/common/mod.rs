//! Common types and utilities shared across the crate.
//!
//! This module holds the crate-wide error type, unit conversions between
//! inches, points and EMUs, XML escaping and identifier generation.

// Submodule declarations
pub mod error;
pub mod id;
pub mod unit;
pub mod xml;

// Re-exports for convenience
pub use error::{Error, Result};
