//! Unified error types for slidewright.
//!
//! Each subsystem reports its own typed error; this module folds them into a
//! single error type for the pipeline and its callers.

// Submodule declarations
pub mod types;

// Re-exports
pub use types::{Error, Result};
