//! # Actionizer Core
//!
//! Core primitives shared by every Actionizer action.
//!
//! This crate provides the fundamental building blocks:
//! - [`Outcome`] - Success/failure result with open named fields
//! - [`InputSchema`] / [`InputsBuilder`] - Per-entry-point parameter declarations and validation
//! - [`TypeTag`] - Type constraints a parameter value can be checked against
//! - [`ConfigurationError`] / [`ValidationError`] - The two error taxonomies

pub mod config;
pub mod error;
pub mod inputs;
pub mod outcome;
pub mod types;

// Re-exports for convenience
pub use config::{CheckOrder, ValidationConfig};
pub use error::{ConfigurationError, Result, ValidationError};
pub use inputs::{InputSchema, InputsBuilder, ParamDecl, ParamOptions};
pub use outcome::{Outcome, ERROR_FIELD, UNKNOWN_ERROR};
pub use types::*;

/// Prelude module for common imports
pub mod prelude {
    pub use crate::config::{CheckOrder, ValidationConfig};
    pub use crate::error::{ConfigurationError, ValidationError};
    pub use crate::inputs::{InputSchema, InputsBuilder, ParamOptions};
    pub use crate::outcome::Outcome;
    pub use crate::types::{Args, Fields, IntoFields, TypeTag};
}
