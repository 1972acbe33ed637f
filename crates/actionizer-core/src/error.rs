//! Error types for Actionizer.
//!
//! Configuration errors are programmer mistakes: they are always raised to the
//! caller and never folded into a failed [`Outcome`](crate::Outcome).
//! Validation errors are business failures and end up as the `error` field of
//! a failed outcome.

use thiserror::Error;

/// A mistake in how an action or its inputs were declared or wired together.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ConfigurationError {
    /// `optional`/`required` was used with no `inputs_for` block open.
    #[error("Param {param} must be declared inside an inputs_for block")]
    OutsideDeclaration { param: String },

    /// A declaration block was opened while another one was still open.
    #[error("Cannot declare inputs for {requested} while inputs for {open} are open")]
    NestedDeclaration { open: String, requested: String },

    /// A declaration block was closed without declaring anything.
    #[error("At least one parameter required in inputs_for {entry_point}")]
    EmptyDeclaration { entry_point: String },

    /// `end` was called with no declaration block open.
    #[error("No inputs_for block is open")]
    NoOpenDeclaration,

    /// The schema was finished while a declaration block was still open.
    #[error("inputs_for {entry_point} was never closed")]
    UnclosedDeclaration { entry_point: String },

    /// The same parameter name was declared twice for one entry point.
    #[error("Param {param} already declared for {entry_point}")]
    DuplicateParam { entry_point: String, param: String },

    /// Inputs were declared twice for the same entry point.
    #[error("Inputs for {entry_point} already declared")]
    DuplicateEntryPoint { entry_point: String },

    /// The `nullable` option was something other than a boolean.
    #[error("Please specify either true or false for the nullable option of {param} (got {got})")]
    InvalidNullable { param: String, got: String },

    /// The `type` option did not name a known type.
    #[error("Please specify a type for {param} ({got} is not a type)")]
    InvalidType { param: String, got: String },

    /// A checked invocation targeted something that is not an action.
    #[error("{type_name} is not an action")]
    NotAnAction { type_name: String },

    /// A dynamic invocation targeted a method the target does not have.
    #[error("{type_name} does not respond to {method}")]
    DoesNotRespond { type_name: String, method: String },

    /// A dynamic invocation returned something that does not look like an outcome.
    #[error("{type_name}#{method} did not return an outcome-like value")]
    NotOutcomeLike { type_name: String, method: String },
}

/// Convenience Result type for declaration-time operations.
pub type Result<T> = std::result::Result<T, ConfigurationError>;

/// The single message produced when call arguments do not match a schema.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("{0}")]
pub struct ValidationError(pub String);

impl ValidationError {
    pub fn not_declared(param: &str) -> Self {
        Self(format!("Param {param} not declared"))
    }

    pub fn not_null(param: &str) -> Self {
        Self(format!("Param {param} can't be null"))
    }

    pub fn wrong_type(param: &str, expected: impl std::fmt::Display) -> Self {
        Self(format!("Param {param} must descend from {expected}"))
    }

    pub fn required(param: &str, entry_point: &str) -> Self {
        Self(format!("Param {param} is required for {entry_point}"))
    }

    /// The message text.
    pub fn message(&self) -> &str {
        &self.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validation_messages() {
        assert_eq!(
            ValidationError::not_declared("bar").message(),
            "Param bar not declared"
        );
        assert_eq!(
            ValidationError::required("bar", "call").to_string(),
            "Param bar is required for call"
        );
        assert_eq!(
            ValidationError::wrong_type("foo", "Numeric").to_string(),
            "Param foo must descend from Numeric"
        );
        assert_eq!(
            ValidationError::not_null("foo").to_string(),
            "Param foo can't be null"
        );
    }

    #[test]
    fn test_configuration_error_names_offender() {
        let err = ConfigurationError::NotAnAction {
            type_name: "String".to_string(),
        };
        assert_eq!(err.to_string(), "String is not an action");
    }
}
