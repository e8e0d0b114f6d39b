//! Error types for ocm-core
//!
//! Errors fall into two groups:
//!
//! - **Declaration errors**: a schema that can never be bound correctly
//!   (duplicate names, ambiguous positional layout). Raised by
//!   [`CommandSpecBuilder::build`](crate::CommandSpecBuilder::build).
//! - **Validation errors**: caller input that does not fit a valid schema.
//!   Raised while binding a [`Command`](crate::Command), never later.

use thiserror::Error;

/// Core error type for ocm operations
#[derive(Debug, Clone, PartialEq, Error)]
pub enum Error {
    /// Input supplied for names the command does not declare
    #[error("Unknown parameter(s) for {command}: {}", names.join(", "))]
    UnknownParameter {
        /// Command the input was bound against
        command: String,
        /// Every undeclared name, in input order
        names: Vec<String>,
    },

    /// A required parameter got neither input nor a default
    #[error("{name} is required")]
    MissingRequiredParameter {
        /// Parameter name
        name: String,
    },

    /// A raw value could not be converted by the parameter's type
    #[error("{parameter}: invalid {type_name} value {value:?}: {reason}")]
    TypeConversion {
        /// Parameter name
        parameter: String,
        /// Name of the converting type
        type_name: String,
        /// The offending raw value, as displayed
        value: String,
        /// Why it was rejected
        reason: String,
    },

    /// A list was given where a single value is declared, or a nested list
    /// was given to a multi-value parameter
    #[error("{parameter}: expected a single value, got a list")]
    UnexpectedMultipleValues {
        /// Parameter name
        parameter: String,
    },

    /// A callback or custom type rejected an otherwise well-typed value
    #[error("{parameter}: {reason}")]
    InvalidValue {
        /// Parameter name
        parameter: String,
        /// Why it was rejected
        reason: String,
    },

    /// The command schema itself is unusable
    #[error("Invalid declaration: {0}")]
    InvalidDeclaration(String),

    /// A process finished with a non-zero status and the caller asked for
    /// that to be an error
    #[error("{command} failed with exit status {exit_status}")]
    CommandFailed {
        /// The command line that ran
        command: String,
        /// Its exit status
        exit_status: i32,
        /// Captured standard error
        stderr: String,
    },

    /// No `OCMIR:<key>:<value>` line for the requested key
    #[error("Intermediate result {0} not found")]
    IntermediateResultNotFound(String),

    /// Error raised by an executor implementation
    #[error("Execution error: {0}")]
    Execution(String),
}

impl Error {
    /// Create a conversion error for a parameter.
    pub fn type_conversion(
        parameter: impl Into<String>,
        type_name: impl Into<String>,
        value: impl Into<String>,
        reason: impl Into<String>,
    ) -> Self {
        Self::TypeConversion {
            parameter: parameter.into(),
            type_name: type_name.into(),
            value: value.into(),
            reason: reason.into(),
        }
    }

    /// Create a validation error from a callback or custom type.
    pub fn invalid_value(parameter: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::InvalidValue {
            parameter: parameter.into(),
            reason: reason.into(),
        }
    }

    /// Create a declaration error.
    pub fn invalid_declaration(msg: impl Into<String>) -> Self {
        Self::InvalidDeclaration(msg.into())
    }

    /// Create a missing-required error.
    pub fn missing_required(name: impl Into<String>) -> Self {
        Self::MissingRequiredParameter { name: name.into() }
    }

    /// Create an unexpected-list error.
    pub fn unexpected_multiple(parameter: impl Into<String>) -> Self {
        Self::UnexpectedMultipleValues {
            parameter: parameter.into(),
        }
    }

    /// Whether this error comes from binding caller input.
    #[must_use]
    pub const fn is_validation(&self) -> bool {
        matches!(
            self,
            Self::UnknownParameter { .. }
                | Self::MissingRequiredParameter { .. }
                | Self::TypeConversion { .. }
                | Self::UnexpectedMultipleValues { .. }
                | Self::InvalidValue { .. }
        )
    }

    /// Name of the parameter this error is about, if any.
    #[must_use]
    pub fn parameter(&self) -> Option<&str> {
        match self {
            Self::MissingRequiredParameter { name } => Some(name),
            Self::TypeConversion { parameter, .. }
            | Self::UnexpectedMultipleValues { parameter }
            | Self::InvalidValue { parameter, .. } => Some(parameter),
            _ => None,
        }
    }
}

/// Result type alias for ocm-core operations
pub type Result<T> = std::result::Result<T, Error>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unknown_parameter_display_lists_all_names() {
        let err = Error::UnknownParameter {
            command: "ls".to_string(),
            names: vec!["colour".to_string(), "size".to_string()],
        };
        assert_eq!(err.to_string(), "Unknown parameter(s) for ls: colour, size");
    }

    #[test]
    fn test_type_conversion_display() {
        let err = Error::type_conversion("number", "integer", "abc", "not a number");
        assert_eq!(
            err.to_string(),
            "number: invalid integer value \"abc\": not a number"
        );
    }

    #[test]
    fn test_missing_required_display() {
        assert_eq!(
            Error::missing_required("directory").to_string(),
            "directory is required"
        );
    }

    #[test]
    fn test_validation_classification() {
        assert!(Error::missing_required("x").is_validation());
        assert!(Error::unexpected_multiple("x").is_validation());
        assert!(Error::invalid_value("x", "bad").is_validation());
        assert!(!Error::invalid_declaration("dup").is_validation());
        assert!(!Error::IntermediateResultNotFound("k".into()).is_validation());
    }

    #[test]
    fn test_parameter_accessor() {
        assert_eq!(Error::missing_required("file").parameter(), Some("file"));
        assert_eq!(
            Error::type_conversion("n", "integer", "x", "bad").parameter(),
            Some("n")
        );
        assert_eq!(Error::invalid_declaration("x").parameter(), None);
    }
}
