//! Error types for the validation bridge.

use thiserror::Error;

/// Result type for validation-bridge operations.
pub type ValidateResult<T> = Result<T, ValidateError>;

/// Errors that can abort a validation flow.
///
/// Precondition violations are raised before any error-store mutation; path
/// and rule-set errors abort the in-flight flow, leaving the store in its
/// post-clear state. Callers must treat an aborted flow as "validation did
/// not complete", never as "model is valid".
#[derive(Debug, Error)]
pub enum ValidateError {
    /// The edit surface has no model to validate.
    #[error("edit surface has no model")]
    MissingModel,

    /// The property path is empty or contains an empty segment.
    #[error("malformed property path '{path}'")]
    MalformedPath { path: String },

    /// A bracketed index could not be parsed as an integer.
    #[error("invalid index syntax in path segment '{segment}'")]
    BadIndexSyntax { segment: String },

    /// A bracketed index fell outside the collection's bounds.
    #[error("index {index} out of range for '{property}' (length {len})")]
    IndexOutOfRange {
        property: String,
        index: usize,
        len: usize,
    },

    /// A path segment named a member the current type does not have.
    #[error("no member '{property}' on type '{type_name}'")]
    UnknownMember {
        property: String,
        type_name: String,
    },

    /// A path segment indexed into a member that is not an ordered collection.
    #[error("member '{property}' on type '{type_name}' is not an indexable collection")]
    NotIndexable {
        property: String,
        type_name: String,
    },

    /// A rule-set faulted during execution.
    #[error("rule set execution failed: {0}")]
    RuleSet(#[from] RuleSetError),
}

/// Fault raised by a rule-set while running (e.g. a failed uniqueness check
/// against external state). Propagates uncaught through the owning flow.
#[derive(Debug, Error)]
#[error("{message}")]
pub struct RuleSetError {
    pub message: String,
}

impl RuleSetError {
    /// Creates a rule-set fault with the given message.
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}
