//! Error types for sqltmpl

use thiserror::Error;

/// Result type alias for template operations
pub type TemplateResult<T> = Result<T, TemplateError>;

/// Errors raised while rendering a query template.
///
/// Every variant is a caller-input error: rendering stops at the first one
/// and no partial SQL is returned.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum TemplateError {
    /// The template string was empty
    #[error("Empty query template")]
    EmptyTemplate,

    /// A placeholder had no matching argument
    #[error("Missing parameter for placeholder #{index}")]
    MissingParameter { index: usize },

    /// More arguments were supplied than the template has placeholders
    #[error("Too many parameters for query template: expected {expected}, got {given}")]
    TooManyParameters { expected: usize, given: usize },

    /// A value cannot be rendered as a scalar
    #[error("Invalid value type for placeholder #{index}: {found} ({reason})")]
    InvalidValueType {
        index: usize,
        found: &'static str,
        reason: &'static str,
    },

    /// `?a` received something other than a list or map
    #[error("Invalid array type for placeholder #{index}: expected list or map, got {found}")]
    InvalidArrayType { index: usize, found: &'static str },

    /// `?#` received something other than a string or list of strings
    #[error(
        "Invalid identifier type for placeholder #{index}: expected string or list of strings, got {found}"
    )]
    InvalidIdentifierType { index: usize, found: &'static str },

    /// A `{` appeared inside an already open conditional block
    #[error("Nested conditional block at byte {offset}")]
    NestedBlock { offset: usize },

    /// A `}` appeared without an open conditional block
    #[error("Unmatched '}}' at byte {offset}")]
    UnmatchedBrace { offset: usize },

    /// The template ended while a conditional block was still open
    #[error("Unclosed conditional block opened at byte {offset}")]
    UnclosedBlock { offset: usize },

    /// JSON input could not be converted to template values
    #[error("JSON conversion error: {0}")]
    Json(String),
}

impl TemplateError {
    /// Create an invalid value type error
    pub fn invalid_value(index: usize, found: &'static str, reason: &'static str) -> Self {
        Self::InvalidValueType {
            index,
            found,
            reason,
        }
    }

    /// Create a JSON conversion error
    pub fn json(message: impl Into<String>) -> Self {
        Self::Json(message.into())
    }

    /// Check if this error is an argument count mismatch
    pub fn is_parameter_count(&self) -> bool {
        matches!(
            self,
            Self::MissingParameter { .. } | Self::TooManyParameters { .. }
        )
    }

    /// Check if this error comes from an argument of the wrong type
    pub fn is_type_error(&self) -> bool {
        matches!(
            self,
            Self::InvalidValueType { .. }
                | Self::InvalidArrayType { .. }
                | Self::InvalidIdentifierType { .. }
        )
    }

    /// Check if this error comes from malformed conditional block braces
    pub fn is_block_error(&self) -> bool {
        matches!(
            self,
            Self::NestedBlock { .. } | Self::UnmatchedBrace { .. } | Self::UnclosedBlock { .. }
        )
    }

    /// Placeholder index the error refers to, if any.
    pub fn placeholder_index(&self) -> Option<usize> {
        match self {
            Self::MissingParameter { index }
            | Self::InvalidValueType { index, .. }
            | Self::InvalidArrayType { index, .. }
            | Self::InvalidIdentifierType { index, .. } => Some(*index),
            _ => None,
        }
    }
}

impl From<serde_json::Error> for TemplateError {
    fn from(err: serde_json::Error) -> Self {
        Self::Json(err.to_string())
    }
}
