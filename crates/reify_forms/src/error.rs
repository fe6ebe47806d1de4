//! Error types for form resolution.
//!
//! An unsupported field kind is deliberately *not* an error: it renders a
//! diagnostic placeholder so one odd schema node never aborts a form.

use thiserror::Error;

/// Errors from the form layer.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum FormError {
    /// The schema node is structurally unusable.
    #[error("schema error: {0}")]
    Schema(String),

    /// A template failed to evaluate.
    #[error(transparent)]
    Template(#[from] TemplateError),
}

/// Template evaluation failures.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum TemplateError {
    /// An interpolation marker was opened but never closed.
    #[error("unterminated template expression in '{0}'")]
    Unterminated(String),

    /// The dotted path named a value the bag does not hold.
    #[error("no value at path '{0}'")]
    MissingValue(String),
}
