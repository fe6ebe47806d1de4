//! Error types for the component registry.

use thiserror::Error;

/// Fatal registration errors.
///
/// A mis-registered component corrupts the FQN space, so these are raised
/// synchronously to the caller of registration and never absorbed.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum RegistryError {
    /// The registration carries no namespace.
    #[error("registration is missing a namespace")]
    MissingNamespace,

    /// The registration carries no name.
    #[error("registration is missing a name")]
    MissingName,

    /// The registration carries no implementation.
    #[error("registration is missing an implementation")]
    MissingImplementation,

    /// The assembled identifier is malformed.
    #[error(transparent)]
    Fqn(#[from] FqnError),
}

/// Malformed fully-qualified name.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum FqnError {
    /// The identifier string could not be parsed.
    #[error("invalid identifier: {0}")]
    InvalidIdentifier(String),
}

/// Errors from the resolver read path.
///
/// "Not found" and "not allowed" are deliberately *not* represented here;
/// they are absorbed into placeholder substitutions so that a single
/// missing or unauthorized component never aborts a form render.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ResolveError {
    /// No identifier was supplied at all.
    #[error("no component identifier supplied")]
    MissingIdentifier,

    /// The supplied identifier was malformed.
    #[error(transparent)]
    Fqn(#[from] FqnError),
}

/// Errors produced while rendering an implementation.
#[derive(Debug, Error)]
pub enum RenderError {
    /// Renderer-specific failure.
    #[error("render error: {0}")]
    Message(String),

    /// Template evaluation failure inside a renderer.
    #[error("template error: {0}")]
    Template(String),

    /// JSON (de)serialization error.
    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

impl RenderError {
    /// Creates a [`Message`](Self::Message) error.
    pub fn message(msg: impl Into<String>) -> Self {
        Self::Message(msg.into())
    }

    /// Creates a [`Template`](Self::Template) error.
    pub fn template(msg: impl Into<String>) -> Self {
        Self::Template(msg.into())
    }
}
