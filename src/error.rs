//! Error types for the page controller.
//!
//! Binder and lookup failures are [`PageError`]s. Failures reported by the
//! external model are [`ModelError`]s and travel inside [`PageError::Model`].

use thiserror::Error;

use crate::params::FieldKind;

/// Result alias used throughout the controller.
pub type PageResult<T> = Result<T, PageError>;

#[derive(Debug, Clone, PartialEq, Error)]
pub enum PageError {
    /// A setter named a field the demo's schema does not declare.
    #[error("unknown parameter field '{field}'")]
    UnknownField { field: String },

    /// A setter of the wrong semantic type was used for a field.
    #[error("field '{field}' is {expected:?}, not {found:?}")]
    FieldKind {
        field: String,
        expected: FieldKind,
        found: FieldKind,
    },

    /// A field required by the selected model variant was never set.
    #[error("missing parameter field '{field}'")]
    MissingField { field: String },

    /// A field belonging to the other solver branch was set.
    #[error("field '{field}' does not apply to the selected solver")]
    UnexpectedField { field: String },

    /// Numeric text could not be parsed and the coercion policy rejects it.
    #[error("field '{field}' expects a number, got '{raw}'")]
    InvalidNumber { field: String, raw: String },

    /// The host has no control (or element) with this id.
    #[error("no control with id '{id}'")]
    UnknownControl { id: String },

    /// A stepped page tried to render before a model instance was built.
    #[error("model instance has not been built")]
    NoModelInstance,

    #[error(transparent)]
    Model(#[from] ModelError),
}

/// Explicit result taxonomy for calls into the external model.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ModelError {
    /// The model refused the parameter record.
    #[error("invalid parameters: {0}")]
    InvalidParameters(String),

    /// The model accepted the parameters but failed while drawing.
    #[error("render failed: {0}")]
    RenderFailed(String),

    /// The model does not offer this entry point (e.g. `build` on a stateless demo).
    #[error("model does not support '{0}'")]
    Unsupported(&'static str),
}
