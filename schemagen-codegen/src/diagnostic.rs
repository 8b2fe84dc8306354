//! Field-level diagnostics.

use crate::error::ResolveError;
use std::fmt;

/// A field whose type could not be resolved and was emitted as `never`.
#[derive(Debug)]
pub struct Diagnostic {
    /// Collection name.
    pub entity: String,
    /// Field name.
    pub field: String,
    /// Underlying failure.
    pub cause: ResolveError,
}

impl Diagnostic {
    /// Creates a diagnostic for `entity.field`.
    pub fn new(entity: impl Into<String>, field: impl Into<String>, cause: ResolveError) -> Self {
        Self {
            entity: entity.into(),
            field: field.into(),
            cause,
        }
    }

    /// Emits the diagnostic as a warning.
    pub fn report(&self) {
        tracing::warn!(
            entity = %self.entity,
            field = %self.field,
            error = %self.cause,
            "could not resolve field type, emitting never"
        );
    }
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{}: {}", self.entity, self.field, self.cause)
    }
}
