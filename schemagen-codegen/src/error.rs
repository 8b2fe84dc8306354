//! Error types for code generation.
//!
//! Generation has two failure channels. [`ResolveError`] is scoped to one
//! field: the field is emitted as `never` and a diagnostic is reported.
//! [`CodegenError`] aborts the whole run.

use crate::metadata::MetadataError;
use thiserror::Error;

/// Field-level resolution failure.
#[derive(Debug, Error)]
pub enum ResolveError {
    /// The schema type has no safe target-type mapping.
    #[error("unsupported field type '{kind}'")]
    UnsupportedFieldType {
        /// Schema type name.
        kind: String,
    },

    /// The enumerated-choice metadata lookup failed.
    #[error("metadata query failed: {0}")]
    MetadataQuery(#[source] MetadataError),

    /// The relation record is malformed or points nowhere.
    #[error("ambiguous relation: {message}")]
    AmbiguousRelation {
        /// Error message.
        message: String,
    },
}

impl ResolveError {
    /// Creates an unsupported field type error.
    pub fn unsupported(kind: impl Into<String>) -> Self {
        Self::UnsupportedFieldType { kind: kind.into() }
    }

    /// Creates an ambiguous relation error.
    pub fn ambiguous(message: impl Into<String>) -> Self {
        Self::AmbiguousRelation {
            message: message.into(),
        }
    }
}

/// Error type for code generation operations.
#[derive(Debug, Error)]
pub enum CodegenError {
    /// Snapshot parsing error.
    #[error("snapshot parse error: {0}")]
    Parse(#[from] schemagen_schema::ParseError),

    /// Catalog validation error.
    #[error("schema error: {0}")]
    Schema(#[from] schemagen_schema::SchemaError),

    /// IO error.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// A model unit would share its file with the index unit.
    #[error(
        "collection '{collection}' derives '{identifier}', which names the same file as index '{index_stem}'"
    )]
    IndexNameClash {
        /// Collection name.
        collection: String,
        /// Derived type identifier.
        identifier: String,
        /// File stem of the index unit.
        index_stem: String,
    },

    /// The metadata collaborator failed in a way that invalidates the run.
    #[error("metadata transport error in '{collection}.{field}': {source}")]
    Metadata {
        /// Collection being generated.
        collection: String,
        /// Field being resolved.
        field: String,
        /// Underlying error.
        #[source]
        source: MetadataError,
    },
}
