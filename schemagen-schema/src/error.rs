//! Error types for snapshot parsing and catalog validation.

use thiserror::Error;

/// Error type for snapshot parsing operations.
#[derive(Debug, Error)]
pub enum ParseError {
    /// JSON parsing error.
    #[error("JSON parsing error: {0}")]
    Json(#[from] serde_json::Error),

    /// Field or relation refers to a collection the snapshot does not declare.
    #[error("unknown collection '{collection}' referenced by {context}")]
    UnknownCollection {
        /// Collection name.
        collection: String,
        /// Where the reference was found.
        context: String,
    },

    /// Duplicate definition.
    #[error("duplicate {kind} definition: '{name}'")]
    DuplicateDefinition {
        /// Kind of definition (collection, field).
        kind: String,
        /// Name of the duplicate.
        name: String,
    },

    /// Invalid snapshot structure.
    #[error("invalid snapshot structure: {message}")]
    InvalidStructure {
        /// Error message.
        message: String,
    },
}

/// Error type for catalog validation.
#[derive(Debug, Error)]
pub enum SchemaError {
    /// Parsing error.
    #[error("parse error: {0}")]
    Parse(#[from] ParseError),

    /// Two collections derive the same type identifier.
    #[error(
        "collections '{first}' and '{second}' both derive the type identifier '{identifier}'"
    )]
    IdentifierCollision {
        /// Shared identifier.
        identifier: String,
        /// Collection seen first.
        first: String,
        /// Collection seen second.
        second: String,
    },

    /// A collection derives an unusable type identifier.
    #[error("collection '{collection}' derives invalid type identifier '{identifier}'")]
    InvalidIdentifier {
        /// Collection name.
        collection: String,
        /// Derived identifier.
        identifier: String,
    },

    /// More than one relation claims the same field.
    #[error("more than one relation defined for field '{collection}.{field}'")]
    DuplicateRelation {
        /// Collection name.
        collection: String,
        /// Field name.
        field: String,
    },

    /// A relation is attached to a field that does not exist.
    #[error("relation refers to missing field '{collection}.{field}'")]
    RelationSourceNotFound {
        /// Collection name.
        collection: String,
        /// Field name.
        field: String,
    },
}

impl ParseError {
    /// Creates an unknown collection error.
    pub fn unknown_collection(collection: impl Into<String>, context: impl Into<String>) -> Self {
        Self::UnknownCollection {
            collection: collection.into(),
            context: context.into(),
        }
    }

    /// Creates a duplicate definition error.
    pub fn duplicate(kind: impl Into<String>, name: impl Into<String>) -> Self {
        Self::DuplicateDefinition {
            kind: kind.into(),
            name: name.into(),
        }
    }

    /// Creates an invalid structure error.
    pub fn invalid_structure(message: impl Into<String>) -> Self {
        Self::InvalidStructure {
            message: message.into(),
        }
    }
}

impl SchemaError {
    /// Creates a duplicate relation error.
    pub fn duplicate_relation(collection: impl Into<String>, field: impl Into<String>) -> Self {
        Self::DuplicateRelation {
            collection: collection.into(),
            field: field.into(),
        }
    }
}
