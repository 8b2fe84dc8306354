//! # schemagen Schema
//!
//! Schema catalog model, snapshot parser and validation.
//!
//! This crate provides:
//! - Catalog, entity, field and relation definitions
//! - JSON schema snapshot parsing
//! - Type identifier derivation (singular PascalCase)
//! - Pre-indexed relation lookup for code generation
//! - Catalog validation

pub mod error;
pub mod ir;
pub mod naming;
pub mod snapshot;
pub mod types;
pub mod validation;

pub use error::{ParseError, SchemaError};
pub use ir::{RelationIndex, RelationLookup};
pub use naming::{is_valid_identifier, singularize, to_pascal_case, type_identifier};
pub use snapshot::{Snapshot, parse_snapshot};
pub use types::{
    Catalog, Choice, EntityDef, FieldDef, FieldKind, FieldMetaRecord, RelationDef, RelationMeta,
};
pub use validation::{
    IdentifierCollision, identifier_collisions, validate_catalog, validate_identifiers,
    validate_relations,
};
