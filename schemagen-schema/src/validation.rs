//! Catalog validation utilities.
//!
//! This module provides validation functions for schema catalogs to catch
//! problems that would otherwise produce silently wrong output.

use crate::error::SchemaError;
use crate::ir::RelationIndex;
use crate::naming::{is_valid_identifier, type_identifier};
use crate::types::Catalog;
use std::collections::HashMap;

/// Two collections that derive the same type identifier.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IdentifierCollision {
    /// Shared identifier.
    pub identifier: String,
    /// Collection seen first in catalog order.
    pub first: String,
    /// Collection seen later.
    pub second: String,
}

impl From<IdentifierCollision> for SchemaError {
    fn from(collision: IdentifierCollision) -> Self {
        Self::IdentifierCollision {
            identifier: collision.identifier,
            first: collision.first,
            second: collision.second,
        }
    }
}

/// Validates a catalog for correctness.
///
/// # Arguments
/// * `catalog` - The catalog to validate
///
/// # Returns
/// Ok(()) if valid, or SchemaError describing the first issue.
///
/// # Errors
/// Returns `SchemaError` if validation fails.
pub fn validate_catalog(catalog: &Catalog) -> Result<(), SchemaError> {
    validate_identifiers(catalog)?;
    if let Some(collision) = identifier_collisions(catalog).into_iter().next() {
        return Err(collision.into());
    }
    validate_relations(catalog)?;
    Ok(())
}

/// Validates that every collection derives a usable type identifier.
///
/// # Errors
/// Returns `SchemaError::InvalidIdentifier` for the first collection whose
/// identifier is empty or starts with a digit.
pub fn validate_identifiers(catalog: &Catalog) -> Result<(), SchemaError> {
    for entity in catalog.entities() {
        let identifier = type_identifier(&entity.collection);
        if !is_valid_identifier(&identifier) {
            return Err(SchemaError::InvalidIdentifier {
                collection: entity.collection.clone(),
                identifier,
            });
        }
    }
    Ok(())
}

/// Validates that relations are attached to existing fields and unambiguous.
///
/// # Errors
/// Returns `SchemaError::RelationSourceNotFound` or
/// `SchemaError::DuplicateRelation` for the first problem found.
pub fn validate_relations(catalog: &Catalog) -> Result<(), SchemaError> {
    for relation in &catalog.relations {
        let source_exists = catalog
            .get_entity(&relation.collection)
            .is_some_and(|e| e.get_field(&relation.field).is_some());
        if !source_exists {
            return Err(SchemaError::RelationSourceNotFound {
                collection: relation.collection.clone(),
                field: relation.field.clone(),
            });
        }
    }

    let index = RelationIndex::build(catalog);
    if let Some((collection, field)) = index
        .ambiguous_forward()
        .chain(index.ambiguous_reverse())
        .min()
    {
        return Err(SchemaError::duplicate_relation(collection, field));
    }

    Ok(())
}

/// Finds every pair of collections whose identifiers would name the same
/// file.
///
/// Identifiers are compared case-insensitively, since `AbC.ts` and `Abc.ts`
/// are one file on case-insensitive filesystems. Each later collection is
/// reported against the first one that claimed the identifier, in catalog
/// order.
#[must_use]
pub fn identifier_collisions(catalog: &Catalog) -> Vec<IdentifierCollision> {
    let mut seen: HashMap<String, (String, &str)> = HashMap::new();
    let mut collisions = Vec::new();

    for entity in catalog.entities() {
        let identifier = type_identifier(&entity.collection);
        let folded = identifier.to_lowercase();
        let claimed = seen
            .get(&folded)
            .map(|(first_identifier, first)| (first_identifier.clone(), (*first).to_string()));
        if let Some((first_identifier, first)) = claimed {
            collisions.push(IdentifierCollision {
                identifier: first_identifier,
                first,
                second: entity.collection.clone(),
            });
        } else {
            seen.insert(folded, (identifier, &entity.collection));
        }
    }

    collisions
}
