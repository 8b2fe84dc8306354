//! Relation classification.
//!
//! A field is a forward relation when it holds a foreign key to another
//! entity, and a reverse relation when it is the alias on the "one" side of
//! a one-to-many link. Everything else falls through to choice and scalar
//! resolution.

use crate::error::ResolveError;
use crate::typescript::scalar::scalar_type;
use crate::typescript::types::TsType;
use schemagen_schema::{
    Catalog, EntityDef, FieldDef, RelationDef, RelationIndex, RelationLookup, type_identifier,
};

/// Type of a relation field plus the import it needs.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RelationType {
    /// Field type expression.
    pub ty: TsType,
    /// Type identifier to import, `None` for self-references.
    pub import: Option<String>,
}

/// Classifies fields against the relations of a catalog.
#[derive(Debug, Clone)]
pub struct RelationClassifier<'a> {
    catalog: &'a Catalog,
    index: RelationIndex<'a>,
}

impl<'a> RelationClassifier<'a> {
    /// Creates a classifier, indexing the relations of `catalog`.
    #[must_use]
    pub fn new(catalog: &'a Catalog) -> Self {
        Self {
            catalog,
            index: RelationIndex::build(catalog),
        }
    }

    /// Resolves `field` as a forward (many-to-one) relation.
    ///
    /// With a referenced column the type is `Related | Related["column"]`,
    /// otherwise `Related | <scalar type of the field>`.
    ///
    /// # Returns
    /// `None` if no relation is keyed by this field.
    ///
    /// # Errors
    /// Returns `ResolveError` if the relation is ambiguous, has no related
    /// entity, or the fallback scalar type is unsupported.
    pub fn forward(
        &self,
        entity: &EntityDef,
        field: &FieldDef,
    ) -> Result<Option<RelationType>, ResolveError> {
        let relation = match self.index.forward(&entity.collection, &field.name) {
            RelationLookup::Missing => return Ok(None),
            RelationLookup::Ambiguous(count) => {
                return Err(ambiguous_key(count, entity, field));
            }
            RelationLookup::Found(relation) => relation,
        };

        let related = relation.related_collection.as_deref().ok_or_else(|| {
            ResolveError::ambiguous(format!(
                "relation on '{}.{}' has no related collection",
                entity.collection, field.name
            ))
        })?;
        let identifier = self.related_identifier(related, relation)?;

        let key_type = match &relation.foreign_key_column {
            Some(column) => TsType::IndexedAccess {
                object: identifier.clone(),
                key: column.clone(),
            },
            None => scalar_type(&field.kind)?,
        };

        Ok(Some(RelationType {
            ty: TsType::union([TsType::reference(identifier.as_str()), key_type]),
            import: import_for(entity, related, identifier),
        }))
    }

    /// Resolves `field` as the alias side of a one-to-many relation.
    ///
    /// The type is an array of the "many"-side entity: `Related[]`.
    ///
    /// # Returns
    /// `None` if no relation names this field as its one-side.
    ///
    /// # Errors
    /// Returns `ResolveError` if the relation is ambiguous or its "many"
    /// side is not in the catalog.
    pub fn reverse(
        &self,
        entity: &EntityDef,
        field: &FieldDef,
    ) -> Result<Option<RelationType>, ResolveError> {
        let relation = match self.index.reverse(&entity.collection, &field.name) {
            RelationLookup::Missing => return Ok(None),
            RelationLookup::Ambiguous(count) => {
                return Err(ambiguous_key(count, entity, field));
            }
            RelationLookup::Found(relation) => relation,
        };

        let related = relation.many_collection();
        let identifier = self.related_identifier(related, relation)?;

        Ok(Some(RelationType {
            ty: TsType::array(TsType::reference(identifier.as_str())),
            import: import_for(entity, related, identifier),
        }))
    }

    fn related_identifier(
        &self,
        related: &str,
        relation: &RelationDef,
    ) -> Result<String, ResolveError> {
        if !self.catalog.has_entity(related) {
            return Err(ResolveError::ambiguous(format!(
                "relation on '{}.{}' points to unknown collection '{related}'",
                relation.collection, relation.field
            )));
        }
        Ok(type_identifier(related))
    }
}

fn import_for(entity: &EntityDef, related: &str, identifier: String) -> Option<String> {
    (entity.collection != related).then_some(identifier)
}

fn ambiguous_key(count: usize, entity: &EntityDef, field: &FieldDef) -> ResolveError {
    ResolveError::ambiguous(format!(
        "{count} relations claim '{}.{}'",
        entity.collection, field.name
    ))
}
