//! Pre-indexed relation lookup for code generation.
//!
//! Relations are stored in the catalog as a flat list. Classification needs
//! two lookups per field, so both directions are indexed once per run.

use crate::types::{Catalog, RelationDef};
use std::collections::HashMap;

type FieldKey = (String, String);

/// Result of a relation lookup.
#[derive(Debug, Clone, Copy)]
pub enum RelationLookup<'a> {
    /// Exactly one relation matches.
    Found(&'a RelationDef),
    /// Several relations claim the same key.
    Ambiguous(usize),
    /// No relation matches.
    Missing,
}

impl<'a> RelationLookup<'a> {
    /// Returns the matching relation, if exactly one exists.
    #[must_use]
    pub const fn found(&self) -> Option<&'a RelationDef> {
        match *self {
            Self::Found(relation) => Some(relation),
            _ => None,
        }
    }
}

/// Forward and reverse relation indexes built from a catalog.
#[derive(Debug, Clone, Default)]
pub struct RelationIndex<'a> {
    forward: HashMap<FieldKey, Vec<&'a RelationDef>>,
    reverse: HashMap<FieldKey, Vec<&'a RelationDef>>,
}

impl<'a> RelationIndex<'a> {
    /// Indexes every relation of the catalog.
    ///
    /// Forward entries are keyed by `(collection, field)`, reverse entries
    /// by `(meta.one_collection, meta.one_field)`. Relations without a
    /// complete one-side are not reverse-indexed.
    #[must_use]
    pub fn build(catalog: &'a Catalog) -> Self {
        let mut index = Self::default();

        for relation in &catalog.relations {
            index
                .forward
                .entry((relation.collection.clone(), relation.field.clone()))
                .or_default()
                .push(relation);

            let one_side = relation
                .meta
                .as_ref()
                .and_then(|m| m.one_collection.as_ref().zip(m.one_field.as_ref()));
            if let Some((one_collection, one_field)) = one_side {
                index
                    .reverse
                    .entry((one_collection.clone(), one_field.clone()))
                    .or_default()
                    .push(relation);
            }
        }

        index
    }

    /// Looks up the relation whose foreign key is `collection.field`.
    #[must_use]
    pub fn forward(&self, collection: &str, field: &str) -> RelationLookup<'a> {
        lookup(&self.forward, collection, field)
    }

    /// Looks up the relation whose alias field is `collection.field`.
    #[must_use]
    pub fn reverse(&self, collection: &str, field: &str) -> RelationLookup<'a> {
        lookup(&self.reverse, collection, field)
    }

    /// Iterates forward keys claimed by more than one relation.
    pub fn ambiguous_forward(&self) -> impl Iterator<Item = (&str, &str)> {
        ambiguous(&self.forward)
    }

    /// Iterates reverse keys claimed by more than one relation.
    pub fn ambiguous_reverse(&self) -> impl Iterator<Item = (&str, &str)> {
        ambiguous(&self.reverse)
    }
}

fn lookup<'a>(
    map: &HashMap<FieldKey, Vec<&'a RelationDef>>,
    collection: &str,
    field: &str,
) -> RelationLookup<'a> {
    // Owned key; HashMap cannot borrow a tuple of &str against (String, String).
    match map.get(&(collection.to_string(), field.to_string())) {
        None => RelationLookup::Missing,
        Some(relations) if relations.len() == 1 => RelationLookup::Found(relations[0]),
        Some(relations) => RelationLookup::Ambiguous(relations.len()),
    }
}

fn ambiguous<'m>(
    map: &'m HashMap<FieldKey, Vec<&RelationDef>>,
) -> impl Iterator<Item = (&'m str, &'m str)> {
    map.iter()
        .filter(|(_, relations)| relations.len() > 1)
        .map(|((collection, field), _)| (collection.as_str(), field.as_str()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{EntityDef, RelationMeta};

    fn blog_catalog() -> Catalog {
        let mut catalog = Catalog::new();
        catalog.add_entity(EntityDef::new("authors"));
        catalog.add_entity(EntityDef::new("articles"));
        catalog.add_relation(
            RelationDef::new("articles", "author", "authors")
                .foreign_key_column("id")
                .one_field("articles"),
        );
        catalog
    }

    #[test]
    fn test_relation_index_forward() {
        let catalog = blog_catalog();
        let index = RelationIndex::build(&catalog);

        let relation = index.forward("articles", "author").found().expect("forward");
        assert_eq!(relation.related_collection.as_deref(), Some("authors"));
        assert!(matches!(
            index.forward("articles", "title"),
            RelationLookup::Missing
        ));
    }

    #[test]
    fn test_relation_index_reverse() {
        let catalog = blog_catalog();
        let index = RelationIndex::build(&catalog);

        let relation = index.reverse("authors", "articles").found().expect("reverse");
        assert_eq!(relation.collection, "articles");
        assert!(matches!(
            index.reverse("articles", "author"),
            RelationLookup::Missing
        ));
    }

    #[test]
    fn test_relation_index_skips_incomplete_one_side() {
        let mut catalog = Catalog::new();
        let mut relation = RelationDef::new("articles", "author", "authors");
        relation.meta = Some(RelationMeta {
            one_collection: Some("authors".to_string()),
            ..RelationMeta::default()
        });
        catalog.add_relation(relation);

        let index = RelationIndex::build(&catalog);
        assert!(index.forward("articles", "author").found().is_some());
        assert_eq!(index.ambiguous_reverse().count(), 0);
    }

    #[test]
    fn test_relation_index_ambiguous() {
        let mut catalog = blog_catalog();
        catalog.add_relation(RelationDef::new("articles", "author", "editors"));

        let index = RelationIndex::build(&catalog);
        assert!(matches!(
            index.forward("articles", "author"),
            RelationLookup::Ambiguous(2)
        ));
        let ambiguous: Vec<_> = index.ambiguous_forward().collect();
        assert_eq!(ambiguous, [("articles", "author")]);
    }
}
