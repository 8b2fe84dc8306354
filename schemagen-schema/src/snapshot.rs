//! Schema snapshot parser.
//!
//! This module parses a JSON schema snapshot (collections, fields and
//! relations exported from the data platform) into a [`Catalog`] plus the
//! per-field metadata records used for enumerated choices.

use crate::error::ParseError;
use crate::types::{
    Catalog, Choice, EntityDef, FieldDef, FieldKind, FieldMetaRecord, RelationDef, RelationMeta,
};
use serde::Deserialize;

/// Parsed snapshot: the catalog plus field metadata.
#[derive(Debug, Clone, Default)]
pub struct Snapshot {
    /// Schema catalog.
    pub catalog: Catalog,
    /// Per-field metadata records, in snapshot order.
    pub field_meta: Vec<FieldMetaRecord>,
}

#[derive(Debug, Deserialize)]
struct RawSnapshot {
    #[serde(default)]
    collections: Vec<RawCollection>,
    #[serde(default)]
    fields: Vec<RawField>,
    #[serde(default)]
    relations: Vec<RawRelation>,
}

#[derive(Debug, Deserialize)]
struct RawCollection {
    collection: String,
    #[serde(default)]
    meta: Option<RawCollectionMeta>,
}

#[derive(Debug, Deserialize)]
struct RawCollectionMeta {
    #[serde(default)]
    note: Option<String>,
}

#[derive(Debug, Deserialize)]
struct RawField {
    collection: String,
    field: String,
    #[serde(rename = "type")]
    kind: String,
    #[serde(default)]
    meta: Option<RawFieldMeta>,
    #[serde(default)]
    schema: Option<RawColumn>,
}

#[derive(Debug, Deserialize)]
struct RawFieldMeta {
    #[serde(default)]
    note: Option<String>,
    #[serde(default)]
    options: Option<serde_json::Value>,
}

#[derive(Debug, Deserialize)]
struct RawColumn {
    #[serde(default)]
    data_type: Option<String>,
    #[serde(default)]
    is_nullable: bool,
}

#[derive(Debug, Deserialize)]
struct RawRelation {
    collection: String,
    field: String,
    #[serde(default)]
    related_collection: Option<String>,
    #[serde(default)]
    schema: Option<RawRelationSchema>,
    #[serde(default)]
    meta: Option<RawRelationMeta>,
}

#[derive(Debug, Deserialize)]
struct RawRelationSchema {
    #[serde(default)]
    foreign_key_column: Option<String>,
}

#[derive(Debug, Deserialize)]
struct RawRelationMeta {
    #[serde(default)]
    one_collection: Option<String>,
    #[serde(default)]
    one_field: Option<String>,
    #[serde(default)]
    many_collection: Option<String>,
    #[serde(default)]
    many_field: Option<String>,
}

/// Parses a schema snapshot from a JSON string.
///
/// # Arguments
/// * `json` - Snapshot document
///
/// # Returns
/// Parsed snapshot or parse error.
///
/// # Errors
/// Returns `ParseError` if the JSON is malformed, a field names an
/// undeclared collection, or a collection or field is declared twice.
pub fn parse_snapshot(json: &str) -> Result<Snapshot, ParseError> {
    let raw: RawSnapshot = serde_json::from_str(json)?;
    let mut snapshot = Snapshot::default();

    for collection in raw.collections {
        if snapshot.catalog.has_entity(&collection.collection) {
            return Err(ParseError::duplicate("collection", collection.collection));
        }
        let mut entity = EntityDef::new(collection.collection);
        entity.note = collection.meta.and_then(|m| m.note);
        snapshot.catalog.add_entity(entity);
    }

    for raw_field in raw.fields {
        let (field, record) = convert_field(raw_field);
        let entity = snapshot
            .catalog
            .entities
            .get_mut(&record.collection)
            .ok_or_else(|| {
                ParseError::unknown_collection(
                    &record.collection,
                    format!("field '{}'", record.field),
                )
            })?;
        if entity.fields.contains_key(&field.name) {
            return Err(ParseError::duplicate(
                "field",
                format!("{}.{}", record.collection, field.name),
            ));
        }
        entity.add_field(field);
        if record.choices.is_some() || record.error.is_some() {
            snapshot.field_meta.push(record);
        }
    }

    for raw_relation in raw.relations {
        if raw_relation.collection.is_empty() || raw_relation.field.is_empty() {
            return Err(ParseError::invalid_structure(
                "relation without collection or field",
            ));
        }
        snapshot.catalog.add_relation(convert_relation(raw_relation));
    }

    Ok(snapshot)
}

fn convert_field(raw: RawField) -> (FieldDef, FieldMetaRecord) {
    let (note, choices) = match raw.meta {
        Some(meta) => (meta.note, read_choices(meta.options)),
        None => (None, Ok(None)),
    };
    let (db_type, nullable) = match raw.schema {
        Some(column) => (column.data_type, column.is_nullable),
        None => (None, false),
    };

    let field = FieldDef {
        name: raw.field.clone(),
        kind: FieldKind::parse(&raw.kind),
        nullable,
        note,
        db_type,
    };
    let (choices, error) = match choices {
        Ok(choices) => (choices, None),
        Err(error) => (None, Some(error)),
    };
    let record = FieldMetaRecord {
        collection: raw.collection,
        field: raw.field,
        choices,
        error,
    };
    (field, record)
}

/// Reads `options.choices` of one field.
///
/// A malformed list is reported for that field only, so the rest of the
/// snapshot still parses.
fn read_choices(options: Option<serde_json::Value>) -> Result<Option<Vec<Choice>>, String> {
    let Some(value) = options.and_then(|mut o| o.get_mut("choices").map(serde_json::Value::take))
    else {
        return Ok(None);
    };
    if value.is_null() {
        return Ok(None);
    }
    serde_json::from_value(value)
        .map(Some)
        .map_err(|err| format!("invalid choices: {err}"))
}

fn convert_relation(raw: RawRelation) -> RelationDef {
    RelationDef {
        collection: raw.collection,
        field: raw.field,
        related_collection: raw.related_collection,
        foreign_key_column: raw.schema.and_then(|s| s.foreign_key_column),
        meta: raw.meta.map(|m| RelationMeta {
            one_collection: m.one_collection,
            one_field: m.one_field,
            many_collection: m.many_collection,
            many_field: m.many_field,
        }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const BLOG: &str = r#"{
        "collections": [
            { "collection": "authors", "meta": { "note": "People who write" } },
            { "collection": "articles" }
        ],
        "fields": [
            { "collection": "authors", "field": "id", "type": "integer",
              "schema": { "data_type": "integer", "is_nullable": false } },
            { "collection": "authors", "field": "articles", "type": "alias",
              "meta": { "note": "Written articles" } },
            { "collection": "articles", "field": "id", "type": "uuid",
              "schema": { "data_type": "uuid" } },
            { "collection": "articles", "field": "status", "type": "string",
              "meta": { "options": { "choices": [
                  { "text": "Draft", "value": "draft" },
                  { "text": "Published", "value": "published" } ] } },
              "schema": { "data_type": "character varying", "is_nullable": true } },
            { "collection": "articles", "field": "author", "type": "integer",
              "schema": { "data_type": "integer", "is_nullable": true } }
        ],
        "relations": [
            { "collection": "articles", "field": "author", "related_collection": "authors",
              "schema": { "foreign_key_column": "id" },
              "meta": { "one_collection": "authors", "one_field": "articles",
                        "many_collection": "articles", "many_field": "author" } }
        ]
    }"#;

    #[test]
    fn test_parse_snapshot_entities_in_order() {
        let snapshot = parse_snapshot(BLOG).expect("Failed to parse");
        let names: Vec<_> = snapshot
            .catalog
            .entities()
            .map(|e| e.collection.as_str())
            .collect();
        assert_eq!(names, ["authors", "articles"]);

        let authors = snapshot.catalog.get_entity("authors").expect("authors");
        assert_eq!(authors.note.as_deref(), Some("People who write"));
    }

    #[test]
    fn test_parse_snapshot_fields() {
        let snapshot = parse_snapshot(BLOG).expect("Failed to parse");
        let articles = snapshot.catalog.get_entity("articles").expect("articles");

        let fields: Vec<_> = articles.fields.keys().map(String::as_str).collect();
        assert_eq!(fields, ["id", "status", "author"]);

        let status = articles.get_field("status").expect("status");
        assert_eq!(status.kind, FieldKind::String);
        assert!(status.nullable);
        assert_eq!(status.db_type.as_deref(), Some("character varying"));

        let alias = snapshot
            .catalog
            .get_entity("authors")
            .and_then(|e| e.get_field("articles"))
            .expect("alias");
        assert!(alias.is_alias());
        assert!(alias.db_type.is_none());
        assert!(!alias.nullable);
        assert_eq!(alias.note.as_deref(), Some("Written articles"));
    }

    #[test]
    fn test_parse_snapshot_field_meta_only_for_choices() {
        let snapshot = parse_snapshot(BLOG).expect("Failed to parse");
        assert_eq!(snapshot.field_meta.len(), 1);

        let record = &snapshot.field_meta[0];
        assert_eq!(record.collection, "articles");
        assert_eq!(record.field, "status");
        let choices = record.choices.as_ref().expect("choices");
        assert_eq!(choices[1].literal(), "published");
        assert_eq!(choices[1].label.as_deref(), Some("Published"));
    }

    #[test]
    fn test_parse_snapshot_malformed_choices_stay_on_the_field() {
        let json = r#"{
            "collections": [{ "collection": "tags" }, { "collection": "pages" }],
            "fields": [
                { "collection": "tags", "field": "color", "type": "string",
                  "meta": { "options": { "choices": [{ "text": "Red" }] } } },
                { "collection": "tags", "field": "size", "type": "string",
                  "meta": { "options": { "choices": [{ "value": "s", "text": "S", "label": "Small" }] } } },
                { "collection": "tags", "field": "name", "type": "string",
                  "meta": { "options": { "choices": null } } },
                { "collection": "pages", "field": "slug", "type": "string" }
            ]
        }"#;

        let snapshot = parse_snapshot(json).expect("Failed to parse");
        assert_eq!(snapshot.catalog.len(), 2);
        assert_eq!(snapshot.field_meta.len(), 2);
        for record in &snapshot.field_meta {
            assert!(record.choices.is_none());
            let error = record.error.as_deref().expect("error recorded");
            assert!(error.starts_with("invalid choices"), "{error}");
        }
        assert_eq!(snapshot.field_meta[0].field, "color");
        assert_eq!(snapshot.field_meta[1].field, "size");
    }

    #[test]
    fn test_parse_snapshot_relations() {
        let snapshot = parse_snapshot(BLOG).expect("Failed to parse");
        assert_eq!(snapshot.catalog.relations.len(), 1);

        let relation = &snapshot.catalog.relations[0];
        assert_eq!(relation.collection, "articles");
        assert_eq!(relation.related_collection.as_deref(), Some("authors"));
        assert_eq!(relation.foreign_key_column.as_deref(), Some("id"));
        let meta = relation.meta.as_ref().expect("meta");
        assert_eq!(meta.one_field.as_deref(), Some("articles"));
    }

    #[test]
    fn test_parse_snapshot_unknown_collection() {
        let json = r#"{ "collections": [],
            "fields": [{ "collection": "ghosts", "field": "id", "type": "integer" }] }"#;
        let result = parse_snapshot(json);
        assert!(matches!(
            result,
            Err(ParseError::UnknownCollection { ref collection, .. }) if collection == "ghosts"
        ));
    }

    #[test]
    fn test_parse_snapshot_duplicate_field() {
        let json = r#"{ "collections": [{ "collection": "tags" }],
            "fields": [
                { "collection": "tags", "field": "id", "type": "integer" },
                { "collection": "tags", "field": "id", "type": "uuid" }
            ] }"#;
        let result = parse_snapshot(json);
        assert!(matches!(result, Err(ParseError::DuplicateDefinition { .. })));
    }

    #[test]
    fn test_parse_snapshot_duplicate_collection() {
        let json = r#"{ "collections": [{ "collection": "tags" }, { "collection": "tags" }] }"#;
        let result = parse_snapshot(json);
        assert!(matches!(result, Err(ParseError::DuplicateDefinition { .. })));
    }

    #[test]
    fn test_parse_snapshot_malformed_json() {
        let result = parse_snapshot("{ \"collections\": [");
        assert!(matches!(result, Err(ParseError::Json(_))));
    }

    #[test]
    fn test_parse_snapshot_empty_document() {
        let snapshot = parse_snapshot("{}").expect("Failed to parse");
        assert!(snapshot.catalog.is_empty());
        assert!(snapshot.field_meta.is_empty());
    }
}
