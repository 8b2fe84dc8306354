//! Schema catalog type definitions.
//!
//! This module contains the data structures representing a schema catalog
//! including entities, fields, relations, and enumerated field choices.

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Complete schema catalog snapshot.
///
/// Entities keep the order in which they were added; every consumer of the
/// catalog iterates in that order.
#[derive(Debug, Clone, Default)]
pub struct Catalog {
    /// Entity definitions keyed by collection name.
    pub entities: IndexMap<String, EntityDef>,
    /// Relation definitions.
    pub relations: Vec<RelationDef>,
}

impl Catalog {
    /// Creates a new empty catalog.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds an entity definition, replacing any entity with the same name.
    pub fn add_entity(&mut self, entity: EntityDef) {
        self.entities.insert(entity.collection.clone(), entity);
    }

    /// Adds a relation definition.
    pub fn add_relation(&mut self, relation: RelationDef) {
        self.relations.push(relation);
    }

    /// Looks up an entity by collection name.
    #[must_use]
    pub fn get_entity(&self, collection: &str) -> Option<&EntityDef> {
        self.entities.get(collection)
    }

    /// Returns true if an entity with the given collection name exists.
    #[must_use]
    pub fn has_entity(&self, collection: &str) -> bool {
        self.entities.contains_key(collection)
    }

    /// Iterates entities in catalog order.
    pub fn entities(&self) -> impl Iterator<Item = &EntityDef> {
        self.entities.values()
    }

    /// Returns the number of entities.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entities.len()
    }

    /// Returns true if the catalog has no entities.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entities.is_empty()
    }
}

/// Entity (collection) definition.
#[derive(Debug, Clone)]
pub struct EntityDef {
    /// Plural collection name, the source-of-truth identifier.
    pub collection: String,
    /// Human-readable note.
    pub note: Option<String>,
    /// Fields keyed by field name, in catalog order.
    pub fields: IndexMap<String, FieldDef>,
}

impl EntityDef {
    /// Creates a new entity definition with no fields.
    #[must_use]
    pub fn new(collection: impl Into<String>) -> Self {
        Self {
            collection: collection.into(),
            note: None,
            fields: IndexMap::new(),
        }
    }

    /// Adds a field to the entity.
    pub fn add_field(&mut self, field: FieldDef) {
        self.fields.insert(field.name.clone(), field);
    }

    /// Adds a field and returns the entity.
    #[must_use]
    pub fn with_field(mut self, field: FieldDef) -> Self {
        self.add_field(field);
        self
    }

    /// Looks up a field by name.
    #[must_use]
    pub fn get_field(&self, name: &str) -> Option<&FieldDef> {
        self.fields.get(name)
    }
}

/// Field definition.
#[derive(Debug, Clone)]
pub struct FieldDef {
    /// Field name.
    pub name: String,
    /// Schema-level field type.
    pub kind: FieldKind,
    /// Whether the stored value may be null.
    pub nullable: bool,
    /// Human-readable note.
    pub note: Option<String>,
    /// Underlying storage type, absent for virtual fields.
    pub db_type: Option<String>,
}

impl FieldDef {
    /// Creates a new non-nullable field without note or storage type.
    #[must_use]
    pub fn new(name: impl Into<String>, kind: FieldKind) -> Self {
        Self {
            name: name.into(),
            kind,
            nullable: false,
            note: None,
            db_type: None,
        }
    }

    /// Sets nullability.
    #[must_use]
    pub fn nullable(mut self, nullable: bool) -> Self {
        self.nullable = nullable;
        self
    }

    /// Sets the note.
    #[must_use]
    pub fn note(mut self, note: impl Into<String>) -> Self {
        self.note = Some(note.into());
        self
    }

    /// Sets the storage type.
    #[must_use]
    pub fn db_type(mut self, db_type: impl Into<String>) -> Self {
        self.db_type = Some(db_type.into());
        self
    }

    /// Returns true if this is a virtual reverse-relation placeholder.
    #[must_use]
    pub const fn is_alias(&self) -> bool {
        matches!(self.kind, FieldKind::Alias)
    }
}

/// Schema field types.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum FieldKind {
    /// True/false.
    Boolean,
    /// 32-bit integer.
    Integer,
    /// 64-bit integer.
    BigInteger,
    /// Floating point number.
    Float,
    /// Fixed-point decimal.
    Decimal,
    /// Date and time without zone.
    DateTime,
    /// Calendar date.
    Date,
    /// Time of day.
    Time,
    /// Date and time with zone.
    Timestamp,
    /// Long text.
    Text,
    /// Short string.
    String,
    /// UUID.
    Uuid,
    /// Hashed string.
    Hash,
    /// Arbitrary JSON.
    Json,
    /// Comma separated values.
    Csv,
    /// Virtual field without a column.
    Alias,
    /// Raw bytes.
    Binary,
    /// Geometry, optionally with a subtype (`geometry.Point`).
    Geometry(Option<String>),
    /// Any type name this crate does not know about.
    Unknown(String),
}

impl FieldKind {
    /// Parses a field kind from its schema name. Never fails.
    #[must_use]
    pub fn parse(name: &str) -> Self {
        match name {
            "boolean" => Self::Boolean,
            "integer" => Self::Integer,
            "bigInteger" => Self::BigInteger,
            "float" => Self::Float,
            "decimal" => Self::Decimal,
            "dateTime" => Self::DateTime,
            "date" => Self::Date,
            "time" => Self::Time,
            "timestamp" => Self::Timestamp,
            "text" => Self::Text,
            "string" => Self::String,
            "uuid" => Self::Uuid,
            "hash" => Self::Hash,
            "json" => Self::Json,
            "csv" => Self::Csv,
            "alias" => Self::Alias,
            "binary" => Self::Binary,
            "geometry" => Self::Geometry(None),
            other => match other.strip_prefix("geometry.") {
                Some(subtype) => Self::Geometry(Some(subtype.to_string())),
                None => Self::Unknown(other.to_string()),
            },
        }
    }

    /// Returns the schema name of the kind.
    #[must_use]
    pub fn schema_name(&self) -> String {
        match self {
            Self::Boolean => "boolean".to_string(),
            Self::Integer => "integer".to_string(),
            Self::BigInteger => "bigInteger".to_string(),
            Self::Float => "float".to_string(),
            Self::Decimal => "decimal".to_string(),
            Self::DateTime => "dateTime".to_string(),
            Self::Date => "date".to_string(),
            Self::Time => "time".to_string(),
            Self::Timestamp => "timestamp".to_string(),
            Self::Text => "text".to_string(),
            Self::String => "string".to_string(),
            Self::Uuid => "uuid".to_string(),
            Self::Hash => "hash".to_string(),
            Self::Json => "json".to_string(),
            Self::Csv => "csv".to_string(),
            Self::Alias => "alias".to_string(),
            Self::Binary => "binary".to_string(),
            Self::Geometry(None) => "geometry".to_string(),
            Self::Geometry(Some(subtype)) => format!("geometry.{subtype}"),
            Self::Unknown(name) => name.clone(),
        }
    }

    /// Returns true if this is a numeric type.
    #[must_use]
    pub const fn is_numeric(&self) -> bool {
        matches!(
            self,
            Self::Integer | Self::BigInteger | Self::Float | Self::Decimal
        )
    }

    /// Returns true if this is a date or time type.
    #[must_use]
    pub const fn is_temporal(&self) -> bool {
        matches!(
            self,
            Self::DateTime | Self::Date | Self::Time | Self::Timestamp
        )
    }
}

impl fmt::Display for FieldKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.schema_name())
    }
}

/// Relation definition.
///
/// One record describes both sides of a one-to-many link: the forward
/// (many-to-one) field on `collection`, and the alias field named by
/// `meta.one_field` on `meta.one_collection`.
#[derive(Debug, Clone, Default)]
pub struct RelationDef {
    /// Collection holding the foreign key.
    pub collection: String,
    /// Field holding the foreign key.
    pub field: String,
    /// Collection the foreign key points to.
    pub related_collection: Option<String>,
    /// Column on the related collection referenced by the foreign key.
    pub foreign_key_column: Option<String>,
    /// One/many side metadata.
    pub meta: Option<RelationMeta>,
}

impl RelationDef {
    /// Creates a forward relation from `collection.field` to `related`.
    #[must_use]
    pub fn new(
        collection: impl Into<String>,
        field: impl Into<String>,
        related: impl Into<String>,
    ) -> Self {
        Self {
            collection: collection.into(),
            field: field.into(),
            related_collection: Some(related.into()),
            foreign_key_column: None,
            meta: None,
        }
    }

    /// Sets the referenced column.
    #[must_use]
    pub fn foreign_key_column(mut self, column: impl Into<String>) -> Self {
        self.foreign_key_column = Some(column.into());
        self
    }

    /// Declares the alias field on the "one" side of the relation.
    #[must_use]
    pub fn one_field(mut self, one_field: impl Into<String>) -> Self {
        self.meta = Some(RelationMeta {
            one_collection: self.related_collection.clone(),
            one_field: Some(one_field.into()),
            many_collection: Some(self.collection.clone()),
            many_field: Some(self.field.clone()),
        });
        self
    }

    /// Returns the collection on the "many" side.
    #[must_use]
    pub fn many_collection(&self) -> &str {
        self.meta
            .as_ref()
            .and_then(|m| m.many_collection.as_deref())
            .unwrap_or(&self.collection)
    }
}

/// One/many side metadata of a relation.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RelationMeta {
    /// Collection on the "one" side.
    pub one_collection: Option<String>,
    /// Alias field on the "one" side.
    pub one_field: Option<String>,
    /// Collection on the "many" side.
    pub many_collection: Option<String>,
    /// Foreign key field on the "many" side.
    pub many_field: Option<String>,
}

/// Permitted value of an enumerated-choice field.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Choice {
    /// Stored value.
    pub value: serde_json::Value,
    /// Display label.
    #[serde(default, alias = "text")]
    pub label: Option<String>,
}

impl Choice {
    /// Creates a string-valued choice.
    #[must_use]
    pub fn new(value: impl Into<String>, label: Option<String>) -> Self {
        Self {
            value: serde_json::Value::String(value.into()),
            label,
        }
    }

    /// Returns the value as literal text.
    #[must_use]
    pub fn literal(&self) -> String {
        match &self.value {
            serde_json::Value::String(s) => s.clone(),
            serde_json::Value::Null => "null".to_string(),
            other => other.to_string(),
        }
    }
}

/// Per-field metadata record as stored alongside the schema.
#[derive(Debug, Clone, PartialEq)]
pub struct FieldMetaRecord {
    /// Owning collection.
    pub collection: String,
    /// Field name.
    pub field: String,
    /// Configured choices, if any.
    pub choices: Option<Vec<Choice>>,
    /// Why the configured choices could not be read.
    pub error: Option<String>,
}
