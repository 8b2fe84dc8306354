//! Model declaration generation.
//!
//! One declaration unit is produced per entity. Each field is resolved by a
//! fixed chain of strategies (relation, choices, scalar); the first one that
//! claims the field decides its type. A field that fails is emitted as
//! `never` and reported, and the rest of the entity is still generated.

use crate::diagnostic::Diagnostic;
use crate::error::{CodegenError, ResolveError};
use crate::metadata::MetadataSource;
use crate::typescript::choices::{ChoiceFailure, ChoiceResolver};
use crate::typescript::relations::{RelationClassifier, RelationType};
use crate::typescript::scalar::scalar_type;
use crate::typescript::types::{TsType, escape};
use indexmap::IndexSet;
use schemagen_schema::{Catalog, EntityDef, FieldDef, is_valid_identifier, type_identifier};
use std::time::Duration;

const NO_NOTE: &str = "No description.";
const NO_COLUMN: &str = "none (virtual field)";

/// Type of one field before nullability is applied.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedField {
    /// Field type expression.
    pub ty: TsType,
    /// Type identifier to import, if any.
    pub import: Option<String>,
}

impl From<RelationType> for ResolvedField {
    fn from(relation: RelationType) -> Self {
        Self {
            ty: relation.ty,
            import: relation.import,
        }
    }
}

impl From<TsType> for ResolvedField {
    fn from(ty: TsType) -> Self {
        Self { ty, import: None }
    }
}

/// Field-level resolution result.
pub type FieldResolution = Result<ResolvedField, ResolveError>;

/// Generated declaration for one entity.
#[derive(Debug)]
pub struct ModelUnit {
    /// Declared type identifier.
    pub type_name: String,
    /// Imported type identifiers, deduplicated, in first-seen order.
    pub imports: Vec<String>,
    /// Declaration text.
    pub source: String,
    /// Fields that were emitted as `never`.
    pub diagnostics: Vec<Diagnostic>,
}

/// Generator for model declarations.
pub struct ModelEmitter<'a> {
    relations: RelationClassifier<'a>,
    choices: ChoiceResolver<'a>,
}

impl<'a> ModelEmitter<'a> {
    /// Creates a new model emitter.
    #[must_use]
    pub fn new(catalog: &'a Catalog, metadata: &'a dyn MetadataSource) -> Self {
        Self {
            relations: RelationClassifier::new(catalog),
            choices: ChoiceResolver::new(metadata),
        }
    }

    /// Bounds every metadata lookup by `timeout`.
    #[must_use]
    pub fn with_metadata_timeout(mut self, timeout: Option<Duration>) -> Self {
        self.choices = self.choices.with_timeout(timeout);
        self
    }

    /// Resolves the type of one field, without nullability.
    ///
    /// Alias fields try the reverse relation, other fields the forward
    /// relation; then configured choices; then the scalar mapping.
    ///
    /// # Errors
    /// Returns `CodegenError::Metadata` if the metadata store is
    /// unreachable. Field-level failures are returned inside `Ok`.
    pub async fn resolve_field(
        &self,
        entity: &EntityDef,
        field: &FieldDef,
    ) -> Result<FieldResolution, CodegenError> {
        let relation = if field.is_alias() {
            self.relations.reverse(entity, field)
        } else {
            self.relations.forward(entity, field)
        };
        match relation {
            Ok(Some(relation)) => return Ok(Ok(relation.into())),
            Ok(None) => {}
            Err(err) => return Ok(Err(err)),
        }

        match self.choices.resolve(&entity.collection, &field.name).await {
            Ok(Some(ty)) => return Ok(Ok(ty.into())),
            Ok(None) => {}
            Err(ChoiceFailure::Field(err)) => return Ok(Err(err)),
            Err(ChoiceFailure::Fatal(source)) => {
                return Err(CodegenError::Metadata {
                    collection: entity.collection.clone(),
                    field: field.name.clone(),
                    source,
                });
            }
        }

        Ok(scalar_type(&field.kind).map(ResolvedField::from))
    }

    /// Generates the declaration unit for `entity`.
    ///
    /// # Errors
    /// Returns `CodegenError` only for run-level failures.
    pub async fn emit(&self, entity: &EntityDef) -> Result<ModelUnit, CodegenError> {
        let type_name = type_identifier(&entity.collection);
        let mut imports = IndexSet::new();
        let mut diagnostics = Vec::new();
        let mut body = String::new();

        for field in entity.fields.values() {
            let ty = match self.resolve_field(entity, field).await? {
                Ok(resolved) => {
                    if let Some(import) = resolved.import {
                        imports.insert(import);
                    }
                    if field.nullable {
                        resolved.ty.nullable()
                    } else {
                        resolved.ty
                    }
                }
                Err(cause) => {
                    diagnostics.push(Diagnostic::new(&entity.collection, &field.name, cause));
                    TsType::Never
                }
            };
            body.push_str(&render_field(field, &ty));
        }

        let mut output = String::new();
        for import in &imports {
            output.push_str(&render_import(import));
        }
        if !imports.is_empty() {
            output.push('\n');
        }

        output.push_str("/**\n");
        if let Some(note) = &entity.note {
            push_comment_lines(&mut output, "", note);
            output.push_str(" *\n");
        }
        output.push_str(&format!(
            " * Generated from the `{}` collection.\n",
            entity.collection
        ));
        output.push_str(" */\n");
        output.push_str(&format!("export type {type_name} = {{\n"));
        output.push_str(&body);
        output.push_str("};\n");

        Ok(ModelUnit {
            type_name,
            imports: imports.into_iter().collect(),
            source: output,
            diagnostics,
        })
    }
}

/// Renders a type-only import of a sibling unit.
#[must_use]
pub fn render_import(identifier: &str) -> String {
    format!("import type {{ {identifier} }} from \"./{identifier}\";\n")
}

/// Renders a property name, quoting it when it is not an identifier.
#[must_use]
pub fn property_name(name: &str) -> String {
    if is_valid_identifier(name) {
        name.to_string()
    } else {
        format!("\"{}\"", escape(name, '"'))
    }
}

fn render_field(field: &FieldDef, ty: &TsType) -> String {
    let mut output = String::new();

    output.push_str("  /**\n");
    push_comment_lines(&mut output, "  ", field.note.as_deref().unwrap_or(NO_NOTE));
    output.push_str("   *\n");
    output.push_str(&format!("   * Schema type: {}\n", field.kind));
    output.push_str(&format!(
        "   * Database type: {}\n",
        field.db_type.as_deref().unwrap_or(NO_COLUMN)
    ));
    output.push_str("   */\n");
    output.push_str(&format!("  {}: {ty};\n", property_name(&field.name)));

    output
}

fn push_comment_lines(output: &mut String, indent: &str, text: &str) {
    for line in text.lines() {
        let line = line.trim_end().replace("*/", "*\\/");
        if line.is_empty() {
            output.push_str(&format!("{indent} *\n"));
        } else {
            output.push_str(&format!("{indent} * {line}\n"));
        }
    }
}
