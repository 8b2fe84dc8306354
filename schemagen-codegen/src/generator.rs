//! Generation driver.

use crate::config::{CollisionPolicy, GeneratorConfig};
use crate::diagnostic::Diagnostic;
use crate::error::CodegenError;
use crate::metadata::MetadataSource;
use crate::typescript::{IndexEmitter, ModelEmitter};
use futures::stream::{self, StreamExt, TryStreamExt};
use schemagen_schema::{
    Catalog, EntityDef, SchemaError, identifier_collisions, type_identifier,
    validate_identifiers, validate_relations,
};

/// One generated output unit.
#[derive(Debug)]
pub struct GeneratedUnit {
    /// Declared type identifier.
    pub type_name: String,
    /// Output file name, including the extension.
    pub file_name: String,
    /// Declaration text.
    pub source: String,
    /// Fields emitted as `never`.
    pub diagnostics: Vec<Diagnostic>,
}

/// Result of a full generation run.
#[derive(Debug)]
pub struct GenerationOutput {
    /// Model units in catalog order.
    pub models: Vec<GeneratedUnit>,
    /// Index unit.
    pub index: GeneratedUnit,
}

impl GenerationOutput {
    /// Returns all units, models first.
    pub fn units(&self) -> impl Iterator<Item = &GeneratedUnit> {
        self.models.iter().chain(std::iter::once(&self.index))
    }

    /// Returns every diagnostic of the run.
    pub fn diagnostics(&self) -> impl Iterator<Item = &Diagnostic> {
        self.models.iter().flat_map(|unit| unit.diagnostics.iter())
    }
}

/// Declaration generator for a catalog.
pub struct Generator<'a> {
    catalog: &'a Catalog,
    config: GeneratorConfig,
    models: ModelEmitter<'a>,
}

impl<'a> Generator<'a> {
    /// Creates a new generator.
    ///
    /// # Arguments
    /// * `catalog` - Catalog to generate from
    /// * `metadata` - Source of enumerated-choice metadata
    /// * `config` - Generation settings
    ///
    /// # Errors
    /// Returns `CodegenError::Schema` if a collection derives an invalid
    /// identifier, or if two collections derive the same identifier and the
    /// collision policy is `Reject`. Returns `CodegenError::IndexNameClash`
    /// under `Reject` if a model would share its file with the index.
    /// Identifiers are compared case-insensitively.
    pub fn new(
        catalog: &'a Catalog,
        metadata: &'a dyn MetadataSource,
        config: GeneratorConfig,
    ) -> Result<Self, CodegenError> {
        validate_identifiers(catalog)?;

        for collision in identifier_collisions(catalog) {
            match config.collision_policy {
                CollisionPolicy::Reject => return Err(SchemaError::from(collision).into()),
                CollisionPolicy::Overwrite => tracing::warn!(
                    identifier = %collision.identifier,
                    first = %collision.first,
                    second = %collision.second,
                    "identifier collision, later unit overwrites earlier one"
                ),
            }
        }

        let index_stem = config.index_stem.to_lowercase();
        for entity in catalog.entities() {
            let identifier = type_identifier(&entity.collection);
            if identifier.to_lowercase() != index_stem {
                continue;
            }
            match config.collision_policy {
                CollisionPolicy::Reject => {
                    return Err(CodegenError::IndexNameClash {
                        collection: entity.collection.clone(),
                        identifier,
                        index_stem: config.index_stem.clone(),
                    });
                }
                CollisionPolicy::Overwrite => tracing::warn!(
                    collection = %entity.collection,
                    identifier = %identifier,
                    "model unit shares its file with the index, index overwrites it"
                ),
            }
        }

        if let Err(err) = validate_relations(catalog) {
            tracing::warn!(error = %err, "catalog has relation problems");
        }

        let models =
            ModelEmitter::new(catalog, metadata).with_metadata_timeout(config.metadata_timeout);

        Ok(Self {
            catalog,
            config,
            models,
        })
    }

    /// Returns the configuration.
    #[must_use]
    pub fn config(&self) -> &GeneratorConfig {
        &self.config
    }

    /// Generates the model unit for one entity.
    ///
    /// # Errors
    /// Returns `CodegenError` if the metadata store is unreachable.
    pub async fn generate_model(&self, entity: &EntityDef) -> Result<GeneratedUnit, CodegenError> {
        tracing::debug!(entity = %entity.collection, fields = entity.fields.len(), "generating model");

        let unit = self.models.emit(entity).await?;
        for diagnostic in &unit.diagnostics {
            diagnostic.report();
        }

        Ok(GeneratedUnit {
            file_name: self.config.file_name(&unit.type_name),
            type_name: unit.type_name,
            source: unit.source,
            diagnostics: unit.diagnostics,
        })
    }

    /// Generates the index unit.
    #[must_use]
    pub fn generate_index(&self) -> GeneratedUnit {
        let source = IndexEmitter::new(self.catalog, self.config.index_name.as_str()).emit();
        GeneratedUnit {
            type_name: self.config.index_name.clone(),
            file_name: self.config.file_name(&self.config.index_stem),
            source,
            diagnostics: Vec::new(),
        }
    }

    /// Generates every model unit plus the index.
    ///
    /// Up to `concurrency` entities are in flight at once; models are
    /// returned in catalog order regardless.
    ///
    /// # Errors
    /// Returns the first run-level `CodegenError`.
    pub async fn generate(&self) -> Result<GenerationOutput, CodegenError> {
        tracing::info!(
            entities = self.catalog.len(),
            concurrency = self.config.concurrency,
            "generating declarations"
        );

        let models: Vec<GeneratedUnit> = stream::iter(self.catalog.entities())
            .map(|entity| self.generate_model(entity))
            .buffered(self.config.concurrency.max(1))
            .try_collect()
            .await?;
        let index = self.generate_index();

        let output = GenerationOutput { models, index };
        let diagnostics = output.diagnostics().count();
        if diagnostics > 0 {
            tracing::warn!(diagnostics, "some fields were emitted as never");
        }
        tracing::info!(units = output.models.len() + 1, "generation complete");

        Ok(output)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::metadata::{FieldMetadata, MetadataError, NoMetadata, StaticMetadata};
    use async_trait::async_trait;
    use schemagen_schema::{Choice, FieldDef, FieldKind, RelationDef, parse_snapshot};
    use std::time::Duration;

    const SNAPSHOT: &str = r#"{
        "collections": [
            { "collection": "authors", "meta": { "note": "People who write" } },
            { "collection": "articles" }
        ],
        "fields": [
            { "collection": "authors", "field": "id", "type": "integer",
              "schema": { "data_type": "integer", "is_nullable": false } },
            { "collection": "authors", "field": "articles", "type": "alias" },
            { "collection": "articles", "field": "id", "type": "uuid",
              "schema": { "data_type": "uuid", "is_nullable": false } },
            { "collection": "articles", "field": "author", "type": "integer",
              "schema": { "data_type": "integer", "is_nullable": true } },
            { "collection": "articles", "field": "status", "type": "string",
              "meta": { "options": { "choices": [
                  { "text": "Draft", "value": "draft" },
                  { "text": "Published", "value": "published" }
              ] } },
              "schema": { "data_type": "varchar", "is_nullable": false } },
            { "collection": "articles", "field": "cover", "type": "binary",
              "schema": { "data_type": "bytea", "is_nullable": true } }
        ],
        "relations": [
            { "collection": "articles", "field": "author", "related_collection": "authors",
              "schema": { "foreign_key_column": "id" },
              "meta": { "one_collection": "authors", "one_field": "articles",
                        "many_collection": "articles", "many_field": "author" } }
        ]
    }"#;

    #[tokio::test]
    async fn test_generate_from_snapshot() {
        let snapshot = parse_snapshot(SNAPSHOT).expect("snapshot");
        let metadata = StaticMetadata::from_records(snapshot.field_meta.clone());
        let generator =
            Generator::new(&snapshot.catalog, &metadata, GeneratorConfig::default()).expect("new");

        let output = generator.generate().await.expect("generate");
        let names: Vec<_> = output.units().map(|unit| unit.file_name.as_str()).collect();
        assert_eq!(names, ["Author.ts", "Article.ts", "index.ts"]);

        let author = &output.models[0];
        assert!(author.source.contains("import type { Article } from \"./Article\";"));
        assert!(author.source.contains(" * People who write\n"));
        assert!(author.source.contains("  articles: Article[];\n"));

        let article = &output.models[1];
        assert!(article.source.contains("  author: Author | Author[\"id\"] | null;\n"));
        assert!(article.source.contains("  status: 'draft' | 'published';\n"));
        assert!(article.source.contains("  cover: never;\n"));

        let diagnostics: Vec<_> = output.diagnostics().map(ToString::to_string).collect();
        assert_eq!(diagnostics, ["articles.cover: unsupported field type 'binary'"]);

        assert_eq!(output.index.type_name, "Collections");
        assert!(output.index.source.contains("  authors: Author;\n  articles: Article;\n"));
    }

    fn colliding_catalog() -> Catalog {
        let mut catalog = Catalog::new();
        catalog.add_entity(
            EntityDef::new("user_account").with_field(FieldDef::new("id", FieldKind::Integer)),
        );
        catalog.add_entity(
            EntityDef::new("user_accounts").with_field(FieldDef::new("id", FieldKind::Uuid)),
        );
        catalog
    }

    #[test]
    fn test_collision_rejected_by_default() {
        let catalog = colliding_catalog();
        let result = Generator::new(&catalog, &NoMetadata, GeneratorConfig::default());
        assert!(matches!(
            result,
            Err(CodegenError::Schema(SchemaError::IdentifierCollision { ref identifier, .. }))
                if identifier == "UserAccount"
        ));
    }

    #[tokio::test]
    async fn test_collision_overwrite_policy() {
        let catalog = colliding_catalog();
        let config = GeneratorConfig::builder()
            .collision_policy(CollisionPolicy::Overwrite)
            .build();
        let generator = Generator::new(&catalog, &NoMetadata, config).expect("new");

        let output = generator.generate().await.expect("generate");
        assert_eq!(output.models.len(), 2);
        assert!(output.models.iter().all(|unit| unit.file_name == "UserAccount.ts"));
    }

    async fn unit_names(collections: &[&str]) -> Vec<(String, String, String)> {
        let mut catalog = Catalog::new();
        for name in collections {
            catalog.add_entity(
                EntityDef::new(*name).with_field(FieldDef::new("id", FieldKind::Integer)),
            );
        }
        let generator =
            Generator::new(&catalog, &NoMetadata, GeneratorConfig::default()).expect("new");
        let output = generator.generate().await.expect("generate");

        let mut names: Vec<_> = collections
            .iter()
            .zip(&output.models)
            .map(|(collection, unit)| {
                (collection.to_string(), unit.type_name.clone(), unit.file_name.clone())
            })
            .collect();
        names.sort();
        names
    }

    #[tokio::test]
    async fn test_unit_names_do_not_depend_on_catalog_order() {
        let forward = unit_names(&["order_categories", "people", "boxes", "news"]).await;
        let backward = unit_names(&["news", "boxes", "people", "order_categories"]).await;
        assert_eq!(forward, backward);
        assert!(forward.contains(&(
            "order_categories".to_string(),
            "OrderCategory".to_string(),
            "OrderCategory.ts".to_string()
        )));
        assert!(forward.contains(&(
            "people".to_string(),
            "Person".to_string(),
            "Person.ts".to_string()
        )));
    }

    #[test]
    fn test_case_only_collision_rejected() {
        let mut catalog = Catalog::new();
        catalog.add_entity(EntityDef::new("ab_c"));
        catalog.add_entity(EntityDef::new("abc"));

        let result = Generator::new(&catalog, &NoMetadata, GeneratorConfig::default());
        assert!(matches!(
            result,
            Err(CodegenError::Schema(SchemaError::IdentifierCollision { ref second, .. }))
                if second == "abc"
        ));
    }

    #[test]
    fn test_model_named_like_index_rejected() {
        let mut catalog = Catalog::new();
        catalog.add_entity(EntityDef::new("indices"));

        let result = Generator::new(&catalog, &NoMetadata, GeneratorConfig::default());
        assert!(matches!(
            result,
            Err(CodegenError::IndexNameClash { ref identifier, ref index_stem, .. })
                if identifier == "Index" && index_stem == "index"
        ));

        let config = GeneratorConfig::builder().index_stem("collections").build();
        assert!(Generator::new(&catalog, &NoMetadata, config).is_ok());
    }

    #[tokio::test]
    async fn test_model_named_like_index_overwrite_policy() {
        let mut catalog = Catalog::new();
        catalog.add_entity(EntityDef::new("indices"));
        let config = GeneratorConfig::builder()
            .collision_policy(CollisionPolicy::Overwrite)
            .build();

        let generator = Generator::new(&catalog, &NoMetadata, config).expect("new");
        let output = generator.generate().await.expect("generate");
        assert_eq!(output.models[0].file_name, "Index.ts");
        assert_eq!(output.index.file_name, "index.ts");
    }

    #[test]
    fn test_invalid_identifier_is_fatal() {
        let mut catalog = Catalog::new();
        catalog.add_entity(EntityDef::new("2fa_codes"));

        let result = Generator::new(&catalog, &NoMetadata, GeneratorConfig::default());
        assert!(matches!(
            result,
            Err(CodegenError::Schema(SchemaError::InvalidIdentifier { .. }))
        ));
    }

    #[tokio::test]
    async fn test_relation_problems_are_not_fatal() {
        let mut catalog = Catalog::new();
        catalog.add_entity(
            EntityDef::new("articles").with_field(FieldDef::new("author", FieldKind::Integer)),
        );
        catalog.add_relation(RelationDef::new("articles", "author", "authors"));
        catalog.add_relation(RelationDef::new("articles", "author", "people"));

        let generator =
            Generator::new(&catalog, &NoMetadata, GeneratorConfig::default()).expect("new");
        let output = generator.generate().await.expect("generate");
        assert!(output.models[0].source.contains("  author: never;\n"));
        assert_eq!(output.diagnostics().count(), 1);
    }

    #[tokio::test]
    async fn test_custom_config_names() {
        let mut catalog = Catalog::new();
        catalog.add_entity(EntityDef::new("tags"));
        let config = GeneratorConfig::builder()
            .extension("d.ts")
            .index_name("Schema")
            .index_stem("schema")
            .build();

        let generator = Generator::new(&catalog, &NoMetadata, config).expect("new");
        let output = generator.generate().await.expect("generate");
        assert_eq!(output.models[0].file_name, "Tag.d.ts");
        assert_eq!(output.index.file_name, "schema.d.ts");
        assert!(output.index.source.contains("export type Schema = {\n  tags: Tag;\n};\n"));
    }

    /// Answers later for collections earlier in the catalog.
    struct StaggeredSource;

    #[async_trait]
    impl MetadataSource for StaggeredSource {
        async fn field_metadata(
            &self,
            collection: &str,
            _field: &str,
        ) -> Result<Option<FieldMetadata>, MetadataError> {
            let delay = match collection {
                "alphas" => 300,
                "betas" => 200,
                _ => 100,
            };
            tokio::time::sleep(Duration::from_millis(delay)).await;
            Ok(Some(FieldMetadata {
                choices: Some(vec![Choice::new(collection, None)]),
            }))
        }
    }

    #[tokio::test(start_paused = true)]
    async fn test_concurrent_generation_keeps_catalog_order() {
        let mut catalog = Catalog::new();
        for name in ["alphas", "betas", "gammas"] {
            catalog.add_entity(
                EntityDef::new(name).with_field(FieldDef::new("kind", FieldKind::String)),
            );
        }
        let config = GeneratorConfig::builder().concurrency(3).build();

        let generator = Generator::new(&catalog, &StaggeredSource, config).expect("new");
        let output = generator.generate().await.expect("generate");
        let names: Vec<_> = output.models.iter().map(|unit| unit.type_name.as_str()).collect();
        assert_eq!(names, ["Alpha", "Beta", "Gamma"]);
        assert!(output.models[0].source.contains("  kind: 'alphas';\n"));
    }

    #[tokio::test(start_paused = true)]
    async fn test_metadata_timeout_degrades_field() {
        let mut catalog = Catalog::new();
        catalog.add_entity(
            EntityDef::new("alphas").with_field(FieldDef::new("kind", FieldKind::String)),
        );
        let config = GeneratorConfig::builder()
            .metadata_timeout(Some(Duration::from_millis(50)))
            .build();

        let generator = Generator::new(&catalog, &StaggeredSource, config).expect("new");
        let output = generator.generate().await.expect("generate");
        assert!(output.models[0].source.contains("  kind: never;\n"));
        assert_eq!(output.diagnostics().count(), 1);
    }
}
