//! # schemagen Codegen
//!
//! TypeScript declaration generation from schema catalogs.
//!
//! This crate provides:
//! - Scalar, relation and enumerated-choice type resolution
//! - One model declaration per collection plus a collection index
//! - Field-level diagnostics for types that cannot be resolved
//! - An injectable metadata source for choice lookups

pub mod config;
pub mod diagnostic;
pub mod error;
pub mod generator;
pub mod metadata;
pub mod typescript;

pub use config::{CollisionPolicy, GeneratorConfig, GeneratorConfigBuilder};
pub use diagnostic::Diagnostic;
pub use error::{CodegenError, ResolveError};
pub use generator::{GeneratedUnit, GenerationOutput, Generator};
pub use metadata::{FieldMetadata, MetadataError, MetadataSource, NoMetadata, StaticMetadata};

/// Generates declarations from a JSON schema snapshot.
///
/// Choice metadata is taken from the snapshot itself.
///
/// # Arguments
/// * `json` - Schema snapshot content
/// * `config` - Generation settings
///
/// # Returns
/// The generated model and index units.
///
/// # Errors
/// Returns `CodegenError` if parsing, validation, or generation fails.
pub async fn generate_from_snapshot(
    json: &str,
    config: GeneratorConfig,
) -> Result<GenerationOutput, CodegenError> {
    let snapshot = schemagen_schema::parse_snapshot(json)?;
    let metadata = StaticMetadata::from_records(snapshot.field_meta);
    let generator = Generator::new(&snapshot.catalog, &metadata, config)?;
    generator.generate().await
}

/// Generates declarations from a JSON schema snapshot file.
///
/// # Arguments
/// * `path` - Path to the snapshot file
/// * `config` - Generation settings
///
/// # Returns
/// The generated model and index units.
///
/// # Errors
/// Returns `CodegenError` if reading, parsing, validation, or generation fails.
pub async fn generate_from_file(
    path: &std::path::Path,
    config: GeneratorConfig,
) -> Result<GenerationOutput, CodegenError> {
    let json = tokio::fs::read_to_string(path).await?;
    generate_from_snapshot(&json, config).await
}
