//! Prelude module for convenient imports.
//!
//! This module re-exports the most commonly used types and traits.
//!
//! ```ignore
//! use schemagen::prelude::*;
//! ```

// Schema types
pub use schemagen_schema::{
    Catalog, Choice, EntityDef, FieldDef, FieldKind, ParseError, RelationDef, SchemaError,
    Snapshot, parse_snapshot, type_identifier, validate_catalog,
};

// Generation types
pub use schemagen_codegen::{
    CodegenError, CollisionPolicy, Diagnostic, FieldMetadata, GeneratedUnit, GenerationOutput,
    Generator, GeneratorConfig, MetadataError, MetadataSource, NoMetadata, ResolveError,
    StaticMetadata,
};

// Export types
pub use crate::export::{ExportError, ExportSummary, Exporter};
pub use crate::sink::{DirectorySink, MemorySink, OutputSink};

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_prelude_end_to_end() {
        let mut catalog = Catalog::new();
        catalog.add_entity(
            EntityDef::new("settings").with_field(FieldDef::new("theme", FieldKind::Json)),
        );
        let sink = MemorySink::new();

        let summary = Exporter::new(GeneratorConfig::default())
            .export_catalog(&catalog, &NoMetadata, &sink)
            .await
            .expect("export");
        assert_eq!(summary.files, ["Setting.ts", "index.ts"]);
        assert!(sink.get("Setting.ts").expect("unit").contains("  theme: any;\n"));
    }
}
