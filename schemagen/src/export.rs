//! Snapshot export: read, generate, write.
//!
//! Every unit is generated before anything is written, so a run-level
//! failure leaves the destination untouched.

use crate::sink::OutputSink;
use schemagen_codegen::{CodegenError, Generator, GeneratorConfig, MetadataSource, StaticMetadata};
use schemagen_schema::{Catalog, parse_snapshot, validate_catalog};
use std::io;
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Error type for export runs.
#[derive(Debug, Error)]
pub enum ExportError {
    /// The snapshot file could not be read.
    #[error("failed to read snapshot '{path}': {source}")]
    ReadSnapshot {
        /// Snapshot path.
        path: PathBuf,
        /// Underlying error.
        #[source]
        source: io::Error,
    },

    /// Parsing, validation or generation failed.
    #[error(transparent)]
    Codegen(#[from] CodegenError),

    /// The output destination could not be prepared.
    #[error("failed to prepare output: {0}")]
    Prepare(#[source] io::Error),

    /// A unit could not be written.
    #[error("failed to write '{file}': {source}")]
    Write {
        /// Unit file name.
        file: String,
        /// Underlying error.
        #[source]
        source: io::Error,
    },
}

/// Outcome of a successful export.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ExportSummary {
    /// Number of model units generated.
    pub models: usize,
    /// File names written, index last.
    pub files: Vec<String>,
    /// Rendered field diagnostics.
    pub diagnostics: Vec<String>,
}

/// Runs generation and writes the result to a sink.
#[derive(Debug, Clone, Default)]
pub struct Exporter {
    config: GeneratorConfig,
    strict: bool,
}

impl Exporter {
    /// Creates an exporter with the given configuration.
    #[must_use]
    pub fn new(config: GeneratorConfig) -> Self {
        Self {
            config,
            strict: false,
        }
    }

    /// Fails on any catalog validation problem, including relation
    /// problems that would otherwise only degrade single fields.
    #[must_use]
    pub fn strict(mut self, strict: bool) -> Self {
        self.strict = strict;
        self
    }

    /// Exports the snapshot file at `path`.
    ///
    /// # Errors
    /// Returns `ExportError` if reading, generation or writing fails.
    pub async fn export_file(
        &self,
        path: &Path,
        sink: &dyn OutputSink,
    ) -> Result<ExportSummary, ExportError> {
        tracing::info!(snapshot = %path.display(), "reading schema snapshot");
        let json = tokio::fs::read_to_string(path)
            .await
            .map_err(|source| ExportError::ReadSnapshot {
                path: path.to_path_buf(),
                source,
            })?;
        self.export_str(&json, sink).await
    }

    /// Exports snapshot JSON, taking choice metadata from the snapshot.
    ///
    /// # Errors
    /// Returns `ExportError` if parsing, generation or writing fails.
    pub async fn export_str(
        &self,
        json: &str,
        sink: &dyn OutputSink,
    ) -> Result<ExportSummary, ExportError> {
        let snapshot = parse_snapshot(json).map_err(CodegenError::from)?;
        let metadata = StaticMetadata::from_records(snapshot.field_meta);
        tracing::debug!(
            collections = snapshot.catalog.len(),
            relations = snapshot.catalog.relations.len(),
            choice_fields = metadata.len(),
            "snapshot parsed"
        );
        self.export_catalog(&snapshot.catalog, &metadata, sink).await
    }

    /// Exports a catalog with an external metadata source.
    ///
    /// # Errors
    /// Returns `ExportError` if generation or writing fails.
    pub async fn export_catalog(
        &self,
        catalog: &Catalog,
        metadata: &dyn MetadataSource,
        sink: &dyn OutputSink,
    ) -> Result<ExportSummary, ExportError> {
        if self.strict {
            validate_catalog(catalog).map_err(CodegenError::from)?;
        }

        let generator = Generator::new(catalog, metadata, self.config.clone())?;
        let output = generator.generate().await?;

        sink.prepare().await.map_err(ExportError::Prepare)?;
        let mut files = Vec::with_capacity(output.models.len() + 1);
        for unit in output.units() {
            sink.write_unit(&unit.file_name, &unit.source)
                .await
                .map_err(|source| ExportError::Write {
                    file: unit.file_name.clone(),
                    source,
                })?;
            files.push(unit.file_name.clone());
        }

        let summary = ExportSummary {
            models: output.models.len(),
            files,
            diagnostics: output.diagnostics().map(ToString::to_string).collect(),
        };
        tracing::info!(
            models = summary.models,
            diagnostics = summary.diagnostics.len(),
            "export complete"
        );
        Ok(summary)
    }
}
