//! # schemagen
//!
//! TypeScript type declarations from headless CMS schema snapshots.
//!
//! Every collection in a snapshot becomes one `export type` declaration,
//! with relations typed as references to other declarations, configured
//! choices typed as string-literal unions and nullable columns widened
//! with `null`. An index type maps collection names to their models.
//!
//! ## Features
//!
//! - **Relation-aware types** - Foreign keys, reverse aliases and self-references
//! - **Enumerated choices** - Literal unions from field choice metadata
//! - **Soft failures** - Untypable fields become `never` with a logged diagnostic
//! - **Pluggable I/O** - Metadata sources and output sinks are traits
//!
//! ## Quick Start
//!
//! ```ignore
//! use schemagen::prelude::*;
//!
//! let sink = DirectorySink::new("./types");
//! let summary = Exporter::new(GeneratorConfig::default())
//!     .export_file(Path::new("schema-snapshot.json"), &sink)
//!     .await?;
//! ```
//!
//! ## Crate Organization
//!
//! - [`schema`] - Catalog model, snapshot parsing, naming and validation
//! - [`codegen`] - Type resolution and declaration generation
//! - [`sink`] - Output destinations
//! - [`export`] - End-to-end export runs
//! - [`cli`] - Command-line interface

pub mod cli;
pub mod export;
pub mod prelude;
pub mod sink;

/// Schema catalog model and snapshot parsing.
pub mod schema {
    pub use schemagen_schema::*;
}

/// Declaration generation.
pub mod codegen {
    pub use schemagen_codegen::*;
}

pub use export::{ExportError, ExportSummary, Exporter};
pub use sink::{DirectorySink, MemorySink, OutputSink};
