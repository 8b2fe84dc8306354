//! Command-line interface.

use crate::export::{ExportSummary, Exporter};
use crate::sink::DirectorySink;
use clap::{Args, Parser, Subcommand};
use schemagen_codegen::{CollisionPolicy, GeneratorConfig};
use std::path::PathBuf;
use std::time::Duration;

/// Generate TypeScript type declarations from a CMS schema snapshot.
#[derive(Parser, Debug)]
#[command(name = "schemagen", version, about)]
pub struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Write one declaration file per collection plus an index into TARGET.
    Generate(GenerateArgs),
}

#[derive(Args, Debug, Clone)]
struct GenerateArgs {
    /// Output directory, created if missing.
    target: PathBuf,

    /// Schema snapshot to read.
    #[arg(long, env = "SCHEMAGEN_SNAPSHOT", default_value = "schema-snapshot.json")]
    snapshot: PathBuf,

    /// Extension of generated files.
    #[arg(long, default_value = "ts")]
    extension: String,

    /// Name of the type mapping collection names to model types.
    #[arg(long, default_value = "Collections")]
    index_name: String,

    /// Let a later collection overwrite an earlier one with the same type name.
    #[arg(long, default_value_t = false)]
    allow_collisions: bool,

    /// Fail on relation problems instead of emitting `never` for affected fields.
    #[arg(long, default_value_t = false)]
    strict: bool,

    /// Number of collections generated concurrently.
    #[arg(long, default_value_t = 1)]
    concurrency: usize,

    /// Timeout for a single choice metadata lookup, in milliseconds.
    #[arg(long)]
    metadata_timeout_ms: Option<u64>,
}

impl GenerateArgs {
    fn config(&self) -> GeneratorConfig {
        let policy = if self.allow_collisions {
            CollisionPolicy::Overwrite
        } else {
            CollisionPolicy::Reject
        };
        GeneratorConfig::builder()
            .extension(self.extension.as_str())
            .index_name(self.index_name.as_str())
            .collision_policy(policy)
            .concurrency(self.concurrency)
            .metadata_timeout(self.metadata_timeout_ms.map(Duration::from_millis))
            .build()
    }
}

impl Cli {
    /// Runs the selected command.
    ///
    /// # Errors
    /// Returns an error if the export fails; field-level problems are only
    /// logged.
    pub async fn run(self) -> anyhow::Result<ExportSummary> {
        match self.command {
            Command::Generate(args) => {
                let sink = DirectorySink::new(&args.target);
                let summary = Exporter::new(args.config())
                    .strict(args.strict)
                    .export_file(&args.snapshot, &sink)
                    .await?;
                tracing::info!(
                    dir = %args.target.display(),
                    files = summary.files.len(),
                    "declarations written"
                );
                Ok(summary)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::ffi::OsString;

    #[test]
    fn test_parse_defaults() {
        let cli = Cli::try_parse_from(["schemagen", "generate", "types"]).expect("parse");
        let Command::Generate(args) = cli.command;
        assert_eq!(args.target, PathBuf::from("types"));
        assert!(!args.allow_collisions);

        let config = args.config();
        assert_eq!(config, GeneratorConfig::default());
    }

    #[test]
    fn test_parse_options() {
        let cli = Cli::try_parse_from([
            "schemagen",
            "generate",
            "out",
            "--snapshot",
            "snap.json",
            "--extension",
            "d.ts",
            "--index-name",
            "Schema",
            "--allow-collisions",
            "--concurrency",
            "4",
            "--metadata-timeout-ms",
            "750",
        ])
        .expect("parse");
        let Command::Generate(args) = cli.command;
        assert_eq!(args.snapshot, PathBuf::from("snap.json"));

        let config = args.config();
        assert_eq!(config.extension, "d.ts");
        assert_eq!(config.index_name, "Schema");
        assert_eq!(config.collision_policy, CollisionPolicy::Overwrite);
        assert_eq!(config.concurrency, 4);
        assert_eq!(config.metadata_timeout, Some(Duration::from_millis(750)));
    }

    #[test]
    fn test_target_is_required() {
        assert!(Cli::try_parse_from(["schemagen", "generate"]).is_err());
    }

    #[tokio::test]
    async fn test_run_generate() {
        let dir = tempfile::tempdir().expect("tempdir");
        let snapshot = dir.path().join("snapshot.json");
        std::fs::write(
            &snapshot,
            r#"{ "collections": [{ "collection": "pages" }],
                 "fields": [{ "collection": "pages", "field": "slug", "type": "string" }] }"#,
        )
        .expect("write snapshot");
        let target = dir.path().join("types");

        let args: Vec<OsString> = vec![
            "schemagen".into(),
            "generate".into(),
            target.clone().into_os_string(),
            "--snapshot".into(),
            snapshot.into_os_string(),
        ];
        let cli = Cli::try_parse_from(args).expect("parse");
        let summary = cli.run().await.expect("run");

        assert_eq!(summary.files, ["Page.ts", "index.ts"]);
        let page = std::fs::read_to_string(target.join("Page.ts")).expect("page");
        assert!(page.contains("  slug: string;\n"));
    }
}
