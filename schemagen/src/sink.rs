//! Output sinks for generated units.

use async_trait::async_trait;
use indexmap::IndexMap;
use parking_lot::Mutex;
use std::io;
use std::path::{Path, PathBuf};

/// Destination for generated units.
#[async_trait]
pub trait OutputSink: Send + Sync {
    /// Prepares the destination before the first unit is written.
    ///
    /// # Errors
    /// Returns an IO error if the destination cannot be created.
    async fn prepare(&self) -> io::Result<()>;

    /// Writes one unit, replacing any unit with the same file name.
    ///
    /// # Errors
    /// Returns an IO error if the write fails.
    async fn write_unit(&self, file_name: &str, contents: &str) -> io::Result<()>;
}

/// Writes units as files into a directory.
#[derive(Debug, Clone)]
pub struct DirectorySink {
    root: PathBuf,
}

impl DirectorySink {
    /// Creates a sink writing into `root`.
    #[must_use]
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    /// Returns the target directory.
    #[must_use]
    pub fn root(&self) -> &Path {
        &self.root
    }
}

#[async_trait]
impl OutputSink for DirectorySink {
    async fn prepare(&self) -> io::Result<()> {
        tokio::fs::create_dir_all(&self.root).await
    }

    async fn write_unit(&self, file_name: &str, contents: &str) -> io::Result<()> {
        let path = self.root.join(file_name);
        tracing::debug!(path = %path.display(), bytes = contents.len(), "writing unit");
        tokio::fs::write(&path, contents).await
    }
}

/// Keeps units in memory.
#[derive(Debug, Default)]
pub struct MemorySink {
    units: Mutex<IndexMap<String, String>>,
}

impl MemorySink {
    /// Creates an empty sink.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the contents written under `file_name`.
    #[must_use]
    pub fn get(&self, file_name: &str) -> Option<String> {
        self.units.lock().get(file_name).cloned()
    }

    /// Returns the written file names in first-write order.
    #[must_use]
    pub fn file_names(&self) -> Vec<String> {
        self.units.lock().keys().cloned().collect()
    }

    /// Returns the number of distinct units.
    #[must_use]
    pub fn len(&self) -> usize {
        self.units.lock().len()
    }

    /// Returns true if nothing has been written.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.units.lock().is_empty()
    }
}

#[async_trait]
impl OutputSink for MemorySink {
    async fn prepare(&self) -> io::Result<()> {
        Ok(())
    }

    async fn write_unit(&self, file_name: &str, contents: &str) -> io::Result<()> {
        self.units
            .lock()
            .insert(file_name.to_string(), contents.to_string());
        Ok(())
    }
}
