//! Generator configuration.

use std::time::Duration;

/// What to do when two collections map to the same type identifier.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum CollisionPolicy {
    /// Fail before anything is generated.
    #[default]
    Reject,
    /// Generate anyway; the later unit replaces the earlier one on output.
    Overwrite,
}

/// Configuration for a generation run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GeneratorConfig {
    /// File extension of generated units, without the dot.
    pub extension: String,
    /// Identifier of the index type.
    pub index_name: String,
    /// File stem of the index unit.
    pub index_stem: String,
    /// Identifier collision handling.
    pub collision_policy: CollisionPolicy,
    /// Maximum number of entities generated concurrently.
    pub concurrency: usize,
    /// Upper bound for a single metadata lookup.
    pub metadata_timeout: Option<Duration>,
}

impl Default for GeneratorConfig {
    fn default() -> Self {
        Self {
            extension: "ts".to_string(),
            index_name: "Collections".to_string(),
            index_stem: "index".to_string(),
            collision_policy: CollisionPolicy::Reject,
            concurrency: 1,
            metadata_timeout: None,
        }
    }
}

impl GeneratorConfig {
    /// Creates a builder starting from the default configuration.
    #[must_use]
    pub fn builder() -> GeneratorConfigBuilder {
        GeneratorConfigBuilder::new()
    }

    /// Returns the file name of a unit with the given stem.
    #[must_use]
    pub fn file_name(&self, stem: &str) -> String {
        if self.extension.is_empty() {
            stem.to_string()
        } else {
            format!("{stem}.{}", self.extension)
        }
    }
}

/// Builder for [`GeneratorConfig`].
#[derive(Debug, Clone, Default)]
pub struct GeneratorConfigBuilder {
    config: GeneratorConfig,
}

impl GeneratorConfigBuilder {
    /// Creates a new builder with default values.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the file extension. A leading dot is ignored.
    #[must_use]
    pub fn extension(mut self, extension: impl Into<String>) -> Self {
        let extension = extension.into();
        self.config.extension = extension.trim_start_matches('.').to_string();
        self
    }

    /// Sets the index type identifier.
    #[must_use]
    pub fn index_name(mut self, name: impl Into<String>) -> Self {
        self.config.index_name = name.into();
        self
    }

    /// Sets the index file stem.
    #[must_use]
    pub fn index_stem(mut self, stem: impl Into<String>) -> Self {
        self.config.index_stem = stem.into();
        self
    }

    /// Sets the collision policy.
    #[must_use]
    pub fn collision_policy(mut self, policy: CollisionPolicy) -> Self {
        self.config.collision_policy = policy;
        self
    }

    /// Sets the concurrency limit. Zero is treated as one.
    #[must_use]
    pub fn concurrency(mut self, concurrency: usize) -> Self {
        self.config.concurrency = concurrency.max(1);
        self
    }

    /// Sets the metadata lookup timeout.
    #[must_use]
    pub fn metadata_timeout(mut self, timeout: Option<Duration>) -> Self {
        self.config.metadata_timeout = timeout;
        self
    }

    /// Builds the configuration.
    #[must_use]
    pub fn build(self) -> GeneratorConfig {
        self.config
    }
}
