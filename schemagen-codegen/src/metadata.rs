//! Field metadata collaborator.
//!
//! Enumerated choices are not part of the catalog itself; they are looked up
//! per field through a [`MetadataSource`]. The generator only depends on the
//! trait, so the lookup can be backed by a snapshot, a database or a test
//! double.

use async_trait::async_trait;
use schemagen_schema::{Choice, FieldMetaRecord};
use std::collections::HashMap;
use thiserror::Error;

/// Metadata stored for one field.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FieldMetadata {
    /// Ordered list of permitted values, if configured.
    pub choices: Option<Vec<Choice>>,
}

/// Error type for metadata lookups.
#[derive(Debug, Error)]
pub enum MetadataError {
    /// The lookup ran but failed.
    #[error("query error: {message}")]
    Query {
        /// Error message.
        message: String,
    },

    /// The lookup did not complete in time.
    #[error("query timed out after {millis} ms")]
    Timeout {
        /// Elapsed budget in milliseconds.
        millis: u128,
    },

    /// The connection to the metadata store failed.
    #[error("transport error: {0}")]
    Transport(#[from] std::io::Error),
}

impl MetadataError {
    /// Creates a query error with the given message.
    pub fn query(message: impl Into<String>) -> Self {
        Self::Query {
            message: message.into(),
        }
    }

    /// Returns true if the error must abort the run instead of one field.
    #[must_use]
    pub const fn is_fatal(&self) -> bool {
        matches!(self, Self::Transport(_))
    }
}

/// Source of per-field metadata.
#[async_trait]
pub trait MetadataSource: Send + Sync {
    /// Looks up the metadata of `collection.field`.
    ///
    /// # Arguments
    /// * `collection` - Collection name
    /// * `field` - Field name
    ///
    /// # Returns
    /// `None` when no record exists for the field.
    ///
    /// # Errors
    /// Returns `MetadataError` if the lookup fails.
    async fn field_metadata(
        &self,
        collection: &str,
        field: &str,
    ) -> Result<Option<FieldMetadata>, MetadataError>;
}

/// Metadata source that never has a record.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoMetadata;

#[async_trait]
impl MetadataSource for NoMetadata {
    async fn field_metadata(
        &self,
        _collection: &str,
        _field: &str,
    ) -> Result<Option<FieldMetadata>, MetadataError> {
        Ok(None)
    }
}

/// In-memory metadata table.
///
/// A record may hold a stored failure instead of metadata; looking it up
/// yields `MetadataError::Query` for that field.
#[derive(Debug, Clone, Default)]
pub struct StaticMetadata {
    records: HashMap<(String, String), Result<FieldMetadata, String>>,
}

impl StaticMetadata {
    /// Creates an empty table.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Builds a table from snapshot field records. Later records win.
    #[must_use]
    pub fn from_records(records: impl IntoIterator<Item = FieldMetaRecord>) -> Self {
        let mut table = Self::new();
        for record in records {
            match record.error {
                Some(message) => table.insert_failure(record.collection, record.field, message),
                None => table.insert(
                    record.collection,
                    record.field,
                    FieldMetadata {
                        choices: record.choices,
                    },
                ),
            }
        }
        table
    }

    /// Inserts or replaces the metadata of `collection.field`.
    pub fn insert(
        &mut self,
        collection: impl Into<String>,
        field: impl Into<String>,
        metadata: FieldMetadata,
    ) {
        self.records
            .insert((collection.into(), field.into()), Ok(metadata));
    }

    /// Records that the metadata of `collection.field` is unreadable.
    pub fn insert_failure(
        &mut self,
        collection: impl Into<String>,
        field: impl Into<String>,
        message: impl Into<String>,
    ) {
        self.records
            .insert((collection.into(), field.into()), Err(message.into()));
    }

    /// Returns the number of records.
    #[must_use]
    pub fn len(&self) -> usize {
        self.records.len()
    }

    /// Returns true if the table is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}

#[async_trait]
impl MetadataSource for StaticMetadata {
    async fn field_metadata(
        &self,
        collection: &str,
        field: &str,
    ) -> Result<Option<FieldMetadata>, MetadataError> {
        match self.records.get(&(collection.to_string(), field.to_string())) {
            Some(Ok(metadata)) => Ok(Some(metadata.clone())),
            Some(Err(message)) => Err(MetadataError::query(message.as_str())),
            None => Ok(None),
        }
    }
}
