//! Enumerated choice resolution.

use crate::error::ResolveError;
use crate::metadata::{MetadataError, MetadataSource};
use crate::typescript::types::TsType;
use indexmap::IndexSet;
use std::time::Duration;

/// Outcome of a choice lookup that did not produce a type.
#[derive(Debug)]
pub enum ChoiceFailure {
    /// Field-level failure; the run continues.
    Field(ResolveError),
    /// The metadata store is unreachable; the run stops.
    Fatal(MetadataError),
}

/// Resolves fields with configured choices to string-literal unions.
pub struct ChoiceResolver<'a> {
    source: &'a dyn MetadataSource,
    timeout: Option<Duration>,
}

impl<'a> ChoiceResolver<'a> {
    /// Creates a resolver backed by `source`.
    #[must_use]
    pub fn new(source: &'a dyn MetadataSource) -> Self {
        Self {
            source,
            timeout: None,
        }
    }

    /// Bounds every lookup by `timeout`.
    #[must_use]
    pub fn with_timeout(mut self, timeout: Option<Duration>) -> Self {
        self.timeout = timeout;
        self
    }

    /// Looks up the choices of `collection.field`.
    ///
    /// # Returns
    /// A union of distinct string literals in first-seen order, or `None`
    /// when the field has no record, no choices, or an empty choice list.
    ///
    /// # Errors
    /// Returns `ChoiceFailure::Fatal` for transport errors and
    /// `ChoiceFailure::Field` for any other lookup failure.
    pub async fn resolve(
        &self,
        collection: &str,
        field: &str,
    ) -> Result<Option<TsType>, ChoiceFailure> {
        let lookup = self.source.field_metadata(collection, field);
        let result = match self.timeout {
            Some(limit) => tokio::time::timeout(limit, lookup)
                .await
                .unwrap_or(Err(MetadataError::Timeout {
                    millis: limit.as_millis(),
                })),
            None => lookup.await,
        };

        let metadata = match result {
            Ok(metadata) => metadata,
            Err(err) if err.is_fatal() => return Err(ChoiceFailure::Fatal(err)),
            Err(err) => return Err(ChoiceFailure::Field(ResolveError::MetadataQuery(err))),
        };

        let Some(choices) = metadata.and_then(|m| m.choices) else {
            return Ok(None);
        };
        let literals: IndexSet<String> = choices.iter().map(|choice| choice.literal()).collect();
        if literals.is_empty() {
            return Ok(None);
        }

        Ok(Some(TsType::union(
            literals.into_iter().map(TsType::StringLiteral),
        )))
    }
}
