//! Collection index generation.

use crate::typescript::model::{property_name, render_import};
use indexmap::IndexSet;
use schemagen_schema::{Catalog, type_identifier};

/// Generator for the index that maps collection names to model types.
pub struct IndexEmitter<'a> {
    catalog: &'a Catalog,
    type_name: String,
}

impl<'a> IndexEmitter<'a> {
    /// Creates a new index emitter declaring `type_name`.
    #[must_use]
    pub fn new(catalog: &'a Catalog, type_name: impl Into<String>) -> Self {
        Self {
            catalog,
            type_name: type_name.into(),
        }
    }

    /// Generates the index declaration.
    ///
    /// Each distinct identifier is imported once; members follow catalog
    /// order.
    #[must_use]
    pub fn emit(&self) -> String {
        let mut output = String::new();

        let identifiers: IndexSet<String> = self
            .catalog
            .entities()
            .map(|entity| type_identifier(&entity.collection))
            .collect();
        for identifier in &identifiers {
            output.push_str(&render_import(identifier));
        }
        if !identifiers.is_empty() {
            output.push('\n');
        }

        output.push_str(&format!("export type {} = {{\n", self.type_name));
        for entity in self.catalog.entities() {
            output.push_str(&format!(
                "  {}: {};\n",
                property_name(&entity.collection),
                type_identifier(&entity.collection)
            ));
        }
        output.push_str("};\n");

        output
    }
}
