//! Mutable form state: field id to current value. The union of all section
//! edits reconstructs the full state; section forms are the only writers.

use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::BTreeMap;

use super::catalog::FieldCatalog;

/// How a chip insertion materializes in the document: the field's current
/// (or mock) value, or a bracketed token substituted later. A single global
/// selection that affects all future insertions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub enum InsertionMode {
    #[serde(rename = "inserir_valor")]
    Value,
    #[default]
    #[serde(rename = "inserir_variavel")]
    Token,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct FormState {
    values: BTreeMap<String, Value>,
}

impl FormState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Seed the state from the catalog's initial data, dropping any key the
    /// catalog doesn't know about.
    pub fn seeded_from(catalog: &FieldCatalog) -> Self {
        let mut state = Self::new();
        state.merge_partial(catalog, catalog.initial_data.clone());
        state
    }

    /// Merge a partial update coming from one section form. Ids not present
    /// in the catalog are ignored, so the state never carries orphan entries.
    pub fn merge_partial(&mut self, catalog: &FieldCatalog, partial: BTreeMap<String, Value>) {
        for (id, value) in partial {
            if catalog.contains(&id) {
                self.values.insert(id, value);
            }
        }
    }

    pub fn value(&self, id: &str) -> Option<&Value> {
        self.values.get(id)
    }

    /// The live value when present and non-null, otherwise None.
    pub fn live_value(&self, id: &str) -> Option<&Value> {
        self.values.get(id).filter(|v| !v.is_null())
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}
