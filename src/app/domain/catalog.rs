//! Catalog of insertable SILIC fields and the sections that group them.
//! Loaded once from JSON and treated as immutable afterwards.

use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::{BTreeMap, HashMap, HashSet};

use crate::app::infrastructure::error::{AppError, Result};

/// Declared value type of a catalog field. Unknown type tags in the catalog
/// fall back to `Text`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum FieldType {
    Money,
    Percent,
    Date,
    Boolean,
    Cnpj,
    #[default]
    Text,
}

impl<'de> Deserialize<'de> for FieldType {
    fn deserialize<D>(deserializer: D) -> std::result::Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let tag = String::deserialize(deserializer)?;
        Ok(match tag.as_str() {
            "money" => Self::Money,
            "percent" => Self::Percent,
            "date" => Self::Date,
            "boolean" => Self::Boolean,
            "cnpj" => Self::Cnpj,
            _ => Self::Text,
        })
    }
}

/// One insertable field from the property registry.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Field {
    pub id: String,
    pub label: String,
    /// Catalog source tag (e.g. "silic", "sap").
    #[serde(default)]
    pub origin: String,
    #[serde(default)]
    pub tipo: FieldType,
    /// Ordered token aliases; the first one is the primary token.
    #[serde(default)]
    pub tokens: Vec<String>,
    /// Prototype value shown while no live value exists.
    #[serde(default)]
    pub mock_value: Value,
}

impl Field {
    /// Primary token, falling back to the field id when no tokens exist.
    pub fn primary_token(&self) -> &str {
        self.tokens.first().map(String::as_str).unwrap_or(&self.id)
    }
}

/// A form section grouping fields. The schema payloads are opaque here; they
/// are handed as-is to the external schema-form engine.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Section {
    pub id: String,
    pub title: String,
    #[serde(default)]
    pub field_ids: Vec<String>,
    #[serde(default)]
    pub schema: Value,
    #[serde(default)]
    pub ui_schema: Value,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FieldCatalog {
    pub sections: Vec<Section>,
    pub fields: Vec<Field>,
    /// Seed values for the form state, keyed by field id.
    #[serde(default)]
    pub initial_data: BTreeMap<String, Value>,
}

impl FieldCatalog {
    /// Parse a catalog from JSON and validate its invariants.
    pub fn from_json(json: &str) -> Result<Self> {
        let catalog: FieldCatalog = serde_json::from_str(json)?;
        catalog.validate()?;
        Ok(catalog)
    }

    /// Check catalog invariants: field ids unique, every section field id
    /// resolves, and no field belongs to more than one section.
    fn validate(&self) -> Result<()> {
        let mut ids = HashSet::new();
        for field in &self.fields {
            if !ids.insert(field.id.as_str()) {
                return Err(AppError::Catalog(format!(
                    "duplicated field id: {}",
                    field.id
                )));
            }
        }

        let mut claimed: HashMap<&str, &str> = HashMap::new();
        for section in &self.sections {
            for field_id in &section.field_ids {
                if !ids.contains(field_id.as_str()) {
                    return Err(AppError::Catalog(format!(
                        "section {} references unknown field {}",
                        section.id, field_id
                    )));
                }
                if let Some(other) = claimed.insert(field_id.as_str(), section.id.as_str()) {
                    return Err(AppError::Catalog(format!(
                        "field {} belongs to both {} and {}",
                        field_id, other, section.id
                    )));
                }
            }
        }

        Ok(())
    }

    pub fn field(&self, id: &str) -> Option<&Field> {
        self.fields.iter().find(|f| f.id == id)
    }

    pub fn contains(&self, id: &str) -> bool {
        self.field(id).is_some()
    }

    /// Fields in chip-display order: section order first, then any fields
    /// not claimed by a section, in catalog order.
    pub fn fields_in_display_order(&self) -> Vec<&Field> {
        let mut seen = HashSet::new();
        let mut ordered = Vec::with_capacity(self.fields.len());
        for section in &self.sections {
            for field_id in &section.field_ids {
                if let Some(field) = self.field(field_id) {
                    if seen.insert(field.id.as_str()) {
                        ordered.push(field);
                    }
                }
            }
        }
        for field in &self.fields {
            if seen.insert(field.id.as_str()) {
                ordered.push(field);
            }
        }
        ordered
    }
}
