//! User-supplied override maps. They take precedence over everything the
//! inventory provides and are never mutated by resolution.

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

use crate::expression::Scalar;

/// Attribute override for one logical id.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum AttributeOverride {
    /// Used for every attribute of the resource.
    All(Scalar),
    PerAttribute(IndexMap<String, Scalar>),
}

impl AttributeOverride {
    pub fn get(&self, attribute: &str) -> Option<&Scalar> {
        match self {
            Self::All(value) => Some(value),
            Self::PerAttribute(values) => values.get(attribute),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct OverrideMaps {
    #[serde(alias = "referenceOverrides")]
    pub references: IndexMap<String, Scalar>,
    #[serde(alias = "attributeOverrides")]
    pub attributes: IndexMap<String, AttributeOverride>,
    #[serde(alias = "importOverrides")]
    pub imports: IndexMap<String, Scalar>,
}

impl OverrideMaps {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_reference(mut self, logical_id: impl Into<String>, value: impl Into<Scalar>) -> Self {
        self.references.insert(logical_id.into(), value.into());
        self
    }

    pub fn with_attribute(
        mut self,
        logical_id: impl Into<String>,
        attribute: impl Into<String>,
        value: impl Into<Scalar>,
    ) -> Self {
        let logical_id = logical_id.into();
        let attribute = attribute.into();
        let value = value.into();
        match self.attributes.get_mut(&logical_id) {
            Some(AttributeOverride::PerAttribute(values)) => {
                values.insert(attribute, value);
            }
            _ => {
                let mut values = IndexMap::new();
                values.insert(attribute, value);
                self.attributes
                    .insert(logical_id, AttributeOverride::PerAttribute(values));
            }
        }
        self
    }

    pub fn with_import(mut self, export_name: impl Into<String>, value: impl Into<Scalar>) -> Self {
        self.imports.insert(export_name.into(), value.into());
        self
    }

    pub fn attribute(&self, logical_id: &str, attribute: &str) -> Option<&Scalar> {
        self.attributes.get(logical_id)?.get(attribute)
    }

    pub fn is_empty(&self) -> bool {
        self.references.is_empty() && self.attributes.is_empty() && self.imports.is_empty()
    }
}
