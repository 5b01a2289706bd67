//! Merged lookup tables built once per resolution pass.
//!
//! Later sources overwrite earlier ones for the same key:
//! - references: pseudo-parameters, then resource physical ids, then
//!   reference overrides
//! - imports: exports, then import overrides
//! - attributes: heuristics (when enabled), then attribute overrides

use indexmap::IndexMap;
use std::collections::HashMap;

use super::attributes::derive_attributes;
use crate::expression::pseudo::{url_suffix_for_partition, DEFAULT_PARTITION};
use crate::expression::{PseudoParameter, Scalar};
use crate::inventory::{InventorySnapshot, StackIdentity};
use crate::overrides::{AttributeOverride, OverrideMaps};

#[derive(Debug, Clone)]
pub struct ResolutionTables<'a> {
    references: HashMap<String, Scalar>,
    imports: HashMap<String, Scalar>,
    derived_attributes: HashMap<String, IndexMap<String, Scalar>>,
    attribute_overrides: &'a IndexMap<String, AttributeOverride>,
}

impl<'a> ResolutionTables<'a> {
    pub fn build(
        snapshot: &InventorySnapshot,
        overrides: &'a OverrideMaps,
        attribute_heuristics: bool,
    ) -> Self {
        let identity = snapshot.identity();

        let mut references: HashMap<String, Scalar> = pseudo_parameters(identity)
            .into_iter()
            .map(|(param, value)| (param.as_str().to_string(), Scalar::String(value)))
            .collect();
        for resource in snapshot.resources() {
            if let Some(physical_id) = &resource.physical_id {
                references.insert(
                    resource.logical_id.clone(),
                    Scalar::String(physical_id.clone()),
                );
            }
        }
        for (logical_id, value) in &overrides.references {
            references.insert(logical_id.clone(), value.clone());
        }

        let mut imports: HashMap<String, Scalar> = snapshot
            .exports()
            .iter()
            .map(|e| (e.name.clone(), Scalar::String(e.value.clone())))
            .collect();
        for (name, value) in &overrides.imports {
            imports.insert(name.clone(), value.clone());
        }

        let derived_attributes = if attribute_heuristics {
            snapshot
                .resources()
                .iter()
                .map(|r| (r.logical_id.clone(), derive_attributes(r, identity)))
                .filter(|(_, attributes)| !attributes.is_empty())
                .collect()
        } else {
            HashMap::new()
        };

        tracing::debug!(
            "Built resolution tables: {} reference(s), {} import(s), {} resource(s) with derived attributes",
            references.len(),
            imports.len(),
            derived_attributes.len()
        );

        Self {
            references,
            imports,
            derived_attributes,
            attribute_overrides: &overrides.attributes,
        }
    }

    pub fn reference(&self, logical_id: &str) -> Option<&Scalar> {
        self.references.get(logical_id)
    }

    pub fn import(&self, export_name: &str) -> Option<&Scalar> {
        self.imports.get(export_name)
    }

    pub fn attribute(&self, logical_id: &str, attribute: &str) -> Option<&Scalar> {
        self.attribute_overrides
            .get(logical_id)
            .and_then(|o| o.get(attribute))
            .or_else(|| {
                self.derived_attributes
                    .get(logical_id)
                    .and_then(|attributes| attributes.get(attribute))
            })
    }
}

/// Pseudo-parameter values for `identity`. Empty identity fields are left out
/// so that references to them are reported as unresolved.
pub fn pseudo_parameters(identity: &StackIdentity) -> Vec<(PseudoParameter, String)> {
    let partition = if identity.partition.is_empty() {
        DEFAULT_PARTITION
    } else {
        identity.partition.as_str()
    };

    PseudoParameter::ALL
        .into_iter()
        .map(|param| {
            let value = match param {
                PseudoParameter::Region => identity.region.clone(),
                PseudoParameter::AccountId => identity.account_id.clone(),
                PseudoParameter::StackId => identity.stack_id.clone(),
                PseudoParameter::StackName => identity.stack_name.clone(),
                PseudoParameter::Partition => partition.to_string(),
                PseudoParameter::UrlSuffix => url_suffix_for_partition(partition).to_string(),
            };
            (param, value)
        })
        .filter(|(_, value)| !value.is_empty())
        .collect()
}
