//! Deployed-infrastructure inventory.
//!
//! An [`InventorySnapshot`] is fetched once per resolution pass and is
//! read-only afterwards. Fetching goes through the [`ControlPlane`] port.

pub mod fetch;
pub mod recorded;

pub use fetch::{
    CancellationReceiver, CancellationToken, ControlPlane, Page, SnapshotFetcher,
    DEFAULT_MAX_PAGES,
};
pub use recorded::RecordedControlPlane;

use serde::{Deserialize, Serialize};
use std::collections::HashSet;

use crate::expression::pseudo::partition_for_region;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResourceRecord {
    #[serde(rename = "LogicalResourceId")]
    pub logical_id: String,
    /// Missing while a resource is still being created or after a failed create.
    #[serde(rename = "PhysicalResourceId", default)]
    pub physical_id: Option<String>,
    #[serde(rename = "ResourceType")]
    pub resource_type: String,
}

impl ResourceRecord {
    pub fn new(
        logical_id: impl Into<String>,
        physical_id: impl Into<String>,
        resource_type: impl Into<String>,
    ) -> Self {
        Self {
            logical_id: logical_id.into(),
            physical_id: Some(physical_id.into()),
            resource_type: resource_type.into(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExportRecord {
    #[serde(rename = "Name")]
    pub name: String,
    #[serde(rename = "Value")]
    pub value: String,
}

impl ExportRecord {
    pub fn new(name: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            value: value.into(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StackOutput {
    #[serde(rename = "OutputKey")]
    pub key: String,
    #[serde(rename = "OutputValue")]
    pub value: String,
}

impl StackOutput {
    pub fn new(key: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            key: key.into(),
            value: value.into(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StackIdentity {
    pub stack_id: String,
    pub stack_name: String,
    pub region: String,
    pub account_id: String,
    pub partition: String,
}

impl StackIdentity {
    /// Builds an identity whose partition is derived from the region.
    pub fn new(
        stack_id: impl Into<String>,
        stack_name: impl Into<String>,
        region: impl Into<String>,
        account_id: impl Into<String>,
    ) -> Self {
        let region = region.into();
        let partition = partition_for_region(&region).to_string();
        Self {
            stack_id: stack_id.into(),
            stack_name: stack_name.into(),
            region,
            account_id: account_id.into(),
            partition,
        }
    }
}

/// Result of the describe-stack call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StackDescription {
    pub identity: StackIdentity,
    pub outputs: Vec<StackOutput>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct InventorySnapshot {
    identity: StackIdentity,
    resources: Vec<ResourceRecord>,
    exports: Vec<ExportRecord>,
    outputs: Vec<StackOutput>,
}

impl InventorySnapshot {
    pub fn builder(identity: StackIdentity) -> SnapshotBuilder {
        SnapshotBuilder::new(identity)
    }

    pub fn identity(&self) -> &StackIdentity {
        &self.identity
    }

    pub fn resources(&self) -> &[ResourceRecord] {
        &self.resources
    }

    pub fn exports(&self) -> &[ExportRecord] {
        &self.exports
    }

    pub fn outputs(&self) -> &[StackOutput] {
        &self.outputs
    }

    pub fn resource(&self, logical_id: &str) -> Option<&ResourceRecord> {
        self.resources.iter().find(|r| r.logical_id == logical_id)
    }

    pub fn export(&self, name: &str) -> Option<&ExportRecord> {
        self.exports.iter().find(|e| e.name == name)
    }

    pub fn output(&self, key: &str) -> Option<&StackOutput> {
        self.outputs.iter().find(|o| o.key == key)
    }
}

/// Assembles a snapshot, keeping the first record for each logical id,
/// export name and output key.
#[derive(Debug)]
pub struct SnapshotBuilder {
    identity: StackIdentity,
    resources: Vec<ResourceRecord>,
    exports: Vec<ExportRecord>,
    outputs: Vec<StackOutput>,
}

impl SnapshotBuilder {
    pub fn new(identity: StackIdentity) -> Self {
        Self {
            identity,
            resources: Vec::new(),
            exports: Vec::new(),
            outputs: Vec::new(),
        }
    }

    pub fn with_resource(mut self, resource: ResourceRecord) -> Self {
        self.resources.push(resource);
        self
    }

    pub fn with_resources(mut self, resources: impl IntoIterator<Item = ResourceRecord>) -> Self {
        self.resources.extend(resources);
        self
    }

    pub fn with_export(mut self, export: ExportRecord) -> Self {
        self.exports.push(export);
        self
    }

    pub fn with_exports(mut self, exports: impl IntoIterator<Item = ExportRecord>) -> Self {
        self.exports.extend(exports);
        self
    }

    pub fn with_outputs(mut self, outputs: impl IntoIterator<Item = StackOutput>) -> Self {
        self.outputs.extend(outputs);
        self
    }

    pub fn build(self) -> InventorySnapshot {
        InventorySnapshot {
            identity: self.identity,
            resources: dedup_by_key(self.resources, "resource", |r| r.logical_id.clone()),
            exports: dedup_by_key(self.exports, "export", |e| e.name.clone()),
            outputs: dedup_by_key(self.outputs, "output", |o| o.key.clone()),
        }
    }
}

fn dedup_by_key<T>(items: Vec<T>, label: &str, key: impl Fn(&T) -> String) -> Vec<T> {
    let mut seen = HashSet::new();
    items
        .into_iter()
        .filter(|item| {
            let k = key(item);
            let first = seen.insert(k.clone());
            if !first {
                tracing::debug!("Dropping duplicate {label} '{k}'");
            }
            first
        })
        .collect()
}
