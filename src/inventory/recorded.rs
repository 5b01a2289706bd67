//! A [`ControlPlane`] backed by recorded API responses.
//!
//! The recording mirrors the CloudFormation response shapes:
//!
//! ```json
//! {
//!   "Region": "eu-west-1",
//!   "AccountId": "123456789012",
//!   "Stacks": [{ "StackId": "...", "StackName": "svc-dev", "Outputs": [] }],
//!   "StackResourcePages": [{ "StackResourceSummaries": [], "NextToken": "p2" }],
//!   "ExportPages": [{ "Exports": [] }]
//! }
//! ```
//!
//! Pages are served in order; a continuation token selects the page after the
//! one that returned it.

use async_trait::async_trait;
use serde::Deserialize;
use std::path::Path;

use super::fetch::{ControlPlane, Page, DESCRIBE_STACKS, LIST_EXPORTS, LIST_STACK_RESOURCES};
use super::{ExportRecord, ResourceRecord, StackDescription, StackIdentity, StackOutput};
use crate::error::{read_to_string, InventoryError, Result};

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct RecordedStack {
    pub stack_id: String,
    pub stack_name: String,
    #[serde(default)]
    pub outputs: Vec<StackOutput>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct RecordedResourcePage {
    #[serde(default)]
    pub stack_resource_summaries: Vec<ResourceRecord>,
    #[serde(default)]
    pub next_token: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct RecordedExportPage {
    #[serde(default)]
    pub exports: Vec<ExportRecord>,
    #[serde(default)]
    pub next_token: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct RecordedControlPlane {
    pub region: String,
    pub account_id: String,
    #[serde(default)]
    pub partition: Option<String>,
    #[serde(default)]
    pub stacks: Vec<RecordedStack>,
    #[serde(default)]
    pub stack_resource_pages: Vec<RecordedResourcePage>,
    #[serde(default)]
    pub export_pages: Vec<RecordedExportPage>,
}

impl RecordedControlPlane {
    pub fn from_path(path: &Path) -> Result<Self> {
        let content = read_to_string(path)?;
        Self::from_json(&content).map_err(|e| match e {
            InventoryError::MalformedResponse { message, .. } => {
                InventoryError::malformed_response(path.display().to_string(), message).into()
            }
            other => other.into(),
        })
    }

    pub fn from_json(content: &str) -> std::result::Result<Self, InventoryError> {
        serde_json::from_str(content)
            .map_err(|e| InventoryError::malformed_response("recording", e.to_string()))
    }

    fn page_index<'a>(
        operation: &str,
        tokens: impl Iterator<Item = Option<&'a str>>,
        next_token: Option<&str>,
    ) -> std::result::Result<usize, InventoryError> {
        let Some(token) = next_token else {
            return Ok(0);
        };
        tokens
            .enumerate()
            .find(|(_, t)| *t == Some(token))
            .map(|(index, _)| index + 1)
            .ok_or_else(|| {
                InventoryError::request_failed(operation, format!("unknown NextToken '{token}'"))
            })
    }
}

#[async_trait]
impl ControlPlane for RecordedControlPlane {
    async fn describe_stack(
        &self,
        stack_name: &str,
    ) -> std::result::Result<StackDescription, InventoryError> {
        let stack = self
            .stacks
            .iter()
            .find(|s| s.stack_name == stack_name || s.stack_id == stack_name)
            .ok_or_else(|| InventoryError::stack_not_found(stack_name))?;

        tracing::debug!("{DESCRIBE_STACKS}: found {}", stack.stack_id);

        let mut identity = StackIdentity::new(
            &stack.stack_id,
            &stack.stack_name,
            &self.region,
            &self.account_id,
        );
        if let Some(partition) = self.partition.as_deref().filter(|p| !p.is_empty()) {
            identity.partition = partition.to_string();
        }

        Ok(StackDescription {
            identity,
            outputs: stack.outputs.clone(),
        })
    }

    async fn list_stack_resources(
        &self,
        stack_name: &str,
        next_token: Option<String>,
    ) -> std::result::Result<Page<ResourceRecord>, InventoryError> {
        if !self.stacks.iter().any(|s| s.stack_name == stack_name || s.stack_id == stack_name) {
            return Err(InventoryError::stack_not_found(stack_name));
        }

        let index = Self::page_index(
            LIST_STACK_RESOURCES,
            self.stack_resource_pages
                .iter()
                .map(|p| p.next_token.as_deref()),
            next_token.as_deref(),
        )?;

        Ok(match self.stack_resource_pages.get(index) {
            Some(page) => Page {
                items: page.stack_resource_summaries.clone(),
                next_token: page.next_token.clone(),
            },
            None => Page::last(vec![]),
        })
    }

    async fn list_exports(
        &self,
        next_token: Option<String>,
    ) -> std::result::Result<Page<ExportRecord>, InventoryError> {
        let index = Self::page_index(
            LIST_EXPORTS,
            self.export_pages.iter().map(|p| p.next_token.as_deref()),
            next_token.as_deref(),
        )?;

        Ok(match self.export_pages.get(index) {
            Some(page) => Page {
                items: page.exports.clone(),
                next_token: page.next_token.clone(),
            },
            None => Page::last(vec![]),
        })
    }
}
