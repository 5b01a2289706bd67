//! Serverless-style service definition.
//!
//! Only the parts that declare environment variables, stack naming, outputs
//! and this tool's own settings are modelled; everything else is ignored.

use indexmap::IndexMap;
use serde::Deserialize;
use serde_json::Value as JsonValue;
use std::path::Path;

use crate::error::{read_to_string, ConfigError, Result};
use crate::overrides::OverrideMaps;

pub const DEFAULT_STAGE: &str = "dev";

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(untagged)]
pub enum ServiceName {
    Name(String),
    Detailed { name: String },
}

impl ServiceName {
    pub fn as_str(&self) -> &str {
        match self {
            Self::Name(name) | Self::Detailed { name } => name,
        }
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct ProviderConfig {
    pub stage: Option<String>,
    pub region: Option<String>,
    pub stack_name: Option<String>,
    pub environment: IndexMap<String, JsonValue>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct FunctionConfig {
    pub environment: IndexMap<String, JsonValue>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct OutputConfig {
    #[serde(rename = "Value")]
    pub value: JsonValue,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct ResourcesConfig {
    #[serde(rename = "Outputs")]
    pub outputs: IndexMap<String, OutputConfig>,
}

/// `custom.export-env`
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct ExportEnvSettings {
    /// Comma separated keys dropped from the collected variables.
    pub ignore_environment_keys: Option<String>,
    pub export_outputs: bool,
    pub filename: Option<String>,
    pub overrides: OverrideMaps,
}

/// `custom.serverless-offline`
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct OfflineSettings {
    pub host: Option<String>,
    pub port: Option<u16>,
    pub https_protocol: Option<String>,
    pub prefix: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct CustomConfig {
    #[serde(rename = "export-env")]
    pub export_env: ExportEnvSettings,
    #[serde(rename = "serverless-offline")]
    pub offline: OfflineSettings,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct ServiceDefinition {
    pub service: Option<ServiceName>,
    pub provider: ProviderConfig,
    pub functions: IndexMap<String, FunctionConfig>,
    pub resources: ResourcesConfig,
    pub custom: CustomConfig,
}

impl ServiceDefinition {
    pub fn from_path(path: &Path) -> Result<Self> {
        let content = read_to_string(path)?;

        let extension = path
            .extension()
            .and_then(|e| e.to_str())
            .unwrap_or_default()
            .to_ascii_lowercase();

        let definition = match extension.as_str() {
            "yml" | "yaml" => serde_yaml::from_str(&content)
                .map_err(|e| ConfigError::parse_error(path, e.to_string()))?,
            "json" => serde_json::from_str(&content)
                .map_err(|e| ConfigError::parse_error(path, e.to_string()))?,
            other => return Err(ConfigError::unsupported_format(other).into()),
        };

        tracing::debug!("Loaded service definition from {}", path.display());
        Ok(definition)
    }

    pub fn from_yaml_str(content: &str) -> Result<Self> {
        serde_yaml::from_str(content)
            .map_err(|e| ConfigError::parse_error("<inline>", e.to_string()).into())
    }

    pub fn service_name(&self) -> Option<&str> {
        self.service.as_ref().map(ServiceName::as_str)
    }

    pub fn stage(&self) -> &str {
        self.provider.stage.as_deref().unwrap_or(DEFAULT_STAGE)
    }

    /// Stack name: explicit `provider.stackName`, else `<service>-<stage>`.
    pub fn stack_name(&self) -> Result<String> {
        if let Some(name) = &self.provider.stack_name {
            return Ok(name.clone());
        }
        let service = self.service_name().ok_or_else(|| {
            ConfigError::invalid_definition("missing 'service' (needed to derive the stack name)")
        })?;
        Ok(format!("{service}-{}", self.stage()))
    }

    pub fn overrides(&self) -> &OverrideMaps {
        &self.custom.export_env.overrides
    }
}
