use indexmap::IndexMap;

use super::definition::OfflineSettings;
use crate::expression::Expression;

pub const DEFAULT_HOST: &str = "localhost";
pub const DEFAULT_PORT: u16 = 3000;
pub const DEFAULT_PREFIX: &str = "/";

/// Settings for the variables injected when running offline. Values from the
/// command line take precedence over the service definition.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OfflineOptions {
    pub host: String,
    pub port: u16,
    pub https_protocol: String,
    pub prefix: String,
}

impl Default for OfflineOptions {
    fn default() -> Self {
        Self {
            host: DEFAULT_HOST.to_string(),
            port: DEFAULT_PORT,
            https_protocol: String::new(),
            prefix: DEFAULT_PREFIX.to_string(),
        }
    }
}

impl OfflineOptions {
    pub fn from_settings(settings: &OfflineSettings) -> Self {
        let defaults = Self::default();
        Self {
            host: settings.host.clone().unwrap_or(defaults.host),
            port: settings.port.unwrap_or(defaults.port),
            https_protocol: settings.https_protocol.clone().unwrap_or_default(),
            prefix: settings.prefix.clone().unwrap_or(defaults.prefix),
        }
    }

    /// `http[s]://<host>:<port><prefix>` with the prefix wrapped in slashes.
    pub fn api_endpoint(&self) -> String {
        let mut prefix = self.prefix.clone();
        if !prefix.starts_with('/') {
            prefix.insert(0, '/');
        }
        if !prefix.ends_with('/') {
            prefix.push('/');
        }
        let protocol = if self.https_protocol.is_empty() {
            "http"
        } else {
            "https"
        };
        format!("{protocol}://{}:{}{prefix}", self.host, self.port)
    }

    pub fn variables(&self) -> IndexMap<String, Expression> {
        let mut variables = IndexMap::new();
        variables.insert("IS_OFFLINE".to_string(), Expression::literal(true));
        variables.insert(
            "API_ENDPOINT".to_string(),
            Expression::literal(self.api_endpoint()),
        );
        variables
    }
}
