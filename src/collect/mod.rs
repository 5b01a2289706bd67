//! Collection of raw environment variables from a service definition.
//!
//! Produces the ordered scopes the resolver works on: provider (global)
//! variables, one scope per function, then the optional offline and output
//! scopes. Flattening the resolved scopes in this order gives the final
//! mapping, with later scopes overwriting earlier keys.

pub mod definition;
pub mod offline;

pub use definition::{ServiceDefinition, DEFAULT_STAGE};
pub use offline::OfflineOptions;

use indexmap::IndexMap;
use serde_json::Value as JsonValue;

use crate::engine::{Scope, ScopeKind};
use crate::expression::Expression;
use crate::inventory::InventorySnapshot;
use crate::utils::{split_list, to_env_key};

pub struct EnvCollector<'d> {
    definition: &'d ServiceDefinition,
    offline: Option<OfflineOptions>,
    include_outputs: bool,
    ignore_keys: Vec<String>,
}

impl<'d> EnvCollector<'d> {
    pub fn new(definition: &'d ServiceDefinition) -> Self {
        let settings = &definition.custom.export_env;
        Self {
            definition,
            offline: None,
            include_outputs: settings.export_outputs,
            ignore_keys: settings
                .ignore_environment_keys
                .as_deref()
                .map(split_list)
                .unwrap_or_default(),
        }
    }

    pub fn with_offline(mut self, options: OfflineOptions) -> Self {
        self.offline = Some(options);
        self
    }

    pub fn with_outputs(mut self, include: bool) -> Self {
        self.include_outputs = include;
        self
    }

    pub fn ignore_keys(&self) -> &[String] {
        &self.ignore_keys
    }

    /// Collects every scope. The snapshot supplies deployed stack output
    /// values for the output scope.
    pub fn collect(&self, snapshot: &InventorySnapshot) -> Vec<Scope> {
        let mut scopes = vec![Scope {
            kind: ScopeKind::Global,
            variables: self.parse_environment(&self.definition.provider.environment),
        }];

        for (name, function) in &self.definition.functions {
            scopes.push(Scope {
                kind: ScopeKind::Function(name.clone()),
                variables: self.parse_environment(&function.environment),
            });
        }

        if let Some(offline) = &self.offline {
            scopes.push(Scope {
                kind: ScopeKind::Offline,
                variables: offline.variables(),
            });
        }

        if self.include_outputs {
            scopes.push(self.output_scope(snapshot));
        }

        let total: usize = scopes.iter().map(Scope::len).sum();
        tracing::info!(
            "Found {total} environment variable(s) in {} scope(s)",
            scopes.len()
        );
        scopes
    }

    fn parse_environment(&self, environment: &IndexMap<String, JsonValue>) -> IndexMap<String, Expression> {
        environment
            .iter()
            .filter(|(key, _)| {
                let ignored = self.ignore_keys.iter().any(|k| k == *key);
                if ignored {
                    tracing::debug!("Ignoring environment variable {key}");
                }
                !ignored
            })
            .map(|(key, value)| (key.clone(), Expression::parse(value)))
            .collect()
    }

    // Deployed output values win over the template's Value expression.
    fn output_scope(&self, snapshot: &InventorySnapshot) -> Scope {
        let variables = self
            .definition
            .resources
            .outputs
            .iter()
            .map(|(key, output)| {
                let value = match snapshot.output(key) {
                    Some(deployed) => Expression::literal(deployed.value.as_str()),
                    None => Expression::parse(&output.value),
                };
                (to_env_key(key), value)
            })
            .collect();

        Scope {
            kind: ScopeKind::Outputs,
            variables,
        }
    }
}
