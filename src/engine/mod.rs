pub mod attributes;
pub mod context;
pub mod diagnostics;
pub mod scope;
pub mod tables;
pub mod value;

pub use context::Context;
pub use diagnostics::{Diagnostic, DiagnosticKind};
pub use scope::{Scope, ScopeKind};
pub use tables::ResolutionTables;
pub use value::ResolvedValue;

use indexmap::IndexMap;
use rayon::prelude::*;
use serde::Serialize;
use std::collections::HashSet;

use crate::expression::{Expression, PseudoParameter, Scalar};
use crate::inventory::InventorySnapshot;
use crate::overrides::OverrideMaps;

// At least the nesting limit of the serde_json and serde_yaml parsers, so
// anything that parses resolves fully.
const DEFAULT_MAX_DEPTH: usize = 128;

/// Resolved variables plus the diagnostics produced while resolving them.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct Resolution {
    pub variables: IndexMap<String, ResolvedValue>,
    pub diagnostics: Vec<Diagnostic>,
}

impl Resolution {
    pub fn get(&self, key: &str) -> Option<&ResolvedValue> {
        self.variables.get(key)
    }

    pub fn unresolved_keys(&self) -> Vec<&str> {
        self.variables
            .iter()
            .filter(|(_, v)| !v.is_resolved())
            .map(|(k, _)| k.as_str())
            .collect()
    }

    pub fn is_fully_resolved(&self) -> bool {
        self.diagnostics.is_empty()
    }

    /// Drops variables that did not resolve.
    pub fn without_unresolved(mut self) -> Self {
        self.variables.retain(|_, v| v.is_resolved());
        self
    }

    /// Merges `other` into `self`. Values from `other` win, and diagnostics
    /// recorded here for an overwritten key are dropped with its value.
    /// Identical diagnostics are kept once.
    pub fn merge(&mut self, other: Resolution) {
        self.diagnostics
            .retain(|d| !other.variables.contains_key(&d.key));
        self.variables.extend(other.variables);
        let mut seen: HashSet<Diagnostic> = self.diagnostics.iter().cloned().collect();
        for diagnostic in other.diagnostics {
            if seen.insert(diagnostic.clone()) {
                self.diagnostics.push(diagnostic);
            }
        }
    }
}

/// Per-scope resolutions, in the order the scopes were given.
#[derive(Debug, Clone, Default)]
pub struct ScopedResolution {
    pub scopes: Vec<(ScopeKind, Resolution)>,
}

impl ScopedResolution {
    /// Flattens scopes in order; later scopes overwrite earlier keys.
    pub fn flatten(self) -> Resolution {
        self.scopes
            .into_iter()
            .fold(Resolution::default(), |mut acc, (_, resolution)| {
                acc.merge(resolution);
                acc
            })
    }
}

/// Resolves intrinsic expressions against an inventory snapshot.
///
/// Resolution is pure: the same expression, snapshot and overrides always
/// produce the same value and diagnostics. Misses never abort; they resolve
/// to [`ResolvedValue::Null`] and add a [`Diagnostic`].
#[derive(Debug, Clone)]
pub struct Resolver {
    max_depth: usize,
    attribute_heuristics: bool,
}

impl Resolver {
    pub fn new() -> Self {
        Self {
            max_depth: DEFAULT_MAX_DEPTH,
            attribute_heuristics: false,
        }
    }

    pub fn builder() -> ResolverBuilder {
        ResolverBuilder::new()
    }

    pub fn max_depth(&self) -> usize {
        self.max_depth
    }

    pub fn attribute_heuristics(&self) -> bool {
        self.attribute_heuristics
    }

    pub fn tables<'a>(
        &self,
        snapshot: &InventorySnapshot,
        overrides: &'a OverrideMaps,
    ) -> ResolutionTables<'a> {
        ResolutionTables::build(snapshot, overrides, self.attribute_heuristics)
    }

    /// Resolves a single expression. Diagnostics carry an empty key.
    pub fn resolve(
        &self,
        expr: &Expression,
        snapshot: &InventorySnapshot,
        overrides: &OverrideMaps,
    ) -> (ResolvedValue, Vec<Diagnostic>) {
        let tables = self.tables(snapshot, overrides);
        self.resolve_entry("", expr, &tables)
    }

    /// Resolves one top-level key against prebuilt tables.
    pub fn resolve_entry(
        &self,
        key: &str,
        expr: &Expression,
        tables: &ResolutionTables<'_>,
    ) -> (ResolvedValue, Vec<Diagnostic>) {
        let mut ctx = Context::new(tables, key);
        let value = self.resolve_with_depth(expr, &mut ctx, 0);

        if !expr.is_literal() && !key.is_empty() {
            tracing::debug!(
                "Resolved environment variable {key} ({}): {}",
                expr.kind(),
                value.format_for_output()
            );
        }

        (value, ctx.into_diagnostics())
    }

    /// Resolves every entry of an ordered mapping with one table build.
    pub fn resolve_all(
        &self,
        entries: &IndexMap<String, Expression>,
        snapshot: &InventorySnapshot,
        overrides: &OverrideMaps,
    ) -> Resolution {
        let tables = self.tables(snapshot, overrides);
        self.resolve_with_tables(entries, &tables)
    }

    pub fn resolve_with_tables(
        &self,
        entries: &IndexMap<String, Expression>,
        tables: &ResolutionTables<'_>,
    ) -> Resolution {
        let mut resolution = Resolution::default();
        for (key, expr) in entries {
            let (value, diagnostics) = self.resolve_entry(key, expr, tables);
            resolution.variables.insert(key.clone(), value);
            resolution.diagnostics.extend(diagnostics);
        }
        resolution
    }

    /// Resolves independent scopes in parallel against a shared snapshot.
    pub fn resolve_scopes(
        &self,
        scopes: &[Scope],
        snapshot: &InventorySnapshot,
        overrides: &OverrideMaps,
    ) -> ScopedResolution {
        let tables = self.tables(snapshot, overrides);
        let resolved = scopes
            .par_iter()
            .map(|scope| {
                tracing::debug!(
                    "Resolving {} variable(s) in {} scope",
                    scope.len(),
                    scope.kind.label()
                );
                (
                    scope.kind.clone(),
                    self.resolve_with_tables(&scope.variables, &tables),
                )
            })
            .collect();

        ScopedResolution { scopes: resolved }
    }

    fn resolve_with_depth(&self, expr: &Expression, ctx: &mut Context, depth: usize) -> ResolvedValue {
        if depth >= self.max_depth {
            let key = ctx.key().to_string();
            ctx.report(Diagnostic::unsupported_form(
                key,
                format!("expression nested deeper than {}", self.max_depth),
            ));
            return ResolvedValue::unresolved();
        }

        match expr {
            Expression::Literal(value) => ResolvedValue::Scalar(value.clone()),
            Expression::Ref(logical_id) => self.resolve_reference(logical_id, ctx),
            Expression::GetAtt {
                logical_id,
                attribute,
            } => self.resolve_attribute(logical_id, attribute, ctx),
            Expression::ImportValue(export_name) => self.resolve_import(export_name, ctx),
            Expression::Join { delimiter, parts } => {
                self.resolve_join(delimiter, parts, ctx, depth)
            }
            Expression::Unsupported(description) => {
                let key = ctx.key().to_string();
                let diagnostic = Diagnostic::unsupported_form(key, description.clone());
                tracing::debug!("{diagnostic}");
                ctx.report(diagnostic);
                ResolvedValue::unresolved()
            }
        }
    }

    fn resolve_reference(&self, logical_id: &str, ctx: &mut Context) -> ResolvedValue {
        match ctx.reference(logical_id) {
            Some(value) => ResolvedValue::Scalar(value),
            None => {
                if PseudoParameter::is_pseudo(logical_id) {
                    tracing::debug!("Pseudo-parameter {logical_id} has no value for this stack");
                }
                let key = ctx.key().to_string();
                ctx.report(Diagnostic::unresolved_reference(key, logical_id));
                ResolvedValue::unresolved()
            }
        }
    }

    fn resolve_attribute(
        &self,
        logical_id: &str,
        attribute: &str,
        ctx: &mut Context,
    ) -> ResolvedValue {
        match ctx.attribute(logical_id, attribute) {
            Some(value) => ResolvedValue::Scalar(value),
            None => {
                let key = ctx.key().to_string();
                ctx.report(Diagnostic::unresolved_reference(
                    key,
                    format!("{logical_id}.{attribute}"),
                ));
                ResolvedValue::unresolved()
            }
        }
    }

    fn resolve_import(&self, export_name: &str, ctx: &mut Context) -> ResolvedValue {
        match ctx.import(export_name) {
            Some(value) => ResolvedValue::Scalar(value),
            None => {
                let key = ctx.key().to_string();
                ctx.report(Diagnostic::unresolved_import(key, export_name));
                ResolvedValue::unresolved()
            }
        }
    }

    // Unresolved parts join as empty strings.
    fn resolve_join(
        &self,
        delimiter: &str,
        parts: &[Expression],
        ctx: &mut Context,
        depth: usize,
    ) -> ResolvedValue {
        let rendered: Vec<String> = parts
            .iter()
            .map(|part| self.resolve_with_depth(part, ctx, depth + 1).to_env_string())
            .collect();
        ResolvedValue::Scalar(Scalar::String(rendered.join(delimiter)))
    }
}

impl Default for Resolver {
    fn default() -> Self {
        Self::new()
    }
}

pub struct ResolverBuilder {
    max_depth: usize,
    attribute_heuristics: bool,
}

impl ResolverBuilder {
    pub fn new() -> Self {
        Self {
            max_depth: DEFAULT_MAX_DEPTH,
            attribute_heuristics: false,
        }
    }

    pub fn with_max_depth(mut self, depth: usize) -> Self {
        self.max_depth = depth;
        self
    }

    /// Enables the experimental resource-type attribute heuristics. Off by
    /// default; see [`attributes`].
    pub fn with_attribute_heuristics(mut self, enabled: bool) -> Self {
        self.attribute_heuristics = enabled;
        self
    }

    pub fn build(self) -> Resolver {
        Resolver {
            max_depth: self.max_depth,
            attribute_heuristics: self.attribute_heuristics,
        }
    }
}

impl Default for ResolverBuilder {
    fn default() -> Self {
        Self::new()
    }
}
