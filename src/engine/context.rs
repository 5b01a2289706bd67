/// Resolution context that carries state while one top-level key is resolved.
///
/// This provides the resolver with access to:
/// - The merged lookup tables for the pass
/// - The key being resolved, used to attribute diagnostics
/// - The diagnostics collected so far, in evaluation order
use super::diagnostics::Diagnostic;
use super::tables::ResolutionTables;
use crate::expression::Scalar;

pub struct Context<'t, 'a> {
    tables: &'t ResolutionTables<'a>,
    key: String,
    diagnostics: Vec<Diagnostic>,
}

impl<'t, 'a> Context<'t, 'a> {
    pub fn new(tables: &'t ResolutionTables<'a>, key: impl Into<String>) -> Self {
        Self {
            tables,
            key: key.into(),
            diagnostics: Vec::new(),
        }
    }

    pub fn key(&self) -> &str {
        &self.key
    }

    pub fn reference(&self, logical_id: &str) -> Option<Scalar> {
        self.tables.reference(logical_id).cloned()
    }

    pub fn import(&self, export_name: &str) -> Option<Scalar> {
        self.tables.import(export_name).cloned()
    }

    pub fn attribute(&self, logical_id: &str, attribute: &str) -> Option<Scalar> {
        self.tables.attribute(logical_id, attribute).cloned()
    }

    pub fn report(&mut self, diagnostic: Diagnostic) {
        self.diagnostics.push(diagnostic);
    }

    pub fn into_diagnostics(self) -> Vec<Diagnostic> {
        self.diagnostics
    }
}
