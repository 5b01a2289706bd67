use indexmap::IndexMap;

use crate::expression::Expression;

/// Where a group of variables was declared.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ScopeKind {
    /// Provider-level variables shared by every function.
    Global,
    Function(String),
    /// Variables synthesized for local offline runs.
    Offline,
    /// Variables derived from stack outputs.
    Outputs,
}

impl ScopeKind {
    pub fn label(&self) -> String {
        match self {
            Self::Global => "global".to_string(),
            Self::Function(name) => format!("function:{name}"),
            Self::Offline => "offline".to_string(),
            Self::Outputs => "outputs".to_string(),
        }
    }
}

/// An ordered group of variables resolved together.
#[derive(Debug, Clone, PartialEq)]
pub struct Scope {
    pub kind: ScopeKind,
    pub variables: IndexMap<String, Expression>,
}

impl Scope {
    pub fn new(kind: ScopeKind) -> Self {
        Self {
            kind,
            variables: IndexMap::new(),
        }
    }

    pub fn with_variable(mut self, key: impl Into<String>, value: Expression) -> Self {
        self.variables.insert(key.into(), value);
        self
    }

    pub fn is_empty(&self) -> bool {
        self.variables.is_empty()
    }

    pub fn len(&self) -> usize {
        self.variables.len()
    }
}
