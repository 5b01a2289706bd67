use serde::Serialize;

/// Why a value could not be resolved.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum DiagnosticKind {
    UnresolvedReference,
    UnresolvedImport,
    UnsupportedForm,
}

impl DiagnosticKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::UnresolvedReference => "unresolved-reference",
            Self::UnresolvedImport => "unresolved-import",
            Self::UnsupportedForm => "unsupported-form",
        }
    }
}

impl std::fmt::Display for DiagnosticKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// A non-fatal resolution problem for one top-level key.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
pub struct Diagnostic {
    pub kind: DiagnosticKind,
    pub key: String,
    pub detail: String,
}

impl Diagnostic {
    pub fn new(kind: DiagnosticKind, key: impl Into<String>, detail: impl Into<String>) -> Self {
        Self {
            kind,
            key: key.into(),
            detail: detail.into(),
        }
    }

    pub fn unresolved_reference(key: impl Into<String>, logical_id: impl Into<String>) -> Self {
        Self::new(DiagnosticKind::UnresolvedReference, key, logical_id)
    }

    pub fn unresolved_import(key: impl Into<String>, export_name: impl Into<String>) -> Self {
        Self::new(DiagnosticKind::UnresolvedImport, key, export_name)
    }

    pub fn unsupported_form(key: impl Into<String>, description: impl Into<String>) -> Self {
        Self::new(DiagnosticKind::UnsupportedForm, key, description)
    }

    pub fn message(&self) -> String {
        let what = match self.kind {
            DiagnosticKind::UnresolvedReference => "Failed to resolve reference",
            DiagnosticKind::UnresolvedImport => "Failed to resolve import value",
            DiagnosticKind::UnsupportedForm => "Unsupported expression",
        };
        if self.key.is_empty() {
            format!("{what} {}", self.detail)
        } else {
            format!("{what} {} (in {})", self.detail, self.key)
        }
    }
}

impl std::fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.message())
    }
}
