/// Value representation for resolved expressions.
///
/// A resolved value is either a literal scalar or `Null`, which marks an
/// unresolved reference. Every `Null` produced by the resolver is paired with
/// a diagnostic.
use serde::{Serialize, Serializer};

use crate::expression::Scalar;

#[derive(Debug, Clone, PartialEq)]
pub enum ResolvedValue {
    Scalar(Scalar),
    Null,
}

impl ResolvedValue {
    /// Create a resolved value
    pub fn resolved(value: impl Into<Scalar>) -> Self {
        Self::Scalar(value.into())
    }

    /// Create a resolved string value
    pub fn resolved_string(value: impl Into<String>) -> Self {
        Self::Scalar(Scalar::String(value.into()))
    }

    /// Create an unresolved value
    pub fn unresolved() -> Self {
        Self::Null
    }

    pub fn is_resolved(&self) -> bool {
        matches!(self, Self::Scalar(_))
    }

    /// Text used when the value is concatenated or written as an
    /// environment variable. `Null` renders as the empty string.
    pub fn to_env_string(&self) -> String {
        match self {
            Self::Scalar(value) => value.to_string(),
            Self::Null => String::new(),
        }
    }

    /// Format value for JSON output
    pub fn format_for_output(&self) -> serde_json::Value {
        match self {
            Self::Scalar(value) => value.to_json(),
            Self::Null => serde_json::Value::Null,
        }
    }
}

impl From<Option<Scalar>> for ResolvedValue {
    fn from(value: Option<Scalar>) -> Self {
        value.map_or(Self::Null, Self::Scalar)
    }
}

impl Serialize for ResolvedValue {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            Self::Scalar(value) => value.serialize(serializer),
            Self::Null => serializer.serialize_none(),
        }
    }
}
