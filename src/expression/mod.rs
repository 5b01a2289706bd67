//! Intrinsic expression model.
//!
//! Raw configuration values are parsed once into [`Expression`]. Parsing
//! never fails: shapes that are not understood become
//! [`Expression::Unsupported`] and are reported when resolved.

pub mod pseudo;
pub mod scalar;

pub use pseudo::PseudoParameter;
pub use scalar::Scalar;

use serde_json::Value as JsonValue;

pub const REF: &str = "Ref";
pub const IMPORT_VALUE: &str = "Fn::ImportValue";
pub const JOIN: &str = "Fn::Join";
pub const GET_ATT: &str = "Fn::GetAtt";

#[derive(Debug, Clone, PartialEq)]
pub enum Expression {
    Literal(Scalar),
    /// Reference to a logical id or a pseudo-parameter.
    Ref(String),
    GetAtt {
        logical_id: String,
        attribute: String,
    },
    ImportValue(String),
    Join {
        delimiter: String,
        parts: Vec<Expression>,
    },
    /// Anything else. Carries a short description of the offending shape.
    Unsupported(String),
}

impl Expression {
    pub fn literal(value: impl Into<Scalar>) -> Self {
        Self::Literal(value.into())
    }

    pub fn reference(logical_id: impl Into<String>) -> Self {
        Self::Ref(logical_id.into())
    }

    pub fn import(export_name: impl Into<String>) -> Self {
        Self::ImportValue(export_name.into())
    }

    pub fn get_att(logical_id: impl Into<String>, attribute: impl Into<String>) -> Self {
        Self::GetAtt {
            logical_id: logical_id.into(),
            attribute: attribute.into(),
        }
    }

    pub fn join(delimiter: impl Into<String>, parts: Vec<Expression>) -> Self {
        Self::Join {
            delimiter: delimiter.into(),
            parts,
        }
    }

    /// Parses a JSON-compatible configuration value.
    pub fn parse(value: &JsonValue) -> Self {
        let map = match value {
            JsonValue::Object(map) => map,
            JsonValue::Null => return Self::Unsupported("null value".to_string()),
            JsonValue::Array(_) => return Self::Unsupported("array value".to_string()),
            scalar => {
                return Scalar::from_json(scalar)
                    .map(Self::Literal)
                    .unwrap_or_else(|| Self::Unsupported(scalar.to_string()))
            }
        };

        if let Some(arg) = map.get(REF) {
            return match arg.as_str() {
                Some(id) => Self::Ref(id.to_string()),
                None => malformed(REF, arg),
            };
        }

        if let Some(arg) = map.get(IMPORT_VALUE) {
            return match arg.as_str() {
                Some(name) => Self::ImportValue(name.to_string()),
                None => malformed(IMPORT_VALUE, arg),
            };
        }

        if let Some(arg) = map.get(JOIN) {
            return parse_join(arg);
        }

        if let Some(arg) = map.get(GET_ATT) {
            return parse_get_att(arg);
        }

        let keys: Vec<&str> = map.keys().map(String::as_str).collect();
        Self::Unsupported(format!("object with keys [{}]", keys.join(", ")))
    }

    pub fn is_literal(&self) -> bool {
        matches!(self, Self::Literal(_))
    }

    /// Intrinsic name for diagnostics and logging.
    pub fn kind(&self) -> &'static str {
        match self {
            Self::Literal(_) => "literal",
            Self::Ref(_) => REF,
            Self::GetAtt { .. } => GET_ATT,
            Self::ImportValue(_) => IMPORT_VALUE,
            Self::Join { .. } => JOIN,
            Self::Unsupported(_) => "unsupported",
        }
    }
}

impl From<&JsonValue> for Expression {
    fn from(value: &JsonValue) -> Self {
        Self::parse(value)
    }
}

fn malformed(intrinsic: &str, arg: &JsonValue) -> Expression {
    Expression::Unsupported(format!("{intrinsic} with malformed argument {arg}"))
}

// Fn::Join: [ "<delimiter>", [ <expr>, ... ] ]
fn parse_join(arg: &JsonValue) -> Expression {
    let Some([delimiter, parts]) = arg.as_array().map(Vec::as_slice) else {
        return malformed(JOIN, arg);
    };

    match (delimiter.as_str(), parts.as_array()) {
        (Some(delimiter), Some(parts)) => Expression::Join {
            delimiter: delimiter.to_string(),
            parts: parts.iter().map(Expression::parse).collect(),
        },
        _ => malformed(JOIN, arg),
    }
}

// Fn::GetAtt: [ "<LogicalId>", "<Attribute>" ] or "<LogicalId>.<Attribute>"
fn parse_get_att(arg: &JsonValue) -> Expression {
    match arg {
        JsonValue::String(s) => match s.split_once('.') {
            Some((id, attr)) if !id.is_empty() && !attr.is_empty() => Expression::get_att(id, attr),
            _ => malformed(GET_ATT, arg),
        },
        JsonValue::Array(items) => match items.as_slice() {
            [JsonValue::String(id), JsonValue::String(attr)] => Expression::get_att(id, attr),
            _ => malformed(GET_ATT, arg),
        },
        _ => malformed(GET_ATT, arg),
    }
}
