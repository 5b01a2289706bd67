//! `Fn::ImportValue` resolution tests

use super::test_utils::{kinds, resolve, resolve_json};
use export_env::engine::{DiagnosticKind, ResolvedValue};
use export_env::expression::Expression;
use pretty_assertions::assert_eq;

#[test]
fn test_import_resolves_export_value() {
    let (value, diagnostics) = resolve_json(r#"{"Fn::ImportValue": "shared-UserPoolId"}"#);
    assert_eq!(value, ResolvedValue::resolved_string("eu-west-1_abc123"));
    assert!(diagnostics.is_empty());
}

#[test]
fn test_missing_import_is_null_with_one_diagnostic() {
    let (value, diagnostics) = resolve(&Expression::import("shared-Missing"));
    assert_eq!(value, ResolvedValue::Null);
    assert_eq!(kinds(&diagnostics), vec![DiagnosticKind::UnresolvedImport]);
    assert_eq!(diagnostics[0].detail, "shared-Missing");
    assert_eq!(diagnostics[0].message(), "Failed to resolve import value shared-Missing");
}

#[test]
fn test_import_names_are_not_references() {
    // Export names and logical ids live in separate tables.
    let (value, _) = resolve(&Expression::import("OrdersTable"));
    assert_eq!(value, ResolvedValue::Null);
}

#[test]
fn test_non_string_import_argument_is_unsupported() {
    let (value, diagnostics) = resolve_json(r#"{"Fn::ImportValue": {"Fn::Sub": "x"}}"#);
    assert_eq!(value, ResolvedValue::Null);
    assert_eq!(kinds(&diagnostics), vec![DiagnosticKind::UnsupportedForm]);
}
