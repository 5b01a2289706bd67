//! `Ref` and `Fn::GetAtt` resolution tests

use super::test_utils::{kinds, parse, resolve, resolve_json, snapshot, STACK_ID};
use export_env::engine::{DiagnosticKind, ResolvedValue};
use export_env::expression::Expression;
use export_env::{OverrideMaps, Resolver};
use pretty_assertions::assert_eq;

// =============================================================================
// Literals
// =============================================================================

#[test]
fn test_literals_resolve_to_themselves() {
    for json in [r#""plain""#, "42", "true", "3.5"] {
        let value: serde_json::Value = serde_json::from_str(json).unwrap();
        let (resolved, diagnostics) = resolve(&Expression::parse(&value));
        assert_eq!(resolved.format_for_output(), value, "literal {json}");
        assert!(diagnostics.is_empty());
    }
}

// =============================================================================
// Resource references
// =============================================================================

#[test]
fn test_ref_resolves_physical_id() {
    let (value, diagnostics) = resolve_json(r#"{"Ref": "OrdersTable"}"#);
    assert_eq!(value, ResolvedValue::resolved_string("orders-dev-OrdersTable-1A2B"));
    assert!(diagnostics.is_empty());
}

#[test]
fn test_missing_ref_is_null_with_one_diagnostic() {
    let (value, diagnostics) = resolve(&Expression::reference("MissingTable"));
    assert_eq!(value, ResolvedValue::Null);
    assert_eq!(kinds(&diagnostics), vec![DiagnosticKind::UnresolvedReference]);
    assert_eq!(diagnostics[0].detail, "MissingTable");
}

// =============================================================================
// Pseudo-parameters
// =============================================================================

#[test]
fn test_pseudo_parameters_come_from_stack_identity() {
    let cases = [
        ("AWS::Region", "eu-west-1"),
        ("AWS::AccountId", "123456789012"),
        ("AWS::StackName", "orders-dev"),
        ("AWS::StackId", STACK_ID),
        ("AWS::Partition", "aws"),
        ("AWS::URLSuffix", "amazonaws.com"),
    ];
    for (name, expected) in cases {
        let (value, diagnostics) = resolve(&Expression::reference(name));
        assert_eq!(value, ResolvedValue::resolved_string(expected), "{name}");
        assert!(diagnostics.is_empty(), "{name}");
    }
}

#[test]
fn test_unknown_pseudo_parameter_is_unresolved() {
    let (value, diagnostics) = resolve(&Expression::reference("AWS::NotificationARNs"));
    assert_eq!(value, ResolvedValue::Null);
    assert_eq!(kinds(&diagnostics), vec![DiagnosticKind::UnresolvedReference]);
}

// =============================================================================
// Attributes
// =============================================================================

#[test]
fn test_get_att_without_heuristics_is_unresolved() {
    let (value, diagnostics) = resolve_json(r#"{"Fn::GetAtt": ["OrdersTable", "Arn"]}"#);
    assert_eq!(value, ResolvedValue::Null);
    assert_eq!(kinds(&diagnostics), vec![DiagnosticKind::UnresolvedReference]);
    assert_eq!(diagnostics[0].detail, "OrdersTable.Arn");
}

#[test]
fn test_get_att_with_heuristics() {
    let resolver = Resolver::builder().with_attribute_heuristics(true).build();
    let expr = parse(r#"{"Fn::GetAtt": "OrdersTable.Arn"}"#);
    let (value, diagnostics) = resolver.resolve(&expr, &snapshot(), &OverrideMaps::default());

    assert_eq!(
        value,
        ResolvedValue::resolved_string(
            "arn:aws:dynamodb:eu-west-1:123456789012:table/orders-dev-OrdersTable-1A2B"
        )
    );
    assert!(diagnostics.is_empty());
}

#[test]
fn test_get_att_unknown_attribute_with_heuristics() {
    let resolver = Resolver::builder().with_attribute_heuristics(true).build();
    let expr = Expression::get_att("OrdersTable", "StreamArn");
    let (value, diagnostics) = resolver.resolve(&expr, &snapshot(), &OverrideMaps::default());
    assert_eq!(value, ResolvedValue::Null);
    assert_eq!(diagnostics[0].detail, "OrdersTable.StreamArn");
}
