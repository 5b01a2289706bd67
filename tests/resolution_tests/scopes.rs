//! Scope collection and flattening tests

use super::test_utils::snapshot;
use export_env::collect::{EnvCollector, OfflineOptions, ServiceDefinition};
use export_env::engine::{DiagnosticKind, ResolvedValue, Scope, ScopeKind};
use export_env::expression::Expression;
use export_env::{OverrideMaps, Resolver};
use pretty_assertions::assert_eq;

const DEFINITION: &str = r#"
service: orders
provider:
  name: aws
  environment:
    STAGE: dev
    TABLE_NAME:
      Ref: OrdersTable
    QUEUE_URL:
      Ref: MissingQueue
functions:
  create:
    handler: handler.create
    environment:
      TABLE_NAME: create-table
      POOL_ID:
        Fn::ImportValue: shared-UserPoolId
  list:
    handler: handler.list
    environment:
      QUEUE_URL:
        Ref: MissingQueue
resources:
  Outputs:
    ApiUrl:
      Value:
        Fn::ImportValue: shared-ApiUrl
custom:
  export-env:
    exportOutputs: true
    overrides:
      references:
        OrdersQueue: local-queue
"#;

#[test]
fn test_later_scopes_overwrite_earlier_keys() {
    let definition = ServiceDefinition::from_yaml_str(DEFINITION).unwrap();
    let snapshot = snapshot();
    let scopes = EnvCollector::new(&definition)
        .with_offline(OfflineOptions::default())
        .collect(&snapshot);

    let scoped = Resolver::new().resolve_scopes(&scopes, &snapshot, definition.overrides());
    let kinds: Vec<ScopeKind> = scoped.scopes.iter().map(|(kind, _)| kind.clone()).collect();
    assert_eq!(
        kinds,
        vec![
            ScopeKind::Global,
            ScopeKind::Function("create".to_string()),
            ScopeKind::Function("list".to_string()),
            ScopeKind::Offline,
            ScopeKind::Outputs,
        ]
    );

    let resolution = scoped.flatten();
    let keys: Vec<&str> = resolution.variables.keys().map(String::as_str).collect();
    assert_eq!(
        keys,
        vec!["STAGE", "TABLE_NAME", "QUEUE_URL", "POOL_ID", "IS_OFFLINE", "API_ENDPOINT", "API_URL"]
    );
    assert_eq!(
        resolution.get("TABLE_NAME"),
        Some(&ResolvedValue::resolved_string("create-table"))
    );
    assert_eq!(
        resolution.get("POOL_ID"),
        Some(&ResolvedValue::resolved_string("eu-west-1_abc123"))
    );
    assert_eq!(resolution.get("IS_OFFLINE"), Some(&ResolvedValue::resolved(true)));
    assert_eq!(
        resolution.get("API_URL"),
        Some(&ResolvedValue::resolved_string("https://api.example.com"))
    );
}

#[test]
fn test_identical_diagnostics_across_scopes_are_reported_once() {
    let definition = ServiceDefinition::from_yaml_str(DEFINITION).unwrap();
    let snapshot = snapshot();
    let scopes = EnvCollector::new(&definition).collect(&snapshot);

    let resolution = Resolver::new()
        .resolve_scopes(&scopes, &snapshot, definition.overrides())
        .flatten();

    assert_eq!(resolution.diagnostics.len(), 1);
    assert_eq!(resolution.diagnostics[0].kind, DiagnosticKind::UnresolvedReference);
    assert_eq!(resolution.diagnostics[0].key, "QUEUE_URL");
    assert_eq!(resolution.get("QUEUE_URL"), Some(&ResolvedValue::Null));
    assert!(!resolution.is_fully_resolved());
}

#[test]
fn test_hand_built_scopes() {
    let snapshot = snapshot();
    let scopes = vec![
        Scope::new(ScopeKind::Global)
            .with_variable("REGION", Expression::reference("AWS::Region"))
            .with_variable("MODE", Expression::literal("global")),
        Scope::new(ScopeKind::Function("worker".to_string()))
            .with_variable("MODE", Expression::literal("worker")),
        Scope::new(ScopeKind::Offline),
    ];
    assert!(scopes[2].is_empty());

    let resolution = Resolver::new()
        .resolve_scopes(&scopes, &snapshot, &OverrideMaps::default())
        .flatten();

    assert_eq!(resolution.variables.len(), 2);
    assert_eq!(resolution.get("REGION"), Some(&ResolvedValue::resolved_string("eu-west-1")));
    assert_eq!(resolution.get("MODE"), Some(&ResolvedValue::resolved_string("worker")));
    assert!(resolution.is_fully_resolved());
}

#[test]
fn test_overwritten_unresolved_key_does_not_warn() {
    let snapshot = snapshot();
    let scopes = vec![
        Scope::new(ScopeKind::Global).with_variable("TABLE", Expression::reference("Missing")),
        Scope::new(ScopeKind::Function("create".to_string()))
            .with_variable("TABLE", Expression::literal("local")),
    ];

    let resolution = Resolver::new()
        .resolve_scopes(&scopes, &snapshot, &OverrideMaps::default())
        .flatten();

    assert_eq!(resolution.get("TABLE"), Some(&ResolvedValue::resolved_string("local")));
    assert!(resolution.diagnostics.is_empty());
    assert!(resolution.is_fully_resolved());
}
