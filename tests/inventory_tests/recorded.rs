//! Recorded control plane tests

use super::test_utils::get_test_fixture_path;
use export_env::error::{Error, InventoryError};
use export_env::inventory::{RecordedControlPlane, SnapshotFetcher};
use pretty_assertions::assert_eq;

#[tokio::test]
async fn test_fixture_builds_snapshot() {
    let plane = RecordedControlPlane::from_path(&get_test_fixture_path("inventory.json")).unwrap();
    let snapshot = SnapshotFetcher::new().fetch(&plane, "orders-dev").await.unwrap();

    assert_eq!(snapshot.identity().region, "eu-west-1");
    assert_eq!(snapshot.identity().partition, "aws");
    assert_eq!(snapshot.resources().len(), 3);
    assert_eq!(
        snapshot.resource("OrdersQueue").and_then(|r| r.physical_id.as_deref()),
        Some("https://sqs.eu-west-1.amazonaws.com/123456789012/orders-dev-OrdersQueue")
    );
    assert_eq!(
        snapshot.export("shared-UserPoolId").map(|e| e.value.as_str()),
        Some("eu-west-1_abc123")
    );
}

#[tokio::test]
async fn test_fixture_page_limit() {
    let plane = RecordedControlPlane::from_path(&get_test_fixture_path("inventory.json")).unwrap();
    let err = SnapshotFetcher::new()
        .with_max_pages(1)
        .fetch(&plane, "orders-dev")
        .await
        .unwrap_err();
    assert!(matches!(err, InventoryError::PageLimitExceeded { .. }));
}

#[test]
fn test_missing_recording() {
    let err = RecordedControlPlane::from_path(&get_test_fixture_path("missing.json")).unwrap_err();
    assert!(matches!(err, Error::Io(_)));
}
