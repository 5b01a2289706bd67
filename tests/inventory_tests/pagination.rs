//! Pagination tests

use super::test_utils::{MockControlPlane, STACK_NAME};
use export_env::error::InventoryError;
use export_env::inventory::SnapshotFetcher;
use pretty_assertions::assert_eq;
use std::time::Duration;

#[tokio::test]
async fn test_follows_continuation_tokens_in_order() {
    let plane = MockControlPlane::new(3, 2);
    let snapshot = SnapshotFetcher::new().fetch(&plane, STACK_NAME).await.unwrap();

    assert_eq!(
        plane.requests("ListStackResources"),
        vec![None, Some("1".to_string()), Some("2".to_string())]
    );
    assert_eq!(plane.requests("ListExports"), vec![None, Some("1".to_string())]);

    let ids: Vec<&str> = snapshot
        .resources()
        .iter()
        .map(|r| r.logical_id.as_str())
        .collect();
    assert_eq!(
        ids,
        vec![
            "Resource0x0",
            "Resource0x1",
            "Resource1x0",
            "Resource1x1",
            "Resource2x0",
            "Resource2x1",
        ]
    );
    assert_eq!(snapshot.exports().len(), 4);
    assert_eq!(snapshot.identity().stack_name, STACK_NAME);
    assert_eq!(
        snapshot.output("ServiceEndpoint").map(|o| o.value.as_str()),
        Some("https://api.example.com")
    );
}

#[tokio::test]
async fn test_stops_at_page_limit() {
    let plane = MockControlPlane::new(5, 1);
    let err = SnapshotFetcher::new()
        .with_max_pages(3)
        .fetch(&plane, STACK_NAME)
        .await
        .unwrap_err();

    match err {
        InventoryError::PageLimitExceeded {
            operation,
            max_pages,
        } => {
            assert_eq!(operation, "ListStackResources");
            assert_eq!(max_pages, 3);
        }
        other => panic!("expected PageLimitExceeded, got {other:?}"),
    }
    assert_eq!(plane.requests("ListStackResources").len(), 3);
}

#[tokio::test]
async fn test_exactly_max_pages_is_allowed() {
    let plane = MockControlPlane::new(3, 3);
    let snapshot = SnapshotFetcher::new()
        .with_max_pages(3)
        .fetch(&plane, STACK_NAME)
        .await
        .unwrap();
    assert_eq!(snapshot.resources().len(), 6);
}

#[tokio::test]
async fn test_listings_are_fetched_concurrently() {
    let plane = MockControlPlane::new(1, 1).with_delay(Duration::from_millis(50));
    SnapshotFetcher::new().fetch(&plane, STACK_NAME).await.unwrap();
    assert!(
        plane.max_in_flight() >= 2,
        "expected overlapping requests, saw {}",
        plane.max_in_flight()
    );
}

#[tokio::test]
async fn test_empty_listings() {
    let plane = MockControlPlane::new(0, 0);
    let snapshot = SnapshotFetcher::new().fetch(&plane, STACK_NAME).await.unwrap();
    assert!(snapshot.resources().is_empty());
    assert!(snapshot.exports().is_empty());
}
