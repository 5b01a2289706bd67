use async_trait::async_trait;
use std::path::PathBuf;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;
use std::time::Duration;

use export_env::error::InventoryError;
use export_env::inventory::{
    ControlPlane, ExportRecord, Page, ResourceRecord, StackDescription, StackIdentity,
    StackOutput,
};

pub const STACK_NAME: &str = "orders-dev";

/// In-memory control plane. Continuation tokens are the index of the next
/// page, so requests can be checked for order.
pub struct MockControlPlane {
    resource_pages: Vec<Page<ResourceRecord>>,
    export_pages: Vec<Page<ExportRecord>>,
    delay: Duration,
    fail_exports: bool,
    requests: Mutex<Vec<(&'static str, Option<String>)>>,
    in_flight: AtomicUsize,
    max_in_flight: AtomicUsize,
}

impl MockControlPlane {
    pub fn new(resource_pages: usize, export_pages: usize) -> Self {
        Self {
            resource_pages: pages(resource_pages, |page, item| {
                ResourceRecord::new(
                    format!("Resource{page}x{item}"),
                    format!("physical-{page}-{item}"),
                    "AWS::SQS::Queue",
                )
            }),
            export_pages: pages(export_pages, |page, item| {
                ExportRecord::new(format!("export-{page}-{item}"), format!("value-{page}-{item}"))
            }),
            delay: Duration::ZERO,
            fail_exports: false,
            requests: Mutex::new(Vec::new()),
            in_flight: AtomicUsize::new(0),
            max_in_flight: AtomicUsize::new(0),
        }
    }

    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = delay;
        self
    }

    pub fn with_failing_exports(mut self) -> Self {
        self.fail_exports = true;
        self
    }

    pub fn requests(&self, operation: &str) -> Vec<Option<String>> {
        self.requests
            .lock()
            .unwrap()
            .iter()
            .filter(|(op, _)| *op == operation)
            .map(|(_, token)| token.clone())
            .collect()
    }

    pub fn max_in_flight(&self) -> usize {
        self.max_in_flight.load(Ordering::SeqCst)
    }

    async fn call(&self, operation: &'static str, token: Option<String>) {
        self.requests.lock().unwrap().push((operation, token));
        let current = self.in_flight.fetch_add(1, Ordering::SeqCst) + 1;
        self.max_in_flight.fetch_max(current, Ordering::SeqCst);
        if !self.delay.is_zero() {
            tokio::time::sleep(self.delay).await;
        }
        self.in_flight.fetch_sub(1, Ordering::SeqCst);
    }
}

fn pages<T>(count: usize, item: impl Fn(usize, usize) -> T) -> Vec<Page<T>> {
    (0..count)
        .map(|page| {
            let items = (0..2).map(|i| item(page, i)).collect();
            if page + 1 < count {
                Page::with_next(items, (page + 1).to_string())
            } else {
                Page::last(items)
            }
        })
        .collect()
}

fn page_at<T: Clone>(pages: &[Page<T>], token: Option<&str>) -> Page<T> {
    let index = token.map_or(0, |t| t.parse().unwrap());
    pages
        .get(index)
        .cloned()
        .unwrap_or_else(|| Page::last(Vec::new()))
}

#[async_trait]
impl ControlPlane for MockControlPlane {
    async fn describe_stack(&self, stack_name: &str) -> Result<StackDescription, InventoryError> {
        self.call("DescribeStacks", None).await;
        if stack_name != STACK_NAME {
            return Err(InventoryError::stack_not_found(stack_name));
        }
        Ok(StackDescription {
            identity: StackIdentity::new("stack-id", STACK_NAME, "eu-west-1", "123456789012"),
            outputs: vec![StackOutput::new("ServiceEndpoint", "https://api.example.com")],
        })
    }

    async fn list_stack_resources(
        &self,
        _stack_name: &str,
        next_token: Option<String>,
    ) -> Result<Page<ResourceRecord>, InventoryError> {
        let page = page_at(&self.resource_pages, next_token.as_deref());
        self.call("ListStackResources", next_token).await;
        Ok(page)
    }

    async fn list_exports(
        &self,
        next_token: Option<String>,
    ) -> Result<Page<ExportRecord>, InventoryError> {
        let page = page_at(&self.export_pages, next_token.as_deref());
        self.call("ListExports", next_token).await;
        if self.fail_exports {
            return Err(InventoryError::access_denied("ListExports", "not authorized"));
        }
        Ok(page)
    }
}

pub fn get_test_fixture_path(fixture_name: &str) -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR"))
        .join("tests")
        .join("fixtures")
        .join(fixture_name)
}
