//! Inventory fetch.
//!
//! [`ControlPlane`] is the port to the cloud control-plane API. The
//! [`SnapshotFetcher`] issues describe-stack, list-stack-resources and
//! list-exports concurrently and walks each paginated listing with a bounded
//! loop that carries the continuation token.

use async_trait::async_trait;
use std::future::Future;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::watch;

use super::{ExportRecord, InventorySnapshot, ResourceRecord, StackDescription};
use crate::error::InventoryError;

pub const DEFAULT_MAX_PAGES: usize = 100;

pub const DESCRIBE_STACKS: &str = "DescribeStacks";
pub const LIST_STACK_RESOURCES: &str = "ListStackResources";
pub const LIST_EXPORTS: &str = "ListExports";

/// One page of a paginated listing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Page<T> {
    pub items: Vec<T>,
    pub next_token: Option<String>,
}

impl<T> Page<T> {
    pub fn last(items: Vec<T>) -> Self {
        Self {
            items,
            next_token: None,
        }
    }

    pub fn with_next(items: Vec<T>, next_token: impl Into<String>) -> Self {
        Self {
            items,
            next_token: Some(next_token.into()),
        }
    }
}

/// Read operations the snapshot depends on. All of them are idempotent.
#[async_trait]
pub trait ControlPlane: Send + Sync {
    async fn describe_stack(&self, stack_name: &str) -> Result<StackDescription, InventoryError>;

    async fn list_stack_resources(
        &self,
        stack_name: &str,
        next_token: Option<String>,
    ) -> Result<Page<ResourceRecord>, InventoryError>;

    /// Exports are account/region global, not scoped to a stack.
    async fn list_exports(
        &self,
        next_token: Option<String>,
    ) -> Result<Page<ExportRecord>, InventoryError>;
}

/// Cancels an in-flight fetch.
#[derive(Debug, Clone)]
pub struct CancellationToken {
    sender: Arc<watch::Sender<bool>>,
}

/// Observes a [`CancellationToken`].
#[derive(Debug, Clone)]
pub struct CancellationReceiver {
    receiver: watch::Receiver<bool>,
}

impl CancellationToken {
    #[allow(clippy::new_ret_no_self)]
    pub fn new() -> (Self, CancellationReceiver) {
        let (sender, receiver) = watch::channel(false);
        (
            Self {
                sender: Arc::new(sender),
            },
            CancellationReceiver { receiver },
        )
    }

    pub fn cancel(&self) {
        self.sender.send_replace(true);
    }
}

impl CancellationReceiver {
    pub fn is_cancelled(&self) -> bool {
        *self.receiver.borrow()
    }

    /// Completes once the token is cancelled. Never completes if the token is
    /// dropped without cancelling.
    pub async fn cancelled(&mut self) {
        if self.receiver.wait_for(|cancelled| *cancelled).await.is_err() {
            std::future::pending::<()>().await;
        }
    }
}

#[derive(Debug, Clone)]
pub struct SnapshotFetcher {
    max_pages: usize,
    timeout: Option<Duration>,
    cancellation: Option<CancellationReceiver>,
}

impl SnapshotFetcher {
    pub fn new() -> Self {
        Self {
            max_pages: DEFAULT_MAX_PAGES,
            timeout: None,
            cancellation: None,
        }
    }

    pub fn with_max_pages(mut self, max_pages: usize) -> Self {
        self.max_pages = max_pages;
        self
    }

    /// Deadline for the whole fetch, measured from the call to [`fetch`](Self::fetch).
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    pub fn with_cancellation(mut self, cancellation: CancellationReceiver) -> Self {
        self.cancellation = Some(cancellation);
        self
    }

    pub fn max_pages(&self) -> usize {
        self.max_pages
    }

    pub async fn fetch<C>(
        &self,
        plane: &C,
        stack_name: &str,
    ) -> Result<InventorySnapshot, InventoryError>
    where
        C: ControlPlane + ?Sized,
    {
        let fetch_all = async {
            let (description, resources, exports) = tokio::try_join!(
                self.guard(plane.describe_stack(stack_name)),
                self.paginate(LIST_STACK_RESOURCES, move |token| {
                    plane.list_stack_resources(stack_name, token)
                }),
                self.paginate(LIST_EXPORTS, move |token| plane.list_exports(token)),
            )?;

            validate_resources(&resources)?;
            validate_exports(&exports)?;

            tracing::info!(
                "Fetched inventory for stack {}: {} resource(s), {} export(s)",
                description.identity.stack_name,
                resources.len(),
                exports.len()
            );

            Ok::<_, InventoryError>(
                InventorySnapshot::builder(description.identity)
                    .with_resources(resources)
                    .with_exports(exports)
                    .with_outputs(description.outputs)
                    .build(),
            )
        };

        match self.timeout {
            Some(timeout) => tokio::time::timeout(timeout, fetch_all)
                .await
                .map_err(|_| InventoryError::DeadlineExceeded { timeout })?,
            None => fetch_all.await,
        }
    }

    async fn guard<T>(
        &self,
        request: impl Future<Output = Result<T, InventoryError>>,
    ) -> Result<T, InventoryError> {
        let Some(cancellation) = &self.cancellation else {
            return request.await;
        };
        if cancellation.is_cancelled() {
            return Err(InventoryError::Cancelled);
        }

        let mut cancellation = cancellation.clone();
        tokio::select! {
            biased;
            () = cancellation.cancelled() => Err(InventoryError::Cancelled),
            result = request => result,
        }
    }

    async fn paginate<T, F, Fut>(
        &self,
        operation: &str,
        mut fetch_page: F,
    ) -> Result<Vec<T>, InventoryError>
    where
        F: FnMut(Option<String>) -> Fut,
        Fut: Future<Output = Result<Page<T>, InventoryError>>,
    {
        let mut items = Vec::new();
        let mut next_token: Option<String> = None;

        for page_number in 1..=self.max_pages {
            let page = self.guard(fetch_page(next_token.take())).await?;
            tracing::debug!(
                "{operation}: page {page_number} returned {} item(s)",
                page.items.len()
            );
            items.extend(page.items);

            match page.next_token {
                Some(token) if !token.is_empty() => next_token = Some(token),
                _ => return Ok(items),
            }
        }

        Err(InventoryError::page_limit_exceeded(operation, self.max_pages))
    }
}

impl Default for SnapshotFetcher {
    fn default() -> Self {
        Self::new()
    }
}

fn validate_resources(resources: &[ResourceRecord]) -> Result<(), InventoryError> {
    match resources.iter().position(|r| r.logical_id.is_empty()) {
        Some(index) => Err(InventoryError::malformed_response(
            LIST_STACK_RESOURCES,
            format!("resource #{index} has an empty logical id"),
        )),
        None => Ok(()),
    }
}

fn validate_exports(exports: &[ExportRecord]) -> Result<(), InventoryError> {
    match exports.iter().position(|e| e.name.is_empty()) {
        Some(index) => Err(InventoryError::malformed_response(
            LIST_EXPORTS,
            format!("export #{index} has an empty name"),
        )),
        None => Ok(()),
    }
}
