use std::time::Duration;
use thiserror::Error;

/// Failures while building an inventory snapshot. All of them are fatal to
/// the resolution pass.
#[derive(Error, Debug)]
pub enum InventoryError {
    #[error("stack '{stack_name}' not found")]
    StackNotFound { stack_name: String },

    #[error("{operation} request failed: {message}")]
    RequestFailed { operation: String, message: String },

    #[error("access denied for {operation}: {message}")]
    AccessDenied { operation: String, message: String },

    #[error("malformed {operation} response: {message}")]
    MalformedResponse { operation: String, message: String },

    #[error("{operation} exceeded the limit of {max_pages} pages")]
    PageLimitExceeded { operation: String, max_pages: usize },

    #[error("inventory fetch did not complete within {}ms", .timeout.as_millis())]
    DeadlineExceeded { timeout: Duration },

    #[error("inventory fetch was cancelled")]
    Cancelled,
}

impl InventoryError {
    pub fn stack_not_found(stack_name: impl Into<String>) -> Self {
        Self::StackNotFound {
            stack_name: stack_name.into(),
        }
    }

    pub fn request_failed(operation: impl Into<String>, message: impl Into<String>) -> Self {
        Self::RequestFailed {
            operation: operation.into(),
            message: message.into(),
        }
    }

    pub fn access_denied(operation: impl Into<String>, message: impl Into<String>) -> Self {
        Self::AccessDenied {
            operation: operation.into(),
            message: message.into(),
        }
    }

    pub fn malformed_response(operation: impl Into<String>, message: impl Into<String>) -> Self {
        Self::MalformedResponse {
            operation: operation.into(),
            message: message.into(),
        }
    }

    pub fn page_limit_exceeded(operation: impl Into<String>, max_pages: usize) -> Self {
        Self::PageLimitExceeded {
            operation: operation.into(),
            max_pages,
        }
    }
}
