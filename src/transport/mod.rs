use crate::error::AppResult;

pub mod http;

pub use http::HttpTransport;

/// Network collaborator that turns a resolved URL into raw response bytes
///
/// One invocation performs one GET; no retries. Non-success statuses are reported as
/// [`crate::error::AppError::Network`]. Timeouts are the implementation's concern.
#[cfg_attr(test, mockall::automock)]
#[async_trait::async_trait]
pub trait Transport: Send + Sync {
    async fn fetch_bytes(&self, url: &str) -> AppResult<Vec<u8>>;

    /// Transport name for logging and debugging
    fn name(&self) -> &'static str;
}
