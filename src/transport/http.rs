use std::time::Duration;

use reqwest::Client as HttpClient;

use crate::{
    error::{AppError, AppResult},
    transport::Transport,
};

const REQUEST_TIMEOUT: Duration = Duration::from_secs(15);

/// [`Transport`] backed by a shared `reqwest` client
#[derive(Clone)]
pub struct HttpTransport {
    http_client: HttpClient,
}

impl HttpTransport {
    pub fn new() -> AppResult<Self> {
        let http_client = HttpClient::builder().timeout(REQUEST_TIMEOUT).build()?;
        Ok(Self { http_client })
    }

    pub fn with_client(http_client: HttpClient) -> Self {
        Self { http_client }
    }
}

#[async_trait::async_trait]
impl Transport for HttpTransport {
    async fn fetch_bytes(&self, url: &str) -> AppResult<Vec<u8>> {
        // Request URLs carry the API key; keep it out of error messages and logs.
        let response = self
            .http_client
            .get(url)
            .send()
            .await
            .map_err(|e| AppError::from(e.without_url()))?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            tracing::warn!(status = %status, body = %body, "Upstream request failed");
            return Err(AppError::Network(format!(
                "API returned status {}: {}",
                status, body
            )));
        }

        let bytes = response
            .bytes()
            .await
            .map_err(|e| AppError::from(e.without_url()))?;
        Ok(bytes.to_vec())
    }

    fn name(&self) -> &'static str {
        "http"
    }
}
