use std::sync::Arc;

use serde::de::DeserializeOwned;
use url::Url;

use crate::{
    cache::{RequestKey, ResponseCache},
    config::Config,
    decode::decode,
    error::{AppError, AppResult},
    models::Endpoint,
    transport::Transport,
};

/// Resolves endpoints, consults the shared response cache, falls back to the transport and
/// decodes payloads into typed records
///
/// Cloning is cheap; clones share the transport and the cache.
#[derive(Clone)]
pub struct FetchClient {
    transport: Arc<dyn Transport>,
    cache: Arc<ResponseCache>,
    base_url: Url,
    api_key: String,
    language: String,
}

impl FetchClient {
    pub fn new(
        transport: Arc<dyn Transport>,
        cache: Arc<ResponseCache>,
        base_url: &str,
        api_key: impl Into<String>,
        language: impl Into<String>,
    ) -> AppResult<Self> {
        let base_url = Url::parse(base_url)
            .map_err(|e| AppError::Config(format!("Invalid API base URL {}: {}", base_url, e)))?;

        if base_url.cannot_be_a_base() {
            return Err(AppError::Config(format!(
                "API base URL {} cannot carry a path",
                base_url
            )));
        }

        Ok(Self {
            transport,
            cache,
            base_url,
            api_key: api_key.into(),
            language: language.into(),
        })
    }

    /// Builds a client with a fresh cache sized from `config`
    pub fn from_config(config: &Config, transport: Arc<dyn Transport>) -> AppResult<Self> {
        let cache = Arc::new(ResponseCache::with_ttl(config.cache_ttl()));
        Self::new(
            transport,
            cache,
            &config.tmdb_api_url,
            config.tmdb_api_key.clone(),
            config.tmdb_language.clone(),
        )
    }

    pub fn cache(&self) -> &Arc<ResponseCache> {
        &self.cache
    }

    /// Resolves `endpoint` to its canonical request key
    ///
    /// The fixed parameters (`api_key`, `language`) come first, followed by the endpoint's
    /// own parameters in declaration order.
    pub fn resolve(&self, endpoint: &Endpoint) -> AppResult<RequestKey> {
        let mut url = self.base_url.clone();

        url.path_segments_mut()
            .map_err(|_| AppError::Internal(format!("Base URL {} has no path", self.base_url)))?
            .pop_if_empty()
            .extend(endpoint.path().split('/').filter(|s| !s.is_empty()));

        {
            let mut query = url.query_pairs_mut();
            query.clear();
            query.append_pair("api_key", &self.api_key);
            query.append_pair("language", &self.language);
            for (name, value) in endpoint.query() {
                query.append_pair(name, value);
            }
        }

        Ok(RequestKey::from(url))
    }

    /// Fetches `endpoint` and decodes it as `T`
    ///
    /// A cached payload is served when it is still valid and decodes as `T`. A cached payload
    /// that fails to decode is ignored and the request goes to the transport. Only payloads
    /// that decode successfully are stored back into the cache. No retries.
    pub async fn fetch<T: DeserializeOwned>(&self, endpoint: &Endpoint) -> AppResult<T> {
        let key = self.resolve(endpoint)?;

        if let Some(cached) = self.cache.get(&key) {
            match decode::<T>(&cached) {
                Ok(payload) => {
                    tracing::debug!(endpoint = %endpoint, "Cache hit");
                    return Ok(payload);
                }
                Err(e) => {
                    tracing::warn!(
                        endpoint = %endpoint,
                        error = %e,
                        "Cached payload failed to decode, refetching"
                    );
                }
            }
        } else {
            tracing::debug!(endpoint = %endpoint, "Cache miss");
        }

        let bytes = self
            .transport
            .fetch_bytes(key.as_str())
            .await
            .map_err(|e| {
                tracing::warn!(
                    endpoint = %endpoint,
                    transport = self.transport.name(),
                    error = %e,
                    "Transport failed"
                );
                e
            })?;

        let payload = decode::<T>(&bytes).map_err(|e| {
            tracing::warn!(endpoint = %endpoint, error = %e, "Response failed to decode");
            e
        })?;

        self.cache.put(key, bytes);

        Ok(payload)
    }
}
