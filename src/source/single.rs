use serde::de::DeserializeOwned;
use tokio::{sync::mpsc, task::JoinHandle};

use crate::{
    client::FetchClient,
    models::Endpoint,
    state::{ResultState, StateCell},
};

/// Binds one endpoint at a time to an observable result
///
/// Starts `Idle` unless built with [`SingleSource::with_endpoint`], which queries right away.
/// Only the most recent query's outcome is ever published.
pub struct SingleSource<T> {
    client: FetchClient,
    state: StateCell<T>,
}

impl<T> SingleSource<T>
where
    T: DeserializeOwned + Clone + Send + 'static,
{
    pub fn new(client: FetchClient) -> Self {
        Self {
            client,
            state: StateCell::new(),
        }
    }

    /// Creates the source and immediately queries `endpoint`; requires a Tokio runtime
    pub fn with_endpoint(client: FetchClient, endpoint: Endpoint) -> Self {
        let source = Self::new(client);
        source.query(endpoint);
        source
    }

    /// Moves to `Loading` and fetches `endpoint` in the background
    ///
    /// The returned handle resolves once the result has been applied, or discarded because a
    /// newer query superseded it. Dropping the handle does not cancel the fetch.
    pub fn query(&self, endpoint: Endpoint) -> JoinHandle<()> {
        let generation = self.state.begin();
        let client = self.client.clone();
        let state = self.state.clone();

        tracing::debug!(endpoint = %endpoint, generation, "Querying endpoint");

        tokio::spawn(async move {
            let next = match client.fetch::<T>(&endpoint).await {
                Ok(payload) => ResultState::Success(payload),
                Err(e) => {
                    tracing::warn!(endpoint = %endpoint, error = %e, "Query failed");
                    ResultState::Error
                }
            };
            state.commit(generation, next, false);
        })
    }

    pub fn result(&self) -> ResultState<T> {
        self.state.get()
    }

    pub fn subscribe(&self) -> mpsc::UnboundedReceiver<ResultState<T>> {
        self.state.subscribe()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        cache::ResponseCache,
        error::AppError,
        models::GenresResponse,
        transport::MockTransport,
    };
    use std::sync::Arc;

    fn client(transport: MockTransport) -> FetchClient {
        FetchClient::new(
            Arc::new(transport),
            Arc::new(ResponseCache::new()),
            "https://api.test/3",
            "key",
            "en-US",
        )
        .unwrap()
    }

    #[tokio::test]
    async fn test_new_source_is_idle() {
        let mut transport = MockTransport::new();
        transport.expect_fetch_bytes().never();
        let source: SingleSource<GenresResponse> = SingleSource::new(client(transport));
        assert_eq!(source.result(), ResultState::Idle);
    }

    #[tokio::test]
    async fn test_query_success() {
        let mut transport = MockTransport::new();
        transport
            .expect_fetch_bytes()
            .returning(|_| Ok(br#"{ "genres": [{ "id": 12, "name": "Adventure" }] }"#.to_vec()));
        let source: SingleSource<GenresResponse> = SingleSource::new(client(transport));
        let mut rx = source.subscribe();

        source.query(Endpoint::genres()).await.unwrap();

        assert_eq!(rx.recv().await.unwrap(), ResultState::Loading);
        let success = rx.recv().await.unwrap();
        assert_eq!(success.success().unwrap().genres[0].name, "Adventure");
        assert_eq!(source.result(), success);
    }

    #[tokio::test]
    async fn test_query_failure_is_error_state() {
        let mut transport = MockTransport::new();
        transport.expect_name().return_const("mock");
        transport
            .expect_fetch_bytes()
            .returning(|_| Err(AppError::Network("offline".to_string())));
        let source: SingleSource<GenresResponse> =
            SingleSource::with_endpoint(client(transport), Endpoint::genres());

        assert!(source.result().is_loading());
        let mut rx = source.subscribe();

        assert_eq!(rx.recv().await.unwrap(), ResultState::Error);
        assert_eq!(source.result(), ResultState::Error);
    }
}
