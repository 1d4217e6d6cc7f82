use std::{
    panic::{self, AssertUnwindSafe},
    sync::{Arc, Mutex},
};

use serde::de::DeserializeOwned;
use tokio::{
    sync::mpsc,
    task::{JoinHandle, JoinSet},
};

use crate::{
    client::FetchClient,
    error::AppError,
    models::Endpoint,
    source::CompletionPolicy,
    state::{Generation, ResultState, StateCell},
};

/// Merges the partial responses of one batch into the published result
///
/// Arrival order of partials is not meaningful; combiners that need an order must sort on a
/// stable key themselves. A combiner that panics resolves the cycle to `Error`.
pub type Combiner<R, T> = Arc<dyn Fn(Vec<R>) -> T + Send + Sync>;

/// Fetches a batch of endpoints concurrently and publishes their combined result
///
/// A failed request contributes nothing and does not abort the batch. A batch that completes
/// without a single successful response resolves to `Error`, never to an empty success.
pub struct FanOutSource<R, T> {
    client: FetchClient,
    endpoints: Mutex<Vec<Endpoint>>,
    combine: Combiner<R, T>,
    policy: CompletionPolicy,
    state: StateCell<T>,
}

impl<R, T> FanOutSource<R, T>
where
    R: DeserializeOwned + Clone + Send + 'static,
    T: Clone + Send + 'static,
{
    /// Creates an `Idle` source over `endpoints`
    pub fn new<F>(client: FetchClient, endpoints: Vec<Endpoint>, combine: F) -> Self
    where
        F: Fn(Vec<R>) -> T + Send + Sync + 'static,
    {
        Self {
            client,
            endpoints: Mutex::new(endpoints),
            combine: Arc::new(combine),
            policy: CompletionPolicy::default(),
            state: StateCell::new(),
        }
    }

    /// Creates the source and immediately queries its batch; requires a Tokio runtime
    pub fn start<F>(client: FetchClient, endpoints: Vec<Endpoint>, combine: F) -> Self
    where
        F: Fn(Vec<R>) -> T + Send + Sync + 'static,
    {
        let source = Self::new(client, endpoints, combine);
        source.query();
        source
    }

    pub fn with_policy(mut self, policy: CompletionPolicy) -> Self {
        self.policy = policy;
        self
    }

    pub fn policy(&self) -> CompletionPolicy {
        self.policy
    }

    /// Re-issues the current batch
    ///
    /// Moves to `Loading` and starts a new generation; every request of an earlier batch that
    /// is still in flight is discarded when it lands. The returned handle resolves once the
    /// batch has completed.
    pub fn query(&self) -> JoinHandle<()> {
        let endpoints = self
            .endpoints
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .clone();
        self.dispatch(endpoints)
    }

    /// Replaces the batch with `endpoints` and queries it
    pub fn query_with(&self, endpoints: Vec<Endpoint>) -> JoinHandle<()> {
        *self
            .endpoints
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner()) = endpoints.clone();
        self.dispatch(endpoints)
    }

    pub fn result(&self) -> ResultState<T> {
        self.state.get()
    }

    pub fn subscribe(&self) -> mpsc::UnboundedReceiver<ResultState<T>> {
        self.state.subscribe()
    }

    fn dispatch(&self, endpoints: Vec<Endpoint>) -> JoinHandle<()> {
        let generation = self.state.begin();

        tracing::debug!(
            generation,
            endpoints = endpoints.len(),
            policy = ?self.policy,
            "Dispatching fan-out batch"
        );

        tokio::spawn(run_batch(
            self.client.clone(),
            endpoints,
            self.combine.clone(),
            self.policy,
            self.state.clone(),
            generation,
        ))
    }
}

async fn run_batch<R, T>(
    client: FetchClient,
    endpoints: Vec<Endpoint>,
    combine: Combiner<R, T>,
    policy: CompletionPolicy,
    state: StateCell<T>,
    generation: Generation,
) where
    R: DeserializeOwned + Clone + Send + 'static,
    T: Clone + Send + 'static,
{
    let attempted = endpoints.len();
    let mut tasks = JoinSet::new();

    for endpoint in endpoints {
        let client = client.clone();
        tasks.spawn(async move {
            let result = client.fetch::<R>(&endpoint).await;
            (endpoint, result)
        });
    }

    let mut partials: Vec<R> = Vec::with_capacity(attempted);
    let mut failures = 0;

    while let Some(joined) = tasks.join_next().await {
        match joined {
            Ok((_, Ok(record))) => {
                partials.push(record);
                if policy == CompletionPolicy::Progressive {
                    let Some(combined) = combine_partials(&combine, partials.clone(), generation)
                    else {
                        state.commit(generation, ResultState::Error, false);
                        return;
                    };
                    state.commit(generation, ResultState::Success(combined), true);
                }
            }
            Ok((endpoint, Err(e))) => {
                tracing::warn!(endpoint = %endpoint, error = %e, "Fan-out request failed");
                failures += 1;
            }
            Err(e) => {
                tracing::error!(error = %e, "Task join error");
                failures += 1;
            }
        }
    }

    if failures > 0 {
        tracing::warn!(
            success_count = partials.len(),
            error_count = failures,
            "Partial fan-out failure"
        );
    }

    if partials.is_empty() {
        let e = AppError::Aggregate { attempted };
        tracing::warn!(generation, error = %e, "Fan-out batch failed");
        state.commit(generation, ResultState::Error, false);
        return;
    }

    tracing::info!(
        generation,
        fetched = partials.len(),
        attempted,
        "Fan-out batch completed"
    );

    // Progressive batches already published the full set with their last arrival.
    if policy == CompletionPolicy::Barrier {
        let next = match combine_partials(&combine, partials, generation) {
            Some(combined) => ResultState::Success(combined),
            None => ResultState::Error,
        };
        state.commit(generation, next, false);
    }
}

/// Runs the combiner, turning a panic into `None` so the cycle still resolves
fn combine_partials<R, T>(
    combine: &Combiner<R, T>,
    partials: Vec<R>,
    generation: Generation,
) -> Option<T> {
    match panic::catch_unwind(AssertUnwindSafe(|| (**combine)(partials))) {
        Ok(combined) => Some(combined),
        Err(_) => {
            let e = AppError::Internal("combiner panicked".to_string());
            tracing::error!(generation, error = %e, "Fan-out combine failed");
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{cache::ResponseCache, models::GenresResponse, transport::MockTransport};

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

    fn genre_names(responses: Vec<GenresResponse>) -> Vec<String> {
        let mut names: Vec<String> = responses
            .into_iter()
            .flat_map(|r| r.genres.into_iter().map(|g| g.name))
            .collect();
        names.sort();
        names
    }

    fn genres_transport() -> MockTransport {
        let mut transport = MockTransport::new();
        transport.expect_name().return_const("mock");
        transport.expect_fetch_bytes().returning(|url| {
            if url.contains("page=2") {
                Err(AppError::Network("timeout".to_string()))
            } else if url.contains("page=1") {
                Ok(br#"{ "genres": [{ "id": 1, "name": "Drama" }] }"#.to_vec())
            } else {
                Ok(br#"{ "genres": [{ "id": 2, "name": "Comedy" }] }"#.to_vec())
            }
        });
        transport
    }

    fn page(n: u32) -> Endpoint {
        Endpoint::genres().with_query("page", n)
    }

    #[tokio::test]
    async fn test_new_source_is_idle() {
        let source: FanOutSource<GenresResponse, Vec<String>> =
            FanOutSource::new(client(MockTransport::new()), vec![page(1)], genre_names);
        assert_eq!(source.result(), ResultState::Idle);
        assert_eq!(source.policy(), CompletionPolicy::Barrier);
    }

    #[tokio::test]
    async fn test_barrier_combines_successes() {
        let source = FanOutSource::new(
            client(genres_transport()),
            vec![page(1), page(2), page(3)],
            genre_names,
        );
        let mut rx = source.subscribe();

        source.query().await.unwrap();

        assert_eq!(rx.recv().await.unwrap(), ResultState::Loading);
        assert_eq!(
            rx.recv().await.unwrap(),
            ResultState::Success(vec!["Comedy".to_string(), "Drama".to_string()])
        );
        assert!(rx.try_recv().is_err());
    }

    #[tokio::test]
    async fn test_all_failures_resolve_to_error() {
        let source =
            FanOutSource::new(client(genres_transport()), vec![page(2), page(2)], genre_names);

        source.query().await.unwrap();

        assert_eq!(source.result(), ResultState::Error);
    }

    #[tokio::test]
    async fn test_empty_batch_resolves_to_error() {
        let source = FanOutSource::new(client(MockTransport::new()), Vec::new(), genre_names);

        source.query().await.unwrap();

        assert_eq!(source.result(), ResultState::Error);
    }

    #[tokio::test]
    async fn test_progressive_refines_result() {
        let source =
            FanOutSource::new(client(genres_transport()), vec![page(1), page(3)], genre_names)
                .with_policy(CompletionPolicy::Progressive);
        let mut rx = source.subscribe();

        source.query().await.unwrap();

        assert_eq!(rx.recv().await.unwrap(), ResultState::Loading);
        let first = rx.recv().await.unwrap();
        assert_eq!(first.success().map(Vec::len), Some(1));
        assert_eq!(
            rx.recv().await.unwrap(),
            ResultState::Success(vec!["Comedy".to_string(), "Drama".to_string()])
        );
        assert!(rx.try_recv().is_err());
    }

    #[tokio::test]
    async fn test_query_with_replaces_batch() {
        let source = FanOutSource::new(client(genres_transport()), vec![page(2)], genre_names);

        source.query().await.unwrap();
        assert_eq!(source.result(), ResultState::Error);

        source.query_with(vec![page(1)]).await.unwrap();
        assert_eq!(source.result(), ResultState::Success(vec!["Drama".to_string()]));

        source.query().await.unwrap();
        assert_eq!(source.result(), ResultState::Success(vec!["Drama".to_string()]));
    }

    #[tokio::test]
    async fn test_panicking_combiner_resolves_to_error() {
        for policy in [CompletionPolicy::Barrier, CompletionPolicy::Progressive] {
            let source = FanOutSource::new(
                client(genres_transport()),
                vec![page(1)],
                |_: Vec<GenresResponse>| -> Vec<String> { panic!("combiner bug") },
            )
            .with_policy(policy);

            tokio_test::assert_ok!(source.query().await);

            assert_eq!(source.result(), ResultState::Error);
        }
    }
}
