#![allow(dead_code)]

use std::sync::{Arc, Mutex};

use primetime::{
    cache::ResponseCache, transport::Transport, AppError, AppResult, FetchClient,
};
use serde_json::json;
use tokio::sync::Semaphore;

pub const BASE_URL: &str = "https://api.test/3";

/// Holds a scripted response back until opened
#[derive(Clone)]
pub struct Gate(Arc<Semaphore>);

impl Gate {
    fn new() -> Self {
        Self(Arc::new(Semaphore::new(0)))
    }

    /// Releases every current and future waiter
    pub fn open(&self) {
        self.0.close();
    }
}

struct Route {
    pattern: String,
    response: Result<Vec<u8>, String>,
    gate: Option<Gate>,
}

/// Transport answering from a fixed script; the first route whose pattern is contained in the
/// URL wins, unknown URLs fail
#[derive(Default)]
pub struct ScriptedTransport {
    routes: Vec<Route>,
    calls: Mutex<Vec<String>>,
}

impl ScriptedTransport {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn route(mut self, pattern: &str, body: Vec<u8>) -> Self {
        self.routes.push(Route {
            pattern: pattern.to_string(),
            response: Ok(body),
            gate: None,
        });
        self
    }

    pub fn failing(mut self, pattern: &str) -> Self {
        self.routes.push(Route {
            pattern: pattern.to_string(),
            response: Err(format!("{} unavailable", pattern)),
            gate: None,
        });
        self
    }

    /// Like [`ScriptedTransport::route`], but the response waits for the returned gate
    pub fn gated(mut self, pattern: &str, body: Vec<u8>) -> (Self, Gate) {
        let gate = Gate::new();
        self.routes.push(Route {
            pattern: pattern.to_string(),
            response: Ok(body),
            gate: Some(gate.clone()),
        });
        (self, gate)
    }

    pub fn calls(&self) -> Vec<String> {
        self.calls.lock().unwrap().clone()
    }

    pub fn call_count(&self, pattern: &str) -> usize {
        self.calls().iter().filter(|url| url.contains(pattern)).count()
    }
}

#[async_trait::async_trait]
impl Transport for ScriptedTransport {
    async fn fetch_bytes(&self, url: &str) -> AppResult<Vec<u8>> {
        self.calls.lock().unwrap().push(url.to_string());

        let Some(route) = self.routes.iter().find(|r| url.contains(&r.pattern)) else {
            return Err(AppError::Network(format!("no route for {}", url)));
        };

        if let Some(gate) = &route.gate {
            // Resolves with an error once the gate is closed, i.e. opened.
            let _ = gate.0.acquire().await;
        }

        route.response.clone().map_err(AppError::Network)
    }

    fn name(&self) -> &'static str {
        "scripted"
    }
}

pub fn client_with(transport: Arc<ScriptedTransport>, cache: Arc<ResponseCache>) -> FetchClient {
    FetchClient::new(transport, cache, BASE_URL, "test_key", "en-US").unwrap()
}

pub fn client(transport: Arc<ScriptedTransport>) -> FetchClient {
    client_with(transport, Arc::new(ResponseCache::new()))
}

/// A movies page payload from `(id, title, popularity)` triples
pub fn movies_page(movies: &[(u64, &str, f32)]) -> Vec<u8> {
    let results: Vec<_> = movies
        .iter()
        .map(|(id, title, popularity)| {
            json!({
                "id": id,
                "title": title,
                "poster_path": format!("/{}.jpg", id),
                "backdrop_path": null,
                "overview": format!("About {}", title),
                "release_date": "2020-02-02",
                "genre_ids": [18],
                "popularity": popularity,
                "vote_average": 7.5,
                "vote_count": 1200
            })
        })
        .collect();

    serde_json::to_vec(&json!({ "page": 1, "results": results })).unwrap()
}
