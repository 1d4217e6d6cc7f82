use std::sync::{Arc, Mutex, MutexGuard};

use tokio::sync::mpsc;

/// Lifecycle of a data source's result
#[derive(Debug, Clone, PartialEq)]
pub enum ResultState<T> {
    /// No query issued yet
    Idle,
    /// A query is in flight
    Loading,
    Success(T),
    /// The most recent query failed; the cause is logged, not exposed
    Error,
}

impl<T> ResultState<T> {
    pub fn is_loading(&self) -> bool {
        matches!(self, ResultState::Loading)
    }

    pub fn is_terminal(&self) -> bool {
        matches!(self, ResultState::Success(_) | ResultState::Error)
    }

    pub fn success(&self) -> Option<&T> {
        match self {
            ResultState::Success(payload) => Some(payload),
            _ => None,
        }
    }

    fn label(&self) -> &'static str {
        match self {
            ResultState::Idle => "idle",
            ResultState::Loading => "loading",
            ResultState::Success(_) => "success",
            ResultState::Error => "error",
        }
    }
}

/// Identifies one request cycle of a [`StateCell`]
pub type Generation = u64;

struct Inner<T> {
    state: ResultState<T>,
    generation: Generation,
    observers: Vec<mpsc::UnboundedSender<ResultState<T>>>,
}

impl<T: Clone> Inner<T> {
    fn transition(&mut self, next: ResultState<T>) {
        self.state = next;
        // Closed receivers are dropped on the first failed send.
        let state = &self.state;
        self.observers.retain(|tx| tx.send(state.clone()).is_ok());
    }
}

/// Observable holder of a source's [`ResultState`]
///
/// All transitions go through one lock, which is the serialized context every state write and
/// observer notification happens on. Each transition is delivered to every live subscriber at
/// the moment it is applied; subscribers get their own unbounded queue, so nothing is
/// coalesced.
///
/// Writes are guarded by generation: [`StateCell::begin`] opens a new cycle and
/// [`StateCell::commit`] only applies results carrying the current generation.
pub struct StateCell<T> {
    inner: Arc<Mutex<Inner<T>>>,
}

impl<T> Clone for StateCell<T> {
    fn clone(&self) -> Self {
        Self {
            inner: self.inner.clone(),
        }
    }
}

impl<T: Clone + Send + 'static> Default for StateCell<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T: Clone + Send + 'static> StateCell<T> {
    pub fn new() -> Self {
        Self {
            inner: Arc::new(Mutex::new(Inner {
                state: ResultState::Idle,
                generation: 0,
                observers: Vec::new(),
            })),
        }
    }

    /// Snapshot of the current state
    pub fn get(&self) -> ResultState<T> {
        self.lock().state.clone()
    }

    pub fn generation(&self) -> Generation {
        self.lock().generation
    }

    /// Registers an observer; it receives every transition applied from now on
    pub fn subscribe(&self) -> mpsc::UnboundedReceiver<ResultState<T>> {
        let (tx, rx) = mpsc::unbounded_channel();
        self.lock().observers.push(tx);
        rx
    }

    /// Starts a new request cycle and moves to `Loading`
    ///
    /// Results of every earlier cycle are rejected from here on.
    pub fn begin(&self) -> Generation {
        let mut inner = self.lock();
        inner.generation += 1;
        inner.transition(ResultState::Loading);
        inner.generation
    }

    /// Applies `next` if `generation` is still current and the move is forward
    ///
    /// Allowed moves are `Loading -> Success | Error`, plus `Success -> Success` when
    /// `refine` is set (progressive fan-out). Returns whether the state changed.
    pub fn commit(&self, generation: Generation, next: ResultState<T>, refine: bool) -> bool {
        let mut inner = self.lock();

        if inner.generation != generation {
            tracing::debug!(
                stale = generation,
                current = inner.generation,
                "Discarding result of superseded request"
            );
            return false;
        }

        let forward = match (&inner.state, &next) {
            (ResultState::Loading, ResultState::Success(_) | ResultState::Error) => true,
            (ResultState::Success(_), ResultState::Success(_)) => refine,
            _ => false,
        };

        if !forward {
            tracing::debug!(
                from = inner.state.label(),
                to = next.label(),
                "Rejected backward state transition"
            );
            return false;
        }

        inner.transition(next);
        true
    }

    fn lock(&self) -> MutexGuard<'_, Inner<T>> {
        self.inner
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}
