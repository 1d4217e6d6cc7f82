//! Data sources binding endpoints to an observable [`crate::state::ResultState`].
//!
//! A [`SingleSource`] fetches one endpoint per query; a [`FanOutSource`] fetches a batch of
//! endpoints concurrently and merges the successful responses with a caller-supplied
//! combiner. Both tag each query with a generation so that a superseded query can never
//! overwrite the result of a newer one.

use serde::Deserialize;

pub mod combine;
pub mod fan_out;
pub mod single;

pub use fan_out::{Combiner, FanOutSource};
pub use single::SingleSource;

/// When a fan-out batch publishes its result
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CompletionPolicy {
    /// Wait for every request of the batch, then resolve once
    #[default]
    Barrier,
    /// Re-resolve with the combined partials after every successful arrival
    Progressive,
}
