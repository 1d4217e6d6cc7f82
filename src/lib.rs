pub mod cache;
pub mod client;
pub mod config;
pub mod decode;
pub mod error;
pub mod models;
pub mod source;
pub mod state;
pub mod store;
pub mod transport;

pub use client::FetchClient;
pub use error::{AppError, AppResult};
pub use state::ResultState;
