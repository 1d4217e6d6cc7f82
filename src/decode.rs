//! JSON decoding of response payloads into typed records.
//!
//! Wire keys are snake_case and record fields are declared snake_case, so the field-name
//! mapping is the identity over each declared schema. Required fields that are absent or
//! mistyped fail the decode; `Option` fields marked `#[serde(default)]` may be absent.

use serde::{de::DeserializeOwned, Serialize};

use crate::error::{AppError, AppResult};

pub fn decode<T: DeserializeOwned>(bytes: &[u8]) -> AppResult<T> {
    serde_json::from_slice(bytes).map_err(|e| AppError::Decode(e.to_string()))
}

pub fn encode<T: Serialize>(value: &T) -> AppResult<Vec<u8>> {
    serde_json::to_vec(value).map_err(|e| AppError::Internal(format!("Encode error: {}", e)))
}
