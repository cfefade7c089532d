//! Deserialization of response bodies into typed models.

use serde::de::DeserializeOwned;

use crate::error::ApiError;
use crate::http::RawResponse;

/// Decode a successful response body from JSON.
///
/// A body that does not match `T` is reported as a malformed response,
/// carrying the status of the otherwise successful exchange.
pub fn decode<T: DeserializeOwned>(response: &RawResponse) -> Result<T, ApiError> {
    serde_json::from_slice(&response.body).map_err(|e| {
        ApiError::malformed(response.status, format!("malformed response: {}", e))
    })
}
