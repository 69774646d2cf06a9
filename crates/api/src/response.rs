//! Response envelopes.
//!
//! Successful bodies are wrapped as `{ "data": ... }`; errors are rendered by
//! [`crate::error::AppError`] as `{ "error", "code" }`.

use axum::Json;
use serde::Serialize;

/// `{ "data": T }`
#[derive(Debug, Serialize)]
pub struct DataResponse<T: Serialize> {
    pub data: T,
}

/// Wrap `value` in the data envelope.
pub fn data<T: Serialize>(value: T) -> Json<DataResponse<T>> {
    Json(DataResponse { data: value })
}

/// Body of the count endpoints.
#[derive(Debug, Serialize)]
pub struct CountResponse {
    pub count: i64,
}
