use axum::{
    extract::{Request, State},
    middleware::Next,
    response::{IntoResponse, Response},
};
use std::sync::Arc;

use crate::api::ApiError;

pub const API_KEY_HEADER: &str = "x-api-key";

/// Pre-shared key every protected route expects.
#[derive(Clone)]
pub struct ApiKey(Arc<str>);

impl ApiKey {
    pub fn new(key: &str) -> Self {
        Self(Arc::from(key))
    }

    /// Constant-time for equal-length input.
    fn matches(&self, candidate: &[u8]) -> bool {
        let expected = self.0.as_bytes();
        if expected.len() != candidate.len() {
            return false;
        }
        expected.iter().zip(candidate).fold(0u8, |acc, (x, y)| acc | (x ^ y)) == 0
    }
}

/// Rejects requests without a valid `x-api-key` header: 401 when absent, 403 when wrong.
pub async fn require_api_key(State(key): State<ApiKey>, request: Request, next: Next) -> Response {
    let Some(provided) = request.headers().get(API_KEY_HEADER) else {
        return ApiError::MissingApiKey.into_response();
    };
    if provided.is_empty() {
        return ApiError::MissingApiKey.into_response();
    }
    if !key.matches(provided.as_bytes()) {
        tracing::warn!(path = %request.uri().path(), "rejected request with invalid API key");
        return ApiError::InvalidApiKey.into_response();
    }

    next.run(request).await
}
