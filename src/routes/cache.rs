//! Response caching for read-mostly endpoints.
//!
//! Device config fetches and owner statistics are requested far more often
//! than they change, so both are served through the byte-weighted TTL cache
//! in [`AppState`]. Entries whose underlying row is mutated through a known
//! write path (registration updates) are invalidated explicitly; everything
//! else expires via TTL.

use axum::{
    http::{HeaderValue, header},
    response::Response,
};
use serde::Serialize;
use std::sync::Arc;

use crate::common::{AppState, CachedResponse};
use crate::error::{AppError, AppResult};

/// Build a cache key from a prefix and components.
///
/// Components are joined with `:` separator. Empty components are included
/// to ensure different queries produce different keys.
pub fn cache_key(prefix: &str, components: &[&str]) -> String {
    let mut key = prefix.to_string();
    for c in components {
        key.push(':');
        key.push_str(c);
    }
    key
}

/// Try to get a cached response body.
pub async fn get_cached(state: &AppState, cache_key: &str) -> Option<Arc<Vec<u8>>> {
    let cached = state.response_cache.get(cache_key).await?;
    tracing::debug!(cache_key = %cache_key, "cache_hit");
    Some(cached.data.clone())
}

/// Build a JSON response with X-Cache header indicating hit/miss status.
pub fn json_response(data: Vec<u8>, cache_hit: bool) -> AppResult<Response> {
    let cache_header = if cache_hit { "HIT" } else { "MISS" };
    Response::builder()
        .header(
            header::CONTENT_TYPE,
            HeaderValue::from_static("application/json"),
        )
        .header("X-Cache", HeaderValue::from_static(cache_header))
        .body(axum::body::Body::from(data))
        .map_err(|e| AppError::Internal(e.to_string()))
}

/// Serialize a response, store it in cache, and return it.
pub async fn cache_and_respond<T: Serialize>(
    state: &AppState,
    cache_key: String,
    response: &T,
) -> AppResult<Response> {
    let json_bytes =
        serde_json::to_vec(response).map_err(|e| AppError::Internal(e.to_string()))?;

    let size = json_bytes.len();
    state
        .response_cache
        .insert(
            cache_key.clone(),
            CachedResponse {
                data: Arc::new(json_bytes.clone()),
            },
        )
        .await;
    tracing::debug!(cache_key = %cache_key, size_bytes = size, "cache_stored");

    json_response(json_bytes, false)
}

/// Manually invalidate a cache entry after a known write.
pub async fn invalidate(state: &AppState, cache_key: &str) {
    state.response_cache.invalidate(cache_key).await;
    tracing::debug!(cache_key = %cache_key, "cache_invalidated");
}
