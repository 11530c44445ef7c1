use moka::future::Cache;
use sea_orm::DatabaseConnection;
use std::sync::Arc;
use std::time::Duration;

use crate::config::Config;

/// Cached serialized response body.
#[derive(Clone)]
pub struct CachedResponse {
    pub data: Arc<Vec<u8>>,
}

/// Cache for read-mostly API responses (device config, owner statistics).
/// Key is request params, value is the serialized response.
/// Weighted by byte size to enforce memory limit.
pub type ResponseCache = Cache<String, CachedResponse>;

#[derive(Clone)]
pub struct AppState {
    pub db: DatabaseConnection,
    pub config: Arc<Config>,
    pub response_cache: ResponseCache,
}

impl AppState {
    pub fn new(db: DatabaseConnection, config: Config) -> Self {
        // Cache weighted by byte size, not entry count
        let cache: ResponseCache = Cache::builder()
            .weigher(|_key: &String, value: &CachedResponse| -> u32 {
                value.data.len().try_into().unwrap_or(u32::MAX)
            })
            .max_capacity(config.cache_max_bytes)
            .time_to_live(Duration::from_secs(config.cache_ttl_seconds))
            .build();

        Self {
            db,
            config: Arc::new(config),
            response_cache: cache,
        }
    }
}
