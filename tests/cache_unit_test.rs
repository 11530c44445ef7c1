//! Unit tests for cache module.
//!
//! Run with: cargo test --test cache_unit_test

use irrigo_api::routes::cache;

#[test]
fn cache_key_builds_correctly() {
    // Basic key building
    assert_eq!(cache::cache_key("config", &[]), "config");
    assert_eq!(
        cache::cache_key("stats", &["ABC123", "json"]),
        "stats:ABC123:json"
    );

    // Empty components preserved (ensures query uniqueness)
    assert_ne!(
        cache::cache_key("stats", &["ABC123", "", "json"]),
        cache::cache_key("stats", &["ABC123", "json"])
    );
}
