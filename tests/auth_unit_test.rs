//! Unit tests for device credential parsing.
//!
//! Run with: cargo test --test auth_unit_test

use axum::http::{HeaderMap, HeaderValue};

use irrigo_api::auth::DeviceCreds;
use irrigo_api::error::AppError;

fn headers(auth: Option<&'static str>, device_id: Option<&'static str>) -> HeaderMap {
    let mut map = HeaderMap::new();
    if let Some(auth) = auth {
        map.insert("authorization", HeaderValue::from_static(auth));
    }
    if let Some(id) = device_id {
        map.insert("x-device-id", HeaderValue::from_static(id));
    }
    map
}

#[test]
fn parses_well_formed_headers() {
    let creds =
        DeviceCreds::from_headers(&headers(Some("Device secret-key-123"), Some("unit-42")))
            .unwrap();

    assert_eq!(creds.api_key, "secret-key-123");
    assert_eq!(creds.hardware_id, "unit-42");
}

#[test]
fn missing_authorization_is_unauthorized() {
    let err = DeviceCreds::from_headers(&headers(None, Some("unit-42"))).unwrap_err();
    assert!(matches!(err, AppError::Unauthorized(_)));
}

#[test]
fn wrong_scheme_is_unauthorized() {
    let err =
        DeviceCreds::from_headers(&headers(Some("Bearer secret"), Some("unit-42"))).unwrap_err();
    assert!(matches!(err, AppError::Unauthorized(_)));
}

#[test]
fn empty_key_is_unauthorized() {
    let err = DeviceCreds::from_headers(&headers(Some("Device "), Some("unit-42"))).unwrap_err();
    assert!(matches!(err, AppError::Unauthorized(_)));
}

#[test]
fn missing_device_id_is_bad_request() {
    let err =
        DeviceCreds::from_headers(&headers(Some("Device secret-key-123"), None)).unwrap_err();
    assert!(matches!(err, AppError::BadRequest(_)));
}
