//! Request authentication.
//!
//! Two trust boundaries, matching the two kinds of callers:
//!
//! - **Devices** authenticate with `Authorization: Device {apiKey}` plus an
//!   `X-Device-ID` header; the pair must match a stored device exactly.
//! - **Users** (the dashboard) authenticate with an `X-Session-Token` header
//!   issued by the account system.
//!
//! Handlers take [`AuthedDevice`] / [`AuthedUser`] extractors so the lookup
//! happens in one place.

use axum::extract::FromRequestParts;
use axum::http::{HeaderMap, request::Parts};
use chrono::Utc;
use sea_orm::{ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter};

use crate::common::AppState;
use crate::entity::{devices, sessions, users};
use crate::error::{AppError, AppResult};

const DEVICE_SCHEME: &str = "Device ";

/// Credentials presented by a physical device.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DeviceCreds {
    pub hardware_id: String,
    pub api_key: String,
}

impl DeviceCreds {
    /// Parse device credentials out of request headers.
    ///
    /// # Errors
    ///
    /// 401 for a missing or malformed `Authorization` header, 400 for a
    /// missing `X-Device-ID` header.
    pub fn from_headers(headers: &HeaderMap) -> AppResult<Self> {
        let auth = headers
            .get("authorization")
            .and_then(|v| v.to_str().ok())
            .ok_or_else(|| AppError::Unauthorized("Invalid authorization header".to_string()))?;

        let api_key = auth
            .strip_prefix(DEVICE_SCHEME)
            .filter(|k| !k.is_empty())
            .ok_or_else(|| AppError::Unauthorized("Invalid authorization header".to_string()))?;

        let hardware_id = headers
            .get("x-device-id")
            .and_then(|v| v.to_str().ok())
            .filter(|id| !id.is_empty())
            .ok_or_else(|| AppError::BadRequest("X-Device-ID header required".to_string()))?;

        Ok(Self {
            hardware_id: hardware_id.to_string(),
            api_key: api_key.to_string(),
        })
    }
}

/// Look up the device whose hardware id and API key both match.
///
/// Pure lookup, no side effects.
///
/// # Errors
///
/// 401 if no stored device matches the pair exactly.
pub async fn authenticate_device(
    db: &DatabaseConnection,
    creds: &DeviceCreds,
) -> AppResult<devices::Model> {
    devices::Entity::find()
        .filter(devices::Column::HardwareId.eq(&creds.hardware_id))
        .filter(devices::Column::ApiKey.eq(&creds.api_key))
        .one(db)
        .await?
        .ok_or_else(|| AppError::Unauthorized("Device authentication failed".to_string()))
}

/// Resolve a session token to its (non-expired) user.
///
/// # Errors
///
/// 401 for an unknown or expired token.
pub async fn resolve_session(db: &DatabaseConnection, token: &str) -> AppResult<users::Model> {
    let session = sessions::Entity::find()
        .filter(sessions::Column::Token.eq(token))
        .one(db)
        .await?
        .ok_or_else(|| AppError::Unauthorized("Invalid session token".to_string()))?;

    if session.expires_at < Utc::now() {
        return Err(AppError::Unauthorized("Invalid session token".to_string()));
    }

    users::Entity::find_by_id(session.user_id)
        .one(db)
        .await?
        .ok_or_else(|| AppError::Unauthorized("Invalid session token".to_string()))
}

/// Extractor: the authenticated device for ingestion endpoints.
#[derive(Debug, Clone)]
pub struct AuthedDevice(pub devices::Model);

impl FromRequestParts<AppState> for AuthedDevice {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let creds = DeviceCreds::from_headers(&parts.headers)?;
        let device = authenticate_device(&state.db, &creds).await?;
        Ok(Self(device))
    }
}

/// Extractor: the authenticated user for console endpoints.
#[derive(Debug, Clone)]
pub struct AuthedUser(pub users::Model);

impl FromRequestParts<AppState> for AuthedUser {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let token = parts
            .headers
            .get("x-session-token")
            .and_then(|v| v.to_str().ok())
            .filter(|t| !t.is_empty())
            .ok_or_else(|| AppError::Unauthorized("Authentication required".to_string()))?;

        let user = resolve_session(&state.db, token).await?;
        Ok(Self(user))
    }
}
