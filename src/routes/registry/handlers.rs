use axum::{
    Json,
    extract::{Path, State},
    response::Response,
};
use chrono::Utc;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, EntityTrait, IntoActiveModel, PaginatorTrait, QueryFilter,
    QueryOrder, Set, SqlErr,
};
use uuid::Uuid;

use crate::auth::AuthedUser;
use crate::common::AppState;
use crate::entity::{alerts, devices, irrigation_logs, sensor_logs};
use crate::error::{AppError, AppResult};
use crate::routes::{cache, resolve_owned_device};

use super::types::{
    DeviceEnvelope, DeviceStatsResponse, DeviceSummary, DevicesListResponse, RegisterRequest,
    RegisterResponse,
};

/// Register or claim a device
///
/// Creates the device with a freshly generated API key when the hardware id
/// is unclaimed; updates the display name when the caller already owns it;
/// rejects with 409 when another user does.
#[utoipa::path(
    post,
    path = "/api/device/register",
    request_body = RegisterRequest,
    responses(
        (status = 200, description = "Device registered successfully", body = RegisterResponse),
        (status = 400, description = "Invalid deviceId or missing name"),
        (status = 401, description = "Authentication required"),
        (status = 409, description = "Device already claimed by another user"),
    ),
    tag = "registry"
)]
pub async fn register_device(
    State(state): State<AppState>,
    AuthedUser(user): AuthedUser,
    Json(payload): Json<RegisterRequest>,
) -> AppResult<Json<RegisterResponse>> {
    if payload.device_id.trim().is_empty() {
        return Err(AppError::BadRequest("Invalid deviceId".to_string()));
    }
    if payload.name.trim().is_empty() {
        return Err(AppError::BadRequest("Device name is required".to_string()));
    }

    let existing = devices::Entity::find()
        .filter(devices::Column::HardwareId.eq(&payload.device_id))
        .one(&state.db)
        .await?;

    let now = Utc::now();

    let device = if let Some(device) = existing {
        if let Some(owner_id) = device.owner_id {
            if owner_id != user.id {
                return Err(AppError::Conflict(
                    "Device already claimed by another user".to_string(),
                ));
            }
        }

        // Re-registration by the owner (or claim of an ownerless row)
        let mut active = device.into_active_model();
        active.name = Set(payload.name.clone());
        active.owner_id = Set(Some(user.id));
        active.status = Set("offline".to_string());
        active.last_seen = Set(Some(now.into()));
        active.updated_at = Set(Some(now.into()));
        let device = active.update(&state.db).await?;

        // Stored name/thresholds may be cached for the device
        cache::invalidate(&state, &cache::cache_key("config", &[&device.hardware_id])).await;

        device
    } else {
        let insert = devices::ActiveModel {
            id: Set(Uuid::new_v4()),
            hardware_id: Set(payload.device_id.clone()),
            name: Set(payload.name.clone()),
            api_key: Set(Uuid::new_v4().to_string()),
            owner_id: Set(Some(user.id)),
            status: Set("offline".to_string()),
            last_seen: Set(Some(now.into())),
            created_at: Set(Some(now.into())),
            updated_at: Set(Some(now.into())),
            ..Default::default()
        }
        .insert(&state.db)
        .await;

        match insert {
            Ok(device) => device,
            // Lost a concurrent claim on the same hardware id
            Err(e) if matches!(e.sql_err(), Some(SqlErr::UniqueConstraintViolation(_))) => {
                return Err(AppError::Conflict(
                    "Device already claimed by another user".to_string(),
                ));
            }
            Err(e) => return Err(e.into()),
        }
    };

    tracing::info!(
        device = %device.hardware_id,
        user = %user.username,
        "device_registered"
    );

    Ok(Json(RegisterResponse {
        success: true,
        message: "Device registered successfully".to_string(),
        device: DeviceEnvelope {
            id: device.id,
            device_id: device.hardware_id,
            name: device.name,
            api_key: device.api_key,
            status: device.status,
        },
    }))
}

/// List the caller's devices
#[utoipa::path(
    get,
    path = "/api/device/register",
    responses(
        (status = 200, description = "Devices retrieved successfully", body = DevicesListResponse),
        (status = 401, description = "Authentication required"),
    ),
    tag = "registry"
)]
pub async fn list_devices(
    State(state): State<AppState>,
    AuthedUser(user): AuthedUser,
) -> AppResult<Json<DevicesListResponse>> {
    let devices_list = devices::Entity::find()
        .filter(devices::Column::OwnerId.eq(user.id))
        .order_by_desc(devices::Column::CreatedAt)
        .all(&state.db)
        .await?;

    let devices_response: Vec<DeviceSummary> = devices_list
        .into_iter()
        .map(|d| DeviceSummary {
            id: d.id,
            device_id: d.hardware_id,
            name: d.name,
            status: d.status,
            last_seen: d.last_seen.map(|t| t.with_timezone(&Utc)),
            created_at: d.created_at.map(|t| t.with_timezone(&Utc)),
        })
        .collect();

    Ok(Json(DevicesListResponse {
        success: true,
        devices: devices_response,
    }))
}

/// Record counts and status for one of the caller's devices
#[utoipa::path(
    get,
    path = "/api/device/{device_id}/stats",
    params(
        ("device_id" = String, Path, description = "Device hardware id"),
    ),
    responses(
        (status = 200, description = "Statistics retrieved successfully", body = DeviceStatsResponse),
        (status = 401, description = "Authentication required"),
        (status = 404, description = "Device not found"),
    ),
    tag = "registry"
)]
pub async fn device_stats(
    State(state): State<AppState>,
    AuthedUser(user): AuthedUser,
    Path(device_id): Path<String>,
) -> AppResult<Response> {
    let device = resolve_owned_device(&state.db, &user, &device_id).await?;

    let cache_key = cache::cache_key("stats", &[&device.hardware_id]);
    if let Some(cached) = cache::get_cached(&state, &cache_key).await {
        return cache::json_response((*cached).to_vec(), true);
    }

    let sensor_count = sensor_logs::Entity::find()
        .filter(sensor_logs::Column::DeviceId.eq(device.id))
        .count(&state.db)
        .await?;

    let irrigation_count = irrigation_logs::Entity::find()
        .filter(irrigation_logs::Column::DeviceId.eq(device.id))
        .count(&state.db)
        .await?;

    let alert_count = alerts::Entity::find()
        .filter(alerts::Column::DeviceId.eq(device.id))
        .count(&state.db)
        .await?;

    let response = DeviceStatsResponse {
        success: true,
        device_id: device.hardware_id,
        sensor_logs: sensor_count,
        irrigation_events: irrigation_count,
        alerts: alert_count,
        status: device.status,
        last_seen: device.last_seen.map(|t| t.with_timezone(&Utc)),
    };

    cache::cache_and_respond(&state, cache_key, &response).await
}
