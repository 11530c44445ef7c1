use axum::{Json, extract::State, response::Response};
use chrono::Utc;
use sea_orm::{ActiveModelTrait, DatabaseConnection, IntoActiveModel, Set};
use uuid::Uuid;

use crate::auth::AuthedDevice;
use crate::common::AppState;
use crate::decision;
use crate::entity::{ai_inputs, alerts, devices, irrigation_logs, notifications, sensor_logs};
use crate::error::{AppError, AppResult};
use crate::policy;
use crate::routes::cache;

use super::types::{
    AlertAccepted, AlertSubmission, ConfigResponse, DataAccepted, DataSubmission,
    HeartbeatAccepted, HeartbeatSubmission, IrrigationAccepted, IrrigationSubmission,
    SensorReadings,
};

/// Reject submissions whose body identifier disagrees with the header.
fn check_id_match(device: &devices::Model, body_device_id: &str) -> AppResult<()> {
    if body_device_id.is_empty() || body_device_id != device.hardware_id {
        return Err(AppError::BadRequest("Device ID mismatch".to_string()));
    }
    Ok(())
}

/// Stamp the device as seen now. Every ingestion path goes through this.
async fn touch_device(
    db: &DatabaseConnection,
    device: devices::Model,
    status: &str,
) -> AppResult<devices::Model> {
    let now = Utc::now();
    let mut active = device.into_active_model();
    active.status = Set(status.to_string());
    active.last_seen = Set(Some(now.into()));
    active.updated_at = Set(Some(now.into()));
    Ok(active.update(db).await?)
}

/// Submit a sensor reading batch
///
/// Marks the device online, appends an immutable sensor log, and evaluates
/// the device's thresholds. A breach enqueues a trigger record for the
/// decision batch; the response reports whether that happened.
#[utoipa::path(
    post,
    path = "/api/device/data",
    request_body = DataSubmission,
    responses(
        (status = 200, description = "Sensor data received", body = DataAccepted),
        (status = 400, description = "Device ID mismatch or invalid sensor data"),
        (status = 401, description = "Device authentication failed"),
    ),
    tag = "ingest"
)]
pub async fn submit_data(
    State(state): State<AppState>,
    AuthedDevice(device): AuthedDevice,
    Json(payload): Json<DataSubmission>,
) -> AppResult<Json<DataAccepted>> {
    check_id_match(&device, &payload.device_id)?;

    let sensors = payload
        .sensors
        .ok_or_else(|| AppError::BadRequest("Invalid sensor data".to_string()))?;

    let device = touch_device(&state.db, device, "online").await?;

    let recorded_at = payload.timestamp.unwrap_or_else(Utc::now);
    let log = policy::insert_owned(
        &state.db,
        &device,
        sensor_logs::ActiveModel {
            id: Set(Uuid::new_v4()),
            device_id: Set(device.id),
            recorded_at: Set(recorded_at.into()),
            soil_moisture: Set(sensors.soil_moisture),
            temperature: Set(sensors.temperature),
            humidity: Set(sensors.humidity),
            water_flow: Set(sensors.water_flow),
            water_pressure: Set(sensors.water_pressure),
            battery_voltage: Set(sensors.battery_voltage),
            solar_voltage: Set(sensors.solar_voltage),
            created_at: Set(Some(Utc::now().into())),
            ..Default::default()
        },
    )
    .await?;

    let ai_triggered = enqueue_trigger(&state, &device, &sensors).await?;

    tracing::debug!(
        device = %device.hardware_id,
        log_id = %log.id,
        ai_triggered,
        "sensor_data_received"
    );

    Ok(Json(DataAccepted {
        success: true,
        message: "Sensor data received".to_string(),
        log_id: log.id,
        ai_triggered,
    }))
}

/// Evaluate thresholds and enqueue a trigger record on breach.
async fn enqueue_trigger(
    state: &AppState,
    device: &devices::Model,
    sensors: &SensorReadings,
) -> AppResult<bool> {
    let thresholds = device.thresholds();

    let Some(reason) =
        decision::evaluate_trigger(&thresholds, sensors.soil_moisture, sensors.temperature)
    else {
        return Ok(false);
    };

    policy::insert_owned(
        &state.db,
        device,
        ai_inputs::ActiveModel {
            id: Set(Uuid::new_v4()),
            device_id: Set(device.id),
            trigger_reason: Set(reason.as_str().to_string()),
            sensors: Set(serde_json::to_value(sensors).ok()),
            recorded_at: Set(Utc::now().into()),
            processed: Set(false),
            created_at: Set(Some(Utc::now().into())),
            ..Default::default()
        },
    )
    .await?;

    tracing::info!(
        device = %device.hardware_id,
        reason = reason.as_str(),
        "decision_trigger_enqueued"
    );

    Ok(true)
}

/// Submit a heartbeat
///
/// Updates the device's status and last-seen stamp.
#[utoipa::path(
    post,
    path = "/api/device/heartbeat",
    request_body = HeartbeatSubmission,
    responses(
        (status = 200, description = "Heartbeat received", body = HeartbeatAccepted),
        (status = 400, description = "Device ID mismatch"),
        (status = 401, description = "Device authentication failed"),
    ),
    tag = "ingest"
)]
pub async fn submit_heartbeat(
    State(state): State<AppState>,
    AuthedDevice(device): AuthedDevice,
    Json(payload): Json<HeartbeatSubmission>,
) -> AppResult<Json<HeartbeatAccepted>> {
    check_id_match(&device, &payload.device_id)?;

    let status = payload.status.as_deref().unwrap_or("online");
    touch_device(&state.db, device, status).await?;

    Ok(Json(HeartbeatAccepted {
        success: true,
        message: "Heartbeat received".to_string(),
        server_time: Utc::now().to_rfc3339(),
    }))
}

/// Submit an irrigation event
///
/// Appends an immutable irrigation log and folds the event into the
/// device's rolling totals.
#[utoipa::path(
    post,
    path = "/api/device/irrigation",
    request_body = IrrigationSubmission,
    responses(
        (status = 200, description = "Irrigation event logged", body = IrrigationAccepted),
        (status = 400, description = "Device ID mismatch or invalid event data"),
        (status = 401, description = "Device authentication failed"),
    ),
    tag = "ingest"
)]
pub async fn submit_irrigation(
    State(state): State<AppState>,
    AuthedDevice(device): AuthedDevice,
    Json(payload): Json<IrrigationSubmission>,
) -> AppResult<Json<IrrigationAccepted>> {
    check_id_match(&device, &payload.device_id)?;

    let event = payload
        .event
        .ok_or_else(|| AppError::BadRequest("Invalid event data".to_string()))?;

    let device = touch_device(&state.db, device, "online").await?;

    let recorded_at = payload.timestamp.unwrap_or_else(Utc::now);
    let log = policy::insert_owned(
        &state.db,
        &device,
        irrigation_logs::ActiveModel {
            id: Set(Uuid::new_v4()),
            device_id: Set(device.id),
            recorded_at: Set(recorded_at.into()),
            zone_id: Set(event.zone_id),
            action: Set(event.action.clone()),
            duration_sec: Set(event.duration),
            water_used: Set(event.water_used),
            trigger_source: Set(event.trigger.clone()),
            created_at: Set(Some(Utc::now().into())),
            ..Default::default()
        },
    )
    .await?;

    // Fold into rolling totals
    let mut stats = device.rolling_stats();
    if event.action == "start" {
        stats.total_irrigations += 1;
        stats.last_irrigation = Some(Utc::now());
    }
    if let Some(water_used) = event.water_used {
        stats.total_water_used += water_used;
    }

    let mut active = device.clone().into_active_model();
    active.stats = Set(serde_json::to_value(&stats).ok());
    active.update(&state.db).await?;

    tracing::debug!(
        device = %device.hardware_id,
        log_id = %log.id,
        action = %event.action,
        "irrigation_event_logged"
    );

    Ok(Json(IrrigationAccepted {
        success: true,
        message: "Irrigation event logged".to_string(),
        log_id: log.id,
    }))
}

/// Submit an alert
///
/// Appends the alert and, when the device is claimed, fans a notification
/// out to its owner. An ownerless device is not an error.
#[utoipa::path(
    post,
    path = "/api/device/alert",
    request_body = AlertSubmission,
    responses(
        (status = 200, description = "Alert received", body = AlertAccepted),
        (status = 400, description = "Device ID mismatch or invalid alert data"),
        (status = 401, description = "Device authentication failed"),
    ),
    tag = "ingest"
)]
pub async fn submit_alert(
    State(state): State<AppState>,
    AuthedDevice(device): AuthedDevice,
    Json(payload): Json<AlertSubmission>,
) -> AppResult<Json<AlertAccepted>> {
    check_id_match(&device, &payload.device_id)?;

    let alert = payload
        .alert
        .ok_or_else(|| AppError::BadRequest("Invalid alert data".to_string()))?;

    let device = touch_device(&state.db, device, "online").await?;

    let recorded_at = payload.timestamp.unwrap_or_else(Utc::now);
    let stored = policy::insert_owned(
        &state.db,
        &device,
        alerts::ActiveModel {
            id: Set(Uuid::new_v4()),
            device_id: Set(device.id),
            recorded_at: Set(recorded_at.into()),
            alert_type: Set(alert.alert_type.clone()),
            severity: Set(alert.severity.clone()),
            message: Set(alert.message.clone()),
            details: Set(alert.details.clone()),
            resolved: Set(false),
            created_at: Set(Some(Utc::now().into())),
            ..Default::default()
        },
    )
    .await?;

    notify_owner(&state.db, &device, &alert.alert_type, &alert.severity, &alert.message).await?;

    tracing::info!(
        device = %device.hardware_id,
        alert_id = %stored.id,
        severity = %alert.severity,
        "alert_received"
    );

    Ok(Json(AlertAccepted {
        success: true,
        message: "Alert received".to_string(),
        alert_id: stored.id,
    }))
}

/// Write a notification record for the device's owner, if it has one.
async fn notify_owner(
    db: &DatabaseConnection,
    device: &devices::Model,
    alert_type: &str,
    severity: &str,
    message: &str,
) -> AppResult<()> {
    let Some(owner_id) = device.owner_id else {
        return Ok(());
    };

    notifications::ActiveModel {
        id: Set(Uuid::new_v4()),
        user_id: Set(owner_id),
        device_id: Set(device.id),
        kind: Set("device_alert".to_string()),
        title: Set(format!("Device Alert: {alert_type}")),
        message: Set(message.to_string()),
        severity: Set(Some(severity.to_string())),
        read: Set(false),
        created_at: Set(Some(Utc::now().into())),
    }
    .insert(db)
    .await?;

    Ok(())
}

/// Fetch device configuration
///
/// Returns the stored threshold configuration, or the default set for a
/// device that was never configured. Read-only and idempotent; served
/// through the response cache.
#[utoipa::path(
    get,
    path = "/api/device/config",
    responses(
        (status = 200, description = "Configuration retrieved", body = ConfigResponse),
        (status = 400, description = "X-Device-ID header required"),
        (status = 401, description = "Device authentication failed"),
    ),
    tag = "ingest"
)]
pub async fn fetch_config(
    State(state): State<AppState>,
    AuthedDevice(device): AuthedDevice,
) -> AppResult<Response> {
    let cache_key = cache::cache_key("config", &[&device.hardware_id]);

    if let Some(cached) = cache::get_cached(&state, &cache_key).await {
        return cache::json_response((*cached).to_vec(), true);
    }

    let response = ConfigResponse {
        success: true,
        config: device.thresholds(),
        device_name: device.name.clone(),
        last_updated: device.updated_at.map(|t| t.with_timezone(&Utc)),
    };

    cache::cache_and_respond(&state, cache_key, &response).await
}
