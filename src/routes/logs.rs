use axum::{
    Json,
    extract::{Path, Query, State},
    http::header::{self, HeaderMap, HeaderValue},
    response::{IntoResponse, Response},
};
use chrono::{DateTime, Utc};
use sea_orm::{ColumnTrait, EntityTrait, QueryFilter, QueryOrder};
use serde::{Deserialize, Serialize};
use tokio_stream::wrappers::ReceiverStream;
use utoipa::{IntoParams, ToSchema};

use crate::auth::AuthedUser;
use crate::common::AppState;
use crate::entity::sensor_logs;
use crate::error::{AppError, AppResult};
use crate::routes::resolve_owned_device;

fn default_format() -> String {
    "json".to_string()
}

#[derive(Debug, Deserialize, IntoParams)]
pub struct LogsQuery {
    /// Start time (optional, ISO 8601). If omitted, returns from earliest data.
    pub start: Option<DateTime<Utc>>,
    /// End time (optional, ISO 8601). If omitted, returns to latest data.
    pub end: Option<DateTime<Utc>>,
    /// Response format: json (default), ndjson, csv
    #[serde(default = "default_format")]
    pub format: String,
}

#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct SensorLogRow {
    pub time: DateTime<Utc>,
    pub soil_moisture: Option<f64>,
    pub temperature: Option<f64>,
    pub humidity: Option<f64>,
    pub water_flow: Option<f64>,
    pub water_pressure: Option<f64>,
    pub battery_voltage: Option<f64>,
    pub solar_voltage: Option<f64>,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct LogsResponse {
    pub success: bool,
    #[serde(rename = "deviceId")]
    pub device_id: String,
    pub count: usize,
    pub logs: Vec<SensorLogRow>,
}

fn determine_format(query_format: &str, headers: &HeaderMap) -> String {
    // Query parameter takes precedence
    if query_format != "json" {
        return query_format.to_lowercase();
    }

    // Check Accept header
    if let Some(accept) = headers.get(header::ACCEPT)
        && let Ok(accept_str) = accept.to_str()
    {
        if accept_str.contains("application/x-ndjson") {
            return "ndjson".to_string();
        }
        if accept_str.contains("text/csv") {
            return "csv".to_string();
        }
    }

    "json".to_string()
}

const CSV_HEADER: &str =
    "time,soil_moisture,temperature,humidity,water_flow,water_pressure,battery_voltage,solar_voltage\n";

fn push_csv_field(row: &mut String, value: Option<f64>) {
    row.push(',');
    if let Some(v) = value {
        row.push_str(&v.to_string());
    }
}

fn build_csv_response(rows: Vec<SensorLogRow>) -> AppResult<Response> {
    let (tx, rx) = tokio::sync::mpsc::channel::<Result<String, std::io::Error>>(100);

    tokio::spawn(async move {
        let _ = tx.send(Ok(CSV_HEADER.to_string())).await;

        for log in rows {
            let mut row = log.time.to_rfc3339();
            push_csv_field(&mut row, log.soil_moisture);
            push_csv_field(&mut row, log.temperature);
            push_csv_field(&mut row, log.humidity);
            push_csv_field(&mut row, log.water_flow);
            push_csv_field(&mut row, log.water_pressure);
            push_csv_field(&mut row, log.battery_voltage);
            push_csv_field(&mut row, log.solar_voltage);
            row.push('\n');
            if tx.send(Ok(row)).await.is_err() {
                break;
            }
        }
    });

    let stream = ReceiverStream::new(rx);
    let body = axum::body::Body::from_stream(stream);

    Response::builder()
        .header(header::CONTENT_TYPE, HeaderValue::from_static("text/csv"))
        .body(body)
        .map_err(|e| AppError::Internal(e.to_string()))
}

fn build_ndjson_response(rows: Vec<SensorLogRow>) -> AppResult<Response> {
    let (tx, rx) = tokio::sync::mpsc::channel::<Result<String, std::io::Error>>(100);

    tokio::spawn(async move {
        for log in rows {
            let Ok(mut line) = serde_json::to_string(&log) else {
                break;
            };
            line.push('\n');
            if tx.send(Ok(line)).await.is_err() {
                break;
            }
        }
    });

    let stream = ReceiverStream::new(rx);
    let body = axum::body::Body::from_stream(stream);

    Response::builder()
        .header(
            header::CONTENT_TYPE,
            HeaderValue::from_static("application/x-ndjson"),
        )
        .body(body)
        .map_err(|e| AppError::Internal(e.to_string()))
}

/// Sensor history for one of the caller's devices
///
/// Returns sensor logs in the requested time range. Supports JSON, CSV, and
/// NDJSON formats; bulk formats stream row by row.
#[utoipa::path(
    get,
    path = "/api/device/{device_id}/logs",
    params(
        ("device_id" = String, Path, description = "Device hardware id"),
        LogsQuery
    ),
    responses(
        (status = 200, description = "Logs retrieved successfully", body = LogsResponse),
        (status = 400, description = "Invalid query parameters"),
        (status = 401, description = "Authentication required"),
        (status = 404, description = "Device not found"),
    ),
    tag = "logs"
)]
pub async fn get_device_logs(
    State(state): State<AppState>,
    AuthedUser(user): AuthedUser,
    Path(device_id): Path<String>,
    Query(query): Query<LogsQuery>,
    headers: HeaderMap,
) -> AppResult<Response> {
    let device = resolve_owned_device(&state.db, &user, &device_id).await?;

    // Validate time range if both provided
    if let (Some(start), Some(end)) = (query.start, query.end) {
        if end <= start {
            return Err(AppError::BadRequest(
                "end time must be after start time".to_string(),
            ));
        }
    }

    let format = determine_format(&query.format, &headers);

    let mut logs_query = sensor_logs::Entity::find()
        .filter(sensor_logs::Column::DeviceId.eq(device.id));

    if let Some(start) = query.start {
        logs_query = logs_query.filter(sensor_logs::Column::RecordedAt.gte(start));
    }
    if let Some(end) = query.end {
        logs_query = logs_query.filter(sensor_logs::Column::RecordedAt.lte(end));
    }

    let logs_list = logs_query
        .order_by_asc(sensor_logs::Column::RecordedAt)
        .all(&state.db)
        .await?;

    let rows: Vec<SensorLogRow> = logs_list
        .into_iter()
        .map(|l| SensorLogRow {
            time: l.recorded_at.with_timezone(&Utc),
            soil_moisture: l.soil_moisture,
            temperature: l.temperature,
            humidity: l.humidity,
            water_flow: l.water_flow,
            water_pressure: l.water_pressure,
            battery_voltage: l.battery_voltage,
            solar_voltage: l.solar_voltage,
        })
        .collect();

    match format.as_str() {
        "csv" => build_csv_response(rows),
        "ndjson" => build_ndjson_response(rows),
        _ => {
            let response = LogsResponse {
                success: true,
                device_id: device.hardware_id,
                count: rows.len(),
                logs: rows,
            };
            Ok(Json(response).into_response())
        }
    }
}
