use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

#[derive(Debug, Deserialize, ToSchema)]
pub struct RegisterRequest {
    #[serde(rename = "deviceId")]
    pub device_id: String,
    pub name: String,
}

/// Device representation returned from registration. Includes the API key —
/// the secret is handed back on every successful call, not just the first.
#[derive(Debug, Serialize, ToSchema)]
pub struct DeviceEnvelope {
    pub id: Uuid,
    #[serde(rename = "deviceId")]
    pub device_id: String,
    pub name: String,
    #[serde(rename = "apiKey")]
    pub api_key: String,
    pub status: String,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct RegisterResponse {
    pub success: bool,
    pub message: String,
    pub device: DeviceEnvelope,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct DeviceSummary {
    pub id: Uuid,
    #[serde(rename = "deviceId")]
    pub device_id: String,
    pub name: String,
    pub status: String,
    #[serde(rename = "lastSeen")]
    pub last_seen: Option<DateTime<Utc>>,
    #[serde(rename = "createdAt")]
    pub created_at: Option<DateTime<Utc>>,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct DevicesListResponse {
    pub success: bool,
    pub devices: Vec<DeviceSummary>,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct DeviceStatsResponse {
    pub success: bool,
    #[serde(rename = "deviceId")]
    pub device_id: String,
    #[serde(rename = "sensorLogs")]
    pub sensor_logs: u64,
    #[serde(rename = "irrigationEvents")]
    pub irrigation_events: u64,
    pub alerts: u64,
    pub status: String,
    #[serde(rename = "lastSeen")]
    pub last_seen: Option<DateTime<Utc>>,
}
