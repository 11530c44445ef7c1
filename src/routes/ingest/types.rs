use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

use crate::entity::devices::DeviceConfig;

/// One batch of sensor readings as sent by firmware. Readings the unit does
/// not have (no solar panel, no flow meter) are simply omitted.
#[derive(Debug, Clone, Default, Serialize, Deserialize, ToSchema)]
pub struct SensorReadings {
    pub soil_moisture: Option<f64>,
    pub temperature: Option<f64>,
    pub humidity: Option<f64>,
    pub water_flow: Option<f64>,
    pub water_pressure: Option<f64>,
    pub battery_voltage: Option<f64>,
    pub solar_voltage: Option<f64>,
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct DataSubmission {
    #[serde(rename = "deviceId")]
    pub device_id: String,
    pub timestamp: Option<DateTime<Utc>>,
    pub sensors: Option<SensorReadings>,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct DataAccepted {
    pub success: bool,
    pub message: String,
    #[serde(rename = "logId")]
    pub log_id: Uuid,
    #[serde(rename = "aiTriggered")]
    pub ai_triggered: bool,
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct HeartbeatSubmission {
    #[serde(rename = "deviceId")]
    pub device_id: String,
    pub timestamp: Option<DateTime<Utc>>,
    pub status: Option<String>,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct HeartbeatAccepted {
    pub success: bool,
    pub message: String,
    #[serde(rename = "serverTime")]
    pub server_time: String,
}

#[derive(Debug, Clone, Deserialize, ToSchema)]
pub struct IrrigationEvent {
    pub zone_id: Option<i32>,
    pub action: String,
    /// Seconds the valve was (or will be) open.
    pub duration: Option<i32>,
    /// Liters dispensed, if the unit meters flow.
    pub water_used: Option<f64>,
    pub trigger: Option<String>,
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct IrrigationSubmission {
    #[serde(rename = "deviceId")]
    pub device_id: String,
    pub timestamp: Option<DateTime<Utc>>,
    pub event: Option<IrrigationEvent>,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct IrrigationAccepted {
    pub success: bool,
    pub message: String,
    #[serde(rename = "logId")]
    pub log_id: Uuid,
}

#[derive(Debug, Clone, Deserialize, ToSchema)]
pub struct AlertPayload {
    #[serde(rename = "type")]
    pub alert_type: String,
    pub severity: String,
    pub message: String,
    #[schema(value_type = Object)]
    pub details: Option<serde_json::Value>,
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct AlertSubmission {
    #[serde(rename = "deviceId")]
    pub device_id: String,
    pub timestamp: Option<DateTime<Utc>>,
    pub alert: Option<AlertPayload>,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct AlertAccepted {
    pub success: bool,
    pub message: String,
    #[serde(rename = "alertId")]
    pub alert_id: Uuid,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct ConfigResponse {
    pub success: bool,
    pub config: DeviceConfig,
    #[serde(rename = "deviceName")]
    pub device_name: String,
    #[serde(rename = "lastUpdated")]
    pub last_updated: Option<DateTime<Utc>>,
}
