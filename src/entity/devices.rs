use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "devices")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    /// Identifier printed on the physical unit; what devices send in X-Device-ID.
    #[sea_orm(unique)]
    pub hardware_id: String,
    pub name: String,
    pub api_key: String,
    pub owner_id: Option<Uuid>,
    pub status: String,
    pub last_seen: Option<DateTimeWithTimeZone>,
    pub config: Option<Json>,
    pub stats: Option<Json>,
    pub created_at: Option<DateTimeWithTimeZone>,
    pub updated_at: Option<DateTimeWithTimeZone>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::users::Entity",
        from = "Column::OwnerId",
        to = "super::users::Column::Id"
    )]
    Owner,
    #[sea_orm(has_many = "super::sensor_logs::Entity")]
    SensorLogs,
    #[sea_orm(has_many = "super::irrigation_logs::Entity")]
    IrrigationLogs,
    #[sea_orm(has_many = "super::alerts::Entity")]
    Alerts,
    #[sea_orm(has_many = "super::ai_inputs::Entity")]
    AiInputs,
    #[sea_orm(has_many = "super::notifications::Entity")]
    Notifications,
}

impl Related<super::users::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Owner.def()
    }
}

impl Related<super::sensor_logs::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::SensorLogs.def()
    }
}

impl Related<super::irrigation_logs::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::IrrigationLogs.def()
    }
}

impl Related<super::alerts::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Alerts.def()
    }
}

impl Related<super::ai_inputs::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::AiInputs.def()
    }
}

impl Related<super::notifications::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Notifications.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

/// Per-device threshold configuration, stored as JSON on the device row.
/// Field names match what firmware expects over the wire.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase", default)]
pub struct DeviceConfig {
    pub min_moisture: f64,
    pub max_moisture: f64,
    pub min_temp: f64,
    pub max_temp: f64,
    pub irrigation_duration: i64,
    pub sensor_interval: i64,
    pub sync_interval: i64,
}

impl Default for DeviceConfig {
    fn default() -> Self {
        Self {
            min_moisture: 30.0,
            max_moisture: 70.0,
            min_temp: 10.0,
            max_temp: 35.0,
            irrigation_duration: 1800,
            sensor_interval: 60,
            sync_interval: 300,
        }
    }
}

/// Rolling irrigation totals, stored as JSON on the device row.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase", default)]
pub struct DeviceStats {
    pub total_water_used: f64,
    pub total_irrigations: i64,
    pub last_irrigation: Option<chrono::DateTime<chrono::Utc>>,
}

impl Model {
    /// Stored threshold configuration, falling back to defaults where the
    /// device was never configured (or the stored JSON is unreadable).
    #[must_use]
    pub fn thresholds(&self) -> DeviceConfig {
        self.config
            .clone()
            .and_then(|v| serde_json::from_value(v).ok())
            .unwrap_or_default()
    }

    #[must_use]
    pub fn rolling_stats(&self) -> DeviceStats {
        self.stats
            .clone()
            .and_then(|v| serde_json::from_value(v).ok())
            .unwrap_or_default()
    }
}
