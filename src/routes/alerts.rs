use axum::{
    Json,
    extract::{Path, Query, State},
};
use chrono::{DateTime, Utc};
use sea_orm::{ActiveModelTrait, ColumnTrait, EntityTrait, IntoActiveModel, QueryFilter, QueryOrder, Set};
use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};
use uuid::Uuid;

use crate::auth::AuthedUser;
use crate::common::AppState;
use crate::entity::alerts;
use crate::error::{AppError, AppResult};
use crate::routes::resolve_owned_device;

#[derive(Debug, Deserialize, IntoParams)]
pub struct AlertsQuery {
    /// Filter by resolution state
    pub resolved: Option<bool>,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct AlertSummary {
    pub id: Uuid,
    #[serde(rename = "type")]
    pub alert_type: String,
    pub severity: String,
    pub message: String,
    pub resolved: bool,
    pub timestamp: DateTime<Utc>,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct AlertsListResponse {
    pub success: bool,
    #[serde(rename = "deviceId")]
    pub device_id: String,
    pub alerts: Vec<AlertSummary>,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct AlertResolvedResponse {
    pub success: bool,
    #[serde(rename = "alertId")]
    pub alert_id: Uuid,
    pub resolved: bool,
}

/// List alerts for one of the caller's devices
#[utoipa::path(
    get,
    path = "/api/device/{device_id}/alerts",
    params(
        ("device_id" = String, Path, description = "Device hardware id"),
        AlertsQuery
    ),
    responses(
        (status = 200, description = "Alerts retrieved successfully", body = AlertsListResponse),
        (status = 401, description = "Authentication required"),
        (status = 404, description = "Device not found"),
    ),
    tag = "alerts"
)]
pub async fn list_device_alerts(
    State(state): State<AppState>,
    AuthedUser(user): AuthedUser,
    Path(device_id): Path<String>,
    Query(query): Query<AlertsQuery>,
) -> AppResult<Json<AlertsListResponse>> {
    let device = resolve_owned_device(&state.db, &user, &device_id).await?;

    let mut db_query = alerts::Entity::find().filter(alerts::Column::DeviceId.eq(device.id));

    if let Some(resolved) = query.resolved {
        db_query = db_query.filter(alerts::Column::Resolved.eq(resolved));
    }

    let alerts_list = db_query
        .order_by_desc(alerts::Column::RecordedAt)
        .all(&state.db)
        .await?;

    let alerts_response: Vec<AlertSummary> = alerts_list
        .into_iter()
        .map(|a| AlertSummary {
            id: a.id,
            alert_type: a.alert_type,
            severity: a.severity,
            message: a.message,
            resolved: a.resolved,
            timestamp: a.recorded_at.with_timezone(&Utc),
        })
        .collect();

    Ok(Json(AlertsListResponse {
        success: true,
        device_id: device.hardware_id,
        alerts: alerts_response,
    }))
}

/// Mark an alert resolved
///
/// Idempotent; resolving an already-resolved alert succeeds.
#[utoipa::path(
    post,
    path = "/api/alerts/{alert_id}/resolve",
    params(
        ("alert_id" = Uuid, Path, description = "Alert UUID"),
    ),
    responses(
        (status = 200, description = "Alert resolved", body = AlertResolvedResponse),
        (status = 401, description = "Authentication required"),
        (status = 404, description = "Alert not found"),
    ),
    tag = "alerts"
)]
pub async fn resolve_alert(
    State(state): State<AppState>,
    AuthedUser(user): AuthedUser,
    Path(alert_id): Path<Uuid>,
) -> AppResult<Json<AlertResolvedResponse>> {
    let alert = alerts::Entity::find_by_id(alert_id)
        .one(&state.db)
        .await?
        .filter(|a| a.owner_id == Some(user.id))
        .ok_or_else(|| AppError::NotFound("Alert not found".to_string()))?;

    let alert = if alert.resolved {
        alert
    } else {
        let mut active = alert.into_active_model();
        active.resolved = Set(true);
        active.update(&state.db).await?
    };

    Ok(Json(AlertResolvedResponse {
        success: true,
        alert_id: alert.id,
        resolved: alert.resolved,
    }))
}
