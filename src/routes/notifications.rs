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
use crate::entity::notifications;
use crate::error::{AppError, AppResult};

#[derive(Debug, Deserialize, IntoParams)]
pub struct NotificationsQuery {
    /// Only return unread notifications
    pub unread: Option<bool>,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct NotificationSummary {
    pub id: Uuid,
    #[serde(rename = "deviceId")]
    pub device_id: Uuid,
    pub kind: String,
    pub title: String,
    pub message: String,
    pub severity: Option<String>,
    pub read: bool,
    pub timestamp: Option<DateTime<Utc>>,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct NotificationsListResponse {
    pub success: bool,
    pub notifications: Vec<NotificationSummary>,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct NotificationReadResponse {
    pub success: bool,
    #[serde(rename = "notificationId")]
    pub notification_id: Uuid,
    pub read: bool,
}

/// List the caller's notifications, newest first
#[utoipa::path(
    get,
    path = "/api/notifications",
    params(NotificationsQuery),
    responses(
        (status = 200, description = "Notifications retrieved successfully", body = NotificationsListResponse),
        (status = 401, description = "Authentication required"),
    ),
    tag = "notifications"
)]
pub async fn list_notifications(
    State(state): State<AppState>,
    AuthedUser(user): AuthedUser,
    Query(query): Query<NotificationsQuery>,
) -> AppResult<Json<NotificationsListResponse>> {
    let mut db_query =
        notifications::Entity::find().filter(notifications::Column::UserId.eq(user.id));

    if query.unread == Some(true) {
        db_query = db_query.filter(notifications::Column::Read.eq(false));
    }

    let notifications_list = db_query
        .order_by_desc(notifications::Column::CreatedAt)
        .all(&state.db)
        .await?;

    let notifications_response: Vec<NotificationSummary> = notifications_list
        .into_iter()
        .map(|n| NotificationSummary {
            id: n.id,
            device_id: n.device_id,
            kind: n.kind,
            title: n.title,
            message: n.message,
            severity: n.severity,
            read: n.read,
            timestamp: n.created_at.map(|t| t.with_timezone(&Utc)),
        })
        .collect();

    Ok(Json(NotificationsListResponse {
        success: true,
        notifications: notifications_response,
    }))
}

/// Mark a notification as read
///
/// Idempotent; marking an already-read notification succeeds.
#[utoipa::path(
    post,
    path = "/api/notifications/{notification_id}/read",
    params(
        ("notification_id" = Uuid, Path, description = "Notification UUID"),
    ),
    responses(
        (status = 200, description = "Notification marked read", body = NotificationReadResponse),
        (status = 401, description = "Authentication required"),
        (status = 404, description = "Notification not found"),
    ),
    tag = "notifications"
)]
pub async fn mark_notification_read(
    State(state): State<AppState>,
    AuthedUser(user): AuthedUser,
    Path(notification_id): Path<Uuid>,
) -> AppResult<Json<NotificationReadResponse>> {
    let notification = notifications::Entity::find_by_id(notification_id)
        .one(&state.db)
        .await?
        .filter(|n| n.user_id == user.id)
        .ok_or_else(|| AppError::NotFound("Notification not found".to_string()))?;

    let notification = if notification.read {
        notification
    } else {
        let mut active = notification.into_active_model();
        active.read = Set(true);
        active.update(&state.db).await?
    };

    Ok(Json(NotificationReadResponse {
        success: true,
        notification_id: notification.id,
        read: notification.read,
    }))
}
