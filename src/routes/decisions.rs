use axum::{Json, extract::State};
use sea_orm::{ColumnTrait, EntityTrait, QueryFilter};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use utoipa::ToSchema;
use uuid::Uuid;

use crate::auth::AuthedUser;
use crate::common::AppState;
use crate::decision;
use crate::entity::devices;
use crate::error::AppResult;

const DEFAULT_LIMIT: u64 = 10;
const MAX_LIMIT: u64 = 100;

#[derive(Debug, Deserialize, ToSchema)]
pub struct ProcessRequest {
    /// Maximum number of pending triggers to process (default 10, max 100)
    pub limit: Option<u64>,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct ProcessedTrigger {
    pub id: Uuid,
    #[serde(rename = "deviceId")]
    pub device_id: String,
    pub trigger: String,
    pub recommendation: String,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct ProcessResponse {
    pub success: bool,
    pub processed: usize,
    pub results: Vec<ProcessedTrigger>,
}

/// Process pending decision triggers
///
/// Claims up to `limit` unprocessed trigger records, oldest first, and maps
/// each to a recommendation. The claim is atomic, so concurrent calls (or
/// the background scheduler) never process the same trigger twice.
#[utoipa::path(
    post,
    path = "/api/decisions/process",
    request_body = ProcessRequest,
    responses(
        (status = 200, description = "Batch processed", body = ProcessResponse),
        (status = 401, description = "Authentication required"),
    ),
    tag = "decisions"
)]
pub async fn process_decisions(
    State(state): State<AppState>,
    AuthedUser(user): AuthedUser,
    Json(payload): Json<ProcessRequest>,
) -> AppResult<Json<ProcessResponse>> {
    let limit = payload.limit.unwrap_or(DEFAULT_LIMIT).clamp(1, MAX_LIMIT);

    let processed = decision::process_batch(&state.db, limit).await?;

    // Re-join hardware ids for the response
    let device_ids: Vec<Uuid> = processed.iter().map(|p| p.device_id).collect();
    let hardware_ids: HashMap<Uuid, String> = devices::Entity::find()
        .filter(devices::Column::Id.is_in(device_ids))
        .all(&state.db)
        .await?
        .into_iter()
        .map(|d| (d.id, d.hardware_id))
        .collect();

    let results: Vec<ProcessedTrigger> = processed
        .into_iter()
        .map(|p| ProcessedTrigger {
            id: p.id,
            device_id: hardware_ids.get(&p.device_id).cloned().unwrap_or_default(),
            trigger: p.trigger_reason,
            recommendation: p.recommendation.unwrap_or_default(),
        })
        .collect();

    tracing::info!(
        processed = results.len(),
        user = %user.username,
        "decision_batch_processed"
    );

    Ok(Json(ProcessResponse {
        success: true,
        processed: results.len(),
        results,
    }))
}
