//! Irrigation decisioning.
//!
//! Sensor submissions that breach a device's thresholds enqueue a trigger
//! record; a separately-run batch turns pending triggers into
//! recommendations. The batch claims rows with `FOR UPDATE SKIP LOCKED`
//! inside a transaction, so concurrent invocations (HTTP and the background
//! scheduler) never process the same trigger twice.

pub mod scheduler;

use chrono::Utc;
use sea_orm::sea_query::{LockBehavior, LockType};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, IntoActiveModel, QueryFilter,
    QueryOrder, QuerySelect, Set, TransactionTrait,
};

use crate::entity::{ai_inputs, devices::DeviceConfig};
use crate::error::AppResult;

/// Why a sensor submission breached thresholds.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TriggerReason {
    LowMoisture,
    HighTemp,
}

impl TriggerReason {
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::LowMoisture => "low_moisture",
            Self::HighTemp => "high_temp",
        }
    }
}

/// What the device should do about a trigger.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Recommendation {
    Irrigate,
    IrrigateEvening,
    Monitor,
}

impl Recommendation {
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Irrigate => "irrigate",
            Self::IrrigateEvening => "irrigate_evening",
            Self::Monitor => "monitor",
        }
    }
}

/// Evaluate a sensor submission against the device's thresholds.
///
/// The moisture floor wins when both thresholds are breached. Readings the
/// device did not send never trigger.
#[must_use]
pub fn evaluate_trigger(
    config: &DeviceConfig,
    soil_moisture: Option<f64>,
    temperature: Option<f64>,
) -> Option<TriggerReason> {
    if let Some(moisture) = soil_moisture {
        if moisture < config.min_moisture {
            return Some(TriggerReason::LowMoisture);
        }
    }

    if let Some(temp) = temperature {
        if temp > config.max_temp {
            return Some(TriggerReason::HighTemp);
        }
    }

    None
}

/// Map a stored trigger reason to a recommendation.
#[must_use]
pub fn recommend(trigger_reason: &str) -> Recommendation {
    match trigger_reason {
        "low_moisture" => Recommendation::Irrigate,
        "high_temp" => Recommendation::IrrigateEvening,
        _ => Recommendation::Monitor,
    }
}

/// Claim and process up to `limit` pending trigger records, oldest first.
///
/// The claim runs inside a transaction with `FOR UPDATE SKIP LOCKED`: rows
/// another invocation holds are skipped rather than double-processed, and a
/// row is only visible as processed once its recommendation is committed.
///
/// # Errors
///
/// Returns a database error if the claim or any update fails; the
/// transaction rolls back and the rows stay pending.
pub async fn process_batch(
    db: &DatabaseConnection,
    limit: u64,
) -> AppResult<Vec<ai_inputs::Model>> {
    let txn = db.begin().await?;

    let pending = ai_inputs::Entity::find()
        .filter(ai_inputs::Column::Processed.eq(false))
        .order_by_asc(ai_inputs::Column::RecordedAt)
        .limit(limit)
        .lock_with_behavior(LockType::Update, LockBehavior::SkipLocked)
        .all(&txn)
        .await?;

    let now = Utc::now();
    let mut processed = Vec::with_capacity(pending.len());

    for input in pending {
        let recommendation = recommend(&input.trigger_reason);

        let mut active = input.into_active_model();
        active.processed = Set(true);
        active.recommendation = Set(Some(recommendation.as_str().to_string()));
        active.processed_at = Set(Some(now.into()));

        processed.push(active.update(&txn).await?);
    }

    txn.commit().await?;

    Ok(processed)
}
