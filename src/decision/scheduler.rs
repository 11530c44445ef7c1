use std::time::Duration;
use tokio::time::interval;

use crate::common::AppState;
use crate::decision;

/// Run the decision batch on a schedule.
///
/// Safe to run alongside manual `/api/decisions/process` calls because the
/// batch claim is atomic. An interval of 0 disables the loop.
pub async fn run_decision_loop(state: AppState) {
    let interval_secs = state.config.decision_interval_seconds;
    let batch_limit = state.config.decision_batch_limit;

    if interval_secs == 0 {
        tracing::info!("Decision batch scheduler disabled");
        return;
    }

    tracing::info!(interval_secs, batch_limit, "Starting decision batch scheduler");

    let mut ticker = interval(Duration::from_secs(interval_secs));

    // Run the first batch immediately
    ticker.tick().await;

    loop {
        match decision::process_batch(&state.db, batch_limit).await {
            Ok(done) if done.is_empty() => {
                tracing::debug!("No pending triggers");
            }
            Ok(done) => {
                tracing::info!(processed = done.len(), "Decision batch completed");
            }
            Err(e) => {
                tracing::error!(error = %e, "Decision batch failed");
            }
        }

        // Wait for next tick
        ticker.tick().await;
    }
}
