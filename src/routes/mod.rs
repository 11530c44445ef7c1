pub mod alerts;
pub mod cache;
pub mod decisions;
pub mod health;
pub mod ingest;
pub mod logs;
pub mod notifications;
mod rate_limit;
pub mod registry;

use axum::{
    Router,
    routing::{get, post},
};
use sea_orm::{ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter};
use std::sync::Arc;
use tower_governor::{GovernorLayer, governor::GovernorConfigBuilder};

use rate_limit::FallbackIpKeyExtractor;
use tower_http::{
    compression::CompressionLayer,
    cors::{Any, CorsLayer},
    limit::RequestBodyLimitLayer,
    trace::TraceLayer,
};
use utoipa::OpenApi;
use utoipa_scalar::{Scalar, Servable};

use crate::common::AppState;
use crate::entity::{devices, users};
use crate::error::{AppError, AppResult};

/// Resolve a device by hardware id, scoped to the calling user.
///
/// An existing device owned by someone else is indistinguishable from a
/// missing one.
pub async fn resolve_owned_device(
    db: &DatabaseConnection,
    user: &users::Model,
    hardware_id: &str,
) -> AppResult<devices::Model> {
    devices::Entity::find()
        .filter(devices::Column::HardwareId.eq(hardware_id))
        .filter(devices::Column::OwnerId.eq(user.id))
        .one(db)
        .await?
        .ok_or_else(|| AppError::NotFound("Device not found".to_string()))
}

#[derive(OpenApi)]
#[openapi(
    paths(
        health::healthz,
        ingest::submit_data,
        ingest::submit_heartbeat,
        ingest::submit_irrigation,
        ingest::submit_alert,
        ingest::fetch_config,
        registry::register_device,
        registry::list_devices,
        registry::device_stats,
        logs::get_device_logs,
        alerts::list_device_alerts,
        alerts::resolve_alert,
        notifications::list_notifications,
        notifications::mark_notification_read,
        decisions::process_decisions,
    ),
    components(
        schemas(
            ingest::SensorReadings,
            ingest::DataSubmission,
            ingest::DataAccepted,
            ingest::HeartbeatSubmission,
            ingest::HeartbeatAccepted,
            ingest::IrrigationEvent,
            ingest::IrrigationSubmission,
            ingest::IrrigationAccepted,
            ingest::AlertPayload,
            ingest::AlertSubmission,
            ingest::AlertAccepted,
            ingest::ConfigResponse,
            registry::RegisterRequest,
            registry::RegisterResponse,
            registry::DeviceEnvelope,
            registry::DevicesListResponse,
            registry::DeviceSummary,
            registry::DeviceStatsResponse,
            logs::SensorLogRow,
            logs::LogsResponse,
            alerts::AlertSummary,
            alerts::AlertsListResponse,
            alerts::AlertResolvedResponse,
            notifications::NotificationSummary,
            notifications::NotificationsListResponse,
            notifications::NotificationReadResponse,
            decisions::ProcessRequest,
            decisions::ProcessedTrigger,
            decisions::ProcessResponse,
        )
    ),
    tags(
        (name = "health", description = "Health check endpoints"),
        (name = "ingest", description = "Device-facing ingestion endpoints"),
        (name = "registry", description = "Device registration and ownership"),
        (name = "logs", description = "Sensor history"),
        (name = "alerts", description = "Device alerts"),
        (name = "notifications", description = "Owner notifications"),
        (name = "decisions", description = "Irrigation decision batch"),
    ),
    info(
        title = "Irrigo API",
        description = "Device ingestion and irrigation decision API",
        version = "0.1.0"
    )
)]
struct ApiDoc;

pub fn build_router(state: AppState) -> Router {
    let config = &state.config;

    if config.disable_rate_limiting {
        tracing::warn!("Rate limiting DISABLED");
    } else {
        tracing::info!(
            ingest_rate = %format!("{}/s burst {}", config.rate_limit_ingest_per_second, config.rate_limit_ingest_burst),
            console_rate = %format!("{}/s burst {}", config.rate_limit_console_per_second, config.rate_limit_console_burst),
            "Rate limiting configured"
        );
    }

    // Device-facing ingestion routes
    let ingest_routes_base = Router::new()
        .route("/device/data", post(ingest::submit_data))
        .route("/device/heartbeat", post(ingest::submit_heartbeat))
        .route("/device/irrigation", post(ingest::submit_irrigation))
        .route("/device/alert", post(ingest::submit_alert))
        .route("/device/config", get(ingest::fetch_config));

    // Session-authenticated console routes
    let console_routes_base = Router::new()
        .route(
            "/device/register",
            post(registry::register_device).get(registry::list_devices),
        )
        .route("/device/{device_id}/stats", get(registry::device_stats))
        .route("/device/{device_id}/logs", get(logs::get_device_logs))
        .route("/device/{device_id}/alerts", get(alerts::list_device_alerts))
        .route("/alerts/{alert_id}/resolve", post(alerts::resolve_alert))
        .route("/notifications", get(notifications::list_notifications))
        .route(
            "/notifications/{notification_id}/read",
            post(notifications::mark_notification_read),
        )
        .route("/decisions/process", post(decisions::process_decisions));

    // Combine API routes, conditionally applying rate limiting
    let api_routes = if config.disable_rate_limiting {
        Router::new()
            .merge(ingest_routes_base)
            .merge(console_routes_base)
    } else {
        let ingest_limiter = GovernorConfigBuilder::default()
            .key_extractor(FallbackIpKeyExtractor)
            .per_second(config.rate_limit_ingest_per_second)
            .burst_size(config.rate_limit_ingest_burst)
            .finish()
            .expect("Failed to create ingest rate limiter");

        let console_limiter = GovernorConfigBuilder::default()
            .key_extractor(FallbackIpKeyExtractor)
            .per_second(config.rate_limit_console_per_second)
            .burst_size(config.rate_limit_console_burst)
            .finish()
            .expect("Failed to create console rate limiter");

        Router::new()
            .merge(ingest_routes_base.layer(GovernorLayer {
                config: Arc::new(ingest_limiter),
            }))
            .merge(console_routes_base.layer(GovernorLayer {
                config: Arc::new(console_limiter),
            }))
    }
    .layer(RequestBodyLimitLayer::new(256 * 1024)); // 256KB body limit

    // Health check routes (NO rate limiting)
    let health_routes = Router::new().route("/healthz", get(health::healthz));

    // OpenAPI documentation
    let docs_routes = Router::new().merge(Scalar::with_url("/docs", ApiDoc::openapi()));

    // Combine all routes
    Router::new()
        .nest("/api", api_routes)
        .merge(health_routes)
        .merge(docs_routes)
        .layer(CompressionLayer::new())
        .layer(
            CorsLayer::new()
                .allow_origin(Any)
                .allow_methods(Any)
                .allow_headers(Any),
        )
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
