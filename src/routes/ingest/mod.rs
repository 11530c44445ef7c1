mod handlers;
mod types;

pub use handlers::{fetch_config, submit_alert, submit_data, submit_heartbeat, submit_irrigation};
pub use types::{
    AlertAccepted, AlertPayload, AlertSubmission, ConfigResponse, DataAccepted, DataSubmission,
    HeartbeatAccepted, HeartbeatSubmission, IrrigationAccepted, IrrigationEvent,
    IrrigationSubmission, SensorReadings,
};

// Re-export utoipa path structs for OpenAPI documentation
pub use handlers::{
    __path_fetch_config, __path_submit_alert, __path_submit_data, __path_submit_heartbeat,
    __path_submit_irrigation,
};
