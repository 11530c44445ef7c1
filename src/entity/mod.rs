pub mod ai_inputs;
pub mod alerts;
pub mod devices;
pub mod irrigation_logs;
pub mod notifications;
pub mod sensor_logs;
pub mod sessions;
pub mod users;
