mod handlers;
mod types;

pub use handlers::{device_stats, list_devices, register_device};
pub use types::{
    DeviceEnvelope, DeviceStatsResponse, DeviceSummary, DevicesListResponse, RegisterRequest,
    RegisterResponse,
};

// Re-export utoipa path structs for OpenAPI documentation
pub use handlers::{__path_device_stats, __path_list_devices, __path_register_device};
