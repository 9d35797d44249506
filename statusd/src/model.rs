use serde::{Deserialize, Serialize};

/// Latest status report for a device.
///
/// The caller-supplied `timestamp` is kept verbatim as submitted; the store
/// additionally stamps a server-side `recorded_at` column that never leaves
/// the database.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, sqlx::FromRow)]
pub struct DeviceStatus {
    pub device_id: String,
    pub timestamp: String,
    pub battery_level: i64,
    pub rssi: i64,
    pub online: bool,
}

/// Per-device row of the summary listing.
#[derive(Debug, Clone, Serialize, sqlx::FromRow)]
pub struct DeviceSummary {
    pub device_id: String,
    pub battery_level: i64,
    pub online: bool,
    pub last_update: String,
}

/// REST API response wrappers
#[derive(Debug, Serialize)]
pub struct SummaryResponse {
    pub devices: Vec<DeviceSummary>,
}

#[derive(Debug, Serialize)]
pub struct UpdateResponse {
    pub message: &'static str,
}

#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
    pub message: &'static str,
}
