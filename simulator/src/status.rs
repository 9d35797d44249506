use serde::Serialize;

/// Status report payload accepted by the API's POST /status endpoint.
#[derive(Debug, Clone, Serialize)]
pub struct StatusReport {
    pub device_id: String,
    pub timestamp: String,
    pub battery_level: i64,
    pub rssi: i64,
    pub online: bool,
}
