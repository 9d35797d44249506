use serde_json::Value;

use crate::errors::ValidationError;
use crate::model::DeviceStatus;

const BATTERY_MIN: i64 = 0;
const BATTERY_MAX: i64 = 100;

/// Required payload fields, in the order missing-field errors report them.
const REQUIRED_FIELDS: [&str; 5] = ["device_id", "timestamp", "battery_level", "rssi", "online"];

/// Validates a decoded status payload and lifts it into a typed record.
///
/// Checks run in a fixed order and the first failure wins. Types must match
/// exactly: `1` is not a boolean, `"85"` is not an integer, `85.0` is not
/// an integer either.
pub fn validate(payload: &Value) -> Result<DeviceStatus, ValidationError> {
    if payload.is_null() {
        return Err(ValidationError::MissingPayload);
    }

    for field in REQUIRED_FIELDS {
        if payload.get(field).is_none() {
            return Err(ValidationError::MissingField(field));
        }
    }

    let device_id = match payload["device_id"].as_str() {
        Some(id) if !id.is_empty() => id.to_string(),
        _ => return Err(ValidationError::InvalidDeviceId),
    };

    let battery_level = match payload["battery_level"].as_i64() {
        Some(level) if (BATTERY_MIN..=BATTERY_MAX).contains(&level) => level,
        _ => return Err(ValidationError::InvalidBatteryLevel),
    };

    let rssi = payload["rssi"]
        .as_i64()
        .ok_or(ValidationError::InvalidRssi)?;

    let online = payload["online"]
        .as_bool()
        .ok_or(ValidationError::InvalidOnlineType)?;

    let timestamp = payload["timestamp"]
        .as_str()
        .ok_or(ValidationError::InvalidTimestampFormat)?;
    // A literal trailing Z is as valid as an explicit +00:00 offset, and
    // offset-naive date-times are accepted alongside offset-carrying ones.
    let normalized = match timestamp.strip_suffix('Z') {
        Some(stripped) => format!("{stripped}+00:00"),
        None => timestamp.to_string(),
    };
    let parses = chrono::DateTime::parse_from_rfc3339(&normalized).is_ok()
        || normalized.parse::<chrono::NaiveDateTime>().is_ok();
    if !parses {
        return Err(ValidationError::InvalidTimestampFormat);
    }

    Ok(DeviceStatus {
        device_id,
        timestamp: timestamp.to_string(),
        battery_level,
        rssi,
        online,
    })
}
