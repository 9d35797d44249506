use thiserror::Error;

/// Rejection reasons for a submitted status payload. The display text is
/// what the client sees in the `error` field of the response body.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ValidationError {
    #[error("No JSON data provided")]
    MissingPayload,

    #[error("Missing required field: {0}")]
    MissingField(&'static str),

    #[error("device_id must be a non-empty string")]
    InvalidDeviceId,

    #[error("battery_level must be an integer between 0 and 100")]
    InvalidBatteryLevel,

    #[error("rssi must be an integer")]
    InvalidRssi,

    #[error("online must be a boolean")]
    InvalidOnlineType,

    #[error("timestamp must be in ISO 8601 format")]
    InvalidTimestampFormat,
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum AuthError {
    #[error("Missing API key header (X-API-Key)")]
    MissingKey,

    #[error("Invalid API key")]
    InvalidKey,
}

#[derive(Debug, Error)]
pub enum Error {
    #[error(transparent)]
    Validation(#[from] ValidationError),

    #[error(transparent)]
    Auth(#[from] AuthError),

    #[error("Device not found")]
    NotFound,

    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("Database migration error: {0}")]
    Migration(#[from] sqlx::migrate::MigrateError),
}

pub type Result<T> = std::result::Result<T, Error>;
