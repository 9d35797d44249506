use std::time::Duration;

use chrono::Utc;
use sqlx::sqlite::{SqlitePool, SqlitePoolOptions};
use tracing::info;

use crate::errors::Result;
use crate::model::{DeviceStatus, DeviceSummary};

/// Persisted set of latest-per-device status records.
///
/// Holds exactly one row per device id; every successful write fully
/// replaces the previous row. Storage failures surface as
/// `Error::Database` with no retry here; retry policy belongs to callers.
#[derive(Debug, Clone)]
pub struct StatusStore {
    pool: SqlitePool,
}

impl StatusStore {
    /// Opens the database and brings the schema up to date.
    pub async fn connect(database_url: &str) -> Result<Self> {
        info!("Connecting to database...");
        let pool = SqlitePoolOptions::new()
            .max_connections(5)
            .acquire_timeout(Duration::from_secs(10))
            .connect(database_url)
            .await?;

        info!("Running database migrations...");
        sqlx::migrate!("./migrations").run(&pool).await?;
        info!("Database ready");

        Ok(Self { pool })
    }

    /// Inserts or fully replaces the record for `status.device_id`.
    ///
    /// `recorded_at` is stamped with the current UTC time; the
    /// caller-supplied timestamp is stored verbatim. The single conditional
    /// write keeps replacement atomic per key, so readers never observe a
    /// torn record.
    pub async fn upsert(&self, status: &DeviceStatus) -> Result<()> {
        let recorded_at = Utc::now().to_rfc3339();

        sqlx::query(
            r#"
            INSERT INTO device_status (device_id, timestamp, battery_level, rssi, online, recorded_at)
            VALUES (?1, ?2, ?3, ?4, ?5, ?6)
            ON CONFLICT(device_id) DO UPDATE SET
                timestamp = excluded.timestamp,
                battery_level = excluded.battery_level,
                rssi = excluded.rssi,
                online = excluded.online,
                recorded_at = excluded.recorded_at
            "#,
        )
        .bind(&status.device_id)
        .bind(&status.timestamp)
        .bind(status.battery_level)
        .bind(status.rssi)
        .bind(status.online)
        .bind(recorded_at)
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    /// Latest record for a device, or `None` if it never reported.
    pub async fn get(&self, device_id: &str) -> Result<Option<DeviceStatus>> {
        let status = sqlx::query_as::<_, DeviceStatus>(
            "SELECT device_id, timestamp, battery_level, rssi, online
             FROM device_status
             WHERE device_id = ?1",
        )
        .bind(device_id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(status)
    }

    /// Summary projection of every device, ordered by device id ascending.
    /// SQLite's default BINARY collation gives byte-order sorting.
    pub async fn list_all(&self) -> Result<Vec<DeviceSummary>> {
        let devices = sqlx::query_as::<_, DeviceSummary>(
            "SELECT device_id, battery_level, online, timestamp AS last_update
             FROM device_status
             ORDER BY device_id ASC",
        )
        .fetch_all(&self.pool)
        .await?;

        Ok(devices)
    }
}
