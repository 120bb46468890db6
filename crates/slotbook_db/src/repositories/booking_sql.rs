//! SQL implementation of the booking store

use crate::error::DbError;
use crate::repositories::booking::{Booking, BookingStore, NewBooking};
use crate::DbClient;
use chrono::{DateTime, SecondsFormat, Utc};
use sqlx::Row;
use tracing::{debug, error, info};

/// SQL-backed booking store
///
/// The slot column is RFC 3339 text in UTC: the SQLx `Any` driver cannot
/// decode native datetime columns, and text keeps the row portable across
/// backends.
#[derive(Debug, Clone)]
pub struct SqlBookingStore {
    db_client: DbClient,
}

impl SqlBookingStore {
    pub fn new(db_client: DbClient) -> Self {
        Self { db_client }
    }

    fn encode_slot(slot: DateTime<Utc>) -> String {
        slot.to_rfc3339_opts(SecondsFormat::Secs, true)
    }

    fn decode_slot(raw: &str) -> Result<DateTime<Utc>, DbError> {
        DateTime::parse_from_rfc3339(raw)
            .map(|dt| dt.with_timezone(&Utc))
            .map_err(|e| DbError::CorruptRow(format!("booking slot '{raw}': {e}")))
    }

    fn row_to_booking(row: &sqlx::any::AnyRow) -> Result<Booking, DbError> {
        let raw_slot: String = row
            .try_get("slot")
            .map_err(|e| DbError::QueryError(e.to_string()))?;
        Ok(Booking {
            id: row
                .try_get("id")
                .map_err(|e| DbError::QueryError(e.to_string()))?,
            access_code: row.try_get("access_code").unwrap_or_default(),
            name: row.try_get("name").unwrap_or_default(),
            email: row.try_get("email").unwrap_or_default(),
            slot: Self::decode_slot(&raw_slot)?,
            confirmed: row.try_get::<i32, _>("confirmed").unwrap_or(0) != 0,
        })
    }
}

impl BookingStore for SqlBookingStore {
    async fn init_schema(&self) -> Result<(), DbError> {
        debug!("Initializing bookings schema");

        let query = r#"
            CREATE TABLE IF NOT EXISTS bookings (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                access_code TEXT,
                name TEXT NOT NULL,
                email TEXT NOT NULL,
                slot TEXT NOT NULL,
                confirmed INTEGER NOT NULL DEFAULT 0,
                FOREIGN KEY(access_code) REFERENCES access_codes(code)
            )
        "#;

        self.db_client.execute(query).await?;

        info!("bookings schema initialized");
        Ok(())
    }

    async fn insert(&self, booking: NewBooking) -> Result<i64, DbError> {
        debug!("Inserting pending booking for slot {}", booking.slot);

        let query = r#"
            INSERT INTO bookings (access_code, name, email, slot, confirmed)
            VALUES ($1, $2, $3, $4, 0)
            RETURNING id
        "#;

        let row = sqlx::query(query)
            .bind(&booking.access_code)
            .bind(&booking.name)
            .bind(&booking.email)
            .bind(Self::encode_slot(booking.slot))
            .fetch_one(self.db_client.pool())
            .await
            .map_err(|e| {
                error!("Failed to insert booking: {}", e);
                DbError::QueryError(e.to_string())
            })?;

        let id: i64 = row
            .try_get("id")
            .map_err(|e| DbError::QueryError(e.to_string()))?;

        info!("Booking {} inserted (pending)", id);
        Ok(id)
    }

    async fn list_pending(&self) -> Result<Vec<Booking>, DbError> {
        let query = r#"
            SELECT id, access_code, name, email, slot, confirmed
            FROM bookings
            WHERE confirmed = 0
            ORDER BY id
        "#;

        let rows = sqlx::query(query)
            .fetch_all(self.db_client.pool())
            .await
            .map_err(|e| {
                error!("Failed to list pending bookings: {}", e);
                DbError::QueryError(e.to_string())
            })?;

        rows.iter().map(Self::row_to_booking).collect()
    }

    async fn confirm(&self, id: i64) -> Result<bool, DbError> {
        let result = sqlx::query("UPDATE bookings SET confirmed = 1 WHERE id = $1")
            .bind(id)
            .execute(self.db_client.pool())
            .await
            .map_err(|e| {
                error!("Failed to confirm booking {}: {}", id, e);
                DbError::QueryError(e.to_string())
            })?;

        if result.rows_affected() == 0 {
            debug!("Confirm was a no-op: booking {} not found", id);
            return Ok(false);
        }
        info!("Booking {} confirmed", id);
        Ok(true)
    }

    async fn delete(&self, id: i64) -> Result<bool, DbError> {
        let result = sqlx::query("DELETE FROM bookings WHERE id = $1")
            .bind(id)
            .execute(self.db_client.pool())
            .await
            .map_err(|e| {
                error!("Failed to delete booking {}: {}", id, e);
                DbError::QueryError(e.to_string())
            })?;

        if result.rows_affected() == 0 {
            debug!("Delete was a no-op: booking {} not found", id);
            return Ok(false);
        }
        info!("Booking {} deleted", id);
        Ok(true)
    }
}
