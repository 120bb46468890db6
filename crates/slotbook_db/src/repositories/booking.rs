//! Booking store
//!
//! Booking requests and their confirmation state. A booking is created
//! pending, confirmed one-way by an admin, or deleted outright; name, email
//! and slot never change after insert.

use crate::error::DbError;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A persisted booking request.
///
/// `slot` is always UTC, whatever time zone the requester picked for
/// display. Deletion removes the row, so "deleted" has no representation
/// here.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Booking {
    pub id: i64,
    pub access_code: String,
    pub name: String,
    pub email: String,
    pub slot: DateTime<Utc>,
    pub confirmed: bool,
}

/// The fields a new booking is created from; id is assigned by the store.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NewBooking {
    pub access_code: String,
    pub name: String,
    pub email: String,
    pub slot: DateTime<Utc>,
}

/// Store of booking rows.
///
/// No uniqueness on slot: two pending requests for the same instant may
/// coexist, the admin confirm step is the conflict gate.
pub trait BookingStore: Send + Sync {
    /// Create the bookings table if it does not exist.
    fn init_schema(&self) -> impl std::future::Future<Output = Result<(), DbError>> + Send;

    /// Insert a pending booking, returning its assigned id.
    fn insert(
        &self,
        booking: NewBooking,
    ) -> impl std::future::Future<Output = Result<i64, DbError>> + Send;

    /// All pending bookings, ordered by id.
    fn list_pending(
        &self,
    ) -> impl std::future::Future<Output = Result<Vec<Booking>, DbError>> + Send;

    /// Flip a booking to confirmed. Returns `false` (not an error) when the
    /// id does not exist.
    fn confirm(&self, id: i64) -> impl std::future::Future<Output = Result<bool, DbError>> + Send;

    /// Remove a booking row. Returns `false` (not an error) when the id does
    /// not exist.
    fn delete(&self, id: i64) -> impl std::future::Future<Output = Result<bool, DbError>> + Send;
}
