//! Persistence for Slotbook
//!
//! Provides a database-agnostic client built on SQLx (`Any` driver, SQLite
//! by default; PostgreSQL and MySQL behind features) and the two
//! repositories the booking coordinator needs: the one-time access code
//! ledger and the booking store.
//!
//! Schema bootstrap is a startup concern, not a request-time one: call
//! `init_schema` on both repositories before serving.

pub mod client;
pub mod error;
pub mod repositories;

pub use client::DbClient;
pub use error::DbError;
pub use repositories::{
    AccessCodeLedger, Booking, BookingStore, NewBooking, SqlAccessCodeLedger, SqlBookingStore,
};
