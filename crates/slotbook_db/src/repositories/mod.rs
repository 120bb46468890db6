//! Repositories owned by the persistence crate.
//!
//! The access code ledger owns AccessCode rows exclusively; the booking
//! store owns Booking rows exclusively. Everything crosses these boundaries
//! by value.

pub mod access_code;
pub mod access_code_sql;
pub mod booking;
pub mod booking_sql;

pub use access_code::AccessCodeLedger;
pub use access_code_sql::SqlAccessCodeLedger;
pub use booking::{Booking, BookingStore, NewBooking};
pub use booking_sql::SqlBookingStore;
