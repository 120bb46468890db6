// --- File: crates/slotbook_google/src/lib.rs ---
// Declare modules within this crate
pub mod auth;
pub mod calendar;
pub mod error;
pub mod mailer;

pub use auth::{create_calendar_hub, create_gmail_hub, CalendarHubType, GmailHubType};
pub use calendar::GoogleBusyTimeSource;
pub use error::GoogleApiError;
pub use mailer::GmailNotifier;
