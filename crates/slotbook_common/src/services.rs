// --- File: crates/slotbook_common/src/services.rs ---
//! Service abstractions for external collaborators.
//!
//! The booking workflow never talks to a calendar provider or a mail gateway
//! directly; it goes through the traits defined here. That keeps the core
//! logic testable with doubles and lets the backend decide at startup which
//! concrete implementations to wire in.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::error::Error as StdError;
use std::fmt;
use std::future::Future;
use std::pin::Pin;
use std::sync::Arc;

/// Type alias for a boxed future that returns a Result
pub type BoxFuture<'a, T, E> = Pin<Box<dyn Future<Output = Result<T, E>> + Send + 'a>>;

/// A wrapper error type that implements std::error::Error for
/// Box<dyn std::error::Error + Send + Sync>
#[derive(Debug)]
pub struct BoxedError(pub Box<dyn StdError + Send + Sync>);

impl fmt::Display for BoxedError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl StdError for BoxedError {
    fn source(&self) -> Option<&(dyn StdError + 'static)> {
        self.0.source()
    }
}

impl From<Box<dyn StdError + Send + Sync>> for BoxedError {
    fn from(err: Box<dyn StdError + Send + Sync>) -> Self {
        BoxedError(err)
    }
}

/// An externally sourced interval during which no slot may be offered.
///
/// Half-open: an instant equal to `start` is busy, an instant equal to `end`
/// is free again.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct BusyPeriod {
    pub start: DateTime<Utc>,
    pub end: DateTime<Utc>,
}

impl BusyPeriod {
    pub fn new(start: DateTime<Utc>, end: DateTime<Utc>) -> Self {
        Self { start, end }
    }

    /// Half-open containment check: `[start, end)`.
    pub fn contains(&self, instant: DateTime<Utc>) -> bool {
        self.start <= instant && instant < self.end
    }
}

/// A trait for busy-time providers.
///
/// One calendar resource, one query window, an ordered set of busy periods
/// back. Errors must propagate to the caller: a generation pass that cannot
/// see the calendar must fail rather than offer every slot as free.
pub trait BusyTimeSource: Send + Sync {
    /// Error type returned by busy-time queries.
    type Error: StdError + Send + Sync + 'static;

    /// Get busy intervals for `calendar_id` within `[window_start, window_end]`.
    fn busy_periods(
        &self,
        calendar_id: &str,
        window_start: DateTime<Utc>,
        window_end: DateTime<Utc>,
    ) -> BoxFuture<'_, Vec<BusyPeriod>, Self::Error>;
}

/// Which template a notification renders.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum NotificationKind {
    /// "Your request was received and is pending approval" to the requester.
    RequesterAck,
    /// "New booking request" to the admin recipient.
    AdminAlert,
}

/// Context handed to the notifier alongside the template kind.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BookingNotice {
    pub kind: NotificationKind,
    pub recipient: String,
    pub requester_name: String,
    pub requester_email: String,
    /// The chosen slot rendered in the requester's display time zone.
    pub slot_local: String,
    /// IANA name of that display time zone.
    pub time_zone: String,
}

/// Represents the result of a notification attempt.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NotificationResult {
    /// Provider-side message id, when one was assigned.
    pub message_id: Option<String>,
    pub status: String,
}

/// A trait for notification delivery.
///
/// Delivery is best-effort from the workflow's point of view: a failed send
/// is reported back but must never undo a persisted booking.
pub trait Notifier: Send + Sync {
    /// Error type returned by delivery attempts.
    type Error: StdError + Send + Sync + 'static;

    /// Attempt delivery of one notice.
    fn send(&self, notice: BookingNotice) -> BoxFuture<'_, NotificationResult, Self::Error>;
}

/// A factory for creating service instances.
///
/// The backend builds one of these at startup; handlers and the workflow get
/// the collaborators from it instead of constructing clients themselves.
pub trait ServiceFactory: Send + Sync {
    /// Get the busy-time source, if one is configured.
    fn busy_time_source(&self) -> Option<Arc<dyn BusyTimeSource<Error = BoxedError>>>;

    /// Get the notifier, if one is configured.
    fn notifier(&self) -> Option<Arc<dyn Notifier<Error = BoxedError>>>;
}
