// crates/slotbook_booking/src/workflow.rs
//! The booking workflow: access-code gate, slot lookup, booking creation
//! and the admin review actions.
//!
//! The workflow is generic over its persistence traits and talks to the
//! calendar and the mailer through the object-safe service traits, so tests
//! run it against in-memory fakes.

use crate::slots::{generate_slots, slots_on_date, window_end, SlotGrid};
use chrono::{DateTime, Duration, NaiveDate, Utc};
use chrono_tz::Tz;
use slotbook_common::services::{
    BookingNotice, BoxedError, BusyTimeSource, NotificationKind, Notifier,
};
use slotbook_common::CoreError;
use slotbook_config::{NotificationConfig, SchedulingConfig};
use slotbook_db::{AccessCodeLedger, Booking, BookingStore, DbError, NewBooking};
use std::sync::Arc;
use thiserror::Error;
use tracing::{debug, info, warn};
use validator::ValidateEmail;

#[derive(Error, Debug)]
pub enum WorkflowError {
    #[error("invalid {field}: {reason}")]
    InvalidInput { field: &'static str, reason: String },

    #[error("upstream unavailable during {operation}: {message}")]
    Upstream {
        operation: &'static str,
        message: String,
    },

    #[error("persistence failure during {operation}: {source}")]
    Persistence {
        operation: &'static str,
        #[source]
        source: DbError,
    },
}

impl WorkflowError {
    fn invalid(field: &'static str, reason: impl Into<String>) -> Self {
        WorkflowError::InvalidInput {
            field,
            reason: reason.into(),
        }
    }

    fn persistence(operation: &'static str) -> impl FnOnce(DbError) -> Self {
        move |source| WorkflowError::Persistence { operation, source }
    }
}

impl From<WorkflowError> for CoreError {
    fn from(err: WorkflowError) -> Self {
        match err {
            WorkflowError::InvalidInput { field, reason } => {
                CoreError::InvalidInput(format!("{field}: {reason}"))
            }
            WorkflowError::Upstream { operation, message } => CoreError::UpstreamUnavailable {
                operation: operation.to_string(),
                message,
            },
            WorkflowError::Persistence { operation, source } => CoreError::PersistenceFailure {
                operation: operation.to_string(),
                message: source.to_string(),
            },
        }
    }
}

/// Proof that an access code was verified and consumed.
///
/// Only `begin_session` hands these out, so holding one means the gate was
/// passed in this process.
#[derive(Debug, Clone)]
pub struct SessionContext {
    access_code: String,
}

impl SessionContext {
    pub fn access_code(&self) -> &str {
        &self.access_code
    }
}

/// Parameters for a slot listing.
#[derive(Debug, Clone, Copy)]
pub struct SlotQuery {
    /// Time zone the slots are generated and returned in.
    pub time_zone: Tz,
    /// When set, only slots on this local calendar date are returned.
    pub on_date: Option<NaiveDate>,
}

/// A booking request as entered by the requester.
#[derive(Debug, Clone)]
pub struct BookingRequest {
    pub name: String,
    pub email: String,
    /// The chosen slot, carrying the requester's time zone.
    pub slot: DateTime<Tz>,
}

pub struct BookingWorkflow<L, S> {
    ledger: L,
    store: S,
    busy_source: Arc<dyn BusyTimeSource<Error = BoxedError>>,
    notifier: Option<Arc<dyn Notifier<Error = BoxedError>>>,
    scheduling: SchedulingConfig,
    notifications: Option<NotificationConfig>,
    calendar_id: String,
}

impl<L, S> BookingWorkflow<L, S>
where
    L: AccessCodeLedger,
    S: BookingStore,
{
    pub fn new(
        ledger: L,
        store: S,
        busy_source: Arc<dyn BusyTimeSource<Error = BoxedError>>,
        notifier: Option<Arc<dyn Notifier<Error = BoxedError>>>,
        scheduling: SchedulingConfig,
        notifications: Option<NotificationConfig>,
        calendar_id: String,
    ) -> Self {
        BookingWorkflow {
            ledger,
            store,
            busy_source,
            notifier,
            scheduling,
            notifications,
            calendar_id,
        }
    }

    /// Checks whether a code would be accepted, without consuming it.
    pub async fn check_code(&self, code: &str) -> Result<bool, WorkflowError> {
        self.ledger
            .verify(code.trim())
            .await
            .map_err(WorkflowError::persistence("verify access code"))
    }

    /// Verifies an access code and consumes it, opening a booking session.
    ///
    /// Codes are single use. Unknown and already-used codes are rejected with
    /// the same error so callers cannot tell which codes exist.
    pub async fn begin_session(&self, code: &str) -> Result<SessionContext, WorkflowError> {
        let code = code.trim();
        let valid = self
            .ledger
            .verify(code)
            .await
            .map_err(WorkflowError::persistence("verify access code"))?;
        if !valid {
            debug!("Access code rejected");
            return Err(WorkflowError::invalid(
                "access_code",
                "invalid or already used access code",
            ));
        }
        self.ledger
            .consume(code)
            .await
            .map_err(WorkflowError::persistence("consume access code"))?;
        info!("Access code accepted, booking session opened");
        Ok(SessionContext {
            access_code: code.to_string(),
        })
    }

    /// Lists bookable slots in the requester's time zone.
    ///
    /// Queries the calendar for busy periods over the rolling window and
    /// generates the grid against them. Failures of the calendar are fatal
    /// for the request; slots must never be offered blind.
    pub async fn available_slots(
        &self,
        query: &SlotQuery,
    ) -> Result<Vec<DateTime<Tz>>, WorkflowError> {
        let now = Utc::now();
        let start = now.with_timezone(&query.time_zone);
        let end = window_end(start, self.scheduling.window_days);

        // The last window date is offered in full, so the busy query has to
        // reach past the end instant to cover that whole day.
        let busy_horizon = (end + Duration::days(1)).with_timezone(&Utc);
        let busy = self
            .busy_source
            .busy_periods(&self.calendar_id, now, busy_horizon)
            .await
            .map_err(|e| WorkflowError::Upstream {
                operation: "free/busy query",
                message: e.to_string(),
            })?;
        debug!(busy_periods = busy.len(), "Fetched busy periods");

        let grid = SlotGrid::from_scheduling(&self.scheduling);
        let slots = generate_slots(start, end, &grid, &busy, now)
            .map_err(|e| WorkflowError::invalid("slot grid", e.to_string()))?;

        Ok(match query.on_date {
            Some(date) => slots_on_date(slots, date),
            None => slots,
        })
    }

    /// Records a pending booking for a verified session.
    ///
    /// The chosen slot is re-checked against a fresh slot listing, so a slot
    /// that was taken between display and submission is rejected rather than
    /// double-booked. Notifications are best effort and never fail the
    /// booking.
    pub async fn create_booking(
        &self,
        session: &SessionContext,
        request: BookingRequest,
    ) -> Result<Booking, WorkflowError> {
        let name = request.name.trim();
        if name.is_empty() {
            return Err(WorkflowError::invalid("name", "name must not be empty"));
        }

        let email = request.email.trim().to_lowercase();
        if !email.validate_email() {
            return Err(WorkflowError::invalid(
                "email",
                format!("'{}' is not a valid email address", request.email.trim()),
            ));
        }

        let tz = request.slot.timezone();
        let offered = self
            .available_slots(&SlotQuery {
                time_zone: tz,
                on_date: Some(request.slot.date_naive()),
            })
            .await?;
        let slot_utc = request.slot.with_timezone(&Utc);
        if !offered.iter().any(|s| s.with_timezone(&Utc) == slot_utc) {
            return Err(WorkflowError::invalid(
                "slot",
                format!(
                    "{} is not an available slot",
                    request.slot.format("%Y-%m-%d %H:%M %Z")
                ),
            ));
        }

        let id = self
            .store
            .insert(NewBooking {
                access_code: session.access_code().to_string(),
                name: name.to_string(),
                email: email.clone(),
                slot: slot_utc,
            })
            .await
            .map_err(WorkflowError::persistence("insert booking"))?;
        info!(booking_id = id, "Booking recorded as pending");

        self.dispatch_notices(name, &email, &request.slot).await;

        Ok(Booking {
            id,
            access_code: session.access_code().to_string(),
            name: name.to_string(),
            email,
            slot: slot_utc,
            confirmed: false,
        })
    }

    /// Sends the requester acknowledgement and the admin alert.
    ///
    /// Each delivery is attempted independently; a failed send is logged and
    /// otherwise ignored since the booking is already persisted.
    async fn dispatch_notices(&self, name: &str, email: &str, slot: &DateTime<Tz>) {
        let Some(notifier) = &self.notifier else {
            debug!("No notifier configured, skipping booking notices");
            return;
        };

        let slot_local = slot.format("%Y-%m-%d %H:%M").to_string();
        let time_zone = slot.timezone().name().to_string();

        let mut notices = vec![BookingNotice {
            kind: NotificationKind::RequesterAck,
            recipient: email.to_string(),
            requester_name: name.to_string(),
            requester_email: email.to_string(),
            slot_local: slot_local.clone(),
            time_zone: time_zone.clone(),
        }];
        match &self.notifications {
            Some(cfg) => notices.push(BookingNotice {
                kind: NotificationKind::AdminAlert,
                recipient: cfg.admin_email.clone(),
                requester_name: name.to_string(),
                requester_email: email.to_string(),
                slot_local,
                time_zone,
            }),
            None => warn!("No admin recipient configured, skipping admin alert"),
        }

        for notice in notices {
            let kind = notice.kind;
            match notifier.send(notice).await {
                Ok(result) => {
                    debug!(?kind, status = %result.status, "Booking notice delivered")
                }
                Err(e) => warn!(?kind, "Failed to deliver booking notice: {}", e),
            }
        }
    }

    /// All bookings awaiting an admin decision, oldest first.
    pub async fn pending_bookings(&self) -> Result<Vec<Booking>, WorkflowError> {
        self.store
            .list_pending()
            .await
            .map_err(WorkflowError::persistence("list pending bookings"))
    }

    /// Marks a booking confirmed. Repeating the call, or confirming an id
    /// that no longer exists, is a no-op.
    pub async fn confirm_booking(&self, id: i64) -> Result<(), WorkflowError> {
        let changed = self
            .store
            .confirm(id)
            .await
            .map_err(WorkflowError::persistence("confirm booking"))?;
        if changed {
            info!(booking_id = id, "Booking confirmed");
        } else {
            debug!(booking_id = id, "Confirm was a no-op");
        }
        Ok(())
    }

    /// Deletes a booking. Deleting an unknown id is a no-op.
    pub async fn delete_booking(&self, id: i64) -> Result<(), WorkflowError> {
        let removed = self
            .store
            .delete(id)
            .await
            .map_err(WorkflowError::persistence("delete booking"))?;
        if removed {
            info!(booking_id = id, "Booking deleted");
        } else {
            debug!(booking_id = id, "Delete was a no-op");
        }
        Ok(())
    }
}
