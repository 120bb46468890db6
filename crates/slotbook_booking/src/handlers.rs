// crates/slotbook_booking/src/handlers.rs
//! Axum handlers for the booking API.
//!
//! Handlers parse and render; every decision lives in the workflow. Domain
//! errors cross the boundary as [`CoreError`] so the response shape and
//! status mapping stay uniform across routes.

use crate::workflow::{BookingRequest, BookingWorkflow, SlotQuery};
use axum::{
    extract::{Path, Query, State},
    Json,
};
use chrono::{DateTime, NaiveDate, SecondsFormat};
use chrono_tz::Tz;
use serde::{Deserialize, Serialize};
use slotbook_common::{invalid_input, CoreError};
use slotbook_config::AppConfig;
use slotbook_db::{AccessCodeLedger, Booking, BookingStore};
use std::sync::Arc;
use tracing::debug;

/// Shared state for the booking routes.
pub struct BookingState<L, S> {
    pub config: Arc<AppConfig>,
    pub workflow: Arc<BookingWorkflow<L, S>>,
}

fn parse_time_zone(
    requested: Option<&str>,
    config: &AppConfig,
) -> Result<Tz, CoreError> {
    let name = requested.unwrap_or(config.scheduling.time_zone.as_str());
    name.parse::<Tz>()
        .map_err(|_| invalid_input(format!("'{name}' is not a known IANA time zone")))
}

// --- POST /verify -------------------------------------------------------

#[derive(Deserialize)]
pub struct VerifyRequest {
    pub access_code: String,
}

#[derive(Serialize)]
pub struct VerifyResponse {
    pub valid: bool,
}

/// Non-consuming access code check, used by clients to gate their UI before
/// the code is actually spent on a booking.
pub async fn verify_code_handler<L, S>(
    State(state): State<Arc<BookingState<L, S>>>,
    Json(payload): Json<VerifyRequest>,
) -> Result<Json<VerifyResponse>, CoreError>
where
    L: AccessCodeLedger,
    S: BookingStore,
{
    let valid = state.workflow.check_code(&payload.access_code).await?;
    Ok(Json(VerifyResponse { valid }))
}

// --- GET /slots ---------------------------------------------------------

#[derive(Deserialize)]
pub struct SlotsQueryParams {
    /// IANA time zone name, falls back to the configured default.
    pub time_zone: Option<String>,
    /// Restrict the listing to one local calendar date (YYYY-MM-DD).
    pub date: Option<NaiveDate>,
}

#[derive(Serialize)]
pub struct SlotView {
    /// RFC 3339 timestamp carrying the local offset.
    pub start: String,
    /// Human-readable local time, e.g. "2025-05-06 09:30".
    pub wall_clock: String,
}

#[derive(Serialize)]
pub struct SlotsResponse {
    pub time_zone: String,
    pub slots: Vec<SlotView>,
}

pub async fn list_slots_handler<L, S>(
    State(state): State<Arc<BookingState<L, S>>>,
    Query(params): Query<SlotsQueryParams>,
) -> Result<Json<SlotsResponse>, CoreError>
where
    L: AccessCodeLedger,
    S: BookingStore,
{
    let tz = parse_time_zone(params.time_zone.as_deref(), &state.config)?;
    let slots = state
        .workflow
        .available_slots(&SlotQuery {
            time_zone: tz,
            on_date: params.date,
        })
        .await?;
    debug!(count = slots.len(), time_zone = %tz, "Listed available slots");

    Ok(Json(SlotsResponse {
        time_zone: tz.name().to_string(),
        slots: slots
            .into_iter()
            .map(|s| SlotView {
                start: s.to_rfc3339_opts(SecondsFormat::Secs, false),
                wall_clock: s.format("%Y-%m-%d %H:%M").to_string(),
            })
            .collect(),
    }))
}

// --- POST /book ---------------------------------------------------------

#[derive(Deserialize)]
pub struct BookRequest {
    pub access_code: String,
    pub name: String,
    pub email: String,
    /// The chosen slot as an RFC 3339 timestamp.
    pub slot_start: String,
    /// Display time zone for the confirmation texts. Defaults to the
    /// configured one.
    pub time_zone: Option<String>,
}

#[derive(Serialize)]
pub struct BookResponse {
    pub booking_id: i64,
    pub status: String,
    pub slot_start: String,
}

/// One-shot booking: verifies and consumes the access code, then records the
/// pending booking.
pub async fn book_slot_handler<L, S>(
    State(state): State<Arc<BookingState<L, S>>>,
    Json(payload): Json<BookRequest>,
) -> Result<Json<BookResponse>, CoreError>
where
    L: AccessCodeLedger,
    S: BookingStore,
{
    let tz = parse_time_zone(payload.time_zone.as_deref(), &state.config)?;
    let slot = DateTime::parse_from_rfc3339(&payload.slot_start)
        .map_err(|e| invalid_input(format!("slot_start: {e}")))?
        .with_timezone(&tz);

    let session = state.workflow.begin_session(&payload.access_code).await?;
    let booking = state
        .workflow
        .create_booking(
            &session,
            BookingRequest {
                name: payload.name,
                email: payload.email,
                slot,
            },
        )
        .await?;

    Ok(Json(BookResponse {
        booking_id: booking.id,
        status: "pending".to_string(),
        slot_start: booking.slot.to_rfc3339_opts(SecondsFormat::Secs, true),
    }))
}

// --- Admin routes -------------------------------------------------------

#[derive(Serialize)]
pub struct AdminBookingView {
    pub id: i64,
    pub name: String,
    pub email: String,
    /// RFC 3339 in UTC, the canonical stored form.
    pub slot_start: String,
}

impl From<Booking> for AdminBookingView {
    fn from(b: Booking) -> Self {
        AdminBookingView {
            id: b.id,
            name: b.name,
            email: b.email,
            slot_start: b.slot.to_rfc3339_opts(SecondsFormat::Secs, true),
        }
    }
}

#[derive(Serialize)]
pub struct PendingBookingsResponse {
    pub bookings: Vec<AdminBookingView>,
}

pub async fn list_pending_handler<L, S>(
    State(state): State<Arc<BookingState<L, S>>>,
) -> Result<Json<PendingBookingsResponse>, CoreError>
where
    L: AccessCodeLedger,
    S: BookingStore,
{
    let bookings = state.workflow.pending_bookings().await?;
    Ok(Json(PendingBookingsResponse {
        bookings: bookings.into_iter().map(AdminBookingView::from).collect(),
    }))
}

#[derive(Serialize)]
pub struct AdminActionResponse {
    pub id: i64,
    pub action: String,
}

pub async fn confirm_booking_handler<L, S>(
    State(state): State<Arc<BookingState<L, S>>>,
    Path(id): Path<i64>,
) -> Result<Json<AdminActionResponse>, CoreError>
where
    L: AccessCodeLedger,
    S: BookingStore,
{
    state.workflow.confirm_booking(id).await?;
    Ok(Json(AdminActionResponse {
        id,
        action: "confirmed".to_string(),
    }))
}

pub async fn delete_booking_handler<L, S>(
    State(state): State<Arc<BookingState<L, S>>>,
    Path(id): Path<i64>,
) -> Result<Json<AdminActionResponse>, CoreError>
where
    L: AccessCodeLedger,
    S: BookingStore,
{
    state.workflow.delete_booking(id).await?;
    Ok(Json(AdminActionResponse {
        id,
        action: "deleted".to_string(),
    }))
}
