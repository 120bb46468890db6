// crates/slotbook_booking/src/slots.rs
//! Deterministic generation of bookable time slots.
//!
//! Slots are produced on a fixed grid (whole days, working hours, a minute
//! interval) in the requester's time zone, then filtered to keep only slots
//! that lie strictly in the future and do not overlap any busy period from
//! the calendar. All comparisons happen in UTC; the grid itself is laid out
//! in local wall-clock time so "09:00" means 09:00 wherever the requester is.

use chrono::{DateTime, Duration, NaiveDate, TimeZone, Utc};
use chrono_tz::Tz;
use slotbook_common::services::BusyPeriod;
use slotbook_config::SchedulingConfig;
use thiserror::Error;

/// The wall-clock grid slots are generated on.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SlotGrid {
    /// First hour of the day that may hold a slot (inclusive).
    pub start_hour: u32,
    /// Hour at which slot generation stops (exclusive).
    pub end_hour: u32,
    /// Minutes between consecutive slots within an hour.
    pub interval_minutes: u32,
}

impl SlotGrid {
    pub fn from_scheduling(cfg: &SchedulingConfig) -> Self {
        SlotGrid {
            start_hour: cfg.start_hour,
            end_hour: cfg.end_hour,
            interval_minutes: cfg.interval_minutes,
        }
    }

    /// Rejects grids that cannot produce a well-formed schedule.
    ///
    /// The interval must divide the hour evenly so slot minutes repeat
    /// identically every hour, and the working window must be non-empty.
    pub fn validate(&self) -> Result<(), SlotGridError> {
        if self.interval_minutes == 0
            || self.interval_minutes > 60
            || 60 % self.interval_minutes != 0
        {
            return Err(SlotGridError::InvalidInterval(self.interval_minutes));
        }
        if self.start_hour >= self.end_hour || self.end_hour > 24 {
            return Err(SlotGridError::InvalidHours {
                start: self.start_hour,
                end: self.end_hour,
            });
        }
        Ok(())
    }
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum SlotGridError {
    #[error("interval_minutes must be between 1 and 60 and divide 60 evenly, got {0}")]
    InvalidInterval(u32),
    #[error("start_hour ({start}) must be below end_hour ({end}), with end_hour at most 24")]
    InvalidHours { start: u32, end: u32 },
}

/// Generates all bookable slots between `window_start` and `window_end`.
///
/// Every calendar date touched by the window contributes a full day of grid
/// positions, the last date included; candidates are then dropped when they
/// are not strictly after `now` or when they fall inside a busy period. Busy
/// periods are treated as half-open intervals, so a slot starting exactly
/// when a busy period ends is kept. Wall-clock times that do not exist or
/// are ambiguous in the given time zone (daylight-saving transitions) are
/// skipped.
///
/// The result is sorted chronologically.
pub fn generate_slots(
    window_start: DateTime<Tz>,
    window_end: DateTime<Tz>,
    grid: &SlotGrid,
    busy_periods: &[BusyPeriod],
    now: DateTime<Utc>,
) -> Result<Vec<DateTime<Tz>>, SlotGridError> {
    grid.validate()?;

    let tz = window_start.timezone();

    let mut slots = Vec::new();
    let mut day = window_start.date_naive();
    let last_day = window_end.date_naive();

    while day <= last_day {
        for hour in grid.start_hour..grid.end_hour {
            let mut minute = 0;
            while minute < 60 {
                if let Some(naive) = day.and_hms_opt(hour, minute, 0) {
                    // `single` drops candidates that fall into a DST gap or
                    // an ambiguous fold; a skipped slot beats a wrong one.
                    if let Some(slot) = tz.from_local_datetime(&naive).single() {
                        let slot_utc = slot.with_timezone(&Utc);
                        if slot_utc > now
                            && !busy_periods.iter().any(|p| p.contains(slot_utc))
                        {
                            slots.push(slot);
                        }
                    }
                }
                minute += grid.interval_minutes;
            }
        }
        day = match day.succ_opt() {
            Some(next) => next,
            None => break,
        };
    }

    slots.sort_unstable_by_key(|s| s.with_timezone(&Utc));
    Ok(slots)
}

/// Keeps only slots falling on the given local calendar date.
pub fn slots_on_date(slots: Vec<DateTime<Tz>>, date: NaiveDate) -> Vec<DateTime<Tz>> {
    slots
        .into_iter()
        .filter(|s| s.date_naive() == date)
        .collect()
}

/// The end of the booking window, `window_days` days after `start`.
pub fn window_end(start: DateTime<Tz>, window_days: i64) -> DateTime<Tz> {
    start + Duration::days(window_days)
}
