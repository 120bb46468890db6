// --- File: crates/slotbook_google/src/calendar.rs ---
//! Google Calendar busy-time source.
//!
//! Implements [`BusyTimeSource`] with the free/busy API. Every call carries
//! a bounded timeout: a stalled calendar upstream surfaces as an error
//! instead of hanging the request, and the caller decides whether to retry.

use chrono::{DateTime, Utc};
use google_calendar3::api::{FreeBusyRequest, FreeBusyRequestItem};
use slotbook_common::services::{BoxFuture, BusyPeriod, BusyTimeSource};
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, warn};

use crate::auth::CalendarHubType;
use crate::error::GoogleApiError;

/// Busy-time source backed by the Google Calendar free/busy query.
pub struct GoogleBusyTimeSource {
    calendar_hub: Arc<CalendarHubType>,
    timeout: Duration,
}

impl GoogleBusyTimeSource {
    pub fn new(calendar_hub: Arc<CalendarHubType>, timeout: Duration) -> Self {
        Self {
            calendar_hub,
            timeout,
        }
    }
}

impl BusyTimeSource for GoogleBusyTimeSource {
    type Error = GoogleApiError;

    fn busy_periods(
        &self,
        calendar_id: &str,
        window_start: DateTime<Utc>,
        window_end: DateTime<Utc>,
    ) -> BoxFuture<'_, Vec<BusyPeriod>, Self::Error> {
        const OPERATION: &str = "free/busy query";

        let calendar_id = calendar_id.to_string();
        let calendar_hub = self.calendar_hub.clone();
        let timeout = self.timeout;

        Box::pin(async move {
            let req = FreeBusyRequest {
                time_min: Some(window_start),
                time_max: Some(window_end),
                time_zone: Some("UTC".to_string()),
                items: Some(vec![FreeBusyRequestItem {
                    id: Some(calendar_id.clone()),
                    ..Default::default()
                }]),
                ..Default::default()
            };

            debug!(
                "Querying free/busy for {} in [{}, {}]",
                calendar_id, window_start, window_end
            );

            let query = calendar_hub.freebusy().query(req).doit();
            let (_response, freebusy_response) = tokio::time::timeout(timeout, query)
                .await
                .map_err(|_| GoogleApiError::Timeout {
                    operation: OPERATION,
                    timeout,
                })?
                .map_err(|e| GoogleApiError::api(OPERATION, e))?;

            let mut busy_periods = Vec::new();

            if let Some(calendars) = freebusy_response.calendars {
                if let Some(cal_info) = calendars.get(&calendar_id) {
                    if let Some(busy_times) = &cal_info.busy {
                        for period in busy_times {
                            if let (Some(start), Some(end)) = (period.start, period.end) {
                                busy_periods.push(BusyPeriod::new(start, end));
                            } else {
                                warn!(
                                    "Skipping busy period with missing start/end: {:?}",
                                    period
                                );
                            }
                        }
                    }
                }
            }

            // Sort busy periods for easier processing downstream
            busy_periods.sort_by_key(|p| p.start);

            debug!("{} busy periods for {}", busy_periods.len(), calendar_id);
            Ok(busy_periods)
        })
    }
}
