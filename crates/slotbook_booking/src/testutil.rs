// crates/slotbook_booking/src/testutil.rs
//! In-memory doubles for the persistence traits and the external services,
//! shared by the workflow and HTTP tests.

use chrono::{DateTime, Utc};
use slotbook_common::services::{
    BookingNotice, BoxFuture, BoxedError, BusyPeriod, BusyTimeSource, NotificationResult, Notifier,
};
use slotbook_db::{AccessCodeLedger, Booking, BookingStore, DbError, NewBooking};
use std::collections::HashMap;
use std::sync::atomic::{AtomicI64, Ordering};
use std::sync::{Arc, Mutex};

#[derive(Clone, Default)]
pub(crate) struct MemoryLedger {
    codes: Arc<Mutex<HashMap<String, bool>>>,
}

impl MemoryLedger {
    pub(crate) fn with_codes(codes: &[&str]) -> Self {
        let map = codes.iter().map(|c| (c.to_string(), false)).collect();
        MemoryLedger {
            codes: Arc::new(Mutex::new(map)),
        }
    }
}

impl AccessCodeLedger for MemoryLedger {
    async fn init_schema(&self) -> Result<(), DbError> {
        Ok(())
    }

    async fn insert_code(&self, code: &str) -> Result<bool, DbError> {
        let mut codes = self.codes.lock().unwrap();
        if codes.contains_key(code) {
            return Ok(false);
        }
        codes.insert(code.to_string(), false);
        Ok(true)
    }

    async fn verify(&self, code: &str) -> Result<bool, DbError> {
        Ok(self
            .codes
            .lock()
            .unwrap()
            .get(code)
            .map(|used| !used)
            .unwrap_or(false))
    }

    async fn consume(&self, code: &str) -> Result<(), DbError> {
        if let Some(used) = self.codes.lock().unwrap().get_mut(code) {
            *used = true;
        }
        Ok(())
    }
}

#[derive(Clone, Default)]
pub(crate) struct MemoryStore {
    rows: Arc<Mutex<Vec<Booking>>>,
    next_id: Arc<AtomicI64>,
}

impl MemoryStore {
    pub(crate) fn all(&self) -> Vec<Booking> {
        self.rows.lock().unwrap().clone()
    }
}

impl BookingStore for MemoryStore {
    async fn init_schema(&self) -> Result<(), DbError> {
        Ok(())
    }

    async fn insert(&self, booking: NewBooking) -> Result<i64, DbError> {
        let id = self.next_id.fetch_add(1, Ordering::SeqCst) + 1;
        self.rows.lock().unwrap().push(Booking {
            id,
            access_code: booking.access_code,
            name: booking.name,
            email: booking.email,
            slot: booking.slot,
            confirmed: false,
        });
        Ok(id)
    }

    async fn list_pending(&self) -> Result<Vec<Booking>, DbError> {
        Ok(self
            .rows
            .lock()
            .unwrap()
            .iter()
            .filter(|b| !b.confirmed)
            .cloned()
            .collect())
    }

    async fn confirm(&self, id: i64) -> Result<bool, DbError> {
        let mut rows = self.rows.lock().unwrap();
        match rows.iter_mut().find(|b| b.id == id && !b.confirmed) {
            Some(row) => {
                row.confirmed = true;
                Ok(true)
            }
            None => Ok(false),
        }
    }

    async fn delete(&self, id: i64) -> Result<bool, DbError> {
        let mut rows = self.rows.lock().unwrap();
        let before = rows.len();
        rows.retain(|b| b.id != id);
        Ok(rows.len() < before)
    }
}

pub(crate) struct StaticBusySource {
    pub(crate) periods: Vec<BusyPeriod>,
    pub(crate) fail: bool,
}

impl BusyTimeSource for StaticBusySource {
    type Error = BoxedError;

    fn busy_periods(
        &self,
        _calendar_id: &str,
        _window_start: DateTime<Utc>,
        _window_end: DateTime<Utc>,
    ) -> BoxFuture<'_, Vec<BusyPeriod>, Self::Error> {
        let periods = self.periods.clone();
        let fail = self.fail;
        Box::pin(async move {
            if fail {
                return Err(BoxedError(Box::from("calendar unreachable")));
            }
            Ok(periods)
        })
    }
}

#[derive(Clone, Default)]
pub(crate) struct RecordingNotifier {
    pub(crate) sent: Arc<Mutex<Vec<BookingNotice>>>,
    pub(crate) fail: bool,
}

impl Notifier for RecordingNotifier {
    type Error = BoxedError;

    fn send(&self, notice: BookingNotice) -> BoxFuture<'_, NotificationResult, Self::Error> {
        let sent = Arc::clone(&self.sent);
        let fail = self.fail;
        Box::pin(async move {
            if fail {
                return Err(BoxedError(Box::from("mail gateway down")));
            }
            sent.lock().unwrap().push(notice);
            Ok(NotificationResult {
                message_id: Some("msg-1".to_string()),
                status: "sent".to_string(),
            })
        })
    }
}
