// --- File: crates/services/slotbook_backend/src/service_factory.rs ---
//! Service factory implementation.
//!
//! Builds the concrete Google-backed collaborators at startup and hands them
//! out behind the service traits with their errors boxed, so nothing above
//! this module depends on the Google crates.

use slotbook_common::services::{
    BookingNotice, BoxFuture, BoxedError, BusyPeriod, BusyTimeSource, NotificationResult,
    Notifier, ServiceFactory,
};
use slotbook_config::AppConfig;
use slotbook_google::{
    create_calendar_hub, create_gmail_hub, GmailNotifier, GoogleBusyTimeSource,
};
use std::sync::Arc;
use std::time::Duration;
use tracing::{error, info, warn};

/// Adapter boxing [`GoogleBusyTimeSource`] errors into [`BoxedError`].
struct BoxedBusyTimeSource(GoogleBusyTimeSource);

impl BusyTimeSource for BoxedBusyTimeSource {
    type Error = BoxedError;

    fn busy_periods(
        &self,
        calendar_id: &str,
        window_start: chrono::DateTime<chrono::Utc>,
        window_end: chrono::DateTime<chrono::Utc>,
    ) -> BoxFuture<'_, Vec<BusyPeriod>, Self::Error> {
        let fut = self.0.busy_periods(calendar_id, window_start, window_end);
        Box::pin(async move { fut.await.map_err(|e| BoxedError(Box::new(e))) })
    }
}

/// Adapter boxing [`GmailNotifier`] errors into [`BoxedError`].
struct BoxedNotifier(GmailNotifier);

impl Notifier for BoxedNotifier {
    type Error = BoxedError;

    fn send(&self, notice: BookingNotice) -> BoxFuture<'_, NotificationResult, Self::Error> {
        let fut = self.0.send(notice);
        Box::pin(async move { fut.await.map_err(|e| BoxedError(Box::new(e))) })
    }
}

/// The backend's [`ServiceFactory`].
///
/// Initialized once at startup from the loaded configuration. When `use_gcal`
/// is off, or the Google clients cannot be built, the corresponding service
/// stays `None` and the caller decides whether that is fatal.
pub struct SlotbookServiceFactory {
    busy_time_source: Option<Arc<dyn BusyTimeSource<Error = BoxedError>>>,
    notifier: Option<Arc<dyn Notifier<Error = BoxedError>>>,
}

impl SlotbookServiceFactory {
    pub async fn new(config: Arc<AppConfig>) -> Self {
        let mut factory = Self {
            busy_time_source: None,
            notifier: None,
        };

        if !config.use_gcal {
            info!("Google integration disabled (use_gcal = false)");
            return factory;
        }
        let Some(gcal_config) = config.gcal.as_ref() else {
            warn!("use_gcal is set but the [gcal] section is missing");
            return factory;
        };

        let timeout = Duration::from_secs(config.scheduling.upstream_timeout_secs);

        info!("Initializing Google Calendar client...");
        match create_calendar_hub(gcal_config).await {
            Ok(hub) => {
                let service = GoogleBusyTimeSource::new(Arc::new(hub), timeout);
                factory.busy_time_source = Some(Arc::new(BoxedBusyTimeSource(service)));
                info!("Google Calendar client initialized");
            }
            Err(e) => {
                error!("Failed to initialize Google Calendar client: {}", e);
            }
        }

        info!("Initializing Gmail client...");
        match create_gmail_hub(gcal_config).await {
            Ok(hub) => {
                let sender_name = config
                    .notifications
                    .as_ref()
                    .and_then(|n| n.sender_name.clone());
                let service = GmailNotifier::new(Arc::new(hub), timeout, sender_name);
                factory.notifier = Some(Arc::new(BoxedNotifier(service)));
                info!("Gmail client initialized");
            }
            Err(e) => {
                // Bookings still work without mail, so this is not fatal.
                warn!("Failed to initialize Gmail client: {}", e);
            }
        }

        factory
    }
}

impl ServiceFactory for SlotbookServiceFactory {
    fn busy_time_source(&self) -> Option<Arc<dyn BusyTimeSource<Error = BoxedError>>> {
        self.busy_time_source.clone()
    }

    fn notifier(&self) -> Option<Arc<dyn Notifier<Error = BoxedError>>> {
        self.notifier.clone()
    }
}
