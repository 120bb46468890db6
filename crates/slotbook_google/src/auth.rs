// File: crates/slotbook_google/src/auth.rs
//! Credential acquisition for the Google collaborators.
//!
//! One service-account key feeds both hubs. Token refresh before expiry is
//! owned by the authenticator, never by the booking core. Each hub is built
//! from its own crate's re-exported connector stack so the generic
//! parameters always line up with the client library that uses them.

use google_calendar3::CalendarHub;
use google_gmail1::Gmail;
use slotbook_config::GcalConfig;
use std::{error::Error, path::Path};

// Type aliases for clarity
type CalendarConnector = google_calendar3::hyper_rustls::HttpsConnector<
    google_calendar3::hyper_util::client::legacy::connect::HttpConnector,
>;
type GmailConnector = google_gmail1::hyper_rustls::HttpsConnector<
    google_gmail1::hyper_util::client::legacy::connect::HttpConnector,
>;

pub type CalendarHubType = CalendarHub<CalendarConnector>;
pub type GmailHubType = Gmail<GmailConnector>;

pub async fn create_calendar_hub(
    config: &GcalConfig,
) -> Result<CalendarHubType, Box<dyn Error + Send + Sync>> {
    use google_calendar3::{
        hyper_rustls::HttpsConnectorBuilder,
        hyper_util::client::legacy::Client,
        yup_oauth2::{read_service_account_key, ServiceAccountAuthenticator},
    };

    let key_path = config
        .key_path
        .as_deref()
        .ok_or("Missing key_path in GcalConfig")?;

    let sa_key = read_service_account_key(Path::new(key_path)).await?;

    let auth = ServiceAccountAuthenticator::builder(sa_key).build().await?;

    let https = HttpsConnectorBuilder::new()
        .with_native_roots()?
        .https_or_http()
        .enable_http1()
        .build();

    let client = Client::builder(hyper_util::rt::TokioExecutor::new()).build(https);

    Ok(CalendarHub::new(client, auth))
}

pub async fn create_gmail_hub(
    config: &GcalConfig,
) -> Result<GmailHubType, Box<dyn Error + Send + Sync>> {
    use google_gmail1::{
        hyper_rustls::HttpsConnectorBuilder,
        hyper_util::client::legacy::Client,
        yup_oauth2::{read_service_account_key, ServiceAccountAuthenticator},
    };

    let key_path = config
        .key_path
        .as_deref()
        .ok_or("Missing key_path in GcalConfig")?;

    let sa_key = read_service_account_key(Path::new(key_path)).await?;

    let auth = ServiceAccountAuthenticator::builder(sa_key).build().await?;

    let https = HttpsConnectorBuilder::new()
        .with_native_roots()?
        .https_or_http()
        .enable_http1()
        .build();

    let client = Client::builder(hyper_util::rt::TokioExecutor::new()).build(https);

    Ok(Gmail::new(client, auth))
}
