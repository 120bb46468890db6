// --- File: crates/slotbook_google/src/mailer.rs ---
//! Gmail notifier.
//!
//! Renders the two booking templates and sends them through the Gmail API
//! as base64url-encoded RFC 822 messages from the authenticated account.
//! The workflow treats delivery as best-effort; this type only reports
//! success or failure.

use slotbook_common::services::{
    BookingNotice, BoxFuture, NotificationKind, NotificationResult, Notifier,
};
use std::sync::Arc;
use std::time::Duration;
use tracing::debug;

use crate::auth::GmailHubType;
use crate::error::GoogleApiError;

/// Notifier backed by the Gmail send API.
pub struct GmailNotifier {
    gmail_hub: Arc<GmailHubType>,
    timeout: Duration,
    sender_name: Option<String>,
}

impl GmailNotifier {
    pub fn new(gmail_hub: Arc<GmailHubType>, timeout: Duration, sender_name: Option<String>) -> Self {
        Self {
            gmail_hub,
            timeout,
            sender_name,
        }
    }

    fn render(&self, notice: &BookingNotice) -> (String, String) {
        let signature = self.sender_name.as_deref().unwrap_or("The booking desk");
        match notice.kind {
            NotificationKind::RequesterAck => (
                "Meeting Request Received".to_string(),
                format!(
                    "Hello {},\n\nYour meeting request for {} ({}) has been received \
                     and is pending approval.\n\nBest regards,\n{}",
                    notice.requester_name, notice.slot_local, notice.time_zone, signature
                ),
            ),
            NotificationKind::AdminAlert => (
                "New Booking Request".to_string(),
                format!(
                    "New booking request from {} ({}) for {} ({}).\n\n\
                     Please log in to the admin dashboard to confirm or decline the booking.",
                    notice.requester_name, notice.requester_email, notice.slot_local,
                    notice.time_zone
                ),
            ),
        }
    }

    /// RFC 822 message bytes; the Gmail client base64url-encodes the raw
    /// field on serialization.
    fn build_rfc822(recipient: &str, subject: &str, body: &str) -> Vec<u8> {
        format!(
            "To: {recipient}\r\nFrom: me\r\nSubject: {subject}\r\n\
             Content-Type: text/plain; charset=\"utf-8\"\r\n\r\n{body}"
        )
        .into_bytes()
    }
}

impl Notifier for GmailNotifier {
    type Error = GoogleApiError;

    fn send(&self, notice: BookingNotice) -> BoxFuture<'_, NotificationResult, Self::Error> {
        const OPERATION: &str = "gmail send";

        let gmail_hub = self.gmail_hub.clone();
        let timeout = self.timeout;
        let (subject, body) = self.render(&notice);

        Box::pin(async move {
            debug!("Sending {:?} to {}", notice.kind, notice.recipient);

            let message = google_gmail1::api::Message {
                raw: Some(Self::build_rfc822(&notice.recipient, &subject, &body)),
                ..Default::default()
            };

            let mime_type = "message/rfc822"
                .parse()
                .map_err(|e| GoogleApiError::api(OPERATION, e))?;

            // The send endpoint is a media-upload method; the payload rides
            // in the message body, so the upload stream stays empty.
            let request = gmail_hub
                .users()
                .messages_send(message, "me")
                .upload(std::io::Cursor::new(Vec::new()), mime_type);

            let (_response, sent) = tokio::time::timeout(timeout, request)
                .await
                .map_err(|_| GoogleApiError::Timeout {
                    operation: OPERATION,
                    timeout,
                })?
                .map_err(|e| GoogleApiError::api(OPERATION, e))?;

            Ok(NotificationResult {
                message_id: sent.id,
                status: "sent".to_string(),
            })
        })
    }
}
