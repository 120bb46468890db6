// crates/slotbook_booking/src/auth.rs

use axum::{
    extract::{Request, State},
    middleware::Next,
    response::{IntoResponse, Response},
};
use constant_time_eq::constant_time_eq; // For secure string comparison
use slotbook_common::{config_error, CoreError};
use slotbook_config::AppConfig;
use std::sync::Arc;
use tracing::warn;

// State for the admin auth middleware. It only needs the AppConfig to read
// the shared secret.
#[derive(Clone)]
pub struct AdminAuthState {
    pub config: Arc<AppConfig>,
}

pub const ADMIN_AUTH_HEADER: &str = "X-Admin-Secret";

/// Axum middleware guarding the admin routes.
/// Checks for a shared secret in the `X-Admin-Secret` header.
pub async fn admin_auth_middleware(
    State(auth_state): State<Arc<AdminAuthState>>,
    req: Request,
    next: Next,
) -> Response {
    // The secret is deployment config; refusing all admin traffic when it is
    // missing beats running the review surface open.
    let expected: String = match auth_state
        .config
        .admin
        .as_ref()
        .and_then(|a| a.shared_secret.clone())
    {
        Some(secret) => secret,
        None => {
            warn!("Admin shared secret not configured, rejecting admin request");
            return config_error("admin shared secret is not configured").into_response();
        }
    };

    let provided: Option<&str> = req
        .headers()
        .get(ADMIN_AUTH_HEADER)
        .and_then(|value| value.to_str().ok());

    match provided {
        Some(secret) if constant_time_eq(secret.as_bytes(), expected.as_bytes()) => {
            next.run(req).await
        }
        Some(_) => {
            warn!("Admin request with invalid credentials");
            CoreError::Unauthorized("invalid admin credentials".to_string()).into_response()
        }
        None => {
            warn!("Admin request missing the {} header", ADMIN_AUTH_HEADER);
            CoreError::Unauthorized(format!("missing {ADMIN_AUTH_HEADER} header")).into_response()
        }
    }
}
