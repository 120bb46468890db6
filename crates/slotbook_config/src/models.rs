// --- File: crates/slotbook_config/src/models.rs ---

use serde::{Deserialize, Serialize};

// --- General Server Config ---
#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
}

// --- Database Config ---
#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct DatabaseConfig {
    pub url: String, // e.g. sqlite://slotbook.db, loaded via SLOTBOOK__DATABASE__URL
}

// --- Google Calendar / Gmail Config ---
// Holds non-secret Google config. The service-account key itself lives in the
// file referenced by key_path.
#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct GcalConfig {
    pub key_path: Option<String>,
    pub calendar_id: Option<String>, // e.g. "primary"
}

// --- Slot Grid / Scheduling Config ---
#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct SchedulingConfig {
    /// Length of the rolling booking window, in days from "now".
    #[serde(default = "default_window_days")]
    pub window_days: i64,
    /// First bookable hour of the working day (inclusive).
    #[serde(default = "default_start_hour")]
    pub start_hour: u32,
    /// End of the working day (exclusive).
    #[serde(default = "default_end_hour")]
    pub end_hour: u32,
    /// Grid step. Must evenly divide 60.
    #[serde(default = "default_interval_minutes")]
    pub interval_minutes: u32,
    /// Fallback display time zone when the requester does not pick one.
    #[serde(default = "default_time_zone")]
    pub time_zone: String,
    /// Bound on free/busy and notification calls so an unreachable upstream
    /// cannot hang a request.
    #[serde(default = "default_upstream_timeout_secs")]
    pub upstream_timeout_secs: u64,
}

fn default_window_days() -> i64 {
    14
}
fn default_start_hour() -> u32 {
    9
}
fn default_end_hour() -> u32 {
    17
}
fn default_interval_minutes() -> u32 {
    30
}
fn default_time_zone() -> String {
    "UTC".to_string()
}
fn default_upstream_timeout_secs() -> u64 {
    10
}

impl Default for SchedulingConfig {
    fn default() -> Self {
        Self {
            window_days: default_window_days(),
            start_hour: default_start_hour(),
            end_hour: default_end_hour(),
            interval_minutes: default_interval_minutes(),
            time_zone: default_time_zone(),
            upstream_timeout_secs: default_upstream_timeout_secs(),
        }
    }
}

// --- Notification Config ---
#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct NotificationConfig {
    /// Recipient of the admin alert sent for every new booking request.
    pub admin_email: String,
    /// Display name used when signing requester messages.
    pub sender_name: Option<String>,
}

// --- Admin Config ---
// Shared secret loaded via SLOTBOOK__ADMIN__SHARED_SECRET.
#[derive(Debug, Deserialize, Serialize, Clone, Default)]
pub struct AdminConfig {
    pub shared_secret: Option<String>,
}

// --- Unified App Configuration ---
#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct AppConfig {
    // Server config is mandatory
    pub server: ServerConfig,

    // --- Runtime Flags (optional in config file, default to false) ---
    #[serde(default)]
    pub use_gcal: bool,

    // --- Optional Feature Configurations ---
    #[serde(default)]
    pub database: Option<DatabaseConfig>,
    #[serde(default)]
    pub gcal: Option<GcalConfig>,
    #[serde(default)]
    pub scheduling: SchedulingConfig,
    #[serde(default)]
    pub notifications: Option<NotificationConfig>,
    #[serde(default)]
    pub admin: Option<AdminConfig>,
}
