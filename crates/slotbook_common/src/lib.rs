// --- File: crates/slotbook_common/src/lib.rs ---

// Declare modules within this crate
pub mod error; // Error taxonomy shared across crates
pub mod http; // HTTP response mapping
pub mod logging; // Logging bootstrap
pub mod services; // Service abstractions

// Re-export error types and utilities for easier access
pub use error::{
    config_error, invalid_input, persistence_failure, upstream_unavailable, CoreError,
    HttpStatusCode,
};

// Re-export HTTP utilities for easier access
pub use http::IntoHttpResponse;

// Re-export logging utilities for easier access
pub use logging::{init, init_with_level};
