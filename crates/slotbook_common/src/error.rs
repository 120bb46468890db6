// --- File: crates/slotbook_common/src/error.rs ---
use thiserror::Error;

/// The shared error taxonomy for the booking coordinator.
///
/// Crate-specific errors (database, Google API, slot grid) are mapped into
/// these variants at the HTTP boundary. Every variant carries enough context
/// (operation, identifier) for a caller to decide between retry and abandon.
#[derive(Error, Debug)]
pub enum CoreError {
    /// Bad or missing input: unknown/used access code, malformed email,
    /// unselectable slot. Reported to the caller, no state was mutated.
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// Busy-time source or notifier unreachable or over its bounded timeout.
    /// Slot generation treats this as fatal for the request; notification
    /// treats it as loggable.
    #[error("Upstream unavailable during {operation}: {message}")]
    UpstreamUnavailable { operation: String, message: String },

    /// The persistent store refused or failed an operation.
    #[error("Persistence failure during {operation}: {message}")]
    PersistenceFailure { operation: String, message: String },

    /// Missing or inconsistent configuration detected at request time.
    #[error("Configuration error: {0}")]
    ConfigError(String),

    /// Missing or wrong admin credential.
    #[error("Unauthorized: {0}")]
    Unauthorized(String),
}

/// A trait for converting errors to HTTP status codes.
pub trait HttpStatusCode {
    /// Returns the HTTP status code for this error.
    fn status_code(&self) -> u16;
}

impl HttpStatusCode for CoreError {
    fn status_code(&self) -> u16 {
        match self {
            CoreError::InvalidInput(_) => 400,
            CoreError::UpstreamUnavailable { .. } => 502,
            CoreError::PersistenceFailure { .. } => 500,
            CoreError::ConfigError(_) => 500,
            CoreError::Unauthorized(_) => 401,
        }
    }
}

pub fn invalid_input<T: std::fmt::Display>(message: T) -> CoreError {
    CoreError::InvalidInput(message.to_string())
}

pub fn upstream_unavailable<T: std::fmt::Display>(operation: &str, message: T) -> CoreError {
    CoreError::UpstreamUnavailable {
        operation: operation.to_string(),
        message: message.to_string(),
    }
}

pub fn persistence_failure<T: std::fmt::Display>(operation: &str, message: T) -> CoreError {
    CoreError::PersistenceFailure {
        operation: operation.to_string(),
        message: message.to_string(),
    }
}

pub fn config_error<T: std::fmt::Display>(message: T) -> CoreError {
    CoreError::ConfigError(message.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn status_codes_follow_the_taxonomy() {
        assert_eq!(invalid_input("bad email").status_code(), 400);
        assert_eq!(upstream_unavailable("free/busy", "refused").status_code(), 502);
        assert_eq!(upstream_unavailable("free/busy", "timed out after 10s").status_code(), 502);
        assert_eq!(persistence_failure("insert booking", "pool").status_code(), 500);
        assert_eq!(CoreError::Unauthorized("admin".into()).status_code(), 401);
    }

    #[test]
    fn display_names_operation_and_identifier() {
        let err = upstream_unavailable("free/busy query", "connection refused");
        let rendered = err.to_string();
        assert!(rendered.contains("free/busy query"));
        assert!(rendered.contains("connection refused"));
    }
}
