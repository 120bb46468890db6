//! Error type shared by the Google collaborators.

use std::time::Duration;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum GoogleApiError {
    /// Calendar or Gmail API call failed.
    #[error("Google API error during {operation}: {message}")]
    Api {
        operation: &'static str,
        message: String,
    },

    /// The bounded timeout on an upstream call elapsed.
    #[error("Google API call timed out after {timeout:?} during {operation}")]
    Timeout {
        operation: &'static str,
        timeout: Duration,
    },
}

impl GoogleApiError {
    pub fn api<E: std::fmt::Display>(operation: &'static str, err: E) -> Self {
        Self::Api {
            operation,
            message: err.to_string(),
        }
    }
}
