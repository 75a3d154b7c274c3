//! # Chatterify Error Types
//!
//! File: cli/src/core/error.rs
//!
//! ## Overview
//!
//! This module defines the error types used throughout Chatterify. The
//! approach mirrors the rest of the crate: a typed enum for the failures we
//! want to name, and `anyhow` for propagation and context.
//!
//! ## Architecture
//!
//! - `ChatterifyError`: A `thiserror` enum covering configuration, the remote
//!   completion endpoint, the email relay and contact form validation.
//! - `Result<T>`: A type alias for `anyhow::Result<T>`.
//!
//! Chat failures never surface to the user with this detail. The chat
//! session turns them into a fixed fallback reply and only the log sees the
//! error chain. The contact relay does the same with its generic notices.
//!
//! ## Examples
//!
//! ```rust
//! // Return a specific error type
//! if !status.is_success() {
//!     return Err(anyhow!(ChatterifyError::CompletionStatus { status: status.as_u16(), body }));
//! }
//!
//! // Check for a specific kind after propagation
//! if let Some(ChatterifyError::InvalidContactForm(reason)) = err.downcast_ref() {
//!     println!("{}", reason);
//! }
//! ```
//!
use thiserror::Error;

/// Custom error type for the Chatterify application.
#[derive(Error, Debug)]
pub enum ChatterifyError {
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Completion request failed: {source}")]
    CompletionTransport {
        #[from]
        source: reqwest::Error,
    },

    #[error("Completion endpoint returned HTTP {status}: {body}")]
    CompletionStatus { status: u16, body: String },

    #[error("Completion response was malformed: {0}")]
    MalformedCompletion(String),

    #[error("Email delivery failed: {0}")]
    EmailDelivery(String),

    #[error("Invalid contact form: {0}")]
    InvalidContactForm(String),

    #[error("Contact request was not sent.")]
    ContactNotSent,
}

/// Type alias for Result using anyhow::Error for broad compatibility.
pub type Result<T> = anyhow::Result<T>;

// --- Unit Tests ---
#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let config_err = ChatterifyError::Config("timeout_secs must be positive".to_string());
        assert_eq!(
            config_err.to_string(),
            "Configuration error: timeout_secs must be positive"
        );

        let status_err = ChatterifyError::CompletionStatus {
            status: 401,
            body: "invalid api key".into(),
        };
        assert_eq!(
            status_err.to_string(),
            "Completion endpoint returned HTTP 401: invalid api key"
        );

        assert_eq!(
            ChatterifyError::ContactNotSent.to_string(),
            "Contact request was not sent."
        );
    }

    #[test]
    fn test_downcast_through_anyhow() {
        let err: anyhow::Error =
            ChatterifyError::InvalidContactForm("name is required".into()).into();
        let err = err.context("while relaying contact form");
        assert!(matches!(
            err.downcast_ref::<ChatterifyError>(),
            Some(ChatterifyError::InvalidContactForm(_))
        ));
    }
}
