//! # Payment Error Types
//!
//! Typed error handling for the intent-relay payment endpoint.
//! All payment operations return `Result<T, PaymentError>`.
//!
//! The `Display` output of every variant is exactly the message sent back to
//! the caller in the `{ "error": ... }` body.

use thiserror::Error;

/// Core error type for all payment operations
#[derive(Debug, Error)]
pub enum PaymentError {
    /// Amount missing, non-numeric, or not positive
    #[error("Invalid amount")]
    InvalidAmount,

    /// Email missing or blank
    #[error("Email is required")]
    EmailRequired,

    /// Request body could not be parsed
    #[error("{0}")]
    MalformedRequest(String),

    /// HTTP verb other than POST on the payment route
    #[error("Method not allowed")]
    MethodNotAllowed,

    /// Payment provider API error, with the HTTP status it reported (if any)
    #[error("{message}")]
    Provider {
        status: Option<u16>,
        message: String,
    },

    /// Network/HTTP error communicating with provider
    #[error("{0}")]
    Network(String),

    /// Provider returned a body we could not decode
    #[error("{0}")]
    Serialization(String),

    /// Configuration errors (missing keys, invalid config)
    #[error("{0}")]
    Configuration(String),
}

impl PaymentError {
    /// Create a provider error carrying the status the provider reported
    pub fn provider(status: Option<u16>, message: impl Into<String>) -> Self {
        PaymentError::Provider {
            status,
            message: message.into(),
        }
    }

    /// Returns true for errors raised before any provider call
    pub fn is_client_error(&self) -> bool {
        matches!(
            self,
            PaymentError::InvalidAmount
                | PaymentError::EmailRequired
                | PaymentError::MalformedRequest(_)
                | PaymentError::MethodNotAllowed
        )
    }

    /// Returns the HTTP status code appropriate for this error
    pub fn status_code(&self) -> u16 {
        match self {
            PaymentError::InvalidAmount => 400,
            PaymentError::EmailRequired => 400,
            PaymentError::MalformedRequest(_) => 400,
            PaymentError::MethodNotAllowed => 405,
            PaymentError::Provider { status, .. } => status
                .filter(|code| (400..=599).contains(code))
                .unwrap_or(500),
            PaymentError::Network(_) => 500,
            PaymentError::Serialization(_) => 500,
            PaymentError::Configuration(_) => 500,
        }
    }
}

/// Result type alias for payment operations
pub type PaymentResult<T> = Result<T, PaymentError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_client_errors() {
        assert!(PaymentError::InvalidAmount.is_client_error());
        assert!(PaymentError::MethodNotAllowed.is_client_error());
        assert!(!PaymentError::provider(Some(402), "Card declined").is_client_error());
        assert!(!PaymentError::Network("timeout".into()).is_client_error());
    }

    #[test]
    fn test_status_codes() {
        assert_eq!(PaymentError::InvalidAmount.status_code(), 400);
        assert_eq!(PaymentError::EmailRequired.status_code(), 400);
        assert_eq!(PaymentError::MethodNotAllowed.status_code(), 405);
        assert_eq!(PaymentError::provider(Some(402), "Card declined").status_code(), 402);
        assert_eq!(PaymentError::provider(None, "boom").status_code(), 500);
        assert_eq!(PaymentError::Network("reset".into()).status_code(), 500);
    }

    #[test]
    fn test_out_of_range_provider_status_falls_back() {
        assert_eq!(PaymentError::provider(Some(200), "odd").status_code(), 500);
        assert_eq!(PaymentError::provider(Some(999), "odd").status_code(), 500);
    }

    #[test]
    fn test_messages_are_caller_facing() {
        assert_eq!(PaymentError::InvalidAmount.to_string(), "Invalid amount");
        assert_eq!(PaymentError::EmailRequired.to_string(), "Email is required");
        assert_eq!(PaymentError::MethodNotAllowed.to_string(), "Method not allowed");
        assert_eq!(
            PaymentError::provider(Some(402), "Card declined").to_string(),
            "Card declined"
        );
    }
}
