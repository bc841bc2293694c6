//! Client error types

use crate::promo::PromoError;
use thiserror::Error;

/// Client error type
#[derive(Debug, Error)]
pub enum ClientError {
    /// HTTP request failed
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// Response body did not match the expected shape
    #[error("Decode error: {0}")]
    Decode(String),

    /// Invalid response format
    #[error("Invalid response: {0}")]
    InvalidResponse(String),

    /// Authentication required
    #[error("Authentication required")]
    Unauthorized,

    /// Permission denied
    #[error("Permission denied: {0}")]
    Forbidden(String),

    /// Resource not found
    #[error("Not found: {0}")]
    NotFound(String),

    /// Request rejected by backend validation
    #[error("Validation error: {0}")]
    Validation(String),

    /// Business-rule rejection or server-side failure
    #[error("Backend error: {0}")]
    Backend(String),

    /// Event stream transport failure
    #[error("Stream error: {0}")]
    Stream(String),

    /// Client-side promotion pre-check rejection
    #[error(transparent)]
    Promotion(#[from] PromoError),

    /// Serialization error
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

/// Result type for client operations
pub type ClientResult<T> = Result<T, ClientError>;

impl ClientError {
    /// Best-effort translation of backend error strings into a phrase fit
    /// for direct display. Unrecognized messages collapse to a generic
    /// retryable phrase; the raw message stays available via `Display`.
    pub fn user_message(&self) -> String {
        match self {
            ClientError::Http(e) if e.is_timeout() => {
                "The server took too long to respond. Please try again.".to_string()
            }
            ClientError::Http(e) if e.is_connect() => {
                "Cannot reach the server. Check your connection and try again.".to_string()
            }
            ClientError::Http(_) | ClientError::Stream(_) => {
                "A network error occurred. Please try again.".to_string()
            }
            ClientError::Unauthorized => "Please sign in to continue.".to_string(),
            ClientError::Promotion(e) => e.to_string(),
            ClientError::Forbidden(msg)
            | ClientError::NotFound(msg)
            | ClientError::Validation(msg)
            | ClientError::Backend(msg) => translate_backend_message(msg),
            _ => GENERIC_MESSAGE.to_string(),
        }
    }
}

const GENERIC_MESSAGE: &str = "Something went wrong. Please try again.";

/// Known backend phrases, matched case-insensitively by substring.
/// The backend wording is not a stable contract, so this stays best-effort.
fn translate_backend_message(raw: &str) -> String {
    let lower = raw.to_lowercase();

    let translated = if lower.contains("session") && (lower.contains("expire") || lower.contains("not found")) {
        "Your table session has ended. Please scan the QR code again."
    } else if lower.contains("table") && (lower.contains("unavailable") || lower.contains("occupied")) {
        "This table is not available right now. Please ask the staff for help."
    } else if lower.contains("promotion") || lower.contains("promo") {
        if lower.contains("expire") {
            "This promotion code has expired."
        } else if lower.contains("used up") || lower.contains("exhausted") || lower.contains("limit") {
            "This promotion code has been fully redeemed."
        } else {
            "This promotion code is not valid."
        }
    } else if lower.contains("out of stock") || lower.contains("unavailable product") || lower.contains("sold out") {
        "One of the selected dishes is sold out. Please adjust your order."
    } else if lower.contains("timeout") || lower.contains("timed out") {
        "The server took too long to respond. Please try again."
    } else if lower.contains("internal") || lower.contains("server error") {
        "The server ran into a problem. Please try again in a moment."
    } else {
        GENERIC_MESSAGE
    };

    translated.to_string()
}
