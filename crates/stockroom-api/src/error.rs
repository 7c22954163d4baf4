//! # API Error Type
//!
//! Unified error shape for the network boundary.
//!
//! ## Normalization
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                   Error Normalization Flow                              │
//! │                                                                         │
//! │  Server 4xx/5xx + JSON body ──► ApiError { status, description }       │
//! │  Server 4xx/5xx, no body ─────► ApiError { status, reason phrase }     │
//! │  Transport failure ───────────► ApiError { 500, transport message }    │
//! │  Cancelled upload ────────────► ApiError { 499, "Request cancelled" }  │
//! │                                                                         │
//! │  Call sites branch on status:                                           │
//! │    401 invalid credentials   406 invalid/expired link                  │
//! │    404 not found             409 conflict                              │
//! │    499 cancelled             anything else: unexpected                 │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Status code a cancelled request is normalized to.
pub const STATUS_CANCELLED: u16 = 499;

/// Status code used when the transport gives us nothing better.
pub const STATUS_UNEXPECTED: u16 = 500;

/// Normalized network/API error.
///
/// Every failure that crosses the boundary arrives at call sites in this
/// one shape, regardless of whether the server answered at all.
#[derive(Debug, Clone, PartialEq, Eq, Error, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
#[error("API error {status}: {description}")]
pub struct ApiError {
    /// HTTP-like status code; 500 when the transport supplied none.
    pub status: u16,

    /// Human-readable description for notifications.
    pub description: String,
}

impl ApiError {
    pub fn new(status: u16, description: impl Into<String>) -> Self {
        ApiError {
            status,
            description: description.into(),
        }
    }

    /// The error a cancelled request is normalized to.
    pub fn cancelled() -> Self {
        ApiError::new(STATUS_CANCELLED, "Request cancelled")
    }

    /// Wraps a failure with no usable status code.
    pub fn unexpected(description: impl Into<String>) -> Self {
        ApiError::new(STATUS_UNEXPECTED, description)
    }

    /// 401 - invalid credentials.
    #[inline]
    pub fn is_unauthorized(&self) -> bool {
        self.status == 401
    }

    /// 404 - resource not found.
    #[inline]
    pub fn is_not_found(&self) -> bool {
        self.status == 404
    }

    /// 406 - invalid or expired verification/reset link.
    #[inline]
    pub fn is_gone_link(&self) -> bool {
        self.status == 406
    }

    /// 409 - conflict (e.g. duplicate account).
    #[inline]
    pub fn is_conflict(&self) -> bool {
        self.status == 409
    }

    /// 499 - request was cancelled before it resolved.
    #[inline]
    pub fn is_cancelled(&self) -> bool {
        self.status == STATUS_CANCELLED
    }
}

impl From<reqwest::Error> for ApiError {
    fn from(err: reqwest::Error) -> Self {
        match err.status() {
            Some(status) => ApiError::new(status.as_u16(), err.to_string()),
            None => ApiError::unexpected(err.to_string()),
        }
    }
}

/// Convenience type alias for Results with ApiError.
pub type ApiResult<T> = Result<T, ApiError>;

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cancelled_shape() {
        let err = ApiError::cancelled();
        assert_eq!(err.status, 499);
        assert!(err.is_cancelled());
        assert!(!err.is_unauthorized());
    }

    #[test]
    fn test_unexpected_defaults_to_500() {
        let err = ApiError::unexpected("connection reset");
        assert_eq!(err.status, 500);
        assert_eq!(err.description, "connection reset");
    }

    #[test]
    fn test_status_predicates() {
        assert!(ApiError::new(401, "bad credentials").is_unauthorized());
        assert!(ApiError::new(404, "missing").is_not_found());
        assert!(ApiError::new(406, "expired").is_gone_link());
        assert!(ApiError::new(409, "duplicate").is_conflict());
    }

    #[test]
    fn test_display_includes_status() {
        let err = ApiError::new(404, "Item not found");
        assert_eq!(err.to_string(), "API error 404: Item not found");
    }
}
