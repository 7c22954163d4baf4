//! # Validation Module
//!
//! Input validation for Stockroom.
//!
//! ## Validation Strategy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                      Validation Layers                                  │
//! │                                                                         │
//! │  Layer 1: Dashboard form                                               │
//! │  ├── Basic format checks (empty, length)                               │
//! │  └── Immediate user feedback                                           │
//! │           │                                                             │
//! │           ▼                                                             │
//! │  Layer 2: THIS MODULE (before any network call)                        │
//! │  ├── Reservation window ordering                                       │
//! │  ├── Email shape, required fields                                      │
//! │  └── Failures map to FieldErrors, never reach the boundary             │
//! │           │                                                             │
//! │           ▼                                                             │
//! │  Layer 3: Server                                                        │
//! │  └── Authoritative re-check; violations come back as API errors        │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use chrono::{DateTime, Utc};

use crate::error::{FieldErrors, ValidationError};
use crate::types::NewReservation;

/// Result type for validation operations.
pub type ValidationResult<T> = Result<T, ValidationError>;

// =============================================================================
// Field Validators
// =============================================================================

/// Validates that a required string field is non-empty after trimming.
pub fn validate_required(field: &str, value: &str) -> ValidationResult<()> {
    if value.trim().is_empty() {
        return Err(ValidationError::Required {
            field: field.to_string(),
        });
    }
    Ok(())
}

/// Validates an email address.
///
/// ## Rules
/// - Must not be empty
/// - Must contain exactly one `@` with text on both sides
/// - Domain part must contain a dot
pub fn validate_email(email: &str) -> ValidationResult<()> {
    let email = email.trim();
    validate_required("email", email)?;

    let mut parts = email.splitn(2, '@');
    let local = parts.next().unwrap_or("");
    let domain = parts.next().unwrap_or("");

    if local.is_empty() || domain.is_empty() || domain.contains('@') || !domain.contains('.') {
        return Err(ValidationError::InvalidFormat {
            field: "email".to_string(),
            reason: "must be a valid email address".to_string(),
        });
    }
    Ok(())
}

/// Validates an item name.
pub fn validate_item_name(name: &str) -> ValidationResult<()> {
    let name = name.trim();
    validate_required("name", name)?;

    if name.len() > 100 {
        return Err(ValidationError::TooLong {
            field: "name".to_string(),
            max: 100,
        });
    }
    Ok(())
}

// =============================================================================
// Reservation Window
// =============================================================================

/// Validates that a reservation window is strictly ordered.
///
/// `start < end` strictly: an empty window (`start == end`) is rejected
/// exactly like an inverted one.
pub fn validate_reservation_window(
    start: DateTime<Utc>,
    end: DateTime<Utc>,
) -> ValidationResult<()> {
    if start >= end {
        return Err(ValidationError::WindowOrder);
    }
    Ok(())
}

/// Validates the full create-reservation payload.
///
/// Collects every failure into a path-keyed [`FieldErrors`] so the form
/// can annotate each offending field at once. Returns `Ok(())` only when
/// the payload is safe to send.
pub fn validate_new_reservation(opts: &NewReservation) -> Result<(), FieldErrors> {
    let mut errors = FieldErrors::new();

    if let Err(err) = validate_email(&opts.email) {
        errors.push(err);
    }
    if let Err(err) = validate_reservation_window(opts.start_at, opts.end_at) {
        errors.push(err);
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
