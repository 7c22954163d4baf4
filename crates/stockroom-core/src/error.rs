//! # Error Types
//!
//! Domain-specific error types for stockroom-core.
//!
//! ## Error Hierarchy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                         Error Types                                     │
//! │                                                                         │
//! │  stockroom-core errors (this file)                                     │
//! │  ├── ValidationError  - Input validation failures                      │
//! │  └── FieldErrors      - Path-keyed bundle for form mapping             │
//! │                                                                         │
//! │  stockroom-api errors (separate crate)                                 │
//! │  └── ApiError         - Normalized network failures (status + text)    │
//! │                                                                         │
//! │  Flow: ValidationError ──► FieldErrors ──► form fields                 │
//! │        ApiError ─────────► notification at the call site               │
//! │                                                                         │
//! │  Local lookups are Option, never errors: an absent item/reservation/   │
//! │  user in local state is an ordinary None.                               │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Design Principles
//! 1. Use `thiserror` for derive macros (not manual impl)
//! 2. Include context in error messages (field name, item ID, etc.)
//! 3. Errors are enum variants, never String
//! 4. Validation errors never reach the network boundary

use thiserror::Error;

// =============================================================================
// Validation Error
// =============================================================================

/// Input validation errors.
///
/// Raised before a network call is attempted and mapped directly onto
/// form-field messages via [`FieldErrors`].
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    /// A required field is missing or empty.
    #[error("{field} is required")]
    Required { field: String },

    /// Field value is too long.
    #[error("{field} must be at most {max} characters")]
    TooLong { field: String, max: usize },

    /// Invalid format (e.g., malformed email).
    #[error("{field} has invalid format: {reason}")]
    InvalidFormat { field: String, reason: String },

    /// Reservation window is empty or inverted.
    /// `start_at` must be strictly before `end_at`.
    #[error("startDateTime must be strictly before endDateTime")]
    WindowOrder,
}

impl ValidationError {
    /// The form-field path this error attaches to.
    pub fn path(&self) -> &str {
        match self {
            ValidationError::Required { field } => field,
            ValidationError::TooLong { field, .. } => field,
            ValidationError::InvalidFormat { field, .. } => field,
            ValidationError::WindowOrder => "startDateTime",
        }
    }
}

// =============================================================================
// Field Errors
// =============================================================================

/// A path-keyed list of field validation messages.
///
/// This is what a form consumes: each entry is `(path, message)` where
/// `path` names the offending field.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FieldErrors {
    entries: Vec<(String, String)>,
}

impl FieldErrors {
    pub fn new() -> Self {
        FieldErrors::default()
    }

    /// Records a validation error under its field path.
    pub fn push(&mut self, err: ValidationError) {
        self.entries.push((err.path().to_string(), err.to_string()));
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// All messages recorded for the given field path.
    pub fn messages_for(&self, path: &str) -> Vec<&str> {
        self.entries
            .iter()
            .filter(|(p, _)| p == path)
            .map(|(_, m)| m.as_str())
            .collect()
    }

    /// Iterates all `(path, message)` pairs in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.entries.iter().map(|(p, m)| (p.as_str(), m.as_str()))
    }
}

impl From<ValidationError> for FieldErrors {
    fn from(err: ValidationError) -> Self {
        let mut errors = FieldErrors::new();
        errors.push(err);
        errors
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
