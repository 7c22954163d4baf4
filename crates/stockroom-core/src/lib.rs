//! # stockroom-core: Pure Domain Logic for Stockroom
//!
//! This crate is the **heart** of Stockroom. It contains the domain types
//! and business rules for the inventory/reservation dashboard as pure
//! functions with zero I/O dependencies.
//!
//! ## Architecture Position
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                      Stockroom Architecture                             │
//! │                                                                         │
//! │  ┌─────────────────────────────────────────────────────────────────┐   │
//! │  │                  Dashboard (browser frontend)                   │   │
//! │  │    Item tables ──► Reservation drawers ──► Admin views          │   │
//! │  └─────────────────────────────┬───────────────────────────────────┘   │
//! │                                │                                        │
//! │  ┌─────────────────────────────▼───────────────────────────────────┐   │
//! │  │                    stockroom-store                              │   │
//! │  │    Inventory / Reservations / Users / Session stores            │   │
//! │  └─────────────────────────────┬───────────────────────────────────┘   │
//! │                                │                                        │
//! │  ┌─────────────────────────────▼───────────────────────────────────┐   │
//! │  │              ★ stockroom-core (THIS CRATE) ★                    │   │
//! │  │                                                                 │   │
//! │  │   ┌───────────┐  ┌───────────┐  ┌───────────┐  ┌───────────┐  │   │
//! │  │   │   types   │  │ datetime  │  │validation │  │   error   │  │   │
//! │  │   │   Item    │  │  display  │  │  window   │  │  Field    │  │   │
//! │  │   │Reservation│  │  offset   │  │  email    │  │  Errors   │  │   │
//! │  │   └───────────┘  └───────────┘  └───────────┘  └───────────┘  │   │
//! │  │                                                                 │   │
//! │  │   NO I/O • NO NETWORK • PURE FUNCTIONS                          │   │
//! │  └─────────────────────────────┬───────────────────────────────────┘   │
//! │                                │                                        │
//! │  ┌─────────────────────────────▼───────────────────────────────────┐   │
//! │  │                    stockroom-api (REST boundary)                │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Modules
//!
//! - [`types`] - Domain types (Item, Reservation, User, Role, etc.)
//! - [`datetime`] - The single UTC → display-timezone formatting boundary
//! - [`error`] - Domain error types and field-keyed validation bundles
//! - [`validation`] - Business rule validation (reservation windows, email)
//!
//! ## Design Principles
//!
//! 1. **Pure Functions**: Every function is deterministic - same input = same output
//! 2. **No I/O**: Network, file system and storage access is FORBIDDEN here
//! 3. **Closed Enums**: Reservation status and roles are closed sets,
//!    exhaustively matched everywhere
//! 4. **Explicit Errors**: All errors are typed, never strings or panics

// =============================================================================
// Module Declarations
// =============================================================================

pub mod datetime;
pub mod error;
pub mod types;
pub mod validation;

// =============================================================================
// Re-exports for Convenience
// =============================================================================
// These allow users to do `use stockroom_core::Item` instead of
// `use stockroom_core::types::Item`

pub use error::{FieldErrors, ValidationError};
pub use types::*;

// =============================================================================
// Crate-Level Constants
// =============================================================================

/// Well-known durable-storage key holding the serialized session principal.
///
/// An absent or malformed value under this key is treated as logged-out,
/// never as a fatal error.
pub const SESSION_STORAGE_KEY: &str = "user";
