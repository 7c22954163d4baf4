//! # stockroom-store: State Management for the Stockroom Dashboard
//!
//! Domain stores, access handles and memoized selectors for the
//! inventory/reservation dashboard. Every piece of shared client state
//! lives in a store here; views subscribe, handles mutate.
//!
//! ## Architecture Position
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                      Stockroom Architecture                             │
//! │                                                                         │
//! │  ┌─────────────────────────────────────────────────────────────────┐   │
//! │  │                  Dashboard (browser frontend)                   │   │
//! │  └────────────┬───────────────────────────────────▲────────────────┘   │
//! │               │ handle calls                      │ watch snapshots     │
//! │  ┌────────────▼───────────────────────────────────┴────────────────┐   │
//! │  │              ★ stockroom-store (THIS CRATE) ★                   │   │
//! │  │                                                                 │   │
//! │  │  ┌───────────┐ ┌──────────────┐ ┌───────────┐ ┌─────────────┐ │   │
//! │  │  │ Inventory │ │ Reservations │ │ Directory │ │   Session   │ │   │
//! │  │  │   store   │ │    store     │ │   store   │ │ store+vault │ │   │
//! │  │  └─────┬─────┘ └──────┬───────┘ └─────┬─────┘ └──────┬──────┘ │   │
//! │  │        │              │               │              │         │   │
//! │  │        │   selectors (memoized by store revision)    │         │   │
//! │  │        │              │               │       route guard      │   │
//! │  └────────┼──────────────┼───────────────┼──────────────┼─────────┘   │
//! │           │              │               │              │              │
//! │  ┌────────▼──────────────▼───────────────▼──────────────▼─────────┐   │
//! │  │                 stockroom-api (REST boundary)                   │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Modules
//!
//! - [`store`] - Generic reducer-driven store on a `tokio::sync::watch` cell
//! - [`inventory`] - Item tree: load, patch, create, retire, images
//! - [`reservations`] - Reservation list, newest first, with display strings
//! - [`users`] - Registered-user directory for the admin view
//! - [`session`] - The authenticated principal and account operations
//! - [`vault`] - Durable session persistence under one well-known key
//! - [`guard`] - Route authorization decisions with vault rehydration
//! - [`selectors`] - Revision-memoized derived views of store state
//!
//! ## Mutation Discipline
//!
//! 1. **Two-phase commit**: the boundary call must succeed before any
//!    dispatch; a rejected call leaves state exactly as it was
//! 2. **Closed actions**: every store has a closed action enum, matched
//!    exhaustively by its reducer
//! 3. **Handles own the network**: views never call the boundary directly

// =============================================================================
// Module Declarations
// =============================================================================

pub mod guard;
pub mod inventory;
pub mod reservations;
pub mod selectors;
pub mod session;
pub mod store;
pub mod users;
pub mod vault;

#[cfg(test)]
pub(crate) mod testing;

// =============================================================================
// Re-exports for Convenience
// =============================================================================

pub use guard::{GuardDecision, RouteGuard, RouteRequirement};
pub use inventory::{Inventory, InventoryAction, InventoryError, InventoryState};
pub use reservations::{
    ReservationAction, ReservationError, ReservationRow, Reservations, ReservationsState,
};
pub use selectors::{group_by_status, reservable_items, usage_stats, ItemUsage, Memo};
pub use session::{Session, SessionAction, SessionState};
pub use store::{Reduce, Store};
pub use users::{Directory, DirectoryAction, DirectoryState, UserRow};
pub use vault::SessionVault;
