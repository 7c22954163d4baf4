//! # Reservation Store
//!
//! Canonical list of reservations: the full list for administrators, or
//! the own-reservations subset for an end user.
//!
//! ## Ordering Invariant
//! The list is always sorted by `created` descending (newest first).
//! `init_all` sorts the fetch result; `create` inserts at the head, which
//! preserves the ordering because the new row is the newest.
//!
//! ## Display Strings
//! Source timestamps are UTC; each row carries start/end strings already
//! shifted through the core display-date boundary, so tables render them
//! without further date math.

use thiserror::Error;
use tracing::debug;

use stockroom_api::{ApiError, ApiResult, ReservationApi, ReservationChange};
use stockroom_core::datetime::format_display;
use stockroom_core::validation::{validate_new_reservation, validate_reservation_window};
use stockroom_core::{FieldErrors, NewReservation, Reservation};

use crate::store::{Reduce, Store};

// =============================================================================
// Errors
// =============================================================================

/// Failure modes of reservation operations.
#[derive(Debug, Error)]
pub enum ReservationError {
    /// Client-side validation failed; nothing was sent to the server.
    /// Carries the path-keyed messages for the form.
    #[error("reservation input is invalid")]
    Invalid(FieldErrors),

    /// The boundary rejected the call.
    #[error(transparent)]
    Api(#[from] ApiError),
}

// =============================================================================
// State
// =============================================================================

/// A reservation plus its precomputed display strings.
#[derive(Debug, Clone, PartialEq)]
pub struct ReservationRow {
    pub reservation: Reservation,

    /// `start_at` rendered in the display timezone.
    pub start_display: String,

    /// `end_at` rendered in the display timezone.
    pub end_display: String,
}

impl ReservationRow {
    pub fn new(reservation: Reservation) -> Self {
        let start_display = format_display(reservation.start_at);
        let end_display = format_display(reservation.end_at);
        ReservationRow {
            reservation,
            start_display,
            end_display,
        }
    }

    /// Rebuilds the display strings after a window change.
    fn refresh_display(&mut self) {
        self.start_display = format_display(self.reservation.start_at);
        self.end_display = format_display(self.reservation.end_at);
    }
}

/// Reservation list, newest first.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ReservationsState {
    pub rows: Vec<ReservationRow>,
}

impl ReservationsState {
    pub fn find(&self, id: i64) -> Option<&ReservationRow> {
        self.rows.iter().find(|row| row.reservation.id == id)
    }
}

// =============================================================================
// Actions
// =============================================================================

/// Mutations of the reservation list. Closed set, exhaustively matched.
#[derive(Debug, Clone)]
pub enum ReservationAction {
    /// Replace the full list (already sorted newest-first).
    Replace(Vec<ReservationRow>),
    /// Insert a freshly created reservation at the head.
    InsertHead(ReservationRow),
    /// Mirror a server-acknowledged change onto the matching row.
    Apply { id: i64, change: ReservationChange },
}

impl Reduce for ReservationsState {
    type Action = ReservationAction;

    fn reduce(&mut self, action: ReservationAction) {
        match action {
            ReservationAction::Replace(rows) => {
                self.rows = rows;
            }
            ReservationAction::InsertHead(row) => {
                self.rows.insert(0, row);
            }
            ReservationAction::Apply { id, change } => {
                if let Some(row) = self.rows.iter_mut().find(|row| row.reservation.id == id) {
                    row.reservation.status = change.status;
                    if let Some(start_at) = change.start_at {
                        row.reservation.start_at = start_at;
                    }
                    if let Some(end_at) = change.end_at {
                        row.reservation.end_at = end_at;
                    }
                    row.refresh_display();
                }
            }
        }
    }
}

// =============================================================================
// Access Handle
// =============================================================================

/// Reservation operations the dashboard calls.
#[derive(Debug, Clone)]
pub struct Reservations<A> {
    api: A,
    store: Store<ReservationsState>,
}

impl<A: ReservationApi> Reservations<A> {
    pub fn new(api: A) -> Self {
        Reservations {
            api,
            store: Store::default(),
        }
    }

    /// The underlying store, for subscribers and selectors.
    pub fn store(&self) -> &Store<ReservationsState> {
        &self.store
    }

    /// Fetches all reservations, sorts them newest-first, formats the
    /// display strings and replaces state.
    pub async fn init_all(&self) -> ApiResult<()> {
        let mut reservations = self.api.list_reservations().await?;
        reservations.sort_by(|a, b| b.created.cmp(&a.created));
        let rows = reservations.into_iter().map(ReservationRow::new).collect();
        self.store.dispatch(ReservationAction::Replace(rows));
        Ok(())
    }

    /// Creates a reservation.
    ///
    /// The window invariant (`start_at < end_at` strictly) is validated
    /// BEFORE any network call; an invalid payload rejects with the
    /// path-keyed field errors and the boundary is never touched. On
    /// success the new reservation is inserted at the head of state.
    pub async fn create(&self, opts: NewReservation) -> Result<Reservation, ReservationError> {
        validate_new_reservation(&opts).map_err(ReservationError::Invalid)?;

        let reservation = self.api.create_reservation(&opts).await?;
        debug!(reservation_id = reservation.id, "reservation created");
        self.store
            .dispatch(ReservationAction::InsertHead(ReservationRow::new(
                reservation.clone(),
            )));
        Ok(reservation)
    }

    /// Changes a reservation's status and/or window, then mirrors the
    /// acknowledged change onto the matching row.
    ///
    /// When the change carries both window edges they are validated
    /// before the call; the server stays authoritative on which status
    /// transitions are legal.
    pub async fn update(&self, id: i64, change: ReservationChange) -> Result<(), ReservationError> {
        if let (Some(start_at), Some(end_at)) = (change.start_at, change.end_at) {
            validate_reservation_window(start_at, end_at)
                .map_err(|err| ReservationError::Invalid(err.into()))?;
        }

        self.api.update_reservation(id, &change).await?;
        self.store.dispatch(ReservationAction::Apply { id, change });
        Ok(())
    }

    /// Read-through query for one item's reservations (availability
    /// calendar). Does not mutate the shared store.
    pub async fn for_item(&self, item_id: i64) -> ApiResult<Vec<Reservation>> {
        self.api.reservations_for_item(item_id).await
    }

    /// Read-through query for one user's reservations. Does not mutate
    /// the shared store.
    pub async fn for_user(&self, user_id: i64) -> ApiResult<Vec<Reservation>> {
        self.api.reservations_for_user(user_id).await
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
