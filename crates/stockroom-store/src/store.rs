//! # Store Container
//!
//! The generic state container every domain store is built on.
//!
//! ## Dispatch Flow
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                        Store Dispatch Flow                              │
//! │                                                                         │
//! │  UI event ──► handle operation ──► network boundary                    │
//! │                                         │                               │
//! │                              success    │    failure                    │
//! │                    ┌────────────────────┴──────────────┐               │
//! │                    ▼                                    ▼               │
//! │        store.dispatch(action)                 error to caller,         │
//! │                    │                          state UNCHANGED          │
//! │                    ▼                                                    │
//! │        reduce(&mut state, action)   (applied in dispatch order)        │
//! │                    │                                                    │
//! │                    ▼                                                    │
//! │        revision += 1 ──► memoized selectors recompute                  │
//! │                    │                                                    │
//! │                    ▼                                                    │
//! │        watch subscribers notified ──► UI re-renders                    │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Ordering
//! Dispatched actions are applied in dispatch order (the watch sender
//! serializes `send_modify`). The order *operations resolve* is set by
//! network latency, not call order: two rapid mutations of the same
//! entity race and the last network response to resolve wins the final
//! dispatched state. Callers needing strict ordering must await each
//! call before issuing the next. This is documented last-write-wins,
//! not a serialized-per-entity contract.
//!
//! ## No Globals
//! Stores are explicit values passed through the call graph. Cloning a
//! `Store` clones the handle, not the state: clones share one cell.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use tokio::sync::watch;

/// A reducible state: one closed action enum, exhaustively matched.
///
/// There is no unknown-action fallback; an action that no reducer arm
/// handles is a compile error, not a runtime throw.
pub trait Reduce: Clone + Send + Sync + 'static {
    type Action;

    /// Computes the next state in place.
    fn reduce(&mut self, action: Self::Action);
}

/// Shared-state container for one domain entity.
///
/// Each store is a single mutable cell written only through its own
/// reducer; stores never write each other's state.
#[derive(Debug)]
pub struct Store<S: Reduce> {
    tx: Arc<watch::Sender<S>>,
    revision: Arc<AtomicU64>,
}

impl<S: Reduce> Store<S> {
    /// Creates a store seeded with the given state.
    pub fn new(initial: S) -> Self {
        let (tx, _rx) = watch::channel(initial);
        Store {
            tx: Arc::new(tx),
            revision: Arc::new(AtomicU64::new(0)),
        }
    }

    /// Applies an action through the reducer and notifies subscribers.
    ///
    /// The revision is bumped inside the modify closure, before watch
    /// wakes any subscriber, so a subscriber reacting to the change
    /// always reads the new revision and never memoizes fresh state
    /// under the old one.
    pub fn dispatch(&self, action: S::Action) {
        self.tx.send_modify(|state| {
            state.reduce(action);
            self.revision.fetch_add(1, Ordering::Release);
        });
    }

    /// Clones the current state.
    pub fn snapshot(&self) -> S {
        self.tx.borrow().clone()
    }

    /// Runs a closure against the current state without cloning.
    pub fn read<R>(&self, f: impl FnOnce(&S) -> R) -> R {
        f(&self.tx.borrow())
    }

    /// Subscribes to state changes.
    pub fn subscribe(&self) -> watch::Receiver<S> {
        self.tx.subscribe()
    }

    /// Monotonic counter bumped on every dispatch.
    ///
    /// Memoized selectors key their cache on this.
    pub fn revision(&self) -> u64 {
        self.revision.load(Ordering::Acquire)
    }
}

impl<S: Reduce> Clone for Store<S> {
    fn clone(&self) -> Self {
        Store {
            tx: Arc::clone(&self.tx),
            revision: Arc::clone(&self.revision),
        }
    }
}

impl<S: Reduce + Default> Default for Store<S> {
    fn default() -> Self {
        Store::new(S::default())
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
