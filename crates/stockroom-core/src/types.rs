//! # Domain Types
//!
//! Core domain types used throughout Stockroom.
//!
//! ## Type Hierarchy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                         Domain Types                                    │
//! │                                                                         │
//! │  ┌─────────────────┐   ┌─────────────────┐   ┌─────────────────┐       │
//! │  │      Item       │   │   Reservation   │   │      User       │       │
//! │  │  ─────────────  │   │  ─────────────  │   │  ─────────────  │       │
//! │  │  id             │   │  id             │   │  id             │       │
//! │  │  name/barcode   │   │  item (frozen)  │   │  email          │       │
//! │  │  quantity       │   │  user (frozen)  │   │  role           │       │
//! │  │  images[]       │   │  status         │   │  verified       │       │
//! │  │  children[]     │   │  start/end      │   └─────────────────┘       │
//! │  └─────────────────┘   └─────────────────┘                             │
//! │                                                                         │
//! │  ┌─────────────────┐   ┌───────────────────┐   ┌─────────────────┐     │
//! │  │      Role       │   │ ReservationStatus │   │    BaseUser     │     │
//! │  │  ─────────────  │   │  ───────────────  │   │  ─────────────  │     │
//! │  │  User           │   │  Pending Approved │   │  id, email      │     │
//! │  │  Admin          │   │  Denied Cancelled │   │  nid, role      │     │
//! │  │  Super          │   │  CheckedOut Late  │   │  created        │     │
//! │  └─────────────────┘   │  Missed Returned  │   └─────────────────┘     │
//! │                        └───────────────────┘                            │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Snapshot Pattern
//! A `Reservation` embeds frozen copies of its `Item` and user at fetch
//! time. These snapshots are NOT reconciled against later edits of the
//! canonical records; a renamed item keeps its old name inside existing
//! reservation rows until the list is refetched.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use ts_rs::TS;

// =============================================================================
// Role
// =============================================================================

/// Authorization role of a principal.
///
/// ## Ordering
/// `User < Admin`, `User < Super`. `Admin` and `Super` are equivalent for
/// every dashboard gate (`is_admin_or_super`); `Super` exists for server-side
/// privileges this client never exercises.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
pub enum Role {
    /// Regular end user: browse items, manage own reservations.
    User,
    /// Staff: full inventory, reservation and user management.
    Admin,
    /// Staff with server-side superpowers; same dashboard access as Admin.
    Super,
}

impl Role {
    /// True iff this role passes the admin dashboard gate.
    #[inline]
    pub const fn is_admin_or_super(&self) -> bool {
        matches!(self, Role::Admin | Role::Super)
    }
}

impl Default for Role {
    fn default() -> Self {
        Role::User
    }
}

// =============================================================================
// Item Image
// =============================================================================

/// An image attached to an inventory item.
///
/// Owned by exactly one `Item`; deleting the image must also remove it
/// from the owning item's `images` list.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct ItemImage {
    #[serde(rename = "ID")]
    pub id: i64,

    /// Public URL of the stored image.
    #[serde(rename = "imageURL")]
    pub image_url: String,

    #[ts(as = "String")]
    pub created: DateTime<Utc>,
}

// =============================================================================
// Item
// =============================================================================

/// An inventory unit.
///
/// ## Main vs. Child Items
/// Only `main` (root) items own independent location/barcode/quantity/
/// availability/moveable values; child items inherit these conceptually
/// from their parent and the dashboard disables editing them there.
///
/// ## Retirement
/// An item with `retired_at` set is excluded from reservation eligibility.
/// Retirement is reversible: clearing the timestamp restores eligibility.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct Item {
    #[serde(rename = "ID")]
    pub id: i64,

    /// Base-item reference (catalog record this unit was created from).
    #[serde(rename = "item")]
    pub base_item: Option<i64>,

    /// Display name shown in the dashboard and on reservation rows.
    pub name: String,

    /// Classification, e.g. "Camera", "Tripod".
    #[serde(rename = "type")]
    pub kind: Option<String>,

    pub barcode: Option<String>,

    pub serial: Option<String>,

    /// Physical storage location. Meaningful on main items only.
    pub location: Option<String>,

    /// Units owned. Meaningful on main items only.
    pub quantity: i64,

    /// Units currently available for reservation.
    pub available: i64,

    /// Whether the item may leave the building.
    pub moveable: bool,

    #[ts(as = "String")]
    pub created: DateTime<Utc>,

    #[ts(as = "Option<String>")]
    pub purchase_date: Option<NaiveDate>,

    /// Retirement timestamp. `Some` means not reservable.
    #[serde(rename = "retiredDateTime")]
    #[ts(as = "Option<String>")]
    pub retired_at: Option<DateTime<Utc>>,

    pub vendor_name: Option<String>,

    /// Vendor list price. Display-only; never used in arithmetic.
    pub vendor_price: Option<f64>,

    /// Images attached to this item, in upload order.
    #[serde(default)]
    pub images: Vec<ItemImage>,

    /// Child items nested under this one. Empty on children themselves
    /// (the tree is one level deep).
    #[serde(default)]
    pub children: Vec<Item>,

    /// Whether this is a root/parent record.
    pub main: bool,
}

impl Item {
    /// True iff the item has been retired.
    #[inline]
    pub fn is_retired(&self) -> bool {
        self.retired_at.is_some()
    }

    /// True iff the item is eligible for reservation.
    #[inline]
    pub fn reservable(&self) -> bool {
        !self.is_retired()
    }

    /// Copies every populated field of `patch` onto this item.
    ///
    /// Identity (`id`) is never overwritten; absent (`None`) patch fields
    /// leave the current value untouched. Optional attributes use a
    /// double-`Option` in the patch so that "clear this field" and
    /// "leave this field alone" stay distinguishable.
    pub fn apply_patch(&mut self, patch: &ItemPatch) {
        if let Some(name) = &patch.name {
            self.name = name.clone();
        }
        if let Some(kind) = &patch.kind {
            self.kind = kind.clone();
        }
        if let Some(barcode) = &patch.barcode {
            self.barcode = barcode.clone();
        }
        if let Some(serial) = &patch.serial {
            self.serial = serial.clone();
        }
        if let Some(location) = &patch.location {
            self.location = location.clone();
        }
        if let Some(quantity) = patch.quantity {
            self.quantity = quantity;
        }
        if let Some(available) = patch.available {
            self.available = available;
        }
        if let Some(moveable) = patch.moveable {
            self.moveable = moveable;
        }
        if let Some(purchase_date) = patch.purchase_date {
            self.purchase_date = purchase_date;
        }
        if let Some(vendor_name) = &patch.vendor_name {
            self.vendor_name = vendor_name.clone();
        }
        if let Some(vendor_price) = patch.vendor_price {
            self.vendor_price = vendor_price;
        }
    }
}

// =============================================================================
// Item Patch / Draft
// =============================================================================

/// Partial update for an existing item.
///
/// Sent as the body of `PUT /inventory/:id`; the same populated fields are
/// applied to the in-memory item after the server acknowledges.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct ItemPatch {
    /// Identity of the item being patched. Required.
    #[serde(rename = "ID")]
    pub id: i64,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,

    #[serde(rename = "type", skip_serializing_if = "Option::is_none")]
    pub kind: Option<Option<String>>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub barcode: Option<Option<String>>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub serial: Option<Option<String>>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub location: Option<Option<String>>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub quantity: Option<i64>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub available: Option<i64>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub moveable: Option<bool>,

    #[serde(skip_serializing_if = "Option::is_none")]
    #[ts(as = "Option<Option<String>>")]
    pub purchase_date: Option<Option<NaiveDate>>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub vendor_name: Option<Option<String>>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub vendor_price: Option<Option<f64>>,
}

impl ItemPatch {
    /// Creates an empty patch for the given item.
    pub fn new(id: i64) -> Self {
        ItemPatch {
            id,
            ..ItemPatch::default()
        }
    }
}

/// Fields for creating a new item (root or child).
///
/// The server assigns `ID`, `created` and the empty image/children lists.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct ItemDraft {
    pub name: String,

    #[serde(rename = "type", skip_serializing_if = "Option::is_none")]
    pub kind: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub barcode: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub serial: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub location: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub quantity: Option<i64>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub moveable: Option<bool>,

    #[serde(skip_serializing_if = "Option::is_none")]
    #[ts(as = "Option<String>")]
    pub purchase_date: Option<NaiveDate>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub vendor_name: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub vendor_price: Option<f64>,
}

// =============================================================================
// Reservation Status
// =============================================================================

/// Lifecycle state of a reservation. Closed set of exactly eight states.
///
/// The server is the authority on which transitions are legal; the client
/// applies whatever the server returns. The single client-encoded rule is
/// that only `Pending` reservations offer the user a Cancel action.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, TS)]
#[ts(export)]
pub enum ReservationStatus {
    Pending,
    Approved,
    Denied,
    Cancelled,
    #[serde(rename = "Checked Out")]
    CheckedOut,
    Late,
    Missed,
    Returned,
}

impl ReservationStatus {
    /// All statuses, in dashboard display order.
    pub const ALL: [ReservationStatus; 8] = [
        ReservationStatus::Pending,
        ReservationStatus::Approved,
        ReservationStatus::Denied,
        ReservationStatus::Cancelled,
        ReservationStatus::CheckedOut,
        ReservationStatus::Late,
        ReservationStatus::Missed,
        ReservationStatus::Returned,
    ];

    /// True iff the owning user may cancel a reservation in this state.
    #[inline]
    pub const fn is_cancellable_by_user(&self) -> bool {
        matches!(self, ReservationStatus::Pending)
    }

    /// Wire/display label, e.g. `"Checked Out"`.
    pub const fn label(&self) -> &'static str {
        match self {
            ReservationStatus::Pending => "Pending",
            ReservationStatus::Approved => "Approved",
            ReservationStatus::Denied => "Denied",
            ReservationStatus::Cancelled => "Cancelled",
            ReservationStatus::CheckedOut => "Checked Out",
            ReservationStatus::Late => "Late",
            ReservationStatus::Missed => "Missed",
            ReservationStatus::Returned => "Returned",
        }
    }
}

impl Default for ReservationStatus {
    fn default() -> Self {
        ReservationStatus::Pending
    }
}

impl std::fmt::Display for ReservationStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.label())
    }
}

// =============================================================================
// Reservation
// =============================================================================

/// Secret-free user snapshot embedded in a reservation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct ReservationUser {
    #[serde(rename = "ID")]
    pub id: i64,

    pub email: String,

    pub full_name: String,
}

/// A booking of an item by a user across a time window.
///
/// ## Invariant
/// `start_at < end_at` strictly. Enforced by validation before any create
/// request leaves the client; the server re-checks.
///
/// ## Snapshots
/// `item` and `user` are frozen at fetch time (see module docs).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct Reservation {
    #[serde(rename = "ID")]
    pub id: i64,

    /// Item snapshot at fetch time (frozen).
    pub item: Item,

    /// Requesting user snapshot (frozen, no secrets).
    pub user: ReservationUser,

    /// Staff member who last changed status, if any.
    pub admin: Option<ReservationUser>,

    pub status: ReservationStatus,

    #[serde(rename = "startDateTime")]
    #[ts(as = "String")]
    pub start_at: DateTime<Utc>,

    #[serde(rename = "endDateTime")]
    #[ts(as = "String")]
    pub end_at: DateTime<Utc>,

    #[ts(as = "String")]
    pub created: DateTime<Utc>,
}

impl Reservation {
    /// Length of the reservation window.
    #[inline]
    pub fn duration(&self) -> chrono::Duration {
        self.end_at - self.start_at
    }
}

/// Fields for creating a new reservation (`POST /reservations/`).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct NewReservation {
    /// Email of the reserving user.
    pub email: String,

    /// Identity of the item being reserved.
    pub item: i64,

    pub status: ReservationStatus,

    /// Set when a staff member books on a user's behalf.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub admin_id: Option<i64>,

    #[serde(rename = "startDateTime")]
    #[ts(as = "String")]
    pub start_at: DateTime<Utc>,

    #[serde(rename = "endDateTime")]
    #[ts(as = "String")]
    pub end_at: DateTime<Utc>,
}

// =============================================================================
// Users
// =============================================================================

/// The authenticated session principal.
///
/// ## Verification
/// Unverified users cannot complete login: the login response carries
/// `verified = false` and the caller must hold them at the verification
/// gate. The store does not enforce this branch itself.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct User {
    #[serde(rename = "ID")]
    pub id: i64,

    pub email: String,

    pub full_name: String,

    pub role: Role,

    pub verified: bool,

    #[ts(as = "String")]
    pub created: DateTime<Utc>,
}

/// A registered-user record in the admin user-management view.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct BaseUser {
    #[serde(rename = "ID")]
    pub id: i64,

    pub email: String,

    /// Institutional ID (badge/student number).
    pub nid: Option<String>,

    pub role: Role,

    #[ts(as = "String")]
    pub created: DateTime<Utc>,
}

// =============================================================================
// Unit Tests
// =============================================================================
