//! # Boundary Traits
//!
//! Per-domain API traits the stores are generic over.
//!
//! ## Seam Design
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │   stockroom-store                 stockroom-api                         │
//! │                                                                         │
//! │   Inventory<A>      ─generic─►    trait InventoryApi      ◄─ HttpApi   │
//! │   Reservations<A>   ─generic─►    trait ReservationApi    ◄─ HttpApi   │
//! │   Directory<A>      ─generic─►    trait UserDirectoryApi  ◄─ HttpApi   │
//! │   Session<A>        ─generic─►    trait SessionApi        ◄─ HttpApi   │
//! │                                                                         │
//! │   Store tests substitute in-memory fakes; production wires HttpApi.     │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use stockroom_core::{
    BaseUser, Item, ItemDraft, ItemImage, ItemPatch, NewReservation, Reservation,
    ReservationStatus, Role, User,
};

use crate::error::ApiResult;
use crate::upload::UploadImageRequest;

// =============================================================================
// Request Payloads
// =============================================================================

/// Body of `POST /users/register`.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateAccountOptions {
    pub email: String,
    pub full_name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub nid: Option<String>,
    pub password: String,
}

/// Status and/or window change for `PATCH /reservations/:id/status`.
///
/// Date fields ride along only when the admin edits the window together
/// with the status; the server ignores absent fields.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReservationChange {
    pub status: ReservationStatus,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub admin_id: Option<i64>,

    #[serde(rename = "startDateTime", skip_serializing_if = "Option::is_none")]
    pub start_at: Option<DateTime<Utc>>,

    #[serde(rename = "endDateTime", skip_serializing_if = "Option::is_none")]
    pub end_at: Option<DateTime<Utc>>,
}

impl ReservationChange {
    pub fn status(status: ReservationStatus) -> Self {
        ReservationChange {
            status,
            admin_id: None,
            start_at: None,
            end_at: None,
        }
    }
}

// =============================================================================
// Inventory
// =============================================================================

/// Inventory rows of the REST contract.
#[allow(async_fn_in_trait)]
pub trait InventoryApi: Send + Sync {
    /// `GET /inventory/` — full inventory tree.
    async fn list_items(&self) -> ApiResult<Vec<Item>>;

    /// `GET /inventory/:id` — single item.
    async fn get_item(&self, id: i64) -> ApiResult<Item>;

    /// `POST /inventory/add` — create a root item.
    async fn add_item(&self, draft: &ItemDraft) -> ApiResult<Item>;

    /// `POST /inventory/:itemId/addChild` — create a child under a parent,
    /// referencing the base item the child is an instance of.
    async fn add_child_item(
        &self,
        parent_id: i64,
        base_item_id: i64,
        draft: &ItemDraft,
    ) -> ApiResult<Item>;

    /// `PUT /inventory/:id` — partial update.
    async fn update_item(&self, patch: &ItemPatch) -> ApiResult<()>;

    /// `DELETE /inventory/:id` — delete an item (children included).
    async fn delete_item(&self, id: i64) -> ApiResult<()>;

    /// `PUT /inventory/:id/retire` — set or clear the retirement date.
    /// `None` un-retires.
    async fn retire_item(&self, id: i64, date: Option<DateTime<Utc>>) -> ApiResult<()>;

    /// `POST /inventory/:itemId/uploadImage` — multipart upload, field
    /// `"image"`, with progress reporting and cancellation.
    async fn upload_image(&self, request: UploadImageRequest) -> ApiResult<ItemImage>;

    /// `DELETE /inventory/image/:imageId` — delete an image.
    async fn delete_image(&self, image_id: i64) -> ApiResult<()>;
}

// =============================================================================
// Reservations
// =============================================================================

/// Reservation rows of the REST contract.
#[allow(async_fn_in_trait)]
pub trait ReservationApi: Send + Sync {
    /// `GET /reservations/` — all reservations (admin view).
    async fn list_reservations(&self) -> ApiResult<Vec<Reservation>>;

    /// `POST /reservations/` — create a reservation.
    async fn create_reservation(&self, opts: &NewReservation) -> ApiResult<Reservation>;

    /// `PATCH /reservations/:id/status` — change status (and optionally
    /// the window).
    async fn update_reservation(&self, id: i64, change: &ReservationChange) -> ApiResult<()>;

    /// `GET /reservations/item/:itemId` — reservations for one item
    /// (availability calendar).
    async fn reservations_for_item(&self, item_id: i64) -> ApiResult<Vec<Reservation>>;

    /// `GET /reservations/user/:userId` — one user's reservations.
    async fn reservations_for_user(&self, user_id: i64) -> ApiResult<Vec<Reservation>>;
}

// =============================================================================
// User Directory
// =============================================================================

/// Admin user-management rows of the REST contract.
#[allow(async_fn_in_trait)]
pub trait UserDirectoryApi: Send + Sync {
    /// `GET /users/` — all registered users.
    async fn list_users(&self) -> ApiResult<Vec<BaseUser>>;

    /// `PATCH /users/:userId/role` — change a user's role.
    async fn update_role(&self, user_id: i64, role: Role) -> ApiResult<()>;
}

// =============================================================================
// Session
// =============================================================================

/// Session/account rows of the REST contract.
#[allow(async_fn_in_trait)]
pub trait SessionApi: Send + Sync {
    /// `POST /users/login` — authenticate; 401 on bad credentials. The
    /// returned principal carries `verified`, which gates the caller.
    async fn login(&self, email: &str, password: &str) -> ApiResult<User>;

    /// `POST /users/register` — create an account.
    async fn register(&self, opts: &CreateAccountOptions) -> ApiResult<()>;

    /// `POST /users/resendVerificationEmail`.
    async fn resend_verification_email(&self, email: &str) -> ApiResult<()>;

    /// `PATCH /users/verify` — `{ userId, verificationCode }`; 406 when
    /// the link is invalid or expired.
    async fn verify_account(&self, user_id: i64, verification_code: &str) -> ApiResult<()>;

    /// `POST /users/sendPasswordResetEmail`.
    async fn send_password_reset_email(&self, email: &str) -> ApiResult<()>;

    /// `PATCH /users/resetPassword` — `{ userId, resetCode, password }`.
    async fn reset_password(
        &self,
        user_id: i64,
        reset_code: &str,
        password: &str,
    ) -> ApiResult<()>;

    /// `POST /users/sendUpdateEmail` — confirmation mail to the new address.
    async fn send_update_email(&self, new_email: &str) -> ApiResult<()>;

    /// `PATCH /users/email` — commit the email change.
    async fn update_email(&self, new_email: &str) -> ApiResult<()>;

    /// `PATCH /users/name` — change the display name.
    async fn update_name(&self, full_name: &str) -> ApiResult<()>;
}
