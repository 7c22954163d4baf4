//! # Test Support
//!
//! Fixtures and in-memory boundary fakes shared by the store tests.
//!
//! The fakes implement the stockroom-api traits over canned data behind
//! an `Arc`, so cloned handles observe the same scripted behavior.
//! `fail_next` arms a one-shot error consumed by the next call, which is
//! how the "failed mutation leaves state unchanged" properties are
//! exercised without a network.

use std::sync::atomic::{AtomicI64, AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use chrono::{DateTime, TimeZone, Utc};

use stockroom_api::{
    ApiError, ApiResult, CreateAccountOptions, InventoryApi, ReservationApi, ReservationChange,
    SessionApi, UploadImageRequest, UserDirectoryApi,
};
use stockroom_core::{
    BaseUser, Item, ItemDraft, ItemImage, ItemPatch, NewReservation, Reservation,
    ReservationStatus, ReservationUser, Role, User,
};

// =============================================================================
// Fixtures
// =============================================================================

pub fn fixture_epoch() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap()
}

pub fn test_item(id: i64) -> Item {
    Item {
        id,
        base_item: None,
        name: format!("Item {}", id),
        kind: Some("Camera".to_string()),
        barcode: Some(format!("barcode-{}", id)),
        serial: None,
        location: Some("Shelf A".to_string()),
        quantity: 2,
        available: 2,
        moveable: true,
        created: fixture_epoch(),
        purchase_date: None,
        retired_at: None,
        vendor_name: None,
        vendor_price: None,
        images: Vec::new(),
        children: Vec::new(),
        main: true,
    }
}

pub fn test_image(id: i64) -> ItemImage {
    ItemImage {
        id,
        image_url: format!("https://cdn.example.com/{}.jpg", id),
        created: fixture_epoch(),
    }
}

pub fn test_user(role: Role, verified: bool) -> User {
    User {
        id: 50,
        email: "user@example.com".to_string(),
        full_name: "Test User".to_string(),
        role,
        verified,
        created: fixture_epoch(),
    }
}

pub fn test_base_user(id: i64, role: Role) -> BaseUser {
    BaseUser {
        id,
        email: format!("user{}@example.com", id),
        nid: Some(format!("N{:04}", id)),
        role,
        created: fixture_epoch(),
    }
}

/// Reservation for item 100 by user 50, created `created_day` days past
/// the fixture epoch, with a two-hour window.
pub fn test_reservation(id: i64, status: ReservationStatus, created_day: i64) -> Reservation {
    let start_at = Utc.with_ymd_and_hms(2024, 5, 1, 9, 0, 0).unwrap();
    Reservation {
        id,
        item: test_item(100),
        user: ReservationUser {
            id: 50,
            email: "user@example.com".to_string(),
            full_name: "Test User".to_string(),
        },
        admin: None,
        status,
        start_at,
        end_at: start_at + chrono::Duration::hours(2),
        created: fixture_epoch() + chrono::Duration::days(created_day),
    }
}

/// A valid create payload for item 100.
pub fn test_new_reservation() -> NewReservation {
    NewReservation {
        email: "user@example.com".to_string(),
        item: 100,
        status: ReservationStatus::Pending,
        admin_id: None,
        start_at: Utc.with_ymd_and_hms(2024, 5, 1, 9, 0, 0).unwrap(),
        end_at: Utc.with_ymd_and_hms(2024, 5, 1, 17, 0, 0).unwrap(),
    }
}

fn item_from_draft(id: i64, draft: &ItemDraft, base_item: Option<i64>, main: bool) -> Item {
    Item {
        id,
        base_item,
        name: draft.name.clone(),
        kind: draft.kind.clone(),
        barcode: draft.barcode.clone(),
        serial: draft.serial.clone(),
        location: draft.location.clone(),
        quantity: draft.quantity.unwrap_or(1),
        available: draft.quantity.unwrap_or(1),
        moveable: draft.moveable.unwrap_or(false),
        created: Utc::now(),
        purchase_date: draft.purchase_date,
        retired_at: None,
        vendor_name: draft.vendor_name.clone(),
        vendor_price: draft.vendor_price,
        images: Vec::new(),
        children: Vec::new(),
        main,
    }
}

// =============================================================================
// One-Shot Failure Cell
// =============================================================================

#[derive(Default)]
struct FailSlot {
    error: Mutex<Option<ApiError>>,
}

impl FailSlot {
    fn arm(&self, error: ApiError) {
        *self.error.lock().expect("fail slot poisoned") = Some(error);
    }

    /// Consumes the armed error, if any.
    fn take(&self) -> ApiResult<()> {
        match self.error.lock().expect("fail slot poisoned").take() {
            Some(error) => Err(error),
            None => Ok(()),
        }
    }
}

// =============================================================================
// Mock Inventory API
// =============================================================================

#[derive(Default)]
struct MockInventoryInner {
    items: Mutex<Vec<Item>>,
    fail: FailSlot,
    add_calls: AtomicUsize,
    next_id: AtomicI64,
}

/// Canned-data inventory boundary. Mutations apply to the canned tree so
/// re-fetches reflect acknowledged writes, like a real server.
#[derive(Clone, Default)]
pub struct MockInventoryApi {
    inner: Arc<MockInventoryInner>,
}

impl MockInventoryApi {
    pub fn new() -> Self {
        let api = MockInventoryApi::default();
        api.inner.next_id.store(1000, Ordering::Relaxed);
        api
    }

    pub fn set_items(&self, items: Vec<Item>) {
        *self.inner.items.lock().expect("items poisoned") = items;
    }

    pub fn fail_next(&self, error: ApiError) {
        self.inner.fail.arm(error);
    }

    /// How many create calls (root or child) reached the boundary.
    pub fn add_calls(&self) -> usize {
        self.inner.add_calls.load(Ordering::Relaxed)
    }

    fn next_id(&self) -> i64 {
        self.inner.next_id.fetch_add(1, Ordering::Relaxed)
    }

    fn with_item<R>(&self, id: i64, f: impl FnOnce(&mut Item) -> R) -> Option<R> {
        let mut items = self.inner.items.lock().expect("items poisoned");
        if let Some(item) = items.iter_mut().find(|item| item.id == id) {
            return Some(f(item));
        }
        items
            .iter_mut()
            .flat_map(|item| item.children.iter_mut())
            .find(|child| child.id == id)
            .map(f)
    }
}

impl InventoryApi for MockInventoryApi {
    async fn list_items(&self) -> ApiResult<Vec<Item>> {
        self.inner.fail.take()?;
        Ok(self.inner.items.lock().expect("items poisoned").clone())
    }

    async fn get_item(&self, id: i64) -> ApiResult<Item> {
        self.inner.fail.take()?;
        self.with_item(id, |item| item.clone())
            .ok_or_else(|| ApiError::new(404, format!("Item {} not found", id)))
    }

    async fn add_item(&self, draft: &ItemDraft) -> ApiResult<Item> {
        self.inner.add_calls.fetch_add(1, Ordering::Relaxed);
        self.inner.fail.take()?;
        let item = item_from_draft(self.next_id(), draft, None, true);
        self.inner
            .items
            .lock()
            .expect("items poisoned")
            .push(item.clone());
        Ok(item)
    }

    async fn add_child_item(
        &self,
        parent_id: i64,
        base_item_id: i64,
        draft: &ItemDraft,
    ) -> ApiResult<Item> {
        self.inner.add_calls.fetch_add(1, Ordering::Relaxed);
        self.inner.fail.take()?;
        let child = item_from_draft(self.next_id(), draft, Some(base_item_id), false);
        let attached = self
            .with_item(parent_id, |parent| parent.children.push(child.clone()))
            .is_some();
        if attached {
            Ok(child)
        } else {
            Err(ApiError::new(404, format!("Item {} not found", parent_id)))
        }
    }

    async fn update_item(&self, patch: &ItemPatch) -> ApiResult<()> {
        self.inner.fail.take()?;
        self.with_item(patch.id, |item| item.apply_patch(patch))
            .ok_or_else(|| ApiError::new(404, format!("Item {} not found", patch.id)))
    }

    async fn delete_item(&self, id: i64) -> ApiResult<()> {
        self.inner.fail.take()?;
        let mut items = self.inner.items.lock().expect("items poisoned");
        items.retain(|item| item.id != id);
        for item in items.iter_mut() {
            item.children.retain(|child| child.id != id);
        }
        Ok(())
    }

    async fn retire_item(&self, id: i64, date: Option<DateTime<Utc>>) -> ApiResult<()> {
        self.inner.fail.take()?;
        self.with_item(id, |item| item.retired_at = date)
            .ok_or_else(|| ApiError::new(404, format!("Item {} not found", id)))
    }

    async fn upload_image(&self, request: UploadImageRequest) -> ApiResult<ItemImage> {
        if let Some(token) = &request.cancel {
            if token.is_cancelled() {
                return Err(ApiError::cancelled());
            }
        }
        self.inner.fail.take()?;

        if let Some(progress) = &request.progress {
            progress(request.total_bytes(), request.total_bytes());
        }

        let image = test_image(self.next_id());
        self.with_item(request.item_id, |item| item.images.push(image.clone()))
            .ok_or_else(|| ApiError::new(404, format!("Item {} not found", request.item_id)))?;
        Ok(image)
    }

    async fn delete_image(&self, image_id: i64) -> ApiResult<()> {
        self.inner.fail.take()?;
        let mut items = self.inner.items.lock().expect("items poisoned");
        for item in items.iter_mut() {
            item.images.retain(|image| image.id != image_id);
            for child in item.children.iter_mut() {
                child.images.retain(|image| image.id != image_id);
            }
        }
        Ok(())
    }
}

// =============================================================================
// Mock Reservation API
// =============================================================================

#[derive(Default)]
struct MockReservationInner {
    reservations: Mutex<Vec<Reservation>>,
    fail: FailSlot,
    create_calls: AtomicUsize,
    next_id: AtomicI64,
}

#[derive(Clone, Default)]
pub struct MockReservationApi {
    inner: Arc<MockReservationInner>,
}

impl MockReservationApi {
    pub fn new() -> Self {
        let api = MockReservationApi::default();
        api.inner.next_id.store(1000, Ordering::Relaxed);
        api
    }

    pub fn set_reservations(&self, reservations: Vec<Reservation>) {
        *self
            .inner
            .reservations
            .lock()
            .expect("reservations poisoned") = reservations;
    }

    pub fn fail_next(&self, error: ApiError) {
        self.inner.fail.arm(error);
    }

    /// How many times `create_reservation` reached the boundary.
    pub fn create_calls(&self) -> usize {
        self.inner.create_calls.load(Ordering::Relaxed)
    }
}

impl ReservationApi for MockReservationApi {
    async fn list_reservations(&self) -> ApiResult<Vec<Reservation>> {
        self.inner.fail.take()?;
        Ok(self
            .inner
            .reservations
            .lock()
            .expect("reservations poisoned")
            .clone())
    }

    async fn create_reservation(&self, opts: &NewReservation) -> ApiResult<Reservation> {
        self.inner.create_calls.fetch_add(1, Ordering::Relaxed);
        self.inner.fail.take()?;

        let reservation = Reservation {
            id: self.inner.next_id.fetch_add(1, Ordering::Relaxed),
            item: test_item(opts.item),
            user: ReservationUser {
                id: 50,
                email: opts.email.clone(),
                full_name: "Test User".to_string(),
            },
            admin: None,
            status: opts.status,
            start_at: opts.start_at,
            end_at: opts.end_at,
            created: Utc::now(),
        };
        self.inner
            .reservations
            .lock()
            .expect("reservations poisoned")
            .push(reservation.clone());
        Ok(reservation)
    }

    async fn update_reservation(&self, id: i64, change: &ReservationChange) -> ApiResult<()> {
        self.inner.fail.take()?;
        let mut reservations = self
            .inner
            .reservations
            .lock()
            .expect("reservations poisoned");
        match reservations.iter_mut().find(|r| r.id == id) {
            Some(reservation) => {
                reservation.status = change.status;
                if let Some(start_at) = change.start_at {
                    reservation.start_at = start_at;
                }
                if let Some(end_at) = change.end_at {
                    reservation.end_at = end_at;
                }
                Ok(())
            }
            None => Err(ApiError::new(404, format!("Reservation {} not found", id))),
        }
    }

    async fn reservations_for_item(&self, item_id: i64) -> ApiResult<Vec<Reservation>> {
        self.inner.fail.take()?;
        Ok(self
            .inner
            .reservations
            .lock()
            .expect("reservations poisoned")
            .iter()
            .filter(|r| r.item.id == item_id)
            .cloned()
            .collect())
    }

    async fn reservations_for_user(&self, user_id: i64) -> ApiResult<Vec<Reservation>> {
        self.inner.fail.take()?;
        Ok(self
            .inner
            .reservations
            .lock()
            .expect("reservations poisoned")
            .iter()
            .filter(|r| r.user.id == user_id)
            .cloned()
            .collect())
    }
}

// =============================================================================
// Mock Directory API
// =============================================================================

#[derive(Default)]
struct MockDirectoryInner {
    users: Mutex<Vec<BaseUser>>,
    fail: FailSlot,
}

#[derive(Clone, Default)]
pub struct MockDirectoryApi {
    inner: Arc<MockDirectoryInner>,
}

impl MockDirectoryApi {
    pub fn new() -> Self {
        MockDirectoryApi::default()
    }

    pub fn set_users(&self, users: Vec<BaseUser>) {
        *self.inner.users.lock().expect("users poisoned") = users;
    }

    pub fn fail_next(&self, error: ApiError) {
        self.inner.fail.arm(error);
    }
}

impl UserDirectoryApi for MockDirectoryApi {
    async fn list_users(&self) -> ApiResult<Vec<BaseUser>> {
        self.inner.fail.take()?;
        Ok(self.inner.users.lock().expect("users poisoned").clone())
    }

    async fn update_role(&self, user_id: i64, role: Role) -> ApiResult<()> {
        self.inner.fail.take()?;
        let mut users = self.inner.users.lock().expect("users poisoned");
        match users.iter_mut().find(|user| user.id == user_id) {
            Some(user) => {
                user.role = role;
                Ok(())
            }
            None => Err(ApiError::new(404, format!("User {} not found", user_id))),
        }
    }
}

// =============================================================================
// Mock Session API
// =============================================================================

#[derive(Default)]
struct MockSessionInner {
    login_user: Mutex<Option<User>>,
    fail: FailSlot,
}

#[derive(Clone, Default)]
pub struct MockSessionApi {
    inner: Arc<MockSessionInner>,
}

impl MockSessionApi {
    pub fn new() -> Self {
        MockSessionApi::default()
    }

    /// Scripts the principal the next successful login returns.
    pub fn set_login_user(&self, user: User) {
        *self.inner.login_user.lock().expect("login poisoned") = Some(user);
    }

    pub fn fail_next(&self, error: ApiError) {
        self.inner.fail.arm(error);
    }
}

impl SessionApi for MockSessionApi {
    async fn login(&self, _email: &str, _password: &str) -> ApiResult<User> {
        self.inner.fail.take()?;
        self.inner
            .login_user
            .lock()
            .expect("login poisoned")
            .clone()
            .ok_or_else(|| ApiError::new(401, "Invalid email or password"))
    }

    async fn register(&self, _opts: &CreateAccountOptions) -> ApiResult<()> {
        self.inner.fail.take()
    }

    async fn resend_verification_email(&self, _email: &str) -> ApiResult<()> {
        self.inner.fail.take()
    }

    async fn verify_account(&self, _user_id: i64, _verification_code: &str) -> ApiResult<()> {
        self.inner.fail.take()
    }

    async fn send_password_reset_email(&self, _email: &str) -> ApiResult<()> {
        self.inner.fail.take()
    }

    async fn reset_password(
        &self,
        _user_id: i64,
        _reset_code: &str,
        _password: &str,
    ) -> ApiResult<()> {
        self.inner.fail.take()
    }

    async fn send_update_email(&self, _new_email: &str) -> ApiResult<()> {
        self.inner.fail.take()
    }

    async fn update_email(&self, _new_email: &str) -> ApiResult<()> {
        self.inner.fail.take()
    }

    async fn update_name(&self, _full_name: &str) -> ApiResult<()> {
        self.inner.fail.take()
    }
}
