//! # Inventory Store
//!
//! Canonical, mutable-via-action list of items. The tree is one level
//! deep: root (`main`) items plus their nested `children`.
//!
//! ## Two-Phase Commit
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                  Inventory Mutation Flow                                │
//! │                                                                         │
//! │  update_item(patch)                                                     │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  PUT /inventory/:id ────── rejects ──► error to caller,                │
//! │       │                                 state UNCHANGED                 │
//! │       ▼ resolves                                                        │
//! │  dispatch(Patch) ──► same fields applied to the in-memory item         │
//! │                                                                         │
//! │  No optimistic update, no rollback: state is only touched post-success.│
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use chrono::{DateTime, Utc};
use thiserror::Error;
use tracing::debug;

use stockroom_api::{ApiError, ApiResult, InventoryApi, UploadImageRequest};
use stockroom_core::validation::validate_item_name;
use stockroom_core::{FieldErrors, Item, ItemDraft, ItemImage, ItemPatch};

use crate::store::{Reduce, Store};

// =============================================================================
// Errors
// =============================================================================

/// Failure modes of inventory mutations.
#[derive(Debug, Error)]
pub enum InventoryError {
    /// Client-side validation failed; nothing was sent to the server.
    /// Carries the path-keyed messages for the form.
    #[error("item input is invalid")]
    Invalid(FieldErrors),

    /// The boundary rejected the call.
    #[error(transparent)]
    Api(#[from] ApiError),
}

// =============================================================================
// State
// =============================================================================

/// The inventory tree: root items with nested children.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct InventoryState {
    pub items: Vec<Item>,
}

impl InventoryState {
    /// Local lookup: root items first, then one level into every root's
    /// `children`. `None` if absent at both levels — never an error.
    pub fn find_item(&self, id: i64) -> Option<&Item> {
        self.items.iter().find(|item| item.id == id).or_else(|| {
            self.items
                .iter()
                .flat_map(|item| item.children.iter())
                .find(|child| child.id == id)
        })
    }

    /// Mutable lookup with the same two-level semantics.
    fn find_item_mut(&mut self, id: i64) -> Option<&mut Item> {
        // Split borrows: probe root level first, then descend.
        if self.items.iter().any(|item| item.id == id) {
            return self.items.iter_mut().find(|item| item.id == id);
        }
        self.items
            .iter_mut()
            .flat_map(|item| item.children.iter_mut())
            .find(|child| child.id == id)
    }
}

// =============================================================================
// Actions
// =============================================================================

/// Mutations of the inventory tree. Closed set, exhaustively matched.
#[derive(Debug, Clone)]
pub enum InventoryAction {
    /// Replace the full tree (initial load).
    Replace(Vec<Item>),
    /// Apply server-acknowledged patch fields to the matching item.
    Patch(ItemPatch),
    /// Append a freshly created root item.
    Append(Item),
    /// Append a freshly created child under its parent.
    AppendChild { parent_id: i64, child: Item },
    /// Remove an item (root or child); a removed root takes its children
    /// with it.
    Remove(i64),
    /// Set or clear the retirement timestamp.
    SetRetired { id: i64, date: Option<DateTime<Utc>> },
    /// Attach an uploaded image to its owning item.
    AppendImage { item_id: i64, image: ItemImage },
    /// Detach a deleted image from its owning item.
    RemoveImage { item_id: i64, image_id: i64 },
}

impl Reduce for InventoryState {
    type Action = InventoryAction;

    fn reduce(&mut self, action: InventoryAction) {
        match action {
            InventoryAction::Replace(items) => {
                self.items = items;
            }
            InventoryAction::Patch(patch) => {
                if let Some(item) = self.find_item_mut(patch.id) {
                    item.apply_patch(&patch);
                }
            }
            InventoryAction::Append(item) => {
                self.items.push(item);
            }
            InventoryAction::AppendChild { parent_id, child } => {
                if let Some(parent) = self.items.iter_mut().find(|item| item.id == parent_id) {
                    parent.children.push(child);
                }
            }
            InventoryAction::Remove(id) => {
                self.items.retain(|item| item.id != id);
                for item in &mut self.items {
                    item.children.retain(|child| child.id != id);
                }
            }
            InventoryAction::SetRetired { id, date } => {
                if let Some(item) = self.find_item_mut(id) {
                    item.retired_at = date;
                }
            }
            InventoryAction::AppendImage { item_id, image } => {
                if let Some(item) = self.find_item_mut(item_id) {
                    item.images.push(image);
                }
            }
            InventoryAction::RemoveImage { item_id, image_id } => {
                if let Some(item) = self.find_item_mut(item_id) {
                    item.images.retain(|image| image.id != image_id);
                }
            }
        }
    }
}

// =============================================================================
// Access Handle
// =============================================================================

/// Inventory operations the dashboard calls.
///
/// Every mutating operation follows the two-phase commit pattern: the
/// network call must succeed before local state mutates. Name-carrying
/// mutations validate before the call. Failures of either kind leave
/// state unchanged.
#[derive(Debug, Clone)]
pub struct Inventory<A> {
    api: A,
    store: Store<InventoryState>,
}

impl<A: InventoryApi> Inventory<A> {
    pub fn new(api: A) -> Self {
        Inventory {
            api,
            store: Store::default(),
        }
    }

    /// The underlying store, for subscribers and selectors.
    pub fn store(&self) -> &Store<InventoryState> {
        &self.store
    }

    /// Fetches the full inventory from the boundary and replaces state.
    /// Not retried automatically; a failed load is the caller's
    /// retry-panel to show.
    pub async fn init(&self) -> ApiResult<()> {
        let items = self.api.list_items().await?;
        self.store.dispatch(InventoryAction::Replace(items));
        Ok(())
    }

    /// Local two-level lookup (no network). Returns a clone.
    pub fn find_item(&self, id: i64) -> Option<Item> {
        self.store.read(|state| state.find_item(id).cloned())
    }

    /// Single-item fetch (`GET /inventory/:id`). Does not touch state;
    /// used by detail drawers that want server truth.
    pub async fn get_item(&self, id: i64) -> ApiResult<Item> {
        self.api.get_item(id).await
    }

    /// Patches an item on the server, then mirrors the same fields onto
    /// the matching in-memory item.
    ///
    /// A patched name is validated BEFORE any network call; an invalid
    /// one rejects with the path-keyed field errors and the boundary is
    /// never touched.
    pub async fn update_item(&self, patch: ItemPatch) -> Result<(), InventoryError> {
        if let Some(name) = &patch.name {
            validate_item_name(name).map_err(|err| InventoryError::Invalid(err.into()))?;
        }

        self.api.update_item(&patch).await?;
        debug!(item_id = patch.id, "item patched");
        self.store.dispatch(InventoryAction::Patch(patch));
        Ok(())
    }

    /// Creates a root item and appends it to state. The draft name is
    /// validated before the boundary is touched.
    pub async fn add_item(&self, draft: ItemDraft) -> Result<Item, InventoryError> {
        validate_item_name(&draft.name).map_err(|err| InventoryError::Invalid(err.into()))?;

        let item = self.api.add_item(&draft).await?;
        self.store.dispatch(InventoryAction::Append(item.clone()));
        Ok(item)
    }

    /// Creates a child item under `parent_id` and appends it to the
    /// parent's children. The draft name is validated like
    /// [`Inventory::add_item`].
    pub async fn add_child_item(
        &self,
        parent_id: i64,
        base_item_id: i64,
        draft: ItemDraft,
    ) -> Result<Item, InventoryError> {
        validate_item_name(&draft.name).map_err(|err| InventoryError::Invalid(err.into()))?;

        let child = self.api.add_child_item(parent_id, base_item_id, &draft).await?;
        self.store.dispatch(InventoryAction::AppendChild {
            parent_id,
            child: child.clone(),
        });
        Ok(child)
    }

    /// Deletes an item server-side, then removes it (and implicitly its
    /// children) from state.
    pub async fn delete_item(&self, id: i64) -> ApiResult<()> {
        self.api.delete_item(id).await?;
        self.store.dispatch(InventoryAction::Remove(id));
        Ok(())
    }

    /// Sets or clears the retirement timestamp. `None` un-retires and
    /// makes the item eligible for reservation again.
    pub async fn retire_item(&self, id: i64, date: Option<DateTime<Utc>>) -> ApiResult<()> {
        self.api.retire_item(id, date).await?;
        self.store.dispatch(InventoryAction::SetRetired { id, date });
        Ok(())
    }

    /// Uploads an image (progress callback and cancellation token are
    /// forwarded to the boundary) and attaches it to the owning item.
    /// A cancelled upload rejects with status 499 and appends nothing.
    pub async fn upload_image(&self, request: UploadImageRequest) -> ApiResult<ItemImage> {
        let item_id = request.item_id;
        let image = self.api.upload_image(request).await?;
        self.store.dispatch(InventoryAction::AppendImage {
            item_id,
            image: image.clone(),
        });
        Ok(image)
    }

    /// Deletes an image server-side, then detaches it from the owning
    /// item's list.
    pub async fn delete_image(&self, item_id: i64, image_id: i64) -> ApiResult<()> {
        self.api.delete_image(image_id).await?;
        self.store.dispatch(InventoryAction::RemoveImage { item_id, image_id });
        Ok(())
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
