//! # Registered Users Store
//!
//! Canonical list of all registered users for the admin user-management
//! view. Users are never removed, only role-changed; there is no delete
//! operation by design.

use tracing::debug;

use stockroom_api::{ApiResult, UserDirectoryApi};
use stockroom_core::datetime::format_display_date;
use stockroom_core::{BaseUser, Role};

use crate::store::{Reduce, Store};

// =============================================================================
// State
// =============================================================================

/// A registered user plus the display-formatted registration date.
#[derive(Debug, Clone, PartialEq)]
pub struct UserRow {
    pub user: BaseUser,

    /// `created` rendered in the display timezone.
    pub created_display: String,
}

impl UserRow {
    pub fn new(user: BaseUser) -> Self {
        let created_display = format_display_date(user.created);
        UserRow {
            user,
            created_display,
        }
    }
}

/// The registered-user directory.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct DirectoryState {
    pub rows: Vec<UserRow>,
}

impl DirectoryState {
    pub fn find(&self, user_id: i64) -> Option<&UserRow> {
        self.rows.iter().find(|row| row.user.id == user_id)
    }
}

// =============================================================================
// Actions
// =============================================================================

/// Mutations of the directory. Closed set, exhaustively matched.
#[derive(Debug, Clone)]
pub enum DirectoryAction {
    /// Replace the full list (initial load).
    Replace(Vec<UserRow>),
    /// Mirror a server-acknowledged role change in place.
    SetRole { user_id: i64, role: Role },
}

impl Reduce for DirectoryState {
    type Action = DirectoryAction;

    fn reduce(&mut self, action: DirectoryAction) {
        match action {
            DirectoryAction::Replace(rows) => {
                self.rows = rows;
            }
            DirectoryAction::SetRole { user_id, role } => {
                if let Some(row) = self.rows.iter_mut().find(|row| row.user.id == user_id) {
                    row.user.role = role;
                }
            }
        }
    }
}

// =============================================================================
// Access Handle
// =============================================================================

/// Directory operations the admin view calls.
#[derive(Debug, Clone)]
pub struct Directory<A> {
    api: A,
    store: Store<DirectoryState>,
}

impl<A: UserDirectoryApi> Directory<A> {
    pub fn new(api: A) -> Self {
        Directory {
            api,
            store: Store::default(),
        }
    }

    /// The underlying store, for subscribers and selectors.
    pub fn store(&self) -> &Store<DirectoryState> {
        &self.store
    }

    /// Fetches all registered users, formats each registration date for
    /// display, and replaces state.
    pub async fn init(&self) -> ApiResult<()> {
        let users = self.api.list_users().await?;
        let rows = users.into_iter().map(UserRow::new).collect();
        self.store.dispatch(DirectoryAction::Replace(rows));
        Ok(())
    }

    /// Sends a role change, then mutates the matching record in place.
    pub async fn update_role(&self, user_id: i64, role: Role) -> ApiResult<()> {
        self.api.update_role(user_id, role).await?;
        debug!(user_id, ?role, "role updated");
        self.store.dispatch(DirectoryAction::SetRole { user_id, role });
        Ok(())
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::{test_base_user, MockDirectoryApi};
    use stockroom_api::ApiError;

    #[tokio::test]
    async fn test_init_formats_created_for_display() {
        let api = MockDirectoryApi::new();
        api.set_users(vec![test_base_user(1, Role::User)]);
        let directory = Directory::new(api);

        directory.init().await.unwrap();
        let rows = directory.store().snapshot().rows;
        assert_eq!(rows.len(), 1);
        // Fixture registers users at 2024-01-01T00:00:00Z; +5h display
        // offset stays on Jan 01.
        assert_eq!(rows[0].created_display, "Jan 01, 2024");
    }

    #[tokio::test]
    async fn test_update_role_mutates_in_place() {
        let api = MockDirectoryApi::new();
        api.set_users(vec![
            test_base_user(1, Role::User),
            test_base_user(2, Role::User),
        ]);
        let directory = Directory::new(api);
        directory.init().await.unwrap();

        directory.update_role(2, Role::Admin).await.unwrap();

        let state = directory.store().snapshot();
        assert_eq!(state.find(2).unwrap().user.role, Role::Admin);
        assert_eq!(state.find(1).unwrap().user.role, Role::User);
    }

    #[tokio::test]
    async fn test_failed_role_change_leaves_state_unchanged() {
        let api = MockDirectoryApi::new();
        api.set_users(vec![test_base_user(1, Role::User)]);
        let directory = Directory::new(api.clone());
        directory.init().await.unwrap();
        let before = directory.store().snapshot();

        api.fail_next(ApiError::new(404, "No such user"));
        let err = directory.update_role(1, Role::Super).await.unwrap_err();

        assert!(err.is_not_found());
        assert_eq!(directory.store().snapshot(), before);
    }
}
