//! # Session Store
//!
//! The single authenticated principal, or empty when logged out.
//!
//! ## State Machine
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                      Session Lifecycle                                  │
//! │                                                                         │
//! │              login() / vault rehydration                                │
//! │  LoggedOut ────────────────────────────────► LoggedIn                  │
//! │      ▲                                          │                       │
//! │      │      logout() / failed guard check       │                       │
//! │      └──────────────────────────────────────────┘                       │
//! │                                                                         │
//! │  Vault writes happen exactly at transition points:                      │
//! │    login     ──► save    email/name update ──► save                    │
//! │    logout    ──► clear                                                  │
//! │                                                                         │
//! │  Verification gate: login returns the principal with `verified`;       │
//! │  holding an unverified user at the gate is the CALLER's branch,         │
//! │  driven by that flag. The store does not enforce it.                    │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use tracing::{info, warn};

use stockroom_api::{ApiResult, CreateAccountOptions, SessionApi};
use stockroom_core::User;

use crate::store::{Reduce, Store};
use crate::vault::SessionVault;

// =============================================================================
// State
// =============================================================================

/// The session principal. Empty means logged out.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SessionState {
    pub user: Option<User>,
}

impl SessionState {
    /// True iff a principal with a non-empty identity is present.
    #[inline]
    pub fn is_authenticated(&self) -> bool {
        self.user.is_some()
    }

    /// True iff the principal passes the admin dashboard gate. False for
    /// regular users and for the unauthenticated state.
    #[inline]
    pub fn is_admin_or_super(&self) -> bool {
        self.user
            .as_ref()
            .map(|user| user.role.is_admin_or_super())
            .unwrap_or(false)
    }
}

// =============================================================================
// Actions
// =============================================================================

/// Session transitions. Closed set, exhaustively matched.
#[derive(Debug, Clone)]
pub enum SessionAction {
    /// Install a principal (login or vault rehydration).
    SignIn(User),
    /// Reset to logged-out.
    SignOut,
    /// Mirror a server-acknowledged email change.
    SetEmail(String),
    /// Mirror a server-acknowledged name change.
    SetName(String),
}

impl Reduce for SessionState {
    type Action = SessionAction;

    fn reduce(&mut self, action: SessionAction) {
        match action {
            SessionAction::SignIn(user) => {
                self.user = Some(user);
            }
            SessionAction::SignOut => {
                self.user = None;
            }
            SessionAction::SetEmail(email) => {
                if let Some(user) = &mut self.user {
                    user.email = email;
                }
            }
            SessionAction::SetName(full_name) => {
                if let Some(user) = &mut self.user {
                    user.full_name = full_name;
                }
            }
        }
    }
}

// =============================================================================
// Access Handle
// =============================================================================

/// Session and account operations.
///
/// Construction rehydrates the principal from the vault, so a full page
/// reload lands back in LoggedIn without a network round-trip. Absent or
/// malformed vault content starts the session LoggedOut.
#[derive(Debug, Clone)]
pub struct Session<A> {
    api: A,
    store: Store<SessionState>,
    vault: SessionVault,
}

impl<A: SessionApi> Session<A> {
    pub fn new(api: A, vault: SessionVault) -> Self {
        let user = vault.load();
        if user.is_some() {
            info!("session rehydrated from vault");
        }
        Session {
            api,
            store: Store::new(SessionState { user }),
            vault,
        }
    }

    /// The underlying store, for subscribers and the route guard.
    pub fn store(&self) -> &Store<SessionState> {
        &self.store
    }

    /// The persistence boundary, for the route guard.
    pub fn vault(&self) -> &SessionVault {
        &self.vault
    }

    /// Mirrors the in-memory principal to the vault. Persistence is a
    /// best-effort mirror of server truth; a failed write is logged, not
    /// surfaced.
    fn persist(&self, user: &User) {
        if let Err(err) = self.vault.save(user) {
            warn!(%err, "failed to persist session");
        }
    }

    // -------------------------------------------------------------------------
    // Authentication
    // -------------------------------------------------------------------------

    /// Authenticates and installs the principal.
    ///
    /// Rejects with status 401 on invalid credentials; callers branch on
    /// the status code. The returned `verified` flag drives the caller's
    /// verification gate — an unverified principal is still installed.
    pub async fn login(&self, email: &str, password: &str) -> ApiResult<User> {
        let user = self.api.login(email, password).await?;
        self.persist(&user);
        self.store.dispatch(SessionAction::SignIn(user.clone()));
        info!(user_id = user.id, "logged in");
        Ok(user)
    }

    /// Clears the vault key and resets state to logged-out.
    pub fn logout(&self) {
        self.vault.clear();
        self.store.dispatch(SessionAction::SignOut);
        info!("logged out");
    }

    /// True iff a principal is present.
    pub fn is_authenticated(&self) -> bool {
        self.store.read(|state| state.is_authenticated())
    }

    /// True iff the principal passes the admin dashboard gate.
    pub fn is_admin_or_super(&self) -> bool {
        self.store.read(|state| state.is_admin_or_super())
    }

    // -------------------------------------------------------------------------
    // Account Lifecycle (thin boundary calls)
    // -------------------------------------------------------------------------

    pub async fn create_account(&self, opts: &CreateAccountOptions) -> ApiResult<()> {
        self.api.register(opts).await
    }

    pub async fn resend_verification_email(&self, email: &str) -> ApiResult<()> {
        self.api.resend_verification_email(email).await
    }

    /// Confirms the account; 406 means the link is invalid or expired.
    pub async fn verify_account(&self, user_id: i64, verification_code: &str) -> ApiResult<()> {
        self.api.verify_account(user_id, verification_code).await
    }

    pub async fn send_password_reset_email(&self, email: &str) -> ApiResult<()> {
        self.api.send_password_reset_email(email).await
    }

    pub async fn reset_password(
        &self,
        user_id: i64,
        reset_code: &str,
        password: &str,
    ) -> ApiResult<()> {
        self.api.reset_password(user_id, reset_code, password).await
    }

    pub async fn send_update_email(&self, new_email: &str) -> ApiResult<()> {
        self.api.send_update_email(new_email).await
    }

    // -------------------------------------------------------------------------
    // Profile Mutations (vault + memory patched after server ack)
    // -------------------------------------------------------------------------

    /// Commits an email change, then patches both the vault and the
    /// in-memory principal. Nothing changes locally before the server
    /// acknowledges.
    pub async fn update_email(&self, new_email: &str) -> ApiResult<()> {
        self.api.update_email(new_email).await?;
        self.store
            .dispatch(SessionAction::SetEmail(new_email.to_string()));
        if let Some(user) = self.store.read(|state| state.user.clone()) {
            self.persist(&user);
        }
        Ok(())
    }

    /// Commits a display-name change, mirroring like [`Session::update_email`].
    pub async fn update_name(&self, full_name: &str) -> ApiResult<()> {
        self.api.update_name(full_name).await?;
        self.store
            .dispatch(SessionAction::SetName(full_name.to_string()));
        if let Some(user) = self.store.read(|state| state.user.clone()) {
            self.persist(&user);
        }
        Ok(())
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
