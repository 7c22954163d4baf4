//! # Route Guard
//!
//! Session revalidation on navigation into protected routes.
//!
//! ## Re-entrancy
//! The check runs on EVERY pathname change, not once: after a full page
//! reload the in-memory store is empty while the vault still holds the
//! principal, so the guard re-derives identity from the vault before
//! deciding. It is safe to invoke repeatedly and concurrently with
//! in-flight navigation — rehydration dispatches the same `SignIn` and
//! the decision is pure over the resulting state.

use tracing::debug;

use crate::session::{SessionAction, SessionState};
use crate::store::Store;
use crate::vault::SessionVault;

/// What a route requires of the principal.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RouteRequirement {
    /// Any authenticated principal.
    Authenticated,
    /// An authenticated principal passing the admin gate.
    AdminOrSuper,
}

/// Outcome of a guard check.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GuardDecision {
    /// Navigation may proceed.
    Allow,
    /// Principal could not be established; redirect to the login route.
    RedirectToLogin,
}

/// Revalidates the session on each navigation.
#[derive(Debug, Clone)]
pub struct RouteGuard {
    store: Store<SessionState>,
    vault: SessionVault,
}

impl RouteGuard {
    pub fn new(store: Store<SessionState>, vault: SessionVault) -> Self {
        RouteGuard { store, vault }
    }

    /// Checks the requirement, rehydrating from the vault when the
    /// in-memory principal is incomplete.
    pub fn check(&self, requirement: RouteRequirement) -> GuardDecision {
        let mut state = self.store.snapshot();

        if !state.is_authenticated() {
            if let Some(user) = self.vault.load() {
                debug!("guard rehydrating session from vault");
                self.store.dispatch(SessionAction::SignIn(user));
                state = self.store.snapshot();
            }
        }

        let allowed = match requirement {
            RouteRequirement::Authenticated => state.is_authenticated(),
            RouteRequirement::AdminOrSuper => state.is_admin_or_super(),
        };

        if allowed {
            GuardDecision::Allow
        } else {
            GuardDecision::RedirectToLogin
        }
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::test_user;
    use stockroom_core::Role;

    fn scratch_vault() -> (tempfile::TempDir, SessionVault) {
        let dir = tempfile::tempdir().unwrap();
        let vault = SessionVault::new(dir.path());
        (dir, vault)
    }

    #[test]
    fn test_redirects_when_no_principal_anywhere() {
        let (_dir, vault) = scratch_vault();
        let guard = RouteGuard::new(Store::default(), vault);

        assert_eq!(
            guard.check(RouteRequirement::Authenticated),
            GuardDecision::RedirectToLogin
        );
    }

    #[test]
    fn test_rehydrates_from_vault_after_reload() {
        let (_dir, vault) = scratch_vault();
        vault.save(&test_user(Role::User, true)).unwrap();

        // Fresh store simulates a full page reload
        let store: Store<SessionState> = Store::default();
        let guard = RouteGuard::new(store.clone(), vault);

        assert_eq!(
            guard.check(RouteRequirement::Authenticated),
            GuardDecision::Allow
        );
        // Rehydration is visible to the rest of the app
        assert!(store.snapshot().is_authenticated());
    }

    #[test]
    fn test_admin_gate_rejects_regular_user() {
        let (_dir, vault) = scratch_vault();
        vault.save(&test_user(Role::User, true)).unwrap();
        let guard = RouteGuard::new(Store::default(), vault);

        assert_eq!(
            guard.check(RouteRequirement::Authenticated),
            GuardDecision::Allow
        );
        assert_eq!(
            guard.check(RouteRequirement::AdminOrSuper),
            GuardDecision::RedirectToLogin
        );
    }

    #[test]
    fn test_check_is_reentrant() {
        let (_dir, vault) = scratch_vault();
        vault.save(&test_user(Role::Admin, true)).unwrap();
        let store: Store<SessionState> = Store::default();
        let guard = RouteGuard::new(store.clone(), vault);

        // Repeated checks (every pathname change) keep deciding the same
        // way and do not pile up duplicate principals.
        for _ in 0..5 {
            assert_eq!(
                guard.check(RouteRequirement::AdminOrSuper),
                GuardDecision::Allow
            );
        }
        assert!(store.snapshot().is_authenticated());
    }
}
