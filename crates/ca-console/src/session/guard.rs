//! Route guards deciding whether a role-scoped operation may proceed.

use super::{Role, SessionStore};
use crate::error::{Error, Result};
use crate::token;
use chrono::{DateTime, Utc};
use std::sync::Arc;
use tracing::{info, warn};

/// Outcome of a guard check
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GuardDecision {
    /// Render the guarded content; carries the session token when one was required
    Allow { token: Option<String> },
    /// Navigate away and render nothing
    Redirect { to: &'static str },
}

impl GuardDecision {
    pub fn is_allowed(&self) -> bool {
        matches!(self, GuardDecision::Allow { .. })
    }
}

/// Session guard backed by a shared [`SessionStore`]
#[derive(Clone)]
pub struct SessionGuard {
    store: Arc<dyn SessionStore>,
}

impl SessionGuard {
    pub fn new(store: Arc<dyn SessionStore>) -> Self {
        Self { store }
    }

    pub fn store(&self) -> &Arc<dyn SessionStore> {
        &self.store
    }

    /// Require a valid session for `role`
    pub fn require(&self, role: Role) -> GuardDecision {
        self.require_at(role, Utc::now())
    }

    /// Require a valid session for `role` as of `now`
    ///
    /// An absent, malformed or expired token clears the slot and redirects
    /// to the role's login route.
    pub fn require_at(&self, role: Role, now: DateTime<Utc>) -> GuardDecision {
        let stored = self.store.get(role);
        if token::is_valid_at(stored.as_deref(), now) {
            return GuardDecision::Allow { token: stored };
        }

        if stored.is_some() {
            info!(%role, "Stored session is invalid or expired, clearing it");
            if let Err(e) = self.store.clear(role) {
                warn!(%role, error = %e, "Failed to clear invalid session");
            }
        }

        GuardDecision::Redirect {
            to: role.login_route(),
        }
    }

    /// Keep signed-in users away from public auth pages (login, register)
    pub fn public_only(&self, role: Role) -> GuardDecision {
        self.public_only_at(role, Utc::now())
    }

    pub fn public_only_at(&self, role: Role, now: DateTime<Utc>) -> GuardDecision {
        let stored = self.store.get(role);
        if token::is_valid_at(stored.as_deref(), now) {
            GuardDecision::Redirect {
                to: role.home_route(),
            }
        } else {
            GuardDecision::Allow { token: None }
        }
    }

    /// Token for `role` or the session error a caller should redirect on
    pub fn authorize(&self, role: Role) -> Result<String> {
        self.authorize_at(role, Utc::now())
    }

    pub fn authorize_at(&self, role: Role, now: DateTime<Utc>) -> Result<String> {
        match self.require_at(role, now) {
            GuardDecision::Allow { token: Some(token) } => Ok(token),
            GuardDecision::Allow { token: None } | GuardDecision::Redirect { .. } => {
                Err(Error::SessionExpired {
                    role,
                    redirect_to: role.login_route(),
                })
            }
        }
    }

    /// Drop the role's session after the backend rejected it
    pub fn invalidate(&self, role: Role) -> Error {
        if let Err(e) = self.store.clear(role) {
            warn!(%role, error = %e, "Failed to clear rejected session");
        }
        Error::SessionExpired {
            role,
            redirect_to: role.login_route(),
        }
    }
}
