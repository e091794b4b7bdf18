//! Session context
//!
//! A `Session` is created when the application starts, refreshed on auth
//! events and cleared at sign-out. Every operation that depends on the
//! current user takes it by reference.

use crate::model::{Role, User};

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Session {
    user: Option<User>,
}

impl Session {
    /// A session with no signed-in user
    pub fn anonymous() -> Self {
        Self { user: None }
    }

    pub fn signed_in(user: User) -> Self {
        Self { user: Some(user) }
    }

    pub fn user(&self) -> Option<&User> {
        self.user.as_ref()
    }

    pub fn user_id(&self) -> Option<&str> {
        self.user.as_ref().map(|u| u.id.as_str())
    }

    pub fn is_signed_in(&self) -> bool {
        self.user.is_some()
    }

    pub fn role(&self) -> Option<Role> {
        self.user.as_ref().map(|u| u.role)
    }

    /// Replace the current user (sign-in or token refresh)
    pub fn sign_in(&mut self, user: User) {
        tracing::debug!(user_id = %user.id, "Session signed in");
        self.user = Some(user);
    }

    /// Drop the current user
    pub fn sign_out(&mut self) {
        if let Some(user) = self.user.take() {
            tracing::debug!(user_id = %user.id, "Session signed out");
        }
    }
}
