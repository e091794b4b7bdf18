//! Role assignment and authorization checks

use crate::model::{Role, User};
use crate::session::Session;

/// Policy configuration
#[derive(Debug, Clone, Default)]
pub struct RolePolicy {
    /// Email addresses granted the admin role
    admin_emails: Vec<String>,
}

impl RolePolicy {
    pub fn new(admin_emails: Vec<String>) -> Self {
        let admin_emails = admin_emails
            .into_iter()
            .map(|e| e.trim().to_lowercase())
            .filter(|e| !e.is_empty())
            .collect();
        Self { admin_emails }
    }

    /// Role for an email address (case-insensitive match)
    pub fn role_for(&self, email: &str) -> Role {
        let email = email.trim().to_lowercase();
        if self.admin_emails.iter().any(|admin| *admin == email) {
            Role::Admin
        } else {
            Role::Reader
        }
    }

    /// Build a user with its role resolved from this policy
    pub fn user(&self, id: impl Into<String>, email: impl Into<String>) -> User {
        let email = email.into();
        User {
            id: id.into(),
            role: self.role_for(&email),
            email,
        }
    }
}

/// Whether the session may use admin operations
pub fn can_administer(session: &Session) -> bool {
    matches!(session.role(), Some(Role::Admin))
}

/// Return the admin user or an access error
pub fn require_admin(session: &Session) -> Result<&User, AccessDenied> {
    match session.user() {
        Some(user) if user.role == Role::Admin => Ok(user),
        Some(user) => Err(AccessDenied::NotAdmin {
            user_id: user.id.clone(),
        }),
        None => Err(AccessDenied::NotSignedIn),
    }
}

/// Authorization failures
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum AccessDenied {
    #[error("Sign-in required")]
    NotSignedIn,
    #[error("User {user_id} is not an administrator")]
    NotAdmin { user_id: String },
}
