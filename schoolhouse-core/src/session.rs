//! Session data owned by the process-wide client context.
//!
//! Written only by the authentication flows; read by every route guard.

use crate::identity::EntityId;
use crate::role::Role;
use serde::{Deserialize, Serialize};

/// The authenticated user attached to a session.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SessionUser {
    pub user_id: EntityId,
    pub name: String,
    pub email: String,
    pub role: Role,
}

/// Authentication state read by route guards.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Session {
    pub authenticated: bool,
    pub user: Option<SessionUser>,
}

impl Session {
    /// Session before login or after logout.
    pub fn anonymous() -> Self {
        Self {
            authenticated: false,
            user: None,
        }
    }

    pub fn for_user(user: SessionUser) -> Self {
        Self {
            authenticated: true,
            user: Some(user),
        }
    }

    pub fn role(&self) -> Option<Role> {
        self.user.as_ref().map(|u| u.role)
    }
}

impl Default for Session {
    fn default() -> Self {
        Self::anonymous()
    }
}
