//! Authenticated identity as seen by the policy engine.

use serde::{Deserialize, Serialize};

use crate::id::UserId;

/// The minimal identity record the policy engine consumes.
///
/// Owned by the identity source; immutable from the engine's perspective.
/// Lifecycle is tied to the session (created on sign-in, destroyed on
/// sign-out).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Identity {
    pub id: UserId,
    pub is_admin: bool,
    pub is_super_admin: bool,
}

impl Identity {
    pub fn user(id: UserId) -> Self {
        Self {
            id,
            is_admin: false,
            is_super_admin: false,
        }
    }

    pub fn admin(id: UserId) -> Self {
        Self {
            id,
            is_admin: true,
            is_super_admin: false,
        }
    }

    pub fn super_admin(id: UserId) -> Self {
        Self {
            id,
            is_admin: false,
            is_super_admin: true,
        }
    }

    /// Whether either coarse role flag grants the role override.
    pub fn has_role_override(&self) -> bool {
        self.is_admin || self.is_super_admin
    }
}
