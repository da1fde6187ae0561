//! Persisted per-user, per-module permission grants.

use serde::{Deserialize, Serialize};

use crate::capability::{Capability, CapabilitySet};
use crate::id::UserId;
use crate::module::ModuleKey;

/// One grant row per (user, module).
///
/// # Invariants
/// - At most one grant exists per (user, module) pair; re-assignment
///   updates the row in place.
/// - A grant is never consulted for admin/super-admin holders (the role
///   override short-circuits lookup) nor for bypassed sessions.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PermissionGrant {
    pub user_id: UserId,
    pub module_key: ModuleKey,
    pub can_view: bool,
    pub can_edit: bool,
    pub can_delete: bool,
    pub can_create: bool,
}

impl PermissionGrant {
    /// A grant conveying nothing (useful as a base for builders).
    pub fn empty(user_id: UserId, module_key: impl Into<ModuleKey>) -> Self {
        Self {
            user_id,
            module_key: module_key.into(),
            can_view: false,
            can_edit: false,
            can_delete: false,
            can_create: false,
        }
    }

    pub fn with(mut self, capability: Capability) -> Self {
        match capability {
            Capability::View => self.can_view = true,
            Capability::Edit => self.can_edit = true,
            Capability::Delete => self.can_delete = true,
            Capability::Create => self.can_create = true,
        }
        self
    }

    /// Project the grant row into the derived capability set.
    pub fn capabilities(&self) -> CapabilitySet {
        CapabilitySet {
            view: self.can_view,
            edit: self.can_edit,
            delete: self.can_delete,
            create: self.can_create,
        }
    }
}
