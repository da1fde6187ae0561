//! The permission-grant store boundary.

use std::collections::BTreeMap;
use std::sync::RwLock;

use praxis_core::{Module, ModuleKey, PermissionGrant, UserId};

use crate::error::StoreError;

/// Read/write access to modules and permission grants.
///
/// Reads feed the permission resolver; writes are the admin assignment
/// surface. Uniqueness invariant: at most one grant per (user, module) —
/// `upsert_grant` updates in place rather than inserting a second row.
pub trait GrantStore: Send + Sync {
    fn list_grants(&self, user_id: UserId) -> Result<Vec<PermissionGrant>, StoreError>;

    /// All modules with `active == true`. Retired modules are invisible to
    /// the policy engine.
    fn list_active_modules(&self) -> Result<Vec<Module>, StoreError>;

    fn upsert_grant(&self, grant: PermissionGrant) -> Result<(), StoreError>;

    /// Remove a grant row. Returns whether a row existed.
    fn delete_grant(&self, user_id: UserId, module_key: &ModuleKey) -> Result<bool, StoreError>;
}

#[derive(Debug, Default)]
struct Tables {
    modules: BTreeMap<ModuleKey, Module>,
    grants: BTreeMap<(UserId, ModuleKey), PermissionGrant>,
}

/// In-memory grant store for the application shell and tests.
#[derive(Debug, Default)]
pub struct InMemoryGrantStore {
    tables: RwLock<Tables>,
}

impl InMemoryGrantStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register (or replace) a module definition.
    pub fn register_module(&self, module: Module) {
        let mut tables = self.tables.write().unwrap_or_else(|e| e.into_inner());
        tables.modules.insert(module.key.clone(), module);
    }

    /// Convenience for seeding several modules at once.
    pub fn register_modules(&self, modules: impl IntoIterator<Item = Module>) {
        for module in modules {
            self.register_module(module);
        }
    }
}

impl GrantStore for InMemoryGrantStore {
    fn list_grants(&self, user_id: UserId) -> Result<Vec<PermissionGrant>, StoreError> {
        let tables = self.tables.read().unwrap_or_else(|e| e.into_inner());
        Ok(tables
            .grants
            .range((user_id, ModuleKey::new(""))..)
            .take_while(|((uid, _), _)| *uid == user_id)
            .map(|(_, grant)| grant.clone())
            .collect())
    }

    fn list_active_modules(&self) -> Result<Vec<Module>, StoreError> {
        let tables = self.tables.read().unwrap_or_else(|e| e.into_inner());
        Ok(tables
            .modules
            .values()
            .filter(|m| m.active)
            .cloned()
            .collect())
    }

    fn upsert_grant(&self, grant: PermissionGrant) -> Result<(), StoreError> {
        let mut tables = self.tables.write().unwrap_or_else(|e| e.into_inner());
        tables
            .grants
            .insert((grant.user_id, grant.module_key.clone()), grant);
        Ok(())
    }

    fn delete_grant(&self, user_id: UserId, module_key: &ModuleKey) -> Result<bool, StoreError> {
        let mut tables = self.tables.write().unwrap_or_else(|e| e.into_inner());
        Ok(tables.grants.remove(&(user_id, module_key.clone())).is_some())
    }
}
