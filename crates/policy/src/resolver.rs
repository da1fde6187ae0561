//! Permission resolution.
//!
//! Turns (identity, role flags, grant rows) into a materialized
//! [`CapabilityTable`]. Resolution is all-or-nothing per refresh; the table
//! is never patched incrementally and a fetch failure yields a fail-closed
//! outcome, never a partial one.

use std::collections::HashMap;

use thiserror::Error;

use praxis_core::{Capability, CapabilitySet, Identity, Module, ModuleKey, PermissionGrant};
use praxis_store::StoreError;

/// Identity or grant fetch failed.
///
/// The caller resolves this to an empty, fail-closed table plus a reported
/// error state — never to an exception that could crash into an unguarded
/// render.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ResolutionError {
    #[error("permission resolution failed: {0}")]
    Store(#[from] StoreError),
}

/// Materialized capability table for one identity.
///
/// Derived, not persisted; rebuilt whole whenever identity, role flags, or
/// the raw grant set change.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CapabilityTable {
    entries: HashMap<ModuleKey, CapabilitySet>,
}

impl CapabilityTable {
    pub fn empty() -> Self {
        Self::default()
    }

    /// The capability set for a module; missing entry reads as the
    /// fail-closed empty set.
    pub fn capabilities_for(&self, module: &ModuleKey) -> CapabilitySet {
        self.entries.get(module).copied().unwrap_or_default()
    }

    pub fn allows(&self, module: &ModuleKey, capability: Capability) -> bool {
        self.capabilities_for(module).allows(capability)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// Resolve the capability table for an identity.
///
/// - Absent identity: empty table, every check fails.
/// - Admin/super-admin: all four capabilities on every active module
///   (role override; per-module grants are not consulted).
/// - Otherwise: one entry per active module, taken from the matching
///   grant row; a missing row materializes as all-false.
///
/// Inactive modules never appear in the table, and neither do grants
/// against unknown modules.
pub fn resolve(
    identity: Option<&Identity>,
    modules: &[Module],
    grants: &[PermissionGrant],
) -> CapabilityTable {
    let Some(identity) = identity else {
        return CapabilityTable::empty();
    };

    let active = modules.iter().filter(|m| m.active);

    if identity.has_role_override() {
        return CapabilityTable {
            entries: active.map(|m| (m.key.clone(), CapabilitySet::all())).collect(),
        };
    }

    let by_module: HashMap<&ModuleKey, &PermissionGrant> = grants
        .iter()
        .filter(|g| g.user_id == identity.id)
        .map(|g| (&g.module_key, g))
        .collect();

    CapabilityTable {
        entries: active
            .map(|m| {
                let set = by_module
                    .get(&m.key)
                    .map(|g| g.capabilities())
                    .unwrap_or_default();
                (m.key.clone(), set)
            })
            .collect(),
    }
}

/// Lifecycle of the cached capability table.
///
/// `Unresolved` → `Resolved` on a successful refresh; `Resolved` → `Stale`
/// on invalidation (identity change, grant mutation); `Failed` on a fetch
/// error. Only `Resolved` ever yields a table; every other state reads as
/// fail-closed.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum Resolution {
    #[default]
    Unresolved,
    Resolved {
        table: CapabilityTable,
        epoch: u64,
    },
    Stale {
        table: CapabilityTable,
        epoch: u64,
    },
    Failed {
        epoch: u64,
    },
}

impl Resolution {
    /// The usable table, if any. `Stale` deliberately yields nothing: a
    /// table known to belong to an outdated identity must not answer
    /// checks.
    pub fn table(&self) -> Option<&CapabilityTable> {
        match self {
            Resolution::Resolved { table, .. } => Some(table),
            _ => None,
        }
    }

    /// Whether a refresh is still needed before decisions are meaningful.
    ///
    /// A `Resolved` or `Failed` state produced under an older session
    /// epoch counts as pending again: the identity has changed underneath
    /// it.
    pub fn is_pending(&self, current_epoch: u64) -> bool {
        match self {
            Resolution::Unresolved | Resolution::Stale { .. } => true,
            Resolution::Resolved { epoch, .. } | Resolution::Failed { epoch } => {
                *epoch != current_epoch
            }
        }
    }

    /// Mark a resolved table stale, keeping its contents for diagnostics.
    pub fn invalidate(&mut self) {
        if let Resolution::Resolved { table, epoch } = self {
            *self = Resolution::Stale {
                table: std::mem::take(table),
                epoch: *epoch,
            };
        } else if matches!(self, Resolution::Failed { .. }) {
            *self = Resolution::Unresolved;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use praxis_core::UserId;
    use proptest::prelude::*;

    fn modules() -> Vec<Module> {
        vec![
            Module::new("documents", "Documents").unwrap(),
            Module::new("risk_management", "Risk Management").unwrap(),
            Module::new("hr", "Human Resources").unwrap().deactivate(),
        ]
    }

    #[test]
    fn absent_identity_yields_empty_table() {
        let table = resolve(None, &modules(), &[]);
        assert!(table.is_empty());
        assert!(!table.allows(&ModuleKey::new("documents"), Capability::View));
    }

    #[test]
    fn missing_grant_fails_closed() {
        let identity = Identity::user(UserId::new());
        let table = resolve(Some(&identity), &modules(), &[]);

        // Entries exist for active modules but convey nothing.
        assert_eq!(table.len(), 2);
        for capability in Capability::ALL {
            assert!(!table.allows(&ModuleKey::new("documents"), capability));
        }
    }

    #[test]
    fn explicit_grant_materializes() {
        let user = UserId::new();
        let identity = Identity::user(user);
        let grants = vec![
            PermissionGrant::empty(user, "documents")
                .with(Capability::View)
                .with(Capability::Edit),
        ];

        let table = resolve(Some(&identity), &modules(), &grants);

        let key = ModuleKey::new("documents");
        assert!(table.allows(&key, Capability::View));
        assert!(table.allows(&key, Capability::Edit));
        assert!(!table.allows(&key, Capability::Delete));
        assert!(!table.allows(&key, Capability::Create));
    }

    #[test]
    fn inactive_modules_never_materialize() {
        let user = UserId::new();
        let identity = Identity::user(user);
        let grants = vec![PermissionGrant::empty(user, "hr").with(Capability::View)];

        let table = resolve(Some(&identity), &modules(), &grants);
        assert!(!table.allows(&ModuleKey::new("hr"), Capability::View));
    }

    #[test]
    fn grants_for_other_users_are_ignored() {
        let identity = Identity::user(UserId::new());
        let other = UserId::new();
        let grants = vec![PermissionGrant::empty(other, "documents").with(Capability::View)];

        let table = resolve(Some(&identity), &modules(), &grants);
        assert!(!table.allows(&ModuleKey::new("documents"), Capability::View));
    }

    #[test]
    fn role_override_ignores_grant_contents() {
        let user = UserId::new();
        let identity = Identity::admin(user);
        // A deliberately restrictive grant row; the override must win.
        let grants = vec![PermissionGrant::empty(user, "documents")];

        let table = resolve(Some(&identity), &modules(), &grants);
        for capability in Capability::ALL {
            assert!(table.allows(&ModuleKey::new("documents"), capability));
            assert!(table.allows(&ModuleKey::new("risk_management"), capability));
        }
    }

    #[test]
    fn resolution_state_machine_lifecycle() {
        let mut state = Resolution::default();
        assert!(state.is_pending(0));
        assert!(state.table().is_none());

        state = Resolution::Resolved {
            table: CapabilityTable::empty(),
            epoch: 3,
        };
        assert!(!state.is_pending(3));
        assert!(state.table().is_some());

        // Epoch drift makes a resolved table pending again.
        assert!(state.is_pending(4));

        state.invalidate();
        assert!(matches!(state, Resolution::Stale { .. }));
        assert!(state.table().is_none());
        assert!(state.is_pending(3));
    }

    #[test]
    fn failed_resolution_is_settled_for_its_epoch() {
        let state = Resolution::Failed { epoch: 2 };
        assert!(!state.is_pending(2));
        assert!(state.table().is_none());
        assert!(state.is_pending(3));
    }

    proptest! {
        #![proptest_config(ProptestConfig {
            cases: 256,
            ..ProptestConfig::default()
        })]

        /// Property: super-admin identities pass every (module, capability)
        /// check regardless of grant table contents.
        #[test]
        fn master_override_grants_everything(
            grant_flags in prop::collection::vec(prop::bool::ANY, 4),
            capability_idx in 0usize..4,
        ) {
            let user = UserId::new();
            let identity = Identity::super_admin(user);

            let mut grant = PermissionGrant::empty(user, "documents");
            grant.can_view = grant_flags[0];
            grant.can_edit = grant_flags[1];
            grant.can_delete = grant_flags[2];
            grant.can_create = grant_flags[3];

            let table = resolve(Some(&identity), &modules(), &[grant]);
            let capability = Capability::ALL[capability_idx];

            prop_assert!(table.allows(&ModuleKey::new("documents"), capability));
            prop_assert!(table.allows(&ModuleKey::new("risk_management"), capability));
        }

        /// Property: without a grant row, every capability on every active
        /// module reads false (fail-closed default).
        #[test]
        fn no_grant_row_denies_everything(capability_idx in 0usize..4) {
            let identity = Identity::user(UserId::new());
            let table = resolve(Some(&identity), &modules(), &[]);
            let capability = Capability::ALL[capability_idx];

            prop_assert!(!table.allows(&ModuleKey::new("documents"), capability));
            prop_assert!(!table.allows(&ModuleKey::new("risk_management"), capability));
        }
    }
}
