//! Capabilities a user can hold on a module.

use serde::{Deserialize, Serialize};

/// A single capability on a module.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Capability {
    View,
    Edit,
    Delete,
    Create,
}

impl Capability {
    pub fn as_str(&self) -> &'static str {
        match self {
            Capability::View => "view",
            Capability::Edit => "edit",
            Capability::Delete => "delete",
            Capability::Create => "create",
        }
    }

    /// All four capabilities, in declaration order.
    pub const ALL: [Capability; 4] = [
        Capability::View,
        Capability::Edit,
        Capability::Delete,
        Capability::Create,
    ];
}

impl core::fmt::Display for Capability {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// The set of capabilities held on one module.
///
/// The default value denies everything; absence of explicit data must never
/// read as permission.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct CapabilitySet {
    pub view: bool,
    pub edit: bool,
    pub delete: bool,
    pub create: bool,
}

impl CapabilitySet {
    /// A set granting nothing (the fail-closed default).
    pub fn none() -> Self {
        Self::default()
    }

    /// A set granting all four capabilities (role-override shortcut).
    pub fn all() -> Self {
        Self {
            view: true,
            edit: true,
            delete: true,
            create: true,
        }
    }

    pub fn allows(&self, capability: Capability) -> bool {
        match capability {
            Capability::View => self.view,
            Capability::Edit => self.edit,
            Capability::Delete => self.delete,
            Capability::Create => self.create,
        }
    }

    pub fn is_empty(&self) -> bool {
        !(self.view || self.edit || self.delete || self.create)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_set_denies_everything() {
        let set = CapabilitySet::default();
        for capability in Capability::ALL {
            assert!(!set.allows(capability));
        }
        assert!(set.is_empty());
    }

    #[test]
    fn all_set_allows_everything() {
        let set = CapabilitySet::all();
        for capability in Capability::ALL {
            assert!(set.allows(capability));
        }
        assert!(!set.is_empty());
    }

    #[test]
    fn allows_maps_each_capability_to_its_flag() {
        let set = CapabilitySet {
            view: true,
            edit: false,
            delete: true,
            create: false,
        };
        assert!(set.allows(Capability::View));
        assert!(!set.allows(Capability::Edit));
        assert!(set.allows(Capability::Delete));
        assert!(!set.allows(Capability::Create));
    }

    #[test]
    fn capability_serializes_lowercase() {
        let json = serde_json::to_string(&Capability::Delete).unwrap();
        assert_eq!(json, "\"delete\"");
    }
}
