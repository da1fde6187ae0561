//! The unit of a single authorization query.

use serde::{Deserialize, Serialize};

use crate::capability::Capability;
use crate::module::ModuleKey;

/// A single (module, capability) question.
///
/// Compound requirements combine several checks under an all/any
/// combinator at the query site.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PermissionCheck {
    pub module: ModuleKey,
    pub permission: Capability,
}

impl PermissionCheck {
    pub fn new(module: impl Into<ModuleKey>, permission: Capability) -> Self {
        Self {
            module: module.into(),
            permission,
        }
    }
}

impl core::fmt::Display for PermissionCheck {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        write!(f, "{}:{}", self.module, self.permission)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_is_module_colon_capability() {
        let check = PermissionCheck::new("documents", Capability::Delete);
        assert_eq!(check.to_string(), "documents:delete");
    }
}
