//! Permission-able business capability areas.

use std::borrow::Cow;

use serde::{Deserialize, Serialize};

use crate::error::DomainError;

/// Module identifier.
///
/// Module keys are modeled as opaque strings (e.g. "documents",
/// "risk_management"). They are the unit against which capabilities are
/// granted and checked.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ModuleKey(Cow<'static, str>);

impl ModuleKey {
    pub fn new(key: impl Into<Cow<'static, str>>) -> Self {
        Self(key.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl core::fmt::Display for ModuleKey {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&'static str> for ModuleKey {
    fn from(value: &'static str) -> Self {
        Self::new(value)
    }
}

impl From<String> for ModuleKey {
    fn from(value: String) -> Self {
        Self::new(value)
    }
}

/// A named, permission-able business capability area.
///
/// Modules are created/retired by administrators; the policy engine only
/// reads active ones. Inactive modules never appear in a resolved
/// capability table.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Module {
    pub key: ModuleKey,
    pub name: String,
    pub description: Option<String>,
    pub active: bool,
}

impl Module {
    /// Create an active module, validating its key and name.
    pub fn new(
        key: impl Into<ModuleKey>,
        name: impl Into<String>,
    ) -> Result<Self, DomainError> {
        let key = key.into();
        let name = name.into();

        if key.as_str().trim().is_empty() {
            return Err(DomainError::validation("module key cannot be empty"));
        }
        if name.trim().is_empty() {
            return Err(DomainError::validation("module name cannot be empty"));
        }

        Ok(Self {
            key,
            name,
            description: None,
            active: true,
        })
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    /// Retire the module; grants against it stop materializing.
    pub fn deactivate(mut self) -> Self {
        self.active = false;
        self
    }
}
