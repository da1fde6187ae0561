//! `praxis-core` — domain foundation for the authorization layer.
//!
//! This crate contains **pure domain** primitives (no infrastructure concerns):
//! identifiers, the permission data model, and the domain error model.

pub mod capability;
pub mod check;
pub mod error;
pub mod grant;
pub mod id;
pub mod identity;
pub mod module;

pub use capability::{Capability, CapabilitySet};
pub use check::PermissionCheck;
pub use error::{DomainError, DomainResult};
pub use grant::PermissionGrant;
pub use id::UserId;
pub use identity::Identity;
pub use module::{Module, ModuleKey};
