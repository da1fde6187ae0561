//! `praxis-store` — collaborator boundary for the policy engine.
//!
//! The engine never talks to a concrete backend; it consumes the
//! [`IdentitySource`] and [`GrantStore`] traits defined here. The in-memory
//! implementations back the application shell in development and give tests
//! a deterministic store.

pub mod error;
pub mod grant_store;
pub mod identity_source;

pub use error::StoreError;
pub use grant_store::{GrantStore, InMemoryGrantStore};
pub use identity_source::{IdentitySource, InMemoryIdentitySource};
