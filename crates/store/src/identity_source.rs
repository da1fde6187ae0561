//! The identity provider boundary.

use std::sync::RwLock;

use praxis_core::Identity;

/// Source of the current authenticated identity.
///
/// Implementations wrap whatever identity provider the deployment uses.
/// Instead of a change-callback surface, the source exposes a session
/// epoch: every sign-in/sign-out bumps it, and the policy layer compares
/// epochs to detect that a cached capability table belongs to a previous
/// identity.
pub trait IdentitySource: Send + Sync {
    /// The identity of the current session, if any.
    fn current_identity(&self) -> Option<Identity>;

    /// Monotonically increasing counter, bumped on every identity change.
    fn session_epoch(&self) -> u64;
}

#[derive(Debug, Default)]
struct SessionState {
    identity: Option<Identity>,
    epoch: u64,
}

/// In-memory identity source for the application shell and tests.
#[derive(Debug, Default)]
pub struct InMemoryIdentitySource {
    state: RwLock<SessionState>,
}

impl InMemoryIdentitySource {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn sign_in(&self, identity: Identity) {
        let mut state = self.state.write().unwrap_or_else(|e| e.into_inner());
        state.identity = Some(identity);
        state.epoch += 1;
    }

    pub fn sign_out(&self) {
        let mut state = self.state.write().unwrap_or_else(|e| e.into_inner());
        state.identity = None;
        state.epoch += 1;
    }
}

impl IdentitySource for InMemoryIdentitySource {
    fn current_identity(&self) -> Option<Identity> {
        self.state.read().unwrap_or_else(|e| e.into_inner()).identity
    }

    fn session_epoch(&self) -> u64 {
        self.state.read().unwrap_or_else(|e| e.into_inner()).epoch
    }
}
