//! Security context facade.
//!
//! Composes the environment classification, the identity source, and the
//! permission resolver behind one query surface. Constructed once per
//! session and passed by reference to the route/action guards — there is no
//! process-wide singleton.

use std::sync::{Arc, RwLock};

use serde_json::json;

use praxis_audit::{AuditSink, AuditStatus, SecurityAction, SecurityAuditLogEntry};
use praxis_core::{Capability, Identity, ModuleKey, PermissionCheck, PermissionGrant, UserId};
use praxis_store::{GrantStore, IdentitySource, StoreError};

use crate::environment::EnvironmentMode;
use crate::resolver::{CapabilityTable, Resolution, ResolutionError, resolve};

/// Per-session authorization facade.
///
/// Read-mostly: the only mutation is the capability-table refresh, which
/// replaces the table wholesale under a write lock so concurrent checks
/// never observe a half-updated table.
pub struct SecurityContext {
    identity_source: Arc<dyn IdentitySource>,
    grant_store: Arc<dyn GrantStore>,
    sink: Arc<dyn AuditSink>,
    mode: RwLock<EnvironmentMode>,
    resolution: RwLock<Resolution>,
}

impl SecurityContext {
    /// Build a context for a session already classified as `mode`.
    ///
    /// The capability table starts unresolved; call [`refresh`] before
    /// expecting non-bypass checks to pass.
    ///
    /// [`refresh`]: SecurityContext::refresh
    pub fn new(
        identity_source: Arc<dyn IdentitySource>,
        grant_store: Arc<dyn GrantStore>,
        sink: Arc<dyn AuditSink>,
        mode: EnvironmentMode,
    ) -> Self {
        Self {
            identity_source,
            grant_store,
            sink,
            mode: RwLock::new(mode),
            resolution: RwLock::new(Resolution::Unresolved),
        }
    }

    pub fn mode(&self) -> EnvironmentMode {
        *self.mode.read().unwrap_or_else(|e| e.into_inner())
    }

    /// Mark the session preview after an editor/preview request signal.
    ///
    /// Mirrors the classifier's stickiness: the mode can move toward
    /// `Preview` mid-session but never silently back toward production.
    pub fn mark_preview_session(&self) {
        let mut mode = self.mode.write().unwrap_or_else(|e| e.into_inner());
        if *mode != EnvironmentMode::Preview {
            tracing::info!(previous = %*mode, "session reclassified as preview");
            *mode = EnvironmentMode::Preview;
        }
    }

    /// Whether the environment override is in effect for this session.
    pub fn is_bypassed(&self) -> bool {
        self.mode().allows_bypass()
    }

    pub fn current_identity(&self) -> Option<Identity> {
        self.identity_source.current_identity()
    }

    /// True iff an identity is present or the environment allows bypass.
    pub fn is_authenticated(&self) -> bool {
        self.current_identity().is_some() || self.is_bypassed()
    }

    /// Role passthrough; never overridden by bypass. Consumers that branch
    /// on role for display logic must see the real flag.
    pub fn is_admin(&self) -> bool {
        self.current_identity().is_some_and(|id| id.is_admin)
    }

    /// Role passthrough for the super-admin (master) flag.
    pub fn is_master(&self) -> bool {
        self.current_identity().is_some_and(|id| id.is_super_admin)
    }

    /// Rebuild the capability table from the stores.
    ///
    /// On failure the resolution moves to `Failed` (fail-closed: every
    /// check answers false) and the error is returned for reporting.
    pub fn refresh(&self) -> Result<(), ResolutionError> {
        let epoch = self.identity_source.session_epoch();
        let identity = self.current_identity();

        let outcome = self.load_table(identity.as_ref());

        let mut resolution = self.resolution.write().unwrap_or_else(|e| e.into_inner());
        match outcome {
            Ok(table) => {
                *resolution = Resolution::Resolved { table, epoch };
                Ok(())
            }
            Err(err) => {
                tracing::error!(error = %err, "permission resolution failed; failing closed");
                *resolution = Resolution::Failed { epoch };
                Err(err)
            }
        }
    }

    fn load_table(
        &self,
        identity: Option<&Identity>,
    ) -> Result<CapabilityTable, ResolutionError> {
        let modules = self.grant_store.list_active_modules()?;

        // Role override short-circuits the grant lookup entirely.
        let grants = match identity {
            Some(id) if !id.has_role_override() => self.grant_store.list_grants(id.id)?,
            _ => Vec::new(),
        };

        Ok(resolve(identity, &modules, &grants))
    }

    /// Mark the cached table stale (e.g. after a grant mutation). Checks
    /// fail closed until the next [`refresh`].
    ///
    /// [`refresh`]: SecurityContext::refresh
    pub fn invalidate(&self) {
        self.resolution
            .write()
            .unwrap_or_else(|e| e.into_inner())
            .invalidate();
    }

    /// Whether identity/permission resolution is still pending for the
    /// current session epoch. Guards render a loading state rather than
    /// racing a stale table.
    pub fn resolution_pending(&self) -> bool {
        let epoch = self.identity_source.session_epoch();
        self.resolution
            .read()
            .unwrap_or_else(|e| e.into_inner())
            .is_pending(epoch)
    }

    /// Answer one (module, capability) question.
    ///
    /// Decision order: environment bypass, then role override, then the
    /// capability table; a missing entry — or a table that is unresolved,
    /// stale, failed, or from an older session epoch — answers false.
    pub fn check_permission(&self, module: &ModuleKey, capability: Capability) -> bool {
        if self.is_bypassed() {
            return true;
        }

        if self
            .current_identity()
            .is_some_and(|id| id.has_role_override())
        {
            return true;
        }

        let epoch = self.identity_source.session_epoch();
        let resolution = self.resolution.read().unwrap_or_else(|e| e.into_inner());
        if resolution.is_pending(epoch) {
            return false;
        }
        resolution
            .table()
            .is_some_and(|table| table.allows(module, capability))
    }

    /// True iff every check passes. Empty input is vacuously true.
    pub fn check_all(&self, checks: &[PermissionCheck]) -> bool {
        checks
            .iter()
            .all(|c| self.check_permission(&c.module, c.permission))
    }

    /// True iff at least one check passes. Empty input is false.
    pub fn check_any(&self, checks: &[PermissionCheck]) -> bool {
        checks
            .iter()
            .any(|c| self.check_permission(&c.module, c.permission))
    }

    /// Forward a security event to the audit sink.
    ///
    /// Fire-and-forget: a sink failure is reported via tracing and never
    /// alters the authorization decision that produced the entry.
    pub fn log_security_event(&self, entry: SecurityAuditLogEntry) {
        if let Err(err) = self.sink.append(entry) {
            tracing::warn!(error = %err, "audit write failed");
        }
    }

    // ─────────────────────────────────────────────────────────────────────
    // Session lifecycle
    // ─────────────────────────────────────────────────────────────────────

    /// Record a successful sign-in on the audit trail.
    pub fn record_login(&self) {
        self.log_security_event(
            SecurityAuditLogEntry::new(SecurityAction::Login, AuditStatus::Success)
                .with_user(self.current_identity().map(|id| id.id)),
        );
    }

    /// Record a sign-out. The identity is already gone by the time this
    /// runs, so the caller supplies the departing user.
    pub fn record_logout(&self, user_id: Option<UserId>) {
        self.log_security_event(
            SecurityAuditLogEntry::new(SecurityAction::Logout, AuditStatus::Success)
                .with_user(user_id),
        );
    }

    // ─────────────────────────────────────────────────────────────────────
    // Admin surface
    // ─────────────────────────────────────────────────────────────────────

    /// Assign (or re-assign) a grant, audit the change, and stale out the
    /// cached table if the grant affects the current identity.
    pub fn grant_permission(&self, grant: PermissionGrant) -> Result<(), StoreError> {
        let target_user = grant.user_id;
        let module = grant.module_key.clone();
        let capabilities = grant.capabilities();

        self.grant_store.upsert_grant(grant)?;

        self.log_security_event(
            SecurityAuditLogEntry::new(SecurityAction::PermissionChanged, AuditStatus::Success)
                .with_user(self.current_identity().map(|id| id.id))
                .with_target(module.as_str())
                .with_detail("target_user", target_user.to_string())
                .with_detail("capabilities", json!(capabilities)),
        );

        self.invalidate_if_current(target_user);
        Ok(())
    }

    /// Revoke a grant row; returns whether one existed.
    pub fn revoke_permission(
        &self,
        user_id: UserId,
        module_key: &ModuleKey,
    ) -> Result<bool, StoreError> {
        let existed = self.grant_store.delete_grant(user_id, module_key)?;

        if existed {
            self.log_security_event(
                SecurityAuditLogEntry::new(
                    SecurityAction::PermissionChanged,
                    AuditStatus::Success,
                )
                .with_user(self.current_identity().map(|id| id.id))
                .with_target(module_key.as_str())
                .with_detail("target_user", user_id.to_string())
                .with_detail("revoked", true),
            );
            self.invalidate_if_current(user_id);
        }

        Ok(existed)
    }

    fn invalidate_if_current(&self, user_id: UserId) {
        if self.current_identity().is_some_and(|id| id.id == user_id) {
            self.invalidate();
        }
    }
}
