//! Imperative action guarding.
//!
//! Route guarding protects what a user can *see*; this protects what a
//! user can *do*. The guard re-checks permissions at call time — the
//! capability table can change between render and click — and never
//! swallows business-logic failures, only authorization ones.

use serde_json::json;

use praxis_audit::{AuditStatus, SecurityAction, SecurityAuditLogEntry};
use praxis_core::{Capability, ModuleKey, PermissionCheck};

use crate::context::SecurityContext;

/// A declarative permission requirement wrapped around a side-effecting
/// operation.
#[derive(Debug, Clone)]
pub struct ActionGuard {
    action_name: String,
    checks: Vec<PermissionCheck>,
    /// `true` = every check must pass; `false` = any one suffices.
    require_all: bool,
}

impl ActionGuard {
    pub fn new(
        action_name: impl Into<String>,
        checks: impl IntoIterator<Item = PermissionCheck>,
        require_all: bool,
    ) -> Self {
        Self {
            action_name: action_name.into(),
            checks: checks.into_iter().collect(),
            require_all,
        }
    }

    /// Guard on a single (module, capability) pair.
    pub fn single(
        action_name: impl Into<String>,
        module: impl Into<ModuleKey>,
        capability: Capability,
    ) -> Self {
        Self::new(
            action_name,
            [PermissionCheck::new(module, capability)],
            true,
        )
    }

    pub fn action_name(&self) -> &str {
        &self.action_name
    }

    /// Whether the action would currently be permitted.
    ///
    /// A guard with no checks only audits; it does not gate.
    pub fn can_execute(&self, ctx: &SecurityContext) -> bool {
        if self.checks.is_empty() {
            return true;
        }
        if self.require_all {
            ctx.check_all(&self.checks)
        } else {
            ctx.check_any(&self.checks)
        }
    }

    /// User-facing denial text the caller may surface (e.g. as a toast).
    pub fn denial_message(&self) -> String {
        format!(
            "You do not have permission to perform '{}'",
            self.action_name
        )
    }

    /// Run `action` if — and only if — the requirement passes right now.
    ///
    /// - Denied: `action` is never invoked, `Ok(None)` is returned and an
    ///   `ACTION_DENIED` event is logged with the required checks.
    /// - Permitted, `action` succeeds: `ACTION_EXECUTED` is logged and the
    ///   value returned as `Ok(Some(..))`.
    /// - Permitted, `action` fails: `ACTION_ERROR` is logged with the
    ///   error text, then the error propagates to the caller unchanged.
    pub fn execute<T, E, F>(&self, ctx: &SecurityContext, action: F) -> Result<Option<T>, E>
    where
        E: core::fmt::Display,
        F: FnOnce() -> Result<T, E>,
    {
        if !self.can_execute(ctx) {
            ctx.log_security_event(
                self.entry(ctx, SecurityAction::ActionDenied, AuditStatus::Denied)
                    .with_detail("required_checks", json!(self.required_checks_strings()))
                    .with_detail(
                        "combinator",
                        if self.require_all { "all" } else { "any" },
                    ),
            );
            return Ok(None);
        }

        match action() {
            Ok(value) => {
                ctx.log_security_event(self.entry(
                    ctx,
                    SecurityAction::ActionExecuted,
                    AuditStatus::Success,
                ));
                Ok(Some(value))
            }
            Err(err) => {
                ctx.log_security_event(
                    self.entry(ctx, SecurityAction::ActionError, AuditStatus::Error)
                        .with_detail("error", err.to_string()),
                );
                Err(err)
            }
        }
    }

    fn entry(
        &self,
        ctx: &SecurityContext,
        action: SecurityAction,
        status: AuditStatus,
    ) -> SecurityAuditLogEntry {
        SecurityAuditLogEntry::new(action, status)
            .with_user(ctx.current_identity().map(|id| id.id))
            .with_target(self.action_name.clone())
    }

    fn required_checks_strings(&self) -> Vec<String> {
        self.checks.iter().map(ToString::to_string).collect()
    }
}
