//! Declarative route guarding.
//!
//! The application's routing layer declares what a view requires; this
//! module evaluates the requirement against the security context and
//! produces a decision the view layer can render directly. Denials are
//! data (a redirect), never exceptions, so UI code cannot catch and ignore
//! a security decision.

use serde_json::json;

use praxis_audit::{AuditStatus, SecurityAction, SecurityAuditLogEntry};
use praxis_core::PermissionCheck;

use crate::context::SecurityContext;

/// Where unauthenticated sessions are sent, carrying the origin for
/// post-login return.
pub const DEFAULT_FALLBACK_PATH: &str = "/auth";

/// Where authenticated-but-insufficient sessions are sent.
pub const DEFAULT_HOME_PATH: &str = "/";

/// The requirement expression a protected route declares.
#[derive(Debug, Clone)]
pub struct RouteRequirements {
    pub require_auth: bool,
    pub require_admin: bool,
    pub require_super_admin: bool,
    pub required_permissions: Vec<PermissionCheck>,
    /// `true` = every listed check must pass; `false` = any one suffices.
    pub require_all_permissions: bool,
    pub fallback_path: String,
}

impl Default for RouteRequirements {
    fn default() -> Self {
        Self {
            require_auth: true,
            require_admin: false,
            require_super_admin: false,
            required_permissions: Vec::new(),
            require_all_permissions: true,
            fallback_path: DEFAULT_FALLBACK_PATH.to_string(),
        }
    }
}

impl RouteRequirements {
    /// Requires only an authenticated session.
    pub fn authenticated() -> Self {
        Self::default()
    }

    pub fn admin_only() -> Self {
        Self {
            require_admin: true,
            ..Self::default()
        }
    }

    pub fn super_admin_only() -> Self {
        Self {
            require_super_admin: true,
            ..Self::default()
        }
    }

    pub fn with_permissions(
        mut self,
        checks: impl IntoIterator<Item = PermissionCheck>,
        require_all: bool,
    ) -> Self {
        self.required_permissions = checks.into_iter().collect();
        self.require_all_permissions = require_all;
        self
    }

    pub fn with_fallback(mut self, path: impl Into<String>) -> Self {
        self.fallback_path = path.into();
        self
    }
}

/// The navigation being guarded.
#[derive(Debug, Clone)]
pub struct RouteRequest {
    pub path: String,
    pub ip_address: Option<String>,
    /// The designated editor/preview query parameter was present on this
    /// request. Marks the session preview before the guard decides
    /// anything else.
    pub editor_param: bool,
}

impl RouteRequest {
    pub fn new(path: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            ip_address: None,
            editor_param: false,
        }
    }

    pub fn with_ip(mut self, ip: impl Into<String>) -> Self {
        self.ip_address = Some(ip.into());
        self
    }

    pub fn with_editor_param(mut self) -> Self {
        self.editor_param = true;
        self
    }
}

/// Outcome of a guard evaluation (terminal per navigation).
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RouteDecision {
    /// Identity/permission resolution is still pending; render a
    /// deterministic placeholder, never the protected content.
    Loading,
    /// Render the protected view.
    Granted,
    /// Navigate away, carrying the original destination for post-login
    /// return.
    Redirect { to: String, from: String },
}

impl RouteDecision {
    pub fn is_granted(&self) -> bool {
        matches!(self, RouteDecision::Granted)
    }
}

/// Evaluate a route requirement against the security context.
///
/// Every grant or denial is forwarded to the audit sink with the actual
/// outcome; a bypass-produced grant is logged as such so audits can tell
/// real authorization from environment override.
pub fn evaluate(
    ctx: &SecurityContext,
    request: &RouteRequest,
    requirements: &RouteRequirements,
) -> RouteDecision {
    // An editor/preview signal on the request reclassifies the session
    // before anything else is decided (sticky for the session).
    if request.editor_param {
        ctx.mark_preview_session();
    }

    // The environment override takes absolute precedence; it is decided
    // from the session classification alone and needs no resolution.
    if ctx.is_bypassed() {
        ctx.log_security_event(
            granted_entry(ctx, request)
                .with_detail("reason", "bypass")
                .with_detail("mode", ctx.mode().as_str()),
        );
        return RouteDecision::Granted;
    }

    if ctx.resolution_pending() {
        return RouteDecision::Loading;
    }

    if requirements.require_auth && !ctx.is_authenticated() {
        ctx.log_security_event(
            denied_entry(ctx, request).with_detail("reason", "Not authenticated"),
        );
        return redirect(&requirements.fallback_path, &request.path);
    }

    if requirements.require_super_admin && !ctx.is_master() {
        ctx.log_security_event(
            denied_entry(ctx, request).with_detail("reason", "Super admin required"),
        );
        return redirect(DEFAULT_HOME_PATH, &request.path);
    }

    // Super-admin satisfies an admin requirement.
    if requirements.require_admin && !(ctx.is_admin() || ctx.is_master()) {
        ctx.log_security_event(
            denied_entry(ctx, request).with_detail("reason", "Admin required"),
        );
        return redirect(DEFAULT_HOME_PATH, &request.path);
    }

    if !requirements.required_permissions.is_empty() {
        let passed = if requirements.require_all_permissions {
            ctx.check_all(&requirements.required_permissions)
        } else {
            ctx.check_any(&requirements.required_permissions)
        };

        if !passed {
            let failing: Vec<String> = requirements
                .required_permissions
                .iter()
                .filter(|c| !ctx.check_permission(&c.module, c.permission))
                .map(ToString::to_string)
                .collect();

            ctx.log_security_event(
                denied_entry(ctx, request)
                    .with_detail("reason", "Insufficient permissions")
                    .with_detail(
                        "combinator",
                        if requirements.require_all_permissions { "all" } else { "any" },
                    )
                    .with_detail("failed_checks", json!(failing)),
            );
            return redirect(DEFAULT_HOME_PATH, &request.path);
        }
    }

    ctx.log_security_event(granted_entry(ctx, request));
    RouteDecision::Granted
}

fn redirect(to: &str, from: &str) -> RouteDecision {
    RouteDecision::Redirect {
        to: to.to_string(),
        from: from.to_string(),
    }
}

fn granted_entry(ctx: &SecurityContext, request: &RouteRequest) -> SecurityAuditLogEntry {
    SecurityAuditLogEntry::new(SecurityAction::AccessGranted, AuditStatus::Success)
        .with_user(ctx.current_identity().map(|id| id.id))
        .with_target(request.path.clone())
        .with_ip(request.ip_address.clone())
}

fn denied_entry(ctx: &SecurityContext, request: &RouteRequest) -> SecurityAuditLogEntry {
    SecurityAuditLogEntry::new(SecurityAction::AccessDenied, AuditStatus::Denied)
        .with_user(ctx.current_identity().map(|id| id.id))
        .with_target(request.path.clone())
        .with_ip(request.ip_address.clone())
}
