//! `praxis-policy` — the authorization & audit policy engine.
//!
//! Composition, leaf-first: the [`environment`] classifier decides whether
//! the session may bypass authorization at all; the [`resolver`]
//! materializes a per-identity capability table; the [`context`] facade
//! caches that table and answers permission queries; the [`route_guard`]
//! and [`action_guard`] consume the facade at their respective decision
//! points. Every grant and denial flows to the audit sink.

pub mod action_guard;
pub mod context;
pub mod environment;
pub mod resolver;
pub mod route_guard;

pub use action_guard::ActionGuard;
pub use context::SecurityContext;
pub use environment::{
    EnvironmentClassifier, EnvironmentConfig, EnvironmentMode, EnvironmentSignals,
};
pub use resolver::{CapabilityTable, Resolution, ResolutionError, resolve};
pub use route_guard::{
    DEFAULT_FALLBACK_PATH, DEFAULT_HOME_PATH, RouteDecision, RouteRequest, RouteRequirements,
    evaluate,
};

use std::sync::Arc;

use praxis_audit::{AuditSink, MemorySink, TracingSink};

/// Pick the audit sink for an environment.
///
/// Call sites stay environment-agnostic: structured logs outside
/// production, the durable (in-process stand-in) buffer in production.
pub fn audit_sink_for(mode: EnvironmentMode) -> Arc<dyn AuditSink> {
    match mode {
        EnvironmentMode::Production => Arc::new(MemorySink::new()),
        EnvironmentMode::Preview | EnvironmentMode::Development => Arc::new(TracingSink::new()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use praxis_audit::{AuditStatus, SecurityAction, SecurityAuditLogEntry};

    #[test]
    fn production_selects_the_durable_sink() {
        assert!(audit_sink_for(EnvironmentMode::Production).durable());
        assert!(!audit_sink_for(EnvironmentMode::Preview).durable());
        assert!(!audit_sink_for(EnvironmentMode::Development).durable());
    }

    #[test]
    fn selected_sinks_accept_entries() {
        for mode in [
            EnvironmentMode::Production,
            EnvironmentMode::Preview,
            EnvironmentMode::Development,
        ] {
            let sink = audit_sink_for(mode);
            let result = sink.append(SecurityAuditLogEntry::new(
                SecurityAction::AccessGranted,
                AuditStatus::Success,
            ));
            assert!(result.is_ok());
        }
    }
}
