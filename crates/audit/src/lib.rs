//! `praxis-audit` — security-event audit trail.
//!
//! Every grant or denial the policy engine produces is forwarded here as a
//! structured, append-only [`SecurityAuditLogEntry`]. Sinks are pluggable so
//! the call sites stay environment-agnostic: structured logs outside
//! production, a durable buffer in production.

pub mod entry;
pub mod sink;

pub use entry::{AuditStatus, SecurityAction, SecurityAuditLogEntry};
pub use sink::{AuditSink, AuditWriteError, MemorySink, TracingSink};
