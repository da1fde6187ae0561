//! Pluggable audit sinks.

use std::sync::Mutex;

use thiserror::Error;

use crate::entry::SecurityAuditLogEntry;

/// Failure writing to an audit sink.
///
/// Sink failures are reported via a side channel (`tracing::warn!` at the
/// call site); they never abort or alter the authorization decision that
/// produced the entry.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum AuditWriteError {
    #[error("audit sink unavailable: {0}")]
    Unavailable(String),
}

/// Destination for security events.
///
/// Implementations must not panic; an inability to persist is surfaced as
/// an [`AuditWriteError`] value.
pub trait AuditSink: Send + Sync {
    fn append(&self, entry: SecurityAuditLogEntry) -> Result<(), AuditWriteError>;

    /// Whether appended entries are retained for later audit reads.
    ///
    /// Production sink selection requires a durable trail; log-only sinks
    /// report `false`.
    fn durable(&self) -> bool {
        false
    }
}

/// Sink that emits entries as structured `tracing` events.
///
/// Used outside production, where a durable trail adds no value but the
/// developer still wants to see every decision.
#[derive(Debug, Default)]
pub struct TracingSink;

impl TracingSink {
    pub fn new() -> Self {
        Self
    }
}

impl AuditSink for TracingSink {
    fn append(&self, entry: SecurityAuditLogEntry) -> Result<(), AuditWriteError> {
        let details = serde_json::Value::Object(entry.details.clone());
        tracing::info!(
            action = entry.action.as_str(),
            status = ?entry.status,
            user_id = entry.user_id.map(|id| id.to_string()),
            target = entry.target_resource.as_deref(),
            ip = entry.ip_address.as_deref(),
            %details,
            "security event"
        );
        Ok(())
    }
}

/// Append-only in-process sink.
///
/// Stands in for the durable production trail and backs the test
/// assertions on emitted entries.
#[derive(Debug, Default)]
pub struct MemorySink {
    entries: Mutex<Vec<SecurityAuditLogEntry>>,
}

impl MemorySink {
    pub fn new() -> Self {
        Self::default()
    }

    /// Snapshot of everything appended so far, in append order.
    pub fn entries(&self) -> Vec<SecurityAuditLogEntry> {
        self.entries
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .clone()
    }

    pub fn len(&self) -> usize {
        self.entries.lock().unwrap_or_else(|e| e.into_inner()).len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl AuditSink for MemorySink {
    fn append(&self, entry: SecurityAuditLogEntry) -> Result<(), AuditWriteError> {
        self.entries
            .lock()
            .map_err(|_| AuditWriteError::Unavailable("memory sink poisoned".to_string()))?
            .push(entry);
        Ok(())
    }

    fn durable(&self) -> bool {
        true
    }
}
