//! Structured security events.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use praxis_core::UserId;

/// The vocabulary of auditable security actions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum SecurityAction {
    Login,
    Logout,
    AccessGranted,
    AccessDenied,
    ActionExecuted,
    ActionDenied,
    ActionError,
    PermissionChanged,
}

impl SecurityAction {
    pub fn as_str(&self) -> &'static str {
        match self {
            SecurityAction::Login => "LOGIN",
            SecurityAction::Logout => "LOGOUT",
            SecurityAction::AccessGranted => "ACCESS_GRANTED",
            SecurityAction::AccessDenied => "ACCESS_DENIED",
            SecurityAction::ActionExecuted => "ACTION_EXECUTED",
            SecurityAction::ActionDenied => "ACTION_DENIED",
            SecurityAction::ActionError => "ACTION_ERROR",
            SecurityAction::PermissionChanged => "PERMISSION_CHANGED",
        }
    }
}

impl core::fmt::Display for SecurityAction {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Outcome recorded on an audit entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AuditStatus {
    Success,
    Denied,
    Error,
}

/// One append-only audit record.
///
/// Entries are created on every route/action guard decision and on explicit
/// application events; the policy engine never mutates or deletes them.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SecurityAuditLogEntry {
    pub action: SecurityAction,
    pub user_id: Option<UserId>,
    pub target_resource: Option<String>,
    pub details: Map<String, Value>,
    pub status: AuditStatus,
    pub ip_address: Option<String>,
    pub timestamp: DateTime<Utc>,
}

impl SecurityAuditLogEntry {
    pub fn new(action: SecurityAction, status: AuditStatus) -> Self {
        Self {
            action,
            user_id: None,
            target_resource: None,
            details: Map::new(),
            status,
            ip_address: None,
            timestamp: Utc::now(),
        }
    }

    pub fn with_user(mut self, user_id: Option<UserId>) -> Self {
        self.user_id = user_id;
        self
    }

    pub fn with_target(mut self, target: impl Into<String>) -> Self {
        self.target_resource = Some(target.into());
        self
    }

    pub fn with_ip(mut self, ip: Option<String>) -> Self {
        self.ip_address = ip;
        self
    }

    pub fn with_detail(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.details.insert(key.into(), value.into());
        self
    }

    /// Convenience accessor for a string detail (audit assertions mostly
    /// look at `reason`).
    pub fn detail_str(&self, key: &str) -> Option<&str> {
        self.details.get(key).and_then(Value::as_str)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn action_names_are_screaming_snake() {
        assert_eq!(SecurityAction::AccessDenied.as_str(), "ACCESS_DENIED");
        assert_eq!(SecurityAction::ActionExecuted.as_str(), "ACTION_EXECUTED");

        let json = serde_json::to_string(&SecurityAction::PermissionChanged).unwrap();
        assert_eq!(json, "\"PERMISSION_CHANGED\"");
    }

    #[test]
    fn builder_populates_fields() {
        let user = UserId::new();
        let entry = SecurityAuditLogEntry::new(SecurityAction::AccessDenied, AuditStatus::Denied)
            .with_user(Some(user))
            .with_target("/risk-management")
            .with_ip(Some("203.0.113.7".to_string()))
            .with_detail("reason", "Not authenticated");

        assert_eq!(entry.user_id, Some(user));
        assert_eq!(entry.target_resource.as_deref(), Some("/risk-management"));
        assert_eq!(entry.ip_address.as_deref(), Some("203.0.113.7"));
        assert_eq!(entry.detail_str("reason"), Some("Not authenticated"));
    }
}
