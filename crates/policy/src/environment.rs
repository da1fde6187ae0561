//! Environment classification.
//!
//! Whether authorization may be bypassed is a function of *where* the
//! process is running, decided here and nowhere else. There is no
//! independent "disable auth" switch: bypass can only ever be true under a
//! verified non-production classification.

use serde::{Deserialize, Serialize};

/// Where the session is running.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EnvironmentMode {
    Production,
    Preview,
    Development,
}

impl EnvironmentMode {
    pub fn as_str(&self) -> &'static str {
        match self {
            EnvironmentMode::Production => "production",
            EnvironmentMode::Preview => "preview",
            EnvironmentMode::Development => "development",
        }
    }

    /// Hard security invariant: bypass is only ever permitted outside
    /// production.
    pub fn allows_bypass(&self) -> bool {
        !matches!(self, EnvironmentMode::Production)
    }
}

impl core::fmt::Display for EnvironmentMode {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Raw signals read from the runtime context at classification time.
///
/// Missing data classifies as the most restrictive mode; none of these
/// fields can force production into a bypass.
#[derive(Debug, Clone, Default)]
pub struct EnvironmentSignals {
    /// Hostname the session was served from, if readable.
    pub hostname: Option<String>,
    /// The designated editor/preview query parameter was present on the
    /// request.
    pub editor_request: bool,
    /// Explicit development configuration (e.g. a dev build flag).
    pub dev_configured: bool,
}

impl EnvironmentSignals {
    pub fn with_hostname(hostname: impl Into<String>) -> Self {
        Self {
            hostname: Some(hostname.into()),
            ..Self::default()
        }
    }
}

/// Host patterns that identify non-production deployments.
#[derive(Debug, Clone)]
pub struct EnvironmentConfig {
    /// Hostname suffixes of preview/editor deployments.
    pub preview_host_suffixes: Vec<String>,
    /// Hostnames treated as local development.
    pub dev_hostnames: Vec<String>,
}

impl Default for EnvironmentConfig {
    fn default() -> Self {
        Self {
            preview_host_suffixes: Vec::new(),
            dev_hostnames: vec!["localhost".to_string(), "127.0.0.1".to_string()],
        }
    }
}

/// Session-scoped classifier.
///
/// # Invariants
/// - Once a session classifies as `Preview`, it never silently flips back
///   to `Production` mid-session (the preview flag persists for the
///   lifetime of this value).
/// - The preview flag lives only inside this value, so a fresh session
///   always re-evaluates from scratch; a stale flag from a prior session
///   cannot leak into a new production deployment.
/// - Classification never fails: unreadable configuration defaults to
///   `Production`.
#[derive(Debug, Default)]
pub struct EnvironmentClassifier {
    config: EnvironmentConfig,
    preview_session: bool,
}

impl EnvironmentClassifier {
    pub fn new(config: EnvironmentConfig) -> Self {
        Self {
            config,
            preview_session: false,
        }
    }

    /// Classify the current session.
    ///
    /// Order: an editor/preview signal (query parameter or preview host)
    /// marks the session preview and persists that for the remainder of
    /// the session; then the persisted flag; then explicit development
    /// configuration; otherwise production.
    pub fn classify(&mut self, signals: &EnvironmentSignals) -> EnvironmentMode {
        if signals.editor_request || self.is_preview_host(signals.hostname.as_deref()) {
            self.preview_session = true;
            return EnvironmentMode::Preview;
        }

        if self.preview_session {
            return EnvironmentMode::Preview;
        }

        if signals.dev_configured || self.is_dev_host(signals.hostname.as_deref()) {
            return EnvironmentMode::Development;
        }

        EnvironmentMode::Production
    }

    fn is_preview_host(&self, hostname: Option<&str>) -> bool {
        let Some(hostname) = hostname else {
            return false;
        };
        self.config
            .preview_host_suffixes
            .iter()
            .any(|suffix| hostname.ends_with(suffix.as_str()))
    }

    fn is_dev_host(&self, hostname: Option<&str>) -> bool {
        let Some(hostname) = hostname else {
            return false;
        };
        self.config
            .dev_hostnames
            .iter()
            .any(|dev| hostname == dev.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config_with_preview(suffix: &str) -> EnvironmentConfig {
        EnvironmentConfig {
            preview_host_suffixes: vec![suffix.to_string()],
            ..EnvironmentConfig::default()
        }
    }

    #[test]
    fn defaults_to_production() {
        let mut classifier = EnvironmentClassifier::default();
        let mode = classifier.classify(&EnvironmentSignals::default());
        assert_eq!(mode, EnvironmentMode::Production);
        assert!(!mode.allows_bypass());
    }

    #[test]
    fn unreadable_hostname_is_production() {
        let mut classifier = EnvironmentClassifier::default();
        let signals = EnvironmentSignals {
            hostname: None,
            editor_request: false,
            dev_configured: false,
        };
        assert_eq!(classifier.classify(&signals), EnvironmentMode::Production);
    }

    #[test]
    fn editor_request_classifies_preview() {
        let mut classifier = EnvironmentClassifier::default();
        let signals = EnvironmentSignals {
            hostname: Some("app.example.com".to_string()),
            editor_request: true,
            dev_configured: false,
        };
        assert_eq!(classifier.classify(&signals), EnvironmentMode::Preview);
    }

    #[test]
    fn preview_host_suffix_classifies_preview() {
        let mut classifier = EnvironmentClassifier::new(config_with_preview(".preview.example.com"));
        let signals = EnvironmentSignals::with_hostname("pr-42.preview.example.com");
        assert_eq!(classifier.classify(&signals), EnvironmentMode::Preview);
    }

    #[test]
    fn preview_is_sticky_within_a_session() {
        let mut classifier = EnvironmentClassifier::default();

        let editor = EnvironmentSignals {
            editor_request: true,
            ..EnvironmentSignals::default()
        };
        assert_eq!(classifier.classify(&editor), EnvironmentMode::Preview);

        // Same session, later request without the signal: no silent flip.
        let plain = EnvironmentSignals::with_hostname("app.example.com");
        assert_eq!(classifier.classify(&plain), EnvironmentMode::Preview);
    }

    #[test]
    fn stale_preview_flag_does_not_survive_a_new_session() {
        let mut old_session = EnvironmentClassifier::default();
        let editor = EnvironmentSignals {
            editor_request: true,
            ..EnvironmentSignals::default()
        };
        assert_eq!(old_session.classify(&editor), EnvironmentMode::Preview);

        // A genuinely new session starts from scratch.
        let mut new_session = EnvironmentClassifier::default();
        let plain = EnvironmentSignals::with_hostname("app.example.com");
        assert_eq!(new_session.classify(&plain), EnvironmentMode::Production);
    }

    #[test]
    fn dev_hostname_classifies_development() {
        let mut classifier = EnvironmentClassifier::default();
        let signals = EnvironmentSignals::with_hostname("localhost");
        assert_eq!(classifier.classify(&signals), EnvironmentMode::Development);
    }

    #[test]
    fn dev_configuration_classifies_development() {
        let mut classifier = EnvironmentClassifier::default();
        let signals = EnvironmentSignals {
            dev_configured: true,
            ..EnvironmentSignals::default()
        };
        assert_eq!(classifier.classify(&signals), EnvironmentMode::Development);
    }

    #[test]
    fn production_never_allows_bypass() {
        assert!(!EnvironmentMode::Production.allows_bypass());
        assert!(EnvironmentMode::Preview.allows_bypass());
        assert!(EnvironmentMode::Development.allows_bypass());
    }
}
