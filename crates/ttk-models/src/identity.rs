//! Caller identity and rate-limit key derivation.
//!
//! Both the routing-layer gate and the service-level policy check derive
//! their counter keys through [`Identity::rate_limit_key`].

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

/// Placeholder when the client IP cannot be determined.
pub const UNKNOWN_IP: &str = "unknown";

/// Which rate-limit policy applies to a caller.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "snake_case")]
pub enum PolicyKind {
    Authenticated,
    Anonymous,
}

/// Resolved caller identity.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize, JsonSchema)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Identity {
    /// Signed-in user
    User { subject_id: String },
    /// Anonymous caller identified by device fingerprint and source IP
    Anonymous { fingerprint: String, ip: String },
}

impl Identity {
    pub fn user(subject_id: impl Into<String>) -> Self {
        Self::User {
            subject_id: subject_id.into(),
        }
    }

    /// Anonymous identity, or `None` when no usable fingerprint was supplied.
    pub fn anonymous(fingerprint: Option<&str>, ip: Option<&str>) -> Option<Self> {
        let fingerprint = fingerprint.map(str::trim).filter(|f| !f.is_empty())?;
        let ip = ip
            .map(str::trim)
            .filter(|ip| !ip.is_empty())
            .unwrap_or(UNKNOWN_IP);

        Some(Self::Anonymous {
            fingerprint: fingerprint.to_string(),
            ip: ip.to_string(),
        })
    }

    /// Identity for a request: the session subject when present, otherwise
    /// the fingerprint/IP pair.
    pub fn resolve(subject_id: Option<&str>, fingerprint: Option<&str>, ip: Option<&str>) -> Option<Self> {
        match subject_id {
            Some(subject) if !subject.is_empty() => Some(Self::user(subject)),
            _ => Self::anonymous(fingerprint, ip),
        }
    }

    /// Counter key for this caller.
    pub fn rate_limit_key(&self) -> String {
        match self {
            Identity::User { subject_id } => subject_id.clone(),
            Identity::Anonymous { fingerprint, ip } => format!("{}:{}", fingerprint, ip),
        }
    }

    pub fn policy_kind(&self) -> PolicyKind {
        match self {
            Identity::User { .. } => PolicyKind::Authenticated,
            Identity::Anonymous { .. } => PolicyKind::Anonymous,
        }
    }

    pub fn subject_id(&self) -> Option<&str> {
        match self {
            Identity::User { subject_id } => Some(subject_id.as_str()),
            Identity::Anonymous { .. } => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_user_key_is_subject() {
        let identity = Identity::user("user_123");
        assert_eq!(identity.rate_limit_key(), "user_123");
        assert_eq!(identity.policy_kind(), PolicyKind::Authenticated);
        assert_eq!(identity.subject_id(), Some("user_123"));
    }

    #[test]
    fn test_anonymous_key_is_composite() {
        let identity = Identity::anonymous(Some("fp-abc"), Some("203.0.113.7")).unwrap();
        assert_eq!(identity.rate_limit_key(), "fp-abc:203.0.113.7");
        assert_eq!(identity.policy_kind(), PolicyKind::Anonymous);
        assert_eq!(identity.subject_id(), None);
    }

    #[test]
    fn test_anonymous_requires_fingerprint() {
        assert!(Identity::anonymous(None, Some("203.0.113.7")).is_none());
        assert!(Identity::anonymous(Some("   "), Some("203.0.113.7")).is_none());
    }

    #[test]
    fn test_missing_ip_uses_placeholder() {
        let identity = Identity::anonymous(Some("fp"), None).unwrap();
        assert_eq!(identity.rate_limit_key(), "fp:unknown");
    }

    #[test]
    fn test_resolve_prefers_session() {
        let identity = Identity::resolve(Some("user_1"), Some("fp"), Some("1.1.1.1")).unwrap();
        assert_eq!(identity, Identity::user("user_1"));

        let identity = Identity::resolve(None, Some("fp"), Some("1.1.1.1")).unwrap();
        assert_eq!(identity.rate_limit_key(), "fp:1.1.1.1");

        assert!(Identity::resolve(None, None, Some("1.1.1.1")).is_none());
    }
}
