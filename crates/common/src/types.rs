//! Core types for SentryBox

use serde::{Deserialize, Serialize};

/// Operation outcome status
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OpStatus {
    Success,
    Error,
    Pending,
}

impl std::fmt::Display for OpStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            OpStatus::Success => write!(f, "success"),
            OpStatus::Error => write!(f, "error"),
            OpStatus::Pending => write!(f, "pending"),
        }
    }
}

/// Uniform result record returned by every orchestrator operation
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OpReport {
    pub status: OpStatus,
    pub message: String,
    /// Guest IP address, set only by the IP resolution operation
    #[serde(skip_serializing_if = "Option::is_none")]
    pub ip: Option<String>,
}

impl OpReport {
    pub fn success(message: impl Into<String>) -> Self {
        Self {
            status: OpStatus::Success,
            message: message.into(),
            ip: None,
        }
    }

    pub fn error(message: impl Into<String>) -> Self {
        Self {
            status: OpStatus::Error,
            message: message.into(),
            ip: None,
        }
    }

    pub fn pending(message: impl Into<String>) -> Self {
        Self {
            status: OpStatus::Pending,
            message: message.into(),
            ip: None,
        }
    }

    pub fn with_ip(mut self, ip: impl Into<String>) -> Self {
        self.ip = Some(ip.into());
        self
    }

    pub fn is_success(&self) -> bool {
        self.status == OpStatus::Success
    }
}

/// Operating system family
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OsFamily {
    Windows,
    Linux,
    MacOs,
    Other,
}

impl std::fmt::Display for OsFamily {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            OsFamily::Windows => write!(f, "windows"),
            OsFamily::Linux => write!(f, "linux"),
            OsFamily::MacOs => write!(f, "macos"),
            OsFamily::Other => write!(f, "other"),
        }
    }
}

/// Which detection step produced the OS detail string
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DetectSource {
    /// Compile-time platform constant, no distribution lookup needed
    Platform,
    /// `lsb_release -si` answered
    LsbRelease,
    /// Parsed NAME= from /etc/os-release
    OsReleaseFile,
    /// Every probe failed, generic label used
    GenericFallback,
}

/// Operating system descriptor, produced fresh on each query
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OsInfo {
    pub family: OsFamily,
    /// Distribution name on Linux, version detail elsewhere
    pub detail: String,
    pub source: DetectSource,
}

/// Which probe decided the logged-in answer
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LoginSource {
    /// Numeric LoggedInUsers guest property was parseable
    UserCount,
    /// Fell back to the LoggedInUsersList string property
    UserList,
    /// Neither property was set in the guest
    PropertyUnset,
    /// The guest-property query itself failed to launch
    QueryFailed,
}

/// Aggregate VM state snapshot used by the status endpoint
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct VmCheck {
    pub exists: bool,
    pub running: bool,
    pub logged_in: bool,
    pub login_source: LoginSource,
}

/// Fixed credential pairs shipped with the appliance
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CredentialSet {
    pub vm_user: String,
    pub vm_password: String,
    pub dashboard_user: String,
    pub dashboard_password: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_op_report_json_shape() {
        let report = OpReport::success("ok").with_ip("10.0.2.15");
        let json = serde_json::to_value(&report).unwrap();
        assert_eq!(json["status"], "success");
        assert_eq!(json["message"], "ok");
        assert_eq!(json["ip"], "10.0.2.15");

        // ip is omitted entirely when unset
        let report = OpReport::error("boom");
        let json = serde_json::to_value(&report).unwrap();
        assert_eq!(json["status"], "error");
        assert!(json.get("ip").is_none());
    }

    #[test]
    fn test_status_roundtrip() {
        for status in [OpStatus::Success, OpStatus::Error, OpStatus::Pending] {
            let s = serde_json::to_string(&status).unwrap();
            let back: OpStatus = serde_json::from_str(&s).unwrap();
            assert_eq!(status, back);
        }
    }
}
