//! Launcher configuration
//!
//! All process-wide constants of the original deployment (VM name, appliance
//! path, tool locations, installer URL, credentials) live in one struct that
//! is constructed once at startup and passed by reference into the
//! orchestrator, so tests can point it at fake tool paths.

use crate::types::CredentialSet;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Launcher configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LauncherConfig {
    /// Well-known VM name used for import and all lifecycle queries
    pub vm_name: String,

    /// Path to the appliance image expected in the working directory
    pub appliance_path: PathBuf,

    /// Hypervisor tool configuration
    pub hypervisor: HypervisorConfig,

    /// Native installer configuration (Windows)
    pub installer: InstallerConfig,

    /// Polling and timeout knobs
    pub timing: TimingConfig,

    /// Fixed credential pairs for the VM and the monitored dashboard
    pub credentials: CredentialSet,
}

impl Default for LauncherConfig {
    fn default() -> Self {
        Self {
            vm_name: "Wazuh-Server-Monitor".to_string(),
            appliance_path: PathBuf::from("Wazuh-Install-Ready.ova"),
            hypervisor: HypervisorConfig::default(),
            installer: InstallerConfig::default(),
            timing: TimingConfig::default(),
            credentials: CredentialSet {
                vm_user: "wazuh-user".to_string(),
                vm_password: "wazuh".to_string(),
                dashboard_user: "admin".to_string(),
                dashboard_password: "admin".to_string(),
            },
        }
    }
}

/// Hypervisor tool locations, resolved per call and never cached
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HypervisorConfig {
    /// Fixed VBoxManage.exe path checked for existence on Windows
    pub windows_path: PathBuf,

    /// Command name used on other platforms (resolved via PATH)
    pub command: String,
}

impl Default for HypervisorConfig {
    fn default() -> Self {
        Self {
            windows_path: PathBuf::from(
                r"C:\Program Files\Oracle\VirtualBox\VBoxManage.exe",
            ),
            command: "VBoxManage".to_string(),
        }
    }
}

/// Native installer download settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct InstallerConfig {
    /// Remote URL for the Windows installer
    pub url: String,

    /// Local filename the installer is downloaded to
    pub file_name: PathBuf,
}

impl Default for InstallerConfig {
    fn default() -> Self {
        Self {
            url: "https://download.virtualbox.org/virtualbox/7.2.4/VirtualBox-7.2.4-170995-Win.exe"
                .to_string(),
            file_name: PathBuf::from("VirtualBox-Setup.exe"),
        }
    }
}

/// Timeout and poll cadence configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TimingConfig {
    /// Per-invocation timeout for hypervisor tool commands
    pub command_timeout_secs: u64,

    /// Timeout for the installer (download excluded)
    pub install_timeout_secs: u64,

    /// Interval between guest IP poll attempts
    pub poll_interval_secs: u64,

    /// Maximum guest IP poll attempts before giving up
    pub poll_max_attempts: u32,
}

impl Default for TimingConfig {
    fn default() -> Self {
        Self {
            command_timeout_secs: 60,
            install_timeout_secs: 600,
            poll_interval_secs: 5,
            poll_max_attempts: 36,
        }
    }
}

impl LauncherConfig {
    /// Load configuration from file, falling back to defaults when absent
    pub fn load(path: &std::path::Path) -> anyhow::Result<Self> {
        if path.exists() {
            let content = std::fs::read_to_string(path)?;
            let config: Self = toml::from_str(&content)?;
            Ok(config)
        } else {
            Ok(Self::default())
        }
    }

    /// Save configuration to file
    pub fn save(&self, path: &std::path::Path) -> anyhow::Result<()> {
        let content = toml::to_string_pretty(self)?;
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        std::fs::write(path, content)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_match_deployment_constants() {
        let cfg = LauncherConfig::default();
        assert_eq!(cfg.vm_name, "Wazuh-Server-Monitor");
        assert_eq!(cfg.appliance_path, PathBuf::from("Wazuh-Install-Ready.ova"));
        assert_eq!(cfg.hypervisor.command, "VBoxManage");
        assert!(cfg.installer.url.starts_with("https://download.virtualbox.org/"));
    }

    #[test]
    fn test_toml_roundtrip() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");

        let mut cfg = LauncherConfig::default();
        cfg.vm_name = "Custom-VM".to_string();
        cfg.timing.poll_max_attempts = 3;
        cfg.save(&path).unwrap();

        let loaded = LauncherConfig::load(&path).unwrap();
        assert_eq!(loaded.vm_name, "Custom-VM");
        assert_eq!(loaded.timing.poll_max_attempts, 3);
    }

    #[test]
    fn test_load_missing_file_gives_defaults() {
        let loaded = LauncherConfig::load(std::path::Path::new("/nonexistent/config.toml")).unwrap();
        assert_eq!(loaded.vm_name, LauncherConfig::default().vm_name);
    }
}
