//! Provisioning orchestrator
//!
//! `Provisioner` is the single caller-facing surface: one method per
//! operation, each a fresh external-tool invocation returning the uniform
//! `OpReport` shape (or a plain boolean for the read-only checks). There is
//! no internal state beyond the configuration, so concurrent callers simply
//! race at the tool level.

use crate::install::{self, InstallTarget};
use crate::osdetect;
use crate::vbox::{
    self, VboxTool, GUEST_PROP_IP, GUEST_PROP_LOGIN_COUNT, GUEST_PROP_LOGIN_LIST,
};
use sentrybox_common::{
    CredentialSet, LauncherConfig, LoginSource, OpReport, OsFamily, OsInfo, VmCheck,
};
use std::time::Duration;
use tracing::{info, warn};

pub struct Provisioner {
    config: LauncherConfig,
}

impl Provisioner {
    pub fn new(config: LauncherConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &LauncherConfig {
        &self.config
    }

    /// Tool location is resolved per call, never cached.
    fn tool(&self) -> VboxTool {
        VboxTool::new(&self.config, osdetect::platform_family())
    }

    /// Detect hypervisor presence. On Windows this is a filesystem check of
    /// the fixed install path; elsewhere the command is invoked with
    /// `--version` and must exit zero.
    pub async fn check_hypervisor(&self) -> OpReport {
        match osdetect::platform_family() {
            OsFamily::Windows => {
                if self.config.hypervisor.windows_path.exists() {
                    OpReport::success("VirtualBox found and ready")
                } else {
                    OpReport::error("VirtualBox not found; install it first")
                }
            }
            _ => match self.tool().run(&["--version"]).await {
                Ok(output) if output.success => OpReport::success("VirtualBox found and ready"),
                _ => OpReport::error("VirtualBox not found; install it first"),
            },
        }
    }

    /// Resolve the current operating system. Never fails.
    pub async fn os_info(&self) -> OsInfo {
        osdetect::os_info().await
    }

    /// Install the hypervisor, dispatched on the auto-detected OS. The
    /// manual override hint is logged but never consulted for dispatch.
    pub async fn install_hypervisor(&self, hint: Option<&str>) -> OpReport {
        if let Some(hint) = hint {
            info!("User-supplied OS hint: {} (dispatch uses auto-detection)", hint);
        }

        let os = self.os_info().await;
        let target = install::dispatch(&os);
        info!("Install dispatch for {} ({}): {:?}", os.family, os.detail, target);

        match target {
            InstallTarget::WindowsNative => install::install_windows_native(&self.config).await,
            InstallTarget::DebianFamily | InstallTarget::RhelFamily => {
                install::launch_terminal_install(&target)
            }
            InstallTarget::Unsupported(detail) => OpReport::error(format!(
                "{} is not supported for automatic installation; install VirtualBox manually",
                detail
            )),
        }
    }

    /// Import the appliance image as the configured VM. Not idempotent:
    /// importing while the VM already exists fails at the tool level, so
    /// callers check existence first.
    pub async fn import_appliance(&self) -> OpReport {
        let ova = &self.config.appliance_path;
        if !ova.exists() {
            return OpReport::error(format!("Appliance file {} not found", ova.display()));
        }

        let ova_arg = ova.display().to_string();
        let result = self
            .tool()
            .run_ok(&[
                "import",
                &ova_arg,
                "--vsys",
                "0",
                "--vmname",
                &self.config.vm_name,
            ])
            .await;

        match result {
            Ok(_) => OpReport::success("Appliance imported and ready to start"),
            Err(e) => OpReport::error(format!("Appliance import failed: {}", e)),
        }
    }

    /// Start the VM in GUI mode. Best-effort single attempt.
    pub async fn start_vm(&self) -> OpReport {
        let result = self
            .tool()
            .run_ok(&["startvm", &self.config.vm_name, "--type", "gui"])
            .await;

        match result {
            Ok(_) => OpReport::success("Starting the monitoring VM..."),
            Err(e) => OpReport::error(format!("Failed to start VM: {}", e)),
        }
    }

    /// Send the ACPI power-button signal. Best-effort single attempt.
    pub async fn stop_vm(&self) -> OpReport {
        let result = self
            .tool()
            .run_ok(&["controlvm", &self.config.vm_name, "acpipowerbutton"])
            .await;

        match result {
            Ok(_) => OpReport::success("Shutdown signal sent"),
            Err(e) => OpReport::error(format!("Failed to stop VM: {}", e)),
        }
    }

    /// True iff the VM name appears in `list vms` output. Launch failure
    /// degrades to false.
    pub async fn vm_exists(&self) -> bool {
        self.list_contains("vms").await
    }

    /// True iff the VM name appears in `list runningvms` output.
    pub async fn vm_running(&self) -> bool {
        self.list_contains("runningvms").await
    }

    async fn list_contains(&self, kind: &str) -> bool {
        match self.tool().run(&["list", kind]).await {
            Ok(output) if output.success => {
                vbox::output_lists_vm(&output.stdout, &self.config.vm_name)
            }
            Ok(output) => {
                warn!("list {} failed: {}", kind, output.error_text());
                false
            }
            Err(e) => {
                warn!("list {} failed: {}", kind, e);
                false
            }
        }
    }

    /// Logged-in probe over the two guest properties. Failure of either
    /// query degrades to a negative answer, never an error.
    pub async fn vm_logged_in(&self) -> (bool, LoginSource) {
        let tool = self.tool();
        let vm = &self.config.vm_name;

        let count = tool
            .guest_property(vm, GUEST_PROP_LOGIN_COUNT)
            .await
            .ok()
            .filter(|o| o.success)
            .map(|o| o.stdout);
        let list = tool
            .guest_property(vm, GUEST_PROP_LOGIN_LIST)
            .await
            .ok()
            .filter(|o| o.success)
            .map(|o| o.stdout);

        vbox::decide_logged_in(count.as_deref(), list.as_deref())
    }

    /// Aggregate state snapshot for the status endpoint.
    pub async fn vm_check(&self) -> VmCheck {
        let exists = self.vm_exists().await;
        let running = if exists { self.vm_running().await } else { false };
        let (logged_in, login_source) = if running {
            self.vm_logged_in().await
        } else {
            (false, LoginSource::PropertyUnset)
        };

        VmCheck {
            exists,
            running,
            logged_in,
            login_source,
        }
    }

    /// Resolve the guest IP address. `pending` means the guest has not
    /// published it yet and the caller should poll again.
    pub async fn guest_ip(&self) -> OpReport {
        let result = self
            .tool()
            .guest_property(&self.config.vm_name, GUEST_PROP_IP)
            .await;

        match result {
            Ok(output) => match vbox::parse_value_marker(&output.stdout) {
                Some(ip) if !ip.is_empty() => {
                    OpReport::success("Guest IP resolved").with_ip(ip)
                }
                _ => OpReport::pending("Guest IP not yet available"),
            },
            Err(e) => OpReport::error(format!("Guest IP query failed: {}", e)),
        }
    }

    /// Bounded poll loop around `guest_ip`: repeat at the configured
    /// interval until success or the attempt budget is spent, then return
    /// the last report.
    pub async fn wait_for_guest_ip(&self) -> OpReport {
        let interval = Duration::from_secs(self.config.timing.poll_interval_secs);
        let attempts = self.config.timing.poll_max_attempts.max(1);

        let mut last = OpReport::pending("Guest IP not yet available");
        for attempt in 1..=attempts {
            last = self.guest_ip().await;
            if last.is_success() {
                return last;
            }
            if attempt < attempts {
                tokio::time::sleep(interval).await;
            }
        }

        warn!("Guest IP still unavailable after {} attempts", attempts);
        last
    }

    /// Existence check of the appliance image file.
    pub fn appliance_present(&self) -> bool {
        self.config.appliance_path.exists()
    }

    /// Fixed credential pairs for the VM login and the monitored dashboard.
    pub fn credentials(&self) -> CredentialSet {
        self.config.credentials.clone()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn provisioner_with(config: LauncherConfig) -> Provisioner {
        Provisioner::new(config)
    }

    #[tokio::test]
    async fn test_import_missing_appliance_skips_tool() {
        let mut config = LauncherConfig::default();
        config.appliance_path = std::path::PathBuf::from("/nonexistent/appliance.ova");
        // Tool command that would fail loudly if ever invoked
        config.hypervisor.command = "/nonexistent/VBoxManage".to_string();

        let report = provisioner_with(config).import_appliance().await;
        assert_eq!(report.status, sentrybox_common::OpStatus::Error);
        assert!(report.message.contains("not found"));
    }

    #[tokio::test]
    async fn test_missing_tool_degrades_checks_to_false() {
        let mut config = LauncherConfig::default();
        config.hypervisor.command = "/nonexistent/VBoxManage".to_string();
        let p = provisioner_with(config);

        assert!(!p.vm_exists().await);
        assert!(!p.vm_running().await);

        let (logged_in, source) = p.vm_logged_in().await;
        assert!(!logged_in);
        assert_eq!(source, LoginSource::QueryFailed);
    }

    #[tokio::test]
    async fn test_missing_tool_start_is_error_with_text() {
        let mut config = LauncherConfig::default();
        config.hypervisor.command = "/nonexistent/VBoxManage".to_string();
        let p = provisioner_with(config);

        let report = p.start_vm().await;
        assert_eq!(report.status, sentrybox_common::OpStatus::Error);
        // Underlying error text is preserved for both start and stop
        assert!(report.message.contains("Failed to start VM"));
        let report = p.stop_vm().await;
        assert!(report.message.contains("Failed to stop VM"));
    }

    #[tokio::test]
    async fn test_credentials_come_from_config() {
        let config = LauncherConfig::default();
        let p = provisioner_with(config);
        let creds = p.credentials();
        assert_eq!(creds.vm_user, "wazuh-user");
        assert_eq!(creds.dashboard_user, "admin");
    }
}
