//! Hypervisor installation dispatch
//!
//! Windows gets the native download-then-silent-install path, with a UAC
//! elevation wrapper when the process is unprivileged. Debian- and
//! RHEL-family distributions get an interactive terminal running the
//! privileged package install; its completion is never observed, so those
//! paths report `pending` rather than success.

use sentrybox_common::{Error, LauncherConfig, OpReport, OsFamily, OsInfo, Result};
use std::path::Path;
use std::process::Stdio;
use std::time::Duration;
use tokio::process::Command;
use tracing::{info, warn};

/// Marker tokens identifying Debian-family distributions
const DEBIAN_MARKERS: &[&str] = &["Ubuntu", "Debian", "Mint", "Pop"];

/// Marker tokens identifying RHEL-family distributions
const RHEL_MARKERS: &[&str] = &["Rocky", "Alma", "CentOS", "Fedora", "Red Hat", "Oracle"];

/// Terminal emulators tried in order on Linux
const TERMINALS: &[&str] = &["x-terminal-emulator", "gnome-terminal", "konsole", "xterm"];

/// Resolved installation path for the detected operating system
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InstallTarget {
    WindowsNative,
    DebianFamily,
    RhelFamily,
    Unsupported(String),
}

/// Dispatch rule, evaluated in order: Windows wins outright, then the
/// distribution-name marker tokens, else unsupported. The caller-supplied
/// override hint is deliberately not consulted here.
pub fn dispatch(os: &OsInfo) -> InstallTarget {
    if os.family == OsFamily::Windows {
        return InstallTarget::WindowsNative;
    }

    if os.family == OsFamily::Linux {
        if DEBIAN_MARKERS.iter().any(|m| os.detail.contains(m)) {
            return InstallTarget::DebianFamily;
        }
        if RHEL_MARKERS.iter().any(|m| os.detail.contains(m)) {
            return InstallTarget::RhelFamily;
        }
    }

    InstallTarget::Unsupported(os.detail.clone())
}

/// Native-installer path: download if absent, then silent install with
/// elevation handling. Any failure surfaces as an error report carrying the
/// underlying text; there is no retry.
pub async fn install_windows_native(config: &LauncherConfig) -> OpReport {
    let installer_path = &config.installer.file_name;

    if !installer_path.exists() {
        info!("Downloading VirtualBox installer from {}", config.installer.url);
        if let Err(e) = download_installer(&config.installer.url, installer_path).await {
            return OpReport::error(format!("Installer download failed: {}", e));
        }
    }

    match run_silent_install(installer_path, config.timing.install_timeout_secs).await {
        Ok(()) => OpReport::success("VirtualBox installed"),
        Err(e) => OpReport::error(format!("VirtualBox installation failed: {}", e)),
    }
}

async fn download_installer(url: &str, dest: &Path) -> Result<()> {
    let response = reqwest::get(url)
        .await
        .map_err(|e| Error::Download(e.to_string()))?
        .error_for_status()
        .map_err(|e| Error::Download(e.to_string()))?;

    let bytes = response
        .bytes()
        .await
        .map_err(|e| Error::Download(e.to_string()))?;

    tokio::fs::write(dest, &bytes).await?;
    Ok(())
}

/// Silent unattended install. Elevated processes run the installer
/// directly; otherwise it goes through PowerShell's RunAs wrapper, which
/// blocks until the elevated child exits.
async fn run_silent_install(installer_path: &Path, timeout_secs: u64) -> Result<()> {
    let timeout = Duration::from_secs(timeout_secs);

    let mut cmd = if is_elevated().await {
        let mut cmd = Command::new(installer_path);
        cmd.args(["--silent", "--ignore-reboot"]);
        cmd
    } else {
        let ps_cmd = format!(
            "Start-Process -FilePath '{}' -ArgumentList '--silent', '--ignore-reboot' -Verb RunAs -Wait",
            installer_path.display()
        );
        let mut cmd = Command::new("powershell");
        cmd.args(["-Command", &ps_cmd]);
        cmd
    };
    cmd.stdin(Stdio::null());

    let output = tokio::time::timeout(timeout, cmd.output())
        .await
        .map_err(|_| Error::Timeout { seconds: timeout_secs })?
        .map_err(|e| Error::Installer(e.to_string()))?;

    if output.status.success() {
        Ok(())
    } else {
        let stderr = String::from_utf8_lossy(&output.stderr);
        Err(Error::Installer(format!(
            "installer exited with {}: {}",
            output.status,
            stderr.trim()
        )))
    }
}

/// Elevation probe: `net session` succeeds only in an elevated shell. Any
/// launch failure counts as unprivileged.
async fn is_elevated() -> bool {
    match Command::new("net")
        .arg("session")
        .stdin(Stdio::null())
        .stdout(Stdio::null())
        .stderr(Stdio::null())
        .status()
        .await
    {
        Ok(status) => status.success(),
        Err(_) => false,
    }
}

/// Package-manager path: launch an interactive terminal running the
/// privileged install command and pausing for the user. Fire-and-forget:
/// the orchestrator never observes completion, so the report is `pending`.
pub fn launch_terminal_install(target: &InstallTarget) -> OpReport {
    let install_cmd = match target {
        InstallTarget::DebianFamily => {
            "sudo apt-get update && sudo apt-get install -y virtualbox"
        }
        InstallTarget::RhelFamily => "sudo dnf install -y VirtualBox",
        _ => return OpReport::error("No terminal install path for this platform"),
    };

    let script = format!(
        "{}; echo; read -rp 'Press Enter to close this window...'",
        install_cmd
    );

    for terminal in TERMINALS {
        let spawned = std::process::Command::new(terminal)
            .args(["-e", "bash", "-c", &script])
            .stdin(Stdio::null())
            .stdout(Stdio::null())
            .stderr(Stdio::null())
            .spawn();

        match spawned {
            Ok(_) => {
                info!("Launched {} for package install", terminal);
                return OpReport::pending(
                    "Installation running in a terminal window; verify the hypervisor once it finishes",
                );
            }
            Err(e) => {
                warn!("Terminal {} unavailable: {}", terminal, e);
            }
        }
    }

    OpReport::error("No terminal emulator available to run the package install")
}

#[cfg(test)]
mod tests {
    use super::*;
    use sentrybox_common::DetectSource;

    fn os(family: OsFamily, detail: &str) -> OsInfo {
        OsInfo {
            family,
            detail: detail.to_string(),
            source: DetectSource::OsReleaseFile,
        }
    }

    #[test]
    fn test_dispatch_windows_wins() {
        let target = dispatch(&os(OsFamily::Windows, "Windows"));
        assert_eq!(target, InstallTarget::WindowsNative);
    }

    #[test]
    fn test_dispatch_debian_marker() {
        assert_eq!(
            dispatch(&os(OsFamily::Linux, "Ubuntu")),
            InstallTarget::DebianFamily
        );
        assert_eq!(
            dispatch(&os(OsFamily::Linux, "Linux Mint")),
            InstallTarget::DebianFamily
        );
    }

    #[test]
    fn test_dispatch_rhel_marker() {
        assert_eq!(
            dispatch(&os(OsFamily::Linux, "Rocky Linux")),
            InstallTarget::RhelFamily
        );
        assert_eq!(
            dispatch(&os(OsFamily::Linux, "Red Hat Enterprise Linux")),
            InstallTarget::RhelFamily
        );
    }

    #[test]
    fn test_dispatch_unsupported() {
        match dispatch(&os(OsFamily::Linux, "Arch")) {
            InstallTarget::Unsupported(detail) => assert_eq!(detail, "Arch"),
            other => panic!("expected unsupported, got {:?}", other),
        }
        assert!(matches!(
            dispatch(&os(OsFamily::MacOs, "macOS")),
            InstallTarget::Unsupported(_)
        ));
    }

    #[test]
    fn test_dispatch_order_debian_before_rhel() {
        // A pathological name containing both markers hits the Debian path
        // because the rules are evaluated in order.
        assert_eq!(
            dispatch(&os(OsFamily::Linux, "Ubuntu Rocky Remix")),
            InstallTarget::DebianFamily
        );
    }
}
