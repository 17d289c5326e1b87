//! Orchestrator integration tests against a scripted stand-in for the
//! hypervisor control tool.

#![cfg(unix)]

use sentrybox_common::{LauncherConfig, LoginSource, OpStatus};
use sentrybox_core::Provisioner;
use std::io::Write;
use std::os::unix::fs::PermissionsExt;
use std::path::Path;

const FAKE_TOOL: &str = r#"#!/bin/sh
case "$1" in
  --version)
    echo "7.2.4r170995"
    ;;
  list)
    if [ "$2" = "vms" ]; then
      echo "\"Wazuh-Server-Monitor\" {8a4f}"
      echo "\"scratch-vm\" {11c0}"
    else
      echo "\"scratch-vm\" {11c0}"
    fi
    ;;
  guestproperty)
    case "$4" in
      */Net/0/V4/IP) echo "Value: 10.0.2.15" ;;
      */LoggedInUsers) echo "Value: 1" ;;
      *) echo "No value set!" ;;
    esac
    ;;
  import|startvm|controlvm)
    exit 0
    ;;
  *)
    echo "unknown subcommand" >&2
    exit 1
    ;;
esac
"#;

const FAILING_TOOL: &str = r#"#!/bin/sh
echo "VBoxManage: error: The machine is already locked" >&2
exit 1
"#;

fn write_tool(dir: &Path, name: &str, body: &str) -> String {
    let path = dir.join(name);
    let mut file = std::fs::File::create(&path).unwrap();
    file.write_all(body.as_bytes()).unwrap();
    let mut perms = std::fs::metadata(&path).unwrap().permissions();
    perms.set_mode(0o755);
    std::fs::set_permissions(&path, perms).unwrap();
    path.display().to_string()
}

fn provisioner(dir: &Path, tool_body: &str) -> Provisioner {
    let mut config = LauncherConfig::default();
    config.hypervisor.command = write_tool(dir, "vboxmanage-stub", tool_body);
    config.timing.poll_interval_secs = 0;
    config.timing.poll_max_attempts = 2;
    Provisioner::new(config)
}

#[tokio::test]
async fn test_presence_and_state_queries() {
    let dir = tempfile::tempdir().unwrap();
    let p = provisioner(dir.path(), FAKE_TOOL);

    let report = p.check_hypervisor().await;
    assert_eq!(report.status, OpStatus::Success);

    assert!(p.vm_exists().await);
    assert!(!p.vm_running().await);

    // Repeated calls are pure functions of external state
    assert!(p.vm_exists().await);
}

#[tokio::test]
async fn test_guest_ip_resolution() {
    let dir = tempfile::tempdir().unwrap();
    let p = provisioner(dir.path(), FAKE_TOOL);

    let report = p.guest_ip().await;
    assert_eq!(report.status, OpStatus::Success);
    assert_eq!(report.ip.as_deref(), Some("10.0.2.15"));

    let report = p.wait_for_guest_ip().await;
    assert_eq!(report.status, OpStatus::Success);
}

#[tokio::test]
async fn test_logged_in_via_user_count() {
    let dir = tempfile::tempdir().unwrap();
    let p = provisioner(dir.path(), FAKE_TOOL);

    let (logged_in, source) = p.vm_logged_in().await;
    assert!(logged_in);
    assert_eq!(source, LoginSource::UserCount);
}

#[tokio::test]
async fn test_power_control_maps_exit_status() {
    let dir = tempfile::tempdir().unwrap();
    let p = provisioner(dir.path(), FAKE_TOOL);

    assert_eq!(p.start_vm().await.status, OpStatus::Success);
    assert_eq!(p.stop_vm().await.status, OpStatus::Success);

    let failing = provisioner(dir.path(), FAILING_TOOL);
    let report = failing.start_vm().await;
    assert_eq!(report.status, OpStatus::Error);
    assert!(report.message.contains("already locked"));
    let report = failing.stop_vm().await;
    assert_eq!(report.status, OpStatus::Error);
    assert!(report.message.contains("already locked"));
}

#[tokio::test]
async fn test_import_with_present_appliance() {
    let dir = tempfile::tempdir().unwrap();
    let mut config = LauncherConfig::default();
    config.hypervisor.command = write_tool(dir.path(), "vboxmanage-stub", FAKE_TOOL);
    let ova = dir.path().join("appliance.ova");
    std::fs::write(&ova, b"not a real ova").unwrap();
    config.appliance_path = ova;

    let p = Provisioner::new(config);
    let report = p.import_appliance().await;
    assert_eq!(report.status, OpStatus::Success);
    assert!(p.appliance_present());
}

#[tokio::test]
async fn test_pending_ip_when_property_unset() {
    let dir = tempfile::tempdir().unwrap();
    // Tool that answers queries but has no IP property set yet
    let body = r#"#!/bin/sh
case "$1" in
  guestproperty) echo "No value set!" ;;
  *) exit 0 ;;
esac
"#;
    let p = provisioner(dir.path(), body);

    let report = p.guest_ip().await;
    assert_eq!(report.status, OpStatus::Pending);

    // Bounded poll gives up with the last pending report
    let report = p.wait_for_guest_ip().await;
    assert_eq!(report.status, OpStatus::Pending);
}
