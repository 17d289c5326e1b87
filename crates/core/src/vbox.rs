//! VBoxManage invocation wrapper
//!
//! Handles locating and running the VirtualBox control tool, with a
//! per-invocation timeout, and parsing its plain-text output conventions.

use sentrybox_common::{Error, LauncherConfig, LoginSource, OsFamily, Result};
use std::process::Stdio;
use std::time::Duration;
use tokio::process::Command;
use tracing::{debug, warn};

/// Guest property key for the first IPv4 address reported by guest additions
pub const GUEST_PROP_IP: &str = "/VirtualBox/GuestInfo/Net/0/V4/IP";

/// Guest property key for the logged-in user count
pub const GUEST_PROP_LOGIN_COUNT: &str = "/VirtualBox/GuestInfo/OS/LoggedInUsers";

/// Guest property key for the logged-in username list
pub const GUEST_PROP_LOGIN_LIST: &str = "/VirtualBox/GuestInfo/OS/LoggedInUsersList";

/// Captured output of a finished tool invocation
#[derive(Debug, Clone)]
pub struct ToolOutput {
    pub stdout: String,
    pub stderr: String,
    pub success: bool,
}

impl ToolOutput {
    /// Error text for a failed invocation: stderr if present, else stdout
    pub fn error_text(&self) -> String {
        let text = if self.stderr.trim().is_empty() {
            self.stdout.trim()
        } else {
            self.stderr.trim()
        };
        if text.is_empty() {
            "tool exited with non-zero status".to_string()
        } else {
            text.to_string()
        }
    }
}

/// VBoxManage runner for a single configured tool location
pub struct VboxTool {
    program: String,
    timeout: Duration,
}

impl VboxTool {
    /// Resolve the tool location for the given platform family.
    ///
    /// On Windows the configured absolute path is used; elsewhere the bare
    /// command name is resolved through PATH by the OS.
    pub fn new(config: &LauncherConfig, family: OsFamily) -> Self {
        let program = match family {
            OsFamily::Windows => config.hypervisor.windows_path.display().to_string(),
            _ => config.hypervisor.command.clone(),
        };
        Self {
            program,
            timeout: Duration::from_secs(config.timing.command_timeout_secs),
        }
    }

    /// The resolved program path or command name
    pub fn program(&self) -> &str {
        &self.program
    }

    /// Run the tool with the given arguments, bounded by the configured
    /// timeout. A spawn failure or timeout is an error; a non-zero exit is
    /// reported through `ToolOutput::success` so callers decide its meaning.
    pub async fn run(&self, args: &[&str]) -> Result<ToolOutput> {
        debug!("Running {} {}", self.program, args.join(" "));

        let mut cmd = Command::new(&self.program);
        cmd.args(args)
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .kill_on_drop(true);

        let output = tokio::time::timeout(self.timeout, cmd.output())
            .await
            .map_err(|_| Error::Timeout {
                seconds: self.timeout.as_secs(),
            })?
            .map_err(|e| Error::Tool(format!("failed to launch {}: {}", self.program, e)))?;

        Ok(ToolOutput {
            stdout: String::from_utf8_lossy(&output.stdout).to_string(),
            stderr: String::from_utf8_lossy(&output.stderr).to_string(),
            success: output.status.success(),
        })
    }

    /// Run the tool and treat a non-zero exit as an error carrying the
    /// underlying tool output text.
    pub async fn run_ok(&self, args: &[&str]) -> Result<ToolOutput> {
        let output = self.run(args).await?;
        if output.success {
            Ok(output)
        } else {
            Err(Error::Tool(output.error_text()))
        }
    }

    /// Query a guest property, returning the raw tool output. Callers parse
    /// the `Value: <v>` marker themselves so that "unset" stays
    /// distinguishable from a hard failure.
    pub async fn guest_property(&self, vm_name: &str, key: &str) -> Result<ToolOutput> {
        self.run(&["guestproperty", "get", vm_name, key]).await
    }
}

/// Extract the value following the `Value:` marker from guestproperty
/// output. Absence of the marker means the property is unset.
pub fn parse_value_marker(output: &str) -> Option<String> {
    for line in output.lines() {
        if let Some(rest) = line.strip_prefix("Value:") {
            return Some(rest.trim().to_string());
        }
    }
    None
}

/// Substring match of the VM name against `list vms` / `list runningvms`
/// output. Plain substring semantics: a VM name that is a substring of
/// another VM's name also matches. Documented quirk of the original tool
/// contract, kept as-is.
pub fn output_lists_vm(output: &str, vm_name: &str) -> bool {
    output.contains(vm_name)
}

/// Decide the logged-in answer from the two guest-property probes.
///
/// `count_output` and `list_output` are the raw tool outputs of the
/// LoggedInUsers and LoggedInUsersList queries, `None` when the query
/// itself failed to launch. The count property wins when parseable; the
/// username list is the fallback; everything absent degrades to false.
pub fn decide_logged_in(
    count_output: Option<&str>,
    list_output: Option<&str>,
) -> (bool, LoginSource) {
    if let Some(out) = count_output {
        if let Some(value) = parse_value_marker(out) {
            if let Ok(count) = value.parse::<u32>() {
                return (count > 0, LoginSource::UserCount);
            }
        }
    }

    match list_output {
        Some(out) => match parse_value_marker(out) {
            Some(value) if !value.trim().is_empty() => (true, LoginSource::UserList),
            Some(_) => (false, LoginSource::UserList),
            None => {
                if count_output.is_none() {
                    (false, LoginSource::QueryFailed)
                } else {
                    (false, LoginSource::PropertyUnset)
                }
            }
        },
        None => {
            warn!("logged-in guest property queries failed, reporting not logged in");
            (false, LoginSource::QueryFailed)
        }
    }
}
