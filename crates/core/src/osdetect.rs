//! Operating system resolution
//!
//! Family comes from the platform constant. On Linux the distribution name
//! is resolved through an ordered fallback chain: `lsb_release -si`, then
//! the NAME key of /etc/os-release, then the literal "Linux". Each step
//! records which probe answered; failures never propagate.

use sentrybox_common::{DetectSource, OsFamily, OsInfo};
use std::process::Stdio;
use tokio::process::Command;
use tracing::debug;

const OS_RELEASE_PATH: &str = "/etc/os-release";

/// Resolve the current operating system. Never fails: distribution
/// detection failures degrade to the generic "Linux" label.
pub async fn os_info() -> OsInfo {
    let family = platform_family();

    match family {
        OsFamily::Linux => {
            let (detail, source) = linux_distro().await;
            OsInfo {
                family,
                detail,
                source,
            }
        }
        _ => OsInfo {
            family,
            detail: platform_label(family).to_string(),
            source: DetectSource::Platform,
        },
    }
}

/// Platform family from the compile-time constant
pub fn platform_family() -> OsFamily {
    match std::env::consts::OS {
        "windows" => OsFamily::Windows,
        "linux" => OsFamily::Linux,
        "macos" => OsFamily::MacOs,
        _ => OsFamily::Other,
    }
}

fn platform_label(family: OsFamily) -> &'static str {
    match family {
        OsFamily::Windows => "Windows",
        OsFamily::Linux => "Linux",
        OsFamily::MacOs => "macOS",
        OsFamily::Other => "Unknown",
    }
}

/// Distribution-name fallback chain. Order matters: the richer probe wins,
/// then the file parse, then the generic label.
async fn linux_distro() -> (String, DetectSource) {
    if let Some(name) = probe_lsb_release().await {
        debug!("Distribution resolved via lsb_release: {}", name);
        return (name, DetectSource::LsbRelease);
    }

    if let Ok(content) = tokio::fs::read_to_string(OS_RELEASE_PATH).await {
        if let Some(name) = parse_os_release_name(&content) {
            debug!("Distribution resolved via {}: {}", OS_RELEASE_PATH, name);
            return (name, DetectSource::OsReleaseFile);
        }
    }

    ("Linux".to_string(), DetectSource::GenericFallback)
}

/// `lsb_release -si` prints the distributor ID on a single line. Any launch
/// failure, non-zero exit, or empty output is swallowed.
async fn probe_lsb_release() -> Option<String> {
    let output = Command::new("lsb_release")
        .arg("-si")
        .stdin(Stdio::null())
        .stdout(Stdio::piped())
        .stderr(Stdio::null())
        .output()
        .await
        .ok()?;

    if !output.status.success() {
        return None;
    }

    let name = String::from_utf8_lossy(&output.stdout).trim().to_string();
    if name.is_empty() {
        None
    } else {
        Some(name)
    }
}

/// Parse the NAME key from os-release key-value content, stripping quotes.
pub fn parse_os_release_name(content: &str) -> Option<String> {
    for line in content.lines() {
        let line = line.trim();
        if let Some(value) = line.strip_prefix("NAME=") {
            let name = value.trim().trim_matches('"').trim();
            if !name.is_empty() {
                return Some(name.to_string());
            }
        }
    }
    None
}
