//! SentryBox Core Library
//!
//! The provisioning orchestrator: sequences hypervisor-presence checks,
//! platform-dispatched hypervisor installation, appliance import, VM power
//! control, and guest-state polling. Every operation is a synchronous
//! external-process invocation reported through the uniform `OpReport`
//! shape; nothing is cached between calls.

pub mod install;
pub mod orchestrator;
pub mod osdetect;
pub mod vbox;

pub use orchestrator::Provisioner;
pub use sentrybox_common::{Error, LauncherConfig, Result};
