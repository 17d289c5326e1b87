//! SentryBox Web Console
//!
//! Serves the launcher page and a JSON API mapping 1:1 onto the
//! provisioning orchestrator's operations.

pub mod server;
pub mod static_files;
