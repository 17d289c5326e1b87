//! VM lifecycle commands

use anyhow::Result;
use clap::Subcommand;
use colored::Colorize;
use sentrybox_common::{LauncherConfig, VmCheck};
use sentrybox_core::Provisioner;

use super::print_report;
use crate::output::{print_item, OutputFormat, TableDisplay};

#[derive(Subcommand)]
pub enum VmCommands {
    /// Import the appliance image as the configured VM
    Import,

    /// Start the VM (GUI mode)
    Start,

    /// Send the ACPI power-button signal to the VM
    Stop,

    /// Show exists / running / logged-in state
    Status,

    /// Resolve the guest IP address
    Ip {
        /// Poll until the guest publishes an address
        #[arg(long)]
        wait: bool,

        /// Seconds between poll attempts (with --wait)
        #[arg(long)]
        interval: Option<u64>,

        /// Maximum poll attempts (with --wait)
        #[arg(long)]
        attempts: Option<u32>,
    },
}

impl TableDisplay for VmCheck {
    fn headers() -> Vec<&'static str> {
        vec!["Exists", "Running", "Logged in", "Login source"]
    }

    fn row(&self) -> Vec<String> {
        vec![
            self.exists.to_string(),
            self.running.to_string(),
            self.logged_in.to_string(),
            format!("{:?}", self.login_source),
        ]
    }
}

pub async fn execute(cmd: VmCommands, mut config: LauncherConfig, format: OutputFormat) -> Result<()> {
    match cmd {
        VmCommands::Import => {
            let p = Provisioner::new(config);
            if p.vm_exists().await {
                anyhow::bail!(
                    "VM {} already exists; import is not idempotent",
                    p.config().vm_name
                );
            }
            print_report(&p.import_appliance().await, format);
        }

        VmCommands::Start => {
            let p = Provisioner::new(config);
            print_report(&p.start_vm().await, format);
        }

        VmCommands::Stop => {
            let p = Provisioner::new(config);
            print_report(&p.stop_vm().await, format);
        }

        VmCommands::Status => {
            let p = Provisioner::new(config);
            let check = p.vm_check().await;
            if matches!(format, OutputFormat::Table) {
                let state = if check.running {
                    "running".green()
                } else if check.exists {
                    "stopped".yellow()
                } else {
                    "absent".red()
                };
                println!("VM {}: {}", p.config().vm_name, state);
            }
            print_item(&check, format);
        }

        VmCommands::Ip {
            wait,
            interval,
            attempts,
        } => {
            if let Some(interval) = interval {
                config.timing.poll_interval_secs = interval;
            }
            if let Some(attempts) = attempts {
                config.timing.poll_max_attempts = attempts;
            }
            let p = Provisioner::new(config);
            let report = if wait {
                p.wait_for_guest_ip().await
            } else {
                p.guest_ip().await
            };
            print_report(&report, format);
        }
    }

    Ok(())
}
