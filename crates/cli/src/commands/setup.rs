//! Host setup commands: hypervisor detection, OS info, installation

use anyhow::Result;
use clap::Subcommand;
use sentrybox_common::{CredentialSet, LauncherConfig, OsInfo};
use sentrybox_core::Provisioner;

use super::print_report;
use crate::output::{print_item, OutputFormat, TableDisplay};

#[derive(Subcommand)]
pub enum SetupCommands {
    /// Check whether the hypervisor tool and appliance file are present
    Check,

    /// Show the detected operating system
    Os,

    /// Install the hypervisor for this platform
    Install {
        /// Manual OS hint (recorded, but dispatch always auto-detects)
        #[arg(long)]
        os: Option<String>,
    },

    /// Show the fixed appliance credential pairs
    Credentials,
}

impl TableDisplay for OsInfo {
    fn headers() -> Vec<&'static str> {
        vec!["Family", "Detail", "Source"]
    }

    fn row(&self) -> Vec<String> {
        vec![
            self.family.to_string(),
            self.detail.clone(),
            format!("{:?}", self.source),
        ]
    }
}

impl TableDisplay for CredentialSet {
    fn headers() -> Vec<&'static str> {
        vec!["VM user", "VM password", "Dashboard user", "Dashboard password"]
    }

    fn row(&self) -> Vec<String> {
        vec![
            self.vm_user.clone(),
            self.vm_password.clone(),
            self.dashboard_user.clone(),
            self.dashboard_password.clone(),
        ]
    }
}

pub async fn execute(cmd: SetupCommands, config: LauncherConfig, format: OutputFormat) -> Result<()> {
    let p = Provisioner::new(config);

    match cmd {
        SetupCommands::Check => {
            print_report(&p.check_hypervisor().await, format);
            let appliance = p.config().appliance_path.display().to_string();
            if p.appliance_present() {
                crate::output::print_success(&format!("Appliance file {} present", appliance));
            } else {
                crate::output::print_warning(&format!("Appliance file {} missing", appliance));
            }
        }

        SetupCommands::Os => {
            let info = p.os_info().await;
            print_item(&info, format);
        }

        SetupCommands::Install { os } => {
            print_report(&p.install_hypervisor(os.as_deref()).await, format);
        }

        SetupCommands::Credentials => {
            print_item(&p.credentials(), format);
        }
    }

    Ok(())
}
