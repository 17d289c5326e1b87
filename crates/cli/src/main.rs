//! SentryBox CLI - Main Entry Point
//!
//! Command-line interface for provisioning and controlling the
//! security-monitoring appliance VM.

use clap::{Parser, Subcommand};
use std::path::PathBuf;

mod commands;
mod output;

use commands::{setup, vm, web};
use sentrybox_common::LauncherConfig;
use sentrybox_core::Provisioner;

/// SentryBox - security-monitoring appliance launcher
#[derive(Parser)]
#[command(name = "sentrybox")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
struct Cli {
    /// Config file path
    #[arg(long, global = true, env = "SENTRYBOX_CONFIG")]
    config: Option<PathBuf>,

    /// Output format
    #[arg(long, default_value = "table", global = true)]
    format: output::OutputFormat,

    /// Enable verbose output
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Manage the appliance VM
    #[command(subcommand)]
    Vm(vm::VmCommands),

    /// Host setup: hypervisor detection and installation
    #[command(subcommand)]
    Setup(setup::SetupCommands),

    /// Run the local web console
    Web(web::WebArgs),

    /// Quick hypervisor + VM health summary
    Status,

    /// Show version information
    Version,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // Initialize logging
    let log_level = if cli.verbose { "debug" } else { "info" };
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(log_level)),
        )
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();

    let config_path = cli
        .config
        .unwrap_or_else(sentrybox_common::default_config_path);
    let config = LauncherConfig::load(&config_path)?;

    match cli.command {
        Commands::Vm(cmd) => vm::execute(cmd, config, cli.format).await?,
        Commands::Setup(cmd) => setup::execute(cmd, config, cli.format).await?,
        Commands::Web(args) => web::execute(args, config).await?,
        Commands::Status => {
            let p = Provisioner::new(config);
            let hypervisor = p.check_hypervisor().await;
            if hypervisor.is_success() {
                output::print_success(&hypervisor.message);
            } else {
                output::print_error(&hypervisor.message);
                std::process::exit(1);
            }
            let check = p.vm_check().await;
            println!(
                "VM {}: exists={} running={} logged_in={}",
                p.config().vm_name,
                check.exists,
                check.running,
                check.logged_in
            );
        }
        Commands::Version => {
            println!("SentryBox CLI v{}", sentrybox_common::VERSION);
            println!("Security-monitoring appliance launcher for VirtualBox");
        }
    }

    Ok(())
}
