//! Web console command

use anyhow::Result;
use clap::Args;
use sentrybox_common::LauncherConfig;
use sentrybox_web::server::WebServer;
use std::net::SocketAddr;

#[derive(Args)]
pub struct WebArgs {
    /// Listen address for the console
    #[arg(long, default_value = "127.0.0.1:8080")]
    addr: SocketAddr,
}

pub async fn execute(args: WebArgs, config: LauncherConfig) -> Result<()> {
    WebServer::new(config).serve(args.addr).await
}
