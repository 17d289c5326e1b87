use std::net::SocketAddr;
use std::path::PathBuf;

use tracing::info;

use sentrybox_common::LauncherConfig;
use sentrybox_web::server::WebServer;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let addr: SocketAddr = std::env::var("SENTRYBOX_WEB_ADDR")
        .unwrap_or_else(|_| "127.0.0.1:8080".to_string())
        .parse()?;

    let config_path = std::env::var("SENTRYBOX_CONFIG")
        .map(PathBuf::from)
        .unwrap_or_else(|_| sentrybox_common::default_config_path());
    let config = LauncherConfig::load(&config_path)?;

    info!(
        "Starting SentryBox console on http://{} (VM: {})",
        addr, config.vm_name
    );

    WebServer::new(config).serve(addr).await
}
