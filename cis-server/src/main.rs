use std::sync::Arc;

use cis_core::Simulator;
use cis_server::{ServerConfig, run_server};
use tracing::info;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt().init();

    let mode = std::env::var("INDUSTRY_MODE").unwrap_or_else(|_| cis_config::DEFAULT_MODE.to_string());
    let config_dir = std::env::var("CONFIG_DIR").unwrap_or_else(|_| "config".to_string());
    info!("loading rule configuration from {config_dir} (mode: {mode})");

    let rules = cis_config::load_rule_store(&config_dir, &mode)?;
    let simulator = Arc::new(Simulator::new(Arc::new(rules)));

    let mut server = ServerConfig::default();
    if let Ok(host) = std::env::var("CIS_HOST") {
        server.host = host;
    }
    if let Ok(port) = std::env::var("CIS_PORT") {
        server.port = port.parse()?;
    }

    run_server(server, simulator).await
}
