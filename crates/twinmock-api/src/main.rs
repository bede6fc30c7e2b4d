use clap::Parser;
use twinmock_api::{server, ServerConfig};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let config = ServerConfig::parse();

    tracing_subscriber::fmt()
        .with_env_filter(config.log_filter())
        .init();

    if let Err(e) = server::run(config).await {
        tracing::error!("{e:#}");
        return Err(e);
    }
    Ok(())
}
