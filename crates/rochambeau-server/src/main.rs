use rochambeau::prelude::*;
use tracing_subscriber::EnvFilter;

// ---------------------------------------------------------------------------
// Server bootstrap
// ---------------------------------------------------------------------------

fn init_tracing() {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();
}

async fn build_server(
    config: ServerConfig,
) -> Result<RochambeauServer, RochambeauError> {
    RochambeauServer::builder().config(config).build().await
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    init_tracing();

    let config = ServerConfig::from_env()?;
    let server = build_server(config).await?;
    tracing::info!(addr = %server.local_addr()?, "listening");

    server.run().await?;
    Ok(())
}
