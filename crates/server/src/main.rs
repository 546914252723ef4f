//! Foodrec Server - HTTP API for food cluster prediction and recommendations

use server::ServerConfig;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Pick up FOODREC_SERVER__* overrides from a local .env
    dotenvy::dotenv().ok();

    let config = ServerConfig::load()?;

    server::start_server(config).await?;

    Ok(())
}
