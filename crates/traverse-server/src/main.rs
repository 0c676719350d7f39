mod app;
mod config;
mod handlers;
mod request;

use anyhow::{Context, Result};
use tracing::info;

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();
    tracing_subscriber::fmt::init();

    let config = app::load_config("traverse.toml")?;

    let app = app::build_app(&config)?;

    let addr = config.addr();
    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .with_context(|| format!("Failed to bind {}", addr))?;

    info!("traverse-server listening on http://{}", addr);
    axum::serve(listener, app).await?;
    Ok(())
}
