use anyhow::Context;
use lobby::{AppState, config::Config};
use tracing::info;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let config = Config::from_env()?;
    let app = lobby::app(AppState::new(&config));

    let listener = tokio::net::TcpListener::bind(config.addr()).await
        .with_context(|| format!("couldn't bind {}", config.addr()))?;
    info!("ready on http://{}", listener.local_addr()?);

    axum::serve(listener, app).await?;
    Ok(())
}
