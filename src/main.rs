mod api;
mod config;
mod http;
mod pages;
mod testcase;
#[cfg(test)]
mod test_support;

use crate::api::build_api;
use crate::config::Config;
use tracing::info;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let config = Config::from_env()?;
    let listener = tokio::net::TcpListener::bind(&config.bind_address).await?;
    let router = build_api(&config)?;
    info!("listening on {}", config.bind_address);
    axum::serve(listener, router).await?;
    Ok(())
}
