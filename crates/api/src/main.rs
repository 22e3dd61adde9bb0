use anyhow::{Context, Result};
use waypoint_api::{build_app_with_config, RuntimeConfig};
use waypoint_observability::init_tracing;

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();
    init_tracing("waypoint_api");

    let config = RuntimeConfig::from_env();
    let bind = config.bind.clone();
    let model = config.ollama.model.clone();
    let maps_key_configured = config.maps.api_key.is_some();

    let app = build_app_with_config(config).await?;

    let listener = tokio::net::TcpListener::bind(&bind)
        .await
        .with_context(|| format!("failed to bind {bind}"))?;
    tracing::info!(bind = %bind, model = %model, maps_key_configured, "waypoint api started");

    axum::serve(listener, app).await?;
    Ok(())
}
