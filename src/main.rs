use std::sync::Arc;

use tracing_subscriber::EnvFilter;

use billing_gateway::config::{self, AppConfig};
use billing_gateway::handlers;
use billing_gateway::services::ai::ollama::OllamaProvider;
use billing_gateway::services::billing::http::HttpBillingBackend;
use billing_gateway::state::AppState;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let _ = dotenvy::dotenv();

    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| "info".into()))
        .init();

    let config = AppConfig::from_env();
    let client = config::http_client(config.upstream_timeout)?;

    tracing::info!(
        "using Ollama at {} (model: {})",
        config.ollama_url,
        config.ollama_model
    );
    tracing::info!("billing API at {}", config.billing_api_url);

    let llm = OllamaProvider::new(
        config.ollama_url.clone(),
        config.ollama_model.clone(),
        client.clone(),
    );
    let billing = HttpBillingBackend::new(config.billing_api_url.clone(), client);

    let state = Arc::new(AppState {
        llm: Box::new(llm),
        billing: Box::new(billing),
    });

    let app = handlers::router(state);

    let addr = format!("0.0.0.0:{}", config.port);
    tracing::info!("API gateway listening on {addr}");

    let listener = tokio::net::TcpListener::bind(&addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
