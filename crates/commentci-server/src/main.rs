//! Comment CI webhook server

use commentci_config::{CommentCiConfig, load_config};
use commentci_github::GitHubClient;
use commentci_server::{AppState, routes};
use std::path::Path;
use std::sync::Arc;
use tokio::net::TcpListener;
use tower_http::trace::TraceLayer;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let config_path =
        std::env::var("COMMENTCI_CONFIG").unwrap_or_else(|_| "commentci.kdl".to_string());

    let config = if Path::new(&config_path).exists() {
        info!(path = %config_path, "Loading configuration");
        load_config(&config_path)?
    } else {
        warn!(path = %config_path, "Configuration file not found, using defaults");
        CommentCiConfig::default()
    };

    let token = std::env::var(&config.github.token_env).ok();
    if token.is_none() {
        warn!(
            env = %config.github.token_env,
            "No GitHub token set, collaborator lookups will be unauthenticated"
        );
    }

    let client = GitHubClient::new(config.github.api_url.as_str(), token)?;
    let state = AppState::new(
        Arc::new(client),
        config.registry.on_stop,
        config.registry.history_limit,
    );

    for job in config.jobs {
        state.lifecycle.start(job)?;
    }
    info!(jobs = state.registry.len(), "Registered configured jobs");

    let app = routes::router(state).layer(TraceLayer::new_for_http());

    let addr = config.server.listen;
    info!("Starting server on {}", addr);

    let listener = TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
