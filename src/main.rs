use std::net::SocketAddr;

use textmint::configuration::get_configuration;
use textmint::server::config::{build_state, configure_app};
use tracing::info;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize logging
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "textmint=info,tower_http=info".into()),
        )
        .init();

    // Load environment variables
    dotenvy::dotenv().ok();

    let settings = get_configuration()?;
    let addr: SocketAddr = format!(
        "{}:{}",
        settings.application.host, settings.application.port
    )
    .parse()?;

    let state = build_state(&settings).await;
    let app = configure_app(state);

    info!("Starting server on {}", addr);
    let listener = tokio::net::TcpListener::bind(addr).await?;
    info!("✨ Server ready:");
    info!("  🌎 http://{}", listener.local_addr()?);

    axum::serve(listener, app).await?;
    Ok(())
}
