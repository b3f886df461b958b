use anyhow::Result;

use tender_ledger::{app, config, logging};

#[tokio::main]
async fn main() -> Result<()> {
    // Load environment variables
    dotenvy::dotenv().ok();

    // Load configuration
    let settings = config::Settings::from_env()?;

    // Initialize logging
    logging::init_logging(&settings.env)?;

    tracing::info!(
        env = ?settings.env,
        server_addr = %settings.server_addr,
        government_org = %settings.government_org_id,
        "Starting tender ledger network"
    );

    // Create application state (peers, contract and token verifier)
    let state = app::AppState::from_settings(settings.clone());

    // Build application
    let app = app::create_app(state);

    // Start server
    let listener = tokio::net::TcpListener::bind(&settings.server_addr).await?;
    tracing::info!("Listening on {}", settings.server_addr);

    axum::serve(listener, app).await?;

    Ok(())
}
