use crate::api::handlers::GatewayState;
use crate::api::routes;
use crate::config::GatewayConfig;
use crate::errors::Error;
use crate::instruction::SystemInstruction;
use crate::llm::LlmClient;
use std::net::SocketAddr;
use tracing::{info, warn};

/// Builds the shared gateway state from configuration.
///
/// The system instruction must pass its policy audit; otherwise the gateway
/// refuses to start.
pub fn build_state(config: &GatewayConfig) -> Result<GatewayState, Error> {
    let instruction = match &config.system_instruction_path {
        Some(path) => SystemInstruction::from_file(path)?,
        None => SystemInstruction::embedded()?,
    }
    .ensure_audited()?;

    let llm = LlmClient::from_config(&config.llm)?;
    info!(
        "Using provider {} (model {}), instruction {}, {} attempt(s) with {:?} timeout",
        llm.provider_name(),
        config.llm.model,
        instruction.version,
        llm.policy().max_attempts,
        llm.policy().timeout
    );

    Ok(GatewayState::new(llm, instruction))
}

/// Starts and runs the HTTP server using Axum web framework
///
/// Serves until Ctrl-C is received.
///
/// # Arguments
/// * `config` - Resolved gateway configuration
///
/// # Returns
/// * `Result<(), Error>` - Ok after a clean shutdown, Error if startup or serving fails
pub async fn launch_server(config: GatewayConfig) -> Result<(), Error> {
    let state = build_state(&config)?;
    let app = routes::app(state);

    let addr = SocketAddr::from(([0, 0, 0, 0], config.port));
    let listener = tokio::net::TcpListener::bind(addr).await?;
    info!("Gateway listening on http://{}", listener.local_addr()?);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        warn!("Failed to listen for shutdown signal: {}", e);
        std::future::pending::<()>().await;
    }
    info!("Shutting down gateway");
}
