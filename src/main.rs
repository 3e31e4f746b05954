//! Main entry point for the application.
//!
//! Initializes logging, loads environment variables, then either serves the
//! question-answering gateway or runs the terminal chat client.

use clap::Parser;
use samvad::cli::{Cli, Command};
use samvad::client::repl::{run_chat, ChatOptions};
use samvad::{api, config, utils};
use std::process::ExitCode;
use tracing::{error, warn};

#[tokio::main]
async fn main() -> ExitCode {
    // Loaded before parsing so `.env` can supply CLI defaults.
    let dotenv = dotenvy::dotenv();
    let cli = Cli::parse();
    let serving = matches!(cli.command, Command::Serve { .. });
    utils::init_logging(&cli.logging_level, serving);

    if let Err(e) = dotenv {
        warn!("Failed to load .env file: {}", e);
    }

    match cli.command {
        Command::Serve { config, port } => {
            let mut gateway_config = match config::load_gateway_config(config.as_deref()) {
                Ok(c) => c,
                Err(e) => {
                    error!("Invalid gateway configuration: {}", e);
                    return ExitCode::FAILURE;
                }
            };
            if let Some(port) = port {
                gateway_config.port = port;
            }
            if let Err(e) = api::server::launch_server(gateway_config).await {
                error!("Gateway stopped: {}", e);
                return ExitCode::FAILURE;
            }
        }
        Command::Chat {
            gateway_url,
            lang,
            mute,
            no_speech,
        } => {
            let options = ChatOptions {
                gateway_url,
                language: lang,
                muted: mute,
                speech: !no_speech,
            };
            if let Err(e) = run_chat(options).await {
                error!("Chat client failed: {}", e);
                return ExitCode::FAILURE;
            }
        }
    }

    ExitCode::SUCCESS
}
