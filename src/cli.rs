use crate::client::Language;
use crate::constants::DEFAULT_GATEWAY_URL;
use clap::{Parser, Subcommand};

/// Health assistant gateway and terminal chat client
#[derive(Parser)]
#[command(name = "samvad", version)]
pub struct Cli {
    /// Sets the logging verbosity level for the application
    /// Possible values: "error", "warn", "info", "debug", "trace"
    /// Default: "info"
    #[arg(long, global = true, default_value_t = String::from("info"))]
    pub logging_level: String,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand)]
pub enum Command {
    /// Run the question-answering gateway
    Serve {
        /// YAML file with gateway settings; environment variables override it
        #[arg(short, long)]
        config: Option<String>,

        /// Port to listen on, overriding PORT and the config file
        #[arg(short, long)]
        port: Option<u16>,
    },
    /// Chat with the assistant from the terminal
    Chat {
        /// Base URL of the gateway
        #[arg(long, env = "SAMVAD_GATEWAY_URL", default_value = DEFAULT_GATEWAY_URL)]
        gateway_url: String,

        /// Language tag for questions and speech (hi-IN, te-IN, mr-IN, kn-IN, en-IN)
        #[arg(short, long, default_value_t = Language::Hindi)]
        lang: Language,

        /// Do not read replies aloud
        #[arg(long)]
        mute: bool,

        /// Disable speech output entirely
        #[arg(long)]
        no_speech: bool,
    },
}
