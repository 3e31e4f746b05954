use std::path::PathBuf;

/// Errors raised while configuring or starting the gateway.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("YAML error: {0}")]
    Yaml(#[from] serde_yaml::Error),
    #[error("Failed to read {path}: {source}")]
    ReadFile {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("Invalid value for '{key}': {message}")]
    InvalidConfig { key: String, message: String },
    #[error("Missing environment variable: {0}")]
    MissingEnvVar(String),
    #[error("Unknown LLM provider '{0}'")]
    UnknownProvider(String),
    #[error("System instruction {version} failed policy audit: {problems:?}")]
    InstructionAudit {
        version: String,
        problems: Vec<String>,
    },
    #[error("HTTP client error: {0}")]
    HttpClient(#[from] reqwest::Error),
}
