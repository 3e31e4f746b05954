mod parser;

use crate::llm::RetryPolicy;
use serde::Deserialize;
use std::path::PathBuf;
use url::Url;

pub use parser::{load_gateway_config, resolve_gateway_config};

/// Settings read from the optional YAML file. Every field can be
/// overridden by the matching environment variable.
#[derive(Debug, Deserialize, Default, Clone)]
#[serde(deny_unknown_fields)]
pub struct FileConfig {
    /// Port to listen on (`PORT`)
    #[serde(default)]
    pub port: Option<u16>,
    /// Upstream settings
    #[serde(default)]
    pub llm: FileLlmConfig,
    /// Path to a system instruction YAML replacing the embedded one
    /// (`SYSTEM_INSTRUCTION_PATH`)
    #[serde(default)]
    pub system_instruction_path: Option<PathBuf>,
}

/// Upstream section of the YAML file.
#[derive(Debug, Deserialize, Default, Clone)]
#[serde(deny_unknown_fields)]
pub struct FileLlmConfig {
    /// `gemini`, `openai` or `anthropic` (`LLM_PROVIDER`)
    #[serde(default)]
    pub provider: Option<String>,
    /// (`LLM_MODEL`)
    #[serde(default)]
    pub model: Option<String>,
    /// (`LLM_BASE_URL`)
    #[serde(default)]
    pub base_url: Option<String>,
    /// Per-attempt deadline, humantime syntax such as `45s` (`UPSTREAM_TIMEOUT`)
    #[serde(default)]
    pub timeout: Option<String>,
    /// (`UPSTREAM_MAX_ATTEMPTS`)
    #[serde(default)]
    pub max_attempts: Option<u32>,
    /// First retry delay, humantime syntax (`UPSTREAM_RETRY_BACKOFF`)
    #[serde(default)]
    pub retry_backoff: Option<String>,
}

/// Fully resolved gateway configuration.
#[derive(Debug, Clone)]
pub struct GatewayConfig {
    pub port: u16,
    pub llm: LlmConfig,
    pub system_instruction_path: Option<PathBuf>,
}

/// Fully resolved upstream configuration.
#[derive(Debug, Clone)]
pub struct LlmConfig {
    pub provider: String,
    pub model: String,
    pub api_key: String,
    pub base_url: Option<Url>,
    pub retry: RetryPolicy,
}

/// Name of the environment variable holding the API key for a provider.
pub fn api_key_var(provider: &str) -> Option<&'static str> {
    match provider {
        "gemini" => Some("GEMINI_API_KEY"),
        "openai" => Some("OPENAI_API_KEY"),
        "anthropic" => Some("ANTHROPIC_API_KEY"),
        _ => None,
    }
}
