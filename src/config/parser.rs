use super::{api_key_var, FileConfig, GatewayConfig, LlmConfig};
use crate::constants::*;
use crate::errors::Error;
use crate::llm::RetryPolicy;
use std::fs;
use std::path::PathBuf;
use std::str::FromStr;
use std::time::Duration;
use tracing::info;
use url::Url;

/// Loads the gateway configuration from an optional YAML file and the
/// process environment.
///
/// # Arguments
///
/// * `file_path` - Optional path to a YAML configuration file
///
/// # Errors
///
/// Returns an error if:
/// * The file cannot be read or parsed
/// * A value (port, duration, URL, provider) is invalid
/// * The API key for the selected provider is missing
pub fn load_gateway_config(file_path: Option<&str>) -> Result<GatewayConfig, Error> {
    let file = match file_path {
        Some(path) => {
            let yaml_str = fs::read_to_string(path).map_err(|source| Error::ReadFile {
                path: PathBuf::from(path),
                source,
            })?;
            let file: FileConfig = serde_yaml::from_str(&yaml_str)?;
            info!("Loaded gateway configuration from {}", path);
            file
        }
        None => FileConfig::default(),
    };

    resolve_gateway_config(file, |key| std::env::var(key).ok())
}

/// Merges file settings with variables from `env`, which take precedence,
/// and fills in defaults.
pub fn resolve_gateway_config<F>(file: FileConfig, lookup: F) -> Result<GatewayConfig, Error>
where
    F: Fn(&str) -> Option<String>,
{
    let env = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

    let port = match env("PORT") {
        Some(raw) => parse_value::<u16>("PORT", &raw)?,
        None => file.port.unwrap_or(DEFAULT_PORT),
    };

    let provider = env("LLM_PROVIDER")
        .or(file.llm.provider)
        .unwrap_or_else(|| DEFAULT_LLM_PROVIDER.to_string())
        .to_lowercase();
    let key_var = api_key_var(&provider).ok_or_else(|| Error::UnknownProvider(provider.clone()))?;
    let api_key = env(key_var).ok_or_else(|| Error::MissingEnvVar(key_var.to_string()))?;

    let model = env("LLM_MODEL")
        .or(file.llm.model)
        .unwrap_or_else(|| default_model(&provider).to_string());

    let base_url = match env("LLM_BASE_URL").or(file.llm.base_url) {
        Some(raw) => Some(Url::parse(&raw).map_err(|e| Error::InvalidConfig {
            key: "LLM_BASE_URL".to_string(),
            message: e.to_string(),
        })?),
        None => None,
    };

    let timeout = parse_duration(
        "UPSTREAM_TIMEOUT",
        &env("UPSTREAM_TIMEOUT")
            .or(file.llm.timeout)
            .unwrap_or_else(|| DEFAULT_UPSTREAM_TIMEOUT.to_string()),
    )?;
    let backoff = parse_duration(
        "UPSTREAM_RETRY_BACKOFF",
        &env("UPSTREAM_RETRY_BACKOFF")
            .or(file.llm.retry_backoff)
            .unwrap_or_else(|| DEFAULT_UPSTREAM_RETRY_BACKOFF.to_string()),
    )?;
    let max_attempts = match env("UPSTREAM_MAX_ATTEMPTS") {
        Some(raw) => parse_value::<u32>("UPSTREAM_MAX_ATTEMPTS", &raw)?,
        None => file
            .llm
            .max_attempts
            .unwrap_or(DEFAULT_UPSTREAM_MAX_ATTEMPTS),
    };
    if max_attempts == 0 {
        return Err(Error::InvalidConfig {
            key: "UPSTREAM_MAX_ATTEMPTS".to_string(),
            message: "must be at least 1".to_string(),
        });
    }

    let system_instruction_path = env("SYSTEM_INSTRUCTION_PATH")
        .map(PathBuf::from)
        .or(file.system_instruction_path);

    Ok(GatewayConfig {
        port,
        llm: LlmConfig {
            provider,
            model,
            api_key,
            base_url,
            retry: RetryPolicy::new(max_attempts, timeout, backoff),
        },
        system_instruction_path,
    })
}

fn default_model(provider: &str) -> &'static str {
    match provider {
        "openai" => DEFAULT_OPENAI_MODEL,
        "anthropic" => DEFAULT_ANTHROPIC_MODEL,
        _ => DEFAULT_GEMINI_MODEL,
    }
}

fn parse_value<T>(key: &str, raw: &str) -> Result<T, Error>
where
    T: FromStr,
    T::Err: std::fmt::Display,
{
    raw.trim().parse::<T>().map_err(|e| Error::InvalidConfig {
        key: key.to_string(),
        message: e.to_string(),
    })
}

fn parse_duration(key: &str, raw: &str) -> Result<Duration, Error> {
    humantime::parse_duration(raw.trim()).map_err(|e| Error::InvalidConfig {
        key: key.to_string(),
        message: e.to_string(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn env_of(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn defaults_need_only_the_gemini_key() {
        let config =
            resolve_gateway_config(FileConfig::default(), env_of(&[("GEMINI_API_KEY", "k")]))
                .unwrap();
        assert_eq!(config.port, 5000);
        assert_eq!(config.llm.provider, "gemini");
        assert_eq!(config.llm.model, "gemini-2.5-flash");
        assert_eq!(config.llm.api_key, "k");
        assert!(config.llm.base_url.is_none());
        assert_eq!(config.llm.retry.max_attempts, 1);
        assert_eq!(config.llm.retry.timeout, Duration::from_secs(60));
        assert_eq!(config.llm.retry.initial_delay, Duration::from_millis(500));
        assert!(config.system_instruction_path.is_none());
    }

    #[test]
    fn missing_key_is_reported_by_name() {
        let err = resolve_gateway_config(FileConfig::default(), env_of(&[])).unwrap_err();
        assert!(matches!(err, Error::MissingEnvVar(var) if var == "GEMINI_API_KEY"));
    }

    #[test]
    fn blank_variables_count_as_unset() {
        let config = resolve_gateway_config(
            FileConfig::default(),
            env_of(&[("GEMINI_API_KEY", "k"), ("PORT", "  ")]),
        )
        .unwrap();
        assert_eq!(config.port, 5000);
    }

    #[test]
    fn environment_overrides_file() {
        let file: FileConfig = serde_yaml::from_str(
            "port: 8080\n\
             llm:\n  provider: openai\n  model: from-file\n  timeout: 10s\n  max_attempts: 2\n",
        )
        .unwrap();
        let config = resolve_gateway_config(
            file,
            env_of(&[
                ("OPENAI_API_KEY", "ok"),
                ("PORT", "9000"),
                ("UPSTREAM_TIMEOUT", "1m 30s"),
            ]),
        )
        .unwrap();
        assert_eq!(config.port, 9000);
        assert_eq!(config.llm.provider, "openai");
        assert_eq!(config.llm.model, "from-file");
        assert_eq!(config.llm.retry.timeout, Duration::from_secs(90));
        assert_eq!(config.llm.retry.max_attempts, 2);
    }

    #[test]
    fn invalid_values_name_their_key() {
        for (key, value) in [
            ("PORT", "not-a-port"),
            ("UPSTREAM_TIMEOUT", "soon"),
            ("LLM_BASE_URL", "::nope"),
            ("UPSTREAM_MAX_ATTEMPTS", "0"),
        ] {
            let err = resolve_gateway_config(
                FileConfig::default(),
                env_of(&[("GEMINI_API_KEY", "k"), (key, value)]),
            )
            .unwrap_err();
            assert!(
                matches!(&err, Error::InvalidConfig { key: k, .. } if k == key),
                "{key}: {err}"
            );
        }
    }

    #[test]
    fn unknown_provider_fails() {
        let err = resolve_gateway_config(
            FileConfig::default(),
            env_of(&[("LLM_PROVIDER", "mystery")]),
        )
        .unwrap_err();
        assert!(matches!(err, Error::UnknownProvider(p) if p == "mystery"));
    }

    #[test]
    fn unknown_file_keys_are_rejected() {
        let parsed: Result<FileConfig, _> = serde_yaml::from_str("prot: 1\n");
        assert!(parsed.is_err());
    }

    #[test]
    fn file_base_url_is_parsed() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("gateway.yaml");
        fs::write(&path, "llm:\n  base_url: http://127.0.0.1:9/\n").unwrap();
        let file: FileConfig =
            serde_yaml::from_str(&fs::read_to_string(&path).unwrap()).unwrap();
        let config = resolve_gateway_config(file, env_of(&[("GEMINI_API_KEY", "k")])).unwrap();
        assert_eq!(
            config.llm.base_url.unwrap().as_str(),
            "http://127.0.0.1:9/"
        );
    }

    #[test]
    fn load_reports_missing_file() {
        let err = load_gateway_config(Some("/nonexistent/gateway.yaml")).unwrap_err();
        assert!(matches!(err, Error::ReadFile { .. }));
    }
}
