/// Port the gateway listens on when neither the config file nor `PORT` sets one.
pub const DEFAULT_PORT: u16 = 5000;

pub const DEFAULT_LLM_PROVIDER: &str = "gemini";

/// Default model per provider, used when `LLM_MODEL` is absent.
pub const DEFAULT_GEMINI_MODEL: &str = "gemini-2.5-flash";
pub const DEFAULT_OPENAI_MODEL: &str = "gpt-4o-mini";
pub const DEFAULT_ANTHROPIC_MODEL: &str = "claude-3-5-haiku-latest";

pub const GEMINI_BASE_URL: &str = "https://generativelanguage.googleapis.com";
pub const OPENAI_BASE_URL: &str = "https://api.openai.com";
pub const ANTHROPIC_BASE_URL: &str = "https://api.anthropic.com";

pub const DEFAULT_UPSTREAM_TIMEOUT: &str = "60s";
/// A single attempt: upstream failures are not retried unless configured.
pub const DEFAULT_UPSTREAM_MAX_ATTEMPTS: u32 = 1;
pub const DEFAULT_UPSTREAM_RETRY_BACKOFF: &str = "500ms";
pub const MAX_UPSTREAM_RETRY_DELAY_SECS: u64 = 30;

/// Separator between the system instruction and the user's question.
pub const USER_QUESTION_PREFIX: &str = "\n\nUser question: ";

pub const QUERY_REQUIRED_MESSAGE: &str = "Query is required";
pub const INVALID_BODY_MESSAGE: &str = "Invalid request body";
pub const UPSTREAM_FAILURE_MESSAGE: &str = "Failed to generate content";

pub const DEFAULT_GATEWAY_URL: &str = "http://localhost:5000";

/// Shown when the gateway answered but carried no usable reply.
pub const FALLBACK_REPLY: &str = "Sorry, I didn’t understand that.";
/// Shown when the gateway could not be reached or its answer could not be read.
pub const CONNECTION_ERROR_REPLY: &str = "⚠️ Connection error. Please try again.";

pub const SPEECH_RATE: f32 = 1.0;
pub const SPEECH_PITCH: f32 = 1.0;

pub const LOG_DIRECTORY: &str = "logs";
pub const LOG_FILE_NAME: &str = "samvad.log";
