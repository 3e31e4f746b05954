use crate::api::errors::ApiError;
use crate::instruction::SystemInstruction;
use crate::llm::LlmClient;
use axum::extract::rejection::JsonRejection;
use axum::{extract::Extension, Json};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::{debug, error, info, warn};
use uuid::Uuid;

/// Read-only state shared by every request.
#[derive(Clone)]
pub struct GatewayState {
    pub llm: Arc<LlmClient>,
    pub instruction: Arc<SystemInstruction>,
}

impl GatewayState {
    pub fn new(llm: LlmClient, instruction: SystemInstruction) -> Self {
        Self {
            llm: Arc::new(llm),
            instruction: Arc::new(instruction),
        }
    }
}

/// Question sent by the client
#[derive(Debug, Deserialize)]
pub struct AskRequest {
    #[serde(default)]
    pub query: Option<String>,
    /// Locale tag of the asker; logged only
    #[serde(default)]
    pub lang: Option<String>,
}

/// Successful answer, upstream text as received
#[derive(Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct AskResponse {
    pub reply: String,
}

#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
    pub provider: &'static str,
    pub instruction_version: String,
}

/// Answers one health question.
///
/// Blank queries are rejected before any upstream call. The upstream text is
/// returned verbatim; every upstream failure collapses into the same generic
/// error.
pub async fn ask(
    Extension(state): Extension<GatewayState>,
    payload: Result<Json<AskRequest>, JsonRejection>,
) -> Result<Json<AskResponse>, ApiError> {
    let request_id = Uuid::new_v4();

    let Json(payload) = payload.map_err(|e| {
        warn!(%request_id, "Rejected request body: {}", e);
        ApiError::invalid_body()
    })?;

    let query = match payload.query {
        Some(query) if !query.trim().is_empty() => query,
        _ => {
            info!(%request_id, "Rejected request without query");
            return Err(ApiError::query_required());
        }
    };
    let lang = payload.lang.unwrap_or_default();

    info!(%request_id, lang = %lang, chars = query.chars().count(), "Received question");
    debug!(%request_id, "Question: {}", query);

    let prompt = state.instruction.build_prompt(&query);
    match state.llm.generate(&prompt).await {
        Ok(reply) => {
            debug!(%request_id, "Reply: {}", reply);
            Ok(Json(AskResponse { reply }))
        }
        Err(e) => {
            error!(
                %request_id,
                provider = state.llm.provider_name(),
                "Upstream call failed: {}",
                e
            );
            Err(ApiError::upstream())
        }
    }
}

pub async fn health(Extension(state): Extension<GatewayState>) -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok",
        provider: state.llm.provider_name(),
        instruction_version: state.instruction.version.clone(),
    })
}
