//! Google Gemini `generateContent` client.
//!
//! Only the parts of the wire format this crate needs are modelled. Unknown
//! response fields are ignored, since the API grows new ones regularly.

use std::env;
use std::fmt;

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::service::{GenerationService, ServiceError};

pub const API_KEY_ENV: &str = "GOOGLE_API_KEY";
pub const MODEL_ENV: &str = "ENCOUNTERS_MODEL";
pub const ENDPOINT_ENV: &str = "ENCOUNTERS_ENDPOINT";

pub const DEFAULT_MODEL: &str = "gemini-pro";
pub const DEFAULT_ENDPOINT: &str = "https://generativelanguage.googleapis.com/v1beta";

/// Connection settings for the generation service.
#[derive(Clone, PartialEq, Eq)]
pub struct ClientConfig {
    /// Checked only when a call is made; absence surfaces as a call failure.
    pub api_key: Option<String>,
    pub model: String,
    pub endpoint: String,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            api_key: None,
            model: DEFAULT_MODEL.into(),
            endpoint: DEFAULT_ENDPOINT.into(),
        }
    }
}

impl ClientConfig {
    /// Read settings from the process environment, falling back to defaults.
    pub fn from_env() -> Self {
        let defaults = Self::default();
        Self {
            api_key: env::var(API_KEY_ENV).ok().filter(|k| !k.trim().is_empty()),
            model: env::var(MODEL_ENV).unwrap_or(defaults.model),
            endpoint: env::var(ENDPOINT_ENV).unwrap_or(defaults.endpoint),
        }
    }

    fn url(&self) -> String {
        format!(
            "{}/models/{}:generateContent",
            self.endpoint.trim_end_matches('/'),
            self.model
        )
    }
}

// Keeps the key out of logs.
impl fmt::Debug for ClientConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ClientConfig")
            .field("api_key", &self.api_key.as_ref().map(|_| "<redacted>"))
            .field("model", &self.model)
            .field("endpoint", &self.endpoint)
            .finish()
    }
}

#[derive(Debug, Serialize)]
struct GenerateContentRequest<'a> {
    contents: Vec<RequestContent<'a>>,
}

#[derive(Debug, Serialize)]
struct RequestContent<'a> {
    parts: Vec<RequestPart<'a>>,
}

#[derive(Debug, Serialize)]
struct RequestPart<'a> {
    text: &'a str,
}

impl<'a> GenerateContentRequest<'a> {
    fn from_prompt(prompt: &'a str) -> Self {
        Self {
            contents: vec![RequestContent {
                parts: vec![RequestPart { text: prompt }],
            }],
        }
    }
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct GenerateContentResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
    prompt_feedback: Option<PromptFeedback>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct Candidate {
    content: Option<CandidateContent>,
    finish_reason: Option<String>,
}

#[derive(Debug, Deserialize)]
struct CandidateContent {
    #[serde(default)]
    parts: Vec<ResponsePart>,
}

#[derive(Debug, Deserialize)]
struct ResponsePart {
    text: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct PromptFeedback {
    block_reason: Option<String>,
}

/// Pull the narrative out of a `generateContent` response body.
///
/// Text parts of the first candidate are concatenated. A body with no usable
/// text is an `EmptyResponse`, carrying the block or finish reason if given.
pub fn extract_text(body: &str) -> Result<String, ServiceError> {
    let response: GenerateContentResponse =
        serde_json::from_str(body).map_err(|e| ServiceError::Malformed(e.to_string()))?;

    let block_reason = response.prompt_feedback.and_then(|f| f.block_reason);
    let Some(candidate) = response.candidates.into_iter().next() else {
        return Err(ServiceError::EmptyResponse {
            reason: block_reason,
        });
    };

    let text: String = candidate
        .content
        .map(|c| c.parts.into_iter().filter_map(|p| p.text).collect())
        .unwrap_or_default();

    if text.trim().is_empty() {
        return Err(ServiceError::EmptyResponse {
            reason: block_reason.or(candidate.finish_reason),
        });
    }
    Ok(text)
}

/// Blocking HTTP client for the Gemini API.
#[derive(Clone)]
pub struct GeminiClient {
    config: ClientConfig,
    agent: ureq::Agent,
}

impl GeminiClient {
    pub fn new(config: ClientConfig) -> Self {
        Self {
            config,
            agent: ureq::AgentBuilder::new().build(),
        }
    }

    pub fn config(&self) -> &ClientConfig {
        &self.config
    }
}

impl GenerationService for GeminiClient {
    fn generate(&self, prompt: &str) -> Result<String, ServiceError> {
        let key = self
            .config
            .api_key
            .as_deref()
            .ok_or(ServiceError::MissingCredential)?;

        debug!(model = %self.config.model, prompt_len = prompt.len(), "calling generateContent");

        // Key travels as a header so it never appears in a URL or error text.
        let response = self
            .agent
            .post(&self.config.url())
            .set("x-goog-api-key", key)
            .send_json(GenerateContentRequest::from_prompt(prompt));

        match response {
            Ok(resp) => {
                let body = resp
                    .into_string()
                    .map_err(|e| ServiceError::Malformed(e.to_string()))?;
                extract_text(&body)
            }
            Err(ureq::Error::Status(status, resp)) => Err(ServiceError::Status {
                status,
                body: resp.into_string().unwrap_or_default(),
            }),
            Err(ureq::Error::Transport(t)) => Err(ServiceError::Transport(t.to_string())),
        }
    }
}
