use std::time::Duration;

use async_trait::async_trait;
use reqwest::StatusCode;
use serde::Deserialize;
use tracing::{debug, warn};

use crate::application::CompletionClient;
use crate::domain::{CompletionReply, DomainError};

pub const DEFAULT_BASE_URL: &str = "https://generativelanguage.googleapis.com";
pub const DEFAULT_MODEL: &str = "gemini-1.5-flash";
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(60);
const API_VERSION_PATH: &str = "/v1beta/models";
const API_KEY_HEADER: &str = "x-goog-api-key";

#[derive(serde::Serialize)]
struct ApiRequest<'a> {
    contents: Vec<ApiContent<'a>>,
}

#[derive(serde::Serialize)]
struct ApiContent<'a> {
    role: &'a str,
    parts: Vec<ApiPart<'a>>,
}

#[derive(serde::Serialize)]
struct ApiPart<'a> {
    text: &'a str,
}

/// Subset of the `generateContent` response we read.
#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct ApiResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
    prompt_feedback: Option<PromptFeedback>,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct Candidate {
    content: Option<CandidateContent>,
    finish_reason: Option<String>,
}

#[derive(Deserialize)]
struct CandidateContent {
    #[serde(default)]
    parts: Vec<CandidatePart>,
}

#[derive(Deserialize)]
struct CandidatePart {
    text: Option<String>,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct PromptFeedback {
    block_reason: Option<String>,
}

#[derive(Deserialize)]
struct ApiErrorBody {
    error: ApiErrorDetail,
}

#[derive(Deserialize)]
struct ApiErrorDetail {
    message: String,
}

/// HTTP client for the Gemini `generateContent` endpoint.
///
/// The API key travels in the `x-goog-api-key` header rather than the query
/// string so it never shows up in transport error messages.
///
/// ```text
/// GEMINI_API_KEY=...                     (required)
/// GEMINI_MODEL=gemini-1.5-flash          (optional)
/// GEMINI_BASE_URL=https://generativelanguage.googleapis.com   (optional)
/// ```
pub struct GeminiClient {
    client: reqwest::Client,
    api_key: String,
    model: String,
    base_url: String,
}

impl GeminiClient {
    pub fn new(
        api_key: impl Into<String>,
        model: impl Into<String>,
        base_url: impl Into<String>,
    ) -> Self {
        let base: String = base_url.into();
        Self {
            client: build_http_client(DEFAULT_TIMEOUT),
            api_key: api_key.into(),
            model: normalize_model(model.into()),
            base_url: base.trim_end_matches('/').to_string(),
        }
    }

    /// Construct from `GEMINI_API_KEY`, `GEMINI_MODEL` and `GEMINI_BASE_URL`.
    pub fn from_env() -> Result<Self, DomainError> {
        let key = std::env::var("GEMINI_API_KEY")
            .ok()
            .filter(|k| !k.trim().is_empty())
            .ok_or_else(|| DomainError::configuration("GEMINI_API_KEY is not set"))?;
        let model = std::env::var("GEMINI_MODEL").unwrap_or_else(|_| DEFAULT_MODEL.to_string());
        let base =
            std::env::var("GEMINI_BASE_URL").unwrap_or_else(|_| DEFAULT_BASE_URL.to_string());
        Ok(Self::new(key, model, base))
    }

    pub fn with_model(mut self, model: impl Into<String>) -> Self {
        self.model = normalize_model(model.into());
        self
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.client = build_http_client(timeout);
        self
    }

    pub fn model(&self) -> &str {
        &self.model
    }

    pub fn endpoint(&self) -> String {
        format!(
            "{}{API_VERSION_PATH}/{}:generateContent",
            self.base_url, self.model
        )
    }
}

fn build_http_client(timeout: Duration) -> reqwest::Client {
    reqwest::Client::builder()
        .timeout(timeout)
        .build()
        .unwrap_or_default()
}

/// Accept both `gemini-1.5-flash` and the resource form `models/gemini-1.5-flash`.
fn normalize_model(model: String) -> String {
    match model.strip_prefix("models/") {
        Some(rest) => rest.to_string(),
        None => model,
    }
}

fn interpret_response(response: ApiResponse) -> CompletionReply {
    let Some(candidate) = response.candidates.into_iter().next() else {
        let reason = response
            .prompt_feedback
            .and_then(|f| f.block_reason)
            .unwrap_or_else(|| "no candidates".to_string());
        return CompletionReply::Unexpected(reason);
    };

    let Some(content) = candidate.content else {
        return CompletionReply::Unexpected(
            candidate
                .finish_reason
                .unwrap_or_else(|| "candidate without content".to_string()),
        );
    };

    let text: String = content
        .parts
        .into_iter()
        .filter_map(|p| p.text)
        .collect();
    CompletionReply::from_text(text)
}

/// Timeouts surface as the bare word `timeout`, whether they fire while
/// connecting or while the body is still arriving.
fn transport_error(e: reqwest::Error) -> DomainError {
    if e.is_timeout() {
        DomainError::completion("timeout")
    } else {
        DomainError::completion(e.to_string())
    }
}

fn error_message(status: StatusCode, body: &str) -> String {
    serde_json::from_str::<ApiErrorBody>(body)
        .map(|b| b.error.message)
        .ok()
        .filter(|m| !m.trim().is_empty())
        .unwrap_or_else(|| format!("API returned {status}"))
}

#[async_trait]
impl CompletionClient for GeminiClient {
    async fn complete(&self, prompt: &str) -> Result<CompletionReply, DomainError> {
        let request = ApiRequest {
            contents: vec![ApiContent {
                role: "user",
                parts: vec![ApiPart { text: prompt }],
            }],
        };

        debug!("GeminiClient: sending prompt to model {}", self.model);

        let response = self
            .client
            .post(self.endpoint())
            .header(API_KEY_HEADER, &self.api_key)
            .json(&request)
            .send()
            .await
            .map_err(transport_error)?;

        let status = response.status();
        let body = response.bytes().await.map_err(transport_error)?;

        if !status.is_success() {
            let body = String::from_utf8_lossy(&body);
            warn!("GeminiClient: API returned {status}: {body}");
            return Err(DomainError::completion(error_message(status, &body)));
        }

        let api_response: ApiResponse = serde_json::from_slice(&body)
            .map_err(|e| DomainError::completion(format!("failed to parse response: {e}")))?;

        Ok(interpret_response(api_response))
    }
}
