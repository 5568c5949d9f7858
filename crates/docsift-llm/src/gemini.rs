use std::fmt;
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::error::LlmError;
use crate::http::default_client;
use crate::provider::GenerativeProvider;

pub const DEFAULT_BASE_URL: &str = "https://generativelanguage.googleapis.com";
pub const DEFAULT_MODEL: &str = "gemini-1.5-pro";
const DEFAULT_TIMEOUT: Duration = Duration::from_secs(120);

#[derive(Clone)]
pub struct GeminiProvider {
    client: reqwest::Client,
    base_url: String,
    model: String,
}

impl fmt::Debug for GeminiProvider {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("GeminiProvider")
            .field("client", &"<reqwest::Client>")
            .field("base_url", &self.base_url)
            .field("model", &self.model)
            .finish()
    }
}

impl Default for GeminiProvider {
    fn default() -> Self {
        Self::new(DEFAULT_BASE_URL, DEFAULT_MODEL, DEFAULT_TIMEOUT)
    }
}

impl GeminiProvider {
    #[must_use]
    pub fn new(base_url: impl Into<String>, model: impl Into<String>, timeout: Duration) -> Self {
        Self {
            client: default_client(timeout),
            base_url: base_url.into(),
            model: model.into(),
        }
    }

    fn endpoint(&self) -> String {
        format!(
            "{}/v1beta/models/{}:generateContent",
            self.base_url.trim_end_matches('/'),
            self.model
        )
    }

    async fn send_request(&self, prompt: &str, api_key: &str) -> Result<String, LlmError> {
        let body = RequestBody {
            contents: vec![RequestContent {
                parts: vec![RequestPart { text: prompt }],
            }],
        };

        let response = self
            .client
            .post(self.endpoint())
            .header("x-goog-api-key", api_key)
            .header("content-type", "application/json")
            .json(&body)
            .send()
            .await?;

        let status = response.status();
        let text = response.text().await.map_err(LlmError::Http)?;

        if !status.is_success() {
            tracing::error!(status = status.as_u16(), "Gemini API error: {text}");
            return Err(api_error(status.as_u16(), &text));
        }

        let resp: ApiResponse = serde_json::from_str(&text)?;
        let reply: String = resp
            .candidates
            .into_iter()
            .next()
            .and_then(|c| c.content)
            .map(|content| {
                content
                    .parts
                    .into_iter()
                    .filter_map(|p| p.text)
                    .collect::<String>()
            })
            .unwrap_or_default();

        if reply.is_empty() {
            return Err(LlmError::EmptyResponse { provider: "gemini" });
        }
        Ok(reply)
    }
}

impl GenerativeProvider for GeminiProvider {
    async fn generate(&self, prompt: &str, api_key: &str) -> Result<String, LlmError> {
        tracing::debug!(
            model = %self.model,
            prompt_chars = prompt.chars().count(),
            "sending prompt to Gemini"
        );
        self.send_request(prompt, api_key).await
    }

    fn name(&self) -> &'static str {
        "gemini"
    }
}

fn api_error(status: u16, body: &str) -> LlmError {
    let parsed = serde_json::from_str::<ApiErrorBody>(body).ok();
    let message = parsed
        .as_ref()
        .and_then(|b| b.error.message.clone())
        .unwrap_or_else(|| body.trim().to_owned());
    let api_status = parsed
        .as_ref()
        .and_then(|b| b.error.status.clone())
        .unwrap_or_default();
    let key_invalid = parsed.as_ref().is_some_and(|b| {
        b.error
            .details
            .iter()
            .any(|d| d.reason.as_deref() == Some("API_KEY_INVALID"))
    }) || message.contains("API key not valid");

    if key_invalid || status == 401 {
        LlmError::Auth(format!("Invalid API key: {message}"))
    } else if status == 429 || api_status == "RESOURCE_EXHAUSTED" {
        LlmError::Quota(format!("Quota exceeded: {message}"))
    } else {
        LlmError::Api {
            provider: "gemini",
            status,
            message,
        }
    }
}

#[derive(Serialize)]
struct RequestBody<'a> {
    contents: Vec<RequestContent<'a>>,
}

#[derive(Serialize)]
struct RequestContent<'a> {
    parts: Vec<RequestPart<'a>>,
}

#[derive(Serialize)]
struct RequestPart<'a> {
    text: &'a str,
}

#[derive(Deserialize)]
struct ApiResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
}

#[derive(Deserialize)]
struct Candidate {
    content: Option<CandidateContent>,
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
struct ApiErrorBody {
    error: ApiErrorDetail,
}

#[derive(Deserialize)]
struct ApiErrorDetail {
    message: Option<String>,
    status: Option<String>,
    #[serde(default)]
    details: Vec<ApiErrorInfo>,
}

#[derive(Deserialize)]
struct ApiErrorInfo {
    reason: Option<String>,
}
