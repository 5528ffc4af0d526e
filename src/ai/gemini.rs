//! Gemini client
//!
//! Calls `models/{model}:generateContent` for single replies and
//! `:streamGenerateContent?alt=sse` for streamed ones. The API key travels
//! as the `key` query parameter.

use super::sse::text_stream;
use super::{AiError, AiResult, GenerationRequest, Role, TextGenerator, TextStream, Turn};
use crate::config::AiConfig;
use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use std::fmt::{Debug, Formatter, Result as FmtResult};
use std::time::Duration;
use tracing::{debug, error, warn};

// ============================================
// Wire types
// ============================================

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct GeminiRequest {
    contents: Vec<GeminiContent>,
    #[serde(skip_serializing_if = "Option::is_none")]
    system_instruction: Option<GeminiContent>,
    #[serde(skip_serializing_if = "Option::is_none")]
    generation_config: Option<GenerationConfig>,
}

#[derive(Debug, Serialize, Deserialize)]
struct GeminiContent {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    role: Option<String>,
    #[serde(default)]
    parts: Vec<ContentPart>,
}

#[derive(Debug, Serialize, Deserialize)]
struct ContentPart {
    #[serde(default)]
    text: Option<String>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct GenerationConfig {
    response_mime_type: &'static str,
}

#[derive(Debug, Deserialize)]
struct GeminiResponse {
    candidates: Option<Vec<Candidate>>,
    error: Option<GeminiError>,
}

#[derive(Debug, Deserialize)]
struct Candidate {
    content: Option<GeminiContent>,
}

#[derive(Debug, Deserialize)]
struct GeminiError {
    message: String,
}

impl GeminiResponse {
    /// Concatenated text of the first candidate
    fn text(&self) -> Option<String> {
        let content = self.candidates.as_ref()?.first()?.content.as_ref()?;
        let text: String = content.parts.iter().filter_map(|p| p.text.as_deref()).collect();
        Some(text)
    }
}

// ============================================
// Client
// ============================================

pub struct GeminiClient {
    client: Client,
    api_key: String,
    model: String,
    base_url: String,
}

impl GeminiClient {
    pub fn new(api_key: impl Into<String>, config: &AiConfig) -> AiResult<Self> {
        let client = Client::builder()
            .timeout(Duration::from_millis(config.request_timeout_ms))
            .build()?;

        Ok(Self {
            client,
            api_key: api_key.into(),
            model: config.model.clone(),
            base_url: config.base_url.trim_end_matches('/').to_string(),
        })
    }

    pub fn model(&self) -> &str {
        &self.model
    }

    fn url(&self, method: &str) -> String {
        format!("{}/models/{}:{}", self.base_url, self.model, method)
    }

    fn build_request(request: &GenerationRequest) -> GeminiRequest {
        let contents = request.contents.iter().map(convert_turn).collect();
        let system_instruction = request.system_instruction.as_ref().map(|text| GeminiContent {
            role: None,
            parts: vec![ContentPart {
                text: Some(text.clone()),
            }],
        });
        let generation_config = request.json_response.then_some(GenerationConfig {
            response_mime_type: "application/json",
        });

        GeminiRequest {
            contents,
            system_instruction,
            generation_config,
        }
    }

    async fn post(&self, method: &str, request: &GenerationRequest, sse: bool) -> AiResult<reqwest::Response> {
        let mut builder = self.client.post(self.url(method)).query(&[("key", self.api_key.as_str())]);
        if sse {
            builder = builder.query(&[("alt", "sse")]);
        }

        let response = builder
            .json(&Self::build_request(request))
            .send()
            .await
            .map_err(map_request_error)?;

        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }

        let body = response.text().await.unwrap_or_default();
        error!(status = %status, "Gemini API error");
        Err(map_api_error(status.as_u16(), &body))
    }
}

fn convert_turn(turn: &Turn) -> GeminiContent {
    let role = match turn.role {
        Role::User => "user",
        Role::Model => "model",
    };
    GeminiContent {
        role: Some(role.to_string()),
        parts: vec![ContentPart {
            text: Some(turn.text.clone()),
        }],
    }
}

fn map_request_error(e: reqwest::Error) -> AiError {
    if e.is_timeout() {
        AiError::Timeout
    } else if e.is_connect() {
        AiError::Unavailable
    } else {
        AiError::Request(e)
    }
}

fn map_api_error(status: u16, body: &str) -> AiError {
    let message = serde_json::from_str::<GeminiResponse>(body)
        .ok()
        .and_then(|r| r.error)
        .map_or_else(|| body.to_string(), |e| e.message);

    match status {
        429 => AiError::RateLimited(quota_message(&message)),
        _ => AiError::ApiError { status, message },
    }
}

/// Turn "... Please retry in 6.4s." into a short user-facing hint
fn quota_message(message: &str) -> String {
    let seconds = message
        .split("Please retry in ")
        .nth(1)
        .and_then(|rest| rest.split('s').next())
        .and_then(|value| value.parse::<f64>().ok());

    match seconds {
        Some(s) => format!("AI service quota exceeded. Please try again in {} seconds.", s.ceil() as u64),
        None => "AI service quota exceeded. Please wait a moment and try again.".to_string(),
    }
}

fn parse_stream_payload(data: &str) -> Option<AiResult<String>> {
    match serde_json::from_str::<GeminiResponse>(data) {
        Ok(chunk) => {
            if let Some(err) = chunk.error {
                return Some(Err(AiError::Stream(err.message)));
            }
            chunk.text().map(Ok)
        }
        Err(e) => {
            warn!(error = %e, "Failed to parse streaming chunk");
            None
        }
    }
}

#[async_trait]
impl TextGenerator for GeminiClient {
    fn name(&self) -> &'static str {
        "gemini"
    }

    async fn generate(&self, request: &GenerationRequest) -> AiResult<String> {
        debug!(model = %self.model, "Sending request to Gemini API");
        let body = self
            .post("generateContent", request, false)
            .await?
            .text()
            .await
            .map_err(map_request_error)?;

        let response: GeminiResponse = serde_json::from_str(&body)
            .map_err(|e| AiError::InvalidResponse(format!("Failed to parse Gemini response: {}", e)))?;
        if let Some(err) = response.error {
            return Err(AiError::InvalidResponse(err.message));
        }

        response
            .text()
            .ok_or_else(|| AiError::InvalidResponse("No content in Gemini response".to_string()))
    }

    async fn generate_stream(&self, request: &GenerationRequest) -> AiResult<TextStream> {
        debug!(model = %self.model, "Starting streaming request to Gemini API");
        let response = self.post("streamGenerateContent", request, true).await?;
        Ok(text_stream(response.bytes_stream(), parse_stream_payload))
    }
}

impl Debug for GeminiClient {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        f.debug_struct("GeminiClient")
            .field("model", &self.model)
            .field("base_url", &self.base_url)
            .field("api_key", &"[REDACTED]")
            .finish_non_exhaustive()
    }
}
