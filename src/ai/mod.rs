//! Generative text service
//!
//! [`TextGenerator`] is the seam between the feature code and the external
//! model. [`GeminiClient`] talks to the hosted API; [`AiService`] wraps an
//! optional generator and serves canned replies when no API key is set.

pub mod gemini;
pub mod json;
pub mod service;
pub mod sse;

#[cfg(test)]
pub mod testing;

pub use gemini::GeminiClient;
pub use json::parse_json_reply;
pub use service::AiService;
pub use sse::SseLineBuffer;

use async_trait::async_trait;
use futures_util::Stream;
use serde::{Deserialize, Serialize};
use std::pin::Pin;
use thiserror::Error;

/// Errors from the text service
#[derive(Error, Debug)]
pub enum AiError {
    #[error("AI service unavailable")]
    Unavailable,

    #[error("Request failed: {0}")]
    Request(#[from] reqwest::Error),

    #[error("Request timeout")]
    Timeout,

    #[error("API error {status}: {message}")]
    ApiError { status: u16, message: String },

    #[error("{0}")]
    RateLimited(String),

    #[error("Invalid response: {0}")]
    InvalidResponse(String),

    #[error("Stream error: {0}")]
    Stream(String),
}

pub type AiResult<T> = Result<T, AiError>;

/// Stream of reply fragments
pub type TextStream = Pin<Box<dyn Stream<Item = AiResult<String>> + Send>>;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    User,
    Model,
}

/// One conversational turn
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Turn {
    pub role: Role,
    pub text: String,
}

impl Turn {
    pub fn user(text: impl Into<String>) -> Self {
        Self {
            role: Role::User,
            text: text.into(),
        }
    }

    pub fn model(text: impl Into<String>) -> Self {
        Self {
            role: Role::Model,
            text: text.into(),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct GenerationRequest {
    pub system_instruction: Option<String>,
    pub contents: Vec<Turn>,
    /// Ask the model for `application/json`
    pub json_response: bool,
}

impl GenerationRequest {
    /// Single user prompt with no system instruction
    pub fn prompt(text: impl Into<String>) -> Self {
        Self {
            system_instruction: None,
            contents: vec![Turn::user(text)],
            json_response: false,
        }
    }

    pub fn json(mut self) -> Self {
        self.json_response = true;
        self
    }

    pub fn with_system(mut self, instruction: impl Into<String>) -> Self {
        self.system_instruction = Some(instruction.into());
        self
    }
}

#[async_trait]
pub trait TextGenerator: Send + Sync {
    fn name(&self) -> &'static str;

    async fn generate(&self, request: &GenerationRequest) -> AiResult<String>;

    async fn generate_stream(&self, request: &GenerationRequest) -> AiResult<TextStream>;
}
