//! Scripted generator for tests

use super::{AiError, AiResult, GenerationRequest, TextGenerator, TextStream};
use async_trait::async_trait;
use std::collections::VecDeque;
use std::sync::Mutex;

enum Script {
    Reply(String),
    Fail,
    /// Streams the text, then a transport error
    Broken(String),
}

/// Returns queued replies in order and records every request
#[derive(Default)]
pub struct ScriptedGenerator {
    script: Mutex<VecDeque<Script>>,
    requests: Mutex<Vec<GenerationRequest>>,
}

impl ScriptedGenerator {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn reply(self, text: impl Into<String>) -> Self {
        self.push(Script::Reply(text.into()))
    }

    pub fn fail(self) -> Self {
        self.push(Script::Fail)
    }

    pub fn broken_stream(self, text: impl Into<String>) -> Self {
        self.push(Script::Broken(text.into()))
    }

    fn push(self, step: Script) -> Self {
        if let Ok(mut script) = self.script.lock() {
            script.push_back(step);
        }
        self
    }

    pub fn requests(&self) -> Vec<GenerationRequest> {
        self.requests.lock().map(|r| r.clone()).unwrap_or_default()
    }

    fn next(&self, request: &GenerationRequest) -> Script {
        if let Ok(mut requests) = self.requests.lock() {
            requests.push(request.clone());
        }
        self.script
            .lock()
            .ok()
            .and_then(|mut s| s.pop_front())
            .unwrap_or(Script::Fail)
    }
}

fn words(text: &str) -> Vec<AiResult<String>> {
    text.split_inclusive(' ').map(|w| Ok(w.to_string())).collect()
}

#[async_trait]
impl TextGenerator for ScriptedGenerator {
    fn name(&self) -> &'static str {
        "scripted"
    }

    async fn generate(&self, request: &GenerationRequest) -> AiResult<String> {
        match self.next(request) {
            Script::Reply(text) => Ok(text),
            Script::Fail | Script::Broken(_) => Err(AiError::Unavailable),
        }
    }

    /// Streams the scripted reply one word at a time
    async fn generate_stream(&self, request: &GenerationRequest) -> AiResult<TextStream> {
        let items = match self.next(request) {
            Script::Reply(text) => words(&text),
            Script::Fail => return Err(AiError::Unavailable),
            Script::Broken(text) => {
                let mut items = words(&text);
                items.push(Err(AiError::Stream("connection reset".to_string())));
                items
            }
        };
        Ok(Box::pin(futures_util::stream::iter(items)))
    }
}
