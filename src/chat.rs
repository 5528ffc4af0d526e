//! Coach chat
//!
//! A [`ChatSession`] holds the visible transcript plus the turns actually sent
//! to the model. Failed exchanges stay in the transcript (as an apology from
//! the coach) but never reach the model history.

use crate::ai::{AiService, GenerationRequest, Turn};
use crate::dashboard::{PanelError, PanelResult};
use crate::models::{ChatMessage, User};
use futures_util::StreamExt;
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::{Mutex, RwLock};

const OFFLINE_REPLY: &str = "Sorry, the AI service is unavailable right now. Please try again later.";
const FAILED_REPLY: &str = "Something went wrong while processing your message. Please try again.";
const STREAM_FAILED_REPLY: &str =
    "Something went wrong while streaming your reply. Please try again.";
const GREETING_ID: &str = "system-greeting";

fn persona(language: &str) -> String {
    format!(
        "You are FitLife AI, a friendly, motivating and expert fitness and nutrition assistant. \
         Your goal is to help users reach their health and wellbeing goals. \
         Give personalized advice, create workout and nutrition plans when asked, and answer questions clearly and concisely. \
         Keep a positive, encouraging tone. If you do not know an answer, admit it and suggest where the user can find the information. \
         When creating plans, ask for details such as experience level, goals, available time and equipment. \
         Always answer in {}.",
        language
    )
}

#[derive(Debug, Clone)]
pub struct ChatSession {
    id: String,
    system_instruction: String,
    messages: Vec<ChatMessage>,
    history: Vec<Turn>,
}

impl ChatSession {
    /// New session opened with the coach's greeting
    pub fn new(user_name: Option<&str>, language: &str) -> Self {
        let greeting = ChatMessage {
            id: GREETING_ID.to_string(),
            ..ChatMessage::ai(format!(
                "Hi {}! I'm your FitLife AI assistant. How can I help you today? You can ask for a workout plan, nutrition tips, or just talk about your goals!",
                user_name.unwrap_or("there")
            ))
        };

        Self {
            id: uuid::Uuid::new_v4().to_string(),
            system_instruction: persona(language),
            messages: vec![greeting],
            history: Vec::new(),
        }
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn messages(&self) -> &[ChatMessage] {
        &self.messages
    }

    fn begin(&mut self, text: &str) -> PanelResult<GenerationRequest> {
        let text = text.trim();
        if text.is_empty() {
            return Err(PanelError::Validation("Message cannot be empty.".to_string()));
        }
        self.messages.push(ChatMessage::user(text));

        let mut contents = self.history.clone();
        contents.push(Turn::user(text));
        Ok(GenerationRequest {
            system_instruction: Some(self.system_instruction.clone()),
            contents,
            json_response: false,
        })
    }

    fn finish(&mut self, request: GenerationRequest, reply: String, ok: bool) -> ChatMessage {
        if ok {
            self.history = request.contents;
            self.history.push(Turn::model(reply.clone()));
        }
        let message = ChatMessage::ai(reply);
        self.messages.push(message.clone());
        message
    }

    /// Send one message and wait for the whole reply
    pub async fn send(&mut self, ai: &AiService, text: &str) -> PanelResult<ChatMessage> {
        let request = self.begin(text)?;

        let Some(generator) = ai.generator() else {
            let reply = ai.offline_reply(OFFLINE_REPLY.to_string()).await;
            return Ok(self.finish(request, reply, false));
        };

        let message = match generator.generate(&request).await {
            Ok(reply) => self.finish(request, reply, true),
            Err(e) => {
                tracing::error!(session_id = %self.id, error = %e, "Chat reply failed");
                self.finish(request, FAILED_REPLY.to_string(), false)
            }
        };
        Ok(message)
    }

    /// Send one message, handing reply fragments to `on_chunk` as they arrive
    ///
    /// The transcript receives the concatenated reply once the stream ends. A
    /// failure part-way through is reported as one more chunk.
    pub async fn send_stream<F>(&mut self, ai: &AiService, text: &str, mut on_chunk: F) -> PanelResult<ChatMessage>
    where
        F: FnMut(&str),
    {
        let request = self.begin(text)?;

        let Some(generator) = ai.generator() else {
            let reply = ai.offline_reply(OFFLINE_REPLY.to_string()).await;
            on_chunk(&reply);
            return Ok(self.finish(request, reply, false));
        };

        let mut reply = String::new();
        let mut ok = true;
        match generator.generate_stream(&request).await {
            Ok(mut stream) => {
                while let Some(item) = stream.next().await {
                    match item {
                        Ok(chunk) => {
                            on_chunk(&chunk);
                            reply.push_str(&chunk);
                        }
                        Err(e) => {
                            tracing::error!(session_id = %self.id, error = %e, "Chat stream failed");
                            ok = false;
                            break;
                        }
                    }
                }
            }
            Err(e) => {
                tracing::error!(session_id = %self.id, error = %e, "Chat stream could not start");
                ok = false;
            }
        }

        if !ok {
            on_chunk(STREAM_FAILED_REPLY);
            reply.push_str(STREAM_FAILED_REPLY);
        }
        Ok(self.finish(request, reply, ok))
    }
}

/// One chat session per user, created on first use
pub struct ChatRegistry {
    language: String,
    sessions: RwLock<HashMap<String, Arc<Mutex<ChatSession>>>>,
}

impl ChatRegistry {
    pub fn new(language: impl Into<String>) -> Self {
        Self {
            language: language.into(),
            sessions: RwLock::new(HashMap::new()),
        }
    }

    pub async fn session(&self, user: &User) -> Arc<Mutex<ChatSession>> {
        if let Some(session) = self.sessions.read().await.get(&user.id) {
            return session.clone();
        }

        let mut sessions = self.sessions.write().await;
        sessions
            .entry(user.id.clone())
            .or_insert_with(|| {
                tracing::debug!(user_id = %user.id, "Opened chat session");
                Arc::new(Mutex::new(ChatSession::new(Some(&user.name), &self.language)))
            })
            .clone()
    }

    pub async fn transcript(&self, user: &User) -> Vec<ChatMessage> {
        self.session(user).await.lock().await.messages().to_vec()
    }

    /// Drop the user's session; the next message starts over
    pub async fn reset(&self, user_id: &str) -> bool {
        self.sessions.write().await.remove(user_id).is_some()
    }

    pub async fn session_count(&self) -> usize {
        self.sessions.read().await.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ai::testing::ScriptedGenerator;
    use crate::ai::Role;
    use crate::config::AiConfig;
    use crate::models::Sender;

    fn senders(messages: &[ChatMessage]) -> Vec<Sender> {
        messages.iter().map(|m| m.sender).collect()
    }

    fn online(generator: ScriptedGenerator) -> (AiService, Arc<ScriptedGenerator>) {
        let generator = Arc::new(generator);
        (AiService::new(Some(generator.clone()), &AiConfig::default()), generator)
    }

    #[tokio::test]
    async fn test_send_keeps_history() {
        let (ai, generator) = online(ScriptedGenerator::new().reply("Try squats.").reply("3 sets of 12."));
        let mut session = ChatSession::new(Some("Ana"), "English");
        assert!(session.messages()[0].text.starts_with("Hi Ana!"));

        session.send(&ai, "Leg exercise?").await.unwrap();
        let reply = session.send(&ai, "How many?").await.unwrap();
        assert_eq!(reply.text, "3 sets of 12.");
        assert_eq!(
            senders(session.messages()),
            vec![Sender::Ai, Sender::User, Sender::Ai, Sender::User, Sender::Ai]
        );

        let second = &generator.requests()[1];
        let roles: Vec<Role> = second.contents.iter().map(|t| t.role).collect();
        assert_eq!(roles, vec![Role::User, Role::Model, Role::User]);
        assert!(second
            .system_instruction
            .as_deref()
            .unwrap()
            .ends_with("Always answer in English."));
    }

    #[tokio::test]
    async fn test_empty_message_rejected() {
        let mut session = ChatSession::new(None, "English");
        let result = session.send(&AiService::offline(), "   ").await;
        assert!(matches!(result, Err(PanelError::Validation(_))));
        assert_eq!(session.messages().len(), 1);
    }

    #[tokio::test]
    async fn test_failure_becomes_apology() {
        let (ai, generator) = online(ScriptedGenerator::new().fail().reply("Hello again"));
        let mut session = ChatSession::new(None, "English");

        let reply = session.send(&ai, "Hi").await.unwrap();
        assert_eq!(reply.text, FAILED_REPLY);
        assert_eq!(reply.sender, Sender::Ai);

        session.send(&ai, "Hi?").await.unwrap();
        assert_eq!(generator.requests()[1].contents.len(), 1);
    }

    #[tokio::test]
    async fn test_offline_reply() {
        let mut session = ChatSession::new(None, "English");
        let reply = session.send(&AiService::offline(), "Hi").await.unwrap();
        assert_eq!(reply.text, OFFLINE_REPLY);
    }

    #[tokio::test]
    async fn test_stream_collects_reply() {
        let (ai, _) = online(ScriptedGenerator::new().reply("Drink more water"));
        let mut session = ChatSession::new(None, "English");

        let mut chunks = Vec::new();
        let message = session
            .send_stream(&ai, "Tip?", |c| chunks.push(c.to_string()))
            .await
            .unwrap();

        assert_eq!(chunks, vec!["Drink ", "more ", "water"]);
        assert_eq!(message.text, "Drink more water");
        assert_eq!(session.messages().last().unwrap().text, "Drink more water");
    }

    #[tokio::test]
    async fn test_stream_error_appends_apology() {
        let (ai, _) = online(ScriptedGenerator::new().broken_stream("Half a"));
        let mut session = ChatSession::new(None, "English");

        let mut chunks = Vec::new();
        let message = session
            .send_stream(&ai, "Tip?", |c| chunks.push(c.to_string()))
            .await
            .unwrap();

        assert_eq!(chunks.last().map(String::as_str), Some(STREAM_FAILED_REPLY));
        assert_eq!(message.text, format!("Half a{}", STREAM_FAILED_REPLY));
    }

    #[tokio::test]
    async fn test_registry_reset() {
        let registry = ChatRegistry::new("English");
        let user = User {
            id: "u1".to_string(),
            name: "Ana".to_string(),
            ..Default::default()
        };

        let session = registry.session(&user).await;
        session
            .lock()
            .await
            .send(&AiService::offline(), "Hi")
            .await
            .unwrap();
        assert_eq!(registry.transcript(&user).await.len(), 3);

        assert!(registry.reset(&user.id).await);
        assert_eq!(registry.transcript(&user).await.len(), 1);
        assert_eq!(registry.session_count().await, 1);
    }
}
