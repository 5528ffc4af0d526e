//! Online/offline switch in front of the text generator

use super::{GeminiClient, TextGenerator};
use crate::config::AiConfig;
use std::sync::Arc;
use std::time::Duration;

#[derive(Clone)]
pub struct AiService {
    generator: Option<Arc<dyn TextGenerator>>,
    simulated_delay: Duration,
    response_language: String,
}

impl AiService {
    pub fn new(generator: Option<Arc<dyn TextGenerator>>, config: &AiConfig) -> Self {
        Self {
            generator,
            simulated_delay: Duration::from_millis(config.simulated_delay_ms),
            response_language: config.response_language.clone(),
        }
    }

    /// Build a Gemini-backed service, or an offline one when no key is configured
    pub fn from_config(config: &AiConfig) -> Self {
        let key = config.api_key.as_deref().filter(|k| !k.trim().is_empty());
        let generator: Option<Arc<dyn TextGenerator>> = match key {
            Some(key) => match GeminiClient::new(key, config) {
                Ok(client) => {
                    tracing::info!(model = %client.model(), "Generative text service configured");
                    Some(Arc::new(client))
                }
                Err(e) => {
                    tracing::warn!(error = %e, "Could not build the Gemini client; AI features run offline");
                    None
                }
            },
            None => {
                tracing::warn!(
                    "API_KEY for Gemini not set. AI features run offline with canned replies"
                );
                None
            }
        };
        Self::new(generator, config)
    }

    /// Offline service with no simulated latency
    pub fn offline() -> Self {
        Self {
            generator: None,
            simulated_delay: Duration::ZERO,
            response_language: AiConfig::default().response_language,
        }
    }

    pub fn generator(&self) -> Option<&Arc<dyn TextGenerator>> {
        self.generator.as_ref()
    }

    pub fn is_online(&self) -> bool {
        self.generator.is_some()
    }

    pub fn response_language(&self) -> &str {
        &self.response_language
    }

    /// Sentence appended to prompts so replies come back in the configured language
    pub fn language_instruction(&self) -> String {
        format!("Always answer in {}.", self.response_language)
    }

    /// Wait out the simulated latency, then hand back the canned value
    pub async fn offline_reply<T>(&self, value: T) -> T {
        if !self.simulated_delay.is_zero() {
            tokio::time::sleep(self.simulated_delay).await;
        }
        value
    }
}

impl std::fmt::Debug for AiService {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AiService")
            .field("generator", &self.generator.as_ref().map(|g| g.name()))
            .field("simulated_delay", &self.simulated_delay)
            .field("response_language", &self.response_language)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ai::testing::ScriptedGenerator;

    #[test]
    fn test_missing_key_is_offline() {
        let service = AiService::from_config(&AiConfig::default());
        assert!(!service.is_online());

        let blank = AiConfig {
            api_key: Some("   ".to_string()),
            ..AiConfig::default()
        };
        assert!(!AiService::from_config(&blank).is_online());
    }

    #[test]
    fn test_key_builds_gemini() {
        let config = AiConfig {
            api_key: Some("k".to_string()),
            ..AiConfig::default()
        };
        let service = AiService::from_config(&config);
        assert_eq!(service.generator().map(|g| g.name()), Some("gemini"));
    }

    #[tokio::test]
    async fn test_offline_reply_waits_configured_delay() {
        let config = AiConfig {
            simulated_delay_ms: 20,
            ..AiConfig::default()
        };
        let service = AiService::new(None, &config);

        let start = std::time::Instant::now();
        assert_eq!(service.offline_reply(5).await, 5);
        assert!(start.elapsed() >= Duration::from_millis(20));
    }

    #[test]
    fn test_language_instruction() {
        let service = AiService::new(Some(Arc::new(ScriptedGenerator::new())), &AiConfig::default());
        assert_eq!(service.language_instruction(), "Always answer in Brazilian Portuguese.");
    }
}
