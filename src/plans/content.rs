//! Short-form generated text: motivation, body-scan feedback, community copy

use crate::ai::{AiService, GenerationRequest};
use crate::models::{ActivityLevel, Gender};

const GENERAL_OFFLINE: &str = "AI service unavailable. Simulated content.";
const GENERAL_FAILED: &str = "Error generating content.";
const MOTIVATION_OFFLINE: &str =
    "Remember: every step, however small, brings you closer to your goal! (AI unavailable)";
const MOTIVATION_FAILED: &str = "Believe in yourself!";
const SCAN_OFFLINE: &str = "Simulated analysis: your data shows you are on the right track! Stay focused on your goals. (AI unavailable)";
const SCAN_FAILED: &str = "Error analyzing the data. Please try again.";
const POST_OFFLINE: &str =
    "Simulated post: stay hydrated during your workouts! #FitLifeTip (AI unavailable)";
const CHALLENGE_OFFLINE: &str =
    "Simulated challenge: do 10 minutes of stretching every day this week! (AI unavailable)";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ContentKind {
    Post,
    Challenge,
}

/// Metrics offered to the body-scan analysis; absent values are left out of the prompt
#[derive(Debug, Clone, Default, PartialEq)]
pub struct BodyScanSummary {
    pub weight_kg: Option<f64>,
    pub height_cm: Option<f64>,
    pub age: Option<u32>,
    pub gender: Option<Gender>,
    pub activity_level: Option<ActivityLevel>,
}

impl BodyScanSummary {
    pub fn prompt(&self) -> String {
        let mut lines = vec![
            "Analyze the following user data and give brief feedback and general recommendations (2-3 paragraphs). Be positive and motivating:".to_string(),
        ];
        if let Some(w) = self.weight_kg {
            lines.push(format!("- Weight: {} kg", w));
        }
        if let Some(h) = self.height_cm {
            lines.push(format!("- Height: {} cm", h));
        }
        if let Some(age) = self.age {
            lines.push(format!("- Age: {} years", age));
        }
        if let Some(gender) = self.gender {
            lines.push(format!("- Gender: {}", gender));
        }
        if let Some(level) = self.activity_level {
            lines.push(format!("- Activity level: {}", level));
        }
        lines.join("\n")
    }
}

async fn generate_or(ai: &AiService, prompt: String, offline: &str, failed: Option<&str>) -> Option<String> {
    let Some(generator) = ai.generator() else {
        return Some(ai.offline_reply(offline.to_string()).await);
    };

    let request =
        GenerationRequest::prompt(prompt).with_system(ai.language_instruction());
    match generator.generate(&request).await {
        Ok(text) => Some(text),
        Err(e) => {
            tracing::error!(error = %e, "Content generation failed");
            failed.map(str::to_string)
        }
    }
}

/// Free-form text for an arbitrary prompt
pub async fn generate_general_content(ai: &AiService, prompt: &str) -> String {
    generate_or(ai, prompt.to_string(), GENERAL_OFFLINE, Some(GENERAL_FAILED))
        .await
        .unwrap_or_else(|| GENERAL_FAILED.to_string())
}

pub async fn motivational_message(ai: &AiService) -> String {
    let prompt = "Write a short, powerful motivational message about fitness and wellbeing (1-2 sentences).";
    generate_or(ai, prompt.to_string(), MOTIVATION_OFFLINE, Some(MOTIVATION_FAILED))
        .await
        .unwrap_or_else(|| MOTIVATION_FAILED.to_string())
}

pub async fn analyze_body_scan(ai: &AiService, summary: &BodyScanSummary) -> String {
    generate_or(ai, summary.prompt(), SCAN_OFFLINE, Some(SCAN_FAILED))
        .await
        .unwrap_or_else(|| SCAN_FAILED.to_string())
}

/// Community copy; `None` when the service call fails
pub async fn community_text(ai: &AiService, kind: ContentKind) -> Option<String> {
    let (prompt, offline) = match kind {
        ContentKind::Post => (
            "Write a short, engaging post for a fitness and wellbeing community. It can be a tip, a question or a bit of motivation (3 sentences max).",
            POST_OFFLINE,
        ),
        ContentKind::Challenge => (
            "Suggest a fun, achievable weekly challenge for a fitness community. Start with the challenge title followed by a colon, then a short description (3 sentences max in total).",
            CHALLENGE_OFFLINE,
        ),
    };
    generate_or(ai, prompt.to_string(), offline, None).await
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ai::testing::ScriptedGenerator;
    use crate::config::AiConfig;
    use std::sync::Arc;

    fn online(generator: ScriptedGenerator) -> (AiService, Arc<ScriptedGenerator>) {
        let generator = Arc::new(generator);
        (AiService::new(Some(generator.clone()), &AiConfig::default()), generator)
    }

    #[test]
    fn test_scan_prompt_lists_present_metrics_only() {
        let summary = BodyScanSummary {
            weight_kg: Some(72.5),
            age: Some(31),
            activity_level: Some(ActivityLevel::VeryActive),
            ..Default::default()
        };
        let prompt = summary.prompt();
        assert!(prompt.contains("- Weight: 72.5 kg"));
        assert!(prompt.contains("- Age: 31 years"));
        assert!(prompt.contains("- Activity level: very_active"));
        assert!(!prompt.contains("Height"));
        assert!(!prompt.contains("Gender"));
    }

    #[tokio::test]
    async fn test_offline_replies() {
        let ai = AiService::offline();
        assert_eq!(motivational_message(&ai).await, MOTIVATION_OFFLINE);
        assert_eq!(generate_general_content(&ai, "x").await, GENERAL_OFFLINE);
        assert_eq!(analyze_body_scan(&ai, &BodyScanSummary::default()).await, SCAN_OFFLINE);
        assert_eq!(community_text(&ai, ContentKind::Challenge).await.as_deref(), Some(CHALLENGE_OFFLINE));
    }

    #[tokio::test]
    async fn test_failure_fallbacks() {
        let (ai, _) = online(ScriptedGenerator::new().fail().fail().fail().fail());
        assert_eq!(motivational_message(&ai).await, "Believe in yourself!");
        assert_eq!(generate_general_content(&ai, "x").await, "Error generating content.");
        assert_eq!(analyze_body_scan(&ai, &BodyScanSummary::default()).await, SCAN_FAILED);
        assert!(community_text(&ai, ContentKind::Post).await.is_none());
    }

    #[tokio::test]
    async fn test_language_instruction_is_sent() {
        let (ai, generator) = online(ScriptedGenerator::new().reply("Go!"));
        assert_eq!(motivational_message(&ai).await, "Go!");
        let sent = generator.requests();
        assert_eq!(
            sent[0].system_instruction.as_deref(),
            Some("Always answer in Brazilian Portuguese.")
        );
    }
}
