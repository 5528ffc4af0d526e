//! Shared community board: posts and weekly challenges
//!
//! Held in memory for the life of the process and seeded on startup.

use crate::ai::AiService;
use crate::dashboard::{PanelError, PanelResult};
use crate::models::{ChallengeSource, CommunityChallenge, CommunityPost, User};
use crate::plans::content::{community_text, ContentKind};
use crate::session::base36_suffix;
use chrono::{Duration, Utc};
use rand::Rng;
use tokio::sync::RwLock;

const AI_AUTHOR: &str = "FitLife AI";
const AI_AVATAR: &str = "/vite.svg";
const DEFAULT_CHALLENGE_TITLE: &str = "New AI Challenge";
const DEFAULT_CHALLENGE_DAYS: u32 = 7;

fn seed_posts() -> Vec<CommunityPost> {
    let now = Utc::now();
    let post = |id: &str, author: &str, avatar: &str, content: &str, hours_ago: i64, likes, comments| {
        CommunityPost {
            id: id.to_string(),
            author: author.to_string(),
            avatar_url: Some(avatar.to_string()),
            content: content.to_string(),
            timestamp: now - Duration::hours(hours_ago),
            likes,
            comments,
        }
    };

    vec![
        post(
            "cp1",
            AI_AUTHOR,
            AI_AVATAR,
            "💪 New weekly challenge is live! Burn 500 extra calories this week and earn points! #FitLifeChallenge",
            2,
            152,
            12,
        ),
        post(
            "cp2",
            AI_AUTHOR,
            AI_AVATAR,
            "🥗 Nutrition tip: add more colorful vegetables to your plate for a boost of vitamins and antioxidants! #SmartNutrition",
            5,
            230,
            25,
        ),
        post(
            "cp3",
            "Ana Silva",
            "https://picsum.photos/seed/ana/100/100",
            "Just finished today's AI-generated workout! Exhausted but happy! Who else trained today?",
            1,
            88,
            18,
        ),
    ]
}

fn seed_challenges() -> Vec<CommunityChallenge> {
    vec![
        CommunityChallenge {
            id: "ch1".to_string(),
            title: "7-Day Cardio Challenge".to_string(),
            description: "Complete 30 minutes of cardio every day for 7 days in a row.".to_string(),
            generated_by: ChallengeSource::Ai,
            duration_days: 7,
            reward_points: Some(100),
        },
        CommunityChallenge {
            id: "ch2".to_string(),
            title: "Plank Master".to_string(),
            description: "Increase your plank time by 30 seconds by the end of the week.".to_string(),
            generated_by: ChallengeSource::Ai,
            duration_days: 7,
            reward_points: Some(75),
        },
    ]
}

/// Split "Title: description" on the first colon
fn split_challenge(text: &str) -> (String, String) {
    match text.split_once(':') {
        Some((title, description)) => (title.trim().to_string(), description.trim().to_string()),
        None => (DEFAULT_CHALLENGE_TITLE.to_string(), text.trim().to_string()),
    }
}

pub struct CommunityBoard {
    posts: RwLock<Vec<CommunityPost>>,
    challenges: RwLock<Vec<CommunityChallenge>>,
}

impl Default for CommunityBoard {
    fn default() -> Self {
        Self::new()
    }
}

impl CommunityBoard {
    pub fn new() -> Self {
        Self {
            posts: RwLock::new(seed_posts()),
            challenges: RwLock::new(seed_challenges()),
        }
    }

    /// Newest first
    pub async fn posts(&self) -> Vec<CommunityPost> {
        self.posts.read().await.clone()
    }

    pub async fn challenges(&self) -> Vec<CommunityChallenge> {
        self.challenges.read().await.clone()
    }

    pub async fn create_post(&self, author: &User, content: &str) -> PanelResult<CommunityPost> {
        if content.trim().is_empty() {
            return Err(PanelError::Validation("Post content cannot be empty.".to_string()));
        }

        let post = CommunityPost {
            id: format!("post-{}-{}", Utc::now().timestamp_millis(), base36_suffix(5)),
            author: author.name.clone(),
            avatar_url: Some(author.avatar_url.clone().unwrap_or_else(|| {
                format!("https://picsum.photos/seed/{}/40/40", author.name.replace(char::is_whitespace, ""))
            })),
            content: content.to_string(),
            timestamp: Utc::now(),
            likes: 0,
            comments: 0,
        };

        self.posts.write().await.insert(0, post.clone());
        tracing::info!(user_id = %author.id, post_id = %post.id, "Published community post");
        Ok(post)
    }

    pub async fn like(&self, post_id: &str) -> PanelResult<CommunityPost> {
        self.update_post(post_id, |p| p.likes += 1).await
    }

    /// Comments are counted only; their text is not kept
    pub async fn comment(&self, post_id: &str) -> PanelResult<CommunityPost> {
        self.update_post(post_id, |p| p.comments += 1).await
    }

    async fn update_post<F>(&self, post_id: &str, f: F) -> PanelResult<CommunityPost>
    where
        F: FnOnce(&mut CommunityPost),
    {
        let mut posts = self.posts.write().await;
        let post = posts
            .iter_mut()
            .find(|p| p.id == post_id)
            .ok_or_else(|| PanelError::NotFound(format!("post '{}'", post_id)))?;
        f(post);
        Ok(post.clone())
    }

    /// Ask the model for a post; `None` when generation fails
    pub async fn generate_ai_post(&self, ai: &AiService) -> Option<CommunityPost> {
        let content = community_text(ai, ContentKind::Post).await?;
        let (likes, comments) = {
            let mut rng = rand::thread_rng();
            (rng.gen_range(0..50), rng.gen_range(0..10))
        };

        let post = CommunityPost {
            id: format!("aipost-{}", Utc::now().timestamp_millis()),
            author: AI_AUTHOR.to_string(),
            avatar_url: Some(AI_AVATAR.to_string()),
            content,
            timestamp: Utc::now(),
            likes,
            comments,
        };
        self.posts.write().await.insert(0, post.clone());
        Some(post)
    }

    pub async fn generate_ai_challenge(&self, ai: &AiService) -> Option<CommunityChallenge> {
        let text = community_text(ai, ContentKind::Challenge).await?;
        let (title, description) = split_challenge(&text);
        let reward = rand::thread_rng().gen_range(50..=99);

        let challenge = CommunityChallenge {
            id: format!("aichallenge-{}", Utc::now().timestamp_millis()),
            title,
            description,
            generated_by: ChallengeSource::Ai,
            duration_days: DEFAULT_CHALLENGE_DAYS,
            reward_points: Some(reward),
        };
        self.challenges.write().await.insert(0, challenge.clone());
        Some(challenge)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ai::testing::ScriptedGenerator;
    use crate::config::AiConfig;
    use std::sync::Arc;

    fn user() -> User {
        User {
            id: "u1".to_string(),
            name: "Ana Souza".to_string(),
            ..Default::default()
        }
    }

    #[tokio::test]
    async fn test_seeded_board() {
        let board = CommunityBoard::new();
        assert_eq!(board.posts().await.len(), 3);
        assert_eq!(board.challenges().await.len(), 2);
    }

    #[tokio::test]
    async fn test_create_post_and_engage() {
        let board = CommunityBoard::new();
        assert!(board.create_post(&user(), "  ").await.is_err());

        let post = board.create_post(&user(), "Leg day done").await.unwrap();
        assert_eq!(post.avatar_url.as_deref(), Some("https://picsum.photos/seed/AnaSouza/40/40"));
        assert_eq!(board.posts().await[0].id, post.id);

        board.like(&post.id).await.unwrap();
        let post = board.comment(&post.id).await.unwrap();
        assert_eq!((post.likes, post.comments), (1, 1));
        assert!(matches!(board.like("missing").await, Err(PanelError::NotFound(_))));
    }

    #[test]
    fn test_split_challenge() {
        assert_eq!(
            split_challenge("Hydration Hero: Drink 2L a day. Track it: daily."),
            ("Hydration Hero".to_string(), "Drink 2L a day. Track it: daily.".to_string())
        );
        assert_eq!(
            split_challenge("Walk every day"),
            (DEFAULT_CHALLENGE_TITLE.to_string(), "Walk every day".to_string())
        );
    }

    #[tokio::test]
    async fn test_ai_generation() {
        let generator = Arc::new(
            ScriptedGenerator::new()
                .reply("Stretch after every run")
                .reply("Step Up: 10k steps a day")
                .fail(),
        );
        let ai = AiService::new(Some(generator), &AiConfig::default());
        let board = CommunityBoard::new();

        let post = board.generate_ai_post(&ai).await.unwrap();
        assert_eq!(post.author, AI_AUTHOR);
        assert!(post.likes < 50 && post.comments < 10);

        let challenge = board.generate_ai_challenge(&ai).await.unwrap();
        assert_eq!(challenge.title, "Step Up");
        assert_eq!(challenge.duration_days, 7);
        assert!((50..=99).contains(&challenge.reward_points.unwrap()));
        assert_eq!(board.challenges().await.len(), 3);

        assert!(board.generate_ai_post(&ai).await.is_none());
        assert_eq!(board.posts().await.len(), 4);
    }
}
