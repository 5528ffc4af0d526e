//! Profile form for the signed-in user

use super::{PanelError, PanelResult};
use crate::catalog;
use crate::models::{FitnessLevel, Gender, User};
use crate::session::{AuthError, AuthStore, LoginRequest};
use serde::{Deserialize, Serialize};

/// Editable profile fields, pre-filled with defaults where the profile is blank
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProfileForm {
    pub name: String,
    pub email: String,
    #[serde(default)]
    pub avatar_url: Option<String>,
    pub fitness_level: FitnessLevel,
    pub goals: Vec<String>,
    pub available_equipment: Vec<String>,
    pub time_per_session: u32,
    #[serde(default)]
    pub age: Option<u32>,
    #[serde(default)]
    pub gender: Option<Gender>,
}

impl ProfileForm {
    pub fn from_user(user: &User) -> Self {
        Self {
            name: user.name.clone(),
            email: user.email.clone(),
            avatar_url: user.avatar_url.clone(),
            fitness_level: user.fitness_level.unwrap_or(catalog::DEFAULT_USER_FITNESS_LEVEL),
            goals: user.goals.clone().unwrap_or_else(catalog::default_goals),
            available_equipment: user
                .available_equipment
                .clone()
                .unwrap_or_else(catalog::default_equipment),
            time_per_session: user
                .time_per_session
                .unwrap_or(catalog::DEFAULT_USER_TIME_PER_SESSION),
            age: user.age,
            gender: user.gender,
        }
    }

    fn into_login(self, email: String) -> LoginRequest {
        LoginRequest {
            email,
            name: self.name,
            avatar_url: self.avatar_url,
            fitness_level: Some(self.fitness_level),
            goals: Some(self.goals),
            available_equipment: Some(self.available_equipment),
            time_per_session: Some(self.time_per_session),
            age: self.age,
            gender: self.gender,
        }
    }
}

/// Save the form through the login path so the session keeps its id and tier
///
/// The email is not editable: the session's own email is always sent.
pub async fn save(auth: &AuthStore, token: &str, form: ProfileForm) -> PanelResult<User> {
    if form.name.trim().is_empty() || form.email.trim().is_empty() {
        return Err(PanelError::Validation("Name and email are required.".to_string()));
    }
    let current = auth
        .current(token)
        .await
        .ok_or_else(|| PanelError::NotFound("session".to_string()))?;

    let (_, user) = auth
        .login(Some(token), form.into_login(current.email))
        .await
        .map_err(|e| match e {
            AuthError::Validation(message) => PanelError::Validation(message),
            AuthError::NotAuthenticated => PanelError::NotFound("session".to_string()),
        })?;

    tracing::info!(user_id = %user.id, "Profile updated");
    Ok(user)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::AuthConfig;
    use crate::models::SubscriptionTier;
    use crate::session::RegisterRequest;
    use crate::store::{LocalStore, MemoryBackend};
    use std::sync::Arc;

    fn auth() -> AuthStore {
        AuthStore::new(LocalStore::new(Arc::new(MemoryBackend::new())), AuthConfig::instant())
    }

    #[test]
    fn test_form_fills_defaults() {
        let user = User {
            id: "u1".to_string(),
            email: "ana@example.com".to_string(),
            name: "Ana".to_string(),
            avatar_url: None,
            plan: SubscriptionTier::Basic,
            fitness_level: None,
            goals: None,
            available_equipment: None,
            time_per_session: None,
            age: None,
            gender: None,
        };
        let form = ProfileForm::from_user(&user);
        assert_eq!(form.fitness_level, catalog::DEFAULT_USER_FITNESS_LEVEL);
        assert_eq!(form.goals, catalog::default_goals());
        assert_eq!(form.available_equipment, catalog::default_equipment());
        assert_eq!(form.time_per_session, catalog::DEFAULT_USER_TIME_PER_SESSION);
    }

    #[tokio::test]
    async fn test_save_keeps_identity() {
        let auth = auth();
        let (token, user) = auth
            .register(RegisterRequest {
                email: "ana@example.com".to_string(),
                name: "Ana".to_string(),
                ..Default::default()
            })
            .await
            .unwrap();

        let mut form = ProfileForm::from_user(&user);
        form.fitness_level = FitnessLevel::Advanced;
        form.time_per_session = 45;
        let updated = save(&auth, &token, form).await.unwrap();

        assert_eq!(updated.id, user.id);
        assert_eq!(updated.plan, user.plan);
        assert_eq!(updated.fitness_level, Some(FitnessLevel::Advanced));
        assert_eq!(auth.current(&token).await.unwrap().time_per_session, Some(45));
    }

    #[tokio::test]
    async fn test_save_ignores_email_edits() {
        let auth = auth();
        let (token, user) = auth
            .register(RegisterRequest {
                email: "ana@example.com".to_string(),
                name: "Ana".to_string(),
                ..Default::default()
            })
            .await
            .unwrap();

        let mut form = ProfileForm::from_user(&user);
        form.email = "other@example.com".to_string();
        form.name = "Ana Souza".to_string();
        let updated = save(&auth, &token, form).await.unwrap();

        assert_eq!(updated.id, user.id);
        assert_eq!(updated.email, "ana@example.com");
        assert_eq!(updated.name, "Ana Souza");
        assert_eq!(auth.session_count().await, 1);
    }

    #[tokio::test]
    async fn test_save_requires_name_and_email() {
        let auth = auth();
        let (token, user) = auth
            .register(RegisterRequest {
                email: "ana@example.com".to_string(),
                name: "Ana".to_string(),
                ..Default::default()
            })
            .await
            .unwrap();

        let mut form = ProfileForm::from_user(&user);
        form.name = "  ".to_string();
        assert!(matches!(save(&auth, &token, form).await, Err(PanelError::Validation(_))));
    }
}
