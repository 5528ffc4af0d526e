//! Auth store
//!
//! Simulated sign-in. There are no credentials: a login is an email and a
//! name. Each session is a bearer token mapped to a [`User`]; the record is
//! mirrored to the [`LocalStore`] so sessions survive a restart when the
//! SQLite backend is used.

use crate::catalog;
use crate::config::AuthConfig;
use crate::models::{FitnessLevel, Gender, SubscriptionTier, User};
use crate::store::LocalStore;
use rand::Rng;
use serde::Deserialize;
use std::collections::HashMap;
use std::time::Duration;
use thiserror::Error;
use tokio::sync::RwLock;

/// Key the signed-in user is mirrored under
pub const SESSION_KEY: &str = "fitlife-user";

const SESSION_NAMESPACE_PREFIX: &str = "session-";
const USER_ID_ALPHABET: &[u8] = b"0123456789abcdefghijklmnopqrstuvwxyz";
const MIN_PASSWORD_LEN: usize = 6;

#[derive(Error, Debug, PartialEq)]
pub enum AuthError {
    #[error("{0}")]
    Validation(String),

    #[error("Not signed in")]
    NotAuthenticated,
}

pub type AuthResult<T> = Result<T, AuthError>;

/// Sign-up form; omitted profile fields take the catalog defaults
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RegisterRequest {
    pub email: String,
    pub name: String,
    #[serde(default)]
    pub avatar_url: Option<String>,
    #[serde(default)]
    pub fitness_level: Option<FitnessLevel>,
    #[serde(default)]
    pub goals: Option<Vec<String>>,
    #[serde(default)]
    pub available_equipment: Option<Vec<String>>,
    #[serde(default)]
    pub time_per_session: Option<u32>,
    #[serde(default)]
    pub age: Option<u32>,
    #[serde(default)]
    pub gender: Option<Gender>,
}

impl RegisterRequest {
    fn into_profile(self) -> LoginRequest {
        LoginRequest {
            avatar_url: self
                .avatar_url
                .filter(|url| !url.trim().is_empty())
                .or_else(|| Some(default_avatar(&self.name))),
            email: self.email,
            name: self.name,
            fitness_level: self.fitness_level,
            goals: self.goals,
            available_equipment: self.available_equipment,
            time_per_session: self.time_per_session.filter(|m| *m > 0),
            age: self.age,
            gender: self.gender,
        }
    }
}

/// Login form; every field except email and name doubles as a profile update
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LoginRequest {
    pub email: String,
    pub name: String,
    #[serde(default)]
    pub avatar_url: Option<String>,
    #[serde(default)]
    pub fitness_level: Option<FitnessLevel>,
    #[serde(default)]
    pub goals: Option<Vec<String>>,
    #[serde(default)]
    pub available_equipment: Option<Vec<String>>,
    #[serde(default)]
    pub time_per_session: Option<u32>,
    #[serde(default)]
    pub age: Option<u32>,
    #[serde(default)]
    pub gender: Option<Gender>,
}

impl LoginRequest {
    fn apply_to(self, user: &mut User) {
        user.email = self.email;
        user.name = self.name;
        if self.avatar_url.is_some() {
            user.avatar_url = self.avatar_url;
        }
        if self.fitness_level.is_some() {
            user.fitness_level = self.fitness_level;
        }
        if self.goals.is_some() {
            user.goals = self.goals;
        }
        if self.available_equipment.is_some() {
            user.available_equipment = self.available_equipment;
        }
        if self.time_per_session.is_some() {
            user.time_per_session = self.time_per_session;
        }
        if self.age.is_some() {
            user.age = self.age;
        }
        if self.gender.is_some() {
            user.gender = self.gender;
        }
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PasswordChange {
    pub current_password: String,
    pub new_password: String,
    pub confirm_password: String,
}

/// Bearer-token sessions backed by a [`LocalStore`] mirror
pub struct AuthStore {
    store: LocalStore,
    sessions: RwLock<HashMap<String, User>>,
    delays: AuthConfig,
}

impl AuthStore {
    /// Create the store and restore any mirrored sessions
    pub fn new(store: LocalStore, delays: AuthConfig) -> Self {
        let sessions = restore_sessions(&store);
        if !sessions.is_empty() {
            tracing::info!(count = sessions.len(), "Restored mirrored sessions");
        }

        Self {
            store,
            sessions: RwLock::new(sessions),
            delays,
        }
    }

    /// Create a new account and sign it in
    pub async fn register(&self, req: RegisterRequest) -> AuthResult<(String, User)> {
        validate_identity(&req.email, &req.name)?;
        sleep_ms(self.delays.register_delay_ms).await;

        let mut user = User {
            id: generate_user_id(),
            plan: SubscriptionTier::None,
            ..default_profile()
        };
        req.into_profile().apply_to(&mut user);

        let token = uuid::Uuid::new_v4().to_string();
        self.put(&token, user.clone()).await;

        tracing::info!(user_id = %user.id, "Registered user");
        Ok((token, user))
    }

    /// Sign in, or update the profile when `token` already belongs to the same email
    pub async fn login(&self, token: Option<&str>, req: LoginRequest) -> AuthResult<(String, User)> {
        validate_identity(&req.email, &req.name)?;
        sleep_ms(self.delays.login_delay_ms).await;

        let existing = match token {
            Some(t) => self
                .sessions
                .read()
                .await
                .get(t)
                .filter(|u| u.email == req.email)
                .cloned()
                .map(|u| (t.to_string(), u)),
            None => None,
        };

        let (token, user) = match existing {
            Some((token, mut user)) => {
                req.apply_to(&mut user);
                tracing::info!(user_id = %user.id, "Updated profile");
                (token, user)
            }
            None => {
                let mut user = User {
                    id: generate_user_id(),
                    avatar_url: Some(default_avatar(&req.name)),
                    plan: SubscriptionTier::Basic,
                    ..default_profile()
                };
                req.apply_to(&mut user);
                tracing::info!(user_id = %user.id, "Signed in");
                (uuid::Uuid::new_v4().to_string(), user)
            }
        };

        self.put(&token, user.clone()).await;
        Ok((token, user))
    }

    /// End a session; unknown tokens are ignored
    pub async fn logout(&self, token: &str) {
        if let Some(user) = self.sessions.write().await.remove(token) {
            tracing::info!(user_id = %user.id, "Signed out");
        }
        self.store.remove(SESSION_KEY, Some(&session_namespace(token)));
    }

    pub async fn current(&self, token: &str) -> Option<User> {
        self.sessions.read().await.get(token).cloned()
    }

    pub async fn update_plan(&self, token: &str, tier: SubscriptionTier) -> AuthResult<User> {
        let mut user = self.current(token).await.ok_or(AuthError::NotAuthenticated)?;
        user.plan = tier;
        self.put(token, user.clone()).await;

        tracing::info!(user_id = %user.id, plan = %tier, "Changed subscription");
        Ok(user)
    }

    /// Simulated password change; only the form rules are checked
    pub async fn change_password(&self, token: &str, change: &PasswordChange) -> AuthResult<()> {
        if self.current(token).await.is_none() {
            return Err(AuthError::NotAuthenticated);
        }
        if change.current_password.is_empty() {
            return Err(AuthError::Validation("Current password is required".to_string()));
        }
        if change.new_password != change.confirm_password {
            return Err(AuthError::Validation("New passwords do not match".to_string()));
        }
        if change.new_password.chars().count() < MIN_PASSWORD_LEN {
            return Err(AuthError::Validation(format!(
                "New password must be at least {} characters",
                MIN_PASSWORD_LEN
            )));
        }

        sleep_ms(self.delays.register_delay_ms).await;
        Ok(())
    }

    pub async fn session_count(&self) -> usize {
        self.sessions.read().await.len()
    }

    async fn put(&self, token: &str, user: User) {
        self.store.save(SESSION_KEY, &user, Some(&session_namespace(token)));
        self.sessions.write().await.insert(token.to_string(), user);
    }
}

fn restore_sessions(store: &LocalStore) -> HashMap<String, User> {
    let prefix = format!("{}{}", store.app_prefix(), SESSION_NAMESPACE_PREFIX);
    let suffix = format!("_{}", SESSION_KEY);

    let keys = match store.backend().keys_with_prefix(&prefix) {
        Ok(keys) => keys,
        Err(e) => {
            tracing::warn!(error = %e, "Could not list mirrored sessions");
            return HashMap::new();
        }
    };

    let mut sessions = HashMap::new();
    for key in keys {
        let Some(token) = key
            .strip_prefix(prefix.as_str())
            .and_then(|rest| rest.strip_suffix(suffix.as_str()))
        else {
            continue;
        };

        let namespace = session_namespace(token);
        match store.load::<User>(SESSION_KEY, Some(&namespace)) {
            Some(user) => {
                sessions.insert(token.to_string(), user);
            }
            None => store.remove(SESSION_KEY, Some(&namespace)),
        }
    }
    sessions
}

fn session_namespace(token: &str) -> String {
    format!("{}{}", SESSION_NAMESPACE_PREFIX, token)
}

fn validate_identity(email: &str, name: &str) -> AuthResult<()> {
    if name.trim().is_empty() {
        return Err(AuthError::Validation("Name is required".to_string()));
    }
    if !email.contains('@') {
        return Err(AuthError::Validation("A valid email is required".to_string()));
    }
    Ok(())
}

fn default_profile() -> User {
    User {
        id: String::new(),
        email: String::new(),
        name: String::new(),
        avatar_url: None,
        plan: SubscriptionTier::None,
        fitness_level: Some(catalog::DEFAULT_USER_FITNESS_LEVEL),
        goals: Some(catalog::default_goals()),
        available_equipment: Some(catalog::default_equipment()),
        time_per_session: Some(catalog::DEFAULT_USER_TIME_PER_SESSION),
        age: None,
        gender: None,
    }
}

fn default_avatar(name: &str) -> String {
    let seed: String = name.split_whitespace().collect();
    format!("https://picsum.photos/seed/{}/100/100", seed)
}

/// `user-` followed by nine base36 characters
pub fn generate_user_id() -> String {
    format!("user-{}", base36_suffix(9))
}

pub(crate) fn base36_suffix(len: usize) -> String {
    let mut rng = rand::thread_rng();
    (0..len)
        .map(|_| USER_ID_ALPHABET[rng.gen_range(0..USER_ID_ALPHABET.len())] as char)
        .collect()
}

async fn sleep_ms(ms: u64) {
    if ms > 0 {
        tokio::time::sleep(Duration::from_millis(ms)).await;
    }
}
