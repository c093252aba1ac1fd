//! Stand-in backend for running without a configured server.
//!
//! Every call waits a fixed delay and returns a canned record. Nothing is remembered
//! between calls: `get_current_user` returns the same test user whatever was signed in.

use std::time::Duration;

use async_trait::async_trait;
use chrono::{Duration as ChronoDuration, Utc};
use serde_json::{Map, Value};

use super::model::{Account, Session, SessionList, Token, UserProfile};
use super::{avatar_url, AuthBackend, BackendError, BackendKind, Result};

const MOCK_USER_ID: &str = "mock-user-id";
const MOCK_ACCOUNT_ID: &str = "mock-account-id";
const MOCK_SESSION_ID: &str = "mock-session-id";
const MOCK_EMAIL: &str = "test@example.com";
const MOCK_USERNAME: &str = "TestUser";

/// Artificial latency per operation. Calls not listed here answer immediately.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MockDelays {
    pub create_user: Duration,
    pub sign_in: Duration,
    pub current_user: Duration,
    pub sign_out: Duration,
}

impl Default for MockDelays {
    fn default() -> Self {
        Self {
            create_user: Duration::from_millis(1000),
            sign_in: Duration::from_millis(800),
            current_user: Duration::from_millis(500),
            sign_out: Duration::from_millis(300),
        }
    }
}

impl MockDelays {
    pub fn none() -> Self {
        Self {
            create_user: Duration::ZERO,
            sign_in: Duration::ZERO,
            current_user: Duration::ZERO,
            sign_out: Duration::ZERO,
        }
    }

    /// Longest delay of any operation.
    pub fn max(&self) -> Duration {
        self.create_user
            .max(self.sign_in)
            .max(self.current_user)
            .max(self.sign_out)
    }
}

#[derive(Debug, Clone, Default)]
pub struct MockBackend {
    delays: MockDelays,
}

impl MockBackend {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_delays(mut self, delays: MockDelays) -> Self {
        self.delays = delays;
        self
    }
}

async fn pause(d: Duration) {
    if !d.is_zero() {
        tokio::time::sleep(d).await;
    }
}

fn now_iso() -> String {
    Utc::now().to_rfc3339()
}

fn iso_in(d: ChronoDuration) -> String {
    (Utc::now() + d).to_rfc3339()
}

fn millis() -> i64 {
    Utc::now().timestamp_millis()
}

fn test_user() -> UserProfile {
    UserProfile {
        id: MOCK_USER_ID.to_string(),
        account_id: MOCK_ACCOUNT_ID.to_string(),
        email: MOCK_EMAIL.to_string(),
        username: MOCK_USERNAME.to_string(),
        avatar: Some(avatar_url(MOCK_USERNAME)),
        created_at: Some(now_iso()),
        updated_at: Some(now_iso()),
        extra: Map::new(),
    }
}

fn mock_session(id: String) -> Session {
    Session {
        id,
        user_id: MOCK_USER_ID.to_string(),
        expire: iso_in(ChronoDuration::hours(24)),
        extra: Map::new(),
    }
}

fn token(id: impl Into<String>, expire: Option<String>) -> Token {
    Token {
        id: id.into(),
        user_id: None,
        expire,
        extra: Map::new(),
    }
}

/// Profile keys read into typed fields. The last three are optional.
const PROFILE_KEYS: [&str; 7] = [
    "$id",
    "accountId",
    "email",
    "username",
    "avatar",
    "$createdAt",
    "$updatedAt",
];

/// Typed profile fields only hold strings; other values are kept as their JSON text.
fn profile_value(key: &str, value: Value) -> Value {
    let Some(pos) = PROFILE_KEYS.iter().position(|k| *k == key) else {
        return value;
    };
    match value {
        Value::String(_) => value,
        Value::Null if pos >= 4 => value,
        Value::Null => Value::String(String::new()),
        other => Value::String(other.to_string()),
    }
}

#[async_trait]
impl AuthBackend for MockBackend {
    fn kind(&self) -> BackendKind {
        BackendKind::Mock
    }

    async fn create_user(
        &self,
        email: &str,
        _password: &str,
        username: &str,
    ) -> Result<UserProfile> {
        tracing::info!(email, username, "mock: creating user account");
        pause(self.delays.create_user).await;
        let ts = millis();
        Ok(UserProfile {
            id: format!("{MOCK_USER_ID}-{ts}"),
            account_id: format!("{MOCK_ACCOUNT_ID}-{ts}"),
            email: email.to_string(),
            username: username.to_string(),
            avatar: Some(avatar_url(username)),
            created_at: Some(now_iso()),
            updated_at: Some(now_iso()),
            extra: Map::new(),
        })
    }

    async fn sign_in(&self, email: &str, _password: &str) -> Result<Session> {
        tracing::info!(email, "mock: signing in");
        pause(self.delays.sign_in).await;
        Ok(mock_session(format!("{MOCK_SESSION_ID}-{}", millis())))
    }

    async fn get_account(&self) -> Result<Account> {
        tracing::info!("mock: getting account");
        Ok(Account {
            id: MOCK_ACCOUNT_ID.to_string(),
            name: "Test User".to_string(),
            email: MOCK_EMAIL.to_string(),
            email_verification: true,
            registration: Some(now_iso()),
            extra: Map::new(),
        })
    }

    async fn get_current_user(&self) -> Result<Option<UserProfile>> {
        tracing::info!("mock: getting current user");
        pause(self.delays.current_user).await;
        Ok(Some(test_user()))
    }

    async fn sign_out(&self) -> Result<()> {
        tracing::info!("mock: signing out");
        pause(self.delays.sign_out).await;
        Ok(())
    }

    async fn update_user_profile(
        &self,
        user_id: &str,
        updates: Map<String, Value>,
    ) -> Result<UserProfile> {
        tracing::info!(user_id, fields = updates.len(), "mock: updating user profile");
        let mut doc = Map::new();
        doc.insert("$id".to_string(), Value::from(user_id));
        doc.extend(updates.into_iter().map(|(k, v)| {
            let v = profile_value(&k, v);
            (k, v)
        }));
        doc.insert("$updatedAt".to_string(), Value::from(now_iso()));
        serde_json::from_value(Value::Object(doc))
            .map_err(|e| BackendError::Unknown {
                status: None,
                kind: None,
                message: e.to_string(),
            })
    }

    async fn get_user_by_id(&self, user_id: &str) -> Result<UserProfile> {
        tracing::info!(user_id, "mock: getting user by id");
        Ok(UserProfile {
            id: user_id.to_string(),
            created_at: None,
            updated_at: None,
            ..test_user()
        })
    }

    async fn reset_password(&self, email: &str) -> Result<Token> {
        tracing::info!(email, "mock: password reset requested");
        Ok(token("mock-recovery-id", Some(iso_in(ChronoDuration::hours(1)))))
    }

    async fn complete_password_reset(
        &self,
        user_id: &str,
        _secret: &str,
        _password: &str,
        _confirm_password: &str,
    ) -> Result<Token> {
        tracing::info!(user_id, "mock: completing password reset");
        Ok(token(user_id, None))
    }

    async fn list_sessions(&self) -> Result<SessionList> {
        tracing::info!("mock: listing sessions");
        Ok(SessionList {
            total: 1,
            sessions: vec![mock_session(MOCK_SESSION_ID.to_string())],
        })
    }

    async fn delete_session(&self, session_id: &str) -> Result<()> {
        tracing::info!(session_id, "mock: deleting session");
        Ok(())
    }

    async fn delete_all_sessions(&self) -> Result<()> {
        tracing::info!("mock: deleting all sessions");
        Ok(())
    }

    async fn send_verification_email(&self) -> Result<Token> {
        tracing::info!("mock: sending verification email");
        Ok(token("mock-verification-id", Some(iso_in(ChronoDuration::hours(24)))))
    }

    async fn verify_email(&self, user_id: &str, _secret: &str) -> Result<Token> {
        tracing::info!(user_id, "mock: verifying email");
        let mut t = token(user_id, None);
        t.extra.insert("emailVerification".to_string(), Value::Bool(true));
        Ok(t)
    }
}
