//! Account and profile operations behind one trait, with a remote and a mock implementation.
//!
//! Which one is used is decided once, when the [`AuthService`](crate::auth::AuthService)
//! is built from a [`BackendConfig`](crate::config::BackendConfig).

use std::fmt;

use async_trait::async_trait;
use serde_json::{Map, Value};

pub mod appwrite;
pub mod error;
pub mod mock;
pub mod model;

pub use appwrite::AppwriteBackend;
pub use error::BackendError;
pub use mock::{MockBackend, MockDelays};
pub use model::{Account, Session, SessionList, Token, UserProfile};

pub type Result<T> = std::result::Result<T, BackendError>;

/// Which implementation sits behind a backend.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BackendKind {
    Mock,
    Appwrite,
}

impl fmt::Display for BackendKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Mock => f.write_str("mock"),
            Self::Appwrite => f.write_str("appwrite"),
        }
    }
}

/// Authentication, session and profile operations.
#[async_trait]
pub trait AuthBackend: Send + Sync {
    fn kind(&self) -> BackendKind;

    /// Create an account, sign in, and create the matching profile document.
    async fn create_user(&self, email: &str, password: &str, username: &str) -> Result<UserProfile>;

    async fn sign_in(&self, email: &str, password: &str) -> Result<Session>;

    async fn get_account(&self) -> Result<Account>;

    /// Profile document of the signed-in account, `None` if it has none.
    async fn get_current_user(&self) -> Result<Option<UserProfile>>;

    /// Ends the current session.
    async fn sign_out(&self) -> Result<()>;

    async fn update_user_profile(
        &self,
        user_id: &str,
        updates: Map<String, Value>,
    ) -> Result<UserProfile>;

    async fn get_user_by_id(&self, user_id: &str) -> Result<UserProfile>;

    /// Starts password recovery; the service mails a reset link.
    async fn reset_password(&self, email: &str) -> Result<Token>;

    async fn complete_password_reset(
        &self,
        user_id: &str,
        secret: &str,
        password: &str,
        confirm_password: &str,
    ) -> Result<Token>;

    async fn list_sessions(&self) -> Result<SessionList>;

    async fn delete_session(&self, session_id: &str) -> Result<()>;

    async fn delete_all_sessions(&self) -> Result<()>;

    async fn send_verification_email(&self) -> Result<Token>;

    async fn verify_email(&self, user_id: &str, secret: &str) -> Result<Token>;
}

/// Avatar URL generated from the username's initials.
pub fn avatar_url(username: &str) -> String {
    let mut url = url::Url::parse("https://api.dicebear.com/6.x/initials/svg")
        .expect("static avatar url is valid");
    url.query_pairs_mut().append_pair("seed", username);
    url.into()
}
