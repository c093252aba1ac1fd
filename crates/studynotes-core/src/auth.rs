//! The auth facade front ends talk to, plus the signed-in user state they display.

use std::sync::Arc;

use serde_json::{Map, Value};

use crate::backend::{
    Account, AppwriteBackend, AuthBackend, BackendKind, MockBackend, Result, Session, SessionList,
    Token, UserProfile,
};
use crate::config::BackendConfig;

/// One stable API over whichever backend was chosen at startup.
#[derive(Clone)]
pub struct AuthService {
    backend: Arc<dyn AuthBackend>,
}

impl AuthService {
    pub fn new(backend: Arc<dyn AuthBackend>) -> Self {
        Self { backend }
    }

    /// Pick the backend once: the remote service if the config has a real project id
    /// and the client builds, the mock otherwise.
    pub fn from_config(config: &BackendConfig) -> Self {
        if !config.is_configured() {
            tracing::info!("backend not configured, using mock service");
            return Self::new(Arc::new(MockBackend::new()));
        }
        match AppwriteBackend::new(config) {
            Ok(backend) => {
                tracing::info!(endpoint = %config.endpoint, "using remote backend");
                Self::new(Arc::new(backend))
            }
            Err(e) => {
                tracing::warn!(error = %e, "remote backend unavailable, using mock service");
                Self::new(Arc::new(MockBackend::new()))
            }
        }
    }

    pub fn kind(&self) -> BackendKind {
        self.backend.kind()
    }

    pub async fn create_user(
        &self,
        email: &str,
        password: &str,
        username: &str,
    ) -> Result<UserProfile> {
        self.backend.create_user(email, password, username).await
    }

    pub async fn sign_in(&self, email: &str, password: &str) -> Result<Session> {
        self.backend.sign_in(email, password).await
    }

    /// The signed-in user's profile. Failures are logged and reported as "nobody signed in".
    pub async fn get_current_user(&self) -> Option<UserProfile> {
        match self.backend.get_current_user().await {
            Ok(user) => user,
            Err(e) => {
                tracing::info!(error = %e, "no current user");
                None
            }
        }
    }

    pub async fn sign_out(&self) -> Result<()> {
        self.backend.sign_out().await
    }

    pub async fn get_account(&self) -> Result<Account> {
        self.backend.get_account().await
    }

    pub async fn update_user_profile(
        &self,
        user_id: &str,
        updates: Map<String, Value>,
    ) -> Result<UserProfile> {
        self.backend.update_user_profile(user_id, updates).await
    }

    pub async fn get_user_by_id(&self, user_id: &str) -> Result<UserProfile> {
        self.backend.get_user_by_id(user_id).await
    }

    pub async fn reset_password(&self, email: &str) -> Result<Token> {
        self.backend.reset_password(email).await
    }

    pub async fn complete_password_reset(
        &self,
        user_id: &str,
        secret: &str,
        password: &str,
        confirm_password: &str,
    ) -> Result<Token> {
        self.backend
            .complete_password_reset(user_id, secret, password, confirm_password)
            .await
    }

    pub async fn list_sessions(&self) -> Result<SessionList> {
        self.backend.list_sessions().await
    }

    pub async fn delete_session(&self, session_id: &str) -> Result<()> {
        self.backend.delete_session(session_id).await
    }

    pub async fn delete_all_sessions(&self) -> Result<()> {
        self.backend.delete_all_sessions().await
    }

    pub async fn send_verification_email(&self) -> Result<Token> {
        self.backend.send_verification_email().await
    }

    pub async fn verify_email(&self, user_id: &str, secret: &str) -> Result<Token> {
        self.backend.verify_email(user_id, secret).await
    }
}

impl std::fmt::Debug for AuthService {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AuthService").field("kind", &self.kind()).finish()
    }
}

/// Who is signed in, as shown by the UI. Starts out loading until [`AuthState::restore`] runs.
#[derive(Debug, Clone)]
pub struct AuthState {
    user: Option<UserProfile>,
    loading: bool,
}

impl Default for AuthState {
    fn default() -> Self {
        Self {
            user: None,
            loading: true,
        }
    }
}

impl AuthState {
    /// Ask the backend for the current user once and stop loading.
    pub async fn restore(service: &AuthService) -> Self {
        Self {
            user: service.get_current_user().await,
            loading: false,
        }
    }

    pub fn user(&self) -> Option<&UserProfile> {
        self.user.as_ref()
    }

    pub fn is_loading(&self) -> bool {
        self.loading
    }

    pub fn is_signed_in(&self) -> bool {
        self.user.is_some()
    }

    pub fn set_user(&mut self, user: Option<UserProfile>) {
        self.user = user;
        self.loading = false;
    }

    pub fn clear(&mut self) {
        self.set_user(None);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::backend::MockDelays;

    #[test]
    fn placeholder_config_selects_mock() {
        let service = AuthService::from_config(&BackendConfig::default());
        assert_eq!(service.kind(), BackendKind::Mock);
    }

    #[test]
    fn broken_endpoint_falls_back_to_mock() {
        let config = BackendConfig {
            endpoint: "::not a url::".into(),
            project_id: "real-project".into(),
            ..Default::default()
        };
        assert_eq!(AuthService::from_config(&config).kind(), BackendKind::Mock);
    }

    #[test]
    fn configured_project_selects_remote() {
        let config = BackendConfig {
            project_id: "real-project".into(),
            ..Default::default()
        };
        assert_eq!(AuthService::from_config(&config).kind(), BackendKind::Appwrite);
    }

    #[test]
    fn state_starts_loading() {
        let mut state = AuthState::default();
        assert!(state.is_loading());
        assert!(!state.is_signed_in());
        state.set_user(None);
        assert!(!state.is_loading());
    }

    #[tokio::test]
    async fn clear_signs_out_restored_user() {
        let service =
            AuthService::new(Arc::new(MockBackend::new().with_delays(MockDelays::none())));
        let mut state = AuthState::restore(&service).await;
        assert!(state.is_signed_in());
        state.clear();
        assert!(!state.is_signed_in());
        assert!(!state.is_loading());
    }
}
