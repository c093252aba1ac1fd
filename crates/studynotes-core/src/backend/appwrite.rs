//! Client for an Appwrite server's REST API: accounts, sessions and the users collection.
//!
//! Sessions are kept in the client's cookie store, so one `AppwriteBackend` is one
//! signed-in device.

use async_trait::async_trait;
use reqwest::header::{HeaderMap, HeaderValue, CONTENT_TYPE, ORIGIN};
use reqwest::{Client, Method, RequestBuilder};
use serde::de::DeserializeOwned;
use serde_json::{json, Map, Value};
use url::Url;

use super::model::{Account, DocumentList, Session, SessionList, Token, UserProfile};
use super::{AuthBackend, BackendError, BackendKind, Result};
use crate::config::BackendConfig;

pub const RESPONSE_FORMAT: &str = "1.5.0";
pub const DEFAULT_RECOVERY_URL: &str = "https://studynotes.app/reset-password";
pub const DEFAULT_VERIFICATION_URL: &str = "https://studynotes.app/verify-email";

/// Server-generated id marker.
const UNIQUE_ID: &str = "unique()";

#[derive(Debug, Clone)]
pub struct AppwriteBackend {
    client: Client,
    base: Url,
    database_id: String,
    user_collection_id: String,
    recovery_url: String,
    verification_url: String,
}

impl AppwriteBackend {
    /// Build a client from the config. Fails on a malformed endpoint or if the HTTP client
    /// can't be built.
    pub fn new(config: &BackendConfig) -> Result<Self> {
        let base = Url::parse(config.endpoint.trim()).map_err(|e| {
            BackendError::Setup(format!("invalid endpoint {:?}: {e}", config.endpoint))
        })?;
        if !matches!(base.scheme(), "http" | "https") || base.cannot_be_a_base() {
            return Err(BackendError::Setup(format!(
                "endpoint must be an http(s) URL: {}",
                config.endpoint
            )));
        }

        let mut headers = HeaderMap::new();
        headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));
        headers.insert("x-appwrite-response-format", HeaderValue::from_static(RESPONSE_FORMAT));
        headers.insert("x-appwrite-project", header_value(&config.project_id)?);
        let origin = format!("appwrite-{}://{}", std::env::consts::OS, config.platform);
        headers.insert(ORIGIN, header_value(&origin)?);

        let client = Client::builder()
            .cookie_store(true)
            .default_headers(headers)
            .build()
            .map_err(|e| BackendError::Setup(e.to_string()))?;

        Ok(Self {
            client,
            base,
            database_id: config.database_id.clone(),
            user_collection_id: config.user_collection_id.clone(),
            recovery_url: DEFAULT_RECOVERY_URL.to_string(),
            verification_url: DEFAULT_VERIFICATION_URL.to_string(),
        })
    }

    /// Page the recovery email links to.
    pub fn with_recovery_url(mut self, url: impl Into<String>) -> Self {
        self.recovery_url = url.into();
        self
    }

    /// Page the verification email links to.
    pub fn with_verification_url(mut self, url: impl Into<String>) -> Self {
        self.verification_url = url.into();
        self
    }

    fn url(&self, segments: &[&str]) -> Result<Url> {
        let mut url = self.base.clone();
        url.path_segments_mut()
            .map_err(|_| BackendError::Setup(format!("endpoint cannot be a base: {}", self.base)))?
            .pop_if_empty()
            .extend(segments);
        Ok(url)
    }

    fn documents_url(&self, document_id: Option<&str>) -> Result<Url> {
        let mut segments = vec![
            "databases",
            self.database_id.as_str(),
            "collections",
            self.user_collection_id.as_str(),
            "documents",
        ];
        segments.extend(document_id);
        self.url(&segments)
    }

    fn request(&self, method: Method, url: Url) -> RequestBuilder {
        tracing::debug!(%method, %url, "appwrite request");
        self.client.request(method, url)
    }

    async fn send<T: DeserializeOwned>(&self, req: RequestBuilder) -> Result<T> {
        let resp = req.send().await?;
        let status = resp.status();
        if !status.is_success() {
            let body = resp.text().await.unwrap_or_default();
            let err = BackendError::from_response(status.as_u16(), &body);
            tracing::debug!(status = status.as_u16(), error = %err, "appwrite request failed");
            return Err(err);
        }
        Ok(resp.json::<T>().await?)
    }

    async fn send_empty(&self, req: RequestBuilder) -> Result<()> {
        let resp = req.send().await?;
        let status = resp.status();
        if !status.is_success() {
            let body = resp.text().await.unwrap_or_default();
            return Err(BackendError::from_response(status.as_u16(), &body));
        }
        Ok(())
    }
}

fn header_value(s: &str) -> Result<HeaderValue> {
    HeaderValue::from_str(s)
        .map_err(|e| BackendError::Setup(format!("invalid header value {s:?}: {e}")))
}

/// Query string value for `attribute == value`.
fn equal_query(attribute: &str, value: &str) -> String {
    json!({ "method": "equal", "attribute": attribute, "values": [value] }).to_string()
}

#[async_trait]
impl AuthBackend for AppwriteBackend {
    fn kind(&self) -> BackendKind {
        BackendKind::Appwrite
    }

    async fn create_user(
        &self,
        email: &str,
        password: &str,
        username: &str,
    ) -> Result<UserProfile> {
        let account: Account = self
            .send(self.request(Method::POST, self.url(&["account"])?).json(&json!({
                "userId": UNIQUE_ID,
                "email": email,
                "password": password,
                "name": username,
            })))
            .await?;
        tracing::info!(account_id = %account.id, "account created");

        self.sign_in(email, password).await?;

        self.send(self.request(Method::POST, self.documents_url(None)?).json(&json!({
            "documentId": UNIQUE_ID,
            "data": {
                "accountId": account.id,
                "username": username,
                "email": email,
                "firstName": username,
                "lastName": "",
                "phoneNumber": "",
            },
        })))
        .await
    }

    async fn sign_in(&self, email: &str, password: &str) -> Result<Session> {
        self.send(
            self.request(Method::POST, self.url(&["account", "sessions", "email"])?)
                .json(&json!({ "email": email, "password": password })),
        )
        .await
    }

    async fn get_account(&self) -> Result<Account> {
        self.send(self.request(Method::GET, self.url(&["account"])?)).await
    }

    async fn get_current_user(&self) -> Result<Option<UserProfile>> {
        let account = self.get_account().await?;
        let list: DocumentList<UserProfile> = self
            .send(
                self.request(Method::GET, self.documents_url(None)?)
                    .query(&[("queries[]", equal_query("accountId", &account.id))]),
            )
            .await?;
        Ok(list.documents.into_iter().next())
    }

    async fn sign_out(&self) -> Result<()> {
        self.delete_session("current").await
    }

    async fn update_user_profile(
        &self,
        user_id: &str,
        updates: Map<String, Value>,
    ) -> Result<UserProfile> {
        self.send(
            self.request(Method::PATCH, self.documents_url(Some(user_id))?)
                .json(&json!({ "data": updates })),
        )
        .await
    }

    async fn get_user_by_id(&self, user_id: &str) -> Result<UserProfile> {
        self.send(self.request(Method::GET, self.documents_url(Some(user_id))?))
            .await
    }

    async fn reset_password(&self, email: &str) -> Result<Token> {
        self.send(
            self.request(Method::POST, self.url(&["account", "recovery"])?)
                .json(&json!({ "email": email, "url": self.recovery_url })),
        )
        .await
    }

    async fn complete_password_reset(
        &self,
        user_id: &str,
        secret: &str,
        password: &str,
        confirm_password: &str,
    ) -> Result<Token> {
        self.send(
            self.request(Method::PUT, self.url(&["account", "recovery"])?).json(&json!({
                "userId": user_id,
                "secret": secret,
                "password": password,
                "passwordAgain": confirm_password,
            })),
        )
        .await
    }

    async fn list_sessions(&self) -> Result<SessionList> {
        self.send(self.request(Method::GET, self.url(&["account", "sessions"])?))
            .await
    }

    async fn delete_session(&self, session_id: &str) -> Result<()> {
        self.send_empty(self.request(
            Method::DELETE,
            self.url(&["account", "sessions", session_id])?,
        ))
        .await
    }

    async fn delete_all_sessions(&self) -> Result<()> {
        self.send_empty(self.request(Method::DELETE, self.url(&["account", "sessions"])?))
            .await
    }

    async fn send_verification_email(&self) -> Result<Token> {
        self.send(
            self.request(Method::POST, self.url(&["account", "verification"])?)
                .json(&json!({ "url": self.verification_url })),
        )
        .await
    }

    async fn verify_email(&self, user_id: &str, secret: &str) -> Result<Token> {
        self.send(
            self.request(Method::PUT, self.url(&["account", "verification"])?)
                .json(&json!({ "userId": user_id, "secret": secret })),
        )
        .await
    }
}
