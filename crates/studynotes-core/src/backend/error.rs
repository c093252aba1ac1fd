//! Error kinds surfaced by any [`AuthBackend`](super::AuthBackend).

use serde::Deserialize;

/// Closed set of backend failures. Remote errors keep their HTTP status and error type.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum BackendError {
    /// The request never produced a response (DNS, TLS, connection reset, timeout).
    #[error("network error: {message}")]
    Network { message: String },

    /// The service rejected the credentials or the session (401/403).
    #[error("authentication failed ({status}): {message}")]
    Auth {
        status: u16,
        kind: Option<String>,
        message: String,
    },

    /// The account, session or document does not exist (404).
    #[error("not found ({status}): {message}")]
    NotFound {
        status: u16,
        kind: Option<String>,
        message: String,
    },

    /// Any other failure, including responses we could not decode.
    #[error("backend error: {message}")]
    Unknown {
        status: Option<u16>,
        kind: Option<String>,
        message: String,
    },

    /// The remote client could not be constructed from the config.
    #[error("backend setup failed: {0}")]
    Setup(String),
}

/// Error body returned by the account/database service.
#[derive(Debug, Deserialize)]
struct ErrorBody {
    message: String,
    #[serde(rename = "type", default)]
    kind: Option<String>,
}

impl BackendError {
    /// Classify a non-success response by status, using the JSON error body when present.
    pub fn from_response(status: u16, body: &str) -> Self {
        let (message, kind) = match serde_json::from_str::<ErrorBody>(body) {
            Ok(b) => (b.message, b.kind),
            Err(_) if body.trim().is_empty() => (format!("HTTP {status}"), None),
            Err(_) => (body.trim().to_string(), None),
        };
        match status {
            401 | 403 => Self::Auth { status, kind, message },
            404 => Self::NotFound { status, kind, message },
            _ => Self::Unknown {
                status: Some(status),
                kind,
                message,
            },
        }
    }

    /// HTTP status if the error came from a response.
    pub fn status(&self) -> Option<u16> {
        match self {
            Self::Auth { status, .. } | Self::NotFound { status, .. } => Some(*status),
            Self::Unknown { status, .. } => *status,
            Self::Network { .. } | Self::Setup(_) => None,
        }
    }

    /// Short message suitable for showing to the end user.
    pub fn user_message(&self) -> String {
        match self {
            Self::Network { .. } => {
                "Could not reach the server. Check your connection.".to_string()
            }
            Self::Auth { message, .. } | Self::NotFound { message, .. } => message.clone(),
            Self::Unknown { message, .. } => message.clone(),
            Self::Setup(_) => "The app is not connected to a server.".to_string(),
        }
    }
}

impl From<reqwest::Error> for BackendError {
    fn from(e: reqwest::Error) -> Self {
        if e.is_decode() || e.is_status() {
            Self::Unknown {
                status: e.status().map(|s| s.as_u16()),
                kind: None,
                message: e.to_string(),
            }
        } else {
            Self::Network {
                message: e.to_string(),
            }
        }
    }
}
