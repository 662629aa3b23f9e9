//! Identity provider seam and its HTTP implementation.
//!
//! The provider speaks a password-grant style protocol: credentials are
//! exchanged for an access token plus a user record, and subsequent calls
//! carry the token as a bearer header. Rejections arrive as a JSON body
//! whose message is user-safe and passed through verbatim.

use crate::error::{AuthError, Result};
use crate::types::{Session, SessionChange, UserIdentity};
use async_trait::async_trait;
use chrono::Utc;
use core_runtime::http::{HttpClient, HttpMethod, HttpRequest, HttpResponse};
use serde::Deserialize;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::{broadcast, RwLock};
use tracing::{debug, warn};

/// Timeout for identity provider requests.
const REQUEST_TIMEOUT: Duration = Duration::from_secs(15);

/// Buffer size for the session change broadcast channel.
const CHANGE_BUFFER_SIZE: usize = 16;

/// Seam to the external identity service.
///
/// Implementations push a [`SessionChange`] through [`subscribe`] streams
/// whenever the session state changes, whether or not the change was
/// initiated through this process.
///
/// [`subscribe`]: IdentityProvider::subscribe
#[async_trait]
pub trait IdentityProvider: Send + Sync {
    /// Looks up a restorable session, for example from a persisted token.
    ///
    /// `Ok(None)` means "nobody is signed in" and is not an error.
    async fn restore_session(&self) -> Result<Option<Session>>;

    /// Exchanges credentials for a session.
    ///
    /// A rejection carries the provider's own user-safe message.
    async fn sign_in(&self, email: &str, password: &str) -> Result<Session>;

    /// Registers a new account with a chart-country preference.
    async fn sign_up(&self, email: &str, password: &str, country: &str) -> Result<Session>;

    /// Ends the current session.
    async fn sign_out(&self) -> Result<()>;

    /// Subscribes to session state changes.
    fn subscribe(&self) -> broadcast::Receiver<SessionChange>;
}

#[derive(serde::Serialize)]
struct CredentialsBody<'a> {
    email: &'a str,
    password: &'a str,
}

#[derive(serde::Serialize)]
struct SignUpBody<'a> {
    email: &'a str,
    password: &'a str,
    data: SignUpMetadata<'a>,
}

#[derive(serde::Serialize)]
struct SignUpMetadata<'a> {
    country: &'a str,
}

#[derive(Debug, Deserialize)]
struct SessionPayload {
    access_token: String,
    #[serde(default)]
    expires_in: Option<i64>,
    user: UserPayload,
}

#[derive(Debug, Deserialize)]
struct UserPayload {
    id: String,
    email: String,
    #[serde(default)]
    user_metadata: serde_json::Value,
}

impl UserPayload {
    fn country(&self) -> Option<String> {
        self.user_metadata
            .get("country")
            .and_then(|v| v.as_str())
            .map(str::to_string)
    }
}

/// Shapes a rejection body can take; the first present message wins.
#[derive(Debug, Deserialize)]
struct RejectionBody {
    #[serde(default)]
    error_description: Option<String>,
    #[serde(default)]
    msg: Option<String>,
    #[serde(default)]
    error: Option<String>,
}

impl RejectionBody {
    fn message(self) -> Option<String> {
        self.error_description.or(self.msg).or(self.error)
    }
}

/// Production [`IdentityProvider`] over the HTTP seam.
pub struct HttpIdentityProvider {
    http_client: Arc<dyn HttpClient>,
    base_url: String,
    access_token: RwLock<Option<String>>,
    changes: broadcast::Sender<SessionChange>,
}

impl HttpIdentityProvider {
    pub fn new(http_client: Arc<dyn HttpClient>, base_url: impl Into<String>) -> Self {
        let (changes, _) = broadcast::channel(CHANGE_BUFFER_SIZE);
        Self {
            http_client,
            base_url: base_url.into(),
            access_token: RwLock::new(None),
            changes,
        }
    }

    async fn execute(&self, request: HttpRequest) -> Result<HttpResponse> {
        self.http_client.execute(request).await.map_err(|e| {
            warn!(error = %e, "identity provider request failed");
            AuthError::ProviderUnavailable("request failed".to_string())
        })
    }

    /// Maps a non-2xx response to the right error class.
    fn rejection_from(response: &HttpResponse) -> AuthError {
        if response.is_client_error() {
            if let Ok(body) = response.json::<RejectionBody>() {
                if let Some(message) = body.message() {
                    return AuthError::Rejected(message);
                }
            }
        }
        warn!(
            status = response.status,
            "identity provider returned unusable error response"
        );
        AuthError::ProviderUnavailable(format!("status {}", response.status))
    }

    async fn accept_session(&self, payload: SessionPayload) -> Session {
        let session = Session {
            user: UserIdentity {
                id: payload.user.id.clone(),
                email: payload.user.email.clone(),
            },
            country: payload.user.country(),
            expires_at: payload
                .expires_in
                .map(|secs| Utc::now() + chrono::Duration::seconds(secs)),
        };

        *self.access_token.write().await = Some(payload.access_token);
        let _ = self.changes.send(SessionChange::SignedIn(session.clone()));
        session
    }
}

#[async_trait]
impl IdentityProvider for HttpIdentityProvider {
    async fn restore_session(&self) -> Result<Option<Session>> {
        let token = match self.access_token.read().await.clone() {
            Some(token) => token,
            None => return Ok(None),
        };

        let request = HttpRequest::new(HttpMethod::Get, format!("{}/user", self.base_url))
            .header("Authorization", format!("Bearer {}", token))
            .timeout(REQUEST_TIMEOUT);

        let response = self.execute(request).await?;
        if response.is_client_error() {
            debug!("stored token no longer valid");
            *self.access_token.write().await = None;
            return Ok(None);
        }
        if !response.is_success() {
            return Err(Self::rejection_from(&response));
        }

        let user: UserPayload = response.json().map_err(|e| {
            warn!(error = %e, "identity provider user payload failed to decode");
            AuthError::ProviderUnavailable("malformed user payload".to_string())
        })?;

        Ok(Some(Session {
            country: user.country(),
            user: UserIdentity {
                id: user.id,
                email: user.email,
            },
            expires_at: None,
        }))
    }

    async fn sign_in(&self, email: &str, password: &str) -> Result<Session> {
        let request = HttpRequest::new(
            HttpMethod::Post,
            format!("{}/token?grant_type=password", self.base_url),
        )
        .json(&CredentialsBody { email, password })
        .map_err(|e| AuthError::ProviderUnavailable(e.to_string()))?
        .timeout(REQUEST_TIMEOUT);

        let response = self.execute(request).await?;
        if !response.is_success() {
            return Err(Self::rejection_from(&response));
        }

        let payload: SessionPayload = response.json().map_err(|e| {
            warn!(error = %e, "identity provider session payload failed to decode");
            AuthError::ProviderUnavailable("malformed session payload".to_string())
        })?;

        Ok(self.accept_session(payload).await)
    }

    async fn sign_up(&self, email: &str, password: &str, country: &str) -> Result<Session> {
        let request = HttpRequest::new(HttpMethod::Post, format!("{}/signup", self.base_url))
            .json(&SignUpBody {
                email,
                password,
                data: SignUpMetadata { country },
            })
            .map_err(|e| AuthError::ProviderUnavailable(e.to_string()))?
            .timeout(REQUEST_TIMEOUT);

        let response = self.execute(request).await?;
        if !response.is_success() {
            return Err(Self::rejection_from(&response));
        }

        let payload: SessionPayload = response.json().map_err(|e| {
            warn!(error = %e, "identity provider session payload failed to decode");
            AuthError::ProviderUnavailable("malformed session payload".to_string())
        })?;

        Ok(self.accept_session(payload).await)
    }

    async fn sign_out(&self) -> Result<()> {
        let token = self.access_token.write().await.take();

        if let Some(token) = token {
            let request = HttpRequest::new(HttpMethod::Post, format!("{}/logout", self.base_url))
                .header("Authorization", format!("Bearer {}", token))
                .timeout(REQUEST_TIMEOUT);

            // Best effort: the local session ends even if the revocation
            // call fails.
            if let Err(e) = self.execute(request).await {
                warn!(error = %e, "token revocation failed, session ended locally");
            }
        }

        let _ = self.changes.send(SessionChange::SignedOut);
        Ok(())
    }

    fn subscribe(&self) -> broadcast::Receiver<SessionChange> {
        self.changes.subscribe()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use bytes::Bytes;
    use mockall::mock;
    use std::collections::HashMap;

    mock! {
        pub Http {}

        #[async_trait]
        impl HttpClient for Http {
            async fn execute(
                &self,
                request: HttpRequest,
            ) -> core_runtime::http::Result<HttpResponse>;
        }
    }

    fn response(status: u16, body: &str) -> HttpResponse {
        HttpResponse {
            status,
            headers: HashMap::new(),
            body: Bytes::from(body.to_string()),
        }
    }

    const SESSION_JSON: &str = r#"{
        "access_token": "jwt-abc",
        "expires_in": 3600,
        "user": {
            "id": "user-1",
            "email": "a@example.com",
            "user_metadata": {"country": "DE"}
        }
    }"#;

    #[tokio::test]
    async fn test_sign_in_parses_session_and_country() {
        let mut mock = MockHttp::new();
        mock.expect_execute()
            .withf(|req| {
                req.url.ends_with("/token?grant_type=password")
                    && req.method == HttpMethod::Post
                    && req.body.is_some()
            })
            .times(1)
            .returning(|_| Ok(response(200, SESSION_JSON)));

        let provider = HttpIdentityProvider::new(Arc::new(mock), "https://id.test/auth/v1");
        let session = provider.sign_in("a@example.com", "hunter2").await.unwrap();

        assert_eq!(session.user.email, "a@example.com");
        assert_eq!(session.country(), "DE");
        assert!(session.expires_at.is_some());
    }

    #[tokio::test]
    async fn test_sign_in_rejection_passes_message_through() {
        let mut mock = MockHttp::new();
        mock.expect_execute().returning(|_| {
            Ok(response(
                400,
                r#"{"error": "invalid_grant", "error_description": "Invalid login credentials"}"#,
            ))
        });

        let provider = HttpIdentityProvider::new(Arc::new(mock), "https://id.test/auth/v1");
        let err = provider.sign_in("a@example.com", "wrong").await.unwrap_err();

        assert_eq!(err, AuthError::Rejected("Invalid login credentials".to_string()));
    }

    #[tokio::test]
    async fn test_transport_failure_is_provider_unavailable() {
        let mut mock = MockHttp::new();
        mock.expect_execute().returning(|_| {
            Err(core_runtime::http::HttpError::Transport(
                "connection refused".to_string(),
            ))
        });

        let provider = HttpIdentityProvider::new(Arc::new(mock), "https://id.test/auth/v1");
        let err = provider.sign_in("a@example.com", "pw").await.unwrap_err();

        assert!(matches!(err, AuthError::ProviderUnavailable(_)));
    }

    #[tokio::test]
    async fn test_restore_without_token_skips_network() {
        let mut mock = MockHttp::new();
        mock.expect_execute().times(0);

        let provider = HttpIdentityProvider::new(Arc::new(mock), "https://id.test/auth/v1");
        assert!(provider.restore_session().await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_sign_in_then_restore_uses_bearer_token() {
        let mut mock = MockHttp::new();
        mock.expect_execute()
            .withf(|req| req.url.ends_with("/token?grant_type=password"))
            .returning(|_| Ok(response(200, SESSION_JSON)));
        mock.expect_execute()
            .withf(|req| {
                req.url.ends_with("/user")
                    && req.headers.get("Authorization").map(String::as_str)
                        == Some("Bearer jwt-abc")
            })
            .times(1)
            .returning(|_| {
                Ok(response(
                    200,
                    r#"{"id": "user-1", "email": "a@example.com", "user_metadata": {}}"#,
                ))
            });

        let provider = HttpIdentityProvider::new(Arc::new(mock), "https://id.test/auth/v1");
        provider.sign_in("a@example.com", "hunter2").await.unwrap();

        let restored = provider.restore_session().await.unwrap().unwrap();
        assert_eq!(restored.user.id, "user-1");
        assert_eq!(restored.country(), "US");
    }

    #[tokio::test]
    async fn test_sign_out_broadcasts_signed_out() {
        let mock = MockHttp::new();
        let provider = HttpIdentityProvider::new(Arc::new(mock), "https://id.test/auth/v1");
        let mut changes = provider.subscribe();

        provider.sign_out().await.unwrap();
        assert_eq!(changes.try_recv().unwrap(), SessionChange::SignedOut);
    }

    #[tokio::test]
    async fn test_sign_up_sends_country_metadata() {
        let mut mock = MockHttp::new();
        mock.expect_execute()
            .withf(|req| {
                let body = req.body.as_ref().map(|b| String::from_utf8_lossy(b).to_string());
                req.url.ends_with("/signup")
                    && body.is_some_and(|b| b.contains(r#""country":"SE""#))
            })
            .times(1)
            .returning(|_| Ok(response(200, SESSION_JSON)));

        let provider = HttpIdentityProvider::new(Arc::new(mock), "https://id.test/auth/v1");
        provider.sign_up("b@example.com", "pw", "SE").await.unwrap();
    }
}
