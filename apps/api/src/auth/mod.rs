//! Auth gateway: third-party sign-in, server-side sessions, and a sign-in /
//! sign-out event stream.

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tokio::sync::broadcast;
use tracing::{info, warn};
use uuid::Uuid;

use crate::storage::{KeyValueStorage, StorageError};

pub mod extractor;
pub mod google;
pub mod handlers;

pub use extractor::CurrentUser;
pub use google::GoogleIdentityProvider;

const EVENT_CAPACITY: usize = 64;

#[derive(Debug, Error)]
pub enum AuthError {
    #[error("Invalid identity token: {0}")]
    InvalidToken(String),

    #[error("Identity provider request failed: {0}")]
    Provider(#[from] reqwest::Error),

    #[error("Session storage failed: {0}")]
    Storage(#[from] StorageError),

    #[error("Session serialization failed: {0}")]
    Serialize(#[from] serde_json::Error),
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AuthUser {
    pub uid: String,
    pub display_name: Option<String>,
    pub email: Option<String>,
    #[serde(rename = "photoURL")]
    pub photo_url: Option<String>,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Session {
    pub token: String,
    pub user: AuthUser,
}

/// Session change notification, the server-side counterpart of an
/// auth-state listener.
#[derive(Debug, Clone, PartialEq)]
pub enum AuthEvent {
    SignedIn(AuthUser),
    SignedOut { uid: String },
}

/// Verifies an identity token issued by the sign-in popup.
#[async_trait]
pub trait IdentityProvider: Send + Sync {
    async fn verify(&self, id_token: &str) -> Result<AuthUser, AuthError>;
}

#[derive(Clone)]
pub struct AuthGateway {
    provider: Arc<dyn IdentityProvider>,
    storage: Arc<dyn KeyValueStorage>,
    events: broadcast::Sender<AuthEvent>,
    session_ttl: Duration,
}

impl AuthGateway {
    pub fn new(
        provider: Arc<dyn IdentityProvider>,
        storage: Arc<dyn KeyValueStorage>,
        session_ttl: Duration,
    ) -> Self {
        let (events, _) = broadcast::channel(EVENT_CAPACITY);
        Self {
            provider,
            storage,
            events,
            session_ttl,
        }
    }

    fn session_key(token: &str) -> String {
        format!("gradindstud:session:{token}")
    }

    pub async fn sign_in(&self, id_token: &str) -> Result<Session, AuthError> {
        let user = self.provider.verify(id_token).await?;
        let token = Uuid::new_v4().simple().to_string();

        let raw = serde_json::to_string(&user)?;
        self.storage
            .set_with_ttl(&Self::session_key(&token), &raw, self.session_ttl)
            .await?;

        info!("User {} signed in", user.uid);
        // No subscribers is fine.
        let _ = self.events.send(AuthEvent::SignedIn(user.clone()));

        Ok(Session { token, user })
    }

    /// Ends the session. Unknown tokens are ignored.
    pub async fn sign_out(&self, token: &str) -> Result<(), AuthError> {
        let Some(user) = self.current_user(token).await else {
            return Ok(());
        };
        self.storage.remove(&Self::session_key(token)).await?;

        info!("User {} signed out", user.uid);
        let _ = self.events.send(AuthEvent::SignedOut { uid: user.uid });
        Ok(())
    }

    /// The user behind `token`, or `None` for unknown, expired or unreadable
    /// sessions.
    pub async fn current_user(&self, token: &str) -> Option<AuthUser> {
        let raw = match self.storage.get(&Self::session_key(token)).await {
            Ok(raw) => raw?,
            Err(e) => {
                warn!("Failed to read session: {e}");
                return None;
            }
        };
        match serde_json::from_str(&raw) {
            Ok(user) => Some(user),
            Err(e) => {
                warn!("Discarding unreadable session: {e}");
                None
            }
        }
    }

    pub fn subscribe(&self) -> broadcast::Receiver<AuthEvent> {
        self.events.subscribe()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::MemoryStorage;
    use crate::test_support::FakeIdentityProvider;

    fn gateway() -> AuthGateway {
        AuthGateway::new(
            Arc::new(FakeIdentityProvider),
            Arc::new(MemoryStorage::new()),
            Duration::from_secs(60),
        )
    }

    #[tokio::test]
    async fn test_sign_in_creates_session() {
        let auth = gateway();
        let session = auth.sign_in("valid:alice").await.unwrap();
        assert_eq!(session.user.uid, "alice");

        let user = auth.current_user(&session.token).await.unwrap();
        assert_eq!(user, session.user);
    }

    #[tokio::test]
    async fn test_invalid_token_is_rejected() {
        let auth = gateway();
        let err = auth.sign_in("forged").await.unwrap_err();
        assert!(matches!(err, AuthError::InvalidToken(_)));
    }

    #[tokio::test]
    async fn test_sign_out_ends_session() {
        let auth = gateway();
        let session = auth.sign_in("valid:bob").await.unwrap();
        auth.sign_out(&session.token).await.unwrap();
        assert!(auth.current_user(&session.token).await.is_none());

        // Signing out twice is harmless.
        auth.sign_out(&session.token).await.unwrap();
    }

    #[tokio::test(start_paused = true)]
    async fn test_session_expires_after_ttl() {
        let auth = gateway();
        let session = auth.sign_in("valid:dave").await.unwrap();

        tokio::time::advance(Duration::from_secs(59)).await;
        assert!(auth.current_user(&session.token).await.is_some());

        tokio::time::advance(Duration::from_secs(2)).await;
        assert!(auth.current_user(&session.token).await.is_none());
    }

    #[tokio::test]
    async fn test_subscribers_see_sign_in_and_sign_out() {
        let auth = gateway();
        let mut events = auth.subscribe();

        let session = auth.sign_in("valid:carol").await.unwrap();
        auth.sign_out(&session.token).await.unwrap();

        assert_eq!(
            events.recv().await.unwrap(),
            AuthEvent::SignedIn(session.user.clone())
        );
        assert_eq!(
            events.recv().await.unwrap(),
            AuthEvent::SignedOut {
                uid: "carol".to_string()
            }
        );
    }

    #[test]
    fn test_user_serializes_with_client_field_names() {
        let user = AuthUser {
            uid: "u1".to_string(),
            display_name: Some("Ada".to_string()),
            email: None,
            photo_url: Some("https://example.com/a.png".to_string()),
        };
        let json = serde_json::to_value(&user).unwrap();
        assert_eq!(json["displayName"], "Ada");
        assert_eq!(json["photoURL"], "https://example.com/a.png");
    }
}
