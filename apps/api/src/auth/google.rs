use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;
use tracing::debug;

use super::{AuthError, AuthUser, IdentityProvider};

/// Validates Google ID tokens against the tokeninfo endpoint.
#[derive(Clone)]
pub struct GoogleIdentityProvider {
    client: Client,
    tokeninfo_url: String,
    client_id: Option<String>,
}

#[derive(Debug, Deserialize)]
struct TokenInfo {
    sub: String,
    aud: Option<String>,
    email: Option<String>,
    name: Option<String>,
    picture: Option<String>,
}

impl GoogleIdentityProvider {
    pub fn new(
        tokeninfo_url: String,
        client_id: Option<String>,
        timeout: Duration,
    ) -> Result<Self, reqwest::Error> {
        Ok(Self {
            client: Client::builder().timeout(timeout).build()?,
            tokeninfo_url,
            client_id,
        })
    }
}

#[async_trait]
impl IdentityProvider for GoogleIdentityProvider {
    async fn verify(&self, id_token: &str) -> Result<AuthUser, AuthError> {
        if id_token.trim().is_empty() {
            return Err(AuthError::InvalidToken("empty token".to_string()));
        }

        let response = self
            .client
            .get(&self.tokeninfo_url)
            .query(&[("id_token", id_token)])
            .send()
            .await?;

        if !response.status().is_success() {
            return Err(AuthError::InvalidToken(format!(
                "tokeninfo returned {}",
                response.status()
            )));
        }

        let info: TokenInfo = response.json().await?;
        if let Some(expected) = &self.client_id {
            if info.aud.as_deref() != Some(expected.as_str()) {
                return Err(AuthError::InvalidToken("audience mismatch".to_string()));
            }
        }

        debug!("Verified identity token for {}", info.sub);
        Ok(AuthUser {
            uid: info.sub,
            display_name: info.name,
            email: info.email,
            photo_url: info.picture,
        })
    }
}
