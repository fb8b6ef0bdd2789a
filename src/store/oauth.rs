//! OAuth2 access-token handling for the Drive backend.
//!
//! The server is started with a fixed credential set. The access token is
//! cached in memory; it is exchanged for a fresh one through the refresh
//! token whenever it is missing, known to be expired, or was rejected by the
//! store (see [`TokenProvider::invalidate`]).

use std::time::{Duration, Instant};

use serde::Deserialize;
use tokio::sync::RwLock;
use tracing::{debug, info};

use crate::error::StoreError;

/// Google's OAuth2 token endpoint.
pub const DEFAULT_TOKEN_URL: &str = "https://oauth2.googleapis.com/token";

/// Refresh this long before the reported expiry.
const EXPIRY_SKEW: Duration = Duration::from_secs(60);

/// Static OAuth2 credential set.
#[derive(Clone, Default)]
pub struct OAuthCredentials {
    pub client_id: Option<String>,
    pub client_secret: Option<String>,
    pub redirect_uri: Option<String>,
    pub access_token: Option<String>,
    pub refresh_token: Option<String>,
}

impl OAuthCredentials {
    /// Whether a refresh-token exchange is possible.
    pub fn can_refresh(&self) -> bool {
        self.refresh_token.is_some() && self.client_id.is_some() && self.client_secret.is_some()
    }
}

// Secrets stay out of logs.
impl std::fmt::Debug for OAuthCredentials {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("OAuthCredentials")
            .field("client_id", &self.client_id)
            .field("client_secret", &self.client_secret.as_ref().map(|_| "***"))
            .field("redirect_uri", &self.redirect_uri)
            .field("access_token", &self.access_token.as_ref().map(|_| "***"))
            .field("refresh_token", &self.refresh_token.as_ref().map(|_| "***"))
            .finish()
    }
}

struct CachedToken {
    value: String,
    expires_at: Option<Instant>,
}

impl CachedToken {
    fn is_fresh(&self) -> bool {
        match self.expires_at {
            Some(at) => Instant::now() + EXPIRY_SKEW < at,
            None => true,
        }
    }
}

#[derive(Debug, Deserialize)]
struct TokenResponse {
    access_token: String,
    #[serde(default)]
    expires_in: Option<u64>,
}

/// Hands out bearer tokens, refreshing them on demand.
pub struct TokenProvider {
    http: reqwest::Client,
    credentials: OAuthCredentials,
    token_url: String,
    cached: RwLock<Option<CachedToken>>,
}

impl TokenProvider {
    /// Create a provider seeded with the configured access token (if any).
    pub fn new(http: reqwest::Client, credentials: OAuthCredentials) -> Self {
        Self::with_token_url(http, credentials, DEFAULT_TOKEN_URL)
    }

    /// Create a provider that refreshes against a custom token endpoint.
    pub fn with_token_url(
        http: reqwest::Client,
        credentials: OAuthCredentials,
        token_url: impl Into<String>,
    ) -> Self {
        let cached = credentials.access_token.clone().map(|value| CachedToken {
            value,
            expires_at: None,
        });

        Self {
            http,
            credentials,
            token_url: token_url.into(),
            cached: RwLock::new(cached),
        }
    }

    /// Get a usable access token.
    pub async fn access_token(&self) -> Result<String, StoreError> {
        {
            let cached = self.cached.read().await;
            if let Some(token) = cached.as_ref().filter(|t| t.is_fresh()) {
                return Ok(token.value.clone());
            }
        }

        let mut cached = self.cached.write().await;

        // Another request may have refreshed while we waited for the lock
        if let Some(token) = cached.as_ref().filter(|t| t.is_fresh()) {
            return Ok(token.value.clone());
        }

        let token = self.refresh().await?;
        let value = token.value.clone();
        *cached = Some(token);
        Ok(value)
    }

    /// Drop the cached token if it is still the one that was rejected.
    ///
    /// A concurrent request may already have replaced it with a fresh token,
    /// which is kept.
    pub async fn invalidate(&self, rejected: &str) {
        let mut cached = self.cached.write().await;
        if cached.as_ref().is_some_and(|t| t.value == rejected) {
            debug!("Invalidating cached access token");
            *cached = None;
        }
    }

    async fn refresh(&self) -> Result<CachedToken, StoreError> {
        let (Some(refresh_token), Some(client_id), Some(client_secret)) = (
            self.credentials.refresh_token.as_deref(),
            self.credentials.client_id.as_deref(),
            self.credentials.client_secret.as_deref(),
        ) else {
            return Err(StoreError::Auth(
                "access token unavailable and no refresh credentials configured".to_string(),
            ));
        };

        let mut form = vec![
            ("grant_type", "refresh_token"),
            ("refresh_token", refresh_token),
            ("client_id", client_id),
            ("client_secret", client_secret),
        ];
        if let Some(redirect_uri) = self.credentials.redirect_uri.as_deref() {
            form.push(("redirect_uri", redirect_uri));
        }

        let response = self
            .http
            .post(&self.token_url)
            .form(&form)
            .send()
            .await
            .map_err(|e| StoreError::Auth(format!("token request failed: {}", e)))?;

        let status = response.status();
        let body = response
            .text()
            .await
            .map_err(|e| StoreError::Auth(format!("token response unreadable: {}", e)))?;

        if !status.is_success() {
            return Err(StoreError::Auth(format!(
                "token endpoint returned {}: {}",
                status.as_u16(),
                body
            )));
        }

        let parsed: TokenResponse = serde_json::from_str(&body)
            .map_err(|e| StoreError::Auth(format!("unexpected token response: {}", e)))?;

        info!(
            expires_in = parsed.expires_in,
            "Refreshed Google Drive access token"
        );

        Ok(CachedToken {
            value: parsed.access_token,
            expires_at: parsed
                .expires_in
                .map(|secs| Instant::now() + Duration::from_secs(secs)),
        })
    }
}
