//! Bearer-token session for the target platform
//!
//! The session is an explicit object passed into the client, not a
//! process-wide token cache. Expiry is checked before every request and a
//! refresh happens synchronously on the calling task. Token *acquisition*
//! (OAuth2 client-credential flows, key handling) stays behind the
//! [`TokenSource`] trait; the shipped source is a pre-issued static token.

use async_trait::async_trait;
use chrono::{DateTime, Duration, Utc};
use tokio::sync::RwLock;
use tracing::debug;

use crate::error::Error;

/// Refresh this long before the recorded expiry to absorb clock skew
const EXPIRY_SKEW_SECS: i64 = 60;

/// An access token with an optional expiry
#[derive(Debug, Clone)]
pub struct AccessToken {
    pub token: String,
    /// `None` means the token never expires (static/pre-issued tokens)
    pub expires_at: Option<DateTime<Utc>>,
}

impl AccessToken {
    fn is_expired(&self) -> bool {
        match self.expires_at {
            Some(at) => Utc::now() + Duration::seconds(EXPIRY_SKEW_SECS) >= at,
            None => false,
        }
    }
}

/// Produces access tokens on demand
#[async_trait]
pub trait TokenSource: Send + Sync {
    async fn fetch_token(&self) -> Result<AccessToken, Error>;
}

/// A pre-issued token, e.g. from the environment; never refreshed
pub struct StaticToken(String);

impl StaticToken {
    pub fn new(token: impl Into<String>) -> Self {
        Self(token.into())
    }
}

#[async_trait]
impl TokenSource for StaticToken {
    async fn fetch_token(&self) -> Result<AccessToken, Error> {
        if self.0.is_empty() {
            return Err(Error::Auth("no access token configured".to_string()));
        }
        Ok(AccessToken {
            token: self.0.clone(),
            expires_at: None,
        })
    }
}

/// Holds the current token and refreshes it through a [`TokenSource`]
pub struct AuthSession {
    source: Box<dyn TokenSource>,
    current: RwLock<Option<AccessToken>>,
}

impl AuthSession {
    pub fn new(source: Box<dyn TokenSource>) -> Self {
        Self {
            source,
            current: RwLock::new(None),
        }
    }

    /// Session over a pre-issued static token
    pub fn with_static_token(token: impl Into<String>) -> Self {
        Self::new(Box::new(StaticToken::new(token)))
    }

    /// The bearer token to attach to the next request, refreshed first if
    /// the cached one is missing or about to expire.
    pub async fn bearer(&self) -> Result<String, Error> {
        if let Some(token) = self.current.read().await.as_ref() {
            if !token.is_expired() {
                return Ok(token.token.clone());
            }
        }

        debug!("access token missing or expiring, refreshing");
        let fresh = self.source.fetch_token().await?;
        let value = fresh.token.clone();
        *self.current.write().await = Some(fresh);
        Ok(value)
    }
}
