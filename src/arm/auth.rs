//! Credential forwarding
//!
//! Every request arrives with the caller's own Azure access token in the
//! `Authorization` header. This module extracts it, optionally peeks at
//! the (unverified) JWT claims for logging, and abstracts "something that
//! yields a bearer token" behind [`TokenProvider`] so handlers work the
//! same with a forwarded token or a self-refreshing credential.
//!
//! No signature, audience, or expiry validation happens here; an invalid
//! token is the management API's to reject.

use async_trait::async_trait;
use axum::http::{header, HeaderMap};
use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use base64::Engine as _;
use serde::Deserialize;
use std::sync::Arc;
use std::time::{Duration, Instant};
use thiserror::Error;
use tokio::sync::RwLock;

/// Literal scheme token the header must carry.
pub const BEARER_PREFIX: &str = "Bearer ";

/// Token expiry buffer - refresh tokens this much before they actually expire
const TOKEN_EXPIRY_BUFFER: Duration = Duration::from_secs(60);

#[derive(Debug, Error, PartialEq, Eq)]
pub enum AuthError {
    #[error("Missing or invalid Authorization header")]
    MissingCredential,
}

/// Extract the bearer token from request headers.
///
/// The header must be present and prefixed with the literal `"Bearer "`;
/// the trailing substring is returned unmodified.
pub fn bearer_token(headers: &HeaderMap) -> Result<&str, AuthError> {
    headers
        .get(header::AUTHORIZATION)
        .and_then(|value| value.to_str().ok())
        .and_then(|value| value.strip_prefix(BEARER_PREFIX))
        .ok_or(AuthError::MissingCredential)
}

/// Claims peeked (without verification) from the forwarded JWT.
#[derive(Debug, Default, Clone, Deserialize)]
pub struct TokenClaims {
    pub tid: Option<String>,
    pub upn: Option<String>,
    pub preferred_username: Option<String>,
    pub exp: Option<i64>,
}

impl TokenClaims {
    /// Best-effort user identifier for logging.
    pub fn user(&self) -> Option<&str> {
        self.upn.as_deref().or(self.preferred_username.as_deref())
    }
}

/// Decode the payload segment of a JWT without verifying it.
///
/// Returns `None` for opaque or malformed tokens; the token is still
/// forwarded either way.
pub fn decode_claims(token: &str) -> Option<TokenClaims> {
    let payload = token.split('.').nth(1)?;
    let bytes = URL_SAFE_NO_PAD.decode(payload).ok()?;
    serde_json::from_slice(&bytes).ok()
}

/// Something that can produce a bearer token for management API calls.
#[async_trait]
pub trait TokenProvider: Send + Sync {
    /// Get an access token for API calls.
    async fn bearer_token(&self) -> anyhow::Result<String>;
}

/// A static, pre-fetched token forwarded from the inbound request.
#[derive(Debug, Clone)]
pub struct ForwardedToken {
    token: String,
    claims: Option<TokenClaims>,
}

impl ForwardedToken {
    /// Extract the caller's token from request headers.
    ///
    /// Logs the tenant and user from the token claims when they decode;
    /// warns (but does not fail) when the token looks already expired,
    /// since expiry enforcement is delegated to the management API.
    pub fn from_headers(headers: &HeaderMap) -> Result<Self, AuthError> {
        let token = bearer_token(headers)?;
        let claims = decode_claims(token);

        if let Some(claims) = &claims {
            tracing::info!(
                tenant = claims.tid.as_deref().unwrap_or("-"),
                user = claims.user().unwrap_or("-"),
                "token received"
            );
            if let Some(exp) = claims.exp {
                if exp < chrono::Utc::now().timestamp() {
                    tracing::warn!("forwarded token appears expired; the management API will reject it");
                }
            }
        }

        Ok(Self {
            token: token.to_string(),
            claims,
        })
    }

    pub fn claims(&self) -> Option<&TokenClaims> {
        self.claims.as_ref()
    }

    /// Tenant id from the token claims, if the token was a decodable JWT.
    pub fn tenant(&self) -> Option<&str> {
        self.claims.as_ref().and_then(|c| c.tid.as_deref())
    }
}

#[async_trait]
impl TokenProvider for ForwardedToken {
    async fn bearer_token(&self) -> anyhow::Result<String> {
        Ok(self.token.clone())
    }
}

/// A freshly fetched token with its remaining lifetime.
pub struct FreshToken {
    pub token: String,
    pub ttl: Duration,
}

#[derive(Clone)]
struct CachedToken {
    token: String,
    /// When this token expires (with buffer applied)
    expires_at: Instant,
}

impl CachedToken {
    fn is_valid(&self) -> bool {
        Instant::now() < self.expires_at
    }
}

type FetchFn =
    dyn Fn() -> futures::future::BoxFuture<'static, anyhow::Result<FreshToken>> + Send + Sync;

/// A self-refreshing credential with token caching.
///
/// Used by deployments that run sweeps under a service credential instead
/// of a forwarded user token. Tokens are cached until shortly before they
/// expire and refreshed on demand.
#[derive(Clone)]
pub struct RefreshingToken {
    fetch: Arc<FetchFn>,
    token_cache: Arc<RwLock<Option<CachedToken>>>,
}

impl RefreshingToken {
    pub fn new<F>(fetch: F) -> Self
    where
        F: Fn() -> futures::future::BoxFuture<'static, anyhow::Result<FreshToken>>
            + Send
            + Sync
            + 'static,
    {
        Self {
            fetch: Arc::new(fetch),
            token_cache: Arc::new(RwLock::new(None)),
        }
    }

    /// Force refresh the token
    pub async fn refresh(&self) -> anyhow::Result<String> {
        {
            let mut cache = self.token_cache.write().await;
            *cache = None;
        }
        self.bearer_token().await
    }
}

#[async_trait]
impl TokenProvider for RefreshingToken {
    async fn bearer_token(&self) -> anyhow::Result<String> {
        // Check cache first - but only return if token is still valid
        {
            let cache = self.token_cache.read().await;
            if let Some(cached) = cache.as_ref() {
                if cached.is_valid() {
                    return Ok(cached.token.clone());
                }
                tracing::debug!("Cached token expired, fetching new token");
            }
        }

        let fresh = (self.fetch)().await?;
        let expires_at = Instant::now() + fresh.ttl.saturating_sub(TOKEN_EXPIRY_BUFFER);

        {
            let mut cache = self.token_cache.write().await;
            *cache = Some(CachedToken {
                token: fresh.token.clone(),
                expires_at,
            });
        }

        Ok(fresh.token)
    }
}
