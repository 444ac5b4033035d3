//! Session tokens.
//!
//! Tokens are HS256 JWTs carrying only the user id, issue/expiry times and a
//! random `jti`. The role is deliberately absent: it is read from the store on
//! every verification. A token is accepted only while it equals the user's
//! stored `active_token`, which gives one live session per user and makes
//! logout effective immediately.
//!
//! # Example
//!
//! ```rust,ignore
//! use docvault_core::auth::{TokenConfig, TokenService};
//!
//! let tokens = TokenService::new(TokenConfig::builder().secret(secret).build(), store)?;
//! let token = tokens.issue(&user).await?;
//! let session = tokens.verify(&token).await?;
//! assert_eq!(session.actor.id, user.id);
//! ```

use chrono::{DateTime, Utc};
use jsonwebtoken::{
    decode, encode, errors::ErrorKind, Algorithm, DecodingKey, EncodingKey, Header, Validation,
};
use serde::{Deserialize, Serialize};
use std::time::Duration;
use tracing::debug;
use uuid::Uuid;

use crate::config::AuthConfig;
use crate::error::{DocvaultError, Result};
use crate::models::User;
use crate::policy::Actor;
use crate::store::DynStore;
use crate::telemetry::token_fingerprint;

// ═══════════════════════════════════════════════════════════════════════════════
// Claims
// ═══════════════════════════════════════════════════════════════════════════════

/// JWT claims.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Claims {
    /// Subject user id
    #[serde(rename = "userId")]
    pub user_id: i64,

    /// Issued at (seconds since epoch)
    pub iat: i64,

    /// Expiry (seconds since epoch)
    pub exp: i64,

    /// Random token id; two tokens issued in the same second still differ
    pub jti: String,
}

impl Claims {
    pub fn new(user_id: i64, ttl: Duration) -> Self {
        let iat = Utc::now().timestamp();
        let ttl = i64::try_from(ttl.as_secs()).unwrap_or(i64::MAX);

        Self {
            user_id,
            iat,
            exp: iat.saturating_add(ttl),
            jti: Uuid::new_v4().to_string(),
        }
    }

    pub fn expires_at(&self) -> DateTime<Utc> {
        DateTime::from_timestamp(self.exp, 0).unwrap_or(Utc::now())
    }
}

// ═══════════════════════════════════════════════════════════════════════════════
// Configuration
// ═══════════════════════════════════════════════════════════════════════════════

/// Token signing configuration.
#[derive(Debug, Clone)]
pub struct TokenConfig {
    /// HS256 secret
    pub secret: String,

    /// Token lifetime
    pub ttl: Duration,

    /// Leeway for expiry checks (in seconds)
    pub leeway_secs: u64,
}

impl Default for TokenConfig {
    fn default() -> Self {
        Self {
            secret: String::new(),
            ttl: Duration::from_secs(24 * 60 * 60),
            leeway_secs: 0,
        }
    }
}

impl TokenConfig {
    pub fn builder() -> TokenConfigBuilder {
        TokenConfigBuilder::default()
    }
}

impl From<&AuthConfig> for TokenConfig {
    fn from(auth: &AuthConfig) -> Self {
        Self {
            secret: auth.jwt_secret.clone(),
            ttl: auth.token_ttl,
            leeway_secs: auth.leeway_secs,
        }
    }
}

/// Builder for token configuration.
#[derive(Default)]
pub struct TokenConfigBuilder {
    config: TokenConfig,
}

impl TokenConfigBuilder {
    pub fn secret(mut self, secret: impl Into<String>) -> Self {
        self.config.secret = secret.into();
        self
    }

    pub fn ttl(mut self, ttl: Duration) -> Self {
        self.config.ttl = ttl;
        self
    }

    pub fn leeway_secs(mut self, secs: u64) -> Self {
        self.config.leeway_secs = secs;
        self
    }

    pub fn build(self) -> TokenConfig {
        self.config
    }
}

// ═══════════════════════════════════════════════════════════════════════════════
// Token Service
// ═══════════════════════════════════════════════════════════════════════════════

/// A successfully verified session.
#[derive(Debug, Clone)]
pub struct Session {
    pub actor: Actor,
    pub claims: Claims,
}

/// Issues, verifies and revokes session tokens.
pub struct TokenService {
    config: TokenConfig,
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
    validation: Validation,
    store: DynStore,
}

impl std::fmt::Debug for TokenService {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TokenService")
            .field("ttl", &self.config.ttl)
            .field("leeway_secs", &self.config.leeway_secs)
            .field("store", &self.store.backend())
            .finish()
    }
}

impl TokenService {
    /// Create a token service backed by `store`.
    pub fn new(config: TokenConfig, store: DynStore) -> Result<Self> {
        if config.secret.is_empty() {
            return Err(DocvaultError::configuration("token signing secret is empty"));
        }

        let mut validation = Validation::new(Algorithm::HS256);
        validation.leeway = config.leeway_secs;
        validation.set_required_spec_claims(&["exp"]);

        Ok(Self {
            encoding_key: EncodingKey::from_secret(config.secret.as_bytes()),
            decoding_key: DecodingKey::from_secret(config.secret.as_bytes()),
            validation,
            config,
            store,
        })
    }

    pub fn store(&self) -> &DynStore {
        &self.store
    }

    /// Sign a token for `user_id` without recording it.
    pub fn sign(&self, user_id: i64) -> Result<String> {
        let claims = Claims::new(user_id, self.config.ttl);
        encode(&Header::new(Algorithm::HS256), &claims, &self.encoding_key)
            .map_err(|e| DocvaultError::internal(format!("Failed to sign token: {}", e)))
    }

    /// Decode and check signature and expiry.
    pub fn decode(&self, token: &str) -> Result<Claims> {
        decode::<Claims>(token, &self.decoding_key, &self.validation)
            .map(|data| data.claims)
            .map_err(|e| {
                let reason = match e.kind() {
                    ErrorKind::ExpiredSignature => "expired",
                    ErrorKind::InvalidSignature => "bad_signature",
                    _ => "malformed",
                };
                debug!(reason = reason, error = %e, "Token rejected");
                DocvaultError::invalid_token().with_context("reason", reason)
            })
    }

    /// Sign a token for `user` and make it the user's only valid token.
    pub async fn issue(&self, user: &User) -> Result<String> {
        let token = self.sign(user.id)?;
        if !self.store.set_active_token(user.id, Some(token.clone())).await? {
            return Err(DocvaultError::entity_not_found("user", user.id));
        }

        debug!(user_id = user.id, token = %token_fingerprint(&token), "Issued token");
        Ok(token)
    }

    /// Verify a presented token.
    ///
    /// Fails with `InvalidToken` when it does not decode, and with
    /// `RevokedToken` when it is no longer the user's active token, including
    /// when the user has been deleted.
    pub async fn verify(&self, token: &str) -> Result<Session> {
        let claims = self.decode(token)?;

        let user = self
            .store
            .find_user(claims.user_id)
            .await?
            .ok_or_else(DocvaultError::revoked_token)?;

        match user.active_token.as_deref() {
            Some(active) if active == token => Ok(Session {
                actor: user.actor(),
                claims,
            }),
            _ => Err(DocvaultError::revoked_token()),
        }
    }

    /// Invalidate every outstanding token of `user_id`.
    pub async fn revoke(&self, user_id: i64) -> Result<()> {
        self.store.set_active_token(user_id, None).await?;
        debug!(user_id = user_id, "Revoked session");
        Ok(())
    }
}

// ═══════════════════════════════════════════════════════════════════════════════
// Tests
// ═══════════════════════════════════════════════════════════════════════════════
