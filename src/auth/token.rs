//! Bearer token encoding
//!
//! Tokens carry `{userId, iat, exp}` with timestamps in milliseconds. Two
//! codecs share the same claims and expiry rule: the signed HS256 codec used
//! by default, and the unsigned base64 format issued by the legacy mock
//! backend.

use base64::{engine::general_purpose::URL_SAFE_NO_PAD, Engine as _};
use chrono::{DateTime, Utc};
use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use std::sync::Arc;

use crate::config::{AuthConfig, TokenFormat};
use crate::error::{Error, Result};

/// Token claims
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Claims {
    pub user_id: String,
    /// Issued at, milliseconds since epoch
    #[serde(default)]
    pub iat: i64,
    /// Expiration, milliseconds since epoch
    pub exp: i64,
}

impl Claims {
    /// Claims for `user_id` expiring `ttl` from now
    pub fn for_user(user_id: &str, ttl: chrono::Duration) -> Self {
        let now = Utc::now().timestamp_millis();
        Self {
            user_id: user_id.to_string(),
            iat: now,
            exp: now + ttl.num_milliseconds(),
        }
    }

    /// A token is valid only while `exp > now`
    pub fn is_expired(&self) -> bool {
        self.exp <= Utc::now().timestamp_millis()
    }

    pub fn expires_at(&self) -> DateTime<Utc> {
        DateTime::from_timestamp_millis(self.exp).unwrap_or_default()
    }
}

/// Encodes and decodes bearer tokens
pub trait TokenCodec: Send + Sync {
    fn encode(&self, claims: &Claims) -> Result<String>;

    /// Parse a token without checking its expiry
    fn decode_claims(&self, token: &str) -> Result<Claims>;

    /// Parse a token, rejecting expired ones with [`Error::TokenExpired`]
    fn decode(&self, token: &str) -> Result<Claims> {
        let claims = self.decode_claims(token)?;
        if claims.is_expired() {
            return Err(Error::TokenExpired);
        }
        Ok(claims)
    }
}

/// Unsigned base64url JSON. Anyone can forge these.
#[derive(Debug, Clone, Default)]
pub struct OpaqueTokenCodec;

impl TokenCodec for OpaqueTokenCodec {
    fn encode(&self, claims: &Claims) -> Result<String> {
        let json = serde_json::to_vec(claims)?;
        Ok(URL_SAFE_NO_PAD.encode(json))
    }

    fn decode_claims(&self, token: &str) -> Result<Claims> {
        let bytes = URL_SAFE_NO_PAD
            .decode(token.trim())
            .map_err(|e| Error::InvalidToken(e.to_string()))?;
        serde_json::from_slice(&bytes).map_err(|e| Error::InvalidToken(e.to_string()))
    }
}

/// HS256-signed claims
#[derive(Clone)]
pub struct SignedTokenCodec {
    encoding: EncodingKey,
    decoding: DecodingKey,
}

impl SignedTokenCodec {
    pub fn new(secret: &[u8]) -> Self {
        Self {
            encoding: EncodingKey::from_secret(secret),
            decoding: DecodingKey::from_secret(secret),
        }
    }

    fn validation() -> Validation {
        // Expiry is milliseconds and checked by `TokenCodec::decode`
        let mut validation = Validation::new(Algorithm::HS256);
        validation.validate_exp = false;
        validation.required_spec_claims.clear();
        validation
    }
}

impl TokenCodec for SignedTokenCodec {
    fn encode(&self, claims: &Claims) -> Result<String> {
        encode(&Header::new(Algorithm::HS256), claims, &self.encoding)
            .map_err(|e| Error::Other(format!("Failed to create token: {}", e)))
    }

    fn decode_claims(&self, token: &str) -> Result<Claims> {
        decode::<Claims>(token.trim(), &self.decoding, &Self::validation())
            .map(|data| data.claims)
            .map_err(|e| Error::InvalidToken(e.to_string()))
    }
}

/// Build the codec selected by configuration
pub fn codec_from_config(config: &AuthConfig) -> Arc<dyn TokenCodec> {
    match config.token_format {
        TokenFormat::Signed => Arc::new(SignedTokenCodec::new(config.token_secret.as_bytes())),
        TokenFormat::Opaque => Arc::new(OpaqueTokenCodec),
    }
}
