//! Decryption Authorization Tokens
//!
//! Signed HS256 tokens that authorize the confidential value service to
//! release the plaintext behind a ciphertext handle. The token binds
//! the caller identity (`sub`) to one specific handle so an
//! authorization can never be replayed against someone else's
//! ciphertext.

use chrono::Utc;
use jsonwebtoken::{
    decode, encode, Algorithm, DecodingKey, EncodingKey, Header, TokenData, Validation,
};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::ledger::state::{CiphertextHandle, Identity};

/// Default token lifetime in seconds.
const DEFAULT_TTL_SECS: i64 = 300;

/// Claims carried by a decryption authorization.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AuthorizationClaims {
    /// Hex-encoded identity of the requester.
    pub sub: String,
    /// Hex-encoded ciphertext handle the authorization covers.
    pub handle: String,
    /// Issued at timestamp (Unix seconds).
    #[serde(default)]
    pub iat: i64,
    /// Expiry timestamp (Unix seconds).
    #[serde(default)]
    pub exp: i64,
}

impl AuthorizationClaims {
    /// Parse the subject claim back into an identity.
    pub fn identity(&self) -> Result<Identity, AuthError> {
        Identity::from_hex(&self.sub).ok_or_else(|| AuthError::MissingClaim("sub".into()))
    }

    /// Parse the handle claim back into a ciphertext handle.
    pub fn ciphertext_handle(&self) -> Result<CiphertextHandle, AuthError> {
        CiphertextHandle::from_hex(&self.handle)
            .ok_or_else(|| AuthError::MissingClaim("handle".into()))
    }
}

/// Issues decryption authorizations on behalf of a session identity.
#[derive(Clone)]
pub struct AuthorizationSigner {
    secret: String,
    ttl_secs: i64,
}

impl AuthorizationSigner {
    /// Create a signer with the default token lifetime.
    pub fn new(secret: impl Into<String>) -> Self {
        Self {
            secret: secret.into(),
            ttl_secs: DEFAULT_TTL_SECS,
        }
    }

    /// Create a signer with a custom token lifetime.
    pub fn with_ttl(secret: impl Into<String>, ttl_secs: i64) -> Self {
        Self {
            secret: secret.into(),
            ttl_secs,
        }
    }

    /// Sign an authorization for `identity` to decrypt `handle`.
    pub fn sign(
        &self,
        identity: &Identity,
        handle: &CiphertextHandle,
    ) -> Result<String, AuthError> {
        let now = Utc::now().timestamp();
        let claims = AuthorizationClaims {
            sub: identity.to_hex(),
            handle: handle.to_hex(),
            iat: now,
            exp: now + self.ttl_secs,
        };

        let header = Header::new(Algorithm::HS256);
        let key = EncodingKey::from_secret(self.secret.as_bytes());
        encode(&header, &claims, &key).map_err(|e| AuthError::EncodeError(e.to_string()))
    }
}

impl std::fmt::Debug for AuthorizationSigner {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        // Never print the secret.
        f.debug_struct("AuthorizationSigner")
            .field("ttl_secs", &self.ttl_secs)
            .finish()
    }
}

/// Authorization token errors.
#[derive(Debug, Error)]
pub enum AuthError {
    /// Token format is invalid.
    #[error("invalid token format")]
    InvalidFormat,
    /// Token signature verification failed.
    #[error("invalid signature")]
    InvalidSignature,
    /// Token has expired.
    #[error("authorization expired")]
    Expired,
    /// Required claim is missing or malformed.
    #[error("missing required claim: {0}")]
    MissingClaim(String),
    /// JWT encoding error.
    #[error("encode error: {0}")]
    EncodeError(String),
    /// JWT decoding error.
    #[error("decode error: {0}")]
    DecodeError(String),
}

/// Validate an authorization token and extract its claims.
pub fn validate_authorization(
    token: &str,
    secret: &str,
) -> Result<AuthorizationClaims, AuthError> {
    let mut validation = Validation::new(Algorithm::HS256);
    validation.required_spec_claims = std::collections::HashSet::new();
    validation.validate_aud = false;

    let key = DecodingKey::from_secret(secret.as_bytes());
    let token_data: TokenData<AuthorizationClaims> =
        decode(token, &key, &validation).map_err(map_jwt_error)?;

    let claims = token_data.claims;

    if claims.sub.is_empty() {
        return Err(AuthError::MissingClaim("sub".into()));
    }
    if claims.handle.is_empty() {
        return Err(AuthError::MissingClaim("handle".into()));
    }

    // Manual expiry check, the decoder skips it when exp is zero.
    if claims.exp > 0 && Utc::now().timestamp() > claims.exp {
        return Err(AuthError::Expired);
    }

    Ok(claims)
}

/// Map JWT library errors to our error type.
fn map_jwt_error(err: jsonwebtoken::errors::Error) -> AuthError {
    use jsonwebtoken::errors::ErrorKind;
    match err.kind() {
        ErrorKind::ExpiredSignature => AuthError::Expired,
        ErrorKind::InvalidSignature => AuthError::InvalidSignature,
        ErrorKind::InvalidToken | ErrorKind::Base64(_) => AuthError::InvalidFormat,
        _ => AuthError::DecodeError(err.to_string()),
    }
}

// =============================================================================
// TESTS
// =============================================================================
