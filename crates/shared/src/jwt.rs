//! Signed session tokens.
//!
//! Every request after login carries an HS256 token whose claims name the
//! user, the company whose store they work in (absent for the system
//! administrator) and their role. Access and refresh tokens share the same
//! claims and differ only in how long they live.

use chrono::{DateTime, Duration, Utc};
use jsonwebtoken::errors::ErrorKind;
use jsonwebtoken::{DecodingKey, EncodingKey, Header, Validation, decode, encode};
use thiserror::Error;

use crate::auth::Claims;

/// Signing secret and token lifetimes, read from the `jwt` config section.
#[derive(Debug, Clone)]
pub struct JwtConfig {
    /// HMAC secret shared by signing and verification.
    pub secret: String,
    /// Minutes.
    pub access_token_expires_minutes: i64,
    /// Days.
    pub refresh_token_expires_days: i64,
}

impl Default for JwtConfig {
    fn default() -> Self {
        Self {
            secret: "change-me-in-production".to_string(),
            access_token_expires_minutes: 60,
            refresh_token_expires_days: 7,
        }
    }
}

/// Why a token could not be issued or accepted.
#[derive(Debug, Error)]
pub enum JwtError {
    /// Signing failed.
    #[error("failed to encode token: {0}")]
    EncodingError(String),

    /// Bad signature, malformed token or claims that do not fit [`Claims`].
    #[error("failed to decode token: {0}")]
    DecodingError(String),

    /// Well formed and correctly signed, but past its `exp`.
    #[error("token has expired")]
    Expired,
}

#[derive(Debug, Clone, Copy)]
enum TokenKind {
    Access,
    Refresh,
}

/// Issues and verifies the tokens of one deployment.
#[derive(Clone)]
pub struct JwtService {
    config: JwtConfig,
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
}

impl std::fmt::Debug for JwtService {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("JwtService")
            .field("access_token_expires_minutes", &self.config.access_token_expires_minutes)
            .field("refresh_token_expires_days", &self.config.refresh_token_expires_days)
            .finish_non_exhaustive()
    }
}

impl JwtService {
    /// Derives both keys from `config.secret`.
    #[must_use]
    pub fn new(config: JwtConfig) -> Self {
        let secret = config.secret.as_bytes();
        Self {
            encoding_key: EncodingKey::from_secret(secret),
            decoding_key: DecodingKey::from_secret(secret),
            config,
        }
    }

    /// Short-lived token sent as `Authorization: Bearer` on every call.
    ///
    /// `company_id` is `None` only for the system administrator.
    ///
    /// # Errors
    ///
    /// `JwtError::EncodingError` if signing fails.
    pub fn generate_access_token(
        &self,
        user_id: i64,
        company_id: Option<i64>,
        role: &str,
    ) -> Result<String, JwtError> {
        self.issue(TokenKind::Access, user_id, company_id, role)
    }

    /// Long-lived token exchanged at `/auth/refresh` for a new pair.
    ///
    /// # Errors
    ///
    /// `JwtError::EncodingError` if signing fails.
    pub fn generate_refresh_token(
        &self,
        user_id: i64,
        company_id: Option<i64>,
        role: &str,
    ) -> Result<String, JwtError> {
        self.issue(TokenKind::Refresh, user_id, company_id, role)
    }

    /// Checks the signature and expiry and returns the claims.
    ///
    /// # Errors
    ///
    /// `JwtError::Expired` for an expired token, `JwtError::DecodingError`
    /// for anything else that fails verification.
    pub fn validate_token(&self, token: &str) -> Result<Claims, JwtError> {
        match decode::<Claims>(token, &self.decoding_key, &Validation::default()) {
            Ok(data) => Ok(data.claims),
            Err(e) if matches!(e.kind(), ErrorKind::ExpiredSignature) => Err(JwtError::Expired),
            Err(e) => Err(JwtError::DecodingError(e.to_string())),
        }
    }

    /// Access token lifetime in seconds, reported as `expires_in` at login.
    #[must_use]
    pub const fn access_token_expires_in(&self) -> i64 {
        self.config.access_token_expires_minutes * 60
    }

    fn expiry(&self, kind: TokenKind, now: DateTime<Utc>) -> DateTime<Utc> {
        match kind {
            TokenKind::Access => now + Duration::minutes(self.config.access_token_expires_minutes),
            TokenKind::Refresh => now + Duration::days(self.config.refresh_token_expires_days),
        }
    }

    fn issue(
        &self,
        kind: TokenKind,
        user_id: i64,
        company_id: Option<i64>,
        role: &str,
    ) -> Result<String, JwtError> {
        let claims = Claims::new(user_id, company_id, role, self.expiry(kind, Utc::now()));
        encode(&Header::default(), &claims, &self.encoding_key)
            .map_err(|e| JwtError::EncodingError(e.to_string()))
    }
}
