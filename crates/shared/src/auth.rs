//! Authentication types for JWT and tokens.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Role value carried by system and company administrators.
pub const ROLE_ADMIN: &str = "admin";

/// JWT claims for access tokens.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claims {
    /// Subject (user ID).
    pub sub: i64,
    /// Company ID (tenant context). `None` for the system administrator.
    #[serde(default)]
    pub company: Option<i64>,
    /// User's role.
    pub role: String,
    /// Issued at timestamp.
    pub iat: i64,
    /// Expiration timestamp.
    pub exp: i64,
}

impl Claims {
    /// Creates new claims for a user.
    #[must_use]
    pub fn new(
        user_id: i64,
        company_id: Option<i64>,
        role: &str,
        expires_at: DateTime<Utc>,
    ) -> Self {
        let now = Utc::now();
        Self {
            sub: user_id,
            company: company_id,
            role: role.to_string(),
            iat: now.timestamp(),
            exp: expires_at.timestamp(),
        }
    }

    /// Returns the user ID from claims.
    #[must_use]
    pub const fn user_id(&self) -> i64 {
        self.sub
    }

    /// Returns the company ID from claims.
    #[must_use]
    pub const fn company_id(&self) -> Option<i64> {
        self.company
    }

    /// Returns true for an admin that is not bound to any company.
    #[must_use]
    pub fn is_system_admin(&self) -> bool {
        self.company.is_none() && self.role == ROLE_ADMIN
    }
}

/// Login request payload.
#[derive(Debug, Clone, Deserialize)]
pub struct LoginRequest {
    /// Username.
    pub username: String,
    /// User password.
    pub password: String,
}

/// Registration request payload: a new company and its first administrator.
#[derive(Debug, Clone, Deserialize)]
pub struct RegisterRequest {
    /// Company name.
    pub company_name: String,
    /// Company contact email.
    pub email: Option<String>,
    /// Company phone.
    pub phone: Option<String>,
    /// Company address.
    pub address: Option<String>,
    /// Company tax number.
    pub tax_number: Option<String>,
    /// Company currency (defaults to SAR).
    pub currency_code: Option<String>,
    /// Administrator username.
    pub username: String,
    /// Administrator password.
    pub password: String,
    /// Administrator full name.
    pub full_name: Option<String>,
}

/// Login response payload.
#[derive(Debug, Clone, Serialize)]
pub struct LoginResponse {
    /// Authenticated user info.
    pub user: UserInfo,
    /// Access token.
    pub access_token: String,
    /// Refresh token.
    pub refresh_token: String,
    /// Token expiration in seconds.
    pub expires_in: i64,
}

/// User info returned in auth responses.
#[derive(Debug, Clone, Serialize)]
pub struct UserInfo {
    /// User ID.
    pub id: i64,
    /// Username.
    pub username: String,
    /// User full name.
    pub full_name: Option<String>,
    /// Company the user belongs to.
    pub company_id: Option<i64>,
    /// User's role.
    pub role: String,
}

/// Refresh token request.
#[derive(Debug, Clone, Deserialize)]
pub struct RefreshRequest {
    /// The refresh token.
    pub refresh_token: String,
}
