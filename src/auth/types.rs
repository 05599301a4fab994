// Authentication types

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Access/refresh token pair returned by every credential exchange
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TokenPair {
    pub access_token: String,
    pub refresh_token: String,
    #[serde(default = "default_token_type")]
    pub token_type: String,
}

fn default_token_type() -> String {
    "bearer".to_string()
}

/// Account role assigned by the service
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum UserRole {
    User,
    Author,
    Admin,
}

/// Identity of the logged-in user, as reported by `/auth/me`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UserProfile {
    pub id: i64,
    pub name: String,
    pub email: String,
    pub role: UserRole,
    pub is_verified_author: bool,
    #[serde(default)]
    pub avatar: Option<String>,
    pub registration_date: DateTime<Utc>,
}

/// Login exchange request
#[derive(Debug, Serialize)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

/// Registration exchange request
#[derive(Debug, Serialize)]
pub struct RegisterRequest {
    pub name: String,
    pub email: String,
    pub password: String,
}

/// Refresh exchange request
#[derive(Debug, Serialize)]
pub struct RefreshRequest {
    pub refresh_token: String,
}

/// Single-session logout request
#[derive(Debug, Serialize)]
pub struct LogoutRequest {
    pub refresh_token: String,
}

/// One active refresh session, as listed by `/auth/sessions`
#[derive(Debug, Clone, Deserialize)]
pub struct SessionInfo {
    pub token_prefix: String,
    #[serde(default)]
    pub user_agent: Option<String>,
    pub created_at: DateTime<Utc>,
}
