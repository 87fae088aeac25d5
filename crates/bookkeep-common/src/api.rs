//! Request and response bodies exchanged with the bookkeep backend.

use serde::{Deserialize, Serialize};

use crate::id::CompanyId;

/// Credentials posted to the login endpoint.
#[derive(Serialize, Deserialize, Clone)]
pub struct LoginRequest {
    /// Account email.
    pub email: String,

    /// Account password.
    pub password: String,
}

impl std::fmt::Debug for LoginRequest {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LoginRequest")
            .field("email", &self.email)
            .finish_non_exhaustive()
    }
}

/// Successful login response.
#[derive(Serialize, Deserialize, Clone)]
pub struct LoginResponse {
    /// The new access token.
    pub access_token: String,

    /// The new refresh token.
    pub refresh_token: String,

    /// Username of the account, when reported.
    #[serde(default)]
    pub username: Option<String>,

    /// Email of the account, when reported.
    #[serde(default)]
    pub email: Option<String>,
}

impl std::fmt::Debug for LoginResponse {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LoginResponse")
            .field("username", &self.username)
            .field("email", &self.email)
            .finish_non_exhaustive()
    }
}

/// Account registration payload.
#[derive(Serialize, Deserialize, Clone, Default)]
pub struct RegisterRequest {
    /// Login name.
    pub username: String,

    /// Account email, also used to log in.
    pub email: String,

    /// Plain text password, hashed by the backend.
    pub password: String,

    /// Given name.
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub first_name: String,

    /// Family name.
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub last_name: String,

    /// Contact phone number.
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub phone: String,

    /// Postal address.
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub address: String,
}

/// Body of the token refresh call.
#[derive(Serialize, Deserialize, Clone)]
pub struct RefreshRequest {
    /// The refresh token.
    pub refresh: String,
}

/// Successful token refresh response.
#[derive(Serialize, Deserialize, Clone)]
pub struct RefreshResponse {
    /// The new access token.
    #[serde(alias = "access")]
    pub access_token: String,
}

/// Body of company-scoped list endpoints.
#[derive(Serialize, Deserialize, Clone, Copy, Debug, PartialEq, Eq)]
pub struct CompanyScope {
    /// The company to list records for.
    pub company: CompanyId,
}
