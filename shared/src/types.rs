use std::fmt;

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;

const STATUS_TOO_MANY_REQUESTS: u16 = 429;

// ============================================================================
// Enums
// ============================================================================

/// Screens the login flow can navigate between.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Screen {
    Login,
    Register,
    Home,
}

impl Screen {
    pub fn as_str(&self) -> &'static str {
        match self {
            Screen::Login => "Login",
            Screen::Register => "Register",
            Screen::Home => "Home",
        }
    }
}

/// Failure reported by the identity provider.
///
/// The login screen renders every variant with the same message today, but
/// callers receive the variant so they can branch on it.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum AuthError {
    #[error("invalid email or password")]
    InvalidCredentials,
    #[error("network unavailable")]
    NetworkUnavailable,
    #[error("too many attempts, try again later")]
    RateLimited,
    #[error("{0}")]
    Unknown(String),
}

impl AuthError {
    /// Classifies an identity provider error message such as
    /// `INVALID_PASSWORD` or `TOO_MANY_ATTEMPTS_TRY_LATER : Access ...`.
    pub fn from_provider_message(message: &str) -> Self {
        let code = message.split(" : ").next().unwrap_or_default().trim();

        match code {
            "EMAIL_NOT_FOUND" | "INVALID_PASSWORD" | "INVALID_LOGIN_CREDENTIALS"
            | "INVALID_EMAIL" => AuthError::InvalidCredentials,
            c if c.starts_with("TOO_MANY_ATTEMPTS_TRY_LATER") => AuthError::RateLimited,
            _ => AuthError::Unknown(message.to_string()),
        }
    }

    /// Classifies a non-2xx sign-in response. `body` is `None` when the
    /// response was not a provider error document.
    pub fn from_failed_response(status: u16, body: Option<ProviderErrorResponse>) -> Self {
        match body {
            Some(resp) => resp.into(),
            None if status == STATUS_TOO_MANY_REQUESTS => AuthError::RateLimited,
            None => AuthError::Unknown(format!("Request failed: {}", status)),
        }
    }

    /// The request never produced a response.
    pub fn from_transport(detail: impl fmt::Display) -> Self {
        log::warn!("Identity provider unreachable: {}", detail);
        AuthError::NetworkUnavailable
    }

    pub fn kind(&self) -> &'static str {
        match self {
            AuthError::InvalidCredentials => "invalid_credentials",
            AuthError::NetworkUnavailable => "network_unavailable",
            AuthError::RateLimited => "rate_limited",
            AuthError::Unknown(_) => "unknown",
        }
    }
}

// ============================================================================
// Domain Types
// ============================================================================

#[derive(Clone, PartialEq, Eq)]
pub struct Credentials {
    pub email: String,
    pub password: String,
}

impl fmt::Debug for Credentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credentials")
            .field("email", &self.email)
            .field("password", &"<redacted>")
            .finish()
    }
}

/// Signed-in user as returned by the identity provider.
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Session {
    pub user_id: String,
    pub email: String,
    pub id_token: String,
    pub expires_at: DateTime<Utc>,
}

impl Session {
    pub fn from_sign_in(resp: SignInResponse, now: DateTime<Utc>) -> Result<Self, AuthError> {
        let lifetime = resp.expires_in.trim().parse::<u32>().map_err(|_| {
            AuthError::Unknown(format!("Invalid token lifetime: {:?}", resp.expires_in))
        })?;
        Ok(Self {
            user_id: resp.local_id,
            email: resp.email,
            id_token: resp.id_token,
            expires_at: now + Duration::seconds(i64::from(lifetime)),
        })
    }
}

impl fmt::Debug for Session {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Session")
            .field("user_id", &self.user_id)
            .field("email", &self.email)
            .field("id_token", &"<redacted>")
            .field("expires_at", &self.expires_at)
            .finish()
    }
}

// ============================================================================
// Identity Provider Wire Types
// ============================================================================

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SignInRequest<'a> {
    pub email: &'a str,
    pub password: &'a str,
    pub return_secure_token: bool,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SignInResponse {
    pub local_id: String,
    pub email: String,
    pub id_token: String,
    /// Token lifetime in seconds, sent as a string.
    pub expires_in: String,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct ProviderErrorResponse {
    pub error: ProviderErrorBody,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct ProviderErrorBody {
    pub code: u16,
    pub message: String,
}

impl From<ProviderErrorResponse> for AuthError {
    fn from(resp: ProviderErrorResponse) -> Self {
        AuthError::from_provider_message(&resp.error.message)
    }
}

// ============================================================================
// API Response Types
// ============================================================================

/// Runtime settings the frontend fetches before showing the login screen.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ClientConfig {
    pub app_title: String,
    pub identity_provider_url: String,
    pub api_key: String,
}

impl ClientConfig {
    pub fn sign_in_url(&self) -> String {
        format!(
            "{}/v1/accounts:signInWithPassword?key={}",
            self.identity_provider_url.trim_end_matches('/'),
            self.api_key
        )
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ApiError {
    pub error: ApiErrorBody,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ApiErrorBody {
    pub code: String,
    pub message: String,
}

impl ApiError {
    pub fn new(code: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            error: ApiErrorBody {
                code: code.into(),
                message: message.into(),
            },
        }
    }

    pub fn not_found(message: impl Into<String>) -> Self {
        Self::new("NOT_FOUND", message)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HealthResponse {
    pub status: String,
    pub version: String,
}
