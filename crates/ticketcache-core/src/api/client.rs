//! Login client for the ubiservices session endpoint.
//!
//! This module provides the `LoginClient` struct, which exchanges the account
//! email and password for a session ticket under one of the two application
//! identities, and the `Login` trait the token cache is written against.

use std::future::Future;
use std::time::Duration;

use base64::engine::general_purpose::STANDARD as BASE64;
use base64::Engine;
use chrono::{DateTime, Utc};
use reqwest::{header, Client, StatusCode};
use serde::Deserialize;
use tracing::{debug, info, warn};

use crate::auth::{AccountVariant, Credential, PasswordStore};
use crate::config::Config;

use super::LoginError;

// ============================================================================
// Constants
// ============================================================================

/// Base URL for ubiservices
const API_BASE_URL: &str = "https://public-ubiservices.ubi.com";

/// Session creation path
const SESSIONS_PATH: &str = "/v3/profiles/sessions";

/// Header selecting the application identity
const APP_ID_HEADER: &str = "Ubi-AppId";

/// Response header carrying the session identifier
const SESSION_ID_HEADER: &str = "Ubi-SessionId";

/// Environment variable consulted before the keychain
const ENV_PASSWORD: &str = "TICKETCACHE_PASSWORD";

/// HTTP request timeout in seconds.
/// 30s allows for slow API responses while failing fast enough for good UX.
const REQUEST_TIMEOUT_SECS: u64 = 30;

/// Exchanges account credentials for a session ticket.
pub trait Login {
    fn login(
        &self,
        variant: AccountVariant,
    ) -> impl Future<Output = Result<Credential, LoginError>> + Send;
}

#[derive(Debug, Deserialize)]
struct SessionResponse {
    ticket: String,
    #[serde(rename = "profileId")]
    profile_id: Option<String>,
    #[serde(rename = "userId")]
    user_id: Option<String>,
    expiration: Option<String>,
}

/// Clone is cheap - reqwest::Client uses Arc internally for connection pooling.
#[derive(Clone)]
pub struct LoginClient {
    client: Client,
    base_url: String,
    email: String,
    password: String,
    user_agent: String,
    primary_app_id: String,
    alternate_app_id: String,
}

impl LoginClient {
    /// Create a login client for an explicit email and password
    pub fn new(config: &Config, email: &str, password: &str) -> Result<Self, LoginError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(REQUEST_TIMEOUT_SECS))
            .build()?;

        Ok(Self {
            client,
            base_url: API_BASE_URL.to_string(),
            email: email.to_string(),
            password: password.to_string(),
            user_agent: config.user_agent().to_string(),
            primary_app_id: config.app_id(AccountVariant::Primary).to_string(),
            alternate_app_id: config.app_id(AccountVariant::Alternate).to_string(),
        })
    }

    /// Create a login client from configuration.
    /// The password comes from `TICKETCACHE_PASSWORD`, falling back to the OS keychain.
    pub fn from_config(config: &Config) -> Result<Self, LoginError> {
        let email = config
            .email
            .as_deref()
            .ok_or(LoginError::MissingEmail)?;

        let password = match std::env::var(ENV_PASSWORD) {
            Ok(password) if !password.is_empty() => password,
            _ => PasswordStore::get_password(email).map_err(|e| {
                warn!(error = %e, "No password in environment or keychain");
                LoginError::MissingPassword(email.to_string())
            })?,
        };

        Self::new(config, email, &password)
    }

    /// Point the client at a different host (proxies, test servers)
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into().trim_end_matches('/').to_string();
        self
    }

    fn app_id(&self, variant: AccountVariant) -> &str {
        match variant {
            AccountVariant::Primary => &self.primary_app_id,
            AccountVariant::Alternate => &self.alternate_app_id,
        }
    }

    fn basic_auth(&self) -> String {
        let encoded = BASE64.encode(format!("{}:{}", self.email, self.password));
        format!("Basic {}", encoded)
    }

    /// Turn a session endpoint response into a credential.
    ///
    /// The status is checked first, then the session id header, then the body.
    pub(crate) fn interpret_response(
        status: StatusCode,
        session_id: Option<&str>,
        body: &str,
        now: DateTime<Utc>,
    ) -> Result<Credential, LoginError> {
        if !status.is_success() {
            debug!(status = status.as_u16(), body = %LoginError::truncate_body(body), "Login rejected");
            return Err(LoginError::from_status(status));
        }

        let session_id = session_id
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .ok_or(LoginError::ProtocolViolation)?;

        let parsed: SessionResponse = serde_json::from_str(body).map_err(|e| {
            LoginError::InvalidResponse(format!("Failed to parse session response: {}", e))
        })?;

        if parsed.ticket.is_empty() {
            return Err(LoginError::InvalidResponse(
                "Session response carried an empty ticket".to_string(),
            ));
        }

        let expiration = parsed.expiration.as_deref().and_then(|raw| {
            match DateTime::parse_from_rfc3339(raw) {
                Ok(dt) => Some(dt.with_timezone(&Utc)),
                Err(e) => {
                    warn!(expiration = raw, error = %e, "Unparseable ticket expiration, treating as untracked");
                    None
                }
            }
        });

        Ok(Credential {
            token: parsed.ticket,
            session_id: session_id.to_string(),
            expiration,
            obtained_at: now,
            profile_id: parsed.profile_id,
            user_id: parsed.user_id,
        })
    }
}

impl Login for LoginClient {
    async fn login(&self, variant: AccountVariant) -> Result<Credential, LoginError> {
        let url = format!("{}{}", self.base_url, SESSIONS_PATH);
        info!(%variant, "Requesting new session ticket");

        let response = self
            .client
            .post(&url)
            .header(header::AUTHORIZATION, self.basic_auth())
            .header(header::USER_AGENT, &self.user_agent)
            .header(APP_ID_HEADER, self.app_id(variant))
            .json(&serde_json::json!({ "rememberMe": true }))
            .send()
            .await?;

        let status = response.status();
        let session_id = response
            .headers()
            .get(SESSION_ID_HEADER)
            .and_then(|v| v.to_str().ok())
            .map(str::to_string);
        let body = response.text().await?;

        let credential =
            Self::interpret_response(status, session_id.as_deref(), &body, Utc::now())?;
        info!(
            %variant,
            expiration = ?credential.expiration,
            "Session ticket obtained"
        );
        Ok(credential)
    }
}
