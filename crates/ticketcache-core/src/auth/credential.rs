use std::fmt;

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};

/// Lifetime assumed for a ticket whose login response carried no expiration.
/// Ubiservices tickets without an explicit expiry are safe for ~30 minutes.
const UNTRACKED_EXPIRY_MINUTES: i64 = 30;

/// Buffer before a tracked expiration at which the ticket stops being handed out (5 minutes)
const TOKEN_REFRESH_BUFFER_MINUTES: i64 = 5;

/// Which application identity is presented to the session endpoint.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AccountVariant {
    Primary,
    Alternate,
}

impl AccountVariant {
    pub const ALL: [AccountVariant; 2] = [AccountVariant::Primary, AccountVariant::Alternate];

    pub fn as_str(&self) -> &'static str {
        match self {
            AccountVariant::Primary => "primary",
            AccountVariant::Alternate => "alternate",
        }
    }
}

impl fmt::Display for AccountVariant {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// An authenticated ubiservices session.
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Credential {
    pub token: String,
    pub session_id: String,
    #[serde(default)]
    pub expiration: Option<DateTime<Utc>>,
    pub obtained_at: DateTime<Utc>,
    #[serde(default)]
    pub profile_id: Option<String>,
    #[serde(default)]
    pub user_id: Option<String>,
}

// Tickets are bearer secrets; keep them out of debug logs.
impl fmt::Debug for Credential {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credential")
            .field("token", &"<redacted>")
            .field("session_id", &self.session_id)
            .field("expiration", &self.expiration)
            .field("obtained_at", &self.obtained_at)
            .field("profile_id", &self.profile_id)
            .field("user_id", &self.user_id)
            .finish()
    }
}

impl Credential {
    /// Whether this credential may still be handed out at `now`.
    ///
    /// With a tracked expiration the ticket is usable while
    /// `now + 5 minutes < expiration`. Without one it is usable for
    /// 30 minutes after it was obtained.
    pub fn is_valid_at(&self, now: DateTime<Utc>) -> bool {
        match self.expiration {
            Some(expiration) => now + Duration::minutes(TOKEN_REFRESH_BUFFER_MINUTES) < expiration,
            None => now - self.obtained_at < Duration::minutes(UNTRACKED_EXPIRY_MINUTES),
        }
    }

    pub fn is_valid(&self) -> bool {
        self.is_valid_at(Utc::now())
    }

    /// The tracked expiration, or the assumed one for untracked tickets
    pub fn effective_expiry(&self) -> DateTime<Utc> {
        self.expiration
            .unwrap_or_else(|| self.obtained_at + Duration::minutes(UNTRACKED_EXPIRY_MINUTES))
    }

    pub fn time_until_expiry(&self) -> Duration {
        self.effective_expiry() - Utc::now()
    }

    /// Get minutes remaining until expiry (for display)
    pub fn minutes_until_expiry(&self) -> i64 {
        self.time_until_expiry().num_minutes().max(0)
    }

    pub fn token_pair(&self) -> TokenPair {
        TokenPair {
            token: self.token.clone(),
            session_id: self.session_id.clone(),
        }
    }
}

/// What callers need to present on subsequent ubiservices requests.
#[derive(Clone, PartialEq, Eq)]
pub struct TokenPair {
    pub token: String,
    pub session_id: String,
}

impl TokenPair {
    /// Value for the `Authorization` header of authenticated requests
    pub fn authorization_header(&self) -> String {
        format!("Ubi_v1 t={}", self.token)
    }
}

impl fmt::Debug for TokenPair {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TokenPair")
            .field("token", &"<redacted>")
            .field("session_id", &self.session_id)
            .finish()
    }
}
