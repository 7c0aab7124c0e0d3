use anyhow::Result;
use chrono::Utc;
use tokio::sync::Mutex;
use tracing::{debug, info, warn};

use crate::api::{Login, LoginError};
use crate::store::TokenStore;

use super::{AccountVariant, Credential, TokenPair};

/// Hands out session tickets, logging in only when no usable one is cached.
///
/// Each variant has its own slot guarded by an async mutex that is held for
/// the whole check-then-refresh sequence. Concurrent callers for the same
/// variant queue behind an in-flight login and then reuse its result, so the
/// rate-limited session endpoint sees one request instead of many.
pub struct TokenCache<L, S> {
    login: L,
    store: S,
    primary: Mutex<Option<Credential>>,
    alternate: Mutex<Option<Credential>>,
}

impl<L, S> TokenCache<L, S>
where
    L: Login,
    S: TokenStore,
{
    pub fn new(login: L, store: S) -> Self {
        Self {
            login,
            store,
            primary: Mutex::new(None),
            alternate: Mutex::new(None),
        }
    }

    fn slot(&self, variant: AccountVariant) -> &Mutex<Option<Credential>> {
        match variant {
            AccountVariant::Primary => &self.primary,
            AccountVariant::Alternate => &self.alternate,
        }
    }

    /// Return a usable token for `variant`, logging in if the cached one is
    /// missing or stale.
    ///
    /// A failed login leaves both the in-memory and on-disk state untouched.
    pub async fn get_token(&self, variant: AccountVariant) -> Result<TokenPair, LoginError> {
        let mut slot = self.slot(variant).lock().await;

        let now = Utc::now();

        // A stale slot falls back to disk; another process may have refreshed it
        let cached = match slot.as_ref() {
            Some(credential) if credential.is_valid_at(now) => Some(credential.clone()),
            _ => self.store.load(variant),
        };

        if let Some(credential) = cached {
            if credential.is_valid_at(now) {
                debug!(
                    %variant,
                    minutes_left = credential.minutes_until_expiry(),
                    "Reusing cached session ticket"
                );
                let pair = credential.token_pair();
                *slot = Some(credential);
                return Ok(pair);
            }
            debug!(%variant, "Cached session ticket is stale");
        }

        let credential = match self.login.login(variant).await {
            Ok(credential) => credential,
            Err(e) => {
                warn!(%variant, error = %e, "Login failed");
                return Err(e);
            }
        };

        if let Err(e) = self.store.save(variant, &credential) {
            warn!(%variant, error = %e, "Failed to persist session ticket");
        }

        info!(%variant, "Session ticket refreshed");
        let pair = credential.token_pair();
        *slot = Some(credential);
        Ok(pair)
    }

    /// Forget the credential for `variant`, in memory and on disk.
    /// The next `get_token` call logs in again.
    pub async fn invalidate(&self, variant: AccountVariant) -> Result<()> {
        let mut slot = self.slot(variant).lock().await;
        *slot = None;
        self.store.remove(variant)?;
        debug!(%variant, "Session ticket invalidated");
        Ok(())
    }

    /// The in-memory credential for `variant`, if any. Never logs in.
    pub async fn cached(&self, variant: AccountVariant) -> Option<Credential> {
        self.slot(variant).lock().await.clone()
    }
}
