//! Session ticket cache for the ubiservices login endpoint.
//!
//! Logging in is rate limited (a handful of logins per hour), so tickets are
//! kept in memory and on disk and reused until they near expiration.
//!
//! ```no_run
//! use ticketcache_core::{AccountVariant, Config, FileTokenStore, LoginClient, TokenCache};
//!
//! # async fn run() -> anyhow::Result<()> {
//! let config = Config::load_with_env()?;
//! let cache = TokenCache::new(
//!     LoginClient::from_config(&config)?,
//!     FileTokenStore::new(config.data_dir()?),
//! );
//! let pair = cache.get_token(AccountVariant::Primary).await?;
//! println!("session {}", pair.session_id);
//! # Ok(())
//! # }
//! ```

pub mod api;
pub mod auth;
pub mod config;
pub mod logging;
pub mod store;

pub use api::{Login, LoginClient, LoginError};
pub use auth::{AccountVariant, Credential, PasswordStore, TokenCache, TokenPair};
pub use config::Config;
pub use store::{FileTokenStore, TokenStore};
