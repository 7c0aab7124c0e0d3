//! Authentication module for session tickets.
//!
//! This module provides:
//! - `Credential`: A session ticket with its validity rules
//! - `TokenCache`: Per-variant ticket cache that logs in only when needed
//! - `PasswordStore`: Secure OS-level password storage via keyring
//!
//! Tickets are reused until 5 minutes before their expiration, or for 30
//! minutes when the login response did not say when they expire.

pub mod cache;
pub mod credential;
pub mod password;

pub use cache::TokenCache;
pub use credential::{AccountVariant, Credential, TokenPair};
pub use password::PasswordStore;
