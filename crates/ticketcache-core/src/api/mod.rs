//! Client for the ubiservices session endpoint.
//!
//! Logging in POSTs basic-auth credentials to the session endpoint with the
//! application id of the chosen account variant. The ticket comes back in the
//! JSON body and the session id in a response header.

pub mod client;
pub mod error;

pub use client::{Login, LoginClient};
pub use error::LoginError;
